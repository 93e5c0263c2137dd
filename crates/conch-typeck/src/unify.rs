//! Most general unifiers and one-directional matching.
//!
//! `mgu` is symmetric and used by inference; `match_type` only binds
//! variables of the pattern side and is used to test a concrete predicate
//! against an instance head.

use crate::error::{MatchError, UnifyError};
use crate::pred::Pred;
use crate::subst::{Subst, Types};
use crate::ty::{HasKind, Type, Tyvar};

/// Most general unifier of two types.
pub fn mgu(t1: &Type, t2: &Type) -> Result<Subst, UnifyError> {
    match (t1, t2) {
        (Type::Gen(index), _) | (_, Type::Gen(index)) => {
            Err(UnifyError::UninstantiatedGeneric { index: *index })
        }
        (Type::App(l1, r1), Type::App(l2, r2)) => {
            let s1 = mgu(l1, l2)?;
            let s2 = mgu(&r1.apply(&s1), &r2.apply(&s1))?;
            Ok(s2.compose(&s1))
        }
        (Type::Var(v), t) | (t, Type::Var(v)) => var_bind(v, t),
        (Type::Con(c1), Type::Con(c2)) => {
            if c1.id == c2.id {
                Ok(Subst::empty())
            } else {
                Err(UnifyError::ConstructorMismatch {
                    left: c1.clone(),
                    right: c2.clone(),
                })
            }
        }
        (left, right) => Err(UnifyError::ShapeMismatch {
            left: left.clone(),
            right: right.clone(),
        }),
    }
}

/// Bind a variable to a type, with occurs and kind checks.
pub fn var_bind(var: &Tyvar, ty: &Type) -> Result<Subst, UnifyError> {
    if let Type::Var(other) = ty {
        if other.id == var.id {
            return Ok(Subst::empty());
        }
    }
    if let Some(index) = ty.first_gen() {
        return Err(UnifyError::UninstantiatedGeneric { index });
    }
    if ty.occurs(var) {
        return Err(UnifyError::OccursCheck {
            var: var.clone(),
            ty: ty.clone(),
        });
    }
    if var.kind() != ty.kind() {
        return Err(UnifyError::KindMismatch {
            var: var.clone(),
            ty: ty.clone(),
        });
    }
    Ok(Subst::singleton(var.clone(), ty.clone()))
}

/// Find `s` such that `apply(s, pattern) == target`.
///
/// Sub-results are combined with [`Subst::merge`], so a pattern variable
/// that occurs twice must match the same type both times.
pub fn match_type(pattern: &Type, target: &Type) -> Result<Subst, MatchError> {
    match (pattern, target) {
        (Type::App(l1, r1), Type::App(l2, r2)) => {
            let sl = match_type(l1, l2)?;
            let sr = match_type(r1, r2)?;
            sl.merge(&sr).map_err(|var| MatchError::Conflict { var })
        }
        (Type::Var(v), t) if v.kind() == t.kind() && t.first_gen().is_none() => {
            Ok(Subst::singleton(v.clone(), t.clone()))
        }
        (Type::Con(c1), Type::Con(c2)) if c1.id == c2.id => Ok(Subst::empty()),
        _ => Err(MatchError::Mismatch {
            pattern: pattern.clone(),
            target: target.clone(),
        }),
    }
}

/// Unify two predicates of the same class.
pub fn mgu_pred(p1: &Pred, p2: &Pred) -> Result<Subst, UnifyError> {
    if p1.class != p2.class {
        return Err(UnifyError::ClassMismatch {
            left: p1.class.clone(),
            right: p2.class.clone(),
        });
    }
    mgu(&p1.ty, &p2.ty)
}

/// Match a predicate against a (possibly polymorphic) pattern predicate.
pub fn match_pred(pattern: &Pred, target: &Pred) -> Result<Subst, MatchError> {
    if pattern.class != target.class {
        return Err(MatchError::ClassMismatch {
            pattern: pattern.class.clone(),
            target: target.class.clone(),
        });
    }
    match_type(&pattern.ty, &target.ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::Kind;

    fn a() -> Type {
        Type::var("a", Kind::Star)
    }

    fn b() -> Type {
        Type::var("b", Kind::Star)
    }

    fn int() -> Type {
        Type::star("Int")
    }

    fn list_con() -> Type {
        Type::con("List", Kind::of_arity(1))
    }

    #[test]
    fn mgu_is_reflexive() {
        let types = [
            a(),
            int(),
            Type::fun(a(), Type::list(b())),
            Type::app(list_con(), Type::fun(int(), a())),
        ];
        for t in &types {
            assert_eq!(mgu(t, t).unwrap(), Subst::empty(), "mgu({t}, {t})");
        }
    }

    #[test]
    fn mgu_is_sound() {
        let pairs = [
            (Type::fun(a(), int()), Type::fun(Type::list(b()), b())),
            (Type::fun(a(), a()), Type::fun(b(), Type::list(int()))),
            (Type::list(a()), Type::list(Type::fun(b(), b()))),
        ];
        for (t1, t2) in &pairs {
            let s = mgu(t1, t2).unwrap();
            assert_eq!(t1.apply(&s), t2.apply(&s), "mgu({t1}, {t2}) = {s}");
        }
    }

    #[test]
    fn occurs_check() {
        let t = Type::app(list_con(), a());
        match mgu(&a(), &t) {
            Err(UnifyError::OccursCheck { var, .. }) => assert_eq!(var.id, "a"),
            other => panic!("expected OccursCheck, got {:?}", other),
        }
    }

    #[test]
    fn kind_check() {
        let f = Type::var("b", Kind::of_arity(1));
        assert!(matches!(mgu(&a(), &f), Err(UnifyError::KindMismatch { .. })));
    }

    #[test]
    fn constructor_mismatch() {
        let result = mgu(&int(), &Type::star("Bool"));
        match result {
            Err(UnifyError::ConstructorMismatch { left, right }) => {
                assert_eq!(left.id, "Int");
                assert_eq!(right.id, "Bool");
            }
            other => panic!("expected ConstructorMismatch, got {:?}", other),
        }
    }

    #[test]
    fn shape_mismatch() {
        let result = mgu(&int(), &Type::list(int()));
        assert!(matches!(result, Err(UnifyError::ShapeMismatch { .. })));
    }

    #[test]
    fn generic_placeholder_is_rejected() {
        let result = mgu(&Type::Gen(0), &int());
        assert_eq!(result, Err(UnifyError::UninstantiatedGeneric { index: 0 }));
    }

    #[test]
    fn nested_generic_placeholder_is_rejected() {
        let nested = Type::list(Type::Gen(0));
        assert_eq!(
            mgu(&a(), &nested),
            Err(UnifyError::UninstantiatedGeneric { index: 0 })
        );
        assert_eq!(
            mgu(&Type::list(a()), &Type::list(nested.clone())),
            Err(UnifyError::UninstantiatedGeneric { index: 0 })
        );
        assert!(match_type(&a(), &nested).is_err());
    }

    #[test]
    fn variable_binds_either_side() {
        let s = mgu(&int(), &a()).unwrap();
        assert_eq!(s.lookup("a"), Some(&int()));
        let s = mgu(&a(), &int()).unwrap();
        assert_eq!(s.lookup("a"), Some(&int()));
    }

    #[test]
    fn match_is_asymmetric() {
        let s = match_type(&a(), &int()).unwrap();
        assert_eq!(s, Subst::singleton(Tyvar::new("a", Kind::Star), int()));
        assert!(match_type(&int(), &a()).is_err());
    }

    #[test]
    fn match_repeated_variable_must_agree() {
        let pattern = Type::fun(a(), a());
        assert!(match_type(&pattern, &Type::fun(int(), int())).is_ok());
        match match_type(&pattern, &Type::fun(int(), Type::star("Bool"))) {
            Err(MatchError::Conflict { var }) => assert_eq!(var.id, "a"),
            other => panic!("expected Conflict, got {:?}", other),
        }
        // mgu happily unifies the same shapes when the target has variables.
        assert!(mgu(&pattern, &Type::fun(int(), b())).is_ok());
    }

    #[test]
    fn match_respects_kinds() {
        let f = Type::var("f", Kind::of_arity(1));
        assert!(match_type(&f, &int()).is_err());
        assert!(match_type(&f, &list_con()).is_ok());
    }

    #[test]
    fn predicates_of_different_classes() {
        let p = Pred::new("Eq", a());
        let q = Pred::new("Ord", a());
        assert!(matches!(mgu_pred(&p, &q), Err(UnifyError::ClassMismatch { .. })));
        assert!(matches!(match_pred(&p, &q), Err(MatchError::ClassMismatch { .. })));
        assert!(match_pred(&p, &Pred::new("Eq", int())).is_ok());
    }
}
