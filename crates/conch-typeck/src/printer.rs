//! Human-readable rendering of kinds, types, predicates, schemes and
//! substitutions.
//!
//! Function arrows are printed infix and right-associative, with
//! parentheses only where a function appears on the left of an arrow or as
//! a constructor argument. Qualified types print their context as
//! `(C1 t1, C2 t2) => type`.

use std::fmt;

use crate::pred::{Pred, Qual};
use crate::scheme::Scheme;
use crate::subst::Subst;
use crate::ty::{Kind, Type, ARROW, LIST};

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Star => write!(f, "*"),
            Kind::Fun(arg, ret) => match arg.as_ref() {
                Kind::Fun(..) => write!(f, "({}) -> {}", arg, ret),
                Kind::Star => write!(f, "* -> {}", ret),
            },
        }
    }
}

/// Display name of a scheme placeholder: `a`, `b`, ..., `z`, `a26`, ...
pub fn gen_name(index: usize) -> String {
    if index < 26 {
        char::from(b'a' + index as u8).to_string()
    } else {
        format!("a{}", index)
    }
}

fn write_type(f: &mut fmt::Formatter<'_>, ty: &Type, atomic: bool) -> fmt::Result {
    if let Some((domain, codomain)) = ty.as_fun() {
        if atomic {
            write!(f, "(")?;
        }
        write_type(f, domain, domain.as_fun().is_some())?;
        write!(f, " -> ")?;
        write_type(f, codomain, false)?;
        if atomic {
            write!(f, ")")?;
        }
        return Ok(());
    }

    match ty {
        Type::Var(v) => write!(f, "{}", v.id),
        Type::Con(c) if c.id == ARROW => write!(f, "(->)"),
        Type::Con(c) => write!(f, "{}", c.id),
        Type::Gen(n) => write!(f, "{}", gen_name(*n)),
        Type::App(..) => {
            let (head, args) = ty.spine();
            if let (Type::Con(c), [elem]) = (head, args.as_slice()) {
                if c.id == LIST {
                    write!(f, "[")?;
                    write_type(f, elem, false)?;
                    return write!(f, "]");
                }
            }
            if atomic {
                write!(f, "(")?;
            }
            write_type(f, head, true)?;
            for arg in args {
                write!(f, " ")?;
                write_type(f, arg, true)?;
            }
            if atomic {
                write!(f, ")")?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(f, self, false)
    }
}

impl fmt::Display for Pred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.class)?;
        write_type(f, &self.ty, true)
    }
}

fn write_context(f: &mut fmt::Formatter<'_>, preds: &[Pred]) -> fmt::Result {
    if preds.is_empty() {
        return Ok(());
    }
    write!(f, "(")?;
    for (i, p) in preds.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", p)?;
    }
    write!(f, ") => ")
}

impl<T: fmt::Display> fmt::Display for Qual<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_context(f, &self.preds)?;
        write!(f, "{}", self.head)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.kinds.is_empty() {
            write!(f, "forall")?;
            for i in 0..self.kinds.len() {
                write!(f, " {}", gen_name(i))?;
            }
            write!(f, ". ")?;
        }
        write!(f, "{}", self.body)
    }
}

impl fmt::Display for Subst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (v, t)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} := {}", v.id, t)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::Tyvar;
    use insta::assert_snapshot;

    fn a() -> Type {
        Type::var("a", Kind::Star)
    }

    fn pattern(t: Type) -> Type {
        Type::app(Type::con("Pattern", Kind::of_arity(1)), t)
    }

    #[test]
    fn arrows_are_right_associative() {
        let t = Type::fun(a(), Type::fun(a(), a()));
        assert_snapshot!(t.to_string(), @"a -> a -> a");
    }

    #[test]
    fn function_argument_is_parenthesized() {
        let t = Type::fun(Type::fun(a(), a()), pattern(a()));
        assert_snapshot!(t.to_string(), @"(a -> a) -> Pattern a");
    }

    #[test]
    fn nested_constructor_arguments() {
        let io = Type::con("IO", Kind::of_arity(1));
        let t = Type::fun(
            pattern(Type::star("Controls")),
            Type::app(io, Type::star("Unit")),
        );
        assert_snapshot!(t.to_string(), @"Pattern Controls -> IO Unit");
        assert_snapshot!(pattern(pattern(a())).to_string(), @"Pattern (Pattern a)");
        assert_snapshot!(pattern(Type::fun(a(), a())).to_string(), @"Pattern (a -> a)");
    }

    #[test]
    fn list_sugar() {
        assert_snapshot!(Type::list(pattern(a())).to_string(), @"[Pattern a]");
    }

    #[test]
    fn partial_arrow() {
        assert_snapshot!(Type::app(Type::arrow(), a()).to_string(), @"(->) a");
    }

    #[test]
    fn kinds() {
        assert_snapshot!(Kind::of_arity(2).to_string(), @"* -> * -> *");
        let higher = Kind::fun(Kind::of_arity(1), Kind::Star);
        assert_snapshot!(higher.to_string(), @"(* -> *) -> *");
    }

    #[test]
    fn qualified_types() {
        let qt = Qual::new(
            vec![Pred::new("Num", a()), Pred::new("FromNumber", a())],
            a(),
        );
        assert_snapshot!(qt.to_string(), @"(Num a, FromNumber a) => a");
        assert_snapshot!(Qual::unqualified(a()).to_string(), @"a");
        let inst = Qual::new(
            vec![Pred::new("Ord", a())],
            Pred::new("Ord", Type::list(a())),
        );
        assert_snapshot!(inst.to_string(), @"(Ord a) => Ord [a]");
        assert_snapshot!(Pred::new("Num", pattern(a())).to_string(), @"Num (Pattern a)");
    }

    #[test]
    fn schemes_name_placeholders() {
        let scheme = Scheme {
            kinds: vec![Kind::Star],
            body: Qual::new(
                vec![Pred::new("Num", Type::Gen(0))],
                Type::fun(Type::Gen(0), Type::fun(Type::Gen(0), Type::Gen(0))),
            ),
        };
        assert_snapshot!(scheme.to_string(), @"forall a. (Num a) => a -> a -> a");
    }

    #[test]
    fn substitutions() {
        let s: Subst = vec![
            (Tyvar::new("t0", Kind::Star), Type::star("Number")),
            (Tyvar::new("t2", Kind::Star), Type::fun(a(), a())),
        ]
        .into_iter()
        .collect();
        assert_snapshot!(s.to_string(), @"{t0 := Number, t2 := a -> a}");
        assert_snapshot!(Subst::empty().to_string(), @"{}");
    }
}
