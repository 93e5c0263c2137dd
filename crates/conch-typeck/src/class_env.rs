//! Class environments: classes, their superclasses and instances, and the
//! entailment relation built on top of them.
//!
//! A class environment is built once during bootstrap and only read while
//! expressions are being checked.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::{ClassEnvError, NoMatchingInstance};
use crate::pred::{Instance, Pred, Qual};
use crate::subst::{Subst, Types};
use crate::ty::{Type, Tyvar};
use crate::unify::{match_pred, mgu_pred};

#[derive(Clone, Debug, Default)]
struct Class {
    /// Direct superclasses.
    supers: Vec<String>,
    /// Instances, most recently added first.
    instances: Vec<Instance>,
}

#[derive(Clone, Debug, Default)]
pub struct ClassEnv {
    classes: FxHashMap<String, Class>,
    /// Types tried, in order, when resolving an ambiguous type variable.
    defaults: Vec<Type>,
}

impl ClassEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_defined(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Direct superclasses; empty for an unknown class.
    pub fn supers(&self, class: &str) -> &[String] {
        self.classes
            .get(class)
            .map(|c| c.supers.as_slice())
            .unwrap_or(&[])
    }

    /// Instances of a class; empty for an unknown class.
    pub fn instances(&self, class: &str) -> &[Instance] {
        self.classes
            .get(class)
            .map(|c| c.instances.as_slice())
            .unwrap_or(&[])
    }

    pub fn defaults(&self) -> &[Type] {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: Vec<Type>) {
        self.defaults = defaults;
    }

    /// Register a class. Superclasses must already be registered.
    pub fn add_class(
        &mut self,
        name: impl Into<String>,
        supers: Vec<String>,
    ) -> Result<(), ClassEnvError> {
        let name = name.into();
        if self.is_defined(&name) {
            return Err(ClassEnvError::ClassRedefinition { class: name });
        }
        if let Some(missing) = supers.iter().find(|s| !self.is_defined(s)) {
            return Err(ClassEnvError::UndefinedSuperclass {
                class: name,
                superclass: missing.clone(),
            });
        }
        self.classes.insert(
            name,
            Class {
                supers,
                instances: Vec::new(),
            },
        );
        Ok(())
    }

    /// Register the instance `context => head`.
    ///
    /// Rejected if the head unifies with the head of an existing instance of
    /// the same class. The check is syntactic: it looks at the heads only.
    pub fn add_instance(&mut self, context: Vec<Pred>, head: Pred) -> Result<(), ClassEnvError> {
        let renamed = rename_apart(&head);
        let class = self
            .classes
            .get_mut(&head.class)
            .ok_or_else(|| ClassEnvError::UnknownClass {
                class: head.class.clone(),
            })?;
        if let Some(existing) = class
            .instances
            .iter()
            .find(|inst| mgu_pred(&inst.head, &renamed).is_ok())
        {
            return Err(ClassEnvError::OverlappingInstance {
                instance: head,
                existing: existing.head.clone(),
            });
        }
        class.instances.insert(0, Qual::new(context, head));
        Ok(())
    }

    /// `p` together with everything its class's superclasses say about the
    /// same type, transitively.
    pub fn by_super(&self, p: &Pred) -> Vec<Pred> {
        let mut out = vec![p.clone()];
        for sup in self.supers(&p.class) {
            for q in self.by_super(&Pred::new(sup.clone(), p.ty.clone())) {
                if !out.contains(&q) {
                    out.push(q);
                }
            }
        }
        out
    }

    /// The context of the first instance whose head matches `p`, with the
    /// matching substitution applied.
    pub fn by_inst(&self, p: &Pred) -> Result<Vec<Pred>, NoMatchingInstance> {
        self.instances(&p.class)
            .iter()
            .find_map(|inst| {
                match_pred(&inst.head, p)
                    .ok()
                    .map(|u| inst.preds.apply(&u))
            })
            .ok_or_else(|| NoMatchingInstance { pred: p.clone() })
    }

    /// Whether `p` follows from `given` in this environment.
    pub fn entail(&self, given: &[Pred], p: &Pred) -> bool {
        if given.iter().any(|q| self.by_super(q).contains(p)) {
            return true;
        }
        match self.by_inst(p) {
            Ok(qs) => qs.iter().all(|q| self.entail(given, q)),
            Err(_) => false,
        }
    }

    /// Rewrite `p` into predicates in head-normal form using instances.
    pub fn to_hnf(&self, p: &Pred) -> Result<Vec<Pred>, NoMatchingInstance> {
        if p.in_hnf() {
            return Ok(vec![p.clone()]);
        }
        let ps = self.by_inst(p)?;
        self.to_hnfs(&ps)
    }

    pub fn to_hnfs(&self, ps: &[Pred]) -> Result<Vec<Pred>, NoMatchingInstance> {
        let mut out = Vec::new();
        for p in ps {
            out.extend(self.to_hnf(p)?);
        }
        Ok(out)
    }

    /// Drop every predicate entailed by the others. Relative order of the
    /// survivors is preserved.
    pub fn simplify(&self, ps: Vec<Pred>) -> Vec<Pred> {
        let mut kept: Vec<Pred> = Vec::new();
        for (i, p) in ps.iter().enumerate() {
            let others: Vec<Pred> = kept.iter().chain(&ps[i + 1..]).cloned().collect();
            if !self.entail(&others, p) {
                kept.push(p.clone());
            }
        }
        kept
    }

    /// Context reduction: head-normal form, then simplification.
    pub fn reduce(&self, ps: &[Pred]) -> Result<Vec<Pred>, NoMatchingInstance> {
        let hnf = self.to_hnfs(ps)?;
        let reduced = self.simplify(hnf);
        trace!(before = ps.len(), after = reduced.len(), "reduced context");
        Ok(reduced)
    }
}

/// Rename every variable of `p` so it cannot collide with the variables of
/// an already registered instance head. `%` never appears in a name the
/// signature reader or the inference context produces.
fn rename_apart(p: &Pred) -> Pred {
    let s: Subst = p
        .tv()
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            let fresh = Tyvar::new(format!("%{}", i), v.kind.clone());
            (v, Type::Var(fresh))
        })
        .collect();
    p.apply(&s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::Kind;

    fn a() -> Type {
        Type::var("a", Kind::Star)
    }

    fn int() -> Type {
        Type::star("Int")
    }

    fn env() -> ClassEnv {
        let mut ce = ClassEnv::new();
        ce.add_class("Eq", vec![]).unwrap();
        ce.add_class("Ord", vec!["Eq".into()]).unwrap();
        ce.add_instance(vec![], Pred::new("Eq", int())).unwrap();
        ce.add_instance(vec![], Pred::new("Ord", int())).unwrap();
        ce.add_instance(vec![Pred::new("Ord", a())], Pred::new("Ord", Type::list(a())))
            .unwrap();
        ce
    }

    #[test]
    fn class_redefinition() {
        let mut ce = env();
        assert_eq!(
            ce.add_class("Eq", vec![]),
            Err(ClassEnvError::ClassRedefinition { class: "Eq".into() })
        );
    }

    #[test]
    fn undefined_superclass() {
        let mut ce = ClassEnv::new();
        match ce.add_class("Ord", vec!["Eq".into()]) {
            Err(ClassEnvError::UndefinedSuperclass { class, superclass }) => {
                assert_eq!(class, "Ord");
                assert_eq!(superclass, "Eq");
            }
            other => panic!("expected UndefinedSuperclass, got {:?}", other),
        }
        assert!(!ce.is_defined("Ord"));
    }

    #[test]
    fn instance_of_unknown_class() {
        let mut ce = env();
        assert!(matches!(
            ce.add_instance(vec![], Pred::new("Show", int())),
            Err(ClassEnvError::UnknownClass { .. })
        ));
    }

    #[test]
    fn overlapping_instances() {
        let mut ce = env();
        assert!(matches!(
            ce.add_instance(vec![], Pred::new("Eq", int())),
            Err(ClassEnvError::OverlappingInstance { .. })
        ));
        // `Ord [Int]` unifies with the existing `Ord [a]`.
        assert!(matches!(
            ce.add_instance(vec![], Pred::new("Ord", Type::list(int()))),
            Err(ClassEnvError::OverlappingInstance { .. })
        ));
        // `Eq a` overlaps with `Eq Int`, whatever the variable is called.
        assert!(matches!(
            ce.add_instance(vec![], Pred::new("Eq", a())),
            Err(ClassEnvError::OverlappingInstance { .. })
        ));
        assert!(ce
            .add_instance(vec![], Pred::new("Eq", Type::star("Bool")))
            .is_ok());
    }

    #[test]
    fn overlap_check_renames_variables_apart() {
        let mut ce = ClassEnv::new();
        ce.add_class("C", vec![]).unwrap();
        ce.add_instance(vec![], Pred::new("C", Type::list(a()))).unwrap();
        // Without renaming, `C a` against `C [a]` fails the occurs check.
        assert!(matches!(
            ce.add_instance(vec![], Pred::new("C", a())),
            Err(ClassEnvError::OverlappingInstance { .. })
        ));
    }

    #[test]
    fn primed_variable_in_existing_head_still_overlaps() {
        let mut ce = ClassEnv::new();
        ce.add_class("Eq", vec![]).unwrap();
        ce.add_instance(vec![], Pred::new("Eq", Type::var("a'", Kind::Star)))
            .unwrap();
        assert!(matches!(
            ce.add_instance(vec![], Pred::new("Eq", Type::list(a()))),
            Err(ClassEnvError::OverlappingInstance { .. })
        ));
    }

    #[test]
    fn instances_are_prepended() {
        let ce = env();
        let ords = ce.instances("Ord");
        assert_eq!(ords.len(), 2);
        assert_eq!(ords[0].head, Pred::new("Ord", Type::list(a())));
    }

    #[test]
    fn by_super_is_reflexive_and_transitive() {
        let mut ce = env();
        ce.add_class("Bounded", vec!["Ord".into()]).unwrap();
        let p = Pred::new("Bounded", a());
        let closure = ce.by_super(&p);
        assert_eq!(
            closure,
            vec![p, Pred::new("Ord", a()), Pred::new("Eq", a())]
        );
    }

    #[test]
    fn by_inst_applies_matching_substitution() {
        let ce = env();
        let ps = ce.by_inst(&Pred::new("Ord", Type::list(int()))).unwrap();
        assert_eq!(ps, vec![Pred::new("Ord", int())]);
        assert!(ce.by_inst(&Pred::new("Ord", Type::star("Bool"))).is_err());
    }

    #[test]
    fn entailment() {
        let ce = env();
        let given = [Pred::new("Ord", a())];
        assert!(ce.entail(&given, &Pred::new("Eq", a())));
        assert!(ce.entail(&given, &Pred::new("Ord", Type::list(a()))));
        assert!(ce.entail(&[], &Pred::new("Ord", Type::list(Type::list(int())))));
        assert!(!ce.entail(&[], &Pred::new("Ord", a())));
        assert!(!ce.entail(&given, &Pred::new("Eq", Type::list(a()))));
    }

    #[test]
    fn entailment_is_monotone() {
        let ce = env();
        let p = Pred::new("Ord", Type::list(a()));
        let given = vec![Pred::new("Ord", a())];
        assert!(ce.entail(&given, &p));
        let mut more = given.clone();
        more.push(Pred::new("Eq", Type::var("b", Kind::Star)));
        more.push(Pred::new("Ord", int()));
        assert!(ce.entail(&more, &p));
    }

    #[test]
    fn reduce_to_head_normal_form() {
        let ce = env();
        let ps = vec![
            Pred::new("Eq", a()),
            Pred::new("Ord", Type::list(a())),
            Pred::new("Ord", int()),
        ];
        // Ord [a] becomes Ord a, which makes Eq a redundant; Ord Int vanishes.
        assert_eq!(ce.reduce(&ps).unwrap(), vec![Pred::new("Ord", a())]);
    }

    #[test]
    fn reduce_removes_duplicates() {
        let ce = env();
        let ps = vec![Pred::new("Eq", a()), Pred::new("Eq", a())];
        assert_eq!(ce.reduce(&ps).unwrap(), vec![Pred::new("Eq", a())]);
    }

    #[test]
    fn reduce_fails_without_instance() {
        let ce = env();
        let ps = vec![Pred::new("Ord", Type::star("Bool"))];
        assert_eq!(
            ce.reduce(&ps),
            Err(NoMatchingInstance {
                pred: Pred::new("Ord", Type::star("Bool"))
            })
        );
    }
}
