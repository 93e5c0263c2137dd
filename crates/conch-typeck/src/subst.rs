//! Substitutions: finite maps from type variables to types.

use serde::Serialize;

use crate::ty::{Type, Tyvar};

/// An ordered list of bindings; each variable is bound at most once.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Subst {
    bindings: Vec<(Tyvar, Type)>,
}

impl Subst {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The substitution `{var -> ty}`.
    pub fn singleton(var: Tyvar, ty: Type) -> Self {
        Subst {
            bindings: vec![(var, ty)],
        }
    }

    /// Look up the binding for a variable id.
    pub fn lookup(&self, id: &str) -> Option<&Type> {
        self.bindings
            .iter()
            .find(|(v, _)| v.id == id)
            .map(|(_, t)| t)
    }

    pub fn binds(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Tyvar, Type)> {
        self.bindings.iter()
    }

    /// `self @@ other`: the substitution that applies `other` first and then
    /// `self`. Not commutative.
    pub fn compose(&self, other: &Subst) -> Subst {
        let mut bindings: Vec<(Tyvar, Type)> = other
            .bindings
            .iter()
            .map(|(v, t)| (v.clone(), t.apply(self)))
            .collect();
        for (v, t) in &self.bindings {
            if !other.binds(&v.id) {
                bindings.push((v.clone(), t.clone()));
            }
        }
        Subst { bindings }
    }

    /// Union of two substitutions that must agree on every variable they
    /// both bind. On disagreement, returns the first conflicting variable.
    pub fn merge(&self, other: &Subst) -> Result<Subst, Tyvar> {
        for (v, _) in &self.bindings {
            if other.binds(&v.id) {
                let probe = Type::Var(v.clone());
                if probe.apply(self) != probe.apply(other) {
                    return Err(v.clone());
                }
            }
        }
        let mut bindings = self.bindings.clone();
        bindings.extend(
            other
                .bindings
                .iter()
                .filter(|(v, _)| !self.binds(&v.id))
                .cloned(),
        );
        Ok(Subst { bindings })
    }
}

impl FromIterator<(Tyvar, Type)> for Subst {
    fn from_iter<I: IntoIterator<Item = (Tyvar, Type)>>(iter: I) -> Self {
        let mut subst = Subst::empty();
        for (v, t) in iter {
            if !subst.binds(&v.id) {
                subst.bindings.push((v, t));
            }
        }
        subst
    }
}

/// Values that mention type variables: types, predicates, qualified
/// types, schemes, and lists of those.
pub trait Types: Sized {
    /// Replace every bound variable in `self`.
    fn apply(&self, s: &Subst) -> Self;

    /// Free type variables, in order of first appearance, without duplicates.
    fn tv(&self) -> Vec<Tyvar>;
}

impl Types for Type {
    fn apply(&self, s: &Subst) -> Type {
        match self {
            Type::Var(v) => s.lookup(&v.id).cloned().unwrap_or_else(|| self.clone()),
            Type::App(l, r) => Type::app(l.apply(s), r.apply(s)),
            Type::Con(_) | Type::Gen(_) => self.clone(),
        }
    }

    fn tv(&self) -> Vec<Tyvar> {
        let mut out = Vec::new();
        collect_tv(self, &mut out);
        out
    }
}

fn collect_tv(ty: &Type, out: &mut Vec<Tyvar>) {
    match ty {
        Type::Var(v) => {
            if !out.iter().any(|u| u.id == v.id) {
                out.push(v.clone());
            }
        }
        Type::App(l, r) => {
            collect_tv(l, out);
            collect_tv(r, out);
        }
        Type::Con(_) | Type::Gen(_) => {}
    }
}

impl<T: Types> Types for Vec<T> {
    fn apply(&self, s: &Subst) -> Vec<T> {
        self.iter().map(|t| t.apply(s)).collect()
    }

    fn tv(&self) -> Vec<Tyvar> {
        let mut out: Vec<Tyvar> = Vec::new();
        for t in self {
            for v in t.tv() {
                if !out.iter().any(|u| u.id == v.id) {
                    out.push(v);
                }
            }
        }
        out
    }
}
