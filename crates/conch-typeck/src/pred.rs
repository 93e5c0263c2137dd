//! Class predicates and qualified types.

use serde::Serialize;

use crate::subst::{Subst, Types};
use crate::ty::{Type, Tyvar};

/// `class ty`: the type must be an instance of the class.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Pred {
    pub class: String,
    pub ty: Type,
}

impl Pred {
    pub fn new(class: impl Into<String>, ty: Type) -> Self {
        Pred {
            class: class.into(),
            ty,
        }
    }

    /// Head-normal form: the predicate's type is a variable, possibly
    /// applied to arguments. Such a predicate cannot be reduced by looking
    /// at instances.
    pub fn in_hnf(&self) -> bool {
        fn hnf(ty: &Type) -> bool {
            match ty {
                Type::Var(_) => true,
                Type::Con(_) | Type::Gen(_) => false,
                Type::App(head, _) => hnf(head),
            }
        }
        hnf(&self.ty)
    }
}

impl Types for Pred {
    fn apply(&self, s: &Subst) -> Pred {
        Pred {
            class: self.class.clone(),
            ty: self.ty.apply(s),
        }
    }

    fn tv(&self) -> Vec<Tyvar> {
        self.ty.tv()
    }
}

/// `preds => head`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Qual<T> {
    pub preds: Vec<Pred>,
    pub head: T,
}

impl<T> Qual<T> {
    pub fn new(preds: Vec<Pred>, head: T) -> Self {
        Qual { preds, head }
    }

    /// A head with an empty context.
    pub fn unqualified(head: T) -> Self {
        Qual {
            preds: Vec::new(),
            head,
        }
    }
}

impl<T: Types> Types for Qual<T> {
    fn apply(&self, s: &Subst) -> Qual<T> {
        Qual {
            preds: self.preds.apply(s),
            head: self.head.apply(s),
        }
    }

    fn tv(&self) -> Vec<Tyvar> {
        let mut out = self.preds.tv();
        for v in self.head.tv() {
            if !out.iter().any(|u| u.id == v.id) {
                out.push(v);
            }
        }
        out
    }
}

/// An instance declaration: a context implying one head predicate, e.g.
/// `(Ord a) => Ord [a]`.
pub type Instance = Qual<Pred>;
