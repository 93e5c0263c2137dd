//! Type schemes: qualified types quantified over `Gen` placeholders.

use serde::Serialize;

use crate::pred::{Pred, Qual};
use crate::subst::{Subst, Types};
use crate::ty::{HasKind, Kind, Type, Tyvar};

/// `forall kinds. body`. Each `Gen(i)` in `body` ranges over `kinds[i]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Scheme {
    pub kinds: Vec<Kind>,
    pub body: Qual<Type>,
}

impl Scheme {
    /// A scheme with nothing quantified.
    pub fn mono(ty: Type) -> Self {
        Scheme {
            kinds: Vec::new(),
            body: Qual::unqualified(ty),
        }
    }

    /// Quantify the members of `vars` that occur in `qt`, numbering them in
    /// order of first appearance. Variables not in `vars` stay free.
    pub fn quantify(vars: &[Tyvar], qt: &Qual<Type>) -> Scheme {
        let quantified: Vec<Tyvar> = qt
            .tv()
            .into_iter()
            .filter(|v| vars.iter().any(|u| u.id == v.id))
            .collect();
        let kinds = quantified.iter().map(|v| v.kind()).collect();
        let s: Subst = quantified
            .into_iter()
            .enumerate()
            .map(|(i, v)| (v, Type::Gen(i)))
            .collect();
        Scheme {
            kinds,
            body: qt.apply(&s),
        }
    }

    /// Quantify every free variable of `qt`.
    pub fn quantify_all(qt: &Qual<Type>) -> Scheme {
        Scheme::quantify(&qt.tv(), qt)
    }
}

impl Types for Scheme {
    fn apply(&self, s: &Subst) -> Scheme {
        Scheme {
            kinds: self.kinds.clone(),
            body: self.body.apply(s),
        }
    }

    fn tv(&self) -> Vec<Tyvar> {
        self.body.tv()
    }
}

/// Replace `Gen(i)` with `types[i]`.
pub trait Instantiate {
    fn inst(&self, types: &[Type]) -> Self;
}

impl Instantiate for Type {
    fn inst(&self, types: &[Type]) -> Type {
        match self {
            Type::App(l, r) => Type::app(l.inst(types), r.inst(types)),
            Type::Gen(n) => types.get(*n).cloned().unwrap_or_else(|| self.clone()),
            Type::Var(_) | Type::Con(_) => self.clone(),
        }
    }
}

impl Instantiate for Pred {
    fn inst(&self, types: &[Type]) -> Pred {
        Pred {
            class: self.class.clone(),
            ty: self.ty.inst(types),
        }
    }
}

impl<T: Instantiate> Instantiate for Vec<T> {
    fn inst(&self, types: &[Type]) -> Vec<T> {
        self.iter().map(|t| t.inst(types)).collect()
    }
}

impl<T: Instantiate> Instantiate for Qual<T> {
    fn inst(&self, types: &[Type]) -> Qual<T> {
        Qual {
            preds: self.preds.inst(types),
            head: self.head.inst(types),
        }
    }
}
