//! The inference context: fresh-variable supply plus the substitution
//! accumulated so far.
//!
//! One context is owned by exactly one top-level inference call. Each
//! operation takes `&mut self` and returns a `Result`, so sequencing with
//! `?` threads the counter and the substitution and aborts on the first
//! failure.

use tracing::trace;

use crate::error::{Origin, TypeError};
use crate::pred::Qual;
use crate::scheme::{Instantiate, Scheme};
use crate::subst::{Subst, Types};
use crate::ty::{enum_id, Kind, Type, Tyvar};
use crate::unify::mgu;

#[derive(Debug, Default)]
pub struct InferCtx {
    subst: Subst,
    next_var: u32,
}

impl InferCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// The substitution accumulated so far.
    pub fn subst(&self) -> &Subst {
        &self.subst
    }

    pub fn into_subst(self) -> Subst {
        self.subst
    }

    /// Number of variables allocated so far.
    pub fn var_count(&self) -> u32 {
        self.next_var
    }

    /// A type variable distinct from every variable allocated before.
    pub fn new_tvar(&mut self, kind: Kind) -> Type {
        let id = enum_id(self.next_var);
        self.next_var += 1;
        trace!(var = %id, "fresh type variable");
        Type::Var(Tyvar::new(id, kind))
    }

    /// Unify two types under the current substitution and extend it.
    ///
    /// On failure the error carries both types as given and with the
    /// current substitution applied.
    pub fn unify(&mut self, t1: &Type, t2: &Type, origin: Origin) -> Result<(), TypeError> {
        let left = t1.apply(&self.subst);
        let right = t2.apply(&self.subst);
        match mgu(&left, &right) {
            Ok(u) => {
                trace!(%left, %right, unifier = %u, "unified");
                self.subst = u.compose(&self.subst);
                Ok(())
            }
            Err(cause) => {
                trace!(%left, %right, %cause, "unification failed");
                Err(TypeError::Unification {
                    expected: t1.clone(),
                    found: t2.clone(),
                    left,
                    right,
                    cause,
                    origin,
                })
            }
        }
    }

    /// Replace each quantified slot of `scheme` with a fresh variable of
    /// the slot's kind.
    pub fn fresh_inst(&mut self, scheme: &Scheme) -> Qual<Type> {
        let fresh: Vec<Type> = scheme
            .kinds
            .iter()
            .map(|k| self.new_tvar(k.clone()))
            .collect();
        scheme.body.inst(&fresh)
    }
}
