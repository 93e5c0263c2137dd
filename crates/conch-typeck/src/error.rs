//! Error types for unification, matching, class environments and inference.
//!
//! Every failure is terminal for the inference call that raised it. Errors
//! raised during inference carry the source location so the host can turn
//! them into diagnostics (see [`crate::diagnostics`]).

use std::fmt;

use conch_common::span::Span;

use crate::pred::Pred;
use crate::ty::{Tycon, Type, Tyvar};

/// Why two types failed to unify.
#[derive(Clone, Debug, PartialEq)]
pub enum UnifyError {
    /// The variable occurs inside the type it would be bound to.
    OccursCheck { var: Tyvar, ty: Type },
    /// The variable and the type have different kinds.
    KindMismatch { var: Tyvar, ty: Type },
    /// Two different constructors.
    ConstructorMismatch { left: Tycon, right: Tycon },
    /// Structurally incompatible types, e.g. a constructor against an application.
    ShapeMismatch { left: Type, right: Type },
    /// Predicates over different classes.
    ClassMismatch { left: String, right: String },
    /// A scheme placeholder reached unification; the scheme was not instantiated.
    UninstantiatedGeneric { index: usize },
}

/// Why a one-directional match failed.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchError {
    /// `target` is not an instance of `pattern`.
    Mismatch { pattern: Type, target: Type },
    /// A pattern variable would have to match two different types.
    Conflict { var: Tyvar },
    ClassMismatch { pattern: String, target: String },
}

/// Errors raised while building a class environment, and by instance lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum ClassEnvError {
    ClassRedefinition { class: String },
    UndefinedSuperclass { class: String, superclass: String },
    UnknownClass { class: String },
    OverlappingInstance { instance: Pred, existing: Pred },
}

/// No instance of the predicate's class matches the predicate.
#[derive(Clone, Debug, PartialEq)]
pub struct NoMatchingInstance {
    pub pred: Pred,
}

/// Where a unification constraint came from.
#[derive(Clone, Debug, PartialEq)]
pub enum Origin {
    /// `func arg`: the function's type must accept the argument.
    Application { func: Span, arg: Span },
    /// `left op right`: the operator applied to an operand.
    Operator { operator: String, span: Span },
}

impl Origin {
    pub fn span(&self) -> Span {
        match self {
            Origin::Application { func, arg } => func.merge(*arg),
            Origin::Operator { span, .. } => *span,
        }
    }
}

/// A failure while inferring the type of an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeError {
    /// `expected` and `found` as passed to unification do not unify.
    /// `left` and `right` are the same types with the substitution so far
    /// applied.
    Unification {
        expected: Type,
        found: Type,
        left: Type,
        right: Type,
        cause: UnifyError,
        origin: Origin,
    },
    UnboundVariable { name: String, span: Span },
    /// An expression form with no typing rule.
    UnsupportedExpressionForm { form: &'static str, span: Span },
    /// A predicate over a concrete type that no instance discharges.
    NoMatchingInstance { pred: Pred, span: Span },
}

impl TypeError {
    /// The source span the error should be reported at.
    pub fn span(&self) -> Span {
        match self {
            TypeError::Unification { origin, .. } => origin.span(),
            TypeError::UnboundVariable { span, .. }
            | TypeError::UnsupportedExpressionForm { span, .. }
            | TypeError::NoMatchingInstance { span, .. } => *span,
        }
    }
}

impl fmt::Display for UnifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifyError::OccursCheck { var, ty } => {
                write!(f, "infinite type: `{}` occurs in `{}`", var.id, ty)
            }
            UnifyError::KindMismatch { var, ty } => write!(
                f,
                "kind mismatch: `{}` has kind `{}` but `{}` has kind `{}`",
                var.id,
                var.kind,
                ty,
                crate::ty::HasKind::kind(ty)
            ),
            UnifyError::ConstructorMismatch { left, right } => {
                write!(f, "type mismatch: `{}` is not `{}`", left.id, right.id)
            }
            UnifyError::ShapeMismatch { left, right } => {
                write!(f, "type mismatch: `{}` does not fit `{}`", left, right)
            }
            UnifyError::ClassMismatch { left, right } => {
                write!(f, "class mismatch: `{}` is not `{}`", left, right)
            }
            UnifyError::UninstantiatedGeneric { index } => {
                write!(f, "uninstantiated scheme variable #{}", index)
            }
        }
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::Mismatch { pattern, target } => {
                write!(f, "`{}` is not an instance of `{}`", target, pattern)
            }
            MatchError::Conflict { var } => {
                write!(f, "`{}` would have to match two different types", var.id)
            }
            MatchError::ClassMismatch { pattern, target } => {
                write!(f, "class mismatch: `{}` is not `{}`", target, pattern)
            }
        }
    }
}

impl fmt::Display for ClassEnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassEnvError::ClassRedefinition { class } => {
                write!(f, "class `{}` is already defined", class)
            }
            ClassEnvError::UndefinedSuperclass { class, superclass } => write!(
                f,
                "superclass `{}` of `{}` is not defined",
                superclass, class
            ),
            ClassEnvError::UnknownClass { class } => {
                write!(f, "no class `{}` for instance", class)
            }
            ClassEnvError::OverlappingInstance { instance, existing } => write!(
                f,
                "instance `{}` overlaps with `{}`",
                instance, existing
            ),
        }
    }
}

impl fmt::Display for NoMatchingInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no instance for `{}`", self.pred)
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::Unification { cause, .. } => write!(f, "{}", cause),
            TypeError::UnboundVariable { name, .. } => {
                write!(f, "unbound variable `{}`", name)
            }
            TypeError::UnsupportedExpressionForm { form, .. } => {
                write!(f, "no inference rule for {} expressions", form)
            }
            TypeError::NoMatchingInstance { pred, .. } => {
                write!(f, "no instance for `{}`", pred)
            }
        }
    }
}

impl std::error::Error for UnifyError {}
impl std::error::Error for MatchError {}
impl std::error::Error for ClassEnvError {}
impl std::error::Error for NoMatchingInstance {}
impl std::error::Error for TypeError {}
