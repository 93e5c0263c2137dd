//! Conch type checker: Damas-Hindley-Milner inference with type classes.
//!
//! Expressions of the pattern language are typed against a class
//! environment and a set of global bindings. Literals are overloaded
//! (`FromNumber`, `FromString`), operators are curried functions, and the
//! inferred type of an expression is reported as a qualified type such as
//! `(Num t4, FromNumber t4) => t4`.
//!
//! # Architecture
//!
//! - [`ty`], [`pred`], [`scheme`]: kinds, types, predicates and schemes
//! - [`subst`]: substitutions and the [`subst::Types`] trait
//! - [`unify`]: most general unifiers and one-way matching
//! - [`class_env`]: classes, instances, entailment and context reduction
//! - [`ctx`], [`infer`]: the inference context and the expression walk
//! - [`sig`], [`prelude`], [`builtins`]: signatures and the bootstrap layer
//! - [`printer`], [`diagnostics`]: type text and ariadne reports
//! - [`error`]: error types

pub mod builtins;
pub mod class_env;
pub mod ctx;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod infer;
pub mod pred;
pub mod prelude;
pub mod printer;
pub mod scheme;
pub mod sig;
pub mod subst;
pub mod ty;
pub mod unify;

use conch_common::ast::{Expr, Program, Stmt};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::class_env::ClassEnv;
use crate::ctx::InferCtx;
use crate::env::TypeEnv;
use crate::error::{NoMatchingInstance, TypeError};
use crate::infer::{infer_expr, TypedExpr};
use crate::pred::{Pred, Qual};
use crate::subst::{Subst, Types};
use crate::ty::Type;

/// The outcome of checking one expression.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeckResult {
    /// The annotated tree, annotations as recorded during the walk.
    pub typed: TypedExpr,
    /// The final substitution.
    pub subst: Subst,
    /// Every predicate generated, with `subst` applied, before reduction.
    pub predicates: Vec<Pred>,
    /// The expression's type under its reduced context.
    pub qual_type: Qual<Type>,
}

impl TypeckResult {
    /// The annotated tree with every annotation resolved through `subst`.
    pub fn resolved(&self) -> TypedExpr {
        self.typed.resolved(&self.subst)
    }
}

/// Infer the qualified type of `expr`.
#[instrument(level = "debug", skip_all, fields(form = expr.form()))]
pub fn check_expr(
    class_env: &ClassEnv,
    env: &TypeEnv,
    expr: &Expr,
) -> Result<TypeckResult, TypeError> {
    let mut ctx = InferCtx::new();
    let (preds, typed) = infer_expr(&mut ctx, env, expr)?;
    let subst = ctx.into_subst();
    let predicates = preds.apply(&subst);
    let context = class_env
        .reduce(&predicates)
        .map_err(|NoMatchingInstance { pred }| TypeError::NoMatchingInstance {
            pred,
            span: expr.span(),
        })?;
    let qual_type = Qual::new(context, typed.ty().apply(&subst));
    debug!(ty = %qual_type, "checked expression");
    Ok(TypeckResult {
        typed,
        subst,
        predicates,
        qual_type,
    })
}

/// Check every statement on its own. One result per statement, in order.
#[instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
pub fn check_program(
    class_env: &ClassEnv,
    env: &TypeEnv,
    program: &Program,
) -> Vec<Result<TypeckResult, TypeError>> {
    program
        .statements
        .iter()
        .map(|stmt| match stmt {
            Stmt::Expression(expr) => check_expr(class_env, env, expr),
        })
        .collect()
}
