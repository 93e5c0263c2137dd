//! Expression inference.
//!
//! Walks the expression tree, allocating fresh variables and unifying
//! through an [`InferCtx`], and returns the predicates generated along the
//! way together with a copy of the tree annotated with types. Annotations
//! hold the types as they were when the node was visited; apply the final
//! substitution (see [`TypedExpr::resolved`]) to get fully resolved types.

use conch_common::ast::Expr;
use conch_common::span::Span;
use conch_common::token::{Token, TokenKind};
use serde::Serialize;

use crate::ctx::InferCtx;
use crate::env::TypeEnv;
use crate::error::{Origin, TypeError};
use crate::pred::Pred;
use crate::subst::{Subst, Types};
use crate::ty::{Kind, Type};

pub const FROM_NUMBER: &str = "FromNumber";
pub const FROM_STRING: &str = "FromString";

/// An expression annotated with its inferred type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum TypedExpr {
    Literal {
        token: Token,
        ty: Type,
    },
    Variable {
        name: Token,
        ty: Type,
    },
    /// Parentheses are transparent: the type is the inner expression's.
    Grouping {
        inner: Box<TypedExpr>,
        span: Span,
    },
    Application {
        func: Box<TypedExpr>,
        arg: Box<TypedExpr>,
        ty: Type,
    },
    /// `left op right`, typed as `(op left) right`. `operator_ty` is the
    /// instantiated type of the operator.
    Binary {
        left: Box<TypedExpr>,
        operator: Token,
        operator_ty: Type,
        right: Box<TypedExpr>,
        ty: Type,
    },
}

impl TypedExpr {
    pub fn ty(&self) -> &Type {
        match self {
            TypedExpr::Literal { ty, .. }
            | TypedExpr::Variable { ty, .. }
            | TypedExpr::Application { ty, .. }
            | TypedExpr::Binary { ty, .. } => ty,
            TypedExpr::Grouping { inner, .. } => inner.ty(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TypedExpr::Literal { token, .. } => token.span,
            TypedExpr::Variable { name, .. } => name.span,
            TypedExpr::Grouping { span, .. } => *span,
            TypedExpr::Application { func, arg, .. } => func.span().merge(arg.span()),
            TypedExpr::Binary { left, right, .. } => left.span().merge(right.span()),
        }
    }

    /// Rewrite every annotation through `s`.
    pub fn resolved(&self, s: &Subst) -> TypedExpr {
        match self {
            TypedExpr::Literal { token, ty } => TypedExpr::Literal {
                token: token.clone(),
                ty: ty.apply(s),
            },
            TypedExpr::Variable { name, ty } => TypedExpr::Variable {
                name: name.clone(),
                ty: ty.apply(s),
            },
            TypedExpr::Grouping { inner, span } => TypedExpr::Grouping {
                inner: Box::new(inner.resolved(s)),
                span: *span,
            },
            TypedExpr::Application { func, arg, ty } => TypedExpr::Application {
                func: Box::new(func.resolved(s)),
                arg: Box::new(arg.resolved(s)),
                ty: ty.apply(s),
            },
            TypedExpr::Binary {
                left,
                operator,
                operator_ty,
                right,
                ty,
            } => TypedExpr::Binary {
                left: Box::new(left.resolved(s)),
                operator: operator.clone(),
                operator_ty: operator_ty.apply(s),
                right: Box::new(right.resolved(s)),
                ty: ty.apply(s),
            },
        }
    }
}

/// Infer predicates and an annotated tree for `expr`.
pub fn infer_expr(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    expr: &Expr,
) -> Result<(Vec<Pred>, TypedExpr), TypeError> {
    match expr {
        Expr::Literal { token } => Ok(infer_lit(ctx, token)),
        Expr::Variable { name } => infer_var(ctx, env, name),
        Expr::Grouping { inner, span } => {
            let (ps, typed) = infer_expr(ctx, env, inner)?;
            Ok((
                ps,
                TypedExpr::Grouping {
                    inner: Box::new(typed),
                    span: *span,
                },
            ))
        }
        Expr::Application { func, arg } => {
            let (mut ps, typed_func) = infer_expr(ctx, env, func)?;
            let (qs, typed_arg) = infer_expr(ctx, env, arg)?;
            let origin = Origin::Application {
                func: func.span(),
                arg: arg.span(),
            };
            let ty = apply_to(ctx, typed_func.ty(), typed_arg.ty(), origin)?;
            ps.extend(qs);
            Ok((
                ps,
                TypedExpr::Application {
                    func: Box::new(typed_func),
                    arg: Box::new(typed_arg),
                    ty,
                },
            ))
        }
        Expr::Binary {
            left,
            operator,
            right,
        } => infer_binary(ctx, env, left, operator, right),
        other => Err(TypeError::UnsupportedExpressionForm {
            form: other.form(),
            span: other.span(),
        }),
    }
}

/// A literal is a fresh variable constrained by `FromNumber` or
/// `FromString`; its concrete type is decided by how it is used.
fn infer_lit(ctx: &mut InferCtx, token: &Token) -> (Vec<Pred>, TypedExpr) {
    let class = match token.kind {
        TokenKind::String => FROM_STRING,
        _ => FROM_NUMBER,
    };
    let ty = ctx.new_tvar(Kind::Star);
    (
        vec![Pred::new(class, ty.clone())],
        TypedExpr::Literal {
            token: token.clone(),
            ty,
        },
    )
}

fn infer_var(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    name: &Token,
) -> Result<(Vec<Pred>, TypedExpr), TypeError> {
    let scheme = env
        .lookup(&name.lexeme)
        .ok_or_else(|| TypeError::UnboundVariable {
            name: name.lexeme.clone(),
            span: name.span,
        })?;
    let qt = ctx.fresh_inst(scheme);
    Ok((
        qt.preds,
        TypedExpr::Variable {
            name: name.clone(),
            ty: qt.head,
        },
    ))
}

/// `l op r` is `(op l) r`: the operator is an ordinary two-argument
/// function looked up by name.
fn infer_binary(
    ctx: &mut InferCtx,
    env: &TypeEnv,
    left: &Expr,
    operator: &Token,
    right: &Expr,
) -> Result<(Vec<Pred>, TypedExpr), TypeError> {
    let origin = Origin::Operator {
        operator: operator.lexeme.clone(),
        span: left.span().merge(right.span()),
    };
    let (mut ps, typed_op) = infer_var(ctx, env, operator)?;
    let (qs, typed_left) = infer_expr(ctx, env, left)?;
    let partial = apply_to(ctx, typed_op.ty(), typed_left.ty(), origin.clone())?;
    let (rs, typed_right) = infer_expr(ctx, env, right)?;
    let ty = apply_to(ctx, &partial, typed_right.ty(), origin)?;
    ps.extend(qs);
    ps.extend(rs);
    Ok((
        ps,
        TypedExpr::Binary {
            left: Box::new(typed_left),
            operator: operator.clone(),
            operator_ty: typed_op.ty().clone(),
            right: Box::new(typed_right),
            ty,
        },
    ))
}

/// The result type of applying something of type `func` to something of
/// type `arg`.
fn apply_to(ctx: &mut InferCtx, func: &Type, arg: &Type, origin: Origin) -> Result<Type, TypeError> {
    let result = ctx.new_tvar(Kind::Star);
    ctx.unify(func, &Type::fun(arg.clone(), result.clone()), origin)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pred::Qual;
    use crate::scheme::Scheme;

    fn num(lexeme: &str, at: u32) -> Expr {
        Expr::literal(Token::number(lexeme, at, at + lexeme.len() as u32))
    }

    fn name(lexeme: &str, at: u32) -> Expr {
        Expr::variable(Token::ident(lexeme, at, at + lexeme.len() as u32))
    }

    #[test]
    fn literal_is_constrained_variable() {
        let mut ctx = InferCtx::new();
        let (ps, typed) = infer_expr(&mut ctx, &TypeEnv::new(), &num("5", 0)).unwrap();
        let t = Type::var("t0", Kind::Star);
        assert_eq!(ps, vec![Pred::new(FROM_NUMBER, t.clone())]);
        assert_eq!(typed.ty(), &t);
    }

    #[test]
    fn string_literal_uses_from_string() {
        let mut ctx = InferCtx::new();
        let expr = Expr::literal(Token::string("bd sn", 0, 7));
        let (ps, _) = infer_expr(&mut ctx, &TypeEnv::new(), &expr).unwrap();
        assert_eq!(ps[0].class, FROM_STRING);
    }

    #[test]
    fn grouping_is_transparent() {
        let mut ctx = InferCtx::new();
        let expr = Expr::grouping(num("1", 1), Span::new(0, 3));
        let (ps, typed) = infer_expr(&mut ctx, &TypeEnv::new(), &expr).unwrap();
        assert_eq!(ps.len(), 1);
        assert_eq!(typed.ty(), &Type::var("t0", Kind::Star));
        assert_eq!(typed.span(), Span::new(0, 3));
    }

    #[test]
    fn unbound_variable() {
        let mut ctx = InferCtx::new();
        let result = infer_expr(&mut ctx, &TypeEnv::new(), &name("undefinedName", 0));
        assert_eq!(
            result,
            Err(TypeError::UnboundVariable {
                name: "undefinedName".into(),
                span: Span::new(0, 13),
            })
        );
    }

    #[test]
    fn application_threads_substitution() {
        let mut env = TypeEnv::new();
        let number = Type::star("Number");
        env.insert("fast", Scheme::mono(Type::fun(number.clone(), number.clone())));
        let mut ctx = InferCtx::new();
        let expr = Expr::app(name("fast", 0), num("2", 5));
        let (ps, typed) = infer_expr(&mut ctx, &env, &expr).unwrap();
        let s = ctx.subst();
        assert_eq!(typed.ty().apply(s), number);
        assert_eq!(ps.apply(s), vec![Pred::new(FROM_NUMBER, number.clone())]);

        let resolved = typed.resolved(s);
        match resolved {
            TypedExpr::Application { arg, .. } => assert_eq!(arg.ty(), &number),
            other => panic!("expected application, got {:?}", other),
        }
    }

    #[test]
    fn applying_a_non_function_fails() {
        let mut env = TypeEnv::new();
        env.insert("hush", Scheme::mono(Type::star("Unit")));
        let mut ctx = InferCtx::new();
        let expr = Expr::app(name("hush", 0), num("1", 5));
        match infer_expr(&mut ctx, &env, &expr) {
            Err(TypeError::Unification { left, origin, .. }) => {
                assert_eq!(left, Type::star("Unit"));
                assert_eq!(origin.span(), Span::new(0, 6));
            }
            other => panic!("expected unification error, got {:?}", other),
        }
    }

    #[test]
    fn binary_operator_is_curried_application() {
        let a = Type::Gen(0);
        let mut env = TypeEnv::new();
        env.insert(
            "+",
            Scheme {
                kinds: vec![Kind::Star],
                body: Qual::new(
                    vec![Pred::new("Num", a.clone())],
                    Type::fun(a.clone(), Type::fun(a.clone(), a)),
                ),
            },
        );
        let expr = Expr::binary(num("1", 0), Token::operator("+", 2, 3), num("2", 4));
        let mut ctx = InferCtx::new();
        let (ps, typed) = infer_expr(&mut ctx, &env, &expr).unwrap();
        let s = ctx.subst();
        let t = typed.ty().apply(s);
        assert!(matches!(t, Type::Var(_)));
        assert_eq!(
            ps.apply(s),
            vec![
                Pred::new("Num", t.clone()),
                Pred::new(FROM_NUMBER, t.clone()),
                Pred::new(FROM_NUMBER, t.clone()),
            ]
        );
        match typed.resolved(s) {
            TypedExpr::Binary { operator_ty, .. } => {
                assert_eq!(operator_ty, Type::fun(t.clone(), Type::fun(t.clone(), t)));
            }
            other => panic!("expected binary node, got {:?}", other),
        }
    }

    #[test]
    fn assignment_is_unsupported() {
        let mut ctx = InferCtx::new();
        let expr = Expr::assignment(Token::ident("x", 0, 1), num("1", 4));
        assert_eq!(
            infer_expr(&mut ctx, &TypeEnv::new(), &expr),
            Err(TypeError::UnsupportedExpressionForm {
                form: "assignment",
                span: Span::new(0, 5),
            })
        );
    }
}
