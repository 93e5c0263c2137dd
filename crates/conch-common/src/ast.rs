//! Expression tree produced by the parser.
//!
//! Every line of a pattern program is a single expression statement. The
//! tree is deliberately small: literals, names, parenthesised groups,
//! juxtaposition (`f x`, and `f $ x` which the parser folds into the same
//! node) and infix operators.

use serde::Serialize;

use crate::span::Span;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// A numeric or string literal. The token kind tells which.
    Literal { token: Token },
    /// A reference to a global binding.
    Variable { name: Token },
    /// `( inner )`. The span covers both parentheses.
    Grouping { inner: Box<Expr>, span: Span },
    /// `func arg`.
    Application { func: Box<Expr>, arg: Box<Expr> },
    /// `left operator right`.
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    /// `name = value`. Parsed, but there is no typing rule for it yet.
    Assignment { name: Token, value: Box<Expr> },
}

impl Expr {
    pub fn literal(token: Token) -> Expr {
        Expr::Literal { token }
    }

    pub fn variable(name: Token) -> Expr {
        Expr::Variable { name }
    }

    pub fn grouping(inner: Expr, span: Span) -> Expr {
        Expr::Grouping {
            inner: Box::new(inner),
            span,
        }
    }

    pub fn app(func: Expr, arg: Expr) -> Expr {
        Expr::Application {
            func: Box::new(func),
            arg: Box::new(arg),
        }
    }

    pub fn binary(left: Expr, operator: Token, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn assignment(name: Token, value: Expr) -> Expr {
        Expr::Assignment {
            name,
            value: Box::new(value),
        }
    }

    /// The source span covered by this node.
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal { token } => token.span,
            Expr::Variable { name } => name.span,
            Expr::Grouping { span, .. } => *span,
            Expr::Application { func, arg } => func.span().merge(arg.span()),
            Expr::Binary { left, right, .. } => left.span().merge(right.span()),
            Expr::Assignment { name, value } => name.span.merge(value.span()),
        }
    }

    /// Human-readable name of the node kind, used in diagnostics.
    pub fn form(&self) -> &'static str {
        match self {
            Expr::Literal { token } if token.kind == TokenKind::String => "string literal",
            Expr::Literal { .. } => "numeric literal",
            Expr::Variable { .. } => "variable",
            Expr::Grouping { .. } => "grouping",
            Expr::Application { .. } => "application",
            Expr::Binary { .. } => "binary operator",
            Expr::Assignment { .. } => "assignment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Expression(Expr),
}

/// A parsed program: one statement per source line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}
