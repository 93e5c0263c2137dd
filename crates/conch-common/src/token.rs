use serde::Serialize;

use crate::span::Span;

/// A token produced by the pattern-language scanner.
///
/// The type checker only looks at the kind (to classify literals) and the
/// lexeme (to resolve names); the span is carried through for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span: Span::new(start, end),
        }
    }

    /// A numeric literal token.
    pub fn number(lexeme: impl Into<String>, start: u32, end: u32) -> Self {
        Self::new(TokenKind::Number, lexeme, start, end)
    }

    /// A string literal token. The lexeme is the unquoted contents.
    pub fn string(lexeme: impl Into<String>, start: u32, end: u32) -> Self {
        Self::new(TokenKind::String, lexeme, start, end)
    }

    pub fn ident(lexeme: impl Into<String>, start: u32, end: u32) -> Self {
        Self::new(TokenKind::Identifier, lexeme, start, end)
    }

    pub fn operator(lexeme: impl Into<String>, start: u32, end: u32) -> Self {
        Self::new(TokenKind::Operator, lexeme, start, end)
    }
}

/// The token kinds that can reach the type checker.
///
/// Punctuation, line breaks and keywords are consumed by the parser and
/// never appear inside an expression tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    /// Infix operators: `+`, `|+|`, `#`, `<~` and friends.
    Operator,
}
