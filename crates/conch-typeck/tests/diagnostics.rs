//! Rendering of type errors through ariadne.
//!
//! Box-drawing layout is left to ariadne; these tests check the parts that
//! are ours: error codes, messages, labels and help lines.

use conch_common::ast::Expr;
use conch_common::span::Span;
use conch_common::token::Token;
use conch_typeck::builtins::standard_prelude;
use conch_typeck::diagnostics::render_diagnostic;
use conch_typeck::error::TypeError;

fn render(src: &str, expr: &Expr) -> String {
    let err = standard_prelude().unwrap().check_expr(expr).unwrap_err();
    render_diagnostic(&err, src, "live.conch")
}

#[test]
fn unbound_variable() {
    let src = "fast 2 undefinedName";
    let expr = Expr::app(
        Expr::app(
            Expr::variable(Token::ident("fast", 0, 4)),
            Expr::literal(Token::number("2", 5, 6)),
        ),
        Expr::variable(Token::ident("undefinedName", 7, 20)),
    );
    let out = render(src, &expr);
    assert!(out.contains("E0105"), "{}", out);
    assert!(out.contains("unbound variable `undefinedName`"), "{}", out);
    assert!(out.contains("`undefinedName` is not defined"), "{}", out);
    assert!(out.contains("live.conch"), "{}", out);
}

#[test]
fn type_mismatch_labels_function_and_argument() {
    let src = "d1 hush";
    let expr = Expr::app(
        Expr::variable(Token::ident("d1", 0, 2)),
        Expr::variable(Token::ident("hush", 3, 7)),
    );
    let out = render(src, &expr);
    assert!(out.contains("E0103"), "{}", out);
    assert!(out.contains("type mismatch: `Pattern` is not `IO`"), "{}", out);
    assert!(
        out.contains("this has type `Pattern Controls -> IO Unit`"),
        "{}",
        out
    );
    assert!(out.contains("applied to this argument"), "{}", out);
    assert!(out.contains("it is used as `IO Unit -> t0`"), "{}", out);
}

#[test]
fn missing_instance_has_help() {
    let src = "n \"1 2\"";
    let expr = Expr::app(
        Expr::variable(Token::ident("n", 0, 1)),
        Expr::literal(Token::string("1 2", 2, 7)),
    );
    let out = render(src, &expr);
    assert!(out.contains("E0107"), "{}", out);
    assert!(out.contains("no instance for `FromString Number`"), "{}", out);
    assert!(out.contains("`Number` is not an instance of `FromString`"), "{}", out);
}

#[test]
fn operator_mismatch_labels_the_operator() {
    let src = "hush # 1";
    let expr = Expr::binary(
        Expr::variable(Token::ident("hush", 0, 4)),
        Token::operator("#", 5, 6),
        Expr::literal(Token::number("1", 7, 8)),
    );
    let out = render(src, &expr);
    assert!(out.contains("type mismatch: `Pattern` is not `IO`"), "{}", out);
    assert!(
        out.contains(
            "`#` has type `Pattern Controls -> Pattern Controls -> Pattern Controls` here"
        ),
        "{}",
        out
    );
}

#[test]
fn unsupported_form() {
    let src = "x = 1";
    let expr = Expr::assignment(
        Token::ident("x", 0, 1),
        Expr::literal(Token::number("1", 4, 5)),
    );
    let out = render(src, &expr);
    assert!(out.contains("E0106"), "{}", out);
    assert!(out.contains("no inference rule for assignment expressions"), "{}", out);
}

#[test]
fn span_past_the_end_is_clamped() {
    let err = TypeError::UnboundVariable {
        name: "x".into(),
        span: Span::new(100, 104),
    };
    let out = render_diagnostic(&err, "x", "live.conch");
    assert!(out.contains("unbound variable `x`"), "{}", out);
}
