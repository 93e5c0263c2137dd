//! Ariadne-based rendering of type errors.
//!
//! Output is colorless so it can be compared in tests. Each report has a
//! stable error code, the error's message, a label at the offending span
//! and, where one applies, a help line.

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use conch_common::span::Span;

use crate::error::{Origin, TypeError, UnifyError};

// ── Error Codes ────────────────────────────────────────────────────────

fn error_code(err: &TypeError) -> &'static str {
    match err {
        TypeError::Unification { cause, .. } => match cause {
            UnifyError::OccursCheck { .. } => "E0101",
            UnifyError::KindMismatch { .. } => "E0102",
            UnifyError::ConstructorMismatch { .. }
            | UnifyError::ShapeMismatch { .. }
            | UnifyError::ClassMismatch { .. } => "E0103",
            UnifyError::UninstantiatedGeneric { .. } => "E0104",
        },
        TypeError::UnboundVariable { .. } => "E0105",
        TypeError::UnsupportedExpressionForm { .. } => "E0106",
        TypeError::NoMatchingInstance { .. } => "E0107",
    }
}

fn to_range(span: Span) -> Range<usize> {
    span.start as usize..span.end as usize
}

// ── Main Rendering Function ────────────────────────────────────────────

/// Render a type error against the source it was raised for.
pub fn render_diagnostic(error: &TypeError, source: &str, filename: &str) -> String {
    let config = Config::default()
        .with_color(false)
        .with_index_type(IndexType::Byte);
    let source_len = source.len();

    // ariadne wants a non-empty span inside the source.
    let clamp = |r: Range<usize>| -> Range<usize> {
        let s = r.start.min(source_len);
        let e = r.end.min(source_len).max(s);
        if s < e {
            s..e
        } else if e < source_len {
            s..e + 1
        } else {
            s.saturating_sub(1)..e
        }
    };

    let code = error_code(error);
    let msg = error.to_string();
    let primary = clamp(to_range(error.span()));

    let mut builder = Report::build(ReportKind::Error, (filename, primary.clone()))
        .with_code(code)
        .with_message(&msg)
        .with_config(config);

    match error {
        TypeError::Unification {
            left,
            right,
            cause,
            origin,
            ..
        } => {
            match origin {
                Origin::Application { func, arg } => {
                    builder.add_label(
                        Label::new((filename, clamp(to_range(*func))))
                            .with_message(format!("this has type `{}`", left))
                            .with_color(Color::Red),
                    );
                    builder.add_label(
                        Label::new((filename, clamp(to_range(*arg))))
                            .with_message("applied to this argument")
                            .with_color(Color::Blue),
                    );
                }
                Origin::Operator { operator, span } => {
                    builder.add_label(
                        Label::new((filename, clamp(to_range(*span))))
                            .with_message(format!("`{}` has type `{}` here", operator, left))
                            .with_color(Color::Red),
                    );
                }
            }
            match cause {
                UnifyError::OccursCheck { .. } => {
                    builder.set_help("a type cannot contain itself; check the order of arguments");
                }
                UnifyError::KindMismatch { .. } => {
                    builder.set_help("a constructor is missing an argument");
                }
                UnifyError::UninstantiatedGeneric { .. } => {}
                _ => {
                    builder.set_help(format!("it is used as `{}`", right));
                }
            }
        }
        TypeError::UnboundVariable { name, span } => {
            builder.add_label(
                Label::new((filename, clamp(to_range(*span))))
                    .with_message(format!("`{}` is not defined", name))
                    .with_color(Color::Red),
            );
        }
        TypeError::UnsupportedExpressionForm { form, span } => {
            builder.add_label(
                Label::new((filename, clamp(to_range(*span))))
                    .with_message(format!("{} not supported here", form))
                    .with_color(Color::Red),
            );
        }
        TypeError::NoMatchingInstance { pred, span } => {
            builder.add_label(
                Label::new((filename, clamp(to_range(*span))))
                    .with_message(format!("requires `{}`", pred))
                    .with_color(Color::Red),
            );
            builder.set_help(format!(
                "`{}` is not an instance of `{}`",
                pred.ty, pred.class
            ));
        }
    }

    let mut buf = Vec::new();
    if builder
        .finish()
        .write((filename, Source::from(source)), &mut buf)
        .is_err()
    {
        return msg;
    }
    String::from_utf8(buf).unwrap_or(msg)
}
