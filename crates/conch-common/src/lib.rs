//! Shared vocabulary for the Conch front end: spans, tokens and the
//! expression tree handed to the type checker.

pub mod ast;
pub mod span;
pub mod token;
