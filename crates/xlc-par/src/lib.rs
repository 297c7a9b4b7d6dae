//! xlc-par - recursive-descent parsers for the four source languages.
//!
//! Each parser consumes a `Vec<xlc_lex::Token>` and produces an
//! `xlc_ir::Program`. They share the expression grammar skeleton
//! (assignment, logical-or, logical-and, equality, relational,
//! additive, multiplicative, unary, postfix, primary) and the idiom
//! recognition in [`idiom`], but are otherwise independent functions —
//! no state survives a call, and a parser never aborts: on structural
//! trouble it advances one token and keeps going, returning whatever
//! partial `Program` it accumulated (see the error-tolerant parsing
//! design note).

mod cursor;
pub mod idiom;

pub mod c;
pub mod cpp;
pub mod jv;
pub mod py;

pub use cursor::TokenCursor;
