//! xlc-lex - lexical analysis for the four source languages.
//!
//! One lexer per source language (`py`, `c`, `cpp`, `jv`), each a pure
//! function `&str -> Vec<Token>` sharing a [`Cursor`] and a handful of
//! scanning routines (`scan`) but otherwise independent: each language
//! brings its own keyword set, operator table, and structural quirks
//! (the scripting language's leading-whitespace tracking, C/CPP's
//! preprocessor lines).
//!
//! Lexers never abort. An unrecognized byte becomes a single-character
//! [`TokenKind::Punctuation`] token rather than an error.

mod cursor;
mod scan;
mod token;

pub mod c;
pub mod cpp;
pub mod jv;
pub mod py;

pub use cursor::Cursor;
pub use token::{Token, TokenKind};
