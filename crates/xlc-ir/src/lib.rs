//! xlc-ir - the shared intermediate representation.
//!
//! Every front-end (`xlc-lex` + `xlc-par`, one pair per source language)
//! normalizes its input into this tree; every back-end (`xlc-emit`, one
//! emitter per target language) walks it to produce surface syntax. The
//! IR is intentionally narrow: a small closed set of node kinds covering
//! the common imperative subset shared by the four source languages
//! (see the glossary entry for "common subset").
//!
//! The tree is built bottom-up by a parser and handed to emitters as
//! immutable input — no node is shared between trees, and nothing here
//! mutates once constructed. Emitters carry their own scratch state
//! (indent counters, flag records) outside the tree.

mod node;
mod predicates;

pub use node::*;
pub use predicates::{has_non_trivial_class, is_entry_point_shell, is_trivial_class};
pub use xlc_util::Span;
