//! Tolerant diagnostics.
//!
//! Lexers never abort (unrecognized bytes become single-character
//! punctuation) and parsers recover from structure errors by advancing
//! one token and retrying. Both still want to tell somebody what they
//! swallowed; they push a [`Diagnostic`] onto a [`DiagnosticBag`] instead
//! of returning early.

use crate::Span;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self { level: Level::Error, message: message.into(), span }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self { level: Level::Warning, message: message.into(), span }
    }

    pub fn note(message: impl Into<String>, span: Span) -> Self {
        Self { level: Level::Note, message: message.into(), span }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Accumulates diagnostics over the lifetime of a single lex/parse call.
/// Cleared at the start of every call by the owning lexer or parser —
/// it carries no state across invocations (see the single-threaded,
/// stateless-between-calls contract in the concurrency design).
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn has_errors_iff_some_diagnostic_is_error_level(levels: Vec<u8>) -> bool {
        let mut bag = DiagnosticBag::new();
        let mut any_error = false;
        for l in &levels {
            let level = match l % 3 {
                0 => Level::Error,
                1 => Level::Warning,
                _ => Level::Note,
            };
            any_error |= level == Level::Error;
            bag.push(Diagnostic { level, message: String::new(), span: Span::DUMMY });
        }
        bag.has_errors() == any_error
    }

    #[quickcheck]
    fn clear_empties_the_bag(levels: Vec<u8>) -> bool {
        let mut bag = DiagnosticBag::new();
        for l in &levels {
            bag.push(Diagnostic::note(String::new(), Span::DUMMY));
            let _ = l;
        }
        bag.clear();
        bag.is_empty() && !bag.has_errors()
    }
}
