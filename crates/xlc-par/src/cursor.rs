//! A linear, single-pass view over a token buffer.
//!
//! Created by a parser, consumed linearly, discarded on return — never
//! shared between calls.

use xlc_lex::{Token, TokenKind};
use xlc_util::{Diagnostic, DiagnosticBag};

pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: DiagnosticBag,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenCursor { tokens, pos: 0, diagnostics: DiagnosticBag::new() }
    }

    /// The anomalies recorded by `recover()` over this cursor's
    /// lifetime — one call's worth, discarded with the cursor itself
    /// (see the module doc: never shared between calls).
    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    pub fn peek_text(&self) -> Option<&str> {
        self.peek().map(|t| t.text.as_str())
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Current position's line-indent, for the indentation-based
    /// parser. `0` for every other language (their tokens never set it).
    pub fn peek_indent(&self) -> u32 {
        self.peek().map(|t| t.indent).unwrap_or(0)
    }

    pub fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if !self.is_eof() {
            self.pos += 1;
        }
        tok
    }

    /// Consume a token whose text matches `text`, if present.
    pub fn eat(&mut self, text: &str) -> bool {
        if self.peek_text() == Some(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn check(&self, text: &str) -> bool {
        self.peek_text() == Some(text)
    }

    pub fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Tolerant recovery: advance one token so an open-ended retry loop
    /// always makes progress. Logs what was skipped into the cursor's
    /// diagnostic bag rather than aborting (spec.md §7, "parse
    /// structure error").
    pub fn recover(&mut self) {
        if let Some(tok) = self.peek() {
            self.diagnostics.push(Diagnostic::warning(
                format!("skipped unexpected token {:?}", tok.text),
                tok.span,
            ));
        }
        self.advance();
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind (or fast-forward) to a previously observed position —
    /// used when a lookahead decides a line is not the statement shape
    /// it first appeared to be.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Every open-ended parser loop is bounded by this many iterations as a
/// defense against pathological or malformed input (see the
/// error-tolerant-parsing design note); it is far above anything a
/// program in the common subset would need.
pub const MAX_LOOP_ITERATIONS: usize = 100_000;

#[cfg(test)]
mod tests {
    use super::*;
    use xlc_lex::{Token, TokenKind};
    use xlc_util::Span;

    #[test]
    fn recover_advances_and_records_a_diagnostic() {
        let tokens = vec![
            Token::new(TokenKind::Punctuation, "@", Span::new(0, 1)),
            Token::new(TokenKind::Identifier, "x", Span::new(1, 2)),
        ];
        let mut cur = TokenCursor::new(tokens);
        assert!(cur.diagnostics().is_empty());
        cur.recover();
        assert_eq!(cur.position(), 1);
        assert_eq!(cur.diagnostics().iter().count(), 1);
        assert!(cur.diagnostics().iter().next().unwrap().message.contains('@'));
    }
}
