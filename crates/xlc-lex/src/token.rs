//! Token kinds shared by all four lexers.

use xlc_util::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `#include`, `#define`, … (C/CPP only).
    Preprocessor,
    Comment,
    MultilineComment,
    String,
    Char,
    Number,
    Keyword,
    Identifier,
    /// Multi-character operators only (`==`, `&&`, `->`, …).
    Operator,
    /// Single-character punctuation — includes single-character
    /// operators and structural symbols.
    Punctuation,
    /// Scripting-language only: marks a logical line break so the
    /// parser can pair it with the following line's indent column.
    Newline,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// For the indentation-based language: the enclosing line's
    /// leading-whitespace count. `0` for every other language.
    pub indent: u32,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token { kind, text: text.into(), indent: 0, span }
    }

    pub fn with_indent(mut self, indent: u32) -> Self {
        self.indent = indent;
        self
    }
}
