//! Character cursor for traversing source code.
//!
//! Tracks byte position only — the IR's spans are used for tolerant
//! diagnostics, not for precise line/column reporting, so there is no
//! line/column bookkeeping here the way a native-codegen compiler would
//! need for debug info.

pub struct Cursor<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current: Option<(usize, char)>,
    len: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.char_indices();
        let current = chars.next();
        Cursor { source, chars, current, len: source.len() }
    }

    pub fn peek(&self) -> Option<char> {
        self.current.map(|(_, c)| c)
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.source[self.position()..].chars().nth(offset)
    }

    pub fn position(&self) -> usize {
        self.current.map(|(i, _)| i).unwrap_or(self.len)
    }

    pub fn is_eof(&self) -> bool {
        self.current.is_none()
    }

    pub fn bump(&mut self) -> Option<char> {
        let result = self.current.map(|(_, c)| c);
        self.current = self.chars.next();
        result
    }

    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }
}
