//! Scanning routines shared by all four lexers: numbers, strings,
//! identifiers, and comments. Each per-language lexer supplies its own
//! keyword set and operator table and calls into these for the pieces
//! that don't vary across languages.

use crate::Cursor;

/// `[A-Za-z_][A-Za-z_0-9]*`. The caller decides keyword-vs-identifier.
pub fn scan_identifier(cursor: &mut Cursor<'_>) -> String {
    let start = cursor.position();
    while let Some(c) = cursor.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            cursor.bump();
        } else {
            break;
        }
    }
    cursor.slice(start, cursor.position()).to_string()
}

/// Integer or float literal, accepting a single decimal point and a
/// `e`/`E` exponent. Hex/octal/binary prefixes are not part of the
/// common subset and are left to fall through as plain digit runs.
pub fn scan_number(cursor: &mut Cursor<'_>) -> String {
    let start = cursor.position();
    while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
        cursor.bump();
    }
    if cursor.peek() == Some('.') && matches!(cursor.peek_at(1), Some(c) if c.is_ascii_digit()) {
        cursor.bump();
        while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
            cursor.bump();
        }
    }
    if matches!(cursor.peek(), Some('e') | Some('E')) {
        let save = cursor.position();
        cursor.bump();
        if matches!(cursor.peek(), Some('+') | Some('-')) {
            cursor.bump();
        }
        if matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
            while matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
                cursor.bump();
            }
        } else {
            // Not actually an exponent; "1e" with no digits after.
            return cursor.slice(start, save).to_string();
        }
    }
    cursor.slice(start, cursor.position()).to_string()
}

/// A `"`-delimited string literal. Accepts `\`-escapes; returns the
/// content with the enclosing quotes stripped. Tolerant of an
/// unterminated string: it simply runs to end-of-input.
pub fn scan_string(cursor: &mut Cursor<'_>, quote: char) -> String {
    cursor.bump(); // opening quote
    let start = cursor.position();
    loop {
        match cursor.peek() {
            None => break,
            Some(c) if c == quote => break,
            Some('\\') => {
                cursor.bump();
                cursor.bump();
            }
            Some(_) => {
                cursor.bump();
            }
        }
    }
    let content = cursor.slice(start, cursor.position()).to_string();
    cursor.eat(quote);
    content
}

/// A single-quoted character literal, e.g. C/CPP/JV `'a'`.
pub fn scan_char(cursor: &mut Cursor<'_>) -> String {
    scan_string(cursor, '\'')
}

/// `// ...` to end of line. Returns the text excluding the line break.
pub fn scan_line_comment(cursor: &mut Cursor<'_>) -> String {
    let start = cursor.position();
    while let Some(c) = cursor.peek() {
        if c == '\n' {
            break;
        }
        cursor.bump();
    }
    cursor.slice(start, cursor.position()).to_string()
}

/// `/* ... */`, tolerant of an unterminated comment (runs to EOF).
pub fn scan_block_comment(cursor: &mut Cursor<'_>) -> String {
    cursor.bump();
    cursor.bump(); // "/*"
    let start = cursor.position();
    loop {
        match (cursor.peek(), cursor.peek_at(1)) {
            (None, _) => break,
            (Some('*'), Some('/')) => break,
            _ => {
                cursor.bump();
            }
        }
    }
    let content = cursor.slice(start, cursor.position()).to_string();
    cursor.bump();
    cursor.bump();
    content
}
