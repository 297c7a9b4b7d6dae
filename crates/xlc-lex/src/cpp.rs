//! Lexer for the C++-family object-capable language. Shares its
//! structure with the C lexer but extends the keyword set with the
//! class-capable vocabulary and `bool`/`auto`/`string`.

use xlc_util::Span;

use crate::scan::{scan_char, scan_identifier, scan_line_comment, scan_block_comment, scan_number, scan_string};
use crate::{Cursor, Token, TokenKind};

const KEYWORDS: &[&str] = &[
    "int", "float", "double", "char", "void", "const", "static", "bool", "auto", "string", "if",
    "else", "for", "while", "return", "break", "switch", "case", "default", "class", "public",
    "private", "protected", "new", "this", "true", "false", "namespace",
];

const OPERATORS: &[&str] = &["==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "++", "--", "->", "::", "+=", "-=", "*=", "/="];

pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source);
    let mut at_line_start = true;
    let mut safety = 0usize;
    let limit = source.len().saturating_mul(4) + 1024;

    while !cursor.is_eof() {
        safety += 1;
        if safety > limit {
            break;
        }

        let start = cursor.position();
        let c = match cursor.peek() {
            Some(c) => c,
            None => break,
        };

        if c == '\n' {
            cursor.bump();
            at_line_start = true;
            continue;
        }
        if c.is_whitespace() {
            cursor.bump();
            continue;
        }
        if at_line_start && c == '#' {
            let text = scan_line_comment(&mut cursor);
            tokens.push(Token::new(TokenKind::Preprocessor, format!("#{text}"), span(start, &cursor)));
            at_line_start = false;
            continue;
        }
        at_line_start = false;

        if c == '/' && cursor.peek_at(1) == Some('/') {
            let text = scan_line_comment(&mut cursor);
            tokens.push(Token::new(TokenKind::Comment, text, span(start, &cursor)));
            continue;
        }
        if c == '/' && cursor.peek_at(1) == Some('*') {
            let text = scan_block_comment(&mut cursor);
            tokens.push(Token::new(TokenKind::MultilineComment, text, span(start, &cursor)));
            continue;
        }
        if c == '"' {
            let text = scan_string(&mut cursor, '"');
            tokens.push(Token::new(TokenKind::String, text, span(start, &cursor)));
            continue;
        }
        if c == '\'' {
            let text = scan_char(&mut cursor);
            tokens.push(Token::new(TokenKind::Char, text, span(start, &cursor)));
            continue;
        }
        if c.is_ascii_digit() {
            let text = scan_number(&mut cursor);
            tokens.push(Token::new(TokenKind::Number, text, span(start, &cursor)));
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' {
            let text = scan_identifier(&mut cursor);
            let kind = if KEYWORDS.contains(&text.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token::new(kind, text, span(start, &cursor)));
            continue;
        }
        if let Some(op) = match_operator(&mut cursor) {
            tokens.push(Token::new(TokenKind::Operator, op, span(start, &cursor)));
            continue;
        }
        cursor.bump();
        let text = cursor.slice(start, cursor.position());
        tokens.push(Token::new(TokenKind::Punctuation, text, span(start, &cursor)));
    }

    tokens
}

fn span(start: usize, cursor: &Cursor<'_>) -> Span {
    Span::new(start as u32, cursor.position() as u32)
}

fn match_operator(cursor: &mut Cursor<'_>) -> Option<String> {
    for op in OPERATORS {
        if op.chars().enumerate().all(|(i, c)| cursor.peek_at(i) == Some(c)) {
            for _ in 0..op.len() {
                cursor.bump();
            }
            return Some((*op).to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_qualified_name_tokens() {
        let toks = lex("std::string s;");
        assert_eq!(toks[0].text, "std");
        assert_eq!(toks[1].text, "::");
        assert_eq!(toks[2].kind, TokenKind::Keyword);
    }

    #[test]
    fn recognizes_stream_operators() {
        let toks = lex("cout << x << endl;");
        assert!(toks.iter().any(|t| t.kind == TokenKind::Operator && t.text == "<<"));
    }
}
