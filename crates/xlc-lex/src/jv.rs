//! Lexer for the class-based managed language.

use xlc_util::Span;

use crate::scan::{scan_char, scan_identifier, scan_line_comment, scan_block_comment, scan_number, scan_string};
use crate::{Cursor, Token, TokenKind};

const KEYWORDS: &[&str] = &[
    "package", "import", "class", "public", "private", "protected", "static", "void", "int",
    "float", "double", "char", "boolean", "String", "if", "else", "for", "while", "return",
    "break", "switch", "case", "default", "new", "this", "true", "false", "null",
];

const OPERATORS: &[&str] = &["==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "++", "--", "->", "::", "+=", "-=", "*=", "/="];

pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source);
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

        if c.is_whitespace() {
            cursor.bump();
            continue;
        }
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
    fn recognizes_main_method_tokens() {
        let toks = lex("public static void main(String[] args) {}");
        assert!(toks.iter().any(|t| t.kind == TokenKind::Keyword && t.text == "static"));
        assert!(toks.iter().any(|t| t.kind == TokenKind::Identifier && t.text == "main"));
    }
}
