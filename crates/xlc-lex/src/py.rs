//! Lexer for the indentation-based scripting language.
//!
//! Every token is tagged with its enclosing line's leading-whitespace
//! count so the parser can derive block structure without a separate
//! indent/dedent token pass. A `Newline` token marks each logical line
//! break (blank lines and comment-only lines don't emit one).

use xlc_util::Span;

use crate::scan::{scan_identifier, scan_line_comment, scan_number, scan_string};
use crate::{Cursor, Token, TokenKind};

const KEYWORDS: &[&str] = &[
    "def", "class", "if", "elif", "else", "for", "while", "return", "break", "import", "from",
    "as", "True", "False", "None", "and", "or", "not", "in", "pass", "self",
];

pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source);
    let mut indent = measure_indent(source, 0);
    let mut at_line_start = true;
    let mut safety = 0usize;
    let limit = source.len().saturating_mul(4) + 1024;

    while !cursor.is_eof() {
        safety += 1;
        if safety > limit {
            break;
        }

        if at_line_start {
            indent = consume_indent(&mut cursor);
            at_line_start = false;
            if matches!(cursor.peek(), None | Some('\n')) {
                // Blank line: no tokens, no Newline marker needed.
                if cursor.peek() == Some('\n') {
                    cursor.bump();
                    at_line_start = true;
                }
                continue;
            }
        }

        let start = cursor.position();
        let c = match cursor.peek() {
            Some(c) => c,
            None => break,
        };

        if c == '\n' {
            cursor.bump();
            tokens.push(Token::new(TokenKind::Newline, "\n", Span::new(start as u32, cursor.position() as u32)));
            at_line_start = true;
            continue;
        }
        if c.is_whitespace() {
            cursor.bump();
            continue;
        }
        if c == '#' {
            let text = scan_line_comment(&mut cursor);
            tokens.push(
                Token::new(TokenKind::Comment, text, span(start, &cursor)).with_indent(indent),
            );
            continue;
        }
        if c == 'f' && matches!(cursor.peek_at(1), Some('"') | Some('\'')) {
            cursor.bump();
            let quote = cursor.peek().unwrap();
            let text = scan_string(&mut cursor, quote);
            tokens.push(
                Token::new(TokenKind::String, format!("f{text}"), span(start, &cursor))
                    .with_indent(indent),
            );
            continue;
        }
        if c == '"' || c == '\'' {
            let text = scan_string(&mut cursor, c);
            tokens.push(
                Token::new(TokenKind::String, text, span(start, &cursor)).with_indent(indent),
            );
            continue;
        }
        if c.is_ascii_digit() {
            let text = scan_number(&mut cursor);
            tokens.push(
                Token::new(TokenKind::Number, text, span(start, &cursor)).with_indent(indent),
            );
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' {
            let text = scan_identifier(&mut cursor);
            let kind = if KEYWORDS.contains(&text.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token::new(kind, text, span(start, &cursor)).with_indent(indent));
            continue;
        }
        if let Some(op) = match_operator(&mut cursor) {
            tokens.push(
                Token::new(TokenKind::Operator, op, span(start, &cursor)).with_indent(indent),
            );
            continue;
        }
        // Unrecognized byte or single-char punctuation: never abort.
        cursor.bump();
        let text = cursor.slice(start, cursor.position());
        tokens.push(Token::new(TokenKind::Punctuation, text, span(start, &cursor)).with_indent(indent));
    }

    tokens
}

fn span(start: usize, cursor: &Cursor<'_>) -> Span {
    Span::new(start as u32, cursor.position() as u32)
}

fn measure_indent(source: &str, _from: usize) -> u32 {
    source.chars().take_while(|c| *c == ' ' || *c == '\t').count() as u32
}

fn consume_indent(cursor: &mut Cursor<'_>) -> u32 {
    let mut count = 0;
    while matches!(cursor.peek(), Some(' ') | Some('\t')) {
        cursor.bump();
        count += 1;
    }
    count
}

const OPERATORS: &[&str] = &["==", "!=", "<=", ">=", "**", "//"];

fn match_operator(cursor: &mut Cursor<'_>) -> Option<String> {
    for op in OPERATORS {
        if matches_at(cursor, op) {
            for _ in 0..op.len() {
                cursor.bump();
            }
            return Some((*op).to_string());
        }
    }
    None
}

fn matches_at(cursor: &Cursor<'_>, op: &str) -> bool {
    op.chars().enumerate().all(|(i, c)| cursor.peek_at(i) == Some(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_indent_per_line() {
        let src = "if x:\n    print(x)\n";
        let toks = lex(src);
        let print_tok = toks.iter().find(|t| t.text == "print").unwrap();
        assert_eq!(print_tok.indent, 4);
    }

    #[test]
    fn recognizes_keywords_vs_identifiers() {
        let toks = lex("def foo():\n    pass\n");
        assert_eq!(toks[0].kind, TokenKind::Keyword);
        assert_eq!(toks[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn never_aborts_on_stray_byte() {
        let toks = lex("x = @\n");
        assert!(toks.iter().any(|t| t.kind == TokenKind::Punctuation && t.text == "@"));
    }
}
