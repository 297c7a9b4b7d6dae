//! Parser for the C-family low-level language.
//!
//! Top-level forms begin with an optional `const`/`static` modifier,
//! then a type keyword, then an identifier; a following `(` opens a
//! function definition, otherwise it's a declaration. Blocks are
//! `{ … }`; statements terminate at `;`.

use xlc_ir::*;
use xlc_lex::{c as lexer, TokenKind};

use crate::cursor::{TokenCursor, MAX_LOOP_ITERATIONS};
use crate::idiom::{decompose_interpolated, decompose_printf_format, recognize_counted_loop};

const TYPE_KEYWORDS: &[&str] = &["int", "float", "double", "char", "void"];

pub fn parse(source: &str) -> Program {
    let tokens = lexer::lex(source);
    let mut cur = TokenCursor::new(tokens);
    let mut program = Program::new();
    let mut iterations = 0;

    while !cur.is_eof() {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        if cur.check_kind(TokenKind::Preprocessor) {
            let text = cur.advance().map(|t| t.text).unwrap_or_default();
            program.imports.push(text);
            continue;
        }
        if cur.check_kind(TokenKind::Comment) || cur.check_kind(TokenKind::MultilineComment) {
            let multiline = cur.check_kind(TokenKind::MultilineComment);
            let text = cur.advance().map(|t| t.text).unwrap_or_default();
            program.body.push(Stmt::Comment(Comment { text, multiline }));
            continue;
        }
        program.body.push(parse_top_level(&mut cur));
    }
    for d in cur.diagnostics().iter() {
        tracing::debug!(target: "xlc_par::c", "{d}");
    }
    program
}

fn parse_top_level(cur: &mut TokenCursor) -> Stmt {
    let mut is_const = false;
    while matches!(cur.peek_text(), Some("const") | Some("static")) {
        is_const |= cur.check("const");
        cur.advance();
    }

    let ty = parse_type(cur);
    let name = cur.advance().map(|t| t.text).unwrap_or_default();

    if cur.check("(") {
        let params = parse_params(cur);
        cur.eat(")");
        let body = parse_block(cur);
        return Stmt::FunctionDef(Function { name, params, return_type: ty, body, span: Span::DUMMY });
    }

    let init = if cur.eat("=") { Some(parse_expr(cur)) } else { None };
    cur.eat(";");
    Stmt::VarDecl(Variable { name, data_type: ty, init, is_const, span: Span::DUMMY })
}

fn parse_type(cur: &mut TokenCursor) -> DataType {
    let text = cur.advance().map(|t| t.text).unwrap_or_default();
    match text.as_str() {
        "int" => DataType::Int,
        "float" => DataType::Float,
        "double" => DataType::Double,
        "char" => DataType::Char,
        "void" => DataType::Void,
        _ => DataType::Auto,
    }
}

fn parse_params(cur: &mut TokenCursor) -> Vec<Variable> {
    cur.eat("(");
    let mut params = Vec::new();
    let mut iterations = 0;
    while !cur.is_eof() && !cur.check(")") {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        let ty = if TYPE_KEYWORDS.contains(&cur.peek_text().unwrap_or("")) { parse_type(cur) } else { DataType::Auto };
        let name = cur.advance().map(|t| t.text).unwrap_or_default();
        params.push(Variable { name, data_type: ty, init: None, is_const: false, span: Span::DUMMY });
        if !cur.eat(",") {
            break;
        }
    }
    params
}

fn parse_block(cur: &mut TokenCursor) -> Vec<Stmt> {
    cur.eat("{");
    let mut body = Vec::new();
    let mut iterations = 0;
    while !cur.is_eof() && !cur.check("}") {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        body.push(parse_statement(cur));
    }
    cur.eat("}");
    body
}

fn parse_statement(cur: &mut TokenCursor) -> Stmt {
    if cur.check_kind(TokenKind::Comment) || cur.check_kind(TokenKind::MultilineComment) {
        let multiline = cur.check_kind(TokenKind::MultilineComment);
        let text = cur.advance().map(|t| t.text).unwrap_or_default();
        return Stmt::Comment(Comment { text, multiline });
    }

    match cur.peek_text() {
        Some("if") => return parse_if(cur),
        Some("for") => return parse_for(cur),
        Some("while") => return parse_while(cur),
        Some("switch") => return parse_switch(cur),
        Some("return") => {
            cur.advance();
            let value = if cur.check(";") { None } else { Some(parse_expr(cur)) };
            cur.eat(";");
            return Stmt::Return(Return { value, span: Span::DUMMY });
        }
        Some("break") => {
            cur.advance();
            cur.eat(";");
            return Stmt::Break;
        }
        _ => {}
    }

    if TYPE_KEYWORDS.contains(&cur.peek_text().unwrap_or("")) || matches!(cur.peek_text(), Some("const")) {
        let is_const = cur.eat("const");
        let ty = parse_type(cur);
        let name = cur.advance().map(|t| t.text).unwrap_or_default();
        let init = if cur.eat("=") { Some(parse_expr(cur)) } else { None };
        cur.eat(";");
        return Stmt::VarDecl(Variable { name, data_type: ty, init, is_const, span: Span::DUMMY });
    }

    // printf/scanf idioms, plain assignment, or a bare expression.
    if cur.check("printf") {
        return parse_printf(cur);
    }
    if cur.check("scanf") {
        return parse_scanf(cur);
    }

    let start = cur.position();
    if let Some(name) = identifier_lookahead(cur) {
        if cur.check("=") {
            cur.advance();
            let value = parse_expr(cur);
            cur.eat(";");
            return Stmt::Assignment(Assignment { target: name, value, span: Span::DUMMY });
        }
    }
    cur.seek(start);
    let expr = parse_expr(cur);
    cur.eat(";");
    Stmt::Expr(expr)
}

/// Peeks a (possibly dotted) identifier without committing; returns the
/// name and leaves the cursor positioned just past it.
fn identifier_lookahead(cur: &mut TokenCursor) -> Option<String> {
    if cur.peek_kind() != Some(TokenKind::Identifier) {
        return None;
    }
    let mut name = cur.advance()?.text;
    while cur.check(".") {
        cur.advance();
        if let Some(tok) = cur.advance() {
            name.push('.');
            name.push_str(&tok.text);
        }
    }
    Some(name)
}

fn parse_printf(cur: &mut TokenCursor) -> Stmt {
    cur.advance(); // "printf"
    cur.eat("(");
    let mut args = Vec::new();
    let mut iterations = 0;
    while !cur.is_eof() && !cur.check(")") {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        args.push(parse_expr(cur));
        if !cur.eat(",") {
            break;
        }
    }
    cur.eat(")");
    cur.eat(";");

    if let Some(Expr::Literal(Literal { value: LiteralValue::Str(fmt), .. })) = args.first() {
        let (pieces, newline) = decompose_printf_format(fmt, &args[1..]);
        return Stmt::Print(Print { args: pieces, newline, span: Span::DUMMY });
    }
    Stmt::Print(Print { args, newline: false, span: Span::DUMMY })
}

fn parse_scanf(cur: &mut TokenCursor) -> Stmt {
    cur.advance(); // "scanf"
    cur.eat("(");
    let fmt = match parse_expr(cur) {
        Expr::Literal(Literal { value: LiteralValue::Str(s), .. }) => s,
        _ => String::new(),
    };
    cur.eat(",");
    cur.eat("&");
    let target = cur.advance().map(|t| t.text);
    cur.eat(")");
    cur.eat(";");

    let target_type = match fmt.trim_start_matches('%').chars().next() {
        Some('d') | Some('i') => Some(DataType::Int),
        Some('f') => Some(DataType::Float),
        _ if fmt.contains("lf") => Some(DataType::Float),
        _ => Some(DataType::String),
    };
    Stmt::Input(Input { prompt: None, target, target_type, span: Span::DUMMY })
}

fn parse_if(cur: &mut TokenCursor) -> Stmt {
    cur.advance(); // "if"
    cur.eat("(");
    let condition = parse_expr(cur);
    cur.eat(")");
    let then_body = parse_braced_or_single(cur);

    let (else_if, else_body) = if cur.eat("else") {
        if cur.check("if") {
            match parse_if(cur) {
                Stmt::If(nested) => (Some(Box::new(nested)), None),
                _ => (None, None),
            }
        } else {
            (None, Some(parse_braced_or_single(cur)))
        }
    } else {
        (None, None)
    };

    Stmt::If(If { condition, then_body, else_body, else_if, span: Span::DUMMY })
}

fn parse_braced_or_single(cur: &mut TokenCursor) -> Vec<Stmt> {
    if cur.check("{") {
        parse_block(cur)
    } else {
        vec![parse_statement(cur)]
    }
}

fn parse_for(cur: &mut TokenCursor) -> Stmt {
    cur.advance(); // "for"
    cur.eat("(");
    let init = if cur.check(";") { None } else { Some(Box::new(parse_for_init(cur))) };
    cur.eat(";");
    let condition = if cur.check(";") { None } else { Some(parse_expr(cur)) };
    cur.eat(";");
    let update = if cur.check(")") { None } else { Some(Box::new(parse_for_update(cur))) };
    cur.eat(")");
    let body = parse_braced_or_single(cur);

    let range = recognize_counted_loop(init.as_deref(), condition.as_ref(), update.as_deref());
    Stmt::For(For { init, condition, update, range, body, span: Span::DUMMY })
}

fn parse_for_init(cur: &mut TokenCursor) -> Stmt {
    if TYPE_KEYWORDS.contains(&cur.peek_text().unwrap_or("")) {
        let ty = parse_type(cur);
        let name = cur.advance().map(|t| t.text).unwrap_or_default();
        let init = if cur.eat("=") { Some(parse_expr(cur)) } else { None };
        return Stmt::VarDecl(Variable { name, data_type: ty, init, is_const: false, span: Span::DUMMY });
    }
    let name = cur.advance().map(|t| t.text).unwrap_or_default();
    cur.eat("=");
    let value = parse_expr(cur);
    Stmt::Assignment(Assignment { target: name, value, span: Span::DUMMY })
}

fn parse_for_update(cur: &mut TokenCursor) -> Stmt {
    let name = cur.advance().map(|t| t.text).unwrap_or_default();
    if cur.eat("++") {
        return Stmt::Expr(Expr::UnaryOp(UnaryOp {
            op: UnOp::PostInc,
            operand: Box::new(Expr::Identifier(name)),
            span: Span::DUMMY,
        }));
    }
    if cur.eat("+=") {
        let value = parse_expr(cur);
        return Stmt::Expr(Expr::BinaryOp(BinaryOp {
            op: BinOp::AddAssign,
            left: Box::new(Expr::Identifier(name)),
            right: Box::new(value),
            span: Span::DUMMY,
        }));
    }
    Stmt::Expr(Expr::Identifier(name))
}

fn parse_while(cur: &mut TokenCursor) -> Stmt {
    cur.advance(); // "while"
    cur.eat("(");
    let condition = parse_expr(cur);
    cur.eat(")");
    let body = parse_braced_or_single(cur);
    Stmt::While(While { condition, body, span: Span::DUMMY })
}

fn parse_switch(cur: &mut TokenCursor) -> Stmt {
    cur.advance(); // "switch"
    cur.eat("(");
    let discriminant = parse_expr(cur);
    cur.eat(")");
    cur.eat("{");
    let mut cases = Vec::new();
    let mut default = None;
    let mut iterations = 0;
    while !cur.is_eof() && !cur.check("}") {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        if cur.eat("case") {
            let value = parse_expr(cur);
            cur.eat(":");
            let body = parse_case_body(cur);
            cases.push(SwitchCase { value, body });
        } else if cur.eat("default") {
            cur.eat(":");
            default = Some(parse_case_body(cur));
        } else {
            cur.recover();
        }
    }
    cur.eat("}");
    Stmt::Switch(Switch { discriminant, cases, default, span: Span::DUMMY })
}

fn parse_case_body(cur: &mut TokenCursor) -> Vec<Stmt> {
    let mut body = Vec::new();
    let mut iterations = 0;
    while !cur.is_eof() && !matches!(cur.peek_text(), Some("case") | Some("default") | Some("}")) {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        body.push(parse_statement(cur));
    }
    body
}

pub fn parse_expr(cur: &mut TokenCursor) -> Expr {
    parse_or(cur)
}

fn parse_or(cur: &mut TokenCursor) -> Expr {
    let mut left = parse_and(cur);
    let mut iterations = 0;
    while cur.check("||") {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        cur.advance();
        left = bin(BinOp::Or, left, parse_and(cur));
    }
    left
}

fn parse_and(cur: &mut TokenCursor) -> Expr {
    let mut left = parse_equality(cur);
    let mut iterations = 0;
    while cur.check("&&") {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        cur.advance();
        left = bin(BinOp::And, left, parse_equality(cur));
    }
    left
}

fn parse_equality(cur: &mut TokenCursor) -> Expr {
    let mut left = parse_relational(cur);
    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        let op = match cur.peek_text() {
            Some("==") => BinOp::Eq,
            Some("!=") => BinOp::NotEq,
            _ => break,
        };
        cur.advance();
        left = bin(op, left, parse_relational(cur));
    }
    left
}

fn parse_relational(cur: &mut TokenCursor) -> Expr {
    let mut left = parse_additive(cur);
    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        let op = match cur.peek_text() {
            Some("<") => BinOp::Lt,
            Some("<=") => BinOp::LtEq,
            Some(">") => BinOp::Gt,
            Some(">=") => BinOp::GtEq,
            _ => break,
        };
        cur.advance();
        left = bin(op, left, parse_additive(cur));
    }
    left
}

fn parse_additive(cur: &mut TokenCursor) -> Expr {
    let mut left = parse_multiplicative(cur);
    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        let op = match cur.peek_text() {
            Some("+") => BinOp::Add,
            Some("-") => BinOp::Sub,
            _ => break,
        };
        cur.advance();
        left = bin(op, left, parse_multiplicative(cur));
    }
    left
}

fn parse_multiplicative(cur: &mut TokenCursor) -> Expr {
    let mut left = parse_unary(cur);
    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        let op = match cur.peek_text() {
            Some("*") => BinOp::Mul,
            Some("/") => BinOp::Div,
            Some("%") => BinOp::Mod,
            _ => break,
        };
        cur.advance();
        left = bin(op, left, parse_unary(cur));
    }
    left
}

fn parse_unary(cur: &mut TokenCursor) -> Expr {
    if cur.eat("!") {
        return Expr::UnaryOp(UnaryOp { op: UnOp::Not, operand: Box::new(parse_unary(cur)), span: Span::DUMMY });
    }
    if cur.eat("-") {
        return Expr::UnaryOp(UnaryOp { op: UnOp::Neg, operand: Box::new(parse_unary(cur)), span: Span::DUMMY });
    }
    if cur.eat("++") {
        return Expr::UnaryOp(UnaryOp { op: UnOp::PreInc, operand: Box::new(parse_unary(cur)), span: Span::DUMMY });
    }
    if cur.eat("--") {
        return Expr::UnaryOp(UnaryOp { op: UnOp::PreDec, operand: Box::new(parse_unary(cur)), span: Span::DUMMY });
    }
    parse_postfix(cur)
}

fn parse_postfix(cur: &mut TokenCursor) -> Expr {
    let mut expr = parse_primary(cur);
    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        if cur.eat("++") {
            expr = Expr::UnaryOp(UnaryOp { op: UnOp::PostInc, operand: Box::new(expr), span: Span::DUMMY });
            continue;
        }
        if cur.eat("--") {
            expr = Expr::UnaryOp(UnaryOp { op: UnOp::PostDec, operand: Box::new(expr), span: Span::DUMMY });
            continue;
        }
        if cur.eat(".") {
            if let (Expr::Identifier(name), Some(tok)) = (&mut expr, cur.advance()) {
                name.push('.');
                name.push_str(&tok.text);
                continue;
            }
        }
        break;
    }
    expr
}

fn parse_primary(cur: &mut TokenCursor) -> Expr {
    if cur.eat("(") {
        let inner = parse_expr(cur);
        cur.eat(")");
        return inner;
    }
    let tok = match cur.advance() {
        Some(t) => t,
        None => return Expr::Literal(Literal { value: LiteralValue::Int(0), data_type: DataType::Int }),
    };
    match tok.kind {
        TokenKind::Number if tok.text.contains('.') => {
            Expr::Literal(Literal { value: LiteralValue::Float(tok.text.parse().unwrap_or(0.0)), data_type: DataType::Float })
        }
        TokenKind::Number => {
            Expr::Literal(Literal { value: LiteralValue::Int(tok.text.parse().unwrap_or(0)), data_type: DataType::Int })
        }
        TokenKind::String if tok.text.contains('{') => {
            Expr::Literal(Literal { value: LiteralValue::Str(tok.text), data_type: DataType::String })
        }
        TokenKind::String => Expr::Literal(Literal { value: LiteralValue::Str(tok.text), data_type: DataType::String }),
        TokenKind::Char => Expr::Literal(Literal { value: LiteralValue::Str(tok.text), data_type: DataType::Char }),
        TokenKind::Identifier if cur.check("(") => {
            cur.advance();
            let mut args = Vec::new();
            let mut iterations = 0;
            while !cur.is_eof() && !cur.check(")") {
                iterations += 1;
                if iterations > MAX_LOOP_ITERATIONS {
                    break;
                }
                args.push(parse_expr(cur));
                if !cur.eat(",") {
                    break;
                }
            }
            cur.eat(")");
            Expr::Call(Call { callee: tok.text, args, is_method: false, receiver: None, span: Span::DUMMY })
        }
        _ => Expr::Identifier(tok.text),
    }
}

fn bin(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp(BinaryOp { op, left: Box::new(left), right: Box::new(right), span: Span::DUMMY })
}

/// Used at emission time when a Print node's literal segments need to
/// be re-spliced back through `{name}` placeholders (e.g. a source
/// literal already containing them, unusual in C but kept for parity
/// with the other emitters' handling of interpolated-looking strings).
#[allow(dead_code)]
fn reinterpolate(literal: &str) -> Vec<Expr> {
    decompose_interpolated(literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_counted_loop_into_range() {
        let program = parse("void main() { for (int i = 0; i < 5; i++) { printf(\"%d\\n\", i); } }");
        let func = match &program.body[0] {
            Stmt::FunctionDef(f) => f,
            other => panic!("expected function, got {other:?}"),
        };
        match &func.body[0] {
            Stmt::For(f) => {
                let range = f.range.as_ref().unwrap();
                assert_eq!(range.iterator, "i");
            }
            other => panic!("expected For, got {other:?}"),
        }
    }

    #[test]
    fn decomposes_printf_format() {
        let program = parse("void main() { printf(\"x=%d y=%s\\n\", a, b); }");
        let func = match &program.body[0] {
            Stmt::FunctionDef(f) => f,
            other => panic!("expected function, got {other:?}"),
        };
        match &func.body[0] {
            Stmt::Print(p) => {
                assert!(p.newline);
                assert_eq!(p.args.len(), 4);
            }
            other => panic!("expected Print, got {other:?}"),
        }
    }

    #[test]
    fn captures_preprocessor_directive_as_import() {
        let program = parse("#include <stdio.h>\nint main() { return 0; }");
        assert_eq!(program.imports, vec!["#include <stdio.h>"]);
    }
}
