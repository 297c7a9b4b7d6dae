//! Parser for the class-based managed language. Every program is a
//! single top-level `class`; `static void main` becomes
//! `Class.main_method`, other `static` methods become
//! `Class.static_methods`, and instance methods become `Class.methods`.
//! `System.out.println` idiom recognition and `Scanner`-style reads
//! feed the shared [`crate::idiom`] helpers.

use xlc_ir::*;
use xlc_lex::{jv as lexer, TokenKind};

use crate::cursor::{TokenCursor, MAX_LOOP_ITERATIONS};
use crate::idiom::decompose_interpolated;

const TYPE_KEYWORDS: &[&str] = &["int", "float", "double", "char", "boolean", "String", "void"];
const MODIFIERS: &[&str] = &["public", "private", "protected", "static", "final"];

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
        if cur.check("package") || cur.check("import") {
            let mut text = String::new();
            while !cur.is_eof() && !cur.check(";") {
                let tok = cur.advance().unwrap();
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&tok.text);
            }
            cur.eat(";");
            program.imports.push(text);
            continue;
        }
        if cur.check_kind(TokenKind::Comment) || cur.check_kind(TokenKind::MultilineComment) {
            let multiline = cur.check_kind(TokenKind::MultilineComment);
            let text = cur.advance().map(|t| t.text).unwrap_or_default();
            program.body.push(Stmt::Comment(Comment { text, multiline }));
            continue;
        }
        if contains_class_keyword_ahead(&cur) {
            program.body.push(parse_class(&mut cur));
            continue;
        }
        cur.recover();
    }
    for d in cur.diagnostics().iter() {
        tracing::debug!(target: "xlc_par::jv", "{d}");
    }
    program
}

fn contains_class_keyword_ahead(cur: &TokenCursor) -> bool {
    let mut i = 0;
    while let Some(tok) = cur.peek_at(i) {
        if tok.text == "class" {
            return true;
        }
        if !MODIFIERS.contains(&tok.text.as_str()) {
            return false;
        }
        i += 1;
    }
    false
}

fn parse_class(cur: &mut TokenCursor) -> Stmt {
    skip_modifiers(cur);
    cur.eat("class");
    let name = cur.advance().map(|t| t.text).unwrap_or_default();
    cur.eat("{");

    let mut members = Vec::new();
    let mut methods = Vec::new();
    let mut constructor = None;
    let mut main_method = None;
    let mut static_methods = Vec::new();
    let mut iterations = 0;

    while !cur.is_eof() && !cur.check("}") {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        if cur.check_kind(TokenKind::Comment) || cur.check_kind(TokenKind::MultilineComment) {
            cur.advance();
            continue;
        }

        let start = cur.position();
        let is_static = peek_static(cur);
        skip_modifiers(cur);

        // Constructor: `Name(...) { ... }`.
        if cur.peek_text() == Some(name.as_str()) && cur.peek_at(1).map(|t| t.text.as_str()) == Some("(") {
            cur.advance();
            let params = parse_params(cur);
            cur.eat(")");
            let body = parse_block(cur);
            constructor = Some(Function { name: CONSTRUCTOR_NAME.to_string(), params, return_type: DataType::Void, body, span: Span::DUMMY });
            continue;
        }

        let ty = parse_type(cur);
        let member_name = cur.advance().map(|t| t.text).unwrap_or_default();

        if cur.check("(") {
            let params = parse_params(cur);
            cur.eat(")");
            let body = parse_block(cur);
            let func = Function { name: member_name.clone(), params, return_type: ty, body, span: Span::DUMMY };
            if member_name == "main" && is_static {
                main_method = Some(func);
            } else if is_static {
                static_methods.push(func);
            } else {
                methods.push(func);
            }
            continue;
        }

        let init = if cur.eat("=") { Some(parse_expr(cur)) } else { None };
        cur.eat(";");
        if member_name.is_empty() {
            cur.seek(start);
            cur.recover();
            continue;
        }
        members.push(Variable { name: member_name, data_type: ty, init, is_const: false, span: Span::DUMMY });
    }
    cur.eat("}");

    Stmt::ClassDef(Class { name, members, methods, constructor, main_method, static_methods, span: Span::DUMMY })
}

fn peek_static(cur: &TokenCursor) -> bool {
    let mut i = 0;
    while let Some(tok) = cur.peek_at(i) {
        if tok.text == "static" {
            return true;
        }
        if !MODIFIERS.contains(&tok.text.as_str()) {
            return false;
        }
        i += 1;
    }
    false
}

fn skip_modifiers(cur: &mut TokenCursor) {
    while MODIFIERS.contains(&cur.peek_text().unwrap_or("")) {
        cur.advance();
    }
}

fn parse_type(cur: &mut TokenCursor) -> DataType {
    let text = cur.advance().map(|t| t.text).unwrap_or_default();
    let base = match text.as_str() {
        "int" => DataType::Int,
        "float" => DataType::Float,
        "double" => DataType::Double,
        "char" => DataType::Char,
        "boolean" => DataType::Bool,
        "String" => DataType::String,
        "void" => DataType::Void,
        _ => DataType::Auto,
    };
    // `String[] args`-style array suffix on the declared type.
    if cur.check("[") {
        cur.advance();
        cur.eat("]");
    }
    base
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
        Some("System") => {
            if let Some(stmt) = try_parse_println(cur) {
                return stmt;
            }
        }
        _ => {}
    }

    if TYPE_KEYWORDS.contains(&cur.peek_text().unwrap_or(""))
        && cur.peek_at(1).map(|t| t.kind) == Some(TokenKind::Identifier)
    {
        let ty = parse_type(cur);
        let name = cur.advance().map(|t| t.text).unwrap_or_default();
        let init = if cur.eat("=") { Some(parse_expr(cur)) } else { None };
        cur.eat(";");
        return Stmt::VarDecl(Variable { name, data_type: ty, init, is_const: false, span: Span::DUMMY });
    }

    // `Scanner`-backed reads: `int x = scanner.nextInt();`.
    if cur.peek_kind() == Some(TokenKind::Identifier)
        && cur.peek_at(1).map(|t| t.kind) == Some(TokenKind::Identifier)
    {
        let _ty_name = cur.advance().map(|t| t.text).unwrap_or_default();
        let name = cur.advance().map(|t| t.text).unwrap_or_default();
        let init = if cur.eat("=") { Some(parse_expr(cur)) } else { None };
        cur.eat(";");
        if let Some(Expr::Input(input)) = &init {
            let mut resolved = input.clone();
            resolved.target = Some(name);
            return Stmt::Input(resolved);
        }
        return Stmt::VarDecl(Variable { name, data_type: DataType::Auto, init, is_const: false, span: Span::DUMMY });
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

/// `System.out.println(...)` / `System.out.print(...)`.
fn try_parse_println(cur: &mut TokenCursor) -> Option<Stmt> {
    let save = cur.position();
    cur.advance(); // "System"
    if !cur.eat(".") || !cur.eat("out") || !cur.eat(".") {
        cur.seek(save);
        return None;
    }
    let newline = if cur.eat("println") {
        true
    } else if cur.eat("print") {
        false
    } else {
        cur.seek(save);
        return None;
    };
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

    if args.len() == 1 {
        if let Expr::Literal(Literal { value: LiteralValue::Str(s), .. }) = &args[0] {
            if s.contains('{') {
                return Some(Stmt::Print(Print { args: decompose_interpolated(s), newline, span: Span::DUMMY }));
            }
        }
    }
    Some(Stmt::Print(Print { args, newline, span: Span::DUMMY }))
}

fn parse_if(cur: &mut TokenCursor) -> Stmt {
    cur.advance();
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
    cur.advance();
    cur.eat("(");
    let init = if cur.check(";") { None } else { Some(Box::new(parse_for_init(cur))) };
    cur.eat(";");
    let condition = if cur.check(";") { None } else { Some(parse_expr(cur)) };
    cur.eat(";");
    let update = if cur.check(")") { None } else { Some(Box::new(parse_for_update(cur))) };
    cur.eat(")");
    let body = parse_braced_or_single(cur);
    let range = crate::idiom::recognize_counted_loop(init.as_deref(), condition.as_ref(), update.as_deref());
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
        return Stmt::Expr(Expr::UnaryOp(UnaryOp { op: UnOp::PostInc, operand: Box::new(Expr::Identifier(name)), span: Span::DUMMY }));
    }
    if cur.eat("+=") {
        let value = parse_expr(cur);
        return Stmt::Expr(Expr::BinaryOp(BinaryOp { op: BinOp::AddAssign, left: Box::new(Expr::Identifier(name)), right: Box::new(value), span: Span::DUMMY }));
    }
    Stmt::Expr(Expr::Identifier(name))
}

fn parse_while(cur: &mut TokenCursor) -> Stmt {
    cur.advance();
    cur.eat("(");
    let condition = parse_expr(cur);
    cur.eat(")");
    let body = parse_braced_or_single(cur);
    Stmt::While(While { condition, body, span: Span::DUMMY })
}

fn parse_switch(cur: &mut TokenCursor) -> Stmt {
    cur.advance();
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
            cases.push(SwitchCase { value, body: parse_case_body(cur) });
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
            let member = cur.advance().map(|t| t.text).unwrap_or_default();
            if cur.check("(") {
                cur.advance();
                let mut args = Vec::new();
                let mut inner_iterations = 0;
                while !cur.is_eof() && !cur.check(")") {
                    inner_iterations += 1;
                    if inner_iterations > MAX_LOOP_ITERATIONS {
                        break;
                    }
                    args.push(parse_expr(cur));
                    if !cur.eat(",") {
                        break;
                    }
                }
                cur.eat(")");
                if is_scanner_receiver(&expr) && scanner_read_type(&member).is_some() {
                    let result_type = scanner_read_type(&member);
                    expr = Expr::Input(Input { prompt: None, target: None, target_type: result_type, span: Span::DUMMY });
                } else if let Expr::Identifier(receiver) = &expr {
                    expr = Expr::Call(Call { callee: member, args, is_method: true, receiver: Some(receiver.clone()), span: Span::DUMMY });
                } else {
                    expr = Expr::Call(Call { callee: member, args, is_method: false, receiver: None, span: Span::DUMMY });
                }
                continue;
            }
            if let Expr::Identifier(name) = &mut expr {
                name.push('.');
                name.push_str(&member);
                continue;
            }
        }
        break;
    }
    expr
}

/// spec.md §4.2.3: only a receiver literally named `scanner`, `sc`, or
/// `input` is treated as a console-input object; any other receiver
/// keeps `.nextInt()`-shaped calls as ordinary method calls.
fn is_scanner_receiver(expr: &Expr) -> bool {
    matches!(expr, Expr::Identifier(name) if matches!(name.as_str(), "scanner" | "sc" | "input"))
}

fn scanner_read_type(method: &str) -> Option<DataType> {
    match method {
        "nextInt" => Some(DataType::Int),
        "nextDouble" => Some(DataType::Double),
        "nextFloat" => Some(DataType::Float),
        "nextLine" | "next" => Some(DataType::String),
        "nextBoolean" => Some(DataType::Bool),
        _ => None,
    }
}

fn parse_primary(cur: &mut TokenCursor) -> Expr {
    if cur.eat("(") {
        let inner = parse_expr(cur);
        cur.eat(")");
        return inner;
    }
    if cur.eat("new") {
        let callee = cur.advance().map(|t| t.text).unwrap_or_default();
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
        return Expr::Call(Call { callee, args, is_method: false, receiver: None, span: Span::DUMMY });
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
        TokenKind::String => Expr::Literal(Literal { value: LiteralValue::Str(tok.text), data_type: DataType::String }),
        TokenKind::Char => Expr::Literal(Literal { value: LiteralValue::Str(tok.text), data_type: DataType::Char }),
        TokenKind::Keyword if tok.text == "true" => Expr::Literal(Literal { value: LiteralValue::Bool(true), data_type: DataType::Bool }),
        TokenKind::Keyword if tok.text == "false" => Expr::Literal(Literal { value: LiteralValue::Bool(false), data_type: DataType::Bool }),
        TokenKind::Keyword if tok.text == "null" => Expr::Identifier("null".to_string()),
        TokenKind::Keyword if tok.text == "this" => Expr::Identifier("this".to_string()),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_main_becomes_main_method() {
        let program = parse("public class Main { public static void main(String[] args) { System.out.println(\"hi\"); } }");
        match &program.body[0] {
            Stmt::ClassDef(c) => assert!(c.main_method.is_some()),
            other => panic!("expected class, got {other:?}"),
        }
    }

    #[test]
    fn scanner_next_int_becomes_input() {
        let program = parse(
            "public class Main { public static void main(String[] args) { int x = scanner.nextInt(); } }",
        );
        let class = match &program.body[0] {
            Stmt::ClassDef(c) => c,
            other => panic!("expected class, got {other:?}"),
        };
        match &class.main_method.as_ref().unwrap().body[0] {
            Stmt::Input(input) => {
                assert_eq!(input.target.as_deref(), Some("x"));
                assert_eq!(input.target_type, Some(DataType::Int));
            }
            other => panic!("expected Input, got {other:?}"),
        }
    }

    #[test]
    fn next_int_on_non_scanner_receiver_stays_a_call() {
        let program = parse(
            "public class Main { public static void main(String[] args) { int x = iterator.nextInt(); } }",
        );
        let class = match &program.body[0] {
            Stmt::ClassDef(c) => c,
            other => panic!("expected class, got {other:?}"),
        };
        match &class.main_method.as_ref().unwrap().body[0] {
            Stmt::VarDecl(v) => match &v.init {
                Some(Expr::Call(call)) => {
                    assert_eq!(call.callee, "nextInt");
                    assert_eq!(call.receiver.as_deref(), Some("iterator"));
                }
                other => panic!("expected Call init, got {other:?}"),
            },
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn println_decomposes_interpolated_literal() {
        let program = parse(
            "public class Main { public static void main(String[] args) { System.out.println(\"hi {name}\"); } }",
        );
        let class = match &program.body[0] {
            Stmt::ClassDef(c) => c,
            other => panic!("expected class, got {other:?}"),
        };
        match &class.main_method.as_ref().unwrap().body[0] {
            Stmt::Print(p) => assert_eq!(p.args.len(), 2),
            other => panic!("expected Print, got {other:?}"),
        }
    }
}
