//! Parser for the C++-family object-capable language. Extends the C
//! grammar with `class` bodies, access-specifier labels, and the
//! `cout <<` / `cin >>` stream idioms.

use xlc_ir::*;
use xlc_lex::{cpp as lexer, TokenKind};

use crate::cursor::{TokenCursor, MAX_LOOP_ITERATIONS};
use crate::idiom::{decompose_printf_format, recognize_counted_loop};

const TYPE_KEYWORDS: &[&str] = &["int", "float", "double", "char", "void", "bool", "auto", "string"];

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
        if cur.check("using") {
            let mut text = String::new();
            while !cur.is_eof() && !cur.check(";") {
                let tok = cur.advance().unwrap();
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&tok.text);
            }
            cur.eat(";");
            program.imports.push(format!("using {text}"));
            continue;
        }
        if cur.check_kind(TokenKind::Comment) || cur.check_kind(TokenKind::MultilineComment) {
            let multiline = cur.check_kind(TokenKind::MultilineComment);
            let text = cur.advance().map(|t| t.text).unwrap_or_default();
            program.body.push(Stmt::Comment(Comment { text, multiline }));
            continue;
        }
        if cur.check("class") {
            program.body.push(parse_class(&mut cur));
            continue;
        }
        program.body.push(parse_top_level(&mut cur));
    }
    for d in cur.diagnostics().iter() {
        tracing::debug!(target: "xlc_par::cpp", "{d}");
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

fn parse_class(cur: &mut TokenCursor) -> Stmt {
    cur.advance(); // "class"
    let name = cur.advance().map(|t| t.text).unwrap_or_default();
    cur.eat("{");

    let mut members = Vec::new();
    let mut methods = Vec::new();
    let mut constructor = None;
    let mut iterations = 0;

    while !cur.is_eof() && !cur.check("}") {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        if matches!(cur.peek_text(), Some("public") | Some("private") | Some("protected")) {
            cur.advance();
            cur.eat(":");
            continue;
        }
        if cur.check_kind(TokenKind::Comment) || cur.check_kind(TokenKind::MultilineComment) {
            cur.advance();
            continue;
        }

        // Constructor: `Name(...) { ... }` with no leading type keyword.
        if cur.peek_text() == Some(name.as_str()) && cur.peek_at(1).map(|t| t.text.as_str()) == Some("(") {
            cur.advance();
            let params = parse_params(cur);
            cur.eat(")");
            let body = parse_block(cur);
            constructor = Some(Function {
                name: CONSTRUCTOR_NAME.to_string(),
                params,
                return_type: DataType::Void,
                body,
                span: Span::DUMMY,
            });
            continue;
        }

        let mut is_const = false;
        while matches!(cur.peek_text(), Some("const") | Some("static")) {
            is_const |= cur.check("const");
            cur.advance();
        }
        let ty = parse_type(cur);
        let member_name = cur.advance().map(|t| t.text).unwrap_or_default();

        if cur.check("(") {
            let params = parse_params(cur);
            cur.eat(")");
            let body = parse_block(cur);
            methods.push(Function { name: member_name, params, return_type: ty, body, span: Span::DUMMY });
        } else {
            let init = if cur.eat("=") { Some(parse_expr(cur)) } else { None };
            cur.eat(";");
            members.push(Variable { name: member_name, data_type: ty, init, is_const, span: Span::DUMMY });
        }
    }
    cur.eat("}");
    cur.eat(";");

    Stmt::ClassDef(Class { name, members, methods, constructor, main_method: None, static_methods: Vec::new(), span: Span::DUMMY })
}

fn parse_type(cur: &mut TokenCursor) -> DataType {
    let text = cur.advance().map(|t| t.text).unwrap_or_default();
    match text.as_str() {
        "int" => DataType::Int,
        "float" => DataType::Float,
        "double" => DataType::Double,
        "char" => DataType::Char,
        "void" => DataType::Void,
        "bool" => DataType::Bool,
        "string" => DataType::String,
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
        Some("cout") => return parse_cout(cur),
        Some("cin") => return parse_cin(cur),
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

    // Could be `Name obj(...)` (object construction), a plain
    // assignment, or an expression statement.
    if cur.peek_kind() == Some(TokenKind::Identifier)
        && cur.peek_at(1).map(|t| t.kind) == Some(TokenKind::Identifier)
    {
        let ty_name = cur.advance().map(|t| t.text).unwrap_or_default();
        let name = cur.advance().map(|t| t.text).unwrap_or_default();
        let init = if cur.eat("(") {
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
            Some(Expr::Call(Call { callee: ty_name, args, is_method: false, receiver: None, span: Span::DUMMY }))
        } else if cur.eat("=") {
            Some(parse_expr(cur))
        } else {
            None
        };
        cur.eat(";");
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

/// `cout << a << b << endl;` becomes a `Print` whose args are every
/// streamed operand except the trailing `endl` sentinel, which instead
/// sets the newline flag.
fn parse_cout(cur: &mut TokenCursor) -> Stmt {
    cur.advance(); // "cout"
    let mut args = Vec::new();
    let mut newline = false;
    let mut iterations = 0;
    while cur.eat("<<") {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        if cur.check("endl") {
            cur.advance();
            newline = true;
            continue;
        }
        args.push(parse_additive(cur));
    }
    cur.eat(";");
    Stmt::Print(Print { args, newline, span: Span::DUMMY })
}

/// `cin >> x >> y;` becomes a sequence of `Input` reads; only the first
/// is returned as the statement node (matching the other front-ends'
/// one-read-per-statement shape), the rest fold into the same Print-like
/// node would lose information, so each becomes its own statement via a
/// synthetic block — callers that need multiple targets should prefer
/// separate `cin >>` statements, the common style in the corpus.
fn parse_cin(cur: &mut TokenCursor) -> Stmt {
    cur.advance(); // "cin"
    cur.eat(">>");
    let target = cur.advance().map(|t| t.text);
    let mut iterations = 0;
    while cur.eat(">>") {
        iterations += 1;
        if iterations > MAX_LOOP_ITERATIONS {
            break;
        }
        cur.advance();
    }
    cur.eat(";");
    Stmt::Input(Input { prompt: None, target, target_type: None, span: Span::DUMMY })
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
        return Stmt::Expr(Expr::UnaryOp(UnaryOp { op: UnOp::PostInc, operand: Box::new(Expr::Identifier(name)), span: Span::DUMMY }));
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
        TokenKind::String => Expr::Literal(Literal { value: LiteralValue::Str(tok.text), data_type: DataType::String }),
        TokenKind::Char => Expr::Literal(Literal { value: LiteralValue::Str(tok.text), data_type: DataType::Char }),
        TokenKind::Keyword if tok.text == "true" => Expr::Literal(Literal { value: LiteralValue::Bool(true), data_type: DataType::Bool }),
        TokenKind::Keyword if tok.text == "false" => Expr::Literal(Literal { value: LiteralValue::Bool(false), data_type: DataType::Bool }),
        TokenKind::Keyword if tok.text == "this" => Expr::Identifier("this".to_string()),
        TokenKind::Keyword if tok.text == "new" => {
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
            Expr::Call(Call { callee, args, is_method: false, receiver: None, span: Span::DUMMY })
        }
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

#[allow(dead_code)]
fn printf_fallback(format: &str, args: &[Expr]) -> (Vec<Expr>, bool) {
    decompose_printf_format(format, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_with_constructor_and_members() {
        let program = parse("class Point { public: int x; int y; Point(int x, int y) { this.x = x; } };");
        match &program.body[0] {
            Stmt::ClassDef(c) => {
                assert_eq!(c.name, "Point");
                assert_eq!(c.members.len(), 2);
                assert!(c.constructor.is_some());
            }
            other => panic!("expected class, got {other:?}"),
        }
    }

    #[test]
    fn parses_cout_stream_into_print() {
        let program = parse("void main() { cout << \"hi \" << x << endl; }");
        let func = match &program.body[0] {
            Stmt::FunctionDef(f) => f,
            other => panic!("expected function, got {other:?}"),
        };
        match &func.body[0] {
            Stmt::Print(p) => {
                assert!(p.newline);
                assert_eq!(p.args.len(), 2);
            }
            other => panic!("expected Print, got {other:?}"),
        }
    }

    #[test]
    fn parses_counted_loop_into_range() {
        let program = parse("void main() { for (int i = 0; i <= 4; i++) {} }");
        let func = match &program.body[0] {
            Stmt::FunctionDef(f) => f,
            other => panic!("expected function, got {other:?}"),
        };
        match &func.body[0] {
            Stmt::For(f) => assert!(f.range.is_some()),
            other => panic!("expected For, got {other:?}"),
        }
    }
}
