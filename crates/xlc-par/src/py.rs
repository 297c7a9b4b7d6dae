//! Parser for the indentation-based scripting language.
//!
//! Block structure comes from the indent column tagged onto every
//! token by the lexer rather than explicit braces: a header line ending
//! in `:` opens a block consisting of every following line whose indent
//! exceeds the header's own. Each statement is parsed from a single
//! logical line — the common subset has no multi-line expressions.

use std::collections::HashSet;

use xlc_ir::*;
use xlc_lex::{py as lexer, Token, TokenKind};

use crate::cursor::{TokenCursor, MAX_LOOP_ITERATIONS};

pub fn parse(source: &str) -> Program {
    let tokens = lexer::lex(source);
    let lines = split_lines(tokens);
    let mut parser = Parser { lines, pos: 0, declared: HashSet::new() };
    let mut program = Program::new();
    while !parser.at_end() {
        if let Some(text) = parser.import_line() {
            program.imports.push(text);
            parser.pos += 1;
            continue;
        }
        let indent = parser.line_indent(parser.pos);
        program.body.push(parser.parse_statement(indent));
    }
    program
}

fn split_lines(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    for tok in tokens {
        if tok.kind == TokenKind::Newline {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
        } else {
            current.push(tok);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct Parser {
    lines: Vec<Vec<Token>>,
    pos: usize,
    declared: HashSet<String>,
}

impl Parser {
    fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    fn line_indent(&self, idx: usize) -> u32 {
        self.lines.get(idx).and_then(|l| l.first()).map(|t| t.indent).unwrap_or(0)
    }

    fn import_line(&self) -> Option<String> {
        let line = self.lines.get(self.pos)?;
        let first = line.first()?;
        if first.text == "import" || first.text == "from" {
            Some(line.iter().map(|t| t.text.clone()).collect::<Vec<_>>().join(" "))
        } else {
            None
        }
    }

    fn cursor_for(&self, idx: usize) -> TokenCursor {
        TokenCursor::new(self.lines[idx].clone())
    }

    /// Parses every statement whose line-indent exceeds `parent_indent`.
    fn parse_block(&mut self, parent_indent: u32) -> Vec<Stmt> {
        let mut body = Vec::new();
        let mut iterations = 0;
        while !self.at_end() && self.line_indent(self.pos) > parent_indent {
            iterations += 1;
            if iterations > MAX_LOOP_ITERATIONS {
                break;
            }
            let indent = self.line_indent(self.pos);
            body.push(self.parse_statement(indent));
        }
        body
    }

    fn parse_statement(&mut self, indent: u32) -> Stmt {
        let idx = self.pos;
        let mut cur = self.cursor_for(idx);
        let first = match cur.peek_text() {
            Some(t) => t.to_string(),
            None => {
                self.pos += 1;
                return Stmt::Comment(Comment { text: String::new(), multiline: false });
            }
        };

        if cur.peek_kind() == Some(TokenKind::Comment) {
            self.pos += 1;
            return Stmt::Comment(Comment { text: first, multiline: false });
        }

        match first.as_str() {
            "def" => return self.parse_function(indent),
            "class" => return self.parse_class(indent),
            "if" => return self.parse_if(indent),
            "for" => return self.parse_for(indent),
            "while" => return self.parse_while(indent),
            "return" => {
                self.pos += 1;
                cur.advance();
                let value = if cur.is_eof() { None } else { Some(self.parse_expr(&mut cur)) };
                return Stmt::Return(Return { value, span: Span::DUMMY });
            }
            "break" => {
                self.pos += 1;
                return Stmt::Break;
            }
            "pass" => {
                self.pos += 1;
                return Stmt::Comment(Comment { text: String::new(), multiline: false });
            }
            "print" => {
                self.pos += 1;
                return self.parse_print(&mut cur);
            }
            _ => {}
        }

        self.pos += 1;
        self.parse_simple_statement(&mut cur)
    }

    fn parse_print(&mut self, cur: &mut TokenCursor) -> Stmt {
        cur.advance(); // "print"
        cur.eat("(");
        let mut args = Vec::new();
        let mut iterations = 0;
        while !cur.is_eof() && !cur.check(")") {
            iterations += 1;
            if iterations > MAX_LOOP_ITERATIONS {
                break;
            }
            // `end=`/`sep=` keyword arguments: accepted, value discarded.
            if let (Some(name), Some(eq)) = (cur.peek_text().map(str::to_string), cur.peek_at(1)) {
                if (name == "end" || name == "sep") && eq.text == "=" {
                    cur.advance();
                    cur.advance();
                    let _ = self.parse_expr(cur);
                    cur.eat(",");
                    continue;
                }
            }
            let arg = self.parse_expr(cur);
            args.push(arg);
            if !cur.eat(",") {
                break;
            }
        }
        cur.eat(")");

        if let [Expr::Literal(Literal { value: LiteralValue::Str(text), .. })] = args.as_slice() {
            if text.contains('{') {
                return Stmt::Print(Print {
                    args: crate::idiom::decompose_interpolated(text),
                    newline: true,
                    span: Span::DUMMY,
                });
            }
        }
        Stmt::Print(Print { args, newline: true, span: Span::DUMMY })
    }

    fn parse_function(&mut self, indent: u32) -> Stmt {
        let mut cur = self.cursor_for(self.pos);
        self.pos += 1;
        cur.advance(); // "def"
        let name = cur.advance().map(|t| t.text).unwrap_or_default();
        cur.eat("(");
        let mut params = Vec::new();
        let mut iterations = 0;
        while !cur.is_eof() && !cur.check(")") {
            iterations += 1;
            if iterations > MAX_LOOP_ITERATIONS {
                break;
            }
            if let Some(tok) = cur.advance() {
                if tok.text != "self" {
                    params.push(Variable {
                        name: tok.text,
                        data_type: DataType::Auto,
                        init: None,
                        is_const: false,
                        span: Span::DUMMY,
                    });
                }
            }
            if !cur.eat(",") {
                break;
            }
        }
        cur.eat(")");
        cur.eat(":");

        let body = self.parse_block(indent);
        Stmt::FunctionDef(Function { name, params, return_type: DataType::Auto, body, span: Span::DUMMY })
    }

    fn parse_class(&mut self, indent: u32) -> Stmt {
        let mut cur = self.cursor_for(self.pos);
        self.pos += 1;
        cur.advance(); // "class"
        let name = cur.advance().map(|t| t.text).unwrap_or_default();
        // Optional "(Base):" is out of the common subset; skip to ':'.
        while !cur.is_eof() && !cur.eat(":") {
            cur.advance();
        }

        let members_from_body = self.parse_block(indent);
        let mut members = Vec::new();
        let mut constructor = None;
        let mut methods = Vec::new();

        for stmt in members_from_body {
            if let Stmt::FunctionDef(f) = stmt {
                if f.name == CONSTRUCTOR_NAME {
                    for (n, ty, init) in scan_self_assignments(&f.body) {
                        if !members.iter().any(|m: &Variable| m.name == n) {
                            members.push(Variable { name: n, data_type: ty, init, is_const: false, span: Span::DUMMY });
                        }
                    }
                    constructor = Some(f);
                } else {
                    methods.push(f);
                }
            }
        }

        Stmt::ClassDef(Class {
            name,
            members,
            methods,
            constructor,
            main_method: None,
            static_methods: Vec::new(),
            span: Span::DUMMY,
        })
    }

    fn parse_if(&mut self, indent: u32) -> Stmt {
        let mut cur = self.cursor_for(self.pos);
        self.pos += 1;
        cur.advance(); // "if"
        let condition = self.parse_expr(&mut cur);
        cur.eat(":");
        let then_body = self.parse_block(indent);

        let (else_if, else_body) = self.parse_elif_chain(indent);
        Stmt::If(If { condition, then_body, else_body, else_if, span: Span::DUMMY })
    }

    fn parse_elif_chain(&mut self, indent: u32) -> (Option<Box<If>>, Option<Vec<Stmt>>) {
        if !self.at_end() && self.line_indent(self.pos) == indent {
            let first = self.lines[self.pos].first().map(|t| t.text.as_str());
            if first == Some("elif") {
                let mut cur = self.cursor_for(self.pos);
                self.pos += 1;
                cur.advance();
                let condition = self.parse_expr(&mut cur);
                cur.eat(":");
                let then_body = self.parse_block(indent);
                let (nested_elif, nested_else) = self.parse_elif_chain(indent);
                return (
                    Some(Box::new(If { condition, then_body, else_body: nested_else, else_if: nested_elif, span: Span::DUMMY })),
                    None,
                );
            }
            if first == Some("else") {
                self.pos += 1;
                let body = self.parse_block(indent);
                return (None, Some(body));
            }
        }
        (None, None)
    }

    fn parse_for(&mut self, indent: u32) -> Stmt {
        let mut cur = self.cursor_for(self.pos);
        self.pos += 1;
        cur.advance(); // "for"
        let iterator = cur.advance().map(|t| t.text).unwrap_or_default();
        cur.eat("in");

        let range = if cur.check("range") {
            cur.advance();
            cur.eat("(");
            let mut args = Vec::new();
            let mut iterations = 0;
            while !cur.is_eof() && !cur.check(")") {
                iterations += 1;
                if iterations > MAX_LOOP_ITERATIONS {
                    break;
                }
                args.push(self.parse_expr(&mut cur));
                if !cur.eat(",") {
                    break;
                }
            }
            cur.eat(")");
            Some(match args.len() {
                1 => RangeFor { iterator: iterator.clone(), start: int_lit(0), end: args[0].clone(), step: int_lit(1) },
                2 => RangeFor { iterator: iterator.clone(), start: args[0].clone(), end: args[1].clone(), step: int_lit(1) },
                _ if args.len() >= 3 => {
                    RangeFor { iterator: iterator.clone(), start: args[0].clone(), end: args[1].clone(), step: args[2].clone() }
                }
                _ => RangeFor { iterator: iterator.clone(), start: int_lit(0), end: int_lit(0), step: int_lit(1) },
            })
        } else {
            // Iterating a non-range expression is outside the common
            // subset; consume the rest of the header and fall through
            // with no range/condition rather than aborting.
            while !cur.is_eof() && !cur.check(":") {
                cur.advance();
            }
            None
        };
        cur.eat(":");
        let body = self.parse_block(indent);
        Stmt::For(For { init: None, condition: None, update: None, range, body, span: Span::DUMMY })
    }

    fn parse_while(&mut self, indent: u32) -> Stmt {
        let mut cur = self.cursor_for(self.pos);
        self.pos += 1;
        cur.advance(); // "while"
        let condition = self.parse_expr(&mut cur);
        cur.eat(":");
        let body = self.parse_block(indent);
        Stmt::While(While { condition, body, span: Span::DUMMY })
    }

    fn parse_simple_statement(&mut self, cur: &mut TokenCursor) -> Stmt {
        // target [op]= expr, or a bare expression statement (call or
        // postfix update).
        let target = match cur.peek() {
            Some(t) if t.kind == TokenKind::Identifier => t.text.clone(),
            _ => {
                let expr = self.parse_expr(cur);
                return Stmt::Expr(expr);
            }
        };

        let line_start = cur.position();
        let mut dotted = target.clone();
        cur.advance();
        while cur.check(".") {
            cur.advance();
            if let Some(tok) = cur.advance() {
                dotted.push('.');
                dotted.push_str(&tok.text);
            }
        }

        if let Some(op) = compound_op(cur.peek_text()) {
            cur.advance();
            let value = self.parse_expr(cur);
            if op == BinOp::Assign {
                if dotted.contains('.') || self.declared.contains(&dotted) {
                    return Stmt::Assignment(Assignment { target: dotted, value, span: Span::DUMMY });
                }
                self.declared.insert(dotted.clone());
                let data_type = infer_type(&value);
                return Stmt::VarDecl(Variable { name: dotted, data_type, init: Some(value), is_const: false, span: Span::DUMMY });
            }
            return Stmt::Expr(Expr::BinaryOp(BinaryOp {
                op,
                left: Box::new(Expr::Identifier(dotted)),
                right: Box::new(value),
                span: Span::DUMMY,
            }));
        }

        // Not an assignment after all — rewind and reparse the whole
        // line as an expression statement (a bare call, or a postfix
        // update like `i++`).
        cur.seek(line_start);
        let expr = self.parse_expr(cur);
        Stmt::Expr(expr)
    }

    fn parse_expr(&mut self, cur: &mut TokenCursor) -> Expr {
        self.parse_or(cur)
    }

    fn parse_or(&mut self, cur: &mut TokenCursor) -> Expr {
        let mut left = self.parse_and(cur);
        let mut iterations = 0;
        while cur.check("or") {
            iterations += 1;
            if iterations > MAX_LOOP_ITERATIONS {
                break;
            }
            cur.advance();
            let right = self.parse_and(cur);
            left = bin(BinOp::Or, left, right);
        }
        left
    }

    fn parse_and(&mut self, cur: &mut TokenCursor) -> Expr {
        let mut left = self.parse_not(cur);
        let mut iterations = 0;
        while cur.check("and") {
            iterations += 1;
            if iterations > MAX_LOOP_ITERATIONS {
                break;
            }
            cur.advance();
            let right = self.parse_not(cur);
            left = bin(BinOp::And, left, right);
        }
        left
    }

    fn parse_not(&mut self, cur: &mut TokenCursor) -> Expr {
        if cur.eat("not") {
            let operand = self.parse_not(cur);
            return Expr::UnaryOp(UnaryOp { op: UnOp::Not, operand: Box::new(operand), span: Span::DUMMY });
        }
        self.parse_equality(cur)
    }

    fn parse_equality(&mut self, cur: &mut TokenCursor) -> Expr {
        let mut left = self.parse_relational(cur);
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
            let right = self.parse_relational(cur);
            left = bin(op, left, right);
        }
        left
    }

    fn parse_relational(&mut self, cur: &mut TokenCursor) -> Expr {
        let mut left = self.parse_additive(cur);
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
            let right = self.parse_additive(cur);
            left = bin(op, left, right);
        }
        left
    }

    fn parse_additive(&mut self, cur: &mut TokenCursor) -> Expr {
        let mut left = self.parse_multiplicative(cur);
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
            let right = self.parse_multiplicative(cur);
            left = bin(op, left, right);
        }
        left
    }

    fn parse_multiplicative(&mut self, cur: &mut TokenCursor) -> Expr {
        let mut left = self.parse_unary(cur);
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
            let right = self.parse_unary(cur);
            left = bin(op, left, right);
        }
        left
    }

    fn parse_unary(&mut self, cur: &mut TokenCursor) -> Expr {
        if cur.eat("-") {
            let operand = self.parse_unary(cur);
            return Expr::UnaryOp(UnaryOp { op: UnOp::Neg, operand: Box::new(operand), span: Span::DUMMY });
        }
        self.parse_postfix(cur)
    }

    fn parse_postfix(&mut self, cur: &mut TokenCursor) -> Expr {
        let mut expr = self.parse_primary(cur);
        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > MAX_LOOP_ITERATIONS {
                break;
            }
            if cur.eat(".") {
                if let Some(tok) = cur.advance() {
                    if let Expr::Identifier(name) = &mut expr {
                        name.push('.');
                        name.push_str(&tok.text);
                        continue;
                    }
                }
            }
            break;
        }
        expr
    }

    fn parse_primary(&mut self, cur: &mut TokenCursor) -> Expr {
        if cur.eat("(") {
            let inner = self.parse_expr(cur);
            cur.eat(")");
            return inner;
        }

        let tok = match cur.advance() {
            Some(t) => t,
            None => return Expr::Literal(Literal { value: LiteralValue::Int(0), data_type: DataType::Int }),
        };

        match tok.kind {
            TokenKind::Number => {
                if tok.text.contains('.') {
                    Expr::Literal(Literal { value: LiteralValue::Float(tok.text.parse().unwrap_or(0.0)), data_type: DataType::Float })
                } else {
                    Expr::Literal(Literal { value: LiteralValue::Int(tok.text.parse().unwrap_or(0)), data_type: DataType::Int })
                }
            }
            TokenKind::String => {
                if let Some(stripped) = tok.text.strip_prefix('f') {
                    // Interpolated literal: callers that need the
                    // segment list use `idiom::decompose_interpolated`
                    // directly (print arguments); elsewhere it's kept
                    // as a single string value.
                    Expr::Literal(Literal { value: LiteralValue::Str(stripped.to_string()), data_type: DataType::String })
                } else {
                    Expr::Literal(Literal { value: LiteralValue::Str(tok.text), data_type: DataType::String })
                }
            }
            TokenKind::Keyword if tok.text == "True" => {
                Expr::Literal(Literal { value: LiteralValue::Bool(true), data_type: DataType::Bool })
            }
            TokenKind::Keyword if tok.text == "False" => {
                Expr::Literal(Literal { value: LiteralValue::Bool(false), data_type: DataType::Bool })
            }
            TokenKind::Keyword if tok.text == "None" => {
                Expr::Literal(Literal { value: LiteralValue::Str("None".into()), data_type: DataType::Auto })
            }
            TokenKind::Identifier => {
                if tok.text == "input" && cur.check("(") {
                    cur.advance();
                    let prompt = if cur.check(")") {
                        None
                    } else {
                        match self.parse_expr(cur) {
                            Expr::Literal(Literal { value: LiteralValue::Str(s), .. }) => Some(s),
                            _ => None,
                        }
                    };
                    cur.eat(")");
                    return Expr::Input(Input { prompt, target: None, target_type: None, span: Span::DUMMY });
                }
                if matches!(tok.text.as_str(), "int" | "float" | "str") && cur.check("(") {
                    cur.advance();
                    let mut args = Vec::new();
                    if !cur.check(")") {
                        args.push(self.parse_expr(cur));
                    }
                    cur.eat(")");
                    return Expr::Call(Call { callee: tok.text, args, is_method: false, receiver: None, span: Span::DUMMY });
                }
                if cur.check("(") {
                    cur.advance();
                    let mut args = Vec::new();
                    let mut iterations = 0;
                    while !cur.is_eof() && !cur.check(")") {
                        iterations += 1;
                        if iterations > MAX_LOOP_ITERATIONS {
                            break;
                        }
                        args.push(self.parse_expr(cur));
                        if !cur.eat(",") {
                            break;
                        }
                    }
                    cur.eat(")");
                    return Expr::Call(Call { callee: tok.text, args, is_method: false, receiver: None, span: Span::DUMMY });
                }
                Expr::Identifier(tok.text)
            }
            _ => Expr::Identifier(tok.text),
        }
    }
}

fn bin(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp(BinaryOp { op, left: Box::new(left), right: Box::new(right), span: Span::DUMMY })
}

fn int_lit(n: i64) -> Expr {
    Expr::Literal(Literal { value: LiteralValue::Int(n), data_type: DataType::Int })
}

fn compound_op(text: Option<&str>) -> Option<BinOp> {
    match text {
        Some("=") => Some(BinOp::Assign),
        Some("+=") => Some(BinOp::AddAssign),
        Some("-=") => Some(BinOp::SubAssign),
        Some("*=") => Some(BinOp::MulAssign),
        Some("/=") => Some(BinOp::DivAssign),
        _ => None,
    }
}

/// `+` mixing any string yields `string`; any float operand yields
/// `float`; comparisons yield `bool`; otherwise `int`.
fn infer_type(expr: &Expr) -> DataType {
    match expr {
        Expr::Literal(lit) => lit.data_type,
        Expr::Input(_) => DataType::Auto,
        Expr::Call(c) => match c.callee.as_str() {
            "int" => DataType::Int,
            "float" => DataType::Float,
            "str" => DataType::String,
            _ => DataType::Auto,
        },
        Expr::BinaryOp(b) => match b.op {
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq | BinOp::And | BinOp::Or => {
                DataType::Bool
            }
            BinOp::Add => {
                let (l, r) = (infer_type(&b.left), infer_type(&b.right));
                if l == DataType::String || r == DataType::String {
                    DataType::String
                } else if l == DataType::Float || r == DataType::Float {
                    DataType::Float
                } else {
                    DataType::Int
                }
            }
            _ => {
                let (l, r) = (infer_type(&b.left), infer_type(&b.right));
                if l == DataType::Float || r == DataType::Float {
                    DataType::Float
                } else {
                    DataType::Int
                }
            }
        },
        _ => DataType::Auto,
    }
}

/// Scans a constructor body for `self.x = ...` statements, promoting
/// each `x` into the class member list with the assigned value's
/// inferred type.
fn scan_self_assignments(body: &[Stmt]) -> Vec<(String, DataType, Option<Expr>)> {
    let mut out = Vec::new();
    for stmt in body {
        if let Stmt::Assignment(a) = stmt {
            if let Some(field) = a.target.strip_prefix("self.") {
                out.push((field.to_string(), infer_type(&a.value), Some(a.value.clone())));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_declaration_type_from_literal() {
        let program = parse("x = 10\n");
        match &program.body[0] {
            Stmt::VarDecl(v) => {
                assert_eq!(v.name, "x");
                assert_eq!(v.data_type, DataType::Int);
            }
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn recognizes_if_with_print() {
        let program = parse("x = 10\nif x > 5:\n    print(x)\n");
        assert!(matches!(program.body[1], Stmt::If(_)));
    }

    #[test]
    fn recognizes_range_for_loop() {
        let program = parse("for i in range(5):\n    print(i)\n");
        match &program.body[0] {
            Stmt::For(f) => {
                let range = f.range.as_ref().unwrap();
                assert_eq!(range.iterator, "i");
            }
            other => panic!("expected For, got {other:?}"),
        }
    }

    #[test]
    fn constructor_assignments_promote_to_members() {
        let src = "class P:\n    def __init__(self):\n        self.n = 0\n    def tick(self):\n        self.n = self.n + 1\n";
        let program = parse(src);
        match &program.body[0] {
            Stmt::ClassDef(c) => {
                assert_eq!(c.members.len(), 1);
                assert_eq!(c.members[0].name, "n");
                assert_eq!(c.methods.len(), 1);
            }
            other => panic!("expected ClassDef, got {other:?}"),
        }
    }
}
