//! Emitter for the indentation-based scripting language.
//!
//! Re-expresses the target-agnostic common subset in idiomatic,
//! dynamically-typed form: declarations drop their type annotation,
//! compound/postfix updates re-lower to plain arithmetic (spec.md
//! §4.3), `&&/||/!` re-lower to `and/or/not`, and `self`/`this` both
//! come out as `self`.

use xlc_ir::{
    BinOp, Class, Expr, For, Function, If, LiteralValue, Print, Program, Stmt, Switch, UnOp,
    While,
};

use crate::{Emitter, IndentWriter};

#[derive(Default)]
pub struct PyEmitter {
    w: IndentWriter,
}

impl PyEmitter {
    pub fn new() -> Self {
        Self { w: IndentWriter::new("    ") }
    }
}

impl Emitter for PyEmitter {
    fn emit(&mut self, program: &Program) -> Result<String, crate::EmitError> {
        self.w = IndentWriter::new("    ");
        emit_body(&mut self.w, &program.body);
        Ok(std::mem::take(&mut self.w).finish())
    }
}

fn emit_body(w: &mut IndentWriter, body: &[Stmt]) {
    if body.is_empty() {
        w.write_line("pass");
        return;
    }
    for stmt in body {
        emit_stmt(w, stmt);
    }
}

fn emit_stmt(w: &mut IndentWriter, stmt: &Stmt) {
    match stmt {
        Stmt::Comment(c) => {
            for line in c.text.lines() {
                w.write_line(&format!("# {}", line));
            }
        }
        Stmt::VarDecl(v) => match &v.init {
            Some(init) => w.write_line(&format!("{} = {}", v.name, expr(init))),
            None => w.write_line(&format!("{} = None", v.name)),
        },
        Stmt::Assignment(a) => w.write_line(&format!("{} = {}", a.target, expr(&a.value))),
        Stmt::FunctionDef(f) => emit_function(w, f, &[]),
        Stmt::ClassDef(c) => emit_class(w, c),
        Stmt::If(i) => emit_if(w, i),
        Stmt::For(f) => emit_for(w, f),
        Stmt::While(wl) => emit_while(w, wl),
        Stmt::Switch(sw) => emit_switch(w, sw),
        Stmt::Break => w.write_line("break"),
        Stmt::Return(r) => match &r.value {
            Some(v) => w.write_line(&format!("return {}", expr(v))),
            None => w.write_line("return"),
        },
        Stmt::Print(p) => emit_print(w, p),
        Stmt::Input(input) => {
            let call = input_call(input.prompt.as_deref(), input.target_type);
            if let Some(target) = &input.target {
                w.write_line(&format!("{} = {}", target, call));
            } else {
                w.write_line(&call);
            }
        }
        Stmt::Expr(e) => w.write_line(&expr_statement(e)),
    }
}

/// At statement position a bare postfix/prefix update re-expresses as
/// the corresponding compound assignment (spec.md §4.3); everything
/// else falls back to the ordinary expression rendering.
fn expr_statement(e: &Expr) -> String {
    if let Expr::UnaryOp(u) = e {
        if let Expr::Identifier(name) = &*u.operand {
            match u.op {
                UnOp::PostInc | UnOp::PreInc => return format!("{} += 1", name),
                UnOp::PostDec | UnOp::PreDec => return format!("{} -= 1", name),
                _ => {}
            }
        }
    }
    expr(e)
}

fn input_call(prompt: Option<&str>, target_type: Option<xlc_ir::DataType>) -> String {
    let base = match prompt {
        Some(p) => format!("input({:?})", p),
        None => "input()".to_string(),
    };
    match target_type {
        Some(xlc_ir::DataType::Int) => format!("int({})", base),
        Some(xlc_ir::DataType::Float) | Some(xlc_ir::DataType::Double) => {
            format!("float({})", base)
        }
        _ => base,
    }
}

fn emit_function(w: &mut IndentWriter, f: &Function, extra_first_params: &[&str]) {
    let mut params: Vec<String> = extra_first_params.iter().map(|s| s.to_string()).collect();
    params.extend(f.params.iter().map(|p| p.name.clone()));
    w.write_line(&format!("def {}({}):", f.name, params.join(", ")));
    w.indent();
    emit_body(w, &f.body);
    w.dedent();
}

fn emit_class(w: &mut IndentWriter, c: &Class) {
    if xlc_ir::is_entry_point_shell(c) {
        for s in &c.static_methods {
            emit_function(w, s, &[]);
            w.blank();
        }
        if let Some(main) = &c.main_method {
            emit_body(w, &main.body);
        }
        return;
    }

    w.write_line(&format!("class {}:", c.name));
    w.indent();
    if c.constructor.is_none() && c.methods.is_empty() && c.members.is_empty() {
        w.write_line("pass");
        w.dedent();
        return;
    }
    if let Some(ctor) = &c.constructor {
        emit_function(w, ctor, &["self"]);
    } else if !c.members.is_empty() {
        w.write_line("def __init__(self):");
        w.indent();
        for m in &c.members {
            let init = m.init.as_ref().map(expr).unwrap_or_else(|| "None".to_string());
            w.write_line(&format!("self.{} = {}", m.name, init));
        }
        w.dedent();
    }
    for m in &c.methods {
        emit_function(w, m, &["self"]);
    }
    w.dedent();
}

fn emit_if(w: &mut IndentWriter, i: &If) {
    w.write_line(&format!("if {}:", expr(&i.condition)));
    w.indent();
    emit_body(w, &i.then_body);
    w.dedent();
    emit_elif_or_else(w, i.else_if.as_deref(), i.else_body.as_deref());
}

fn emit_elif_or_else(w: &mut IndentWriter, else_if: Option<&If>, else_body: Option<&[Stmt]>) {
    if let Some(ei) = else_if {
        w.write_line(&format!("elif {}:", expr(&ei.condition)));
        w.indent();
        emit_body(w, &ei.then_body);
        w.dedent();
        emit_elif_or_else(w, ei.else_if.as_deref(), ei.else_body.as_deref());
    } else if let Some(body) = else_body {
        w.write_line("else:");
        w.indent();
        emit_body(w, body);
        w.dedent();
    }
}

/// `range(end)`/`range(start, end)`/`range(start, end, step)` — the
/// argument count collapses per spec.md §4.3's shared emission
/// contract for range-form `For`.
fn emit_for(w: &mut IndentWriter, f: &For) {
    if let Some(r) = &f.range {
        let is_zero_start = matches!(&r.start, Expr::Literal(l) if l.value == LiteralValue::Int(0));
        let is_unit_step = matches!(&r.step, Expr::Literal(l) if l.value == LiteralValue::Int(1));
        let args = if is_zero_start && is_unit_step {
            expr(&r.end)
        } else if is_unit_step {
            format!("{}, {}", expr(&r.start), expr(&r.end))
        } else {
            format!("{}, {}, {}", expr(&r.start), expr(&r.end), expr(&r.step))
        };
        w.write_line(&format!("for {} in range({}):", r.iterator, args));
        w.indent();
        emit_body(w, &f.body);
        w.dedent();
        return;
    }

    // No recognized range form: approximate the classic triple with a
    // `while` loop, the closest native construct the scripting
    // language has for a non-countable condition.
    if let Some(init) = &f.init {
        emit_stmt(w, init);
    }
    let cond = f.condition.as_ref().map(expr).unwrap_or_else(|| "True".to_string());
    w.write_line(&format!("while {}:", cond));
    w.indent();
    emit_body(w, &f.body);
    if let Some(update) = &f.update {
        emit_stmt(w, update);
    }
    w.dedent();
}

fn emit_while(w: &mut IndentWriter, wl: &While) {
    w.write_line(&format!("while {}:", expr(&wl.condition)));
    w.indent();
    emit_body(w, &wl.body);
    w.dedent();
}

/// Python's common subset has no `switch`; lower to an if/elif chain.
/// `Break` is dropped — the chain already can't fall through.
fn emit_switch(w: &mut IndentWriter, sw: &Switch) {
    for (idx, case) in sw.cases.iter().enumerate() {
        let kw = if idx == 0 { "if" } else { "elif" };
        w.write_line(&format!("{} {} == {}:", kw, expr(&sw.discriminant), expr(&case.value)));
        w.indent();
        emit_body(w, &strip_break(&case.body));
        w.dedent();
    }
    if let Some(default) = &sw.default {
        let kw = if sw.cases.is_empty() { "if True" } else { "else" };
        w.write_line(&format!("{}:", kw));
        w.indent();
        emit_body(w, &strip_break(default));
        w.dedent();
    }
}

fn strip_break(body: &[Stmt]) -> Vec<Stmt> {
    body.iter().filter(|s| !matches!(s, Stmt::Break)).cloned().collect()
}

fn emit_print(w: &mut IndentWriter, p: &Print) {
    let rendered = if let Some(fstring) = try_fstring(&p.args) {
        format!("print({})", fstring)
    } else {
        let parts: Vec<String> = p.args.iter().map(expr).collect();
        format!("print({})", parts.join(", "))
    };
    if p.newline {
        w.write_line(&rendered);
    } else {
        w.write_line(&rendered.replacen(')', ", end='')", 1));
    }
}

/// Reconstitutes an f-string from a decomposed Print argument sequence
/// (alternating literal segments and value expressions, per the
/// shared Print-argument-walk contract in spec.md §4.3). Returns
/// `None` when there's nothing to splice — a single plain argument is
/// left to the caller's comma-joined fallback.
fn try_fstring(args: &[Expr]) -> Option<String> {
    if args.len() < 2 {
        return None;
    }
    if !matches!(&args[0], Expr::Literal(l) if matches!(l.value, LiteralValue::Str(_))) {
        return None;
    }
    let mut out = String::from("f\"");
    for a in args {
        match a {
            Expr::Literal(l) => {
                if let LiteralValue::Str(s) = &l.value {
                    out.push_str(&s.replace('"', "\\\""));
                } else {
                    out.push_str(&format!("{{{}}}", expr(a)));
                }
            }
            other => out.push_str(&format!("{{{}}}", expr(other))),
        }
    }
    out.push('"');
    Some(out)
}

fn expr(e: &Expr) -> String {
    match e {
        Expr::Literal(l) => literal(l),
        Expr::Identifier(name) => remap_self(name),
        Expr::Call(c) => {
            let args: Vec<String> = c.args.iter().map(expr).collect();
            match &c.receiver {
                Some(recv) => format!("{}.{}({})", remap_self(recv), c.callee, args.join(", ")),
                None => format!("{}({})", c.callee, args.join(", ")),
            }
        }
        Expr::BinaryOp(b) => {
            if b.op == BinOp::Assign {
                return format!("{} = {}", expr(&b.left), expr(&b.right));
            }
            format!("{} {} {}", paren(&b.left), py_binop(b.op), paren(&b.right))
        }
        Expr::UnaryOp(u) => match u.op {
            UnOp::Not => format!("not {}", paren(&u.operand)),
            UnOp::Neg => format!("-{}", paren(&u.operand)),
            UnOp::PreInc | UnOp::PostInc => format!("({} + 1)", paren(&u.operand)),
            UnOp::PreDec | UnOp::PostDec => format!("({} - 1)", paren(&u.operand)),
        },
        Expr::Input(input) => input_call(input.prompt.as_deref(), input.target_type),
    }
}

fn paren(e: &Expr) -> String {
    match e {
        Expr::BinaryOp(_) => format!("({})", expr(e)),
        _ => expr(e),
    }
}

fn remap_self(name: &str) -> String {
    if name == "this" {
        "self".to_string()
    } else if let Some(rest) = name.strip_prefix("this.") {
        format!("self.{}", rest)
    } else {
        name.to_string()
    }
}

fn py_binop(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::Eq => "==",
        BinOp::NotEq => "!=",
        BinOp::Lt => "<",
        BinOp::LtEq => "<=",
        BinOp::Gt => ">",
        BinOp::GtEq => ">=",
        BinOp::And => "and",
        BinOp::Or => "or",
        BinOp::Assign => "=",
        BinOp::AddAssign => "+=",
        BinOp::SubAssign => "-=",
        BinOp::MulAssign => "*=",
        BinOp::DivAssign => "/=",
    }
}

fn literal(l: &xlc_ir::Literal) -> String {
    match &l.value {
        LiteralValue::Int(n) => n.to_string(),
        LiteralValue::Float(f) => {
            if f.fract() == 0.0 {
                format!("{:.1}", f)
            } else {
                f.to_string()
            }
        }
        LiteralValue::Str(s) => format!("{:?}", s),
        LiteralValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program_from(body: Vec<Stmt>) -> Program {
        Program { imports: vec![], body }
    }

    #[test]
    fn range_for_collapses_single_arg() {
        let mut w = IndentWriter::new("    ");
        let f = For {
            init: None,
            condition: None,
            update: None,
            range: Some(xlc_ir::RangeFor {
                iterator: "i".into(),
                start: Expr::Literal(xlc_ir::Literal {
                    value: LiteralValue::Int(0),
                    data_type: xlc_ir::DataType::Int,
                }),
                end: Expr::Literal(xlc_ir::Literal {
                    value: LiteralValue::Int(5),
                    data_type: xlc_ir::DataType::Int,
                }),
                step: Expr::Literal(xlc_ir::Literal {
                    value: LiteralValue::Int(1),
                    data_type: xlc_ir::DataType::Int,
                }),
            }),
            body: vec![Stmt::Print(Print {
                args: vec![Expr::Identifier("i".into())],
                newline: true,
                span: xlc_ir::Span::DUMMY,
            })],
            span: xlc_ir::Span::DUMMY,
        };
        emit_for(&mut w, &f);
        let out = w.finish();
        assert_eq!(out, "for i in range(5):\n    print(i)\n");
    }

    #[test]
    fn entry_point_shell_flattens() {
        let class = Class {
            name: "Main".into(),
            members: vec![],
            methods: vec![],
            constructor: None,
            main_method: Some(Function {
                name: "main".into(),
                params: vec![],
                return_type: xlc_ir::DataType::Void,
                body: vec![Stmt::Print(Print {
                    args: vec![Expr::Literal(xlc_ir::Literal {
                        value: LiteralValue::Str("hi".into()),
                        data_type: xlc_ir::DataType::String,
                    })],
                    newline: true,
                    span: xlc_ir::Span::DUMMY,
                })],
                span: xlc_ir::Span::DUMMY,
            }),
            static_methods: vec![],
            span: xlc_ir::Span::DUMMY,
        };
        let program = program_from(vec![Stmt::ClassDef(class)]);
        let mut emitter = PyEmitter::new();
        let out = emitter.emit(&program).unwrap();
        assert!(!out.contains("class"));
        assert!(out.contains("print(\"hi\")"));
    }
}
