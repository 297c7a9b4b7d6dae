//! Emitter for the C++-family, class-capable target.
//!
//! The one target that can express every IR shape losslessly: real
//! classes, `cout`/`cin` console I/O, and `bool`/`string` as native
//! types. Used by the orchestrator as one of the three cross-language
//! targets and, when the source language is itself CPP, as the
//! canonicalizing self-check emitter (spec.md §2).

use std::collections::HashMap;

use xlc_ir::{
    BinOp, Class, DataType, Expr, For, Function, If, Literal, LiteralValue, Print, Program, Stmt,
    Switch, UnOp,
};

use crate::types::{collect_var_types, resolve_auto, AutoPosition};
use crate::{Emitter, IndentWriter};

#[derive(Default)]
pub struct CppEmitter {
    w: IndentWriter,
    var_types: HashMap<String, DataType>,
}

impl CppEmitter {
    pub fn new() -> Self {
        Self { w: IndentWriter::new("    "), var_types: HashMap::new() }
    }
}

impl Emitter for CppEmitter {
    fn emit(&mut self, program: &Program) -> Result<String, crate::EmitError> {
        self.w = IndentWriter::new("    ");
        self.var_types = collect_var_types(program);

        self.w.write_line("#include <iostream>");
        if self.var_types.values().any(|t| *t == DataType::String) {
            self.w.write_line("#include <string>");
        }
        self.w.write_line("using namespace std;");
        self.w.blank();

        for stmt in &program.body {
            match stmt {
                Stmt::ClassDef(c) if xlc_ir::is_entry_point_shell(c) => self.emit_shell(c),
                Stmt::ClassDef(c) => self.class_def(c),
                Stmt::FunctionDef(f) if f.name == "main" => self.emit_main_fn(f),
                other => self.stmt(other),
            }
        }

        Ok(std::mem::take(&mut self.w).finish())
    }
}

impl CppEmitter {
    fn emit_shell(&mut self, c: &Class) {
        for s in &c.static_methods {
            self.function(s);
            self.w.blank();
        }
        if let Some(main) = &c.main_method {
            self.emit_main_fn(main);
        }
    }

    fn emit_main_fn(&mut self, f: &Function) {
        self.w.write_line("int main() {");
        self.w.indent();
        for stmt in &f.body {
            self.stmt(stmt);
        }
        if !f.body.iter().any(|s| matches!(s, Stmt::Return(_))) {
            self.w.write_line("return 0;");
        }
        self.w.dedent();
        self.w.write_line("}");
    }

    /// Private members, then a public constructor, then public
    /// methods — the shape spec.md §4.3 prescribes for the Class
    /// emission contract. When the source supplied a constructor it
    /// runs verbatim (member initializers already appear as
    /// assignments in its body); only a memberful class with no
    /// constructor gets a synthesized one that default-inits each
    /// member.
    fn class_def(&mut self, c: &Class) {
        self.w.write_line(&format!("class {} {{", c.name));
        self.w.write_line("private:");
        self.w.indent();
        for m in &c.members {
            self.w.write_line(&format!("{} {};", cpp_type(resolve_auto(m.data_type, AutoPosition::Member)), m.name));
        }
        self.w.dedent();
        self.w.write_line("public:");
        self.w.indent();
        if let Some(ctor) = &c.constructor {
            self.constructor(c, ctor);
        } else if !c.members.is_empty() {
            self.w.write_line(&format!("{}() {{", c.name));
            self.w.indent();
            for m in &c.members {
                let default = m.init.as_ref().map(|e| self.expr(e)).unwrap_or_else(|| default_value(m.data_type));
                self.w.write_line(&format!("this->{} = {};", m.name, default));
            }
            self.w.dedent();
            self.w.write_line("}");
        }
        for m in &c.methods {
            self.method(m);
        }
        self.w.dedent();
        self.w.write_line("};");
    }

    fn constructor(&mut self, c: &Class, ctor: &Function) {
        let params: Vec<String> = ctor
            .params
            .iter()
            .map(|p| format!("{} {}", cpp_type(resolve_auto(p.data_type, AutoPosition::Param)), p.name))
            .collect();
        self.w.write_line(&format!("{}({}) {{", c.name, params.join(", ")));
        self.w.indent();
        for s in &ctor.body {
            self.stmt(s);
        }
        self.w.dedent();
        self.w.write_line("}");
    }

    fn function(&mut self, f: &Function) {
        let params: Vec<String> = f
            .params
            .iter()
            .map(|p| format!("{} {}", cpp_type(resolve_auto(p.data_type, AutoPosition::Param)), p.name))
            .collect();
        self.w.write_line(&format!("{} {}({}) {{", cpp_type(f.return_type), f.name, params.join(", ")));
        self.w.indent();
        for s in &f.body {
            self.stmt(s);
        }
        self.w.dedent();
        self.w.write_line("}");
    }

    fn method(&mut self, f: &Function) {
        self.function(f);
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Comment(c) => {
                for line in c.text.lines() {
                    self.w.write_line(&format!("// {}", line));
                }
            }
            Stmt::VarDecl(v) => {
                let ty = cpp_type(resolve_auto(v.data_type, AutoPosition::Local));
                let prefix = if v.is_const { "const " } else { "" };
                match &v.init {
                    Some(init) => self.w.write_line(&format!("{}{} {} = {};", prefix, ty, v.name, self.expr(init))),
                    None => self.w.write_line(&format!("{}{} {};", prefix, ty, v.name)),
                }
            }
            Stmt::Assignment(a) => {
                self.w.write_line(&format!("{} = {};", remap_self(&a.target), self.expr(&a.value)))
            }
            Stmt::FunctionDef(f) => self.function(f),
            Stmt::ClassDef(c) if xlc_ir::is_entry_point_shell(c) => self.emit_shell(c),
            Stmt::ClassDef(c) => self.class_def(c),
            Stmt::If(i) => self.if_chain(i, "if"),
            Stmt::For(f) => self.for_stmt(f),
            Stmt::While(wl) => {
                self.w.write_line(&format!("while ({}) {{", self.expr(&wl.condition)));
                self.w.indent();
                for s in &wl.body {
                    self.stmt(s);
                }
                self.w.dedent();
                self.w.write_line("}");
            }
            Stmt::Switch(sw) => self.switch_stmt(sw),
            Stmt::Break => self.w.write_line("break;"),
            Stmt::Return(r) => match &r.value {
                Some(v) => self.w.write_line(&format!("return {};", self.expr(v))),
                None => self.w.write_line("return;"),
            },
            Stmt::Print(p) => self.print_stmt(p),
            Stmt::Input(input) => {
                if let Some(target) = &input.target {
                    if let Some(prompt) = &input.prompt {
                        self.w.write_line(&format!("cout << \"{}\";", escape(prompt)));
                    }
                    self.w.write_line(&format!("cin >> {};", target));
                }
            }
            Stmt::Expr(e) => self.w.write_line(&format!("{};", self.expr(e))),
        }
    }

    fn if_chain(&mut self, i: &If, keyword: &str) {
        self.w.write_line(&format!("{} ({}) {{", keyword, self.expr(&i.condition)));
        self.w.indent();
        for s in &i.then_body {
            self.stmt(s);
        }
        self.w.dedent();
        if let Some(ei) = &i.else_if {
            self.if_chain(ei, "} else if");
        } else if let Some(body) = &i.else_body {
            self.w.write_line("} else {");
            self.w.indent();
            for s in body {
                self.stmt(s);
            }
            self.w.dedent();
            self.w.write_line("}");
        } else {
            self.w.write_line("}");
        }
    }

    fn for_stmt(&mut self, f: &For) {
        if let Some(r) = &f.range {
            self.w.write_line(&format!(
                "for (int {iter} = {start}; {iter} < {end}; {iter} += {step}) {{",
                iter = r.iterator,
                start = self.expr(&r.start),
                end = self.expr(&r.end),
                step = self.expr(&r.step),
            ));
        } else {
            let init = f.init.as_ref().map(|s| self.inline(s)).unwrap_or_default();
            let cond = f.condition.as_ref().map(|e| self.expr(e)).unwrap_or_default();
            let update = f.update.as_ref().map(|s| self.inline(s)).unwrap_or_default();
            self.w.write_line(&format!("for ({}; {}; {}) {{", init, cond, update));
        }
        self.w.indent();
        for s in &f.body {
            self.stmt(s);
        }
        self.w.dedent();
        self.w.write_line("}");
    }

    fn inline(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::VarDecl(v) => {
                let ty = cpp_type(resolve_auto(v.data_type, AutoPosition::Local));
                match &v.init {
                    Some(init) => format!("{} {} = {}", ty, v.name, self.expr(init)),
                    None => format!("{} {}", ty, v.name),
                }
            }
            Stmt::Assignment(a) => format!("{} = {}", remap_self(&a.target), self.expr(&a.value)),
            Stmt::Expr(e) => self.expr(e),
            _ => String::new(),
        }
    }

    fn switch_stmt(&mut self, sw: &Switch) {
        self.w.write_line(&format!("switch ({}) {{", self.expr(&sw.discriminant)));
        self.w.indent();
        for case in &sw.cases {
            self.w.write_line(&format!("case {}:", self.expr(&case.value)));
            self.w.indent();
            for s in &case.body {
                self.stmt(s);
            }
            self.w.dedent();
        }
        if let Some(default) = &sw.default {
            self.w.write_line("default:");
            self.w.indent();
            for s in default {
                self.stmt(s);
            }
            self.w.dedent();
        }
        self.w.dedent();
        self.w.write_line("}");
    }

    fn print_stmt(&mut self, p: &Print) {
        let chain = self.render_chain(&p.args);
        let suffix = if p.newline { " << endl" } else { "" };
        self.w.write_line(&format!("cout {}{};", chain, suffix));
    }

    /// Splices a (possibly decomposed) Print argument sequence into a
    /// `<<` chain: literal segments emit as string literals, anything
    /// else emits as the bare expression — same walk as the Python
    /// f-string reconstruction, different join token.
    fn render_chain(&self, args: &[Expr]) -> String {
        args.iter()
            .map(|a| match a {
                Expr::Literal(Literal { value: LiteralValue::Str(s), .. }) => {
                    format!("<< \"{}\"", escape(s))
                }
                other => format!("<< {}", self.expr(other)),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn expr(&self, e: &Expr) -> String {
        match e {
            Expr::Literal(l) => literal(l),
            Expr::Identifier(name) => remap_self(name),
            Expr::Call(c) => {
                let args: Vec<String> = c.args.iter().map(|a| self.expr(a)).collect();
                match &c.receiver {
                    Some(recv) => format!("{}.{}({})", remap_self(recv), c.callee, args.join(", ")),
                    None => format!("{}({})", c.callee, args.join(", ")),
                }
            }
            Expr::BinaryOp(b) => {
                format!("{} {} {}", self.paren(&b.left), cpp_binop(b.op), self.paren(&b.right))
            }
            Expr::UnaryOp(u) => self.unary(u),
            Expr::Input(_) => String::from("0"),
        }
    }

    fn unary(&self, u: &xlc_ir::UnaryOp) -> String {
        let operand = self.paren(&u.operand);
        match u.op {
            UnOp::Not => format!("!{}", operand),
            UnOp::Neg => format!("-{}", operand),
            UnOp::PreInc => format!("++{}", operand),
            UnOp::PreDec => format!("--{}", operand),
            UnOp::PostInc => format!("{}++", operand),
            UnOp::PostDec => format!("{}--", operand),
        }
    }

    fn paren(&self, e: &Expr) -> String {
        match e {
            Expr::BinaryOp(_) => format!("({})", self.expr(e)),
            _ => self.expr(e),
        }
    }
}

fn remap_self(name: &str) -> String {
    if name == "self" {
        "this".to_string()
    } else if let Some(rest) = name.strip_prefix("self.") {
        format!("this->{}", rest)
    } else {
        name.to_string()
    }
}

fn cpp_type(ty: DataType) -> &'static str {
    match ty {
        DataType::Int => "int",
        DataType::Float => "float",
        DataType::Double => "double",
        DataType::Char => "char",
        DataType::String => "string",
        DataType::Bool => "bool",
        DataType::Void => "void",
        DataType::Auto => "auto",
    }
}

fn default_value(ty: DataType) -> String {
    match ty {
        DataType::Int | DataType::Auto => "0".to_string(),
        DataType::Float | DataType::Double => "0.0".to_string(),
        DataType::Char => "'\\0'".to_string(),
        DataType::String => "\"\"".to_string(),
        DataType::Bool => "false".to_string(),
        DataType::Void => String::new(),
    }
}

fn cpp_binop(op: BinOp) -> &'static str {
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
        BinOp::And => "&&",
        BinOp::Or => "||",
        BinOp::Assign => "=",
        BinOp::AddAssign => "+=",
        BinOp::SubAssign => "-=",
        BinOp::MulAssign => "*=",
        BinOp::DivAssign => "/=",
    }
}

fn literal(l: &Literal) -> String {
    match &l.value {
        LiteralValue::Int(n) => n.to_string(),
        LiteralValue::Float(f) => format!("{}", f),
        LiteralValue::Str(s) => format!("\"{}\"", escape(s)),
        LiteralValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use xlc_ir::*;

    #[test]
    fn scenario_five_class_to_cpp() {
        let ctor = Function {
            name: CONSTRUCTOR_NAME.into(),
            params: vec![],
            return_type: DataType::Void,
            body: vec![Stmt::Assignment(Assignment {
                target: "self.n".into(),
                value: Expr::Literal(Literal { value: LiteralValue::Int(0), data_type: DataType::Int }),
                span: Span::DUMMY,
            })],
            span: Span::DUMMY,
        };
        let tick = Function {
            name: "tick".into(),
            params: vec![],
            return_type: DataType::Void,
            body: vec![Stmt::Assignment(Assignment {
                target: "self.n".into(),
                value: Expr::BinaryOp(BinaryOp {
                    op: BinOp::Add,
                    left: Box::new(Expr::Identifier("self.n".into())),
                    right: Box::new(Expr::Literal(Literal { value: LiteralValue::Int(1), data_type: DataType::Int })),
                    span: Span::DUMMY,
                }),
                span: Span::DUMMY,
            })],
            span: Span::DUMMY,
        };
        let class = Class {
            name: "P".into(),
            members: vec![Variable {
                name: "n".into(),
                data_type: DataType::Int,
                init: None,
                is_const: false,
                span: Span::DUMMY,
            }],
            methods: vec![tick],
            constructor: Some(ctor),
            main_method: None,
            static_methods: vec![],
            span: Span::DUMMY,
        };
        let program = Program { imports: vec![], body: vec![Stmt::ClassDef(class)] };
        let mut emitter = CppEmitter::new();
        let out = emitter.emit(&program).unwrap();
        assert!(out.contains("class P {"));
        assert!(out.contains("int n;"));
        assert!(out.contains("P() {"));
        assert!(out.contains("void tick() {"));
        assert!(out.contains("this->n = this->n + 1;"));
        // constructor body runs exactly once: no default-init loop ahead of it
        assert_eq!(out.matches("this->n = 0;").count(), 1);
    }
}
