//! Emitter for the class-based managed-language target.
//!
//! Unlike the other three, JV never flattens an entry-point class
//! shell (spec.md §4.3: "JV emits the original class scaffold") —
//! every program comes out wrapped in a `public class` with a
//! `public static void main`, because that's the only legal shape the
//! language has for a top-level program.

use std::collections::HashMap;

use xlc_ir::{
    BinOp, Class, DataType, Expr, For, Function, If, Literal, LiteralValue, Print, Program, Stmt,
    Switch, UnOp,
};

use crate::types::{collect_var_types, resolve_auto, AutoPosition};
use crate::{Emitter, IndentWriter};

#[derive(Default)]
pub struct JvEmitter {
    w: IndentWriter,
    var_types: HashMap<String, DataType>,
    needs_scanner: bool,
}

impl JvEmitter {
    pub fn new() -> Self {
        Self { w: IndentWriter::new("    "), var_types: HashMap::new(), needs_scanner: false }
    }
}

impl Emitter for JvEmitter {
    fn emit(&mut self, program: &Program) -> Result<String, crate::EmitError> {
        self.w = IndentWriter::new("    ");
        self.var_types = collect_var_types(program);
        self.needs_scanner = program_has_input(program);

        let explicit_class = program.body.iter().find_map(|s| match s {
            Stmt::ClassDef(c) => Some(c),
            _ => None,
        });

        match explicit_class {
            Some(c) if xlc_ir::is_entry_point_shell(c) => self.entry_class(c),
            Some(c) => {
                self.class_def(c);
            }
            None => {
                // A bare top-level program (or a lone `Function` named
                // `main`): wrap it the way the language requires.
                self.synthesize_main(program);
            }
        }

        Ok(std::mem::take(&mut self.w).finish())
    }
}

fn program_has_input(program: &Program) -> bool {
    fn if_has_input(i: &If) -> bool {
        in_stmts(&i.then_body)
            || i.else_body.as_deref().is_some_and(in_stmts)
            || i.else_if.as_deref().is_some_and(if_has_input)
    }
    fn in_stmts(body: &[Stmt]) -> bool {
        body.iter().any(|s| match s {
            Stmt::Input(_) => true,
            Stmt::If(i) => if_has_input(i),
            Stmt::For(f) => in_stmts(&f.body),
            Stmt::While(w) => in_stmts(&w.body),
            Stmt::Switch(sw) => {
                sw.cases.iter().any(|c| in_stmts(&c.body)) || sw.default.as_deref().is_some_and(in_stmts)
            }
            Stmt::FunctionDef(f) => in_stmts(&f.body),
            Stmt::ClassDef(c) => {
                c.methods.iter().any(|m| in_stmts(&m.body))
                    || c.constructor.as_ref().is_some_and(|f| in_stmts(&f.body))
                    || c.main_method.as_ref().is_some_and(|f| in_stmts(&f.body))
                    || c.static_methods.iter().any(|m| in_stmts(&m.body))
            }
            _ => false,
        })
    }
    in_stmts(&program.body)
}

impl JvEmitter {
    fn scanner_decl(&mut self) {
        if self.needs_scanner {
            self.w.write_line("Scanner scanner = new Scanner(System.in);");
        }
    }

    fn entry_class(&mut self, c: &Class) {
        self.w.write_line("import java.util.Scanner;");
        self.w.blank();
        self.w.write_line(&format!("public class {} {{", c.name));
        self.w.indent();
        for s in &c.static_methods {
            self.static_method(s);
        }
        if let Some(main) = &c.main_method {
            self.w.write_line("public static void main(String[] args) {");
            self.w.indent();
            self.scanner_decl();
            for stmt in &main.body {
                self.stmt(stmt);
            }
            self.w.dedent();
            self.w.write_line("}");
        }
        self.w.dedent();
        self.w.write_line("}");
    }

    fn synthesize_main(&mut self, program: &Program) {
        self.w.write_line("import java.util.Scanner;");
        self.w.blank();
        self.w.write_line("public class Main {");
        self.w.indent();
        self.w.write_line("public static void main(String[] args) {");
        self.w.indent();
        self.scanner_decl();
        for stmt in &program.body {
            match stmt {
                Stmt::FunctionDef(f) if f.name == "main" => {
                    for s in &f.body {
                        self.stmt(s);
                    }
                }
                other => self.stmt(other),
            }
        }
        self.w.dedent();
        self.w.write_line("}");
        self.w.dedent();
        self.w.write_line("}");
    }

    fn class_def(&mut self, c: &Class) {
        self.w.write_line("import java.util.Scanner;");
        self.w.blank();
        self.w.write_line(&format!("public class {} {{", c.name));
        self.w.indent();
        for m in &c.members {
            self.w.write_line(&format!(
                "private {} {};",
                java_type(resolve_auto(m.data_type, AutoPosition::Member)),
                m.name
            ));
        }
        if let Some(ctor) = &c.constructor {
            self.constructor(c, ctor);
        } else if !c.members.is_empty() {
            self.w.write_line(&format!("public {}() {{", c.name));
            self.w.indent();
            for m in &c.members {
                let default = m.init.as_ref().map(|e| self.expr(e)).unwrap_or_else(|| default_value(m.data_type));
                self.w.write_line(&format!("this.{} = {};", m.name, default));
            }
            self.w.dedent();
            self.w.write_line("}");
        }
        for m in &c.methods {
            self.method(m);
        }
        for m in &c.static_methods {
            self.static_method(m);
        }
        self.w.dedent();
        self.w.write_line("}");
    }

    fn constructor(&mut self, c: &Class, ctor: &Function) {
        let params: Vec<String> = ctor
            .params
            .iter()
            .map(|p| format!("{} {}", java_type(resolve_auto(p.data_type, AutoPosition::Param)), p.name))
            .collect();
        self.w.write_line(&format!("public {}({}) {{", c.name, params.join(", ")));
        self.w.indent();
        for s in &ctor.body {
            self.stmt(s);
        }
        self.w.dedent();
        self.w.write_line("}");
    }

    fn method(&mut self, f: &Function) {
        let params: Vec<String> = f
            .params
            .iter()
            .map(|p| format!("{} {}", java_type(resolve_auto(p.data_type, AutoPosition::Param)), p.name))
            .collect();
        self.w.write_line(&format!("public {} {}({}) {{", java_type(f.return_type), f.name, params.join(", ")));
        self.w.indent();
        for s in &f.body {
            self.stmt(s);
        }
        self.w.dedent();
        self.w.write_line("}");
    }

    fn static_method(&mut self, f: &Function) {
        let params: Vec<String> = f
            .params
            .iter()
            .map(|p| format!("{} {}", java_type(resolve_auto(p.data_type, AutoPosition::Param)), p.name))
            .collect();
        self.w.write_line(&format!("public static {} {}({}) {{", java_type(f.return_type), f.name, params.join(", ")));
        self.w.indent();
        for s in &f.body {
            self.stmt(s);
        }
        self.w.dedent();
        self.w.write_line("}");
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Comment(c) => {
                for line in c.text.lines() {
                    self.w.write_line(&format!("// {}", line));
                }
            }
            Stmt::VarDecl(v) => {
                let ty = java_type(resolve_auto(v.data_type, AutoPosition::Local));
                let prefix = if v.is_const { "final " } else { "" };
                match &v.init {
                    Some(init) => self.w.write_line(&format!("{}{} {} = {};", prefix, ty, v.name, self.expr(init))),
                    None => self.w.write_line(&format!("{}{} {};", prefix, ty, v.name)),
                }
            }
            Stmt::Assignment(a) => {
                self.w.write_line(&format!("{} = {};", remap_self(&a.target), self.expr(&a.value)))
            }
            Stmt::FunctionDef(f) => self.method(f),
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
            Stmt::Input(input) => self.input_stmt(input),
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
                let ty = java_type(resolve_auto(v.data_type, AutoPosition::Local));
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
        let method = if p.newline { "println" } else { "print" };
        let spliced = self.render_splice(&p.args);
        self.w.write_line(&format!("System.out.{}({});", method, spliced));
    }

    /// Splices a (possibly decomposed) Print argument sequence with
    /// `+`: literal segments emit as string literals, everything else
    /// emits as the bare expression — the same walk the Python and
    /// CPP emitters do, joined on `+` instead of an f-string or `<<`.
    fn render_splice(&self, args: &[Expr]) -> String {
        if args.is_empty() {
            return "\"\"".to_string();
        }
        args.iter()
            .map(|a| match a {
                Expr::Literal(Literal { value: LiteralValue::Str(s), .. }) => format!("\"{}\"", escape(s)),
                other => self.expr(other),
            })
            .collect::<Vec<_>>()
            .join(" + ")
    }

    fn input_stmt(&mut self, input: &xlc_ir::Input) {
        let call = match input.target_type {
            Some(DataType::Int) => "scanner.nextInt()",
            Some(DataType::Float) | Some(DataType::Double) => "scanner.nextDouble()",
            _ => "scanner.nextLine()",
        };
        if let Some(prompt) = &input.prompt {
            self.w.write_line(&format!("System.out.print(\"{}\");", escape(prompt)));
        }
        if let Some(target) = &input.target {
            self.w.write_line(&format!("{} = {};", target, call));
        }
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
                if b.op == BinOp::Add {
                    let lt = super::types::guess_type(&b.left, &self.var_types);
                    let rt = super::types::guess_type(&b.right, &self.var_types);
                    if lt == DataType::String || rt == DataType::String {
                        return format!("{} + {}", self.paren(&b.left), self.paren(&b.right));
                    }
                }
                format!("{} {} {}", self.paren(&b.left), java_binop(b.op), self.paren(&b.right))
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
        format!("this.{}", rest)
    } else {
        name.to_string()
    }
}

fn java_type(ty: DataType) -> &'static str {
    match ty {
        DataType::Int => "int",
        DataType::Float => "float",
        DataType::Double => "double",
        DataType::Char => "char",
        DataType::String => "String",
        DataType::Bool => "boolean",
        DataType::Void => "void",
        DataType::Auto => "int",
    }
}

fn default_value(ty: DataType) -> String {
    match ty {
        DataType::Int | DataType::Auto => "0".to_string(),
        DataType::Float | DataType::Double => "0.0".to_string(),
        DataType::Char => "'\\0'".to_string(),
        DataType::String => "null".to_string(),
        DataType::Bool => "false".to_string(),
        DataType::Void => String::new(),
    }
}

fn java_binop(op: BinOp) -> &'static str {
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
    fn scenario_three_cout_to_println() {
        let program = Program {
            imports: vec![],
            body: vec![Stmt::Print(Print {
                args: vec![
                    Expr::Literal(Literal { value: LiteralValue::Str("x=".into()), data_type: DataType::String }),
                    Expr::Identifier("x".into()),
                ],
                newline: true,
                span: Span::DUMMY,
            })],
        };
        let mut emitter = JvEmitter::new();
        let out = emitter.emit(&program).unwrap();
        assert!(out.contains("System.out.println(\"x=\" + x);"));
    }

    #[test]
    fn scenario_four_entry_shell_keeps_wrapper() {
        let class = Class {
            name: "Main".into(),
            members: vec![],
            methods: vec![],
            constructor: None,
            main_method: Some(Function {
                name: "main".into(),
                params: vec![],
                return_type: DataType::Void,
                body: vec![
                    Stmt::VarDecl(Variable {
                        name: "x".into(),
                        data_type: DataType::Int,
                        init: Some(Expr::Literal(Literal { value: LiteralValue::Int(10), data_type: DataType::Int })),
                        is_const: false,
                        span: Span::DUMMY,
                    }),
                    Stmt::If(If {
                        condition: Expr::BinaryOp(BinaryOp {
                            op: BinOp::Gt,
                            left: Box::new(Expr::Identifier("x".into())),
                            right: Box::new(Expr::Literal(Literal { value: LiteralValue::Int(5), data_type: DataType::Int })),
                            span: Span::DUMMY,
                        }),
                        then_body: vec![Stmt::Print(Print {
                            args: vec![Expr::Identifier("x".into())],
                            newline: true,
                            span: Span::DUMMY,
                        })],
                        else_body: None,
                        else_if: None,
                        span: Span::DUMMY,
                    }),
                ],
                span: Span::DUMMY,
            }),
            static_methods: vec![],
            span: Span::DUMMY,
        };
        let program = Program { imports: vec![], body: vec![Stmt::ClassDef(class)] };
        let mut emitter = JvEmitter::new();
        let out = emitter.emit(&program).unwrap();
        assert!(out.contains("public class Main {"));
        assert!(out.contains("public static void main(String[] args) {"));
    }
}
