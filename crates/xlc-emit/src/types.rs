//! Shared `auto`-narrowing policy and a flattened variable-type table
//! used by the three statically typed emitters (C/CPP/JV) to pick a
//! format-string directive or declaration type for an identifier whose
//! declaration they've already walked past.
//!
//! Design notes §9: "auto" is the only bridge between the IR's dynamic
//! typing and a statically typed target. Since this crate does no
//! scope-aware type inference beyond local propagation (a non-goal),
//! the table is a single flat map built by one pass over the whole
//! program — good enough for the common subset's single-function,
//! single-scope programs, and a deliberate narrowing for anything
//! shadowed across scopes.

use std::collections::HashMap;
use xlc_ir::{DataType, Expr, Function, Program, Stmt};

/// Where an `auto`-tagged declaration sits, for the fixed per-position
/// narrowing policy in spec.md §9.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoPosition {
    Param,
    Local,
    Member,
}

/// Narrows `DataType::Auto` to a concrete type by the fixed policy:
/// parameter default = `string`, local default = `int`, struct member
/// default = the natural default for the position (also `int`, absent
/// better information — members only ever arrive via `self.x = …`
/// promotion, which carries no declared type either).
pub fn resolve_auto(ty: DataType, position: AutoPosition) -> DataType {
    match ty {
        DataType::Auto => match position {
            AutoPosition::Param => DataType::String,
            AutoPosition::Local | AutoPosition::Member => DataType::Int,
        },
        other => other,
    }
}

/// Flattens every `VarDecl`/parameter/class-member type declared
/// anywhere in the program into one name -> type table. Later
/// declarations of the same name win, matching the common subset's
/// lack of nested shadowing scopes.
pub fn collect_var_types(program: &Program) -> HashMap<String, DataType> {
    let mut table = HashMap::new();
    walk_stmts(&program.body, &mut table);
    table
}

fn walk_stmts(body: &[Stmt], table: &mut HashMap<String, DataType>) {
    for stmt in body {
        match stmt {
            Stmt::VarDecl(v) => {
                table.insert(v.name.clone(), resolve_auto(v.data_type, AutoPosition::Local));
            }
            Stmt::FunctionDef(f) => walk_function(f, table),
            Stmt::ClassDef(c) => {
                for member in &c.members {
                    table.insert(
                        member.name.clone(),
                        resolve_auto(member.data_type, AutoPosition::Member),
                    );
                }
                for m in &c.methods {
                    walk_function(m, table);
                }
                if let Some(ctor) = &c.constructor {
                    walk_function(ctor, table);
                }
                if let Some(main) = &c.main_method {
                    walk_function(main, table);
                }
                for s in &c.static_methods {
                    walk_function(s, table);
                }
            }
            Stmt::If(i) => {
                walk_stmts(&i.then_body, table);
                if let Some(e) = &i.else_body {
                    walk_stmts(e, table);
                }
                if let Some(ei) = &i.else_if {
                    walk_if(ei, table);
                }
            }
            Stmt::For(f) => {
                if let Some(init) = &f.init {
                    walk_stmts(std::slice::from_ref(init), table);
                }
                walk_stmts(&f.body, table);
            }
            Stmt::While(w) => walk_stmts(&w.body, table),
            Stmt::Switch(sw) => {
                for case in &sw.cases {
                    walk_stmts(&case.body, table);
                }
                if let Some(d) = &sw.default {
                    walk_stmts(d, table);
                }
            }
            Stmt::Input(input) => {
                if let (Some(name), Some(ty)) = (&input.target, input.target_type) {
                    table.insert(name.clone(), ty);
                }
            }
            _ => {}
        }
    }
}

fn walk_if(i: &xlc_ir::If, table: &mut HashMap<String, DataType>) {
    walk_stmts(&i.then_body, table);
    if let Some(e) = &i.else_body {
        walk_stmts(e, table);
    }
    if let Some(ei) = &i.else_if {
        walk_if(ei, table);
    }
}

fn walk_function(f: &Function, table: &mut HashMap<String, DataType>) {
    for p in &f.params {
        table.insert(p.name.clone(), resolve_auto(p.data_type, AutoPosition::Param));
    }
    walk_stmts(&f.body, table);
}

/// Best-effort type guess for a print-format directive or declaration
/// echo: known literal/declared types resolve directly; everything
/// else (an unseen identifier, a call result, a nested expression)
/// defaults to `int` per the design notes' "local default" policy.
pub fn guess_type(expr: &Expr, table: &HashMap<String, DataType>) -> DataType {
    match expr {
        Expr::Literal(lit) => lit.data_type,
        Expr::Identifier(name) => {
            let base = name.split('.').next_back().unwrap_or(name);
            table.get(base).copied().unwrap_or(DataType::Int)
        }
        Expr::Input(input) => input.target_type.unwrap_or(DataType::Int),
        Expr::BinaryOp(b) => {
            use xlc_ir::BinOp::*;
            match b.op {
                Eq | NotEq | Lt | LtEq | Gt | GtEq | And | Or => DataType::Bool,
                _ => {
                    let l = guess_type(&b.left, table);
                    let r = guess_type(&b.right, table);
                    if l == DataType::String || r == DataType::String {
                        DataType::String
                    } else if l == DataType::Float || r == DataType::Float {
                        DataType::Float
                    } else {
                        DataType::Int
                    }
                }
            }
        }
        Expr::UnaryOp(u) => guess_type(&u.operand, table),
        _ => DataType::Int,
    }
}
