//! Shared predicates used by both parsers (to build the `main_method`/
//! `static_methods` shape) and emitters (to decide flattening and the
//! class-less-C guard), kept in one place so the two sides never drift.

use crate::{Class, Program, Stmt};

/// A class whose only executable content is a static `main`-named
/// method: no members, no instance methods, no constructor, just an
/// attached entry point (optionally preceded by other static methods).
pub fn is_entry_point_shell(class: &Class) -> bool {
    class.members.is_empty()
        && class.methods.is_empty()
        && class.constructor.is_none()
        && class.main_method.is_some()
}

/// A class is trivial when flattening it loses nothing: either it's an
/// entry-point shell, or it has no members, methods, or constructor at
/// all (the degenerate empty class).
pub fn is_trivial_class(class: &Class) -> bool {
    is_entry_point_shell(class)
        || (class.members.is_empty() && class.methods.is_empty() && class.constructor.is_none())
}

/// True when the program contains any class that is not trivial —
/// the class-less-C guard's precondition for short-circuiting to the
/// sentinel comment.
pub fn has_non_trivial_class(program: &Program) -> bool {
    program.body.iter().any(|stmt| match stmt {
        Stmt::ClassDef(class) => !is_trivial_class(class),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataType, Function, Span, Variable};

    fn shell_class() -> Class {
        Class {
            name: "Main".into(),
            members: vec![],
            methods: vec![],
            constructor: None,
            main_method: Some(Function {
                name: "main".into(),
                params: vec![],
                return_type: DataType::Void,
                body: vec![],
                span: Span::DUMMY,
            }),
            static_methods: vec![],
            span: Span::DUMMY,
        }
    }

    #[test]
    fn entry_point_shell_is_trivial() {
        let class = shell_class();
        assert!(is_entry_point_shell(&class));
        assert!(is_trivial_class(&class));
    }

    #[test]
    fn class_with_member_is_non_trivial() {
        let mut class = shell_class();
        class.main_method = None;
        class.members.push(Variable {
            name: "n".into(),
            data_type: DataType::Int,
            init: None,
            is_const: false,
            span: Span::DUMMY,
        });
        assert!(!is_trivial_class(&class));

        let program = Program {
            imports: vec![],
            body: vec![Stmt::ClassDef(class)],
        };
        assert!(has_non_trivial_class(&program));
    }
}
