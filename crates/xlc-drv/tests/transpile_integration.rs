//! Crate-level integration coverage for the orchestrator: round-trip
//! canonicalization, the class-less-C guard, and multi-target success
//! bookkeeping. The five literal scenarios live as unit tests in
//! `src/lib.rs` next to the code they pin down; this suite covers the
//! cross-cutting properties from spec.md §8 that need a full
//! `Transpiler` but aren't tied to one specific scenario.

use xlc_drv::{SourceLang, Transpiler, SENTINEL_NO_CLASS_IN_C};

#[test]
fn round_trip_py_through_py_is_idempotent_on_shape() {
    let source = "x = 10\nif x > 5:\n    print(x)\nelse:\n    print(0)\n";
    let mut t = Transpiler::new();
    let first = t.transpile(source, SourceLang::Scripting);
    let canonical = first.py.clone().expect("py self-emission");

    let second = t.transpile(&canonical, SourceLang::Scripting);
    assert_eq!(second.py, first.py);
}

#[test]
fn round_trip_c_through_c_is_idempotent_on_shape() {
    let source = "int main() { int x = 10; if (x > 5) { printf(\"%d\\n\", x); } return 0; }";
    let mut t = Transpiler::new();
    let first = t.transpile(source, SourceLang::CFamily);
    let canonical = first.c.clone().expect("c self-emission");

    let second = t.transpile(&canonical, SourceLang::CFamily);
    assert_eq!(second.c, first.c);
}

#[test]
fn every_non_c_target_produces_output_for_a_plain_program() {
    let mut t = Transpiler::new();
    let result = t.transpile("x = 1\nprint(x)\n", SourceLang::Scripting);
    assert!(result.py.is_some());
    assert!(result.c.is_some());
    assert!(result.cpp.is_some());
    assert!(result.jv.is_some());
    assert!(result.success);
    assert!(result.errors.is_empty());
}

#[test]
fn class_less_c_guard_fires_from_every_source_language() {
    let py_source = "class P:\n    def __init__(self):\n        self.n = 0\n";
    let cpp_source = "class P { private: int n; public: P() { n = 0; } };";

    let mut t = Transpiler::new();
    assert_eq!(
        t.transpile(py_source, SourceLang::Scripting).c.as_deref(),
        Some(SENTINEL_NO_CLASS_IN_C)
    );
    assert_eq!(
        t.transpile(cpp_source, SourceLang::CppFamily).c.as_deref(),
        Some(SENTINEL_NO_CLASS_IN_C)
    );
}

#[test]
fn entry_point_shell_never_trips_the_class_less_c_guard() {
    let source = "public class Main { public static void main(String[] args) { System.out.println(\"hi\"); } }";
    let mut t = Transpiler::new();
    let result = t.transpile(source, SourceLang::ClassBased);
    assert_ne!(result.c.as_deref(), Some(SENTINEL_NO_CLASS_IN_C));
    assert!(result.c.unwrap().contains("int main()"));
}

#[test]
fn a_transpiler_instance_is_reusable_across_calls() {
    let mut t = Transpiler::new();
    let a = t.transpile("x = 1\nprint(x)\n", SourceLang::Scripting);
    let b = t.transpile("y = 2\nprint(y)\n", SourceLang::Scripting);
    assert!(a.py.unwrap().contains("x = 1"));
    assert!(b.py.unwrap().contains("y = 2"));
}
