//! xlc-drv - Orchestrator
//!
//! Ties the four front-ends (xlc-par) to the four back-ends (xlc-emit)
//! behind a single `Transpiler` holder. Given source text and a
//! source-language tag:
//!
//! 1. Dispatch to the matching parser, producing an IR `Program`.
//! 2. Compute the "has non-trivial classes" predicate.
//! 3. For each of the four targets, call the matching emitter — or,
//!    for C when the predicate holds, skip the emitter entirely and
//!    substitute the sentinel comment.
//! 4. Aggregate per-target errors into one list; `success` iff empty.
//!
//! The four parsers are plain functions (no state survives a call) and
//! the four emitters reinitialize their internal indent counters at
//! the top of `emit`, so a `Transpiler` can hold one instance of each
//! and reuse it across calls without any cross-call leakage — see the
//! concurrency note below.
//!
//! `Transpiler` is not `Sync` by convention: callers translating
//! concurrently should build one `Transpiler` per thread, or serialize
//! access themselves. Nothing here enforces that with a marker type;
//! it is a documented calling convention, not a compiler-checked one.

mod external;

pub use external::{
    sandbox_language, ExecutionOutcome, ReviewRequest, ReviewResponse, SandboxCompileResult,
    SandboxFile, SandboxRequest, SandboxResponse, SandboxRunResult,
};

use xlc_emit::{c::CEmitter, cpp::CppEmitter, jv::JvEmitter, py::PyEmitter, Emitter};
use xlc_ir::Program;

/// The fixed sentinel substituted for C output whenever the IR
/// contains a non-trivial class (spec.md §4.3, §7, §8).
pub const SENTINEL_NO_CLASS_IN_C: &str = "// C does not support classes";

/// One of the four source/target language tags (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLang {
    Scripting,
    CFamily,
    CppFamily,
    ClassBased,
}

impl SourceLang {
    /// The wire tag used by `TranspileResult` fields and the sandbox
    /// collaborator's language mapping.
    pub fn tag(self) -> &'static str {
        match self {
            SourceLang::Scripting => "scripting",
            SourceLang::CFamily => "c-family",
            SourceLang::CppFamily => "cpp-family",
            SourceLang::ClassBased => "class-based",
        }
    }

    /// The short label spec.md itself uses (PY/C/CPP/JV), for error
    /// message prefixes and CLI-facing display.
    pub fn label(self) -> &'static str {
        match self {
            SourceLang::Scripting => "PY",
            SourceLang::CFamily => "C",
            SourceLang::CppFamily => "CPP",
            SourceLang::ClassBased => "JV",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "scripting" | "py" | "python" => Some(SourceLang::Scripting),
            "c-family" | "c" => Some(SourceLang::CFamily),
            "cpp-family" | "cpp" | "c++" => Some(SourceLang::CppFamily),
            "class-based" | "jv" | "java" => Some(SourceLang::ClassBased),
            _ => None,
        }
    }

    pub const ALL: [SourceLang; 4] =
        [SourceLang::Scripting, SourceLang::CFamily, SourceLang::CppFamily, SourceLang::ClassBased];
}

impl std::fmt::Display for SourceLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Raised only at the CLI/config boundary when a user-supplied
/// language tag does not match any of the four known ones — the core
/// `transpile` operation itself never fails (spec.md §6: it always
/// returns a `TranspileResult`, partial outputs and all).
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("unknown source language tag: {0}")]
    UnknownLanguageTag(String),
}

/// Four optional target texts keyed by tag, a success flag, and an
/// error list whose entries are each prefixed by the target's label
/// (spec.md §6, §7).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranspileResult {
    pub py: Option<String>,
    pub c: Option<String>,
    pub cpp: Option<String>,
    pub jv: Option<String>,
    pub success: bool,
    pub errors: Vec<String>,
}

impl TranspileResult {
    pub fn get(&self, lang: SourceLang) -> Option<&str> {
        match lang {
            SourceLang::Scripting => self.py.as_deref(),
            SourceLang::CFamily => self.c.as_deref(),
            SourceLang::CppFamily => self.cpp.as_deref(),
            SourceLang::ClassBased => self.jv.as_deref(),
        }
    }
}

/// The stateful holder of four parsers (stateless functions, held only
/// conceptually) and four emitters (real per-call state, reset on
/// every `emit`). One `Transpiler` is meant to be built once and
/// reused across many `transpile` calls, mirroring the teacher
/// driver's long-lived `Session` rather than constructing fresh
/// emitters per call.
#[derive(Default)]
pub struct Transpiler {
    py: PyEmitter,
    c: CEmitter,
    cpp: CppEmitter,
    jv: JvEmitter,
}

impl Transpiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the full pipeline: parse with the matching front-end, then
    /// run every back-end (including the one matching `lang`, which
    /// serves as a canonicalizer and self-check per spec.md §2).
    pub fn transpile(&mut self, source: &str, lang: SourceLang) -> TranspileResult {
        let span = tracing::debug_span!("transpile", source_lang = lang.tag());
        let _enter = span.enter();

        let program = self.parse(source, lang);
        let guard_c = xlc_ir::has_non_trivial_class(&program);
        tracing::debug!(non_trivial_class = guard_c, "parsed program");

        let mut result = TranspileResult::default();

        result.py = self.run_emitter(SourceLang::Scripting, &program, &mut result.errors);
        result.c = if guard_c {
            Some(SENTINEL_NO_CLASS_IN_C.to_string())
        } else {
            self.run_emitter(SourceLang::CFamily, &program, &mut result.errors)
        };
        result.cpp = self.run_emitter(SourceLang::CppFamily, &program, &mut result.errors);
        result.jv = self.run_emitter(SourceLang::ClassBased, &program, &mut result.errors);

        result.success = result.errors.is_empty();
        result
    }

    fn parse(&self, source: &str, lang: SourceLang) -> Program {
        let span = tracing::trace_span!("parse", lang = lang.tag());
        let _enter = span.enter();
        match lang {
            SourceLang::Scripting => xlc_par::py::parse(source),
            SourceLang::CFamily => xlc_par::c::parse(source),
            SourceLang::CppFamily => xlc_par::cpp::parse(source),
            SourceLang::ClassBased => xlc_par::jv::parse(source),
        }
    }

    fn run_emitter(
        &mut self,
        target: SourceLang,
        program: &Program,
        errors: &mut Vec<String>,
    ) -> Option<String> {
        let span = tracing::trace_span!("emit", target = target.tag());
        let _enter = span.enter();
        let outcome: Result<String, xlc_emit::EmitError> = match target {
            SourceLang::Scripting => self.py.emit(program),
            SourceLang::CFamily => self.c.emit(program),
            SourceLang::CppFamily => self.cpp.emit(program),
            SourceLang::ClassBased => self.jv.emit(program),
        };
        match outcome {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!(target = target.tag(), error = %e, "emission failed");
                errors.push(format!("{} generation error: {}", target.label(), e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_one_py_to_c() {
        let source = "print('hi')\nx = 10\nif x > 5:\n    print(x)\n";
        let mut t = Transpiler::new();
        let result = t.transpile(source, SourceLang::Scripting);
        let c = result.c.expect("c output");
        assert!(c.contains("printf(\"hi\\n\");"));
        assert!(c.contains("int x = 10;"));
        assert!(c.contains("if (x > 5) {"));
    }

    #[test]
    fn scenario_two_c_to_py_range_loop() {
        let source = "int main() { for (int i = 0; i < 5; i++) { printf(\"%d\\n\", i); } return 0; }";
        let mut t = Transpiler::new();
        let result = t.transpile(source, SourceLang::CFamily);
        let py = result.py.expect("py output");
        assert!(py.contains("for i in range(5):"));
        assert!(py.contains("    print(i)"));
    }

    #[test]
    fn scenario_three_cpp_to_jv_println() {
        let source = "int main() { int x = 10; cout << \"x=\" << x << endl; return 0; }";
        let mut t = Transpiler::new();
        let result = t.transpile(source, SourceLang::CppFamily);
        let jv = result.jv.expect("jv output");
        assert!(jv.contains("System.out.println(\"x=\" + x);"));
    }

    #[test]
    fn scenario_four_jv_to_py_flattens_shell() {
        let source = "public class Main { public static void main(String[] args) { int x = 10; if (x > 5) System.out.println(x); } }";
        let mut t = Transpiler::new();
        let result = t.transpile(source, SourceLang::ClassBased);
        let py = result.py.expect("py output");
        assert!(!py.contains("class Main"));
        assert!(py.contains("x = 10"));
        assert!(py.contains("if x > 5:"));
        assert!(py.contains("    print(x)"));
    }

    #[test]
    fn scenario_five_py_class_guards_c_and_emits_cpp() {
        let source = "class P:\n    def __init__(self):\n        self.n = 0\n    def tick(self):\n        self.n = self.n + 1\n";
        let mut t = Transpiler::new();
        let result = t.transpile(source, SourceLang::Scripting);
        assert_eq!(result.c.as_deref(), Some(SENTINEL_NO_CLASS_IN_C));
        let cpp = result.cpp.expect("cpp output");
        assert!(cpp.contains("class P {"));
        assert!(cpp.contains("this->n = 0;"));
        assert_eq!(cpp.matches("this->n = 0;").count(), 1, "constructor body must not be duplicated with a default-init loop");
        assert!(cpp.contains("this->n = this->n + 1;"));
    }

    #[test]
    fn success_is_false_only_when_errors_present() {
        let mut t = Transpiler::new();
        let result = t.transpile("x = 1\n", SourceLang::Scripting);
        assert!(result.success);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn source_lang_tag_round_trips() {
        for lang in SourceLang::ALL {
            assert_eq!(SourceLang::from_tag(lang.tag()), Some(lang));
        }
        assert_eq!(SourceLang::from_tag("nonsense"), None);
    }
}
