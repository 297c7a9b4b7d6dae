//! Property: a lexer never aborts on arbitrary input (spec.md §4.1
//! failure semantics) — unrecognized bytes become single-character
//! `Punctuation` tokens, they never cause a panic or an infinite loop.

use proptest::prelude::*;

proptest! {
    #[test]
    fn py_never_panics(s in ".{0,200}") {
        let _ = xlc_lex::py::lex(&s);
    }

    #[test]
    fn c_never_panics(s in ".{0,200}") {
        let _ = xlc_lex::c::lex(&s);
    }

    #[test]
    fn cpp_never_panics(s in ".{0,200}") {
        let _ = xlc_lex::cpp::lex(&s);
    }

    #[test]
    fn jv_never_panics(s in ".{0,200}") {
        let _ = xlc_lex::jv::lex(&s);
    }

    #[test]
    fn py_terminates_on_ragged_indentation(s in "[ \\t]{0,8}[A-Za-z_:#\"'\\n]{0,40}") {
        let _ = xlc_lex::py::lex(&s);
    }
}
