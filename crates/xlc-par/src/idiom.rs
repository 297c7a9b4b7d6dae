//! Idiom recognition shared by all four parsers: classic counted loops
//! lifted into the range form, formatted-print strings decomposed into
//! interleaved value sequences, and counted-loop range normalization.
//! Kept in one place so every front-end applies the same rule.

use xlc_ir::{BinOp, Expr, Literal, LiteralValue, RangeFor, Stmt, UnOp};

/// `%d %s %f %c %i %x %X %o %u %e %E %g %G %p`, optionally preceded by
/// a `l`/`ll`/`h` length modifier (`%ld`, `%lf`, …).
fn directive_len(rest: &str) -> Option<usize> {
    let mut chars = rest.chars();
    let mut len = 0;
    for c in chars.by_ref() {
        len += 1;
        match c {
            'l' | 'h' => continue,
            'd' | 's' | 'f' | 'c' | 'i' | 'x' | 'X' | 'o' | 'u' | 'e' | 'E' | 'g' | 'G' | 'p' => {
                return Some(len)
            }
            _ => return None,
        }
    }
    None
}

/// Splits a C-style format string against its trailing arguments into
/// an interleaved `Print.args` sequence: literal segments followed by
/// one consumed argument per directive. Discards a literal trailing
/// `\n` in favor of the returned newline flag.
pub fn decompose_printf_format(format: &str, args: &[Expr]) -> (Vec<Expr>, bool) {
    let mut out = Vec::new();
    let mut literal = String::new();
    let mut arg_iter = args.iter();
    let chars: Vec<char> = format.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%' && i + 1 < chars.len() {
            let rest: String = chars[i + 1..].iter().collect();
            if let Some(len) = directive_len(&rest) {
                if !literal.is_empty() {
                    out.push(string_literal(std::mem::take(&mut literal)));
                }
                if let Some(arg) = arg_iter.next() {
                    out.push(arg.clone());
                }
                i += 1 + len;
                continue;
            }
        }
        literal.push(chars[i]);
        i += 1;
    }
    let newline = literal.ends_with('\n');
    if newline {
        literal.truncate(literal.len() - 1);
    }
    if !literal.is_empty() || out.is_empty() {
        out.push(string_literal(literal));
    }
    (out, newline)
}

/// Splits an f-string/interpolated literal on `{name}` placeholders
/// into alternating literal segments and identifier references.
pub fn decompose_interpolated(literal: &str) -> Vec<Expr> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut chars = literal.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' {
            let mut name = String::new();
            let mut closed = false;
            for nc in chars.by_ref() {
                if nc == '}' {
                    closed = true;
                    break;
                }
                name.push(nc);
            }
            if closed && !name.is_empty() {
                if !buf.is_empty() {
                    out.push(string_literal(std::mem::take(&mut buf)));
                }
                out.push(Expr::Identifier(name));
                continue;
            }
            buf.push('{');
            buf.push_str(&name);
            if closed {
                buf.push('}');
            }
            continue;
        }
        buf.push(c);
    }
    if !buf.is_empty() || out.is_empty() {
        out.push(string_literal(buf));
    }
    out
}

fn string_literal(text: String) -> Expr {
    Expr::Literal(Literal { value: LiteralValue::Str(text), data_type: xlc_ir::DataType::String })
}

/// Recognizes `for (init; cond; update) body` as a counted loop and
/// returns its range form: `init` must be a `Variable` with an
/// initializer, `cond` a `<`/`<=` comparison against that variable, and
/// `update` an increment of that same variable (`i++`, `++i`, or
/// `i += step`). A `<=` bound is normalized to an exclusive `end + 1`.
pub fn recognize_counted_loop(
    init: Option<&Stmt>,
    cond: Option<&Expr>,
    update: Option<&Stmt>,
) -> Option<RangeFor> {
    let var = match init {
        Some(Stmt::VarDecl(v)) if v.init.is_some() => v,
        _ => return None,
    };
    let cond = cond?;
    let (op, left, right) = match cond {
        Expr::BinaryOp(b) => (b.op, b.left.as_ref(), b.right.as_ref()),
        _ => return None,
    };
    if !matches!(op, BinOp::Lt | BinOp::LtEq) {
        return None;
    }
    if !matches!(left, Expr::Identifier(name) if name == &var.name) {
        return None;
    }

    let update_matches_var = |name: &str| name == var.name;
    let step = match update {
        Some(Stmt::Expr(Expr::UnaryOp(u)))
            if matches!(u.op, UnOp::PostInc | UnOp::PreInc)
                && matches!(&*u.operand, Expr::Identifier(n) if update_matches_var(n)) =>
        {
            one()
        }
        Some(Stmt::Expr(Expr::BinaryOp(b)))
            if b.op == BinOp::AddAssign
                && matches!(&*b.left, Expr::Identifier(n) if update_matches_var(n)) =>
        {
            (*b.right).clone()
        }
        _ => return None,
    };

    let end = if op == BinOp::LtEq {
        Expr::BinaryOp(xlc_ir::BinaryOp {
            op: BinOp::Add,
            left: Box::new(right.clone()),
            right: Box::new(int_literal(1)),
            span: xlc_ir::Span::DUMMY,
        })
    } else {
        right.clone()
    };

    Some(RangeFor {
        iterator: var.name.clone(),
        start: var.init.clone().unwrap(),
        end,
        step,
    })
}

fn one() -> Expr {
    int_literal(1)
}

fn int_literal(n: i64) -> Expr {
    Expr::Literal(Literal { value: LiteralValue::Int(n), data_type: xlc_ir::DataType::Int })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printf_decomposition_splits_directives_and_strips_newline() {
        let a = Expr::Identifier("a".into());
        let b = Expr::Identifier("b".into());
        let (args, newline) = decompose_printf_format("x=%d y=%s\n", &[a.clone(), b.clone()]);
        assert!(newline);
        assert_eq!(args.len(), 4);
        assert_eq!(args[1], a);
        assert_eq!(args[3], b);
    }

    #[test]
    fn interpolated_literal_splits_placeholders() {
        let segs = decompose_interpolated("hi {name}!");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[1], Expr::Identifier("name".into()));
    }
}
