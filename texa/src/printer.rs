// printer.rs — Human-readable listing of IR trees
//
// C-like rendering used by `--emit ir`, diagnostics and snapshot tests.
// Statements are printed one per line with two-space indentation.

use std::fmt::{self, Write};

use crate::ir::*;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::IntImm(i) => write!(f, "{}", i.value),
            Expr::FloatImm(v) => write!(f, "{:?}", v.value),
            Expr::Var(v) => f.write_str(&v.name),
            Expr::Cast(c) => write!(f, "{}({})", c.dtype, c.src),
            Expr::Binary(b) => match b.op.symbol() {
                Some(sym) => write!(f, "({} {} {})", b.lhs, sym, b.rhs),
                None => {
                    let name = if b.op == BinaryOpKind::Max { "Max" } else { "Min" };
                    write!(f, "{}({}, {})", name, b.lhs, b.rhs)
                }
            },
            Expr::CompareSelect(c) => write!(
                f,
                "({} {} {} ? {} : {})",
                c.lhs,
                c.op.symbol(),
                c.rhs,
                c.ret_val1,
                c.ret_val2
            ),
            Expr::IfThenElse(i) => write!(
                f,
                "IfThenElse({}, {}, {})",
                i.condition, i.true_value, i.false_value
            ),
            Expr::Load(l) => {
                write!(f, "{}[", l.buf.name_hint)?;
                write_list(f, &l.indices)?;
                f.write_char(']')
            }
            Expr::FunctionCall(c) => {
                write!(f, "{}(", c.tensor.buf.name_hint)?;
                write_list(f, &c.params)?;
                f.write_char(')')
            }
            Expr::Intrinsics(i) => {
                write!(f, "{}(", i.op.name())?;
                write_list(f, &i.params)?;
                f.write_char(')')
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, exprs: &[Expr]) -> fmt::Result {
    for (i, e) in exprs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", e)?;
    }
    Ok(())
}

fn pad(f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        f.write_str("  ")?;
    }
    Ok(())
}

/// Write `{`, the body's statements one level deeper, then `}` (no newline).
/// A block body is flattened into the braces.
fn write_body(f: &mut fmt::Formatter<'_>, body: &Stmt, indent: usize) -> fmt::Result {
    f.write_str("{\n")?;
    match body {
        Stmt::Block(b) => {
            for s in &b.stmts {
                write_stmt(f, s, indent + 1)?;
            }
        }
        other => write_stmt(f, other, indent + 1)?,
    }
    pad(f, indent)?;
    f.write_char('}')
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, indent: usize) -> fmt::Result {
    pad(f, indent)?;
    match stmt {
        Stmt::Block(b) => {
            f.write_str("{\n")?;
            for s in &b.stmts {
                write_stmt(f, s, indent + 1)?;
            }
            pad(f, indent)?;
            f.write_str("}\n")
        }
        Stmt::Store(s) => {
            write!(f, "{}[", s.buf.name_hint)?;
            write_list(f, &s.indices)?;
            writeln!(f, "] = {};", s.value)
        }
        Stmt::For(l) => {
            write!(
                f,
                "for ({} {} = {}; {} < {}; {}++) ",
                l.var.dtype, l.var.name, l.start, l.var.name, l.stop, l.var.name
            )?;
            write_body(f, &l.body, indent)?;
            f.write_char('\n')
        }
        Stmt::Cond(c) => {
            write!(f, "if ({}) ", c.condition)?;
            match &c.true_stmt {
                Some(t) => write_body(f, t, indent)?,
                None => f.write_str("{}")?,
            }
            if let Some(e) = &c.false_stmt {
                f.write_str(" else ")?;
                write_body(f, e, indent)?;
            }
            f.write_char('\n')
        }
        Stmt::Let(l) => writeln!(f, "{} {} = {};", l.var.dtype, l.var.name, l.value),
        Stmt::Allocate(a) => {
            write!(f, "Allocate({}, {}, {{", a.buf.name_hint, a.buf.dtype)?;
            write_list(f, &a.buf.dims)?;
            f.write_str("});\n")
        }
        Stmt::Free(fr) => writeln!(f, "Free({});", fr.buf.name_hint),
    }
}
