// ir.rs — Tensor-expression IR node types
//
// Immutable tree of expressions and statements consumed by the analyses.
// Every concrete node kind is its own struct so analyses can borrow and
// return the exact kind they collect; `Expr` and `Stmt` are closed sum types
// over those structs.
//
// Preconditions: none (data-only module).
// Postconditions: variables and buffers carry stable ids; equality of
//   identity is id equality, never name equality.
// Failure modes: none.
// Side effects: none.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{BufId, VarId};

// ── Scalar types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dtype {
    Bool,
    Int,
    Long,
    Float,
    Double,
    /// Opaque pointer type of a buffer's base handle.
    Handle,
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dtype::Bool => "bool",
            Dtype::Int => "int",
            Dtype::Long => "long",
            Dtype::Float => "float",
            Dtype::Double => "double",
            Dtype::Handle => "handle",
        };
        f.write_str(name)
    }
}

// ── Operation kinds ─────────────────────────────────────────────────────────

/// Fixed set of intrinsic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntrinsicsOp {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Sigmoid,
    Exp,
    Expm1,
    Fabs,
    Log,
    Log2,
    Log10,
    Log1p,
    Erf,
    Erfc,
    Sqrt,
    Rsqrt,
    Pow,
    Ceil,
    Floor,
    Round,
    Trunc,
    Fmod,
    Remainder,
    Lgamma,
    Frac,
    /// Uniform random draw. The only nondeterministic intrinsic.
    Rand,
}

impl IntrinsicsOp {
    pub fn name(self) -> &'static str {
        match self {
            IntrinsicsOp::Sin => "sin",
            IntrinsicsOp::Cos => "cos",
            IntrinsicsOp::Tan => "tan",
            IntrinsicsOp::Asin => "asin",
            IntrinsicsOp::Acos => "acos",
            IntrinsicsOp::Atan => "atan",
            IntrinsicsOp::Atan2 => "atan2",
            IntrinsicsOp::Sinh => "sinh",
            IntrinsicsOp::Cosh => "cosh",
            IntrinsicsOp::Tanh => "tanh",
            IntrinsicsOp::Sigmoid => "sigmoid",
            IntrinsicsOp::Exp => "exp",
            IntrinsicsOp::Expm1 => "expm1",
            IntrinsicsOp::Fabs => "fabs",
            IntrinsicsOp::Log => "log",
            IntrinsicsOp::Log2 => "log2",
            IntrinsicsOp::Log10 => "log10",
            IntrinsicsOp::Log1p => "log1p",
            IntrinsicsOp::Erf => "erf",
            IntrinsicsOp::Erfc => "erfc",
            IntrinsicsOp::Sqrt => "sqrt",
            IntrinsicsOp::Rsqrt => "rsqrt",
            IntrinsicsOp::Pow => "pow",
            IntrinsicsOp::Ceil => "ceil",
            IntrinsicsOp::Floor => "floor",
            IntrinsicsOp::Round => "round",
            IntrinsicsOp::Trunc => "trunc",
            IntrinsicsOp::Fmod => "fmod",
            IntrinsicsOp::Remainder => "remainder",
            IntrinsicsOp::Lgamma => "lgamma",
            IntrinsicsOp::Frac => "frac",
            IntrinsicsOp::Rand => "rand",
        }
    }

    /// Number of operands the operation takes.
    pub fn arity(self) -> usize {
        match self {
            IntrinsicsOp::Rand => 0,
            IntrinsicsOp::Atan2
            | IntrinsicsOp::Pow
            | IntrinsicsOp::Fmod
            | IntrinsicsOp::Remainder => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Max,
    Min,
    And,
    Or,
    Xor,
    Lshift,
    Rshift,
}

impl BinaryOpKind {
    /// Infix symbol, or `None` for operations printed in call form.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            BinaryOpKind::Add => Some("+"),
            BinaryOpKind::Sub => Some("-"),
            BinaryOpKind::Mul => Some("*"),
            BinaryOpKind::Div => Some("/"),
            BinaryOpKind::Mod => Some("%"),
            BinaryOpKind::And => Some("&"),
            BinaryOpKind::Or => Some("|"),
            BinaryOpKind::Xor => Some("^"),
            BinaryOpKind::Lshift => Some("<<"),
            BinaryOpKind::Rshift => Some(">>"),
            BinaryOpKind::Max | BinaryOpKind::Min => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareSelectOperation {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareSelectOperation {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareSelectOperation::Eq => "==",
            CompareSelectOperation::Ne => "!=",
            CompareSelectOperation::Gt => ">",
            CompareSelectOperation::Ge => ">=",
            CompareSelectOperation::Lt => "<",
            CompareSelectOperation::Le => "<=",
        }
    }
}

// ── Identity-bearing entities ───────────────────────────────────────────────

/// A variable. Every occurrence of the same variable carries the same `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Var {
    pub id: VarId,
    pub name: String,
    pub dtype: Dtype,
}

/// A named storage location. `name_hint` need not be unique; `id` is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buf {
    pub id: BufId,
    pub name_hint: String,
    /// Base pointer of the storage.
    pub base: Var,
    pub dims: Vec<Expr>,
    pub dtype: Dtype,
}

impl Buf {
    pub fn name_hint(&self) -> &str {
        &self.name_hint
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }
}

/// Handle to a tensor-level computation whose result lives in `buf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    pub buf: Buf,
}

// ── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntImm {
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatImm {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cast {
    pub dtype: Dtype,
    pub src: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOp {
    pub op: BinaryOpKind,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

/// `lhs <op> rhs ? ret_val1 : ret_val2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareSelect {
    pub op: CompareSelectOperation,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub ret_val1: Box<Expr>,
    pub ret_val2: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfThenElse {
    pub condition: Box<Expr>,
    pub true_value: Box<Expr>,
    pub false_value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub buf: Buf,
    pub indices: Vec<Expr>,
}

/// Materialization of a tensor computation at `params`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub tensor: Tensor,
    pub params: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    pub op: IntrinsicsOp,
    pub params: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    IntImm(IntImm),
    FloatImm(FloatImm),
    Var(Var),
    Cast(Cast),
    Binary(BinaryOp),
    CompareSelect(CompareSelect),
    IfThenElse(IfThenElse),
    Load(Load),
    FunctionCall(FunctionCall),
    Intrinsics(Intrinsics),
}

impl Expr {
    pub fn int(value: i64) -> Expr {
        Expr::IntImm(IntImm { value })
    }

    pub fn float(value: f64) -> Expr {
        Expr::FloatImm(FloatImm { value })
    }

    pub fn var(var: &Var) -> Expr {
        Expr::Var(var.clone())
    }

    pub fn cast(dtype: Dtype, src: Expr) -> Expr {
        Expr::Cast(Cast {
            dtype,
            src: Box::new(src),
        })
    }

    pub fn binary(op: BinaryOpKind, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinaryOpKind::Add, lhs, rhs)
    }

    pub fn mul(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinaryOpKind::Mul, lhs, rhs)
    }

    pub fn compare_select(
        op: CompareSelectOperation,
        lhs: Expr,
        rhs: Expr,
        ret_val1: Expr,
        ret_val2: Expr,
    ) -> Expr {
        Expr::CompareSelect(CompareSelect {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            ret_val1: Box::new(ret_val1),
            ret_val2: Box::new(ret_val2),
        })
    }

    pub fn if_then_else(condition: Expr, true_value: Expr, false_value: Expr) -> Expr {
        Expr::IfThenElse(IfThenElse {
            condition: Box::new(condition),
            true_value: Box::new(true_value),
            false_value: Box::new(false_value),
        })
    }

    pub fn load(buf: &Buf, indices: Vec<Expr>) -> Expr {
        Expr::Load(Load {
            buf: buf.clone(),
            indices,
        })
    }

    pub fn call(tensor: &Tensor, params: Vec<Expr>) -> Expr {
        Expr::FunctionCall(FunctionCall {
            tensor: tensor.clone(),
            params,
        })
    }

    pub fn intrinsic(op: IntrinsicsOp, params: Vec<Expr>) -> Expr {
        Expr::Intrinsics(Intrinsics { op, params })
    }

    pub fn rand() -> Expr {
        Expr::intrinsic(IntrinsicsOp::Rand, Vec::new())
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Expr::Var(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_load(&self) -> Option<&Load> {
        match self {
            Expr::Load(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match self {
            Expr::FunctionCall(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_intrinsics(&self) -> Option<&Intrinsics> {
        match self {
            Expr::Intrinsics(i) => Some(i),
            _ => None,
        }
    }
}

// ── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

/// `buf[indices] = value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub buf: Buf,
    pub indices: Vec<Expr>,
    pub value: Expr,
}

/// `for (var = start; var < stop; var++) body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct For {
    pub var: Var,
    pub start: Expr,
    pub stop: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cond {
    pub condition: Expr,
    pub true_stmt: Option<Box<Stmt>>,
    pub false_stmt: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Let {
    pub var: Var,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocate {
    pub buf: Buf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Free {
    pub buf: Buf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    Block(Block),
    Store(Store),
    For(For),
    Cond(Cond),
    Let(Let),
    Allocate(Allocate),
    Free(Free),
}

impl Stmt {
    pub fn block(stmts: Vec<Stmt>) -> Stmt {
        Stmt::Block(Block { stmts })
    }

    pub fn store(buf: &Buf, indices: Vec<Expr>, value: Expr) -> Stmt {
        Stmt::Store(Store {
            buf: buf.clone(),
            indices,
            value,
        })
    }

    pub fn for_loop(var: &Var, start: Expr, stop: Expr, body: Stmt) -> Stmt {
        Stmt::For(For {
            var: var.clone(),
            start,
            stop,
            body: Box::new(body),
        })
    }

    pub fn cond(condition: Expr, true_stmt: Option<Stmt>, false_stmt: Option<Stmt>) -> Stmt {
        Stmt::Cond(Cond {
            condition,
            true_stmt: true_stmt.map(Box::new),
            false_stmt: false_stmt.map(Box::new),
        })
    }

    pub fn let_stmt(var: &Var, value: Expr) -> Stmt {
        Stmt::Let(Let {
            var: var.clone(),
            value,
        })
    }

    pub fn allocate(buf: &Buf) -> Stmt {
        Stmt::Allocate(Allocate { buf: buf.clone() })
    }

    pub fn free(buf: &Buf) -> Stmt {
        Stmt::Free(Free { buf: buf.clone() })
    }
}
