// visit.rs — Read-only traversal over the IR tree
//
// `NodeRef` is a borrowed view of any concrete node. `IrVisitor::visit` is
// the single dispatch point; its default forwards to `walk`, which visits
// each child in a fixed order. An analysis overrides `visit`, matches the
// node kinds it cares about and calls `walk` for everything else (or for
// the matched node too, when it wants to keep descending).
//
// Preconditions: the tree is finite (guaranteed by ownership).
// Postconditions: every node reachable from the root is offered to `visit`
//   exactly once per occurrence, parent before children.
// Failure modes: none.
// Side effects: none (visitors only mutate their own state).

use serde::Serialize;

use crate::ir::*;

// ── Node references ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    // Statements
    Block(&'a Block),
    Store(&'a Store),
    For(&'a For),
    Cond(&'a Cond),
    Let(&'a Let),
    Allocate(&'a Allocate),
    Free(&'a Free),
    // Buffers
    Buf(&'a Buf),
    // Expressions
    IntImm(&'a IntImm),
    FloatImm(&'a FloatImm),
    Var(&'a Var),
    Cast(&'a Cast),
    Binary(&'a BinaryOp),
    CompareSelect(&'a CompareSelect),
    IfThenElse(&'a IfThenElse),
    Load(&'a Load),
    FunctionCall(&'a FunctionCall),
    Intrinsics(&'a Intrinsics),
}

impl<'a> From<&'a Stmt> for NodeRef<'a> {
    fn from(stmt: &'a Stmt) -> Self {
        match stmt {
            Stmt::Block(s) => NodeRef::Block(s),
            Stmt::Store(s) => NodeRef::Store(s),
            Stmt::For(s) => NodeRef::For(s),
            Stmt::Cond(s) => NodeRef::Cond(s),
            Stmt::Let(s) => NodeRef::Let(s),
            Stmt::Allocate(s) => NodeRef::Allocate(s),
            Stmt::Free(s) => NodeRef::Free(s),
        }
    }
}

impl<'a> From<&'a Expr> for NodeRef<'a> {
    fn from(expr: &'a Expr) -> Self {
        match expr {
            Expr::IntImm(e) => NodeRef::IntImm(e),
            Expr::FloatImm(e) => NodeRef::FloatImm(e),
            Expr::Var(e) => NodeRef::Var(e),
            Expr::Cast(e) => NodeRef::Cast(e),
            Expr::Binary(e) => NodeRef::Binary(e),
            Expr::CompareSelect(e) => NodeRef::CompareSelect(e),
            Expr::IfThenElse(e) => NodeRef::IfThenElse(e),
            Expr::Load(e) => NodeRef::Load(e),
            Expr::FunctionCall(e) => NodeRef::FunctionCall(e),
            Expr::Intrinsics(e) => NodeRef::Intrinsics(e),
        }
    }
}

impl<'a> From<&'a Buf> for NodeRef<'a> {
    fn from(buf: &'a Buf) -> Self {
        NodeRef::Buf(buf)
    }
}

impl<'a> From<&'a Var> for NodeRef<'a> {
    fn from(var: &'a Var) -> Self {
        NodeRef::Var(var)
    }
}

impl NodeRef<'_> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Block(_) => NodeKind::Block,
            NodeRef::Store(_) => NodeKind::Store,
            NodeRef::For(_) => NodeKind::For,
            NodeRef::Cond(_) => NodeKind::Cond,
            NodeRef::Let(_) => NodeKind::Let,
            NodeRef::Allocate(_) => NodeKind::Allocate,
            NodeRef::Free(_) => NodeKind::Free,
            NodeRef::Buf(_) => NodeKind::Buf,
            NodeRef::IntImm(_) => NodeKind::IntImm,
            NodeRef::FloatImm(_) => NodeKind::FloatImm,
            NodeRef::Var(_) => NodeKind::Var,
            NodeRef::Cast(_) => NodeKind::Cast,
            NodeRef::Binary(_) => NodeKind::Binary,
            NodeRef::CompareSelect(_) => NodeKind::CompareSelect,
            NodeRef::IfThenElse(_) => NodeKind::IfThenElse,
            NodeRef::Load(_) => NodeKind::Load,
            NodeRef::FunctionCall(_) => NodeKind::FunctionCall,
            NodeRef::Intrinsics(_) => NodeKind::Intrinsics,
        }
    }
}

// ── Node kinds ──────────────────────────────────────────────────────────────

/// Discriminant of a concrete node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Block,
    Store,
    For,
    Cond,
    Let,
    Allocate,
    Free,
    Buf,
    IntImm,
    FloatImm,
    Var,
    Cast,
    Binary,
    CompareSelect,
    IfThenElse,
    Load,
    FunctionCall,
    Intrinsics,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Block => "block",
            NodeKind::Store => "store",
            NodeKind::For => "for",
            NodeKind::Cond => "cond",
            NodeKind::Let => "let",
            NodeKind::Allocate => "allocate",
            NodeKind::Free => "free",
            NodeKind::Buf => "buf",
            NodeKind::IntImm => "int_imm",
            NodeKind::FloatImm => "float_imm",
            NodeKind::Var => "var",
            NodeKind::Cast => "cast",
            NodeKind::Binary => "binary",
            NodeKind::CompareSelect => "compare_select",
            NodeKind::IfThenElse => "if_then_else",
            NodeKind::Load => "load",
            NodeKind::FunctionCall => "function_call",
            NodeKind::Intrinsics => "intrinsics",
        }
    }
}

/// All node kinds in declaration order.
pub const ALL_KINDS: [NodeKind; 18] = [
    NodeKind::Block,
    NodeKind::Store,
    NodeKind::For,
    NodeKind::Cond,
    NodeKind::Let,
    NodeKind::Allocate,
    NodeKind::Free,
    NodeKind::Buf,
    NodeKind::IntImm,
    NodeKind::FloatImm,
    NodeKind::Var,
    NodeKind::Cast,
    NodeKind::Binary,
    NodeKind::CompareSelect,
    NodeKind::IfThenElse,
    NodeKind::Load,
    NodeKind::FunctionCall,
    NodeKind::Intrinsics,
];

// ── Typed downcast ──────────────────────────────────────────────────────────

/// A concrete node type that can be recovered from a `NodeRef`.
pub trait IrNode {
    const KIND: NodeKind;

    fn downcast(node: NodeRef<'_>) -> Option<&Self>;
}

macro_rules! impl_ir_node {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl IrNode for $ty {
                const KIND: NodeKind = NodeKind::$variant;

                fn downcast(node: NodeRef<'_>) -> Option<&Self> {
                    match node {
                        NodeRef::$variant(n) => Some(n),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_ir_node! {
    Block => Block,
    Store => Store,
    For => For,
    Cond => Cond,
    Let => Let,
    Allocate => Allocate,
    Free => Free,
    Buf => Buf,
    IntImm => IntImm,
    FloatImm => FloatImm,
    Var => Var,
    Cast => Cast,
    BinaryOp => Binary,
    CompareSelect => CompareSelect,
    IfThenElse => IfThenElse,
    Load => Load,
    FunctionCall => FunctionCall,
    Intrinsics => Intrinsics,
}

// ── Visitor ─────────────────────────────────────────────────────────────────

pub trait IrVisitor<'a> {
    /// Called once per node. The default descends into the children.
    fn visit(&mut self, node: NodeRef<'a>) {
        walk(self, node);
    }
}

/// Visit the children of `node` in the canonical order.
pub fn walk<'a, V: IrVisitor<'a> + ?Sized>(v: &mut V, node: NodeRef<'a>) {
    match node {
        NodeRef::Block(b) => {
            for stmt in &b.stmts {
                v.visit(stmt.into());
            }
        }
        NodeRef::Store(s) => {
            v.visit((&s.buf).into());
            visit_exprs(v, &s.indices);
            v.visit((&s.value).into());
        }
        NodeRef::For(f) => {
            v.visit((&f.var).into());
            v.visit((&f.start).into());
            v.visit((&f.stop).into());
            v.visit((&*f.body).into());
        }
        NodeRef::Cond(c) => {
            v.visit((&c.condition).into());
            if let Some(t) = &c.true_stmt {
                v.visit((&**t).into());
            }
            if let Some(e) = &c.false_stmt {
                v.visit((&**e).into());
            }
        }
        NodeRef::Let(l) => {
            v.visit((&l.var).into());
            v.visit((&l.value).into());
        }
        NodeRef::Allocate(a) => v.visit((&a.buf).into()),
        NodeRef::Free(f) => v.visit((&f.buf).into()),
        NodeRef::Buf(b) => {
            v.visit((&b.base).into());
            visit_exprs(v, &b.dims);
        }
        NodeRef::IntImm(_) | NodeRef::FloatImm(_) | NodeRef::Var(_) => {}
        NodeRef::Cast(c) => v.visit((&*c.src).into()),
        NodeRef::Binary(b) => {
            v.visit((&*b.lhs).into());
            v.visit((&*b.rhs).into());
        }
        NodeRef::CompareSelect(c) => {
            v.visit((&*c.lhs).into());
            v.visit((&*c.rhs).into());
            v.visit((&*c.ret_val1).into());
            v.visit((&*c.ret_val2).into());
        }
        NodeRef::IfThenElse(i) => {
            v.visit((&*i.condition).into());
            v.visit((&*i.true_value).into());
            v.visit((&*i.false_value).into());
        }
        NodeRef::Load(l) => {
            v.visit((&l.buf).into());
            visit_exprs(v, &l.indices);
        }
        NodeRef::FunctionCall(c) => visit_exprs(v, &c.params),
        NodeRef::Intrinsics(i) => visit_exprs(v, &i.params),
    }
}

fn visit_exprs<'a, V: IrVisitor<'a> + ?Sized>(v: &mut V, exprs: &'a [Expr]) {
    for expr in exprs {
        v.visit(expr.into());
    }
}

impl Stmt {
    /// Offer this statement (and, by default, its subtree) to `v`.
    pub fn accept<'a, V: IrVisitor<'a> + ?Sized>(&'a self, v: &mut V) {
        v.visit(self.into());
    }
}

impl Expr {
    pub fn accept<'a, V: IrVisitor<'a> + ?Sized>(&'a self, v: &mut V) {
        v.visit(self.into());
    }
}
