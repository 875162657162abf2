// has_rand.rs — Detect random-draw intrinsics
//
// Answers whether any reachable `Intrinsics` node draws a random number.
// A `Rand` intrinsic ends the descent at that node; every other intrinsic
// is walked normally, since its operands may themselves contain a draw.
//
// Preconditions: none.
// Postconditions: `has_rand()` is true iff some reachable intrinsic has op `Rand`.
// Failure modes: none.
// Side effects: none.

use crate::ir::{IntrinsicsOp, Stmt};
use crate::visit::{walk, IrVisitor, NodeRef};

#[derive(Debug, Default)]
pub struct HasRand {
    has_rand: bool,
}

impl HasRand {
    /// Run the detector over `stmt`.
    pub fn new(stmt: &Stmt) -> Self {
        let mut finder = HasRand::default();
        stmt.accept(&mut finder);
        log::debug!("has_rand: {}", finder.has_rand);
        finder
    }

    pub fn has_rand(&self) -> bool {
        self.has_rand
    }
}

impl<'a> IrVisitor<'a> for HasRand {
    fn visit(&mut self, node: NodeRef<'a>) {
        match node {
            NodeRef::Intrinsics(i) if i.op == IntrinsicsOp::Rand => self.has_rand = true,
            _ => walk(self, node),
        }
    }
}

/// Shorthand for `HasRand::new(stmt).has_rand()`.
pub fn has_rand(stmt: &Stmt) -> bool {
    HasRand::new(stmt).has_rand()
}
