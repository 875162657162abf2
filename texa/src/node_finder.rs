// node_finder.rs — Collect every node of one concrete kind
//
// `NodeFinder<N>` records each node that downcasts to `N` and keeps
// descending, so targets nested inside other targets are found too.
// Results are in pre-order encounter order and are not deduplicated.

use crate::ir::Stmt;
use crate::visit::{walk, IrNode, IrVisitor, NodeRef};

#[derive(Debug)]
pub struct NodeFinder<'a, N> {
    nodes: Vec<&'a N>,
}

impl<'a, N: IrNode> NodeFinder<'a, N> {
    /// Run the collector over `stmt`.
    pub fn new(stmt: &'a Stmt) -> Self {
        let mut finder = NodeFinder { nodes: Vec::new() };
        stmt.accept(&mut finder);
        log::debug!("node_finder: {} {:?} node(s)", finder.nodes.len(), N::KIND);
        finder
    }

    pub fn nodes(&self) -> &[&'a N] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<&'a N> {
        self.nodes
    }
}

impl<'a, N: IrNode> IrVisitor<'a> for NodeFinder<'a, N> {
    fn visit(&mut self, node: NodeRef<'a>) {
        if let Some(n) = N::downcast(node) {
            self.nodes.push(n);
        }
        walk(self, node);
    }
}

/// Every `N` reachable from `stmt`, in traversal order.
pub fn find<N: IrNode>(stmt: &Stmt) -> Vec<&N> {
    NodeFinder::<N>::new(stmt).into_nodes()
}
