// var_finder.rs — Collect distinct variable identities
//
// Membership is by `VarId`. Two variables that merely share a display name
// are separate members; repeated references to one variable count once.
// Buffer base handles are variables too and are collected when the walk
// reaches a buffer.

use std::collections::{HashMap, HashSet};

use crate::id::VarId;
use crate::ir::{Stmt, Var};
use crate::visit::{walk, IrVisitor, NodeRef};

#[derive(Debug, Default)]
pub struct VarFinder<'a> {
    /// First occurrence of each identity.
    vars: HashMap<VarId, &'a Var>,
}

impl<'a> VarFinder<'a> {
    /// Run the collector over `stmt`.
    pub fn new(stmt: &'a Stmt) -> Self {
        let mut finder = VarFinder::default();
        stmt.accept(&mut finder);
        log::debug!("var_finder: {} distinct variable(s)", finder.vars.len());
        finder
    }

    pub fn vars(&self) -> &HashMap<VarId, &'a Var> {
        &self.vars
    }

    pub fn contains(&self, id: VarId) -> bool {
        self.vars.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variables sorted by id.
    pub fn sorted(&self) -> Vec<&'a Var> {
        let mut vars: Vec<&'a Var> = self.vars.values().copied().collect();
        vars.sort_by_key(|v| v.id);
        vars
    }

    pub fn ids(&self) -> HashSet<VarId> {
        self.vars.keys().copied().collect()
    }
}

impl<'a> IrVisitor<'a> for VarFinder<'a> {
    fn visit(&mut self, node: NodeRef<'a>) {
        if let NodeRef::Var(v) = node {
            self.vars.entry(v.id).or_insert(v);
        }
        walk(self, node);
    }
}

/// Identities of every variable reachable from `stmt`.
pub fn find_vars(stmt: &Stmt) -> HashSet<VarId> {
    VarFinder::new(stmt).ids()
}
