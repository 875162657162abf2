// buffer_map.rs — Logical-to-flat buffer correspondence for flat backends
//
// Backends that only address rank-1 storage realize each logical (possibly
// multi-dimensional) buffer through a flat one. The correspondence is read
// off store statements:
//
//   flat[i] = logical[...]          (value is a Load)
//   flat[i] = tensor(...)           (value is a FunctionCall)
//
// In both shapes the logical buffer's name is the key and the store
// destination is the flat counterpart. The first store that names a key
// wins; later stores for the same key are ignored.
//
// Preconditions: a store value is never both load- and call-shaped.
// Postconditions: `buffer_map()` holds one entry per logical name seen.
// Failure modes: a value that is both load- and call-shaped panics.
// Side effects: none.

use std::collections::HashMap;

use crate::ir::{Buf, FunctionCall, Load, Stmt, Store};
use crate::visit::{walk, IrVisitor, NodeRef};

/// The part of a store value that names a logical buffer.
#[derive(Debug, Clone, Copy)]
enum StoreSource<'a> {
    Load(&'a Load),
    Call(&'a FunctionCall),
}

impl<'a> StoreSource<'a> {
    /// Classify a store value from its load and call views.
    ///
    /// Panics if both views are present: that is a malformed tree produced
    /// upstream, never a condition to recover from.
    fn classify(load: Option<&'a Load>, call: Option<&'a FunctionCall>) -> Option<Self> {
        assert!(
            !(load.is_some() && call.is_some()),
            "internal error: store value is both a Load and a FunctionCall"
        );
        match (load, call) {
            (Some(l), _) => Some(StoreSource::Load(l)),
            (_, Some(c)) => Some(StoreSource::Call(c)),
            (None, None) => None,
        }
    }

    fn logical_buf(self) -> &'a Buf {
        match self {
            StoreSource::Load(l) => &l.buf,
            StoreSource::Call(c) => &c.tensor.buf,
        }
    }
}

#[derive(Debug, Default)]
pub struct CreateBufferMap<'a> {
    map: HashMap<String, &'a Buf>,
}

impl<'a> CreateBufferMap<'a> {
    /// Run the mapper over `stmt`.
    pub fn new(stmt: &'a Stmt) -> Self {
        let mut mapper = CreateBufferMap::default();
        stmt.accept(&mut mapper);
        log::debug!("buffer_map: {} correspondence(s)", mapper.map.len());
        mapper
    }

    /// Logical buffer name → flat buffer realizing it.
    pub fn buffer_map(&self) -> &HashMap<String, &'a Buf> {
        &self.map
    }

    pub fn get(&self, logical: &str) -> Option<&'a Buf> {
        self.map.get(logical).copied()
    }

    pub fn into_map(self) -> HashMap<String, &'a Buf> {
        self.map
    }

    fn record(&mut self, store: &'a Store) {
        let source = StoreSource::classify(store.value.as_load(), store.value.as_function_call());
        let Some(source) = source else {
            log::trace!("buffer_map: store to '{}' has no buffer source", store.buf.name_hint);
            return;
        };
        let logical = source.logical_buf().name_hint();
        match self.map.get(logical) {
            Some(existing) => log::trace!(
                "buffer_map: '{}' already realized by '{}', ignoring '{}'",
                logical,
                existing.name_hint,
                store.buf.name_hint
            ),
            None => {
                self.map.insert(logical.to_string(), &store.buf);
            }
        }
    }
}

impl<'a> IrVisitor<'a> for CreateBufferMap<'a> {
    fn visit(&mut self, node: NodeRef<'a>) {
        match node {
            NodeRef::Store(store) => {
                self.record(store);
                store.value.accept(self);
            }
            _ => walk(self, node),
        }
    }
}

/// Shorthand for `CreateBufferMap::new(stmt).into_map()`.
pub fn buffer_map(stmt: &Stmt) -> HashMap<String, &Buf> {
    CreateBufferMap::new(stmt).into_map()
}
