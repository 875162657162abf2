// id.rs — Stable identities for IR variables and buffers
//
// Two variables (or buffers) with the same display name are distinct entities
// unless they carry the same id. Ids are allocated in creation order by the
// IR builder, so the same construction sequence always yields the same ids.

use serde::{Deserialize, Serialize};

/// Stable identity of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarId(pub u32);

/// Stable identity of a buffer descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BufId(pub u32);

/// Allocator for stable IDs. Produces monotonically increasing IDs in
/// allocation order, ensuring deterministic assignment.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next_var: u32,
    next_buf: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_var(&mut self) -> VarId {
        let id = VarId(self.next_var);
        self.next_var += 1;
        id
    }

    pub fn alloc_buf(&mut self) -> BufId {
        let id = BufId(self.next_buf);
        self.next_buf += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_per_kind() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_var(), VarId(0));
        assert_eq!(alloc.alloc_buf(), BufId(0));
        assert_eq!(alloc.alloc_var(), VarId(1));
        assert_eq!(alloc.alloc_var(), VarId(2));
        assert_eq!(alloc.alloc_buf(), BufId(1));
    }
}
