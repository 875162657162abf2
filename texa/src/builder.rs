// builder.rs — Identity-allocating constructors for IR entities
//
// Variables and buffers are the only entities whose identity matters to the
// analyses. The builder owns the id allocator so every `var`/`buf` call
// yields a fresh identity, even when names repeat.

use crate::id::IdAllocator;
use crate::ir::{Buf, Dtype, Expr, Tensor, Var};

#[derive(Debug, Default)]
pub struct IrBuilder {
    ids: IdAllocator,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh variable. Reusing a name yields a distinct variable.
    pub fn var(&mut self, name: impl Into<String>, dtype: Dtype) -> Var {
        Var {
            id: self.ids.alloc_var(),
            name: name.into(),
            dtype,
        }
    }

    /// Create a fresh buffer with its own base handle.
    pub fn buf(&mut self, name: impl Into<String>, dims: Vec<Expr>, dtype: Dtype) -> Buf {
        let name = name.into();
        let base = self.var(name.clone(), Dtype::Handle);
        Buf {
            id: self.ids.alloc_buf(),
            name_hint: name,
            base,
            dims,
            dtype,
        }
    }

    /// Create a rank-1 buffer holding `len` elements.
    pub fn flat_buf(&mut self, name: impl Into<String>, len: i64, dtype: Dtype) -> Buf {
        self.buf(name, vec![Expr::int(len)], dtype)
    }

    pub fn tensor(&mut self, name: impl Into<String>, dims: Vec<Expr>, dtype: Dtype) -> Tensor {
        Tensor {
            buf: self.buf(name, dims, dtype),
        }
    }
}
