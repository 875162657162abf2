// verify.rs — Well-formedness obligations for IR trees
//
// Checks the identity and arity invariants the analyses rely on and
// packages the outcome as a certificate.
//
// Preconditions: none.
// Postconditions: `IrCert` records V1-V3 pass/fail and every finding.
// Failure modes: violations become error diagnostics (E0101-E0103);
//   freeing an unallocated buffer is a warning (W0104).
// Side effects: none.

use std::collections::{HashMap, HashSet};

use crate::diag::{codes, Diagnostic};
use crate::id::{BufId, VarId};
use crate::ir::{Dtype, Stmt};
use crate::visit::{walk, IrVisitor, NodeRef};

/// Machine-checkable evidence for a set of stage obligations.
pub trait StageCert {
    fn all_pass(&self) -> bool;
    fn obligations(&self) -> Vec<(&'static str, bool)>;
}

#[derive(Debug, Clone)]
pub struct IrCert {
    /// V1: every variable id maps to one (name, dtype).
    pub v1_var_identity: bool,
    /// V2: every buffer id maps to one (name hint, rank).
    pub v2_buf_identity: bool,
    /// V3: every intrinsic has the operand count its op requires.
    pub v3_intrinsic_arity: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl StageCert for IrCert {
    fn all_pass(&self) -> bool {
        self.v1_var_identity && self.v2_buf_identity && self.v3_intrinsic_arity
    }

    fn obligations(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("V1_var_identity", self.v1_var_identity),
            ("V2_buf_identity", self.v2_buf_identity),
            ("V3_intrinsic_arity", self.v3_intrinsic_arity),
        ]
    }
}

/// Verify the tree rooted at `stmt`.
pub fn verify_ir(stmt: &Stmt) -> IrCert {
    let mut verifier = Verifier::new();
    stmt.accept(&mut verifier);
    let cert = IrCert {
        v1_var_identity: verifier.v1_ok,
        v2_buf_identity: verifier.v2_ok,
        v3_intrinsic_arity: verifier.v3_ok,
        diagnostics: verifier.diagnostics,
    };
    log::debug!(
        "verify: {} diagnostic(s), all_pass = {}",
        cert.diagnostics.len(),
        cert.all_pass()
    );
    cert
}

struct Verifier<'a> {
    var_sigs: HashMap<VarId, (&'a str, Dtype)>,
    buf_sigs: HashMap<BufId, (&'a str, usize)>,
    allocated: HashSet<BufId>,
    v1_ok: bool,
    v2_ok: bool,
    v3_ok: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Verifier<'_> {
    fn new() -> Self {
        Verifier {
            var_sigs: HashMap::new(),
            buf_sigs: HashMap::new(),
            allocated: HashSet::new(),
            v1_ok: true,
            v2_ok: true,
            v3_ok: true,
            diagnostics: Vec::new(),
        }
    }

    fn fail(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }
}

impl<'a> IrVisitor<'a> for Verifier<'a> {
    fn visit(&mut self, node: NodeRef<'a>) {
        match node {
            NodeRef::Var(v) => {
                let sig = (v.name.as_str(), v.dtype);
                let first = *self.var_sigs.entry(v.id).or_insert(sig);
                if first != sig {
                    self.v1_ok = false;
                    self.fail(
                        Diagnostic::error(format!("variable id {} used inconsistently", v.id.0))
                            .with_code(codes::E0101)
                            .with_note(format!("first seen as '{}: {}'", first.0, first.1))
                            .with_note(format!("later seen as '{}: {}'", sig.0, sig.1))
                            .with_hint("allocate a fresh variable instead of reusing the id"),
                    );
                }
            }
            NodeRef::Buf(b) => {
                let sig = (b.name_hint(), b.ndim());
                let first = *self.buf_sigs.entry(b.id).or_insert(sig);
                if first != sig {
                    self.v2_ok = false;
                    self.fail(
                        Diagnostic::error(format!("buffer id {} used inconsistently", b.id.0))
                            .with_code(codes::E0102)
                            .with_note(format!("first seen as '{}' with rank {}", first.0, first.1))
                            .with_note(format!("later seen as '{}' with rank {}", sig.0, sig.1)),
                    );
                }
            }
            NodeRef::Intrinsics(i) if i.params.len() != i.op.arity() => {
                self.v3_ok = false;
                self.fail(
                    Diagnostic::error(format!(
                        "intrinsic '{}' takes {} operand(s) but was given {}",
                        i.op.name(),
                        i.op.arity(),
                        i.params.len()
                    ))
                    .with_code(codes::E0103),
                );
            }
            NodeRef::Allocate(a) => {
                self.allocated.insert(a.buf.id);
            }
            NodeRef::Free(f) if !self.allocated.contains(&f.buf.id) => {
                self.fail(
                    Diagnostic::warning(format!(
                        "buffer '{}' freed but never allocated",
                        f.buf.name_hint
                    ))
                    .with_code(codes::W0104),
                );
            }
            _ => {}
        }
        walk(self, node);
    }
}
