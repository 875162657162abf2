// report.rs — Serializable summary of all analyses over one tree
//
// Runs the four analyses (and optionally carries a verifier certificate)
// and flattens their borrowed results into owned, deterministically
// ordered data for `--emit report`.
//
// Preconditions: `source` is the text `root` was decoded from.
// Postconditions: lists are sorted (variables by id, buffer map by name).
// Failure modes: none.
// Side effects: none.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::buffer_map::CreateBufferMap;
use crate::has_rand::HasRand;
use crate::id::{BufId, VarId};
use crate::ir::{Dtype, Stmt};
use crate::var_finder::VarFinder;
use crate::verify::{IrCert, StageCert};
use crate::visit::{walk, IrVisitor, NodeKind, NodeRef};

/// Input fingerprint and tool version.
#[derive(Debug, Clone, Serialize)]
pub struct Provenance {
    pub input_sha256: String,
    pub tool_version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VarEntry {
    pub id: VarId,
    pub name: String,
    pub dtype: Dtype,
}

#[derive(Debug, Clone, Serialize)]
pub struct BufferMapEntry {
    pub logical: String,
    pub flat: String,
    pub flat_id: BufId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObligationEntry {
    pub name: &'static str,
    pub pass: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub provenance: Provenance,
    pub has_rand: bool,
    /// Only kinds that occur at least once.
    pub node_counts: BTreeMap<NodeKind, usize>,
    pub variables: Vec<VarEntry>,
    pub buffer_map: Vec<BufferMapEntry>,
    /// Empty when verification was skipped.
    pub obligations: Vec<ObligationEntry>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn build_report(source: &str, root: &Stmt, cert: Option<&IrCert>) -> AnalysisReport {
    let variables = VarFinder::new(root)
        .sorted()
        .into_iter()
        .map(|v| VarEntry {
            id: v.id,
            name: v.name.clone(),
            dtype: v.dtype,
        })
        .collect();

    let mut buffer_map: Vec<BufferMapEntry> = CreateBufferMap::new(root)
        .buffer_map()
        .iter()
        .map(|(logical, flat)| BufferMapEntry {
            logical: logical.clone(),
            flat: flat.name_hint.clone(),
            flat_id: flat.id,
        })
        .collect();
    buffer_map.sort_by(|a, b| a.logical.cmp(&b.logical));

    let obligations = cert
        .map(|c| {
            c.obligations()
                .into_iter()
                .map(|(name, pass)| ObligationEntry { name, pass })
                .collect()
        })
        .unwrap_or_default();

    AnalysisReport {
        provenance: compute_provenance(source),
        has_rand: HasRand::new(root).has_rand(),
        node_counts: count_nodes(root),
        variables,
        buffer_map,
        obligations,
    }
}

pub fn compute_provenance(source: &str) -> Provenance {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    let hash = hasher.finalize();

    Provenance {
        input_sha256: bytes_to_hex(&hash),
        tool_version: env!("CARGO_PKG_VERSION"),
    }
}

fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Number of nodes of each kind reachable from `root`.
pub fn count_nodes(root: &Stmt) -> BTreeMap<NodeKind, usize> {
    #[derive(Default)]
    struct NodeCounter(BTreeMap<NodeKind, usize>);

    impl<'a> IrVisitor<'a> for NodeCounter {
        fn visit(&mut self, node: NodeRef<'a>) {
            *self.0.entry(node.kind()).or_insert(0) += 1;
            walk(self, node);
        }
    }

    let mut counter = NodeCounter::default();
    root.accept(&mut counter);
    counter.0
}
