// load.rs — Read serialized IR trees
//
// IR trees are exchanged as JSON, one root statement per document, using
// the `kind`-tagged encoding derived on the IR types.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ir::Stmt;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: invalid IR: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A root statement together with the text it was decoded from.
#[derive(Debug)]
pub struct LoadedIr {
    pub source: String,
    pub root: Stmt,
}

pub fn parse_ir(source: &str) -> Result<Stmt, serde_json::Error> {
    serde_json::from_str(source)
}

pub fn load_ir(path: &Path) -> Result<LoadedIr, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root = parse_ir(&source).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded IR from {}", path.display());
    Ok(LoadedIr { source, root })
}
