use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::membership::types::{NodeId, NodeRecord};

/// Faults on the snapshot path. The coordinator logs these and keeps running
/// from memory; none of them is fatal.
///
/// `CorruptSnapshot` is deliberately its own variant: a truncated or
/// hand-mangled file must be visible as such, never silently treated as an
/// empty cluster.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("snapshot file {path} is corrupt: {source}")]
    CorruptSnapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read snapshot file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write snapshot file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads and writes the on-disk projection of the membership table:
/// a JSON object mapping node id to `{ "status", "last_seen" }`.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes the full record set and replaces the file contents.
    ///
    /// The overwrite is not atomic; a crash mid-write can truncate the file.
    /// That case surfaces as `CorruptSnapshot` on the next load rather than
    /// being papered over here.
    pub fn save(&self, records: &HashMap<NodeId, NodeRecord>) -> Result<(), PersistenceError> {
        let json =
            serde_json::to_string_pretty(records).map_err(|source| PersistenceError::WriteFailed {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, source),
            })?;

        std::fs::write(&self.path, json).map_err(|source| PersistenceError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }

    /// Loads the snapshot if present. A missing file is a normal first start
    /// and yields an empty table; a present-but-unparsable file is reported
    /// as `CorruptSnapshot` so the operator knows state was lost.
    ///
    /// Loaded records are trusted as-is. A long-dead node restored from a
    /// stale snapshot comes back `Active` and is re-evaluated by the failure
    /// detector on its next tick.
    pub fn load(&self) -> Result<HashMap<NodeId, NodeRecord>, PersistenceError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(source) => {
                return Err(PersistenceError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| PersistenceError::CorruptSnapshot {
            path: self.path.clone(),
            source,
        })
    }
}
