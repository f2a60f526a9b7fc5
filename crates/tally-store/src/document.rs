use std::fs;
use std::io;
use std::path::Path;

use tally_types::ScoreRecord;

use crate::error::CorruptStore;

/// Result of loading the store document.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The document parsed; these are its records in insertion order.
    Intact(Vec<ScoreRecord>),
    /// The document was missing or malformed and has been reset to empty.
    Repaired { cause: CorruptStore },
}

impl LoadOutcome {
    /// Records to operate on. A repaired store is empty.
    pub fn into_records(self) -> Vec<ScoreRecord> {
        match self {
            Self::Intact(records) => records,
            Self::Repaired { .. } => Vec::new(),
        }
    }

    pub fn is_repaired(&self) -> bool {
        matches!(self, Self::Repaired { .. })
    }
}

/// Parse a serialized store document: a JSON array of records.
pub fn parse_document(bytes: &[u8]) -> Result<Vec<ScoreRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Read and parse the document at `path` without repairing anything.
pub(crate) fn read_document(path: &Path) -> Result<Vec<ScoreRecord>, CorruptStore> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(CorruptStore::Missing),
        Err(e) => return Err(CorruptStore::Unreadable(e)),
    };
    Ok(parse_document(&bytes)?)
}
