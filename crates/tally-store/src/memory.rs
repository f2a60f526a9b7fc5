use std::sync::RwLock;

use tally_types::ScoreRecord;

use crate::error::StoreResult;
use crate::traits::RecordStore;

/// In-memory, `Vec`-based record store.
///
/// Intended for tests and embedding. Nothing survives the process.
pub struct InMemoryRecordStore {
    records: RwLock<Vec<ScoreRecord>>,
}

impl InMemoryRecordStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with `records`, in order.
    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn ensure_initialized(&self) -> StoreResult<()> {
        Ok(())
    }

    fn read_all(&self) -> Vec<ScoreRecord> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn append(&self, record: ScoreRecord) -> StoreResult<()> {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
        Ok(())
    }

    fn reset(&self) -> StoreResult<()> {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("record_count", &self.len())
            .finish()
    }
}
