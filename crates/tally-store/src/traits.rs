use tally_types::ScoreRecord;

use crate::error::StoreResult;

/// Append-only store of score records.
///
/// All implementations must satisfy these invariants:
/// - Records are never updated or individually deleted, only appended.
///   `reset` is the one operation that removes records, and removes all.
/// - Insertion order is preserved by `read_all`.
/// - Reads and writes are serialized: a reader sees the state before or after
///   an append, never a partial one.
/// - `read_all` never fails; corruption degrades to an empty store.
/// - `append` returns `Err` whenever the record was not persisted.
pub trait RecordStore: Send + Sync {
    /// Make sure the backing storage exists and holds a valid document.
    ///
    /// Idempotent. Called once at process startup.
    fn ensure_initialized(&self) -> StoreResult<()>;

    /// Every record, in insertion order.
    fn read_all(&self) -> Vec<ScoreRecord>;

    /// Persist one more record.
    fn append(&self, record: ScoreRecord) -> StoreResult<()>;

    /// Remove every record.
    fn reset(&self) -> StoreResult<()>;

    /// Number of records currently stored.
    fn len(&self) -> usize {
        self.read_all().len()
    }

    /// Returns `true` if the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
