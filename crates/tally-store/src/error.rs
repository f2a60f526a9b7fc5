use std::io;
use std::path::PathBuf;

/// Errors surfaced to callers of store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The durable rewrite did not complete; the backing file still holds
    /// its previous contents.
    #[error("failed to write store {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error outside the write protocol (e.g. creating the store directory).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Why a store document could not be loaded.
///
/// Never returned from a read: the store repairs itself and reports the cause
/// through [`LoadOutcome::Repaired`](crate::LoadOutcome::Repaired).
#[derive(Debug, thiserror::Error)]
pub enum CorruptStore {
    #[error("store file does not exist")]
    Missing,

    #[error("store file is unreadable: {0}")]
    Unreadable(io::Error),

    #[error("store document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
