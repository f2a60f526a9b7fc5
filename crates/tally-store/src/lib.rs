//! Durable score storage for Tally.
//!
//! All submitted [`ScoreRecord`]s live in a single JSON array document on
//! disk. The store reads and rewrites that whole document on every
//! operation; there is no cache and no in-place mutation.
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordStore`] trait:
//!
//! - [`FileRecordStore`] -- the on-disk store used by the server
//! - [`InMemoryRecordStore`] -- `Vec`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. The document on disk is always a complete, valid JSON array. Writes go
//!    to a temporary file in the same directory, are synced, then renamed
//!    over the live file.
//! 2. Every filesystem interaction happens under the handle's mutex and an
//!    exclusive advisory lock on a sidecar lock file, so separate handles
//!    (and separate processes) on one document are serialized too.
//! 3. Reads never fail. A corrupt or missing document is reset to an empty
//!    array and read as empty.
//! 4. Writes always report failure. A record is saved only if `append`
//!    returned `Ok`.
//!
//! [`ScoreRecord`]: tally_types::ScoreRecord

pub mod document;
mod durable;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use document::{parse_document, LoadOutcome};
pub use error::{CorruptStore, StoreError, StoreResult};
pub use file::FileRecordStore;
pub use memory::InMemoryRecordStore;
pub use traits::RecordStore;
