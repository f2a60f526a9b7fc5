use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, info, warn};

use tally_types::ScoreRecord;

use crate::document::{read_document, LoadOutcome};
use crate::durable;
use crate::error::{CorruptStore, StoreError, StoreResult};
use crate::traits::RecordStore;

/// Record store backed by a single JSON document on disk.
///
/// Every operation holds two locks for its whole filesystem interaction: a
/// mutex serializing threads of this handle, and an exclusive advisory lock
/// on a sidecar `.<name>.lock` file serializing every handle on the same
/// document, in this process or another.
pub struct FileRecordStore {
    path: PathBuf,
    lock_path: PathBuf,
    lock: Mutex<()>,
}

/// Both locks; the file lock is released when the handle closes.
pub(crate) struct StoreGuard<'a> {
    _file: Option<File>,
    _local: MutexGuard<'a, ()>,
}

impl FileRecordStore {
    /// Create a store handle without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = lock_path_for(&path);
        Self {
            path,
            lock_path,
            lock: Mutex::new(()),
        }
    }

    /// Create a store handle and run [`RecordStore::ensure_initialized`].
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self::new(path);
        store.ensure_initialized()?;
        Ok(store)
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, resetting it to empty if it cannot be parsed.
    pub fn load(&self) -> LoadOutcome {
        let _guard = self.read_guard();
        self.load_or_repair()
    }

    // The mutex guards no data, so a panic elsewhere cannot leave it inconsistent.
    fn local_guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_file(&self) -> io::Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)?;
        file.lock()?;
        Ok(file)
    }

    /// Locks for a write. Failing to take the file lock fails the write.
    pub(crate) fn write_guard(&self) -> StoreResult<StoreGuard<'_>> {
        let local = self.local_guard();
        let file = self.lock_file().map_err(|source| StoreError::WriteFailure {
            path: self.path.clone(),
            source,
        })?;
        Ok(StoreGuard {
            _file: Some(file),
            _local: local,
        })
    }

    /// Locks for a read. Reads never fail, so a missing file lock is only logged.
    fn read_guard(&self) -> StoreGuard<'_> {
        let local = self.local_guard();
        let file = self
            .lock_file()
            .inspect_err(|e| {
                warn!(lock = %self.lock_path.display(), error = %e, "reading without file lock");
            })
            .ok();
        StoreGuard {
            _file: file,
            _local: local,
        }
    }

    /// Caller must hold the guard.
    fn load_or_repair(&self) -> LoadOutcome {
        match read_document(&self.path) {
            Ok(records) => LoadOutcome::Intact(records),
            Err(cause) => {
                error!(path = %self.path.display(), error = %cause, "store unreadable, resetting to empty");
                if let Err(e) = durable::rewrite(&self.path, &[]) {
                    error!(path = %self.path.display(), error = %e, "failed to reset corrupt store");
                }
                LoadOutcome::Repaired { cause }
            }
        }
    }
}

/// `data/scores.json` locks through `data/.scores.json.lock`.
fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or(OsStr::new("tally")));
    name.push(".lock");
    durable::parent_dir(path).join(name)
}

impl RecordStore for FileRecordStore {
    fn ensure_initialized(&self) -> StoreResult<()> {
        let dir = durable::parent_dir(&self.path);
        fs::create_dir_all(dir)?;

        // Under the file lock no other handle has a write in flight, so any temporary is stale.
        let _guard = self.write_guard()?;
        let swept = durable::sweep_stale_temps(&self.path);
        if swept > 0 {
            info!(dir = %dir.display(), count = swept, "removed stale temporary files");
        }

        match read_document(&self.path) {
            Ok(records) => {
                debug!(path = %self.path.display(), count = records.len(), "store ready");
            }
            Err(CorruptStore::Missing) => {
                durable::rewrite(&self.path, &[])?;
                info!(path = %self.path.display(), "created empty store");
            }
            Err(cause) => {
                warn!(path = %self.path.display(), error = %cause, "store corrupt, rewriting as empty");
                durable::rewrite(&self.path, &[])?;
            }
        }
        Ok(())
    }

    fn read_all(&self) -> Vec<ScoreRecord> {
        let _guard = self.read_guard();
        self.load_or_repair().into_records()
    }

    fn append(&self, record: ScoreRecord) -> StoreResult<()> {
        let _guard = self.write_guard()?;

        let mut records = self.load_or_repair().into_records();
        records.push(record);
        durable::rewrite(&self.path, &records).inspect_err(|e| {
            error!(path = %self.path.display(), error = %e, "append failed");
        })?;

        debug!(path = %self.path.display(), count = records.len(), "record appended");
        Ok(())
    }

    fn reset(&self) -> StoreResult<()> {
        let _guard = self.write_guard()?;
        durable::rewrite(&self.path, &[])?;
        info!(path = %self.path.display(), "store reset");
        Ok(())
    }
}

impl std::fmt::Debug for FileRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRecordStore")
            .field("path", &self.path)
            .finish()
    }
}
