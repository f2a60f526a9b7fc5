//! Crash-safe whole-document rewrites.
//!
//! A rewrite never touches the live file in place:
//!
//! ```text
//! 1. create  <dir>/.tally-XXXXXX.tmp      (same directory as the target)
//! 2. write   pretty-printed JSON array
//! 3. fsync   the temporary file
//! 4. rename  temporary -> target          (atomic replace)
//! 5. fsync   the directory                (unix, best effort)
//! ```
//!
//! A crash before step 4 leaves the old document; after it, the new one.
//! Failure at any step removes the temporary file.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use tally_types::ScoreRecord;

use crate::error::{StoreError, StoreResult};

/// File name prefix of every temporary file the store creates.
pub(crate) const TEMP_PREFIX: &str = ".tally-";
/// File name suffix of every temporary file the store creates.
pub(crate) const TEMP_SUFFIX: &str = ".tmp";

/// A fully written and synced temporary file awaiting activation.
///
/// Dropping it without calling [`commit`](Self::commit) deletes the
/// temporary file and leaves the target untouched.
#[derive(Debug)]
pub(crate) struct StagedWrite {
    target: PathBuf,
    temp: NamedTempFile,
}

impl StagedWrite {
    /// Path of the temporary file holding the staged document.
    #[cfg(test)]
    pub(crate) fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Atomically replace the target with the staged document.
    pub(crate) fn commit(self) -> StoreResult<()> {
        let Self { target, temp } = self;
        // On failure the PersistError still owns the temp file and removes it on drop.
        temp.persist(&target).map_err(|e| StoreError::WriteFailure {
            path: target.clone(),
            source: e.error,
        })?;
        sync_dir(parent_dir(&target));
        debug!(path = %target.display(), "store document replaced");
        Ok(())
    }
}

/// Write `records` to a synced temporary file next to `target`.
pub(crate) fn stage(target: &Path, records: &[ScoreRecord]) -> StoreResult<StagedWrite> {
    let failed = |source: io::Error| StoreError::WriteFailure {
        path: target.to_path_buf(),
        source,
    };

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(parent_dir(target))
        .map_err(failed)?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, records).map_err(|e| failed(e.into()))?;
        writer.write_all(b"\n").map_err(failed)?;
        writer.flush().map_err(failed)?;
    }
    temp.as_file().sync_all().map_err(failed)?;

    Ok(StagedWrite {
        target: target.to_path_buf(),
        temp,
    })
}

/// Stage and commit in one step.
pub(crate) fn rewrite(target: &Path, records: &[ScoreRecord]) -> StoreResult<()> {
    stage(target, records)?.commit()
}

/// Remove temporaries a crashed process left next to `target`.
///
/// Returns how many were removed. Caller must hold the store's file lock, so
/// that no write to `target` is in flight.
pub(crate) fn sweep_stale_temps(target: &Path) -> usize {
    let dir = parent_dir(target);
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot scan for stale temporary files");
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !(name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)) {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => warn!(file = name, error = %e, "cannot remove stale temporary file"),
        }
    }
    removed
}

/// Directory holding `target`; a bare file name lives in the current directory.
pub(crate) fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Ok(handle) = File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
