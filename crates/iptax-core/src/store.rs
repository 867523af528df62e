//! Generic keyed-record document store with crash-safe writes.
//!
//! Both persisted collections (the judgment cache and the period ledger) are
//! single human-readable JSON files. [`RecordStore`] owns the load/save
//! discipline they share:
//!
//! - `save` writes the whole document to a temp file in the target directory
//!   and renames it into place, so a crash mid-write never leaves a
//!   half-written file.
//! - `load` of a missing file yields the default (empty) document.
//! - `load` of a malformed file does **not** fail: the bad file is renamed to
//!   a timestamped `.corrupt-` backup, a warning is logged, and the default
//!   document is returned — a corrupted cache degrades to a cold start
//!   rather than crashing the tool.

use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::errors::StoreError;

/// File store for one versioned JSON document of type `D`.
#[derive(Debug)]
pub struct RecordStore<D> {
    path: PathBuf,
    _doc: PhantomData<D>,
}

impl<D> RecordStore<D>
where
    D: Default + Serialize + DeserializeOwned,
{
    /// Create a store backed by `path`. No I/O happens until `load`/`save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _doc: PhantomData,
        }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, or the default one if the file does not exist.
    ///
    /// A file that exists but cannot be parsed is moved aside to a
    /// `<name>.corrupt-<timestamp>` backup and replaced by the default
    /// document; only real I/O failures surface as errors.
    pub fn load(&self) -> Result<D, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(D::default()),
            Err(e) => return Err(self.io_err(e)),
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                let backup = self.quarantine()?;
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "store file corrupted; starting with an empty collection"
                );
                Ok(D::default())
            }
        }
    }

    /// Write the document atomically, creating parent directories as needed.
    ///
    /// The file is written with mode `0o600` on Unix — the stores may carry
    /// employer-internal change titles.
    pub fn save(&self, doc: &D) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
                parent
            }
            _ => Path::new("."),
        };

        let json = serde_json::to_string_pretty(doc).map_err(|e| StoreError::Encode {
            path: self.path.clone(),
            source: e,
        })?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| self.io_err(e))?;
        tmp.write_all(json.as_bytes()).map_err(|e| self.io_err(e))?;
        tmp.write_all(b"\n").map_err(|e| self.io_err(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_err(e))?;
        }

        let _file = tmp
            .persist(&self.path)
            .map_err(|e| self.io_err(e.error))?;
        Ok(())
    }

    /// Move a malformed file out of the way, returning the backup path.
    fn quarantine(&self) -> Result<PathBuf, StoreError> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let name = self
            .path
            .file_name()
            .map_or_else(|| "store".to_string(), |n| n.to_string_lossy().into_owned());
        let backup = self.path.with_file_name(format!("{name}.corrupt-{stamp}"));
        std::fs::rename(&self.path, &backup).map_err(|e| self.io_err(e))?;
        Ok(backup)
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
