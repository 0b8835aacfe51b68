//! File-backed key-value store: one file per key under a state directory.
//!
//! DESIGN
//! ======
//! Values are written to `<key>.tmp` and renamed over `<key>`, so a crash
//! mid-write leaves the previous value intact. Writes are small and
//! synchronous; the session task calls them inline.
//!
//! ERROR HANDLING
//! ==============
//! Only opening the directory is fatal. Afterwards a failed write is
//! returned to the engine as a [`StorageError`] (reported as a failed save)
//! and failed reads or deletes are logged and treated as "absent".

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use canvas::storage::{KeyValueStore, StorageError};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("state directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::Io`] when the directory cannot be created.
    pub fn open(dir: &Path) -> Result<Self, FileStoreError> {
        fs::create_dir_all(dir).map_err(|source| FileStoreError::Io { path: dir.to_path_buf(), source })?;
        info!(dir = %dir.display(), "file store opened");
        Ok(Self { dir: dir.to_path_buf() })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key.chars().map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' }).collect();
        self.dir.join(safe)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "store read failed");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|e| StorageError::Backend(format!("{}: {e}", path.display())))
    }

    fn clear(&mut self, key: &str) {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %path.display(), "store delete failed"),
        }
    }
}
