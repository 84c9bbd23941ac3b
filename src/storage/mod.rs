//! Small JSON-file stores living in the data directory.
//!
//! - [`SavedStore`] - bookmarked opportunities
//! - [`SnapshotStore`] - timestamped listing snapshots with a freshness window

mod saved;
mod snapshot;
mod types;

use std::path::{Path, PathBuf};

use crate::util::atomic_write;

pub use saved::SavedStore;
pub use snapshot::{SnapshotStore, DEFAULT_FRESHNESS_MINUTES};
pub use types::{SavedOpportunity, Snapshot, StorageError};

/// Serialized store contents waiting to be written to disk.
///
/// Produced by the `*_deferred` store operations so the caller can move the
/// file I/O off the UI task. Writes to one path must be committed in the
/// order they were produced.
#[derive(Debug)]
#[must_use = "the store is not persisted until the write is committed"]
pub struct PendingWrite {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl PendingWrite {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replace the store file. Blocking.
    pub fn commit(self) -> Result<(), StorageError> {
        atomic_write(&self.path, &self.bytes)?;
        Ok(())
    }
}

/// Maximum store file size (10 MB).
const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Read a store file, refusing oversized files. `Ok(None)` if missing.
fn read_capped(path: &Path) -> Result<Option<String>, StorageError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_STORE_FILE_SIZE => {
            return Err(StorageError::TooLarge {
                size: meta.len(),
                max: MAX_STORE_FILE_SIZE,
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::Io(e)),
        Ok(_) => {}
    }

    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        // File removed between metadata and read
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::Io(e)),
    }
}
