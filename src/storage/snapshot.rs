//! Coarse timestamped snapshot store.
//!
//! Holds `{ data, timestamp }` records keyed by name (a category, or a page
//! such as `"dashboardData"`). A record is only handed back while it is
//! younger than the freshness window; older records are ignored and removed
//! on the next `prune`. The whole map is rewritten atomically on each change.
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::types::{Snapshot, StorageError};
use super::{read_capped, PendingWrite};

/// Default freshness window (10 minutes)
pub const DEFAULT_FRESHNESS_MINUTES: i64 = 10;

#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    freshness: Duration,
    entries: BTreeMap<String, Snapshot>,
}

impl SnapshotStore {
    /// Load the store at `path`. A missing or empty file yields an empty store.
    pub fn load(path: &Path, freshness: Duration) -> Result<Self, StorageError> {
        let entries = match read_capped(path)? {
            Some(content) if !content.trim().is_empty() => serde_json::from_str(&content)?,
            _ => BTreeMap::new(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            freshness,
            entries,
        })
    }

    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    fn is_fresh(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> bool {
        now.timestamp() - snapshot.timestamp < self.freshness.num_seconds()
    }

    /// Raw data for `key` if it is still fresh at `now`.
    pub fn get_fresh(&self, key: &str, now: DateTime<Utc>) -> Option<&serde_json::Value> {
        self.entries
            .get(key)
            .filter(|s| self.is_fresh(s, now))
            .map(|s| &s.data)
    }

    /// Decoded data for `key` if it is still fresh at `now`.
    ///
    /// A record that no longer decodes as `T` is treated as absent.
    pub fn get_fresh_as<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let value = self.get_fresh(key, now)?;
        match T::deserialize(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable snapshot");
                None
            }
        }
    }

    /// Store `data` under `key`, stamped with `now`, and persist.
    pub fn put<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        data: &T,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.put_deferred(key, data, now)?.commit()
    }

    /// Like [`put`](Self::put), but hands back the file write instead of
    /// performing it.
    pub fn put_deferred<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        data: &T,
        now: DateTime<Utc>,
    ) -> Result<PendingWrite, StorageError> {
        let snapshot = Snapshot {
            data: serde_json::to_value(data)?,
            timestamp: now.timestamp(),
        };
        self.entries.insert(key.to_string(), snapshot);
        self.pending_write()
    }

    /// Remove `key`. Returns whether it existed.
    pub fn remove(&mut self, key: &str) -> Result<bool, StorageError> {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.persist()?;
        }
        Ok(existed)
    }

    /// Drop every record that is stale at `now`. Returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> Result<usize, StorageError> {
        let before = self.entries.len();
        let cutoff = self.freshness.num_seconds();
        self.entries
            .retain(|_, s| now.timestamp() - s.timestamp < cutoff);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed, "Pruned stale snapshots");
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.pending_write()?.commit()
    }

    fn pending_write(&self) -> Result<PendingWrite, StorageError> {
        Ok(PendingWrite {
            path: self.path.clone(),
            bytes: serde_json::to_vec(&self.entries)?,
        })
    }
}
