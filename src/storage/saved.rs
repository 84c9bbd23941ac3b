//! Saved (bookmarked) opportunities, persisted as a JSON array.
//!
//! Identity is `(title, source)`: saving an opportunity that is already
//! saved removes it instead, so the list never holds duplicates.
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use super::types::{SavedOpportunity, StorageError};
use super::{read_capped, PendingWrite};
use crate::listing::Opportunity;

#[derive(Debug)]
pub struct SavedStore {
    path: PathBuf,
    items: Vec<SavedOpportunity>,
}

impl SavedStore {
    /// Load the store at `path`. A missing or empty file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let items = match read_capped(path)? {
            Some(content) if !content.trim().is_empty() => {
                let mut items: Vec<SavedOpportunity> = serde_json::from_str(&content)?;
                // Older files may predate de-duplication
                let mut seen = std::collections::HashSet::new();
                items.retain(|s| {
                    seen.insert((
                        s.opportunity.title.clone(),
                        s.opportunity.source.clone(),
                    ))
                });
                items
            }
            _ => Vec::new(),
        };

        tracing::debug!(path = %path.display(), count = items.len(), "Loaded saved opportunities");
        Ok(Self {
            path: path.to_path_buf(),
            items,
        })
    }

    pub fn is_saved(&self, opportunity: &Opportunity) -> bool {
        self.items
            .iter()
            .any(|s| s.opportunity.same_identity(opportunity))
    }

    /// Save or unsave `opportunity` and persist.
    ///
    /// Returns `true` if the opportunity is saved afterwards.
    pub fn toggle(
        &mut self,
        opportunity: &Opportunity,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let (saved, write) = self.toggle_deferred(opportunity, now)?;
        write.commit()?;
        Ok(saved)
    }

    /// Like [`toggle`](Self::toggle), but hands back the file write instead
    /// of performing it.
    pub fn toggle_deferred(
        &mut self,
        opportunity: &Opportunity,
        now: DateTime<Utc>,
    ) -> Result<(bool, PendingWrite), StorageError> {
        let before = self.items.len();
        self.items
            .retain(|s| !s.opportunity.same_identity(opportunity));

        let saved = if self.items.len() == before {
            self.items.push(SavedOpportunity {
                opportunity: opportunity.clone(),
                saved_at: now,
            });
            true
        } else {
            false
        };

        let write = self.pending_write()?;
        tracing::info!(title = %opportunity.title, saved, "Toggled saved opportunity");
        Ok((saved, write))
    }

    /// Saved entries, oldest first.
    pub fn items(&self) -> &[SavedOpportunity] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn pending_write(&self) -> Result<PendingWrite, StorageError> {
        Ok(PendingWrite {
            path: self.path.clone(),
            bytes: serde_json::to_vec_pretty(&self.items)?,
        })
    }
}
