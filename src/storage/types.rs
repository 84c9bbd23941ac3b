use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::listing::Opportunity;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt store file: {0}")]
    Json(#[from] serde_json::Error),

    /// Store file exceeds the size we are willing to read into memory.
    #[error("Store file too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

// ============================================================================
// Persisted Records
// ============================================================================

/// An opportunity the user bookmarked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedOpportunity {
    pub opportunity: Opportunity,
    pub saved_at: DateTime<Utc>,
}

/// A timestamped value in the snapshot store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub data: serde_json::Value,
    /// Unix seconds at which `data` was captured
    pub timestamp: i64,
}
