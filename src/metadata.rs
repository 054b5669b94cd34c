//! Refresh metadata sidecars for cached databases.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Tracks when a cached database edition was last refreshed, plus the
/// ETag the server reported for it.
///
/// Stored as a small JSON file next to the cached CSVs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbMetadata {
    /// Seconds since the Unix epoch of the last successful refresh.
    pub refreshed_secs: Option<u64>,
    /// ETag reported by the server for the cached archive.
    pub etag: Option<String>,
}

impl DbMetadata {
    /// Metadata stamped with the current time.
    pub fn stamp(etag: Option<String>) -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            refreshed_secs: Some(secs),
            etag,
        }
    }

    /// Load metadata from a file, defaulting when the file is missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save metadata to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The last refresh time, if any.
    pub fn refreshed_at(&self) -> Option<SystemTime> {
        self.refreshed_secs.map(|s| UNIX_EPOCH + Duration::from_secs(s))
    }

    /// Whether the cached data is older than `interval`, or was never
    /// refreshed.
    pub fn is_stale(&self, interval: Duration) -> bool {
        match self.refreshed_at() {
            None => true,
            Some(at) => {
                let elapsed = SystemTime::now()
                    .duration_since(at)
                    .unwrap_or(Duration::MAX);
                elapsed >= interval
            }
        }
    }
}
