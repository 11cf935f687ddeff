//! Durable per-URL signal state.
//!
//! A snapshot is what a caller stores between checks. Checks never mutate a
//! snapshot they are given; they hand back a new one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signals observed for a remote document at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    /// `ETag` with surrounding quotes stripped.
    #[serde(default)]
    pub etag: Option<String>,
    /// Size of the full resource in bytes.
    #[serde(default)]
    pub content_length: Option<u64>,
    /// Parsed `Last-Modified`.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    /// Lowercase hex SHA-256 of the first `chunk_size` bytes.
    #[serde(default)]
    pub prefix_digest: Option<String>,
}

impl SignalSnapshot {
    pub fn with_etag(self, etag: impl Into<String>) -> Self {
        Self {
            etag: Some(etag.into()),
            ..self
        }
    }

    pub fn with_content_length(self, content_length: u64) -> Self {
        Self {
            content_length: Some(content_length),
            ..self
        }
    }

    pub fn with_last_modified(self, last_modified: DateTime<Utc>) -> Self {
        Self {
            last_modified: Some(last_modified),
            ..self
        }
    }

    pub fn with_prefix_digest(self, digest: Option<String>) -> Self {
        Self {
            prefix_digest: digest,
            ..self
        }
    }

    /// True if any of the three header signals is present.
    pub fn has_header_signals(&self) -> bool {
        self.etag.is_some() || self.content_length.is_some() || self.last_modified.is_some()
    }
}
