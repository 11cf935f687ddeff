//! Structured events emitted by the checker and hasher.
//!
//! Components take an injectable [`ProbeObserver`]; the default forwards to
//! `tracing` so callers that just install a subscriber get useful logs.

use crate::error::{HeaderParseError, ProbeError};
use crate::header_check::Verdict;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One observable step of a check.
#[derive(Debug, Clone)]
pub enum ProbeEvent<'a> {
    CheckStarted {
        url: &'a str,
    },
    /// HEAD answered 405; retrying as `GET` with `Range: bytes=0-0`.
    HeadRejected {
        url: &'a str,
    },
    HeaderUnparsable {
        url: &'a str,
        error: &'a HeaderParseError,
    },
    /// Last-Modified moved while the ETag stayed put; the move is ignored.
    LastModifiedSuppressed {
        url: &'a str,
        current: DateTime<Utc>,
        previous: DateTime<Utc>,
    },
    CheckCompleted {
        url: &'a str,
        verdict: Verdict,
        headers_available: bool,
    },
    CheckFailed {
        url: &'a str,
        error: &'a ProbeError,
    },
    HashStarted {
        url: &'a str,
        chunk_size: u64,
    },
    /// Ranged GET answered 416; retrying as a plain GET.
    RangeUnsupported {
        url: &'a str,
    },
    HashComputed {
        url: &'a str,
        digest: &'a str,
        bytes_downloaded: u64,
    },
    HashFailed {
        url: &'a str,
        error: &'a ProbeError,
    },
    DigestCompared {
        matched: bool,
        baseline: bool,
    },
}

impl ProbeEvent<'_> {
    /// Stable snake_case name, handy for filtering and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeEvent::CheckStarted { .. } => "check_started",
            ProbeEvent::HeadRejected { .. } => "head_rejected",
            ProbeEvent::HeaderUnparsable { .. } => "header_unparsable",
            ProbeEvent::LastModifiedSuppressed { .. } => "last_modified_suppressed",
            ProbeEvent::CheckCompleted { .. } => "check_completed",
            ProbeEvent::CheckFailed { .. } => "check_failed",
            ProbeEvent::HashStarted { .. } => "hash_started",
            ProbeEvent::RangeUnsupported { .. } => "range_unsupported",
            ProbeEvent::HashComputed { .. } => "hash_computed",
            ProbeEvent::HashFailed { .. } => "hash_failed",
            ProbeEvent::DigestCompared { .. } => "digest_compared",
        }
    }
}

/// Receives events from checks. Must be cheap; it runs inline.
pub trait ProbeObserver: Send + Sync {
    fn on_event(&self, event: &ProbeEvent<'_>);
}

/// Shared observer handle held by components.
pub type SharedObserver = Arc<dyn ProbeObserver>;

/// Default observer: emits each event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProbeObserver for TracingObserver {
    fn on_event(&self, event: &ProbeEvent<'_>) {
        match event {
            ProbeEvent::CheckStarted { url } => tracing::info!(url, "checking HTTP headers"),
            ProbeEvent::HeadRejected { url } => {
                tracing::debug!(url, "HEAD not supported, trying GET with Range: bytes=0-0")
            }
            ProbeEvent::HeaderUnparsable { url, error } => {
                tracing::debug!(url, header = error.header, value = %error.value, "{}", error)
            }
            ProbeEvent::LastModifiedSuppressed {
                url,
                current,
                previous,
            } => tracing::debug!(
                url,
                current = %current.to_rfc3339(),
                previous = %previous.to_rfc3339(),
                "ignoring Last-Modified change, ETag unchanged"
            ),
            ProbeEvent::CheckCompleted {
                url,
                verdict,
                headers_available,
            } => tracing::info!(
                url,
                verdict = verdict.as_str(),
                headers_available,
                "header check complete"
            ),
            ProbeEvent::CheckFailed { url, error } => {
                tracing::warn!(url, status = ?error.status_code(), "header check failed: {}", error)
            }
            ProbeEvent::HashStarted { url, chunk_size } => {
                tracing::info!(url, chunk_size, "computing prefix hash")
            }
            ProbeEvent::RangeUnsupported { url } => {
                tracing::debug!(url, "range request not satisfiable, retrying without Range")
            }
            ProbeEvent::HashComputed {
                url,
                digest,
                bytes_downloaded,
            } => tracing::info!(
                url,
                digest = %short_digest(digest),
                bytes_downloaded,
                "prefix hash computed"
            ),
            ProbeEvent::HashFailed { url, error } => {
                tracing::warn!(url, status = ?error.status_code(), "prefix hash failed: {}", error)
            }
            ProbeEvent::DigestCompared { matched, baseline } => {
                tracing::debug!(matched, baseline, "prefix digest comparison")
            }
        }
    }
}

pub(crate) fn default_observer() -> SharedObserver {
    Arc::new(TracingObserver)
}

/// First 16 hex chars followed by an ellipsis.
pub(crate) fn short_digest(digest: &str) -> String {
    match digest.get(..16) {
        Some(head) if digest.len() > 16 => format!("{head}..."),
        _ => digest.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_digest_truncates_long_values() {
        let d = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_eq!(short_digest(d), "e3b0c44298fc1c14...");
        assert_eq!(short_digest("abcd"), "abcd");
    }

    #[test]
    fn event_kinds_are_stable() {
        assert_eq!(ProbeEvent::HeadRejected { url: "u" }.kind(), "head_rejected");
        assert_eq!(
            ProbeEvent::DigestCompared {
                matched: true,
                baseline: true
            }
            .kind(),
            "digest_compared"
        );
    }
}
