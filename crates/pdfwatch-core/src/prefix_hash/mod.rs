//! Prefix hashing: fingerprint the first `chunk_size` bytes of a remote document.
//!
//! Sends `GET` with `Range: bytes=0-(chunk_size-1)` and hashes the body as it
//! streams, stopping once `chunk_size` bytes are in even if the server ignores
//! the range. A 416 answer is retried once without Range.

mod stream;

use crate::config::PdfwatchConfig;
use crate::digest::{self, DEFAULT_CHUNK_SIZE};
use crate::error::{classify_http_status, ProbeError};
use crate::http::HttpOptions;
use crate::observe::{default_observer, ProbeEvent, SharedObserver};
use serde::Serialize;
use std::fmt;
use stream::Attempt;

/// Outcome of one prefix hash.
#[derive(Debug, Clone, Serialize)]
pub struct HashResult {
    pub success: bool,
    pub url: String,
    /// Lowercase hex SHA-256 of the bytes read.
    pub digest: Option<String>,
    /// Bytes actually hashed: `chunk_size`, or less for a smaller resource.
    pub bytes_downloaded: u64,
    /// Size of the full resource, when the response reported it.
    pub total_content_length: Option<u64>,
    /// The ranged request was refused with 416 and a plain GET was used.
    pub range_fallback: bool,
    pub status_code: Option<u32>,
    pub error: Option<ProbeError>,
}

impl HashResult {
    fn failed(url: &str, error: ProbeError, range_fallback: bool) -> Self {
        Self {
            success: false,
            url: url.to_string(),
            digest: None,
            bytes_downloaded: 0,
            total_content_length: None,
            range_fallback,
            status_code: error.status_code(),
            error: Some(error),
        }
    }
}

/// Downloads and hashes a bounded prefix of a URL.
#[derive(Clone)]
pub struct PrefixHasher {
    chunk_size: u64,
    http: HttpOptions,
    observer: SharedObserver,
}

impl fmt::Debug for PrefixHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixHasher")
            .field("chunk_size", &self.chunk_size)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

impl Default for PrefixHasher {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, HttpOptions::default())
    }
}

impl PrefixHasher {
    /// `chunk_size` below 1 is raised to 1.
    pub fn new(chunk_size: u64, http: HttpOptions) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            http,
            observer: default_observer(),
        }
    }

    pub fn from_config(cfg: &PdfwatchConfig) -> Self {
        Self::new(cfg.chunk_size, cfg.hash_http_options())
    }

    pub fn with_observer(self, observer: SharedObserver) -> Self {
        Self { observer, ..self }
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Hash the first `chunk_size` bytes of `url`.
    pub fn hash_prefix(&self, url: &str) -> HashResult {
        self.observer.on_event(&ProbeEvent::HashStarted {
            url,
            chunk_size: self.chunk_size,
        });

        let mut range_fallback = false;
        match self.try_hash(url, &mut range_fallback) {
            Ok(attempt) => {
                self.observer.on_event(&ProbeEvent::HashComputed {
                    url,
                    digest: &attempt.digest,
                    bytes_downloaded: attempt.bytes_read,
                });
                HashResult {
                    success: true,
                    url: url.to_string(),
                    digest: Some(attempt.digest),
                    bytes_downloaded: attempt.bytes_read,
                    total_content_length: attempt.total_length,
                    range_fallback,
                    status_code: Some(attempt.status),
                    error: None,
                }
            }
            Err(error) => {
                self.observer
                    .on_event(&ProbeEvent::HashFailed { url, error: &error });
                HashResult::failed(url, error, range_fallback)
            }
        }
    }

    fn try_hash(&self, url: &str, range_fallback: &mut bool) -> Result<Attempt, ProbeError> {
        let ranged = stream::hash_once(url, &self.http, self.chunk_size, true)?;
        match classify_http_status(ranged.status) {
            Ok(()) => Ok(ranged),
            Err(ProbeError::RangeUnsupported) => {
                self.observer.on_event(&ProbeEvent::RangeUnsupported { url });
                *range_fallback = true;
                let plain = stream::hash_once(url, &self.http, self.chunk_size, false)?;
                classify_http_status(plain.status)?;
                Ok(plain)
            }
            Err(e) => Err(e),
        }
    }

    /// Compare a fresh digest with the stored one. No baseline is never a match.
    pub fn compare(&self, current: &str, previous: Option<&str>) -> bool {
        let matched = digest::digests_match(current, previous);
        self.observer.on_event(&ProbeEvent::DigestCompared {
            matched,
            baseline: previous.is_some(),
        });
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::testing::RecordingObserver;
    use std::sync::Arc;

    #[test]
    fn zero_chunk_size_is_raised() {
        assert_eq!(PrefixHasher::new(0, HttpOptions::default()).chunk_size(), 1);
        assert_eq!(PrefixHasher::default().chunk_size(), 65536);
    }

    #[test]
    fn compare_needs_a_baseline() {
        let obs = Arc::new(RecordingObserver::default());
        let hasher = PrefixHasher::default().with_observer(obs.clone());
        assert!(!hasher.compare("abcd", None));
        assert!(hasher.compare("abcd", Some("abcd")));
        assert!(!hasher.compare("abcd", Some("abce")));
        assert_eq!(obs.kinds(), vec!["digest_compared"; 3]);
    }

    #[test]
    fn invalid_url_is_a_failed_result() {
        let r = PrefixHasher::default().hash_prefix("mailto:clerk@example.test");
        assert!(!r.success);
        assert!(r.digest.is_none());
        assert_eq!(r.bytes_downloaded, 0);
        assert!(matches!(r.error, Some(ProbeError::InvalidUrl(_))));
    }
}
