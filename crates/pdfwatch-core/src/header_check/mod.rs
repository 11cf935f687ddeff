//! Header-based change check.
//!
//! Issues a HEAD (falling back to `GET` with `Range: bytes=0-0` on 405),
//! extracts ETag / Content-Length / Last-Modified and compares them with the
//! caller's prior snapshot. Never panics or returns `Err`; failures are
//! reported through [`CheckResult::error`].

mod compare;
mod extract;

pub use compare::{compare_signals, Comparison, SignalChanges, Verdict};
pub use extract::parse_http_date;

use crate::config::PdfwatchConfig;
use crate::error::ProbeError;
use crate::http::{self, HeadResponse, HttpOptions, Method};
use crate::observe::{default_observer, ProbeEvent, SharedObserver};
use crate::snapshot::SignalSnapshot;
use serde::Serialize;
use std::fmt;

/// Outcome of one header check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub success: bool,
    pub url: String,
    pub verdict: Verdict,
    /// Signals to persist. On failure this is the prior snapshot unchanged;
    /// on a `Changed` verdict the prior prefix digest is dropped.
    pub snapshot: SignalSnapshot,
    pub changes: SignalChanges,
    /// At least one of the three headers was extracted.
    pub headers_available: bool,
    pub status_code: Option<u32>,
    pub error: Option<ProbeError>,
}

impl CheckResult {
    fn failed(url: &str, prior: Option<&SignalSnapshot>, error: ProbeError) -> Self {
        Self {
            success: false,
            url: url.to_string(),
            verdict: Verdict::Indeterminate,
            snapshot: prior.cloned().unwrap_or_default(),
            changes: SignalChanges::default(),
            headers_available: false,
            status_code: error.status_code(),
            error: Some(error),
        }
    }

    pub fn etag_changed(&self) -> bool {
        self.changes.etag == Some(true)
    }

    pub fn content_length_changed(&self) -> bool {
        self.changes.content_length == Some(true)
    }

    pub fn last_modified_changed(&self) -> bool {
        self.changes.last_modified == Some(true)
    }
}

/// Whether the caller can skip any download based on `result` alone.
///
/// Failed checks never skip. An indeterminate verdict still skips when ETag
/// and Content-Length were both present, compared and unchanged.
pub fn can_skip_download(result: &CheckResult) -> bool {
    if !result.success {
        return false;
    }
    match result.verdict {
        Verdict::Unchanged => true,
        Verdict::Changed => false,
        Verdict::Indeterminate => {
            result.snapshot.etag.is_some()
                && result.changes.etag == Some(false)
                && result.snapshot.content_length.is_some()
                && result.changes.content_length == Some(false)
        }
    }
}

/// Checks response headers of a URL against a prior snapshot.
#[derive(Clone)]
pub struct HeaderChecker {
    http: HttpOptions,
    observer: SharedObserver,
}

impl fmt::Debug for HeaderChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderChecker")
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

impl Default for HeaderChecker {
    fn default() -> Self {
        Self::new(HttpOptions::default())
    }
}

impl HeaderChecker {
    pub fn new(http: HttpOptions) -> Self {
        Self {
            http,
            observer: default_observer(),
        }
    }

    pub fn from_config(cfg: &PdfwatchConfig) -> Self {
        Self::new(cfg.header_http_options())
    }

    pub fn with_observer(self, observer: SharedObserver) -> Self {
        Self { observer, ..self }
    }

    pub fn http_options(&self) -> &HttpOptions {
        &self.http
    }

    /// Fetch headers for `url` and compare them with `prior`.
    pub fn check(&self, url: &str, prior: Option<&SignalSnapshot>) -> CheckResult {
        self.observer.on_event(&ProbeEvent::CheckStarted { url });

        let resp = match self.fetch(url) {
            Ok(resp) => resp,
            Err(error) => {
                self.observer
                    .on_event(&ProbeEvent::CheckFailed { url, error: &error });
                return CheckResult::failed(url, prior, error);
            }
        };

        let extracted = extract::extract_signals(&resp.head);
        for error in &extracted.parse_errors {
            self.observer
                .on_event(&ProbeEvent::HeaderUnparsable { url, error });
        }
        let headers_available = extracted.headers_available();
        let current = extracted.signals;

        let cmp = compare_signals(&current, prior);
        if cmp.last_modified_suppressed {
            if let (Some(current), Some(previous)) = (
                current.last_modified,
                prior.and_then(|p| p.last_modified),
            ) {
                self.observer.on_event(&ProbeEvent::LastModifiedSuppressed {
                    url,
                    current,
                    previous,
                });
            }
        }

        self.observer.on_event(&ProbeEvent::CheckCompleted {
            url,
            verdict: cmp.verdict,
            headers_available,
        });

        // A stored digest describes the old content once headers report a change.
        let prefix_digest = match cmp.verdict {
            Verdict::Changed => None,
            _ => prior.and_then(|p| p.prefix_digest.clone()),
        };
        CheckResult {
            success: true,
            url: url.to_string(),
            verdict: cmp.verdict,
            snapshot: current.with_prefix_digest(prefix_digest),
            changes: cmp.changes,
            headers_available,
            status_code: Some(resp.status),
            error: None,
        }
    }

    /// HEAD, or a one-byte ranged GET when HEAD is refused with 405.
    fn fetch(&self, url: &str) -> Result<HeadResponse, ProbeError> {
        let mut resp = http::fetch_headers(url, &self.http, Method::Head, None)?;
        if resp.status == 405 {
            self.observer.on_event(&ProbeEvent::HeadRejected { url });
            resp = http::fetch_headers(url, &self.http, Method::Get, Some("0-0"))?;
        }
        if !(200..=299).contains(&resp.status) {
            return Err(ProbeError::HttpStatus(resp.status));
        }
        Ok(resp)
    }
}
