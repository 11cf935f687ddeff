//! Failure taxonomy for header checks and prefix hashing.
//!
//! Terminal failures end up in a result's `error` field; header parse
//! failures never abort a check and only degrade a single field to absent.

use serde::Serialize;
use thiserror::Error;

/// Why a check or hash could not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProbeError {
    /// The transport gave up after the configured timeout.
    #[error("Timeout: {0}")]
    Timeout(String),
    /// The server answered with a status we do not handle.
    #[error("HTTP {0}")]
    HttpStatus(u32),
    /// 416 on a ranged request. Recovered internally unless the fallback fails too.
    #[error("HTTP 416 (range not satisfiable)")]
    RangeUnsupported,
    /// URL did not parse or is not http/https.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// DNS failure, connection refused or reset, TLS failure, etc.
    #[error("{0}")]
    Transport(String),
}

impl ProbeError {
    /// HTTP status attached to this failure, if any.
    pub fn status_code(&self) -> Option<u32> {
        match self {
            ProbeError::HttpStatus(code) => Some(*code),
            ProbeError::RangeUnsupported => Some(416),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout(_))
    }
}

impl From<curl::Error> for ProbeError {
    fn from(e: curl::Error) -> Self {
        classify_curl_error(&e)
    }
}

/// Classify a curl error into a probe failure kind.
pub fn classify_curl_error(e: &curl::Error) -> ProbeError {
    if e.is_operation_timedout() {
        return ProbeError::Timeout(e.to_string());
    }
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return ProbeError::InvalidUrl(e.to_string());
    }
    ProbeError::Transport(e.to_string())
}

/// Classify the final status of a body fetch. Only 200 and 206 carry a
/// usable body; other 2xx replies fail like any error status.
pub fn classify_http_status(code: u32) -> Result<(), ProbeError> {
    match code {
        200 | 206 => Ok(()),
        416 => Err(ProbeError::RangeUnsupported),
        _ => Err(ProbeError::HttpStatus(code)),
    }
}

/// A single header value that could not be interpreted. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparsable {header} header {value:?}: {reason}")]
pub struct HeaderParseError {
    pub header: &'static str,
    pub value: String,
    pub reason: String,
}
