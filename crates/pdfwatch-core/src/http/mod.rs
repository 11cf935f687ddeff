//! Shared HTTP plumbing for the checker and hasher.
//!
//! Uses the curl crate (libcurl) with one Easy handle per request. Handles
//! are dropped before returning, so nothing is held between checks. Calls
//! block the current thread; use `spawn_blocking` from async code.

mod head;

pub use head::{content_range_total, parse_status_line, ResponseHead};

use crate::error::ProbeError;
use std::cell::RefCell;
use std::str;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
pub const ACCEPT: &str = "application/pdf,*/*";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Size of each body read handed to the digest.
pub const DEFAULT_READ_BUFFER: usize = 8192;
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Client settings applied to every request.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Connect timeout; `None` uses `timeout`.
    pub connect_timeout: Option<Duration>,
    pub user_agent: String,
    pub accept_language: String,
    pub max_redirects: u32,
    pub read_buffer_bytes: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            read_buffer_bytes: DEFAULT_READ_BUFFER,
        }
    }
}

impl HttpOptions {
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }
}

/// Request method used by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
}

/// Reject anything that is not an absolute http(s) URL before touching the network.
pub fn validate_url(raw: &str) -> Result<url::Url, ProbeError> {
    let parsed = url::Url::parse(raw).map_err(|e| ProbeError::InvalidUrl(format!("{raw}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ProbeError::InvalidUrl(format!(
            "{raw}: unsupported scheme {other:?}"
        ))),
    }
}

/// Configure an Easy handle with the shared client settings.
/// `range` is a curl byte range such as `0-65535` (sent as `Range: bytes=0-65535`).
fn new_easy(
    url: &str,
    opts: &HttpOptions,
    method: Method,
    range: Option<&str>,
) -> Result<curl::easy::Easy, ProbeError> {
    validate_url(url)?;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    match method {
        Method::Head => easy.nobody(true)?,
        Method::Get => easy.get(true)?,
    }
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirects)?;
    easy.connect_timeout(opts.connect_timeout.unwrap_or(opts.timeout))?;
    easy.timeout(opts.timeout)?;
    easy.buffer_size(opts.read_buffer_bytes.max(1024))?;
    easy.useragent(&opts.user_agent)?;

    let mut list = curl::easy::List::new();
    list.append(&format!("Accept: {ACCEPT}"))?;
    list.append(&format!("Accept-Language: {}", opts.accept_language))?;
    easy.http_headers(list)?;

    if let Some(range) = range {
        easy.range(range)?;
    }
    Ok(easy)
}

/// Status and headers of a header-only exchange.
#[derive(Debug, Clone)]
pub struct HeadResponse {
    pub status: u32,
    pub head: ResponseHead,
}

/// Perform a request and keep only the response headers.
///
/// Any body bytes (e.g. the single byte of a `bytes=0-0` GET, or a server
/// that ignores Range) abort the transfer at once; that abort is not an error.
pub fn fetch_headers(
    url: &str,
    opts: &HttpOptions,
    method: Method,
    range: Option<&str>,
) -> Result<HeadResponse, ProbeError> {
    let mut easy = new_easy(url, opts, method, range)?;
    let mut head = ResponseHead::default();
    let mut body_seen = false;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                head.push_line(s);
            }
            true
        })?;
        transfer.write_function(|_data| {
            body_seen = true;
            Ok(0)
        })?;
        transfer.perform()
    };
    if let Err(e) = performed {
        if !(e.is_write_error() && body_seen) {
            return Err(e.into());
        }
    }

    let status = easy.response_code()?;
    Ok(HeadResponse { status, head })
}

/// Outcome of a streamed body request.
#[derive(Debug, Clone)]
pub struct BodyResponse {
    pub status: u32,
    pub head: ResponseHead,
    /// The sink asked to stop before the body ended.
    pub stopped_early: bool,
}

/// Stream a GET body into `sink` in read-buffer sized pieces.
///
/// Only bodies of 2xx responses reach the sink; any other status aborts the
/// transfer on the first body byte. `sink` returns false once it wants no more
/// data, which abandons the rest of the stream.
pub fn stream_body<F>(
    url: &str,
    opts: &HttpOptions,
    range: Option<&str>,
    mut sink: F,
) -> Result<BodyResponse, ProbeError>
where
    F: FnMut(&[u8]) -> bool,
{
    let mut easy = new_easy(url, opts, Method::Get, range)?;
    let head = RefCell::new(ResponseHead::default());
    let mut stopped_early = false;
    let mut rejected = false;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                head.borrow_mut().push_line(s);
            }
            true
        })?;
        transfer.write_function(|data| {
            let ok_status = matches!(head.borrow().status, Some(200..=299));
            if !ok_status {
                rejected = true;
                return Ok(0);
            }
            if sink(data) {
                Ok(data.len())
            } else {
                stopped_early = true;
                Ok(0)
            }
        })?;
        transfer.perform()
    };
    if let Err(e) = performed {
        if !(e.is_write_error() && (stopped_early || rejected)) {
            return Err(e.into());
        }
    }

    let status = easy.response_code()?;
    Ok(BodyResponse {
        status,
        head: head.into_inner(),
        stopped_early,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_client_contract() {
        let opts = HttpOptions::default();
        assert_eq!(opts.timeout, Duration::from_secs(10));
        assert_eq!(opts.read_buffer_bytes, 8192);
        assert!(opts.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(opts.accept_language, "en-US,en;q=0.9");
    }

    #[test]
    fn with_timeout_overrides_only_timeout() {
        let opts = HttpOptions::default().with_timeout(Duration::from_millis(250));
        assert_eq!(opts.timeout, Duration::from_millis(250));
        assert_eq!(opts.max_redirects, DEFAULT_MAX_REDIRECTS);
    }

    #[test]
    fn validate_url_accepts_http_and_https() {
        assert!(validate_url("http://127.0.0.1:8080/form.pdf").is_ok());
        assert!(validate_url("https://courts.example.gov/forms/fl-100.pdf").is_ok());
    }

    #[test]
    fn validate_url_rejects_other_schemes_and_garbage() {
        assert!(matches!(
            validate_url("ftp://example.com/a.pdf"),
            Err(ProbeError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_url("not a url"),
            Err(ProbeError::InvalidUrl(_))
        ));
    }

    #[test]
    fn invalid_url_fails_before_any_request() {
        let r = fetch_headers("file:///etc/passwd", &HttpOptions::default(), Method::Head, None);
        assert!(matches!(r, Err(ProbeError::InvalidUrl(_))));
    }
}
