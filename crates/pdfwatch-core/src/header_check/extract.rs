//! Pull ETag / Content-Length / Last-Modified out of a response head.

use crate::error::HeaderParseError;
use crate::http::{content_range_total, ResponseHead};
use crate::snapshot::SignalSnapshot;
use chrono::{DateTime, Utc};

/// Header signals of one response plus the per-field parse failures.
#[derive(Debug, Clone, Default)]
pub(crate) struct Extracted {
    pub signals: SignalSnapshot,
    pub parse_errors: Vec<HeaderParseError>,
}

impl Extracted {
    pub fn headers_available(&self) -> bool {
        self.signals.has_header_signals()
    }
}

pub(crate) fn extract_signals(head: &ResponseHead) -> Extracted {
    let mut out = Extracted::default();

    if let Some(raw) = head.get("last-modified") {
        match parse_http_date(raw) {
            Ok(ts) => out.signals.last_modified = Some(ts),
            Err(e) => out.parse_errors.push(e),
        }
    }

    if let Some(raw) = head.get("etag") {
        let etag = raw.trim_matches('"');
        if !etag.is_empty() {
            out.signals.etag = Some(etag.to_string());
        }
    }

    // A ranged fallback answers 206 with Content-Length 1; the full size is in Content-Range.
    let range_total = if head.status == Some(206) {
        head.get("content-range").and_then(content_range_total)
    } else {
        None
    };
    if range_total.is_some() {
        out.signals.content_length = range_total;
    } else if let Some(raw) = head.get("content-length") {
        match raw.parse::<u64>() {
            Ok(n) => out.signals.content_length = Some(n),
            Err(e) => out.parse_errors.push(HeaderParseError {
                header: "Content-Length",
                value: raw.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    out
}

/// Parse an RFC 2822 style HTTP date (`Wed, 21 Oct 2015 07:28:00 GMT`).
pub fn parse_http_date(raw: &str) -> Result<DateTime<Utc>, HeaderParseError> {
    DateTime::parse_from_rfc2822(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| HeaderParseError {
            header: "Last-Modified",
            value: raw.to_string(),
            reason: e.to_string(),
        })
}
