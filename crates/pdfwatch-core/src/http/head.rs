//! Parse HTTP response header lines as delivered by libcurl's header callback.

/// Status and headers of the final response in a (possibly redirected) exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: Option<u32>,
    headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// Build from complete header lines.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut head = Self::default();
        for line in lines {
            head.push_line(line.as_ref());
        }
        head
    }

    /// Feed one raw header line. A status line starts a new response, so
    /// headers of redirect hops are dropped.
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            *self = Self {
                status: parse_status_line(line),
                headers: Vec::new(),
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            self.headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    /// Last value of header `name` (case-insensitive), if present and non-empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Full resource size: the `Content-Range` total on a 206, otherwise `Content-Length`.
    pub fn total_length(&self) -> Option<u64> {
        if self.status == Some(206) {
            if let Some(total) = self.get("content-range").and_then(content_range_total) {
                return Some(total);
            }
        }
        self.get("content-length")
            .and_then(|v| v.parse::<u64>().ok())
    }
}

/// `HTTP/1.1 206 Partial Content` -> 206.
pub fn parse_status_line(line: &str) -> Option<u32> {
    let mut parts = line.split_whitespace();
    let proto = parts.next()?;
    if !proto.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// `bytes 0-0/5000` or `bytes */5000` -> 5000. Unknown totals (`/*`) yield None.
pub fn content_range_total(value: &str) -> Option<u64> {
    let rest = value.trim().strip_prefix("bytes")?.trim_start();
    let (_, total) = rest.rsplit_once('/')?;
    total.trim().parse().ok()
}
