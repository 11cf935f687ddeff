//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a single static body with configurable ETag / Last-Modified and
//! configurable misbehaviour: HEAD blocked (405), Range rejected (416),
//! Range ignored (200 with the full body), fixed error status, slow replies.
//! Counts requests by method so tests can assert on the request strategy.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Sent quoted, e.g. `abc123` -> `ETag: "abc123"`.
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    /// HEAD answers 405 (servers that block HEAD).
    pub block_head: bool,
    /// Any request carrying Range answers 416.
    pub reject_ranges: bool,
    /// Range is ignored; GET always answers 200 with the full body.
    pub ignore_ranges: bool,
    /// Every request answers this status with an empty body.
    pub fixed_status: Option<u16>,
    /// Sleep before answering.
    pub delay: Option<Duration>,
}

/// Requests seen by the server.
#[derive(Debug, Default)]
pub struct Hits {
    pub head: AtomicUsize,
    pub get: AtomicUsize,
    pub ranges: Mutex<Vec<Option<String>>>,
}

impl Hits {
    pub fn head(&self) -> usize {
        self.head.load(Ordering::SeqCst)
    }

    pub fn get(&self) -> usize {
        self.get.load(Ordering::SeqCst)
    }

    /// Raw Range header of each GET, in order.
    pub fn ranges(&self) -> Vec<Option<String>> {
        self.ranges.lock().unwrap().clone()
    }
}

pub struct TestServer {
    pub url: String,
    pub hits: Arc<Hits>,
}

/// Starts a server in a background thread serving `body`. Runs until the process exits.
pub fn start(body: Vec<u8>, opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let opts = Arc::new(opts);
    let hits = Arc::new(Hits::default());
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = Arc::clone(&opts);
            let hits = Arc::clone(&hits_srv);
            thread::spawn(move || handle(stream, &body, &opts, &hits));
        }
    });
    TestServer {
        url: format!("http://127.0.0.1:{}/form.pdf", port),
        hits,
    }
}

/// A URL on a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/form.pdf", port)
}

/// Deterministic pseudo-PDF body of `len` bytes.
pub fn pdf_body(len: usize, seed: u8) -> Vec<u8> {
    let mut body = b"%PDF-1.4\n".to_vec();
    body.extend((0..len as u64).map(|i| (i.wrapping_mul(31) as u8) ^ seed));
    body.truncate(len);
    body
}

fn handle(mut stream: TcpStream, body: &[u8], opts: &ServerOptions, hits: &Hits) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, range_raw, range) = parse_request(request);
    let is_head = method.eq_ignore_ascii_case("HEAD");
    if is_head {
        hits.head.fetch_add(1, Ordering::SeqCst);
    } else {
        hits.get.fetch_add(1, Ordering::SeqCst);
        hits.ranges.lock().unwrap().push(range_raw.clone());
    }

    if let Some(d) = opts.delay {
        thread::sleep(d);
    }

    if let Some(code) = opts.fixed_status {
        let response = format!(
            "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            code
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let mut validators = String::new();
    if let Some(etag) = &opts.etag {
        validators.push_str(&format!("ETag: \"{}\"\r\n", etag));
    }
    if let Some(lm) = &opts.last_modified {
        validators.push_str(&format!("Last-Modified: {}\r\n", lm));
    }

    let total = body.len() as u64;
    if is_head {
        if opts.block_head {
            let _ = stream.write_all(
                b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
            return;
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
            total, validators
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(
            b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    let (status, content_range, slice): (&str, Option<String>, &[u8]) =
        match (range, opts.ignore_ranges) {
            (Some(_), false) if opts.reject_ranges => (
                "416 Range Not Satisfiable",
                Some(format!("bytes */{}", total)),
                &body[0..0],
            ),
            (Some((start, end_incl)), false) => {
                let end_incl = end_incl.min(total.saturating_sub(1));
                if start >= total || start > end_incl {
                    (
                        "416 Range Not Satisfiable",
                        Some(format!("bytes */{}", total)),
                        &body[0..0],
                    )
                } else {
                    let slice = &body[start as usize..=end_incl as usize];
                    (
                        "206 Partial Content",
                        Some(format!("bytes {}-{}/{}", start, end_incl, total)),
                        slice,
                    )
                }
            }
            _ => ("200 OK", None, body),
        };

    let content_range = content_range
        .map(|v| format!("Content-Range: {}\r\n", v))
        .unwrap_or_default();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/pdf\r\nContent-Length: {}\r\n{}{}Connection: close\r\n\r\n",
        status,
        slice.len(),
        content_range,
        validators
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(slice);
}

/// Returns (method, raw Range value, optional (start, end_inclusive) for `bytes=X-Y`).
fn parse_request(request: &str) -> (&str, Option<String>, Option<(u64, u64)>) {
    let mut method = "";
    let mut raw = None;
    let mut range = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            method = line.split_whitespace().next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                let value = value.trim();
                raw = Some(value.to_string());
                if let Some(part) = value.strip_prefix("bytes=") {
                    if let Some((a, b)) = part.split_once('-') {
                        let start = a.trim().parse::<u64>().unwrap_or(0);
                        let end = b.trim();
                        let end_incl = if end.is_empty() {
                            u64::MAX
                        } else {
                            end.parse::<u64>().unwrap_or(0)
                        };
                        range = Some((start, end_incl));
                    }
                }
            }
        }
    }
    (method, raw, range)
}
