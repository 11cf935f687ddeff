//! SHA-256 digest of a bounded byte prefix.
//!
//! The digest is a pure function of the bytes fed, in order, with no padding
//! or length prefix, so a digest taken over HTTP and one taken from a local
//! copy of the same file agree.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default prefix length: 64 KiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 64 * 1024;

const BUF_SIZE: usize = 8 * 1024;

/// Incremental SHA-256 that stops accepting bytes after `limit`.
#[derive(Debug, Clone)]
pub struct PrefixDigest {
    hasher: Sha256,
    limit: u64,
    consumed: u64,
}

impl PrefixDigest {
    pub fn new(limit: u64) -> Self {
        Self {
            hasher: Sha256::new(),
            limit,
            consumed: 0,
        }
    }

    /// Hash as much of `data` as fits under the limit. Returns the number of
    /// bytes taken.
    pub fn feed(&mut self, data: &[u8]) -> usize {
        let room = self.remaining().min(data.len() as u64) as usize;
        if room > 0 {
            self.hasher.update(&data[..room]);
            self.consumed += room as u64;
        }
        room
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Lowercase hex digest and byte count.
    pub fn finish(self) -> (String, u64) {
        (hex::encode(self.hasher.finalize()), self.consumed)
    }
}

/// Whether two prefix digests match. No baseline never matches.
pub fn digests_match(current: &str, previous: Option<&str>) -> bool {
    match previous {
        None => false,
        Some(previous) => current.as_bytes() == previous.as_bytes(),
    }
}

/// Digest of the first `chunk_size` bytes of a local file, as lowercase hex,
/// plus the number of bytes hashed.
pub fn prefix_digest_path(path: &Path, chunk_size: u64) -> Result<(String, u64)> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut digest = PrefixDigest::new(chunk_size);
    let mut buf = [0u8; BUF_SIZE];
    while !digest.is_full() {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        digest.feed(&buf[..n]);
    }
    Ok(digest.finish())
}
