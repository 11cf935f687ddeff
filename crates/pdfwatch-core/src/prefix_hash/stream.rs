//! One streamed GET feeding a prefix digest.

use crate::digest::PrefixDigest;
use crate::error::ProbeError;
use crate::http::{self, HttpOptions};

/// What a single GET produced.
#[derive(Debug, Clone)]
pub(super) struct Attempt {
    pub status: u32,
    pub digest: String,
    pub bytes_read: u64,
    pub total_length: Option<u64>,
}

/// GET `url` (ranged to `0..chunk_size` when `ranged`), hashing at most
/// `chunk_size` body bytes and abandoning the stream once they are in.
/// The digest is only meaningful for 2xx statuses.
pub(super) fn hash_once(
    url: &str,
    opts: &HttpOptions,
    chunk_size: u64,
    ranged: bool,
) -> Result<Attempt, ProbeError> {
    let range = ranged.then(|| format!("0-{}", chunk_size.saturating_sub(1)));
    let mut digest = PrefixDigest::new(chunk_size);

    let resp = http::stream_body(url, opts, range.as_deref(), |data| {
        digest.feed(data);
        !digest.is_full()
    })?;

    let (digest, bytes_read) = digest.finish();
    Ok(Attempt {
        status: resp.status,
        digest,
        bytes_read,
        total_length: resp.head.total_length(),
    })
}
