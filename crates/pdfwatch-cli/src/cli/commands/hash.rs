//! `pdfwatch hash` – prefix-hash tier only.

use crate::cli::print_json;
use anyhow::Result;
use pdfwatch_core::config::PdfwatchConfig;
use pdfwatch_core::{HashResult, PrefixHasher, SignalSnapshot};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HashReport {
    #[serde(flatten)]
    result: HashResult,
    /// Digest equals the prior snapshot's digest.
    matches_prior: bool,
}

pub async fn run_hash(
    cfg: &PdfwatchConfig,
    url: String,
    chunk_size: Option<u64>,
    prior: Option<SignalSnapshot>,
) -> Result<()> {
    let hasher = PrefixHasher::new(
        chunk_size.unwrap_or(cfg.chunk_size),
        cfg.hash_http_options(),
    );
    let result = {
        let hasher = hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_prefix(&url)).await?
    };
    let previous = prior.as_ref().and_then(|p| p.prefix_digest.as_deref());
    let matches_prior = match result.digest.as_deref() {
        Some(digest) => hasher.compare(digest, previous),
        None => false,
    };
    print_json(&HashReport {
        result,
        matches_prior,
    })
}
