//! `pdfwatch digest` – prefix digest of a local file.

use anyhow::Result;
use pdfwatch_core::config::PdfwatchConfig;
use pdfwatch_core::digest;
use std::path::Path;

/// Compute and print the prefix digest of the given file.
pub fn run_digest(cfg: &PdfwatchConfig, path: &Path, chunk_size: Option<u64>) -> Result<()> {
    let chunk_size = chunk_size.unwrap_or(cfg.chunk_size).max(1);
    let (digest, bytes) = digest::prefix_digest_path(path, chunk_size)?;
    println!("{}  {}  ({} bytes)", digest, path.display(), bytes);
    Ok(())
}
