//! CLI for pdfwatch: run header checks, prefix hashes and tiered detection
//! against URLs and print the results as JSON.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdfwatch_core::config;
use pdfwatch_core::SignalSnapshot;
use std::path::{Path, PathBuf};

use commands::{run_check, run_digest, run_hash, run_headers};

/// Top-level CLI for pdfwatch.
#[derive(Debug, Parser)]
#[command(name = "pdfwatch")]
#[command(about = "pdfwatch: detect changes to remote PDFs without downloading them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compare ETag / Content-Length / Last-Modified with a prior snapshot.
    Headers {
        url: String,
        /// JSON file holding the prior snapshot.
        #[arg(long, value_name = "FILE")]
        prior: Option<PathBuf>,
    },

    /// Hash the first bytes of a URL and compare with the prior digest.
    Hash {
        url: String,
        /// Bytes to hash (default from config, 65536).
        #[arg(long, value_name = "BYTES")]
        chunk_size: Option<u64>,
        #[arg(long, value_name = "FILE")]
        prior: Option<PathBuf>,
    },

    /// Header check, then prefix hash when headers are inconclusive.
    Check {
        /// One or more URLs; several are checked concurrently.
        #[arg(required = true)]
        urls: Vec<String>,
        /// Prior snapshot, applied to every URL.
        #[arg(long, value_name = "FILE")]
        prior: Option<PathBuf>,
    },

    /// Prefix digest of a local file (seed a baseline from a downloaded copy).
    Digest {
        path: PathBuf,
        #[arg(long, value_name = "BYTES")]
        chunk_size: Option<u64>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Headers { url, prior } => {
                let prior = read_prior(prior.as_deref())?;
                run_headers(&cfg, url, prior).await?
            }
            CliCommand::Hash {
                url,
                chunk_size,
                prior,
            } => {
                let prior = read_prior(prior.as_deref())?;
                run_hash(&cfg, url, chunk_size, prior).await?
            }
            CliCommand::Check { urls, prior } => {
                let prior = read_prior(prior.as_deref())?;
                run_check(&cfg, urls, prior).await?
            }
            CliCommand::Digest { path, chunk_size } => run_digest(&cfg, &path, chunk_size)?,
        }

        Ok(())
    }
}

/// Load a prior snapshot from a JSON file, if one was given.
pub(crate) fn read_prior(path: Option<&Path>) -> Result<Option<SignalSnapshot>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read prior snapshot {}", path.display()))?;
    let snapshot = serde_json::from_str(&data)
        .with_context(|| format!("parse prior snapshot {}", path.display()))?;
    Ok(Some(snapshot))
}

/// Print any serializable result as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
