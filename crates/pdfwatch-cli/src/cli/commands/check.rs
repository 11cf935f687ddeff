//! `pdfwatch check` – tiered detection for one or more URLs.

use crate::cli::print_json;
use anyhow::Result;
use pdfwatch_core::config::PdfwatchConfig;
use pdfwatch_core::{ChangeDetector, Decision, SignalSnapshot};

/// Runs every URL on the blocking pool at once and prints the detections in
/// input order.
pub async fn run_check(
    cfg: &PdfwatchConfig,
    urls: Vec<String>,
    prior: Option<SignalSnapshot>,
) -> Result<()> {
    let detector = ChangeDetector::from_config(cfg);

    let handles: Vec<_> = urls
        .into_iter()
        .map(|url| {
            let detector = detector.clone();
            let prior = prior.clone();
            tokio::task::spawn_blocking(move || detector.detect(&url, prior.as_ref()))
        })
        .collect();

    let mut detections = Vec::with_capacity(handles.len());
    for handle in handles {
        detections.push(handle.await?);
    }

    let unknown = detections
        .iter()
        .filter(|d| d.decision == Decision::Unknown)
        .count();
    if unknown > 0 {
        tracing::warn!(unknown, "some URLs could not be checked; re-check later");
    }

    print_json(&detections)
}
