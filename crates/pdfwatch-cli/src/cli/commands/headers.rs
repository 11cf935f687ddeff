//! `pdfwatch headers` – header tier only.

use crate::cli::print_json;
use anyhow::Result;
use pdfwatch_core::config::PdfwatchConfig;
use pdfwatch_core::{can_skip_download, CheckResult, HeaderChecker, SignalSnapshot};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HeadersReport {
    #[serde(flatten)]
    result: CheckResult,
    can_skip_download: bool,
}

pub async fn run_headers(
    cfg: &PdfwatchConfig,
    url: String,
    prior: Option<SignalSnapshot>,
) -> Result<()> {
    let checker = HeaderChecker::from_config(cfg);
    let result = tokio::task::spawn_blocking(move || checker.check(&url, prior.as_ref())).await?;
    let report = HeadersReport {
        can_skip_download: can_skip_download(&result),
        result,
    };
    print_json(&report)
}
