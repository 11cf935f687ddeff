//! Tiered detection: header check first, prefix hash only when headers are
//! not conclusive.
//!
//! Callers with their own sequencing can use [`HeaderChecker`] and
//! [`PrefixHasher`] directly; this is the default order.

use crate::config::PdfwatchConfig;
use crate::header_check::{can_skip_download, CheckResult, HeaderChecker, Verdict};
use crate::observe::SharedObserver;
use crate::prefix_hash::{HashResult, PrefixHasher};
use crate::snapshot::SignalSnapshot;
use serde::Serialize;

/// Final answer of a tiered check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Safe to skip the full download.
    Unchanged,
    /// Download and process the document.
    Changed,
    /// Both tiers failed; re-check later. Never treat as unchanged.
    Unknown,
}

/// Which tier produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Headers,
    PrefixHash,
}

#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub decision: Decision,
    pub tier: Tier,
    /// Signals to persist for the next check.
    pub snapshot: SignalSnapshot,
    pub header: CheckResult,
    pub hash: Option<HashResult>,
}

/// Runs the header checker and, if needed, the prefix hasher.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    checker: HeaderChecker,
    hasher: PrefixHasher,
}

impl ChangeDetector {
    pub fn new(checker: HeaderChecker, hasher: PrefixHasher) -> Self {
        Self { checker, hasher }
    }

    pub fn from_config(cfg: &PdfwatchConfig) -> Self {
        Self::new(HeaderChecker::from_config(cfg), PrefixHasher::from_config(cfg))
    }

    pub fn with_observer(self, observer: SharedObserver) -> Self {
        Self {
            checker: self.checker.with_observer(observer.clone()),
            hasher: self.hasher.with_observer(observer),
        }
    }

    pub fn checker(&self) -> &HeaderChecker {
        &self.checker
    }

    pub fn hasher(&self) -> &PrefixHasher {
        &self.hasher
    }

    pub fn detect(&self, url: &str, prior: Option<&SignalSnapshot>) -> Detection {
        let header = self.checker.check(url, prior);

        if can_skip_download(&header) {
            return Detection {
                decision: Decision::Unchanged,
                tier: Tier::Headers,
                snapshot: header.snapshot.clone(),
                header,
                hash: None,
            };
        }

        if header.success && header.verdict == Verdict::Changed {
            // Stored prefix digest describes the old content.
            return Detection {
                decision: Decision::Changed,
                tier: Tier::Headers,
                snapshot: header.snapshot.clone().with_prefix_digest(None),
                header,
                hash: None,
            };
        }

        let hash = self.hasher.hash_prefix(url);
        let previous_digest = prior.and_then(|p| p.prefix_digest.as_deref());
        let base = if header.success {
            header.snapshot.clone()
        } else {
            prior.cloned().unwrap_or_default()
        };

        let (decision, snapshot) = match hash.digest.as_deref() {
            Some(digest) if hash.success => {
                let decision = if self.hasher.compare(digest, previous_digest) {
                    Decision::Unchanged
                } else {
                    Decision::Changed
                };
                (decision, base.with_prefix_digest(Some(digest.to_string())))
            }
            _ => (Decision::Unknown, base),
        };

        Detection {
            decision,
            tier: Tier::PrefixHash,
            snapshot,
            header,
            hash: Some(hash),
        }
    }
}
