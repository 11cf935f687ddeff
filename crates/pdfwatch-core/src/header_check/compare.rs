//! Pure comparison of current header signals against a prior snapshot.
//!
//! Priority is ETag > Content-Length > Last-Modified. A stable ETag on both
//! sides overrides any Last-Modified movement, since many servers stamp
//! Last-Modified with the request time.

use crate::snapshot::SignalSnapshot;
use serde::{Deserialize, Serialize};

/// Tri-state outcome of a header comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Unchanged,
    Changed,
    /// Nothing comparable: first check, no headers, or no overlapping signals.
    Indeterminate,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Unchanged => "unchanged",
            Verdict::Changed => "changed",
            Verdict::Indeterminate => "indeterminate",
        }
    }
}

/// Per-signal comparison flags. `None` means the signal was not compared
/// (absent on at least one side).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalChanges {
    pub etag: Option<bool>,
    pub content_length: Option<bool>,
    pub last_modified: Option<bool>,
}

impl SignalChanges {
    pub fn any_changed(&self) -> bool {
        [self.etag, self.content_length, self.last_modified]
            .iter()
            .any(|c| *c == Some(true))
    }

    pub fn any_compared(&self) -> bool {
        self.etag.is_some() || self.content_length.is_some() || self.last_modified.is_some()
    }
}

/// Result of [`compare_signals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub verdict: Verdict,
    pub changes: SignalChanges,
    /// Last-Modified differed but was discarded because the ETag held.
    pub last_modified_suppressed: bool,
}

/// Compare `current` header signals with `prior`. `prefix_digest` is ignored.
pub fn compare_signals(current: &SignalSnapshot, prior: Option<&SignalSnapshot>) -> Comparison {
    let Some(prior) = prior else {
        return Comparison {
            verdict: Verdict::Indeterminate,
            changes: SignalChanges::default(),
            last_modified_suppressed: false,
        };
    };

    let mut changes = SignalChanges::default();
    let mut last_modified_suppressed = false;

    if let (Some(cur), Some(prev)) = (&current.etag, &prior.etag) {
        changes.etag = Some(cur != prev);
    }

    if let (Some(cur), Some(prev)) = (current.content_length, prior.content_length) {
        changes.content_length = Some(cur != prev);
    }

    if let (Some(cur), Some(prev)) = (current.last_modified, prior.last_modified) {
        let differs = cur != prev;
        if changes.etag == Some(false) {
            last_modified_suppressed = differs;
            changes.last_modified = Some(false);
        } else {
            changes.last_modified = Some(differs);
        }
    }

    let verdict = if changes.any_changed() {
        Verdict::Changed
    } else if current.has_header_signals() && changes.any_compared() {
        Verdict::Unchanged
    } else {
        Verdict::Indeterminate
    };

    Comparison {
        verdict,
        changes,
        last_modified_suppressed,
    }
}
