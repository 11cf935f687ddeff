pub mod config;
pub mod logging;

pub mod digest;
pub mod error;
pub mod header_check;
pub mod http;
pub mod observe;
pub mod prefix_hash;
pub mod snapshot;
pub mod tiered;

pub use error::ProbeError;
pub use header_check::{can_skip_download, CheckResult, HeaderChecker, SignalChanges, Verdict};
pub use prefix_hash::{HashResult, PrefixHasher};
pub use snapshot::SignalSnapshot;
pub use tiered::{ChangeDetector, Decision, Detection, Tier};
