//! CLI command handlers. Each command is in its own file.

mod check;
mod digest;
mod hash;
mod headers;

pub use check::run_check;
pub use digest::run_digest;
pub use hash::run_hash;
pub use headers::run_headers;
