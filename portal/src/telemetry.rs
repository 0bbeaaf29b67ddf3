//! Structured logging setup.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already installed; the
/// failure is logged through the existing subscriber instead of panicking.
pub fn init() -> bool {
    match fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "tracing init failed");
            false
        }
    }
}
