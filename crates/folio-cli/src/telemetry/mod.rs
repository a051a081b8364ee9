//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;

/// Initializes the tracing subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(crate) fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_directive = if verbose { "debug" } else { "warn" };
    tracing::init_tracing(default_directive).context("Failed to initialize tracing")
}
