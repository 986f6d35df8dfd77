//! Tracing/logging initialization for userdesk processes.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,reqwest=warn";

/// Initialize structured JSON logging.
///
/// The filter comes from `RUST_LOG` when set; otherwise workflow events log
/// at `info` with HTTP-client noise kept down. Safe to call more than once
/// (later calls are no-ops).
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Like [`init`], with an explicit fallback filter for callers that want a
/// different verbosity without touching the environment.
pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .try_init();
}
