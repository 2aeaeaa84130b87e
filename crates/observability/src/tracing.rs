//! Tracing/logging initialization and request correlation ids.

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Initialize tracing/logging for the process.
///
/// `default_filter` applies when `RUST_LOG` is unset or unparsable.
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// A fresh, time-ordered id for correlating the log lines of one request.
pub fn request_id() -> Uuid {
    Uuid::now_v7()
}
