//! Logging infrastructure for the forecast engine.
//!
//! The engine only emits `tracing` events; hosts that want them printed call
//! one of the `init*` functions once at startup.

use crate::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at the `info` level
///
/// RUST_LOG, when set, takes precedence over the default level.
pub fn init() {
    init_with_level("info")
}

/// Initialize logging using the `[logging]` section of a loaded config
pub fn init_from_config(config: &Config) {
    init_with_level(&config.logging.level)
}

/// Initialize logging with a specific default level
///
/// # Arguments
/// * `default_level` - Default filter directive (e.g. `debug`, `cycle_core=trace`)
///
/// This can still be overridden by RUST_LOG environment variable. Calling it
/// a second time is a no-op.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
