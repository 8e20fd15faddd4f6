//! Log subscriber setup.
//!
//! Logs go to stderr so rendered output on stdout stays clean. `RUST_LOG`
//! overrides the level chosen by `-q`/`-v`.

use crate::config::Verbosity;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the verbosity's level
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_level()))
}

/// Install the global subscriber; false if one was already installed
pub fn init_logging(verbosity: Verbosity) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(verbosity.is_verbose())
        .try_init()
        .is_ok()
}
