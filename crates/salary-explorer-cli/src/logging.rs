//! Logging setup for the command-line driver.
//!
//! Logs go to stderr so stdout carries only JSON responses.
//! `RUST_LOG` takes precedence over the `--log-level` flag.

use anyhow::{anyhow, Context as _, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if `level` is not a valid filter directive or a subscriber is
/// already installed.
pub fn init(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {level}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
