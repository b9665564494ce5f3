//! Tracing setup. The TUI owns stdout and stderr while it runs, so events go
//! to a log file instead of the terminal.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "LIBRARY_MANAGER_LOG";
const DEFAULT_DIRECTIVE: &str = "personal_library_manager=info";

/// Install the global subscriber appending to `log_path`. Calling it again
/// after a subscriber is installed is a no-op.
pub fn init(log_path: &Path) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("test.log");
        init(&log_path).unwrap();
        init(&log_path).unwrap();
        tracing::info!("logging initialised");
    }
}
