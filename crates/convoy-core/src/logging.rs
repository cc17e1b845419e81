//! Tracing subscriber initialization.
//!
//! Logs go to a file under ${CONVOY_HOME}/logs rather than stdout, so CLI
//! output stays clean and users can `tail -f` in another terminal.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::paths;

/// Initializes file-based logging at the default location.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a subscriber
/// is already installed.
pub fn init() -> Result<()> {
    init_at(&paths::logs_dir().join("convoy.log"))
}

/// Initializes file-based logging at a specific path.
///
/// Respects `RUST_LOG`, defaulting to "info".
///
/// # Errors
/// Returns an error if the log directory cannot be created or a subscriber
/// is already installed.
pub fn init_at(log_path: &Path) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let directory = log_path
        .parent()
        .with_context(|| format!("Log path has no parent directory: {}", log_path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid log file path: {}", log_path.display()))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| anyhow::anyhow!("Tracing subscriber already initialized"))?;

    Ok(())
}
