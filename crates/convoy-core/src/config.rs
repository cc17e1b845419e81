//! Configuration management.
//!
//! Loads configuration from ${CONVOY_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default dashboard API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5005/ui";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Convoy API.
    pub base_url: String,

    /// Default page size for list requests.
    pub per_page: u32,

    /// Request timeout in seconds (0 disables).
    pub timeout_secs: u32,
}

impl Config {
    const DEFAULT_PER_PAGE: u32 = 20;
    const DEFAULT_TIMEOUT_SECS: u32 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// If the file doesn't exist, writes the commented default template
    /// there and returns defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            write_template(path)?;
            Ok(Config::default())
        }
    }

    /// Resolves the effective base URL with precedence: env > config > default.
    ///
    /// # Errors
    /// Returns an error if the resolved URL is not well-formed.
    pub fn resolve_base_url(&self) -> Result<String> {
        if let Ok(env_url) = std::env::var("CONVOY_BASE_URL") {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.trim_end_matches('/').to_string());
            }
        }

        let trimmed = self.base_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }

        Ok(DEFAULT_BASE_URL.to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: Self::DEFAULT_PER_PAGE,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Materializes the commented template at `path`.
fn write_template(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, default_config_template())
        .with_context(|| format!("Failed to write config template to {}", path.display()))
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid Convoy base URL: {url}"))?;
    Ok(())
}

pub mod paths {
    //! Path resolution for Convoy client configuration and data.
    //!
    //! CONVOY_HOME resolution order:
    //! 1. CONVOY_HOME environment variable (if set)
    //! 2. ~/.convoy (default)

    use std::path::PathBuf;

    /// Returns the Convoy client home directory.
    pub fn convoy_home() -> PathBuf {
        if let Ok(home) = std::env::var("CONVOY_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".convoy"))
            .unwrap_or_else(|| PathBuf::from(".convoy"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        convoy_home().join("config.toml")
    }

    /// Returns the path to the persisted session file.
    pub fn session_path() -> PathBuf {
        convoy_home().join("session.json")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        convoy_home().join("logs")
    }
}
