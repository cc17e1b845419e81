//! Authenticated session lifecycle.
//!
//! The session is an explicit value handed to the gateway, never an ambient
//! global. `login` creates and persists it; `logout` and any 401 response
//! tear it down.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// An authenticated session against the Convoy API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token attached to every request.
    pub token: String,
    /// Project (group) every list request is scoped to.
    pub project_id: String,
}

impl Session {
    pub fn new(token: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            project_id: project_id.into(),
        }
    }

    /// Returns a masked version of the token for display (first 8 chars + ...).
    pub fn masked_token(&self) -> String {
        if self.token.chars().count() <= 12 {
            return "***".to_string();
        }
        let prefix: String = self.token.chars().take(8).collect();
        format!("{prefix}...")
    }
}

/// On-disk store for the session under ${CONVOY_HOME}.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default session path.
    pub fn new() -> Self {
        Self {
            path: paths::session_path(),
        }
    }

    /// Store at a specific path (tests point this at a temp dir).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted session, if any.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        let session = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))?;
        Ok(Some(session))
    }

    /// Persists the session with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| {
                    format!("Failed to open {} for writing", self.path.display())
                })?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Removes the persisted session. Returns whether one existed.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove session at {}", self.path.display()))?;
        Ok(true)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
