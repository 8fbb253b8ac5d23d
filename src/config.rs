//! Optional gitdid configuration.
//!
//! Looked up in `<repo root>/.gitdid.toml`, then `<config dir>/gitdid/config.toml`.
//! A missing file means defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filename of the per-repository config.
const REPO_CONFIG_FILE: &str = ".gitdid.toml";

/// Directory name under the user's config dir.
const USER_CONFIG_DIR: &str = "gitdid";

/// Filename of the per-user config.
const USER_CONFIG_FILE: &str = "config.toml";

/// Remote used for pull and push when none is configured
pub const DEFAULT_REMOTE: &str = "origin";

/// Ticket link prefix used when none is configured
pub const DEFAULT_TICKET_BASE_URL: &str = "https://jira.atlassian.net/browse";

/// Settings for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Remote to pull from and push to
    pub remote: String,
    /// Prefix of ticket links; the ticket ID is appended after a `/`
    pub ticket_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            ticket_base_url: DEFAULT_TICKET_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Parse and validate config text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.remote.trim().is_empty() {
            return Err(Error::Config("remote must not be empty".to_string()));
        }
        let url = url::Url::parse(&self.ticket_base_url).map_err(|e| {
            Error::Config(format!(
                "ticket-base-url '{}' is not a valid URL: {e}",
                self.ticket_base_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "ticket-base-url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }
}

/// Path of the per-repository config file
pub fn repo_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(REPO_CONFIG_FILE)
}

/// Path of the per-user config file, if the platform has a config dir
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
}

/// Load configuration for a repository.
///
/// The repository file wins over the user file. Returns defaults if neither exists.
pub fn load_config(repo_root: &Path) -> Result<Config> {
    let candidates = std::iter::once(repo_config_path(repo_root)).chain(user_config_path());
    for path in candidates {
        if path.is_file() {
            return load_config_file(&path);
        }
    }
    debug!("no config file found, using defaults");
    Ok(Config::default())
}

/// Load configuration from a specific file.
pub fn load_config_file(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "loading config");
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    Config::from_toml(&content)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}
