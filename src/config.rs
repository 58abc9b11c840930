//! Credential loading for the Notion database manager.
//!
//! Secrets come from a local `.env`-style file (when present) and the process
//! environment. Both `NOTION_API_KEY` and `NOTION_PARENT_PAGE_ID` are
//! required; resolution happens once, before any subcommand runs.
use std::path::Path;
use thiserror::Error;

pub const ENV_API_KEY: &str = "NOTION_API_KEY";
pub const ENV_PARENT_PAGE_ID: &str = "NOTION_PARENT_PAGE_ID";
pub const ENV_VERSION: &str = "NOTION_VERSION";

/// Notion API version sent when `NOTION_VERSION` is not set.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("environment variable {0} must be non-empty")]
    Empty(&'static str),
}

/// Resolved per-invocation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub parent_page_id: String,
    pub version: String,
}

impl Settings {
    /// Load settings, sourcing the env file at `path` first (skipped when the
    /// file does not exist) and falling back to the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            // Values already present in the environment win over file entries,
            // matching dotenv semantics.
            let _ = dotenv::from_path(path);
        }
        Self::from_env()
    }

    /// Build settings from the process environment alone.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require(ENV_API_KEY)?;
        let parent_page_id = require(ENV_PARENT_PAGE_ID)?;
        let version = std::env::var(ENV_VERSION)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string());
        Ok(Settings {
            api_key,
            parent_page_id,
            version,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if v.trim().is_empty() => Err(ConfigError::Empty(name)),
        Ok(v) => Ok(v),
        Err(_) => Err(ConfigError::Missing(name)),
    }
}
