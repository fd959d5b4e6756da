//! Configuration system using TOML files and environment overrides.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\codebarr\config.toml
//! - macOS: ~/Library/Application Support/codebarr/config.toml
//! - Linux: ~/.config/codebarr/config.toml
//!
//! Every field has a default, so a partial (or missing) file is fine.
//! `LIDARR_*` environment variables are applied on top of the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog;
use crate::library::ArtistDefaults;
use crate::reconcile::PollPolicy;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library manager connection
    pub library: LibraryConfig,

    /// Settings for artists we add
    pub defaults: ArtistDefaults,

    /// Catalog (MusicBrainz) connection
    pub catalog: CatalogConfig,

    /// Release polling
    pub reconcile: ReconcileConfig,
}

/// Library manager connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Base URL, without the `/api/v1` suffix
    pub url: String,

    /// Value of the `X-Api-Key` header
    pub api_key: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8686".to_string(),
            api_key: String::new(),
        }
    }
}

/// Catalog connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: catalog::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Release polling settings
///
/// `release_wait_secs` is the one ceiling for every path that waits on the
/// manager's release list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub poll_interval_secs: u64,
    pub release_wait_secs: u64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 3,
            release_wait_secs: 60,
        }
    }
}

impl ReconcileConfig {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.poll_interval_secs),
            budget: Duration::from_secs(self.release_wait_secs),
        }
    }
}

impl Config {
    /// Apply `LIDARR_*` overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LIDARR_URL") {
            self.library.url = url;
        }
        if let Some(key) = lookup("LIDARR_API_KEY") {
            self.library.api_key = key;
        }
        if let Some(path) = lookup("LIDARR_ROOT_FOLDER_PATH") {
            self.defaults.root_folder_path = path;
        }
        if let Some(raw) = lookup("LIDARR_QUALITY_PROFILE") {
            self.defaults.quality_profile_id = parse_id("LIDARR_QUALITY_PROFILE", &raw)?;
        }
        if let Some(raw) = lookup("LIDARR_METADATA_PROFILE") {
            self.defaults.metadata_profile_id = parse_id("LIDARR_METADATA_PROFILE", &raw)?;
        }
        if let Some(raw) = lookup("LIDARR_ARTIST_MONITORED") {
            self.defaults.monitored = parse_flag(&raw);
        }
        if let Some(raw) = lookup("LIDARR_MONITOR_NEW_ITEMS") {
            self.defaults.monitor_new_items = raw.parse().map_err(|message| ConfigError::Invalid {
                key: "LIDARR_MONITOR_NEW_ITEMS",
                message,
            })?;
        }
        if let Some(raw) = lookup("LIDARR_SEARCH_ON_ADD") {
            self.defaults.search_on_add = parse_flag(&raw);
        }
        Ok(())
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "library.url",
                message: "must not be empty".to_string(),
            });
        }
        if self.reconcile.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "reconcile.poll_interval_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.library.api_key.is_empty() {
            tracing::warn!("No library API key configured, requests will be rejected");
        }
        Ok(())
    }

    /// Copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Config {
        let mut copy = self.clone();
        if !copy.library.api_key.is_empty() {
            copy.library.api_key = "********".to_string();
        }
        copy
    }
}

/// `true`, `t`, `1` and `yes` (any case) are true; anything else is false.
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "t" | "1" | "yes"
    )
}

fn parse_id(key: &'static str, raw: &str) -> Result<i64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        message: format!("'{raw}' is not a number"),
    })
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("codebarr"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from `path`.
///
/// A missing file yields defaults; an unreadable or malformed one is an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config = toml::from_str(&contents).map_err(|e| {
        tracing::error!("Failed to parse config file {:?}: {}", path, e);
        ConfigError::Parse(path.to_path_buf(), e)
    })?;

    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Load the effective configuration: file (explicit or OS default), then
/// environment overrides, then validation.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_from(path)?,
        None => match config_path() {
            Some(path) => load_from(&path)?,
            None => {
                tracing::warn!("Could not determine config directory, using defaults");
                Config::default()
            }
        },
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

// ============================================================================
// Tests
// ============================================================================
