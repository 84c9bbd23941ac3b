//! Configuration file parser for ~/.config/wealthsage/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::listing::Category;

/// Environment variable that overrides `api_token`.
pub const API_TOKEN_ENV: &str = "WEALTHSAGE_API_TOKEN";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),

    #[error("HOME environment variable not set")]
    NoHome,
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// `api_token` is masked in the `Debug` output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the listing service, e.g. `http://localhost:8000`.
    pub api_base_url: String,

    /// Tab selected at startup.
    pub default_category: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Delay before typed search text is committed.
    pub search_debounce_ms: u64,

    /// How long a persisted listing snapshot may be reused at startup.
    pub snapshot_freshness_minutes: i64,

    /// Bearer token for the listing service.
    /// `WEALTHSAGE_API_TOKEN` takes precedence over this value.
    pub api_token: Option<String>,

    /// Where saved opportunities, snapshots and logs live.
    /// Defaults to `$XDG_DATA_HOME/wealthsage` or `~/.local/share/wealthsage`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            default_category: Category::default().as_str().to_string(),
            request_timeout_secs: 30,
            search_debounce_ms: 300,
            snapshot_freshness_minutes: crate::storage::DEFAULT_FRESHNESS_MINUTES,
            api_token: None,
            data_dir: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("default_category", &self.default_category)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .field("snapshot_freshness_minutes", &self.snapshot_freshness_minutes)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "api_base_url",
        "default_category",
        "request_timeout_secs",
        "search_debounce_ms",
        "snapshot_freshness_minutes",
        "api_token",
        "data_dir",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing or blank file → `Ok(Config::default())`
    /// - Invalid TOML or wrong types → `Err(ConfigError::Parse)`
    /// - Unknown category or zero timeout → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            api_base_url = %config.api_base_url,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.default_category()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.snapshot_freshness_minutes < 0 {
            return Err(ConfigError::Invalid(
                "snapshot_freshness_minutes must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn default_category(&self) -> Result<Category, ConfigError> {
        self.default_category
            .parse()
            .map_err(|e: crate::listing::UnknownCategory| ConfigError::Invalid(e.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn snapshot_freshness(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.snapshot_freshness_minutes)
    }

    /// API token from the environment, falling back to the config file.
    pub fn resolve_api_token(&self) -> Option<SecretString> {
        std::env::var(API_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.api_token.clone())
            .map(SecretString::from)
    }

    /// Configured data directory, or the platform default.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

fn home_dir() -> Result<PathBuf, ConfigError> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(ConfigError::NoHome)
}

/// `~/.config/wealthsage/`
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(".config").join("wealthsage"))
}

/// `$XDG_DATA_HOME/wealthsage/`, else `~/.local/share/wealthsage/`
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join("wealthsage"));
    }
    Ok(home_dir()?.join(".local").join("share").join("wealthsage"))
}

// ============================================================================
// Tests
// ============================================================================
