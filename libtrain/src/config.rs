//! Configuration management for Leal Train

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Deadline applied to every store call unless configured otherwise
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Collection holding the training records
pub const DEFAULT_COLLECTION: &str = "trains";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Deadline per store call, in humantime syntax ("10s", "1500ms")
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

/// Settings for the in-memory store used by the shell
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub latency_ms: u64,
    pub seed_file: Option<String>,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_request_timeout() -> String {
    humantime::format_duration(DEFAULT_REQUEST_TIMEOUT).to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl RepositoryConfig {
    /// Parsed request timeout
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the value is not a humantime
    /// duration or is zero.
    pub fn request_timeout(&self) -> Result<Duration> {
        let timeout = humantime::parse_duration(&self.request_timeout).map_err(|e| {
            ConfigError::InvalidValue {
                field: "repository.request_timeout".to_string(),
                reason: e.to_string(),
            }
        })?;

        if timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "repository.request_timeout".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(timeout)
    }

    /// Validated collection name
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the collection is blank.
    pub fn collection(&self) -> Result<&str> {
        let collection = self.collection.trim();
        if collection.is_empty() {
            return Err(ConfigError::MissingField("repository.collection".to_string()).into());
        }
        Ok(collection)
    }
}

impl MemoryConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Seed file path with `~` expanded
    pub fn seed_path(&self) -> Option<PathBuf> {
        self.seed_file
            .as_deref()
            .map(|path| PathBuf::from(shellexpand::tilde(path).to_string()))
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load from the default location, falling back to defaults if no file exists
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        // Surface bad values at load time rather than on the first request
        config.repository.request_timeout()?;
        config.repository.collection()?;

        Ok(config)
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("TRAIN_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("train").join("config.toml"))
}
