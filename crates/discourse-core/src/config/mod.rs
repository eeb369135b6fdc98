//! Configuration management.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `discourse.toml` file
//! 3. User config `~/.config/discourse/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema source.
    pub schema: SchemaConfig,

    /// Compilation settings.
    pub query: QueryConfig,

    /// Remote graph access.
    pub executor: ExecutorConfig,

    /// Saved query storage.
    pub storage: StorageConfig,

    /// Log output.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./discourse.toml` (project local)
    /// 2. `~/.config/discourse/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// `~/.config/discourse/config.toml`, when a config dir exists.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(DEFAULT_CONFIG_DIR_NAME)
                .join(DEFAULT_USER_CONFIG_FILE)
        })
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("DISCOURSE_SCHEMA") {
            self.schema.path = Some(path);
        }

        if let Ok(url) = std::env::var("DISCOURSE_API_URL") {
            self.executor.base_url = url;
        }
        if let Ok(graph) = std::env::var("DISCOURSE_GRAPH") {
            self.executor.graph = Some(graph);
        }
        if let Ok(token) = std::env::var("DISCOURSE_API_TOKEN") {
            self.executor.api_token = Some(token);
        }

        if let Ok(dir) = std::env::var("DISCOURSE_DATA_DIR") {
            self.storage.data_dir = dir;
        }

        if let Ok(level) = std::env::var(LOG_ENV_VAR) {
            self.logging.level = level;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.executor.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "executor.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.data_dir is empty".to_string()));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Write this configuration as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Schema source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Schema file (`.toml`, `.json`, `.yaml`). Built-in schema when unset.
    pub path: Option<String>,
}

/// Compilation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum number of compiled queries to keep (0 disables caching).
    pub cache_capacity: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Remote graph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// API base URL.
    pub base_url: String,

    /// Graph name.
    pub graph: Option<String>,

    /// API token (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            graph: None,
            api_token: None, // Load from env
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ExecutorConfig {
    /// Get the API token from config or environment.
    pub fn api_token_or_env(&self) -> Option<String> {
        self.api_token
            .clone()
            .or_else(|| std::env::var("DISCOURSE_API_TOKEN").ok())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for discourse data (default: ".discourse").
    pub data_dir: String,

    /// Saved queries subdirectory name.
    pub queries_dir: String,

    /// Scratch query file name.
    pub scratch_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            queries_dir: DEFAULT_QUERIES_DIR.to_string(),
            scratch_file: DEFAULT_SCRATCH_FILE.to_string(),
        }
    }
}

impl StorageConfig {
    /// Get the full path to the saved queries directory.
    pub fn queries_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.queries_dir)
    }

    /// Get the full path to the scratch query file.
    pub fn scratch_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.scratch_file)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `discourse_core=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
