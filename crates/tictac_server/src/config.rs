//! Server configuration.
//!
//! Values are layered: command-line flags win over environment variables,
//! which win over the optional TOML file, which wins over built-in defaults.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings read from a TOML file. Every field is optional.
#[derive(Debug, Clone, Default, Getters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// SQLite database path.
    database_url: Option<String>,
    /// Interface to bind.
    host: Option<String>,
    /// Port to bind.
    port: Option<u16>,
    /// Seed for the computer opponent's random fallback.
    opponent_seed: Option<u64>,
}

impl FileConfig {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!("Config loaded successfully");
        Ok(config)
    }
}

/// Overrides supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// SQLite database path.
    pub database_url: Option<String>,
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Seed for the computer opponent.
    pub opponent_seed: Option<u64>,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ServerConfig {
    /// SQLite database path.
    database_url: String,
    /// Interface to bind.
    host: String,
    /// Port to bind.
    port: u16,
    /// Seed for the computer opponent; `None` draws from the OS.
    opponent_seed: Option<u64>,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    3000
}

impl ServerConfig {
    /// Resolves the configuration from overrides and an optional file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no database path is given by any source.
    #[instrument(skip_all)]
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self, ConfigError> {
        let database_url = overrides
            .database_url
            .or(file.database_url)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::new("DATABASE_URL is required (flag, environment or config file)")
            })?;

        let config = Self {
            database_url,
            host: overrides.host.or(file.host).unwrap_or_else(default_host),
            port: overrides.port.or(file.port).unwrap_or_else(default_port),
            opponent_seed: overrides.opponent_seed.or(file.opponent_seed),
        };
        info!(
            database_url = %config.database_url,
            host = %config.host,
            port = config.port,
            seeded = config.opponent_seed.is_some(),
            "Configuration resolved"
        );
        Ok(config)
    }

    /// Address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
