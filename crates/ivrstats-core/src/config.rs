//! Configuration management for the IVR statistics browser

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "IVRSTATS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Backing query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database URL
    #[serde(default = "default_database_url")]
    #[validate(length(min = 1))]
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    #[validate(range(min = 1))]
    pub max_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

/// Backing query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// IVR descriptions containing this marker are left out of the location list
    #[serde(default = "default_excluded_location_marker")]
    pub excluded_location_marker: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_database_url() -> String {
    std::env::var("IVRSTATS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| "mysql://localhost/asterisk".to_string())
}

const fn default_max_connections() -> u32 {
    1
}

const fn default_connect_timeout() -> u64 {
    30
}

const fn default_idle_timeout() -> u64 {
    600
}

fn default_excluded_location_marker() -> String {
    "IVR".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const LOG_FORMATS: [&str; 2] = ["json", "pretty"];

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            excluded_location_marker: default_excluded_location_marker(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from an optional file and the environment
    ///
    /// Without an explicit path an `ivrstats.{toml,yaml,json}` file in the
    /// working directory is picked up when present. `IVRSTATS_`-prefixed
    /// variables override file values, with `__` separating sections
    /// (`IVRSTATS_DATABASE__URL`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("ivrstats").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.ensure_valid()?;
        Ok(config)
    }

    /// Check field constraints that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first offending field.
    pub fn ensure_valid(&self) -> crate::Result<()> {
        self.validate().map_err(|e| crate::Error::Configuration {
            message: e.to_string(),
        })?;

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(crate::Error::Configuration {
                message: format!(
                    "logging.format must be one of {LOG_FORMATS:?}, got {:?}",
                    self.logging.format
                ),
            });
        }

        Ok(())
    }
}
