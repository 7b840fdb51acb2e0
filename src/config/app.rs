//! Application settings loaded from config.toml.
//!
//! The file is optional: every setting has a default, and `PORT` in the environment
//! overrides the configured port. The file location can be changed with
//! `STOCKROOM_CONFIG`.

use super::users::AdminConfig;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Admin accounts to seed on start
    #[serde(default)]
    pub admins: Vec<AdminConfig>,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "0.0.0.0")
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for a TCP listener
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
    })
}

/// Loads configuration from `STOCKROOM_CONFIG` (or ./config.toml), then applies `PORT`.
///
/// A missing file is not an error; defaults are used instead.
///
/// # Errors
/// Returns an error if the file exists but cannot be parsed, or `PORT` is not a number.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path =
        std::env::var("STOCKROOM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        warn!("No config file at {}, using defaults", path);
        AppConfig::default()
    };

    if let Ok(port) = std::env::var("PORT") {
        config.server.port = port.parse().map_err(|e| Error::Config {
            message: format!("PORT must be a valid port number: {e}"),
        })?;
    }

    Ok(config)
}
