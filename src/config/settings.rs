//! Application settings loading from config.toml
//!
//! Every key is optional. A missing file yields the defaults; a file that exists
//! but does not parse is an error, so a typo never silently changes behavior.

use crate::core::notification::NotificationPolicy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Database URL; `DATABASE_URL` in the environment takes precedence
    pub database_url: Option<String>,
    /// Budget overage notification settings
    pub notifications: NotificationSettings,
}

/// `[notifications]` table
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationSettings {
    /// Whether repeated overages in the same period notify again, for owners
    /// who have not chosen for themselves
    pub policy: NotificationPolicy,
}

/// Loads application settings from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `./config.toml`, falling back to defaults when the file is absent.
pub fn load_default_config() -> Result<AppConfig> {
    let path = Path::new("config.toml");
    if !path.exists() {
        warn!("config.toml not found, using default settings");
        return Ok(AppConfig::default());
    }
    load_config(path)
}
