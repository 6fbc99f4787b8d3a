//! Configuration management for locator publishers.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub identity: IdentityConfig,
    #[serde(default)]
    pub locator: LocatorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityConfig {
    /// File holding the secret identity string.
    pub key_file: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocatorConfig {
    /// Endpoints advertised when none are given on the command line.
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// Fixed timestamp; the current time in milliseconds is used when unset.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            level: default_level(),
        }
    }
}

impl Config {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.identity.key_file.as_os_str().is_empty() {
            return Err(Error::Config("identity.key_file must not be empty".into()));
        }
        if let Some(ts) = self.locator.timestamp {
            if ts <= 0 {
                return Err(Error::Config(format!(
                    "locator.timestamp must be positive, got {}",
                    ts
                )));
            }
        }
        Ok(())
    }

    pub fn default_config() -> Self {
        Self {
            identity: IdentityConfig {
                key_file: PathBuf::from("identity.secret"),
            },
            locator: LocatorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
