//! Server configuration.
//!
//! A TOML file supplies the stable settings; environment variables override
//! the secrets so neither the API key nor the admin secret has to live on
//! disk. Everything has a default, so a missing config file is a valid
//! zero-configuration start (with an empty data directory and a gateway
//! that reports its missing key inline).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use assistant_gateway::ClientConfig;

/// Config file consulted when no `--config` flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "assistant.toml";
/// Catalog directory used when none is configured.
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of catalog `*.json` documents.
    pub data_dir: PathBuf,

    /// Shared secret gating the stock dashboard. Unset means the dashboard
    /// is unreachable.
    pub admin_secret: Option<String>,

    /// Hosted-model connection settings.
    pub gateway: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            admin_secret: None,
            gateway: ClientConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration: explicit file, or the default path if present,
    /// or built-in defaults. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Config::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Secrets and the data directory may come from the environment, which
    /// wins over the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("ASSISTANT_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(key) = env::var("ASSISTANT_API_KEY") {
            self.gateway.api_key = Some(key);
        }
        if let Ok(secret) = env::var("ASSISTANT_ADMIN_SECRET") {
            self.admin_secret = Some(secret);
        }
    }
}
