use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

fn default_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token attached to every request when present.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./acavox.yaml
    /// 2. ~/.acavox/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<ConsoleConfig, ConfigError> {
        let local_config = PathBuf::from("./acavox.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".acavox").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(ConsoleConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<ConsoleConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: ConsoleConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
