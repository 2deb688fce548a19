use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file read when `--config` is not given. Optional.
pub const DEFAULT_CONFIG_PATH: &str = "diawell.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    /// Serve `/model_info`. Intended for local development.
    pub expose_model_info: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".into(),
            expose_model_info: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/diabetes_model.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("diawell.db"),
        }
    }
}

impl AppConfig {
    /// Reads `explicit` if given (it must exist), otherwise
    /// [`DEFAULT_CONFIG_PATH`] if present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_PATH);
                if !fallback.exists() {
                    tracing::debug!(target: "diawell", "no config file, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::info!(target: "diawell", path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
