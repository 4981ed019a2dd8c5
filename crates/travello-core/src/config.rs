//! Application configuration management.
//!
//! This module handles loading and saving the application configuration: the API
//! base URL, where the token is kept, the UI language, and the last email used to
//! sign in.
//!
//! Configuration is stored at `~/.config/travello/config.json`. The API base URL
//! can also be overridden with the `TRAVELLO_SERVER_URL` environment variable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_API_BASE_URL;
use crate::auth::TokenBackend;
use crate::i18n::Locale;

/// Application name used for config/data directory paths
const APP_NAME: &str = "travello";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the API base URL
pub const API_BASE_URL_ENV: &str = "TRAVELLO_SERVER_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub token_backend: TokenBackend,
    pub locale: Locale,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for durable state (the token file)
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Directory for log files
    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Effective API base URL: environment, then config file, then the default
    pub fn api_base_url(&self) -> String {
        resolve_base_url(std::env::var(API_BASE_URL_ENV).ok(), self.api_base_url.as_deref())
    }
}

/// Pick the API base URL. Blank values count as unset.
pub fn resolve_base_url(env_value: Option<String>, configured: Option<&str>) -> String {
    env_value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| configured.map(str::trim).filter(|v| !v.is_empty()))
        .unwrap_or(DEFAULT_API_BASE_URL)
        .to_string()
}
