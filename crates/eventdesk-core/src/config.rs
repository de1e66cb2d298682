//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! backend URL, locale, last used login email and logging preferences.
//!
//! Configuration is stored at `~/.config/eventdesk/config.json`. The
//! `EVENTDESK_API_URL` and `EVENTDESK_LOCALE` environment variables (also
//! read from `.env`) take precedence over the file.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::i18n::Locale;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "eventdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

pub const API_URL_ENV: &str = "EVENTDESK_API_URL";
pub const LOCALE_ENV: &str = "EVENTDESK_LOCALE";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub locale: Option<Locale>,
    pub last_email: Option<String>,
    /// Write logs to a daily rotated file in the cache directory
    #[serde(default)]
    pub log_to_file: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
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

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join("logs"))
    }

    /// Environment, then config file, then the default
    pub fn api_url(&self) -> String {
        Self::resolve(std::env::var(API_URL_ENV).ok(), self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Environment, then config file, then the default locale
    pub fn locale(&self) -> Locale {
        std::env::var(LOCALE_ENV)
            .ok()
            .filter(|code| !code.trim().is_empty())
            .map(|code| Locale::from_code(&code))
            .or(self.locale)
            .unwrap_or_default()
    }

    fn resolve(env: Option<String>, file: Option<String>) -> Option<String> {
        env.filter(|v| !v.trim().is_empty())
            .or(file.filter(|v| !v.trim().is_empty()))
    }
}
