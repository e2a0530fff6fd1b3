//! Configuration file support for the dosing tracker.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/spmc/config.toml`.
//! The schedule arithmetic itself has no settings; this only covers how
//! links, times and documents are presented.

use crate::text::Language;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub documents: DocumentsConfig,
}

/// Shareable link configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// How wall-clock procedure times are anchored
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    /// IANA zone name, e.g. `Asia/Riyadh`. Unset means the system zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Document output configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_languages")]
    pub languages: Vec<Language>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            languages: default_languages(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:3000".into()
}

fn default_output_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spmc")
}

fn default_languages() -> Vec<Language> {
    Language::ALL.to_vec()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spmc")
            .join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.share.base_url.trim().is_empty() {
            return Err(Error::Config("share.base_url must not be empty".into()));
        }
        if self.documents.languages.is_empty() {
            return Err(Error::Config(
                "documents.languages must list at least one language".into(),
            ));
        }
        Ok(())
    }
}
