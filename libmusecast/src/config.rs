//! Configuration management for Musecast

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub twitter: TwitterConfig,
    pub settings: SettingsConfig,
}

/// Language-model provider credentials and generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Output-token budget for one generation request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Posting provider credential set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    pub log_file: String,
    pub default_schedule: String,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    120
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Check that every required field is present and non-empty.
    ///
    /// Missing fields are startup-fatal: the caller aborts before any
    /// provider client is constructed.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("openai.api_key", &self.openai.api_key),
            ("twitter.api_key", &self.twitter.api_key),
            ("twitter.api_secret", &self.twitter.api_secret),
            ("twitter.access_token", &self.twitter.access_token),
            (
                "twitter.access_token_secret",
                &self.twitter.access_token_secret,
            ),
            ("settings.log_file", &self.settings.log_file),
            ("settings.default_schedule", &self.settings.default_schedule),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(name.to_string()).into());
            }
        }

        Ok(())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("MUSECAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("musecast").join("config.toml"))
}
