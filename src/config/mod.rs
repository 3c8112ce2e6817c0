//! # Configuration Management Module
//!
//! Centralized configuration for the adventure client: where the backend lives,
//! how long to wait for it, and the defaults used when callers omit ages or
//! coordinates.
//!
//! ## Configuration Structure
//!
//! - [`ApiConfig`] - Backend base URL, request timeout, on/off switch
//! - [`AdventureConfig`] - Default ages and location, route and chat limits
//! - [`LoggingConfig`] - Log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ratoncito::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::load("config.toml").await?;
//!     config.apply_env_overrides();
//!     println!("Backend: {}", config.api.base_url);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//! timeout_seconds = 10
//! enabled = true
//!
//! [adventure]
//! default_children_ages = [6, 8]
//! default_latitude = 40.4168
//! default_longitude = -3.7038
//! places_per_category = 2
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## Environment Integration
//!
//! `RATONCITO_API_BASE_URL` overrides `api.base_url` after the file is read.
//! Precedence: CLI args > Environment > Config file > Defaults

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;

use crate::model::Coordinates;

/// Environment variable that replaces `api.base_url`.
pub const BASE_URL_ENV: &str = "RATONCITO_API_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend root, e.g. `http://localhost:8000`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
    /// When false every operation is served from local fallback content
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_seconds() -> u32 {
    10
}

fn default_enabled() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            enabled: true,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds as u64)
    }

    /// Join the base URL and an endpoint path with exactly one `/` between them.
    pub fn endpoint_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdventureConfig {
    /// Ages assumed when a caller passes an empty list
    pub default_children_ages: Vec<u8>,
    /// Location used for place lookups that carry no coordinates (Puerta del Sol)
    pub default_latitude: f64,
    pub default_longitude: f64,
    /// How many places each category contributes to a generated route
    #[serde(default = "default_places_per_category")]
    pub places_per_category: usize,
    /// Number of chat turns (user + bot entries) kept in a session history
    #[serde(default = "default_chat_history_limit")]
    pub chat_history_limit: usize,
    /// Backend challenge text longer than this is cut and suffixed with `...`
    #[serde(default = "default_challenge_max_chars")]
    pub challenge_max_chars: usize,
}

fn default_places_per_category() -> usize {
    2
}

fn default_chat_history_limit() -> usize {
    10
}

fn default_challenge_max_chars() -> usize {
    300
}

impl Default for AdventureConfig {
    fn default() -> Self {
        Self {
            default_children_ages: vec![6, 8],
            default_latitude: 40.4168,
            default_longitude: -3.7038,
            places_per_category: default_places_per_category(),
            chat_history_limit: default_chat_history_limit(),
            challenge_max_chars: default_challenge_max_chars(),
        }
    }
}

impl AdventureConfig {
    pub fn default_location(&self) -> Coordinates {
        Coordinates::new(self.default_latitude, self.default_longitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub adventure: AdventureConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Apply environment overrides on top of the loaded file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            self.override_base_url(&url);
        }
    }

    fn override_base_url(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.api.base_url = url.to_string();
        }
    }

    /// Log level requested by the file, falling back to `info` on unknown names.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.logging.level.to_ascii_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 10);
        assert!(config.api.enabled);
        assert_eq!(config.adventure.default_children_ages, vec![6, 8]);
        assert_eq!(config.adventure.places_per_category, 2);
        assert_eq!(config.adventure.chat_history_limit, 10);
    }

    #[test]
    fn test_endpoint_url_joins_with_single_slash() {
        let mut api = ApiConfig::default();
        assert_eq!(api.endpoint_url("health"), "http://localhost:8000/health");
        assert_eq!(api.endpoint_url("/health"), "http://localhost:8000/health");
        api.base_url = "http://example.test/api/".to_string();
        assert_eq!(
            api.endpoint_url("qa/ask"),
            "http://example.test/api/qa/ask"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://backend:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://backend:9000");
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.adventure.challenge_max_chars, 300);
        assert_eq!(config.logging.level, "info");

        let config: Config = toml::from_str(
            r#"
            [api]
            timeout_seconds = 5
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 5);
        assert!(!config.api.enabled);

        let config: Config = toml::from_str(
            r#"
            [logging]
            file = "ratoncito.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file.as_deref(), Some("ratoncito.log"));
    }

    #[test]
    fn test_partial_adventure_section_keeps_location() {
        let config: Config = toml::from_str(
            r#"
            [adventure]
            chat_history_limit = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.adventure.chat_history_limit, 4);
        assert_eq!(config.adventure.default_children_ages, vec![6, 8]);
        assert_eq!(config.adventure.default_latitude, 40.4168);
    }

    #[test]
    fn test_base_url_override_ignores_blank() {
        let mut config = Config::default();
        config.override_base_url("   ");
        assert_eq!(config.api.base_url, "http://localhost:8000");
        config.override_base_url("http://other:1234");
        assert_eq!(config.api.base_url, "http://other:1234");
    }

    #[test]
    fn test_log_level_parsing() {
        let mut config = Config::default();
        assert_eq!(config.log_level(), log::LevelFilter::Info);
        config.logging.level = "DEBUG".to_string();
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
        config.logging.level = "nonsense".to_string();
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_config_serde_roundtrip_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("[api]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.adventure.default_latitude, 40.4168);
    }
}
