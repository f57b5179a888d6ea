//! Configuration management for Saarthi
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SaarthiError};
use crate::persona::{find_persona, DEFAULT_PERSONA, PERSONAS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Saarthi
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat front-end settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Vent room settings
    #[serde(default)]
    pub vent: VentConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Origin of the Saarthi backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Chat front-end settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Persona selected before any session is active
    #[serde(default = "default_persona")]
    pub default_persona: String,
}

fn default_persona() -> String {
    DEFAULT_PERSONA.id.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_persona: default_persona(),
        }
    }
}

/// Vent room settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VentConfig {
    /// Length of the crumple sequence shown after a vent (milliseconds)
    #[serde(default = "default_animation_millis")]
    pub animation_millis: u64,
}

fn default_animation_millis() -> u64 {
    1200
}

impl Default for VentConfig {
    fn default() -> Self {
        Self {
            animation_millis: default_animation_millis(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SaarthiError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SaarthiError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("SAARTHI_API_URL") {
            tracing::debug!(base_url = %base_url, "Env override: SAARTHI_API_URL");
            self.server.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("SAARTHI_TIMEOUT_SECONDS") {
            if let Ok(v) = timeout.parse() {
                self.server.timeout_seconds = v;
            } else {
                tracing::warn!("Invalid SAARTHI_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(persona) = std::env::var("SAARTHI_DEFAULT_PERSONA") {
            tracing::debug!(persona = %persona, "Env override: SAARTHI_DEFAULT_PERSONA");
            self.chat.default_persona = persona;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(api_url) = &cli.api_url {
            tracing::debug!("Using API URL override from CLI: {}", api_url);
            self.server.base_url = api_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an http(s) URL, the timeout is
    /// out of range, or the default persona is unknown
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.server.base_url).map_err(|e| {
            SaarthiError::Config(format!(
                "server.base_url is not a valid URL ({}): {}",
                self.server.base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SaarthiError::Config(format!(
                "server.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.server.timeout_seconds == 0 {
            return Err(SaarthiError::Config(
                "server.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.server.timeout_seconds > 600 {
            return Err(SaarthiError::Config(
                "server.timeout_seconds must be less than or equal to 600".to_string(),
            )
            .into());
        }

        if find_persona(&self.chat.default_persona).is_none() {
            let valid: Vec<&str> = PERSONAS.iter().map(|p| p.id).collect();
            return Err(SaarthiError::Config(format!(
                "Invalid chat.default_persona: {}. Must be one of: {}",
                self.chat.default_persona,
                valid.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            chat: ChatConfig::default(),
            vent: VentConfig::default(),
        }
    }
}
