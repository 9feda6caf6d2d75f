//! Configuration management for QuickNote
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{QuicknoteError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for QuickNote
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Summarization API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Answer reveal animation settings
    #[serde(default)]
    pub reveal: RevealConfig,
    /// Interactive session settings
    #[serde(default)]
    pub interface: InterfaceConfig,
}

/// Summarization API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Largest document accepted for upload (bytes)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_max_upload_bytes() -> u64 {
    16 * 1024 * 1024 // 16 MB, the backend's own limit
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Answer reveal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Reveal answers incrementally; when false the whole answer is shown at once
    #[serde(default = "default_reveal_enabled")]
    pub enabled: bool,

    /// Delay between reveal steps (milliseconds)
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// Characters revealed per step
    #[serde(default = "default_chars_per_step")]
    pub chars_per_step: usize,
}

fn default_reveal_enabled() -> bool {
    true
}

fn default_step_delay_ms() -> u64 {
    10
}

fn default_chars_per_step() -> usize {
    1
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: default_reveal_enabled(),
            step_delay_ms: default_step_delay_ms(),
            chars_per_step: default_chars_per_step(),
        }
    }
}

impl RevealConfig {
    /// Delay between reveal steps as a [`Duration`]
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

/// Interactive session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Soft limit shown next to the paste buffer (characters); never enforced
    #[serde(default = "default_paste_soft_limit")]
    pub paste_soft_limit: usize,

    /// Canned prompts offered on the document screen
    #[serde(default = "default_suggestions")]
    pub suggestions: Vec<String>,

    /// Delete the active server-side session when the interactive session ends
    #[serde(default = "default_delete_session_on_exit")]
    pub delete_session_on_exit: bool,
}

fn default_paste_soft_limit() -> usize {
    10_000
}

fn default_suggestions() -> Vec<String> {
    vec![
        "Summarize key points".to_string(),
        "Extract main conclusions".to_string(),
        "List important findings".to_string(),
    ]
}

fn default_delete_session_on_exit() -> bool {
    true
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            paste_soft_limit: default_paste_soft_limit(),
            suggestions: default_suggestions(),
            delete_session_on_exit: default_delete_session_on_exit(),
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
    /// Returns error if file cannot be read or parsed
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
            .map_err(|e| QuicknoteError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| QuicknoteError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("QUICKNOTE_API_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: QUICKNOTE_API_BASE_URL");
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("QUICKNOTE_API_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid QUICKNOTE_API_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(enabled) = std::env::var("QUICKNOTE_REVEAL_ENABLED") {
            match enabled.parse::<bool>() {
                Ok(v) => {
                    self.reveal.enabled = v;
                    tracing::debug!(enabled = v, "Env override: QUICKNOTE_REVEAL_ENABLED");
                }
                Err(_) => {
                    tracing::warn!("Invalid value for QUICKNOTE_REVEAL_ENABLED: {}", enabled);
                }
            }
        }

        if let Ok(delay) = std::env::var("QUICKNOTE_REVEAL_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.reveal.step_delay_ms = value;
            } else {
                tracing::warn!("Invalid QUICKNOTE_REVEAL_DELAY_MS: {}", delay);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(api_url) = &cli.api_url {
            self.api.base_url = api_url.clone();
        }

        if cli.no_reveal {
            self.reveal.enabled = false;
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that the API base URL is usable.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            QuicknoteError::Config(format!(
                "Invalid api.base_url '{}': {}",
                self.api.base_url, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(QuicknoteError::Config(format!(
                "api.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(QuicknoteError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.api.max_upload_bytes == 0 {
            return Err(QuicknoteError::Config(
                "api.max_upload_bytes must be greater than 0".to_string(),
            )
            .into());
        }

        if self.reveal.chars_per_step == 0 {
            return Err(QuicknoteError::Config(
                "reveal.chars_per_step must be greater than 0".to_string(),
            )
            .into());
        }

        if self.reveal.step_delay_ms > 1000 {
            return Err(QuicknoteError::Config(
                "reveal.step_delay_ms must be less than or equal to 1000".to_string(),
            )
            .into());
        }

        if self.interface.paste_soft_limit == 0 {
            return Err(QuicknoteError::Config(
                "interface.paste_soft_limit must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
