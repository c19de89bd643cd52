//! Configuration loading and validation for Conclave.
//!
//! Loads configuration from `~/.conclave/config.toml` with environment
//! variable overrides. Every field has a serde default so an absent file
//! still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure.
///
/// Maps directly to `~/.conclave/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion backend ("openrouter", "openai", "ollama")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier sent to the backend
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per model response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Path of the bookkeeping ledger file
    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,

    /// Loop and delegation limits
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

fn default_provider() -> String {
    "openrouter".into()
}
fn default_model() -> String {
    "openai/gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_ledger_path() -> String {
    "ledger.jsonl".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Iteration ceiling per agent loop level
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Sliding window size for each agent's local memory
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Maximum delegation depth before `call_agent` refuses
    #[serde(default = "default_max_delegation_depth")]
    pub max_delegation_depth: u32,

    /// Surface loop progress to the operator
    #[serde(default)]
    pub debug: bool,
}

fn default_max_iterations() -> u32 {
    50
}
fn default_max_history() -> usize {
    24
}
fn default_max_delegation_depth() -> u32 {
    4
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_history: default_max_history(),
            max_delegation_depth: default_max_delegation_depth(),
            debug: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            ledger_path: default_ledger_path(),
            runtime: RuntimeConfig::default(),
        }
    }
}

/// Redact the secret in Debug output.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("ledger_path", &self.ledger_path)
            .field("runtime", &self.runtime)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// The configuration directory, `~/.conclave`.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".conclave")
    }

    /// Load from `~/.conclave/config.toml` with env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("CONCLAVE_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("CONCLAVE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("CONCLAVE_MODEL") {
            config.model = model;
        }

        Ok(config)
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature {} out of range [0.0, 2.0]",
                self.temperature
            )));
        }
        if self.runtime.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "runtime.max_iterations must be at least 1".into(),
            ));
        }
        if self.runtime.max_history == 0 {
            return Err(ConfigError::Invalid(
                "runtime.max_history must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider, "openrouter");
        assert_eq!(config.runtime.max_delegation_depth, 4);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config =
            AppConfig::load_from(Path::new("/nonexistent/conclave/config.toml")).unwrap();
        assert_eq!(config.model, default_model());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
provider = "ollama"
model = "llama3.1"

[runtime]
max_history = 12
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.1");
        assert_eq!(config.runtime.max_history, 12);
        assert_eq!(config.runtime.max_iterations, default_max_iterations());
    }

    #[test]
    fn invalid_temperature_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "temperature = 9.5").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
