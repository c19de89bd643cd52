//! Completion-model backends for Conclave.
//!
//! The agent loop only knows the [`conclave_core::CompletionModel`] trait;
//! this crate supplies the concrete backends. In practice almost every
//! hosted model speaks the OpenAI chat-completions dialect, so one
//! implementation covers OpenRouter, OpenAI, Ollama, and friends.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatModel;

use conclave_config::AppConfig;
use conclave_core::{CompletionModel, ModelError};
use std::sync::Arc;

/// Build the configured completion model from application config.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn CompletionModel>, ModelError> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let model = match config.provider.as_str() {
        "openrouter" => OpenAiCompatModel::openrouter(api_key),
        "openai" => OpenAiCompatModel::openai(api_key),
        "ollama" => OpenAiCompatModel::ollama(None),
        other => {
            return Err(ModelError::NotConfigured(format!(
                "Unknown provider '{other}'"
            )));
        }
    };
    Ok(Arc::new(
        model
            .with_model(&config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens),
    ))
}
