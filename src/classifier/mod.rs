//! Title classification through an external language model.
//!
//! The gateway builds one prompt per request, sends it to the configured
//! backend and parses the answer into typed classifications.

pub mod error;
pub mod gateway;
mod gemini;
mod ollama;
pub mod prompt;
pub mod response;

pub use error::ClassifierError;
pub use gateway::ClassifierGateway;

use crate::config::{ModelConfig, ModelProvider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A text completion backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short backend name for logs.
    fn provider_name(&self) -> &'static str;

    /// Model identifier sent to the backend.
    fn model_name(&self) -> &str;

    /// Check that the backend has everything it needs to be called.
    fn ensure_configured(&self) -> Result<(), ClassifierError>;

    /// Send a prompt and return the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String, ClassifierError>;
}

/// Build the backend selected by the configuration.
pub fn build_model(config: &ModelConfig) -> Result<Arc<dyn LanguageModel>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()
        .context("Failed to create HTTP client")?;

    let model: Arc<dyn LanguageModel> = match config.provider {
        ModelProvider::Gemini => Arc::new(gemini::GeminiModel::new(
            client,
            config.api_key.clone(),
            config.model_name(),
            config.temperature,
            config.timeout_seconds,
        )),
        ModelProvider::Ollama => Arc::new(ollama::OllamaModel::new(
            client,
            config.ollama_url.clone(),
            config.model_name(),
            config.temperature,
            config.timeout_seconds,
        )),
    };

    Ok(model)
}
