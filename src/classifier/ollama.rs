//! Ollama chat backend.

use super::error::ClassifierError;
use super::LanguageModel;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// System prompt for classification requests.
const SYSTEM_PROMPT: &str = r#"You are a productivity assistant that classifies website titles.
Only output a single valid JSON object, no explanations or markdown."#;

/// Message in the chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat API response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

/// Client for a local Ollama server.
pub struct OllamaModel {
    client: Client,
    ollama_url: String,
    model_name: String,
    temperature: f32,
    timeout_seconds: u64,
}

impl OllamaModel {
    pub fn new(
        client: Client,
        ollama_url: String,
        model_name: String,
        temperature: f32,
        timeout_seconds: u64,
    ) -> Self {
        Self {
            client,
            ollama_url: ollama_url.trim_end_matches('/').to_string(),
            model_name,
            temperature,
            timeout_seconds,
        }
    }

    fn build_request(&self, prompt: &str) -> OllamaChatRequest {
        OllamaChatRequest {
            model: self.model_name.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaModel {
    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn ensure_configured(&self) -> Result<(), ClassifierError> {
        Ok(())
    }

    async fn complete(&self, prompt: &str) -> Result<String, ClassifierError> {
        let url = format!("{}/api/chat", self.ollama_url);
        debug!("Sending classification prompt to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| ClassifierError::from_request(e, &self.ollama_url, self.timeout_seconds))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api { status, body });
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::from_request(e, &self.ollama_url, self.timeout_seconds))?;

        Ok(chat_response.message.content)
    }
}
