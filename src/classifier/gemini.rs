//! Google Gemini backend.

use super::error::ClassifierError;
use super::LanguageModel;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResContent {
    #[serde(default)]
    parts: Vec<GeminiResPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResPart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// Gemini `generateContent` client.
pub struct GeminiModel {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    model_name: String,
    temperature: f32,
    timeout_seconds: u64,
}

impl GeminiModel {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        model_name: String,
        temperature: f32,
        timeout_seconds: u64,
    ) -> Self {
        Self {
            client,
            api_base: GEMINI_API_BASE.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model_name,
            temperature,
            timeout_seconds,
        }
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base;
        self
    }

    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn ensure_configured(&self) -> Result<(), ClassifierError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(ClassifierError::MissingCredential("GOOGLE_API_KEY")),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, ClassifierError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClassifierError::MissingCredential("GOOGLE_API_KEY"))?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            self.api_base, self.model_name
        );
        debug!("Sending classification prompt to {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| ClassifierError::from_request(e, &self.api_base, self.timeout_seconds))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api { status, body });
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::from_request(e, &self.api_base, self.timeout_seconds))?;

        Ok(parsed.into_text())
    }
}
