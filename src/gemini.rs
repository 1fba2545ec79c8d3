use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use reqwest::Client;
use tracing::{info, error};

use crate::{generator::{ChatPrompt, TextGenerator}, models::Role};

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("API returned status {status}: {body}")] Status { status: u16, body: String },
    #[error("parse error: {0}")] Parse(String),
    #[error("no text content in response")] Empty,
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                error!("❌ Failed to build HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });
        Self { client, api_key, base_url, model }
    }

    /// The key goes in the `x-goog-api-key` header, never the URL.
    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }
}

/// Gemini `generateContent` payload for a chat prompt.
pub fn build_request_body(prompt: &ChatPrompt) -> Value {
    let contents: Vec<Value> = prompt
        .turns
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "model",
            };
            json!({ "role": role, "parts": [{ "text": m.content }] })
        })
        .collect();

    json!({
        "systemInstruction": { "parts": [{ "text": prompt.system_instruction }] },
        "contents": contents,
        "generationConfig": {
            "temperature": prompt.temperature,
            "maxOutputTokens": prompt.max_output_tokens
        }
    })
}

pub fn extract_text(response_text: &str) -> Result<String, GeminiError> {
    let parsed: GeminiResponse = serde_json::from_str(response_text)
        .map_err(|e| GeminiError::Parse(e.to_string()))?;

    parsed
        .candidates
        .first()
        .and_then(|c| c.content.parts.iter().find_map(|p| p.text.as_deref()))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(GeminiError::Empty)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    type Error = GeminiError;

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, GeminiError> {
        info!("🔗 Requesting {} reply ({} turns)", self.model, prompt.turns.len());

        let response = self.client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request_body(prompt))
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.without_url().to_string()))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| GeminiError::Http(e.without_url().to_string()))?;

        if !status.is_success() {
            error!("❌ Gemini API text generation failed with status {}: {}", status, response_text);
            return Err(GeminiError::Status { status: status.as_u16(), body: response_text });
        }

        let text = extract_text(&response_text)?;
        info!("📥 Generated reply ({} chars)", text.len());
        Ok(text)
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Content }

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}
