//! docqa-generate
//!
//! Generation backends. `OllamaGenerator` talks to a local Ollama server over
//! its `/api/chat` endpoint with a single non-streamed user message.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use docqa_core::config::GenerationSettings;
use docqa_core::traits::Generator;
use docqa_core::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
}

pub struct OllamaGenerator {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(settings: &GenerationSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::Generation(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }

    pub fn model(&self) -> &str { &self.model }

    pub fn chat_url(&self) -> String { format!("{}/api/chat", self.base_url) }

    pub fn request<'a>(&'a self, prompt: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt.to_string() }],
            stream: false,
        }
    }
}

/// Pull the assistant text out of a non-streamed `/api/chat` response body.
pub fn parse_chat_response(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| Error::Generation(format!("invalid response: {e}")))?;
    parsed
        .message
        .map(|m| m.content.trim().to_string())
        .ok_or_else(|| Error::Generation("response has no message content".to_string()))
}

impl Generator for OllamaGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.chat_url();
        debug!(%url, model = %self.model, prompt_chars = prompt.len(), "sending chat request");
        let resp = self
            .client
            .post(&url)
            .json(&self.request(prompt))
            .send()
            .map_err(|e| Error::Generation(format!("Ollama connection failed ({url}): {e}")))?;
        let status = resp.status();
        let body = resp.text().map_err(|e| Error::Generation(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Generation(format!("Ollama error {status}: {body}")));
        }
        parse_chat_response(&body)
    }
}
