/// Language-model clients
///
/// The requester only needs "prompt in, text out". `OpenAiChatClient` talks
/// to any OpenAI-compatible `chat/completions` endpoint with plain reqwest.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::insights::InsightError;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Something that can complete a prompt
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Return the model's raw text answer to a single user prompt
    async fn complete(&self, prompt: &str) -> Result<String, InsightError>;
}

#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiChatClient {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn auth_header(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.api_key))
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, InsightError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        });

        let (header, value) = self.auth_header();
        let resp = self
            .client
            .post(&url)
            .header(header, value)
            .json(&body)
            .send()
            .await
            .map_err(|e| InsightError::Api(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(InsightError::Api(format!("{}: {}", status, detail)));
        }

        let resp_json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| InsightError::Api(e.to_string()))?;

        resp_json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| InsightError::Api("No message content in completion response".to_string()))
    }
}
