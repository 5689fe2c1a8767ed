use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::ai_provider::AiProviderTrait;
use crate::http::ResponseExt;

const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    #[must_use]
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "temperature": TEMPERATURE,
            "messages": [{ "role": "user", "content": prompt }]
        })
    }
}

/// Concatenate the `text` blocks of `content`
fn extract_text(json: &Value) -> Result<String> {
    let text: String = json["content"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .collect();
    if text.is_empty() {
        let reason = json["stop_reason"].as_str().unwrap_or("no content");
        anyhow::bail!("Anthropic returned no text ({reason})");
    }
    Ok(text)
}

#[async_trait]
impl AiProviderTrait for AnthropicProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/messages", self.base_url);

        let json: Value = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(prompt))
            .send()
            .await
            .context("Failed to send request to Anthropic")?
            .ensure_success("Anthropic")
            .await?
            .json()
            .await
            .context("Failed to parse Anthropic response")?;

        extract_text(&json)
    }
}
