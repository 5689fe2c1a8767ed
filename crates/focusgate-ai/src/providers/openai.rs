use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::ai_provider::AiProviderTrait;
use crate::http::ResponseExt;

/// `OpenAI` chat completions provider (also any OpenAI-compatible server)
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
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
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "n": 1
        })
    }
}

/// `choices[0].message.content`, or the refusal text as an error
fn extract_text(json: &Value) -> Result<String> {
    let message = &json["choices"][0]["message"];
    if let Some(content) = message["content"].as_str() {
        return Ok(content.to_string());
    }
    if let Some(refusal) = message["refusal"].as_str() {
        anyhow::bail!("OpenAI refused the request: {refusal}");
    }
    anyhow::bail!("Failed to extract text from OpenAI response")
}

#[async_trait]
impl AiProviderTrait for OpenAiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let json: Value = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .context("Failed to send request to OpenAI")?
            .ensure_success("OpenAI")
            .await?
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        extract_text(&json)
    }
}
