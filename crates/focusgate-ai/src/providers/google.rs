use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::ai_provider::AiProviderTrait;
use crate::http::ResponseExt;

/// Google GenAI (Gemini) Provider
pub struct GoogleGenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GoogleGenAiProvider {
    #[must_use]
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
                "candidateCount": 1
            }
        })
    }
}

/// Join the text parts of the first candidate.
///
/// A candidate cut off by safety filters has no parts; the finish or block
/// reason goes into the error instead.
fn extract_text(json: &Value) -> Result<String> {
    let candidate = &json["candidates"][0];
    let text: String = candidate["content"]["parts"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|part| part["text"].as_str())
        .collect();
    if text.is_empty() {
        let reason = candidate["finishReason"]
            .as_str()
            .or_else(|| json["promptFeedback"]["blockReason"].as_str())
            .unwrap_or("no candidates");
        anyhow::bail!("Gemini returned no text ({reason})");
    }
    Ok(text)
}

#[async_trait]
impl AiProviderTrait for GoogleGenAiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let json: Value = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(prompt))
            .send()
            .await
            .context("Failed to send request to Gemini")?
            .ensure_success("Gemini")
            .await?
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        extract_text(&json)
    }
}
