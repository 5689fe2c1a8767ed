use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::ai_provider::AiProviderTrait;
use crate::http::ResponseExt;

/// How long a liveness check waits for the local daemon
const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Local Ollama provider
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    #[must_use]
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": false,
            "options": {
                "temperature": TEMPERATURE,
                "num_predict": MAX_OUTPUT_TOKENS
            }
        })
    }
}

/// `message.content` of a non-streamed chat reply
fn extract_text(json: &Value) -> Result<String> {
    if let Some(error) = json["error"].as_str() {
        anyhow::bail!("Ollama error: {error}");
    }
    json["message"]["content"]
        .as_str()
        .map(ToString::to_string)
        .context("Failed to extract text from Ollama response")
}

#[async_trait]
impl AiProviderTrait for OllamaProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let json: Value = self
            .client
            .post(&url)
            .json(&self.request_body(prompt))
            .send()
            .await
            .with_context(|| format!("Failed to reach Ollama at {}", self.base_url))?
            .ensure_success("Ollama")
            .await?
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        extract_text(&json)
    }

    async fn is_available(&self) -> bool {
        // The daemon answers /api/tags whenever it is up
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).timeout(PING_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("Ollama not reachable at {}: {e}", self.base_url);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_server::serve_once;

    #[test]
    fn test_request_disables_streaming_and_sampling() {
        let provider = OllamaProvider::new("http://unused", "llama-test");
        let body = provider.request_body("Is this productive?");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["temperature"], 0.0);
        assert_eq!(body["options"]["num_predict"], 128);
    }

    #[test]
    fn test_extract_message_content() {
        let json = json!({
            "model": "llama-test",
            "message": { "role": "assistant", "content": "DONE" },
            "done": true
        });
        assert_eq!(extract_text(&json).unwrap(), "DONE");
    }

    #[test]
    fn test_extract_reports_model_error() {
        let json = json!({ "error": "model 'llama-test' not found" });
        let err = extract_text(&json).unwrap_err().to_string();
        assert!(err.contains("not found"), "{err}");
    }

    #[tokio::test]
    async fn test_generate_posts_chat() {
        let (base_url, server) =
            serve_once(200, r#"{"message":{"role":"assistant","content":"YES"},"done":true}"#).await;
        let provider = OllamaProvider::new(&base_url, "llama-test");

        assert_eq!(provider.generate("Judge this").await.unwrap(), "YES");

        let request = server.await.unwrap();
        assert!(request.request_line().starts_with("POST /api/chat "));
        assert_eq!(request.json()["model"], "llama-test");
    }

    #[tokio::test]
    async fn test_available_when_tags_answer() {
        let (base_url, server) = serve_once(200, r#"{"models":[]}"#).await;
        let provider = OllamaProvider::new(&base_url, "llama-test");

        assert!(provider.is_available().await);
        assert!(server.await.unwrap().request_line().starts_with("GET /api/tags "));
    }

    #[tokio::test]
    async fn test_unavailable_when_nothing_listens() {
        // Bind then drop to get a port with no listener
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let provider = OllamaProvider::new(&format!("http://127.0.0.1:{port}"), "llama-test");
        assert!(!provider.is_available().await);
    }
}
