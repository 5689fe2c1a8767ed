use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::{AiConfig, AiProvider};
use crate::providers::{
    anthropic::AnthropicProvider, google::GoogleGenAiProvider, ollama::OllamaProvider,
    openai::OpenAiProvider,
};

/// Trait for AI providers
#[async_trait]
pub trait AiProviderTrait: Send + Sync {
    /// Generate text response for a given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Whether the backend answers; hosted APIs are assumed reachable
    async fn is_available(&self) -> bool {
        true
    }
}

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns an error if the provider needs an API key and none is configured
/// or set in the environment.
pub fn create_provider(config: &AiConfig) -> Result<Box<dyn AiProviderTrait>> {
    let kind = config.provider;
    let model = config.effective_model();
    let base_url = config.effective_base_url();

    let api_key = if kind.requires_api_key() {
        config
            .effective_api_key()
            .with_context(|| format!("API key required for {}", kind.display_name()))?
    } else {
        String::new()
    };

    let provider: Box<dyn AiProviderTrait> = match kind {
        AiProvider::Google => Box::new(GoogleGenAiProvider::new(&api_key, model, base_url)),
        AiProvider::OpenAi => Box::new(OpenAiProvider::new(&api_key, model, base_url)),
        AiProvider::Anthropic => Box::new(AnthropicProvider::new(&api_key, model, base_url)),
        AiProvider::Ollama => Box::new(OllamaProvider::new(base_url, model)),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_needs_no_key() {
        let config = AiConfig {
            provider: AiProvider::Ollama,
            ..AiConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "llama3.2");
    }

    #[test]
    fn test_missing_key_names_provider() {
        // Only meaningful when the environment does not supply a key
        if std::env::var(crate::config::API_KEY_ENV).is_ok() {
            return;
        }
        let config = AiConfig {
            provider: AiProvider::OpenAi,
            ..AiConfig::default()
        };
        let err = create_provider(&config).err().unwrap().to_string();
        assert_eq!(err, "API key required for OpenAI");
    }

    #[test]
    fn test_keyed_provider_uses_configured_model() {
        let config = AiConfig {
            provider: AiProvider::Anthropic,
            api_key: Some("test-key".to_string()),
            model: Some("claude-test".to_string()),
            ..AiConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "claude-test");
    }
}
