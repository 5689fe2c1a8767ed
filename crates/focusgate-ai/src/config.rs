use serde::{Deserialize, Serialize};

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "API_KEY";

/// Supported AI backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Google,
    OpenAi,
    Anthropic,
    Ollama,
}

impl AiProvider {
    /// Model used when the configuration does not name one
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Google => "gemini-2.0-flash",
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
            Self::Ollama => "llama3.2",
        }
    }

    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Google => "https://generativelanguage.googleapis.com/v1beta",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::Ollama => "http://localhost:11434",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Gemini",
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
        }
    }

    /// Whether the provider refuses requests without a key
    #[must_use]
    pub const fn requires_api_key(self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

/// AI section of the application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl AiConfig {
    #[must_use]
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Configured key, falling back to the `API_KEY` environment variable
    #[must_use]
    pub fn effective_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_google_gemini() {
        let config = AiConfig::default();
        assert_eq!(config.provider, AiProvider::Google);
        assert_eq!(config.effective_model(), "gemini-2.0-flash");
    }

    #[test]
    fn test_explicit_model_wins() {
        let config = AiConfig {
            provider: AiProvider::Ollama,
            model: Some("mistral".to_string()),
            ..AiConfig::default()
        };
        assert_eq!(config.effective_model(), "mistral");
    }

    #[test]
    fn test_blank_model_falls_back_to_default() {
        let config = AiConfig {
            provider: AiProvider::Anthropic,
            model: Some("  ".to_string()),
            ..AiConfig::default()
        };
        assert_eq!(config.effective_model(), "claude-3-5-haiku-latest");
    }

    #[test]
    fn test_explicit_api_key_is_trimmed() {
        let config = AiConfig {
            api_key: Some("  secret-key\n".to_string()),
            ..AiConfig::default()
        };
        assert_eq!(config.effective_api_key().as_deref(), Some("secret-key"));
    }

    #[test]
    fn test_base_url_override() {
        let config = AiConfig {
            provider: AiProvider::OpenAi,
            base_url: Some("http://localhost:8080/v1".to_string()),
            ..AiConfig::default()
        };
        assert_eq!(config.effective_base_url(), "http://localhost:8080/v1");
        assert_eq!(
            AiConfig::default().effective_base_url(),
            "https://generativelanguage.googleapis.com/v1beta"
        );
    }

    #[test]
    fn test_provider_from_toml() {
        let config: AiConfig = toml::from_str("provider = \"openai\"\nmodel = \"gpt-4o\"\n").unwrap();
        assert_eq!(config.provider, AiProvider::OpenAi);
        assert_eq!(config.effective_model(), "gpt-4o");
        assert!(AiProvider::OpenAi.requires_api_key());
        assert!(!AiProvider::Ollama.requires_api_key());
    }
}
