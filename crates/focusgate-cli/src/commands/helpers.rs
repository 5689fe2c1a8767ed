//! Shared setup and terminal helpers for CLI commands

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use focusgate_ai::AiService;
use focusgate_core::{
    AiContentClassifier, AppConfig, Classification, ClassificationEngine, DomainSettingsStore,
    HttpPageFetcher,
};

/// Everything a command needs, loaded once per invocation
pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<DomainSettingsStore>,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let config = AppConfig::load()?;
        let settings_path = config.settings_path()?;
        let store = DomainSettingsStore::from_json_file(&settings_path).with_context(|| {
            format!(
                "Domain settings are required; create {}",
                settings_path.display()
            )
        })?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Build the configured AI service and report whether it answers
    pub async fn ai_service(&self) -> Result<Arc<AiService>> {
        let ai = AiService::new(&self.config.ai)
            .context("AI provider is not configured (set API_KEY or [ai] in config.toml)")?;
        check_ai_available(&ai).await;
        Ok(Arc::new(ai))
    }

    pub fn engine(&self, ai: Arc<AiService>) -> Result<ClassificationEngine> {
        let fetcher = HttpPageFetcher::new(self.config.fetch_timeout())?;
        let classifier = AiContentClassifier::new(ai);
        Ok(ClassificationEngine::new(
            Arc::clone(&self.store),
            Arc::new(fetcher),
            Arc::new(classifier),
        )
        .with_block_page(self.config.block_page.clone()))
    }
}

/// Warn up front when the model cannot be reached, since the content tier
/// would otherwise fail closed on every page without saying why
pub async fn check_ai_available(ai: &AiService) -> bool {
    let available = ai.is_available().await;
    if available {
        log::info!("Using model {}", ai.model_name());
    } else {
        log::warn!(
            "Model {} is not reachable; pages that need content analysis will be judged not productive",
            ai.model_name()
        );
    }
    available
}

/// Lowercase a typed domain and check it is configured
pub fn resolve_domain(store: &DomainSettingsStore, domain: &str) -> Result<String> {
    let domain = domain.trim().to_lowercase();
    if store.contains(&domain) {
        Ok(domain)
    } else {
        anyhow::bail!(
            "Invalid domain '{domain}'. Configured domains: {}",
            store.domain_names().join(", ")
        )
    }
}

/// Print `prompt` and read one line; `None` at end of input
pub fn prompt_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub fn format_verdict(result: &Classification) -> String {
    let verdict = if result.productive {
        "productive"
    } else {
        "not productive"
    };
    format!(
        "Website is {verdict} for your task ({})",
        result.tier.description()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use focusgate_ai::AiProviderTrait;
    use focusgate_core::DecisionTier;

    struct OfflineProvider {
        reachable: bool,
    }

    #[async_trait]
    impl AiProviderTrait for OfflineProvider {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }

        fn model_name(&self) -> &str {
            "llama-offline"
        }

        async fn is_available(&self) -> bool {
            self.reachable
        }
    }

    fn store() -> DomainSettingsStore {
        DomainSettingsStore::from_json_str(r#"{"domains": {"work": {}, "school": {}}}"#).unwrap()
    }

    #[test]
    fn test_resolve_domain_lowercases() {
        assert_eq!(resolve_domain(&store(), "  Work ").unwrap(), "work");
    }

    #[test]
    fn test_resolve_domain_unknown_lists_choices() {
        let err = resolve_domain(&store(), "gaming").unwrap_err().to_string();
        assert!(err.contains("gaming"));
        assert!(err.contains("school, work"));
    }

    #[test]
    fn test_format_verdict() {
        let productive = Classification {
            productive: true,
            tier: DecisionTier::AllowList,
        };
        assert_eq!(
            format_verdict(&productive),
            "Website is productive for your task (allowed platform)"
        );

        let blocked = Classification {
            productive: false,
            tier: DecisionTier::BlockList,
        };
        assert!(format_verdict(&blocked).starts_with("Website is not productive"));
    }

    #[tokio::test]
    async fn test_check_ai_available_reports_provider_state() {
        let down = AiService::with_provider(Box::new(OfflineProvider { reachable: false }));
        assert!(!check_ai_available(&down).await);

        let up = AiService::with_provider(Box::new(OfflineProvider { reachable: true }));
        assert!(check_ai_available(&up).await);
    }
}
