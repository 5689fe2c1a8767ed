
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::dialogue::ContextEntry;
use crate::error::ClassifyError;
use crate::matcher::{self, PlatformMatch};
use crate::settings::{DomainSettings, DomainSettingsStore};

/// Characters of page text handed to the content classifier
pub const MAX_CONTENT_CHARS: usize = 1000;

/// File name of the extension page shown in place of a blocked site
pub const DEFAULT_BLOCK_PAGE: &str = "block.html";

const EXTENSION_SCHEMES: &[&str] = &["chrome-extension", "moz-extension", "safari-web-extension"];

/// Title and visible text of a fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub title: String,
    pub text: String,
}

/// Retrieves a page for the content tier
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageContent>;
}

/// Everything the content classifier sees about one page
#[derive(Debug, Clone, Serialize)]
pub struct ContentPayload<'a> {
    pub domain: &'a str,
    pub context: &'a [ContextEntry],
    pub settings: &'a DomainSettings,
    pub url: &'a str,
    pub title: String,
    pub text: String,
}

/// Semantic yes/no judgement of page content
#[async_trait]
pub trait ContentClassifier: Send + Sync {
    async fn classify(&self, payload: &ContentPayload<'_>) -> Result<bool>;
}

/// Which rule produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionTier {
    /// The extension's own block page
    InternalPage,
    /// AI assistant the domain does not approve
    UnapprovedAiTool,
    /// Approved AI tool, LMS or productivity platform
    AllowList,
    /// Host on the domain's block list
    BlockList,
    /// Verdict of the content classifier
    Content,
    /// Fetch or classifier failure, treated as unproductive
    FailedClosed,
}

impl DecisionTier {
    /// Get human-readable description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InternalPage => "internal block page",
            Self::UnapprovedAiTool => "AI tool not approved for this domain",
            Self::AllowList => "allowed platform",
            Self::BlockList => "blocked site",
            Self::Content => "page content",
            Self::FailedClosed => "page could not be analyzed",
        }
    }
}

/// Classification result with metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub productive: bool,
    pub tier: DecisionTier,
}

impl Classification {
    const fn new(productive: bool, tier: DecisionTier) -> Self {
        Self { productive, tier }
    }
}

/// Truncate to at most `max_chars` characters without splitting UTF-8 sequences
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Decides whether a URL is productive for a domain.
///
/// Priority: internal page > unapproved AI tool > allow lists > block list >
/// content classifier. Holds no mutable state and can be shared across tasks.
pub struct ClassificationEngine {
    settings: Arc<DomainSettingsStore>,
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<dyn ContentClassifier>,
    block_page: String,
}

impl ClassificationEngine {
    #[must_use]
    pub fn new(
        settings: Arc<DomainSettingsStore>,
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<dyn ContentClassifier>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            classifier,
            block_page: DEFAULT_BLOCK_PAGE.to_string(),
        }
    }

    /// Use a different file name for the internal block page
    #[must_use]
    pub fn with_block_page(mut self, block_page: impl Into<String>) -> Self {
        self.block_page = block_page.into();
        self
    }

    #[must_use]
    pub fn settings(&self) -> &DomainSettingsStore {
        &self.settings
    }

    /// Classify a URL for a domain
    ///
    /// # Errors
    ///
    /// Returns `UnknownDomain` or `InvalidUrl` for bad input. Fetch and
    /// classifier failures never surface; they yield `false`.
    pub async fn classify(
        &self,
        url: &str,
        domain: &str,
        context: &[ContextEntry],
    ) -> Result<bool, ClassifyError> {
        Ok(self.classify_full(url, domain, context).await?.productive)
    }

    /// Classify with the deciding tier
    ///
    /// # Errors
    ///
    /// Same as [`Self::classify`].
    pub async fn classify_full(
        &self,
        url: &str,
        domain: &str,
        context: &[ContextEntry],
    ) -> Result<Classification, ClassifyError> {
        let settings = self.settings.require(domain)?;

        // 1. Our own block page must never be classified
        if self.is_block_page(url) {
            log::debug!("'{url}' is the internal block page");
            return Ok(Classification::new(false, DecisionTier::InternalPage));
        }

        let host = matcher::host_of(url)?;

        // 2./3. AI tools decide alone; otherwise LMS and productivity lists
        match matcher::match_platform(&host, settings) {
            PlatformMatch::UnapprovedAiTool(tool) => {
                log::debug!("'{host}' is AI tool '{tool}', not approved for '{domain}'");
                return Ok(Classification::new(false, DecisionTier::UnapprovedAiTool));
            }
            PlatformMatch::Unmatched => {}
            allowed => {
                log::debug!("'{host}' allowed for '{domain}' ({allowed:?})");
                return Ok(Classification::new(true, DecisionTier::AllowList));
            }
        }

        // 4. Block list
        if let Some(entry) = matcher::blocked_entry(&host, settings) {
            log::debug!("'{host}' blocked for '{domain}' by '{entry}'");
            return Ok(Classification::new(false, DecisionTier::BlockList));
        }

        // 5. Content classifier, failing closed
        match self.classify_content(url, domain, context, settings).await {
            Ok(productive) => {
                log::debug!("Content tier judged '{url}' productive={productive}");
                Ok(Classification::new(productive, DecisionTier::Content))
            }
            Err(e) => {
                log::warn!("Treating '{url}' as unproductive: {e}");
                Ok(Classification::new(false, DecisionTier::FailedClosed))
            }
        }
    }

    async fn classify_content(
        &self,
        url: &str,
        domain: &str,
        context: &[ContextEntry],
        settings: &DomainSettings,
    ) -> Result<bool, ClassifyError> {
        let page = self
            .fetcher
            .fetch(&matcher::normalize_url(url))
            .await
            .map_err(ClassifyError::Fetch)?;
        let payload = ContentPayload {
            domain,
            context,
            settings,
            url,
            title: page.title,
            text: truncate_chars(&page.text, MAX_CONTENT_CHARS),
        };
        self.classifier
            .classify(&payload)
            .await
            .map_err(ClassifyError::Classifier)
    }

    fn is_block_page(&self, url: &str) -> bool {
        let Ok(parsed) = url::Url::parse(url) else {
            return false;
        };
        EXTENSION_SCHEMES.contains(&parsed.scheme())
            && parsed
                .path_segments()
                .and_then(Iterator::last)
                .is_some_and(|file| file == self.block_page)
    }
}
