
use url::Url;

use crate::error::ClassifyError;
use crate::settings::DomainSettings;

/// Known AI assistants and the hosts they are served from.
///
/// Matching is by host suffix, so no pattern may be a suffix of another
/// tool's pattern; at most one tool matches any host.
pub const AI_TOOL_PATTERNS: &[(&str, &[&str])] = &[
    ("chatgpt", &["chat.openai.com", "chatgpt.com"]),
    ("claude", &["claude.ai"]),
    ("gemini", &["gemini.google.com", "bard.google.com"]),
    ("copilot", &["copilot.microsoft.com"]),
    ("perplexity", &["perplexity.ai"]),
    ("deepseek", &["chat.deepseek.com"]),
    ("mistral", &["chat.mistral.ai"]),
    ("poe", &["poe.com"]),
];

/// Why a host did or did not count as an allowed platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformMatch {
    /// AI tool listed in the domain's `aiTools`
    ApprovedAiTool(&'static str),
    /// AI tool the domain does not approve
    UnapprovedAiTool(&'static str),
    /// Host ends with an `lmsPlatforms` entry
    Lms(String),
    /// Host ends with a `productivityTools` entry (underscores removed)
    Productivity(String),
    /// Nothing matched
    Unmatched,
}

impl PlatformMatch {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(
            self,
            Self::ApprovedAiTool(_) | Self::Lms(_) | Self::Productivity(_)
        )
    }

    #[must_use]
    pub const fn is_ai_tool(&self) -> bool {
        matches!(self, Self::ApprovedAiTool(_) | Self::UnapprovedAiTool(_))
    }
}

/// Add a scheme to bare hosts such as `docs.rs/serde` so they parse
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") || url.starts_with("about:") || url.starts_with("mailto:") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Lowercased host of `url`
///
/// # Errors
///
/// Returns `ClassifyError::InvalidUrl` if the URL does not parse or has no host.
pub fn host_of(url: &str) -> Result<String, ClassifyError> {
    let parsed =
        Url::parse(&normalize_url(url)).map_err(|_| ClassifyError::InvalidUrl(url.to_string()))?;
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ClassifyError::InvalidUrl(url.to_string()))
}

fn host_ends_with(host: &str, suffix: &str) -> bool {
    !suffix.is_empty() && host.ends_with(suffix)
}

/// Name of the AI tool served from `host`, if any
#[must_use]
pub fn ai_tool_for_host(host: &str) -> Option<&'static str> {
    AI_TOOL_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| host_ends_with(host, p)))
        .map(|(tool, _)| *tool)
}

/// Classify `host` against the domain's platform lists.
///
/// An AI tool match decides the outcome on its own; LMS and productivity
/// lists are only consulted for non-AI hosts.
#[must_use]
pub fn match_platform(host: &str, settings: &DomainSettings) -> PlatformMatch {
    if let Some(tool) = ai_tool_for_host(host) {
        return if settings.allows_ai_tool(tool) {
            PlatformMatch::ApprovedAiTool(tool)
        } else {
            PlatformMatch::UnapprovedAiTool(tool)
        };
    }

    if let Some(entry) = settings
        .lms_platforms
        .iter()
        .find(|entry| host_ends_with(host, &entry.trim().to_lowercase()))
    {
        return PlatformMatch::Lms(entry.clone());
    }

    // "google_docs" is compared as "googledocs"
    if let Some(entry) = settings
        .productivity_tools
        .iter()
        .find(|entry| host_ends_with(host, &entry.trim().to_lowercase().replace('_', "")))
    {
        return PlatformMatch::Productivity(entry.clone());
    }

    PlatformMatch::Unmatched
}

/// Whether `host` ends with one of the domain's `blockedSpecific` entries
#[must_use]
pub fn blocked_entry<'a>(host: &str, settings: &'a DomainSettings) -> Option<&'a str> {
    settings
        .blocked_specific
        .iter()
        .find(|entry| host_ends_with(host, &entry.trim().to_lowercase()))
        .map(String::as_str)
}

/// Whether `url` is an allowed platform for the domain
///
/// # Errors
///
/// Returns `ClassifyError::InvalidUrl` if the URL has no parseable host.
pub fn is_allowed_platform(url: &str, settings: &DomainSettings) -> Result<bool, ClassifyError> {
    Ok(match_platform(&host_of(url)?, settings).is_allowed())
}

/// Whether `url` is served by any known AI tool, regardless of domain
///
/// # Errors
///
/// Returns `ClassifyError::InvalidUrl` if the URL has no parseable host.
pub fn is_ai_site(url: &str) -> Result<bool, ClassifyError> {
    Ok(ai_tool_for_host(&host_of(url)?).is_some())
}
