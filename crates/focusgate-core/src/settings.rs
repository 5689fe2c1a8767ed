use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ClassifyError;

/// Allow and block lists for one activity domain (work, school, ...).
///
/// Entries are compared case-insensitively. `ai_tools` holds tool names
/// ("chatgpt"), the other lists hold host suffixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainSettings {
    pub ai_tools: Vec<String>,
    pub lms_platforms: Vec<String>,
    pub productivity_tools: Vec<String>,
    pub blocked_specific: Vec<String>,
}

impl DomainSettings {
    /// Whether `tool` is one of the approved AI tools
    #[must_use]
    pub fn allows_ai_tool(&self, tool: &str) -> bool {
        self.ai_tools
            .iter()
            .any(|t| t.trim().eq_ignore_ascii_case(tool))
    }

    /// Names of the lists holding blank entries, which never match a host
    #[must_use]
    pub fn lists_with_blank_entries(&self) -> Vec<&'static str> {
        [
            ("aiTools", &self.ai_tools),
            ("lmsPlatforms", &self.lms_platforms),
            ("productivityTools", &self.productivity_tools),
            ("blockedSpecific", &self.blocked_specific),
        ]
        .into_iter()
        .filter(|(_, entries)| entries.iter().any(|e| e.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Deserialize)]
struct SettingsFile {
    domains: HashMap<String, DomainSettings>,
}

/// Read-only mapping from domain name to its settings
#[derive(Debug, Clone, Default)]
pub struct DomainSettingsStore {
    domains: HashMap<String, DomainSettings>,
}

impl DomainSettingsStore {
    #[must_use]
    pub fn new(domains: HashMap<String, DomainSettings>) -> Self {
        log::info!("Loaded settings for {} domains", domains.len());
        for (name, settings) in &domains {
            let lists = settings.lists_with_blank_entries();
            if !lists.is_empty() {
                log::warn!(
                    "Domain '{name}' has blank entries in {}; they are ignored",
                    lists.join(", ")
                );
            }
        }
        Self { domains }
    }

    /// Parse a `{"domains": {...}}` settings document
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has no `domains` object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: SettingsFile =
            serde_json::from_str(json).context("Failed to parse domain settings")?;
        Ok(Self::new(file.domains))
    }

    /// Load a settings document from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json_str(&json)
    }

    #[must_use]
    pub fn get(&self, domain: &str) -> Option<&DomainSettings> {
        self.domains.get(domain)
    }

    /// Look up a domain, failing with `UnknownDomain` when absent
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::UnknownDomain` if the domain is not configured.
    pub fn require(&self, domain: &str) -> Result<&DomainSettings, ClassifyError> {
        self.get(domain)
            .ok_or_else(|| ClassifyError::UnknownDomain(domain.to_string()))
    }

    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    /// Domain names in alphabetical order
    #[must_use]
    pub fn domain_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.domains.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
