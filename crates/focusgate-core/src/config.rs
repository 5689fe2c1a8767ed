use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use focusgate_ai::AiConfig;

use crate::classifier::DEFAULT_BLOCK_PAGE;
use crate::dialogue::ContextEntry;

const APP_DIR: &str = "focusgate";
const CONFIG_FILE: &str = "config.toml";
const SETTINGS_FILE: &str = "settings.json";
const API_KEY_FILE: &str = "api_key.txt";
const CONTEXT_FILE: &str = "context.json";

/// Get the configuration directory for focusgate.
///
/// # Errors
///
/// Returns an error if the configuration directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Failed to get config dir"))?;
    path.push(APP_DIR);
    Ok(path)
}

/// Get the local data directory for focusgate.
///
/// # Errors
///
/// Returns an error if the local data directory cannot be determined.
pub fn get_data_dir() -> Result<PathBuf> {
    let mut path =
        dirs::data_local_dir().ok_or_else(|| anyhow::anyhow!("Failed to get local data dir"))?;
    path.push(APP_DIR);
    Ok(path)
}

/// Application configuration, read from `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Domain settings JSON; defaults to `settings.json` next to the config
    pub settings_path: Option<PathBuf>,
    pub cache_size: usize,
    pub fetch_timeout_secs: u64,
    /// File name of the extension's block page
    pub block_page: String,
    pub ai: AiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings_path: None,
            cache_size: 100,
            fetch_timeout_secs: 10,
            block_page: DEFAULT_BLOCK_PAGE.to_string(),
            ai: AiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default config directory
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory is unknown or the file is malformed.
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&get_config_dir()?)
    }

    /// Load `config.toml` from `dir`, using defaults when it does not exist.
    /// A missing API key is filled from `api_key.txt` in the same directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        if config.settings_path.is_none() {
            config.settings_path = Some(dir.join(SETTINGS_FILE));
        }
        config.fill_api_key_from_file(&dir.join(API_KEY_FILE))?;
        Ok(config)
    }

    fn fill_api_key_from_file(&mut self, path: &Path) -> Result<()> {
        if self.ai.effective_api_key().is_some() || !path.exists() {
            return Ok(());
        }
        let key = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let key = key.trim();
        if !key.is_empty() {
            log::debug!("Using API key from {}", path.display());
            self.ai.api_key = Some(key.to_string());
        }
        Ok(())
    }

    /// Path of the domain settings file
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the config dir is unknown.
    pub fn settings_path(&self) -> Result<PathBuf> {
        match &self.settings_path {
            Some(path) => Ok(path.clone()),
            None => Ok(get_config_dir()?.join(SETTINGS_FILE)),
        }
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

/// Default location of the saved dialogue context
///
/// # Errors
///
/// Returns an error if the local data directory cannot be determined.
pub fn context_file_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(CONTEXT_FILE))
}

/// Persist a dialogue history as JSON
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file written.
pub fn save_context(path: &Path, context: &[ContextEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(context).context("Failed to serialize context")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Load a saved dialogue history; a missing file is an empty history
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_context(path: &Path) -> Result<Vec<ContextEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use focusgate_ai::AiProvider;

    #[test]
    fn test_defaults_when_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.cache_size, 100);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.block_page, "block.html");
        assert_eq!(config.settings_path().unwrap(), dir.path().join("settings.json"));
    }

    #[test]
    fn test_parse_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "cache_size = 5\nsettings_path = \"/etc/focusgate/settings.json\"\n\n[ai]\nprovider = \"ollama\"\n",
        )
        .unwrap();
        let config = AppConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.cache_size, 5);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(config.ai.provider, AiProvider::Ollama);
        assert_eq!(
            config.settings_path().unwrap(),
            PathBuf::from("/etc/focusgate/settings.json")
        );
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "cache_size = \"many\"").unwrap();
        assert!(AppConfig::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_configured_key_not_overridden_by_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[ai]\napi_key = \"from-config\"\n").unwrap();
        std::fs::write(dir.path().join("api_key.txt"), "from-file\n").unwrap();
        let config = AppConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.ai.api_key.as_deref(), Some("from-config"));
    }

    #[test]
    fn test_api_key_file_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("api_key.txt"), "  from-file\n").unwrap();
        let config = AppConfig::load_from_dir(dir.path()).unwrap();
        // The environment variable takes precedence when set
        if std::env::var(focusgate_ai::config::API_KEY_ENV).is_err() {
            assert_eq!(config.ai.api_key.as_deref(), Some("from-file"));
        }
        assert!(config.ai.effective_api_key().is_some());
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = AppConfig {
            fetch_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.fetch_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_context_roundtrip_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("context.json");
        let context = vec![
            ContextEntry::new("First?", "one"),
            ContextEntry::new("Second?", "two"),
        ];
        save_context(&path, &context).unwrap();
        assert_eq!(load_context(&path).unwrap(), context);
    }

    #[test]
    fn test_missing_context_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_context(&dir.path().join("none.json")).unwrap().is_empty());
    }
}
