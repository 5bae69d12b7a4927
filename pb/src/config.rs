//! Promptboard configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use eyre::{Context, Result};
use promptstore::{DEFAULT_STORAGE_KEY, FileStorage, PromptStore, open_source};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::render::Renderer;

/// Main promptboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Static catalog: an `http(s)://` URL or a file path
    #[serde(rename = "static-source")]
    pub static_source: String,

    /// Directory holding the local storage slots
    #[serde(rename = "storage-dir")]
    pub storage_dir: PathBuf,

    /// Slot holding locally submitted prompts
    #[serde(rename = "storage-key")]
    pub storage_key: String,

    /// Directory with `.hbs` files overriding the built-in templates
    #[serde(rename = "templates-dir")]
    pub templates_dir: Option<PathBuf>,

    /// How long a copy button shows "Copied"
    #[serde(rename = "copy-feedback-ms")]
    pub copy_feedback_ms: u64,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptboard")
        .join("storage")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            static_source: "data/prompts.json".to_string(),
            storage_dir: default_storage_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            templates_dir: None,
            copy_feedback_ms: crate::DEFAULT_COPY_FEEDBACK_MS,
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// `--config` path, then `./.promptboard.yml`, then
    /// `<config dir>/promptboard/promptboard.yml`, then defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from(".promptboard.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("promptboard").join("promptboard.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Log level from the config chain, read before logging is set up
    ///
    /// Errors are swallowed here; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|config| config.log_level)
    }

    /// Store over the configured static source and storage directory
    pub fn open_store(&self) -> Result<PromptStore> {
        debug!(source = %self.static_source, storage = ?self.storage_dir, "Config::open_store: called");
        let source = open_source(&self.static_source).context("Failed to open static source")?;
        let storage = FileStorage::open(&self.storage_dir)
            .context(format!("Failed to open storage at {}", self.storage_dir.display()))?;
        Ok(PromptStore::new(source, Arc::new(storage)).with_key(self.storage_key.clone()))
    }

    pub fn renderer(&self) -> Result<Renderer> {
        Ok(Renderer::with_templates_dir(self.templates_dir.as_deref())?.with_feedback_ms(self.copy_feedback_ms))
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.static_source, "data/prompts.json");
        assert_eq!(config.storage_key, "teacherPrompts");
        assert_eq!(config.copy_feedback_ms, 2000);
        assert!(config.storage_dir.ends_with("promptboard/storage"));
        assert!(config.templates_dir.is_none());
    }

    #[test]
    fn test_parse_kebab_keys() {
        let yaml = r#"
static-source: https://example.com/prompts.json
storage-key: otherPrompts
copy-feedback-ms: 500
log-level: DEBUG
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.static_source, "https://example.com/prompts.json");
        assert_eq!(config.storage_key, "otherPrompts");
        assert_eq!(config.copy_feedback(), Duration::from_millis(500));
        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));
        // Unset keys keep their defaults
        assert!(config.storage_dir.ends_with("promptboard/storage"));
    }

    #[test]
    fn test_explicit_path_errors_are_reported() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.yml");
        assert!(Config::load(Some(&missing)).is_err());

        let broken = temp.path().join("broken.yml");
        fs::write(&broken, "copy-feedback-ms: [not a number").unwrap();
        assert!(Config::load(Some(&broken)).is_err());
        assert!(Config::load_log_level(Some(&broken)).is_none());
    }

    #[test]
    fn test_open_store_uses_configured_key() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            static_source: temp.path().join("prompts.json").display().to_string(),
            storage_dir: temp.path().join("storage"),
            storage_key: "customKey".to_string(),
            ..Config::default()
        };
        let store = config.open_store().unwrap();
        assert_eq!(store.key(), "customKey");
        assert!(temp.path().join("storage").is_dir());
    }

    #[test]
    #[serial]
    fn test_project_local_config_is_found() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".promptboard.yml"), "storage-key: fromCwd\n").unwrap();

        let previous_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        let loaded = Config::load(None);
        std::env::set_current_dir(previous_dir).unwrap();

        assert_eq!(loaded.unwrap().storage_key, "fromCwd");
    }
}
