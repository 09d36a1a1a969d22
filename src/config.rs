//! Configuration for redator
//!
//! YAML with every section optional. Lookup order: `--config` path,
//! `~/.config/redator/redator.yml`, `./redator.yml`, then built-in defaults.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::format::DocumentLayout;
use crate::llm::OpenRouterConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub document: DocumentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub cookie_name: String,
    /// Adds `Secure` to the session cookie; enable behind TLS
    pub cookie_secure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            cookie_name: "session".to_string(),
            cookie_secure: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub verify_model: String,
    pub consolidate_model: String,
    pub api_key_env: String,
    pub app_title: String,
    pub referer: Option<String>,
    /// Unset means no application-level timeout
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            verify_model: "google/gemini-2.0-flash-001".to_string(),
            consolidate_model: "google/gemini-pro".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            app_title: "Ciência Pedagogia".to_string(),
            referer: None,
            timeout_ms: None,
        }
    }
}

impl LlmConfig {
    pub fn openrouter(&self) -> OpenRouterConfig {
        OpenRouterConfig {
            base_url: self.base_url.clone(),
            app_title: self.app_title.clone(),
            referer: self.referer.clone(),
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("redator"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub secret_env: String,
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret_env: "REDATOR_SESSION_SECRET".to_string(),
            ttl_secs: 60 * 60 * 24 * 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Title used when a topic's title is blank
    pub title_fallback: String,
    pub subtitle: String,
    pub closing: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        let layout = DocumentLayout::default();
        Self {
            title_fallback: "Artigo".to_string(),
            subtitle: layout.subtitle,
            closing: layout.closing,
        }
    }
}

impl DocumentConfig {
    pub fn layout(&self) -> DocumentLayout {
        DocumentLayout {
            subtitle: self.subtitle.clone(),
            closing: self.closing.clone(),
        }
    }

    /// Document title for a topic title
    pub fn title_for<'a>(&'a self, topic_title: &'a str) -> &'a str {
        if topic_title.trim().is_empty() {
            &self.title_fallback
        } else {
            topic_title
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            storage: StorageConfig::default(),
            session: SessionConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
