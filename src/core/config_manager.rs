// src/core/config_manager.rs
//! Layered configuration: built-in defaults, then `config.yaml`, then environment variables

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub extraction_model: String,
    pub analysis_model: String,
    pub generation_model: String,
    pub extraction_temperature: f32,
    pub request_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            extraction_model: "gpt-4o".to_string(),
            analysis_model: "gpt-4o-mini".to_string(),
            generation_model: "gpt-4o".to_string(),
            extraction_temperature: 0.2,
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub user_agent: String,
    pub navigation_timeout_secs: u64,
    pub selector_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            navigation_timeout_secs: 60,
            selector_timeout_secs: 30,
        }
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub job_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            job_ttl_secs: 24 * 60 * 60,
        }
    }
}

impl CacheConfig {
    pub fn job_ttl(&self) -> Duration {
        Duration::from_secs(self.job_ttl_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigManager {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub browser: BrowserConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<ConfigManager>,
    #[serde(default)]
    production: Option<ConfigManager>,
}

impl ConfigManager {
    /// Load all configuration layers for the current environment
    pub fn load() -> Result<Self> {
        let environment = Self::environment_name();
        info!("Loading configuration for environment: {}", environment);

        let mut config = Self::from_file(Path::new(CONFIG_FILE), &environment)?.unwrap_or_default();
        config.apply_overrides(|key| std::env::var(key).ok())?;

        info!(
            "Model API: {} (key configured: {})",
            config.model.api_url,
            config.model_configured()
        );
        Ok(config)
    }

    fn environment_name() -> String {
        std::env::var("CVTAILOR_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Read the section for `environment` from a YAML file. A missing file is not an error.
    pub fn from_file(path: &Path, environment: &str) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_yaml(&content, environment).map(Some)
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };

        Ok(section.unwrap_or_default())
    }

    /// Apply environment overrides. `lookup` returns the raw value of a variable; blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            self.model.api_key = Some(key);
        }
        if let Some(url) = get("OPENAI_API_URL") {
            self.model.api_url = url;
        }
        if let Some(model) = get("EXTRACTION_MODEL") {
            self.model.extraction_model = model;
        }
        if let Some(model) = get("ANALYSIS_MODEL") {
            self.model.analysis_model = model;
        }
        if let Some(model) = get("GENERATION_MODEL") {
            self.model.generation_model = model;
        }
        if let Some(port) = get("PORT").or_else(|| get("ROCKET_PORT")) {
            self.server.port = port
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", port))?;
        }
        if let Some(value) = get("JOB_CACHE_TTL_SECS") {
            self.cache.job_ttl_secs = parse_secs("JOB_CACHE_TTL_SECS", &value)?;
        }
        if let Some(value) = get("NAVIGATION_TIMEOUT_SECS") {
            self.browser.navigation_timeout_secs = parse_secs("NAVIGATION_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = get("SELECTOR_TIMEOUT_SECS") {
            self.browser.selector_timeout_secs = parse_secs("SELECTOR_TIMEOUT_SECS", &value)?;
        }

        Ok(())
    }

    pub fn model_configured(&self) -> bool {
        self.model
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .with_context(|| format!("{} must be a whole number of seconds, got '{}'", name, value))
}
