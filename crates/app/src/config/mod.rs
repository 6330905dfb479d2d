use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use llmsh_llm::{LlmError, ProviderConfig};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Everything read from `config.toml`, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmshConfig {
    pub llm: LlmConfig,
    pub prediction: PredictionConfig,
    pub cache: CacheConfig,
    pub tracking: TrackingConfig,
    pub zsh: ZshConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub default_provider: String,
    pub providers: BTreeMap<String, ProviderConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub history_length: usize,
    pub min_prefix_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub db_path: PathBuf,
    pub ttl_days: u32,
    pub max_entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub enabled: bool,
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZshConfig {
    pub keybindings: BTreeMap<String, String>,
}

impl Default for LlmshConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            prediction: PredictionConfig::default(),
            cache: CacheConfig::default(),
            tracking: TrackingConfig::default(),
            zsh: ZshConfig {
                keybindings: BTreeMap::from([
                    ("accept_prediction".to_string(), "^I".to_string()),
                    ("nl2cmd".to_string(), "^[^M".to_string()),
                ]),
            },
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        let providers = BTreeMap::from([
            (
                "openai".to_string(),
                ProviderConfig {
                    base_url: "https://api.openai.com/v1".to_string(),
                    api_key: "${OPENAI_API_KEY}".to_string(),
                    model: "gpt-4-turbo-preview".to_string(),
                    max_tokens: 100,
                    temperature: 0.2,
                },
            ),
            (
                "local".to_string(),
                ProviderConfig {
                    base_url: "http://localhost:11434/v1".to_string(),
                    api_key: String::new(),
                    model: "codellama:7b".to_string(),
                    max_tokens: 100,
                    temperature: 0.2,
                },
            ),
        ]);
        Self {
            default_provider: "openai".to_string(),
            providers,
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            history_length: 20,
            min_prefix_length: 3,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            db_path: PathBuf::from("~/.llmsh/cache.db"),
            ttl_days: 7,
            max_entries: 1000,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            db_path: PathBuf::from("~/.llmsh/tokens.json"),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::days(i64::from(self.ttl_days))
    }
}

impl LlmshConfig {
    /// Reads, overrides from `LLMSH_*` variables, and expands `config.toml`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "config file not found at {}. Run 'llmsh config init' to create one",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("read config {}: {}", path.display(), err)))?;
        let mut config = Self::from_toml(&contents)?;
        let lookup = |name: &str| std::env::var(name).ok();
        config.apply_env_overrides(lookup)?;
        config.expand(lookup);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| AppError::Config(format!("parse config: {}", err)))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| AppError::Config(format!("serialize config: {}", err)))
    }

    /// Applies the environment overrides the plugin documents:
    /// `LLMSH_LLM_DEFAULT_PROVIDER`, `LLMSH_CACHE_ENABLED`, `LLMSH_TRACKING_ENABLED`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("LLMSH_LLM_DEFAULT_PROVIDER")
            && !provider.is_empty()
        {
            self.llm.default_provider = provider;
        }
        if let Some(value) = lookup("LLMSH_CACHE_ENABLED") {
            self.cache.enabled = parse_flag("LLMSH_CACHE_ENABLED", &value)?;
        }
        if let Some(value) = lookup("LLMSH_TRACKING_ENABLED") {
            self.tracking.enabled = parse_flag("LLMSH_TRACKING_ENABLED", &value)?;
        }
        Ok(())
    }

    /// Expands `~` in storage paths and `${VAR}` references in API keys.
    /// Unset variables expand to an empty string.
    pub fn expand<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.cache.db_path = expand_path(&self.cache.db_path);
        self.tracking.db_path = expand_path(&self.tracking.db_path);
        for provider in self.llm.providers.values_mut() {
            provider.api_key = shellexpand::env_with_context_no_errors(&provider.api_key, |name| {
                Some(lookup(name).unwrap_or_default())
            })
            .into_owned();
        }
    }

    pub fn default_provider(&self) -> Result<(&str, &ProviderConfig)> {
        let name = self.llm.default_provider.as_str();
        self.llm
            .providers
            .get(name)
            .map(|provider| (name, provider))
            .ok_or_else(|| {
                AppError::Llm(LlmError::Provider(format!(
                    "provider {} not found in config",
                    name
                )))
            })
    }
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Config(format!(
            "invalid boolean for {}: {}",
            name, other
        ))),
    }
}
