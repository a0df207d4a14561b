use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

use crate::paths;
use crate::translation::DEFAULT_SYSTEM_PROMPT;

/// Environment variable consulted for the API key when the config file does
/// not name its own.
pub const API_KEY_ENV: &str = "MDTL_API_KEY";

/// Immutable per-request configuration snapshot.
///
/// Constructed fresh for every translate-request and never mutated while a
/// session is in flight, so a config change mid-stream cannot tear a
/// session's behavior.
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// API root of the OpenAI-compatible endpoint (including `/v1`).
    pub api_endpoint: String,
    /// Bearer credential. Empty means "not configured".
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Target language code (free-form, e.g. `zh-CN`).
    pub target_language: String,
    /// System prompt template with a `{targetLanguage}` placeholder.
    pub system_prompt: String,
    /// Whether to translate automatically when a preview opens.
    pub auto_translate: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4".to_string(),
            target_language: "zh-CN".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            auto_translate: false,
        }
    }
}

/// Why a config snapshot was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API key is required")]
    MissingApiKey,
    #[error("API endpoint is required")]
    MissingEndpoint,
    #[error("Model name is required")]
    MissingModel,
    #[error("Invalid API endpoint URL")]
    InvalidEndpoint,
}

/// Validates a snapshot before any network call is attempted.
///
/// Checks run in a fixed order and the first failure wins: missing key,
/// missing endpoint, missing model, malformed endpoint URL.
pub fn validate_config(config: &TranslationConfig) -> Result<(), ConfigError> {
    if config.api_key.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    if config.api_endpoint.is_empty() {
        return Err(ConfigError::MissingEndpoint);
    }
    if config.model.is_empty() {
        return Err(ConfigError::MissingModel);
    }
    if Url::parse(&config.api_endpoint).is_err() {
        return Err(ConfigError::InvalidEndpoint);
    }
    Ok(())
}

/// The `[mdtl]` section of config.toml. Every field is optional; anything
/// unset falls back to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MdtlConfig {
    pub api_endpoint: Option<String>,
    pub model: Option<String>,
    pub target_language: Option<String>,
    pub system_prompt: Option<String>,
    pub auto_translate: Option<bool>,
    /// API key stored directly in config (not recommended).
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/mdtl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub mdtl: MdtlConfig,
}

impl ConfigFile {
    /// Resolves the API key: a config-named environment variable first, then
    /// `MDTL_API_KEY`, then the key stored in the file.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.mdtl.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.mdtl.api_key.clone()
    }
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Target language code override.
    pub to: Option<String>,
    /// API endpoint override.
    pub endpoint: Option<String>,
    /// Model name override.
    pub model: Option<String>,
}

/// Builds a per-request snapshot: CLI options over config file over
/// built-in defaults.
///
/// Resolution never fails; a missing credential is caught later by
/// [`validate_config`], which keeps the validation order of the error
/// contract intact.
pub fn resolve_config(options: &ResolveOptions, file: &ConfigFile) -> TranslationConfig {
    let defaults = TranslationConfig::default();

    TranslationConfig {
        api_endpoint: options
            .endpoint
            .clone()
            .or_else(|| file.mdtl.api_endpoint.clone())
            .unwrap_or(defaults.api_endpoint),
        api_key: file.resolve_api_key().unwrap_or_default(),
        model: options
            .model
            .clone()
            .or_else(|| file.mdtl.model.clone())
            .unwrap_or(defaults.model),
        target_language: options
            .to
            .clone()
            .or_else(|| file.mdtl.target_language.clone())
            .unwrap_or(defaults.target_language),
        system_prompt: file
            .mdtl
            .system_prompt
            .clone()
            .unwrap_or(defaults.system_prompt),
        auto_translate: file.mdtl.auto_translate.unwrap_or(defaults.auto_translate),
    }
}

/// Manages loading and saving the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/mdtl/config.toml`
    /// or `~/.config/mdtl/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    pub fn load_or_default(&self) -> ConfigFile {
        self.load().unwrap_or_default()
    }
}
