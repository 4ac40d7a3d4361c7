use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO 639-1) for translation
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Language code used when reading summaries aloud
    #[serde(default = "default_speech_language")]
    pub speech_language: String,

    /// UI theme preference, persisted across sessions
    #[serde(default)]
    pub theme: UiTheme,

    /// Content extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Speech synthesis settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Assistant (summarize/translate) settings
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// UI theme preference
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UiTheme {
    #[default]
    Light,
    Dark,
}

/// Assistant provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssistantProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Ollama (local LLM)
    Ollama,
}

impl AssistantProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for AssistantProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for AssistantProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: AssistantProvider) -> Self {
        match provider_type {
            AssistantProvider::Gemini => Self {
                provider_type: "gemini".to_string(),
                model: default_gemini_model(),
                api_key: String::new(),
                endpoint: default_gemini_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            AssistantProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Assistant service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AssistantConfig {
    /// Assistant provider to use
    #[serde(default)]
    pub provider: AssistantProvider,

    /// Available assistant providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common assistant settings
    #[serde(default)]
    pub common: AssistantCommonConfig,
}

/// Common assistant settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AssistantCommonConfig {
    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds, doubled on each retry)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AssistantCommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Configuration for page content extraction
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Maximum extracted body length in characters; longer pages are
    /// truncated with a marker
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Timeout in seconds when fetching a page over HTTP
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
            page_timeout_secs: default_page_timeout_secs(),
        }
    }
}

/// Configuration for speech synthesis
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    /// How long to wait for the voice catalog to populate, in milliseconds
    #[serde(default = "default_voice_wait_timeout_ms")]
    pub voice_wait_timeout_ms: u64,

    /// How many times to retry the catalog wait before giving up
    #[serde(default = "default_voice_wait_retries")]
    pub voice_wait_retries: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice_wait_timeout_ms: default_voice_wait_timeout_ms(),
            voice_wait_retries: default_voice_wait_retries(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_target_language() -> String {
    language_utils::DEFAULT_LANGUAGE_CODE.to_string()
}

fn default_speech_language() -> String {
    language_utils::DEFAULT_LANGUAGE_CODE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_content_chars() -> usize {
    15_000
}

fn default_page_timeout_secs() -> u64 {
    20
}

fn default_voice_wait_timeout_ms() -> u64 {
    3000
}

fn default_voice_wait_retries() -> u32 {
    1
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash-preview-04-17".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration from a file, creating a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Config::default();
            config.save(path.as_ref())?;
            Ok(config)
        }
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Target and speech languages must come from the supported catalog
        let _target_name = language_utils::language_display_name(&self.target_language)?;
        let _speech_name = language_utils::language_display_name(&self.speech_language)?;

        if self.extraction.max_content_chars == 0 {
            return Err(anyhow!("max_content_chars must be greater than zero"));
        }

        // Validate API key for providers that require one
        if self.assistant.provider == AssistantProvider::Gemini
            && self.assistant.get_api_key().is_empty()
        {
            return Err(anyhow!("An API key is required for the Gemini provider"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            speech_language: default_speech_language(),
            theme: UiTheme::default(),
            extraction: ExtractionConfig::default(),
            speech: SpeechConfig::default(),
            assistant: AssistantConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl AssistantConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            AssistantProvider::Gemini => default_gemini_model(),
            AssistantProvider::Ollama => default_ollama_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        // Ollama doesn't use API keys
        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            AssistantProvider::Gemini => default_gemini_endpoint(),
            AssistantProvider::Ollama => default_ollama_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        default_timeout_secs()
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: AssistantProvider::default(),
            available_providers: Vec::new(),
            common: AssistantCommonConfig::default(),
        };

        // Add default providers
        config.available_providers.push(ProviderConfig::new(AssistantProvider::Gemini));
        config.available_providers.push(ProviderConfig::new(AssistantProvider::Ollama));

        config
    }
}
