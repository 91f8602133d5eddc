use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Path of the persistent translation cache file
    #[serde(default = "default_cache_path")]
    pub cache_path: String,

    /// Field separator for delimited text input/output
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Literal prefixes whose fragments pass through untranslated
    #[serde(default = "default_passthrough_prefixes")]
    pub passthrough_prefixes: Vec<String>,

    /// Translation service and retry settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Service endpoint override; empty uses the default public endpoint
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Attempt budget per fragment, including the first call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts, in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Substring identifying a fatal quota-exhausted provider error
    #[serde(default = "default_quota_signature")]
    pub quota_signature: String,

    /// Max concurrent in-flight translation requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
            quota_signature: default_quota_signature(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Normal progress output
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            cache_path: default_cache_path(),
            delimiter: default_delimiter(),
            passthrough_prefixes: default_passthrough_prefixes(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;
        Ok(config)
    }

    /// Validate the configuration after loading and CLI overrides.
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("source_language must not be empty"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("target_language must not be empty"));
        }
        if self.source_language == self.target_language {
            return Err(anyhow!(
                "source_language and target_language must differ (both are '{}')",
                self.source_language
            ));
        }
        if self.cache_path.trim().is_empty() {
            return Err(anyhow!("cache_path must not be empty"));
        }
        if self.translation.max_attempts == 0 {
            return Err(anyhow!("translation.max_attempts must be at least 1"));
        }
        if self.translation.concurrent_requests == 0 {
            return Err(anyhow!("translation.concurrent_requests must be at least 1"));
        }
        if !self.delimiter.is_ascii() {
            return Err(anyhow!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ));
        }
        Ok(())
    }
}

fn default_source_language() -> String {
    "es".to_string()
}

fn default_target_language() -> String {
    "pt".to_string()
}

fn default_cache_path() -> String {
    "translation_cache.json".to_string()
}

fn default_delimiter() -> char {
    ';'
}

fn default_passthrough_prefixes() -> Vec<String> {
    vec!["Image".to_string()]
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_quota_signature() -> String {
    "AVAILABLE FREE TRANSLATIONS".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}
