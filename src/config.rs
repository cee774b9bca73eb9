//! Scorer configuration.

use crate::llm_client::{LlmConfig, LlmProvider};
use crate::scoring::MatchDefaults;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the scorer: match defaults, the LLM, and the live feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Values used when a match setup leaves them out.
    defaults: MatchDefaults,

    /// LLM used for commentary and the live feed.
    llm: LlmSettings,

    /// Live feed polling.
    live: LiveSettings,
}

/// LLM settings. The API key always comes from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// LLM provider (openai or anthropic).
    provider: LlmProvider,

    /// Model name.
    model: String,

    /// Maximum tokens for responses.
    max_tokens: u32,

    /// Request timeout in seconds.
    timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 1024,
            timeout_secs: 60,
        }
    }
}

/// Live feed settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveSettings {
    /// Seconds between refreshes.
    refresh_secs: u64,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self { refresh_secs: 60 }
    }
}

impl ScorerConfig {
    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(provider = %config.llm.provider, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Interval between live feed refreshes (at least one second).
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.live.refresh_secs.max(1))
    }

    /// Creates LLM configuration with a key read by `lookup`.
    pub fn llm_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<LlmConfig, ConfigError> {
        let var = self.llm.provider.api_key_var();
        let api_key = lookup(var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::new(format!("{} environment variable not set", var)))?;
        Ok(LlmConfig::new(
            self.llm.provider,
            api_key,
            self.llm.model.clone(),
            self.llm.max_tokens,
        )
        .with_timeout(Duration::from_secs(self.llm.timeout_secs)))
    }

    /// Creates LLM configuration from the environment.
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY.
    #[instrument(skip(self), fields(provider = %self.llm.provider, model = %self.llm.model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        self.llm_config_with(|var| std::env::var(var).ok())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScorerConfig::default();
        assert_eq!(config.defaults().overs, 20);
        assert_eq!(config.defaults().player_count, 11);
        assert!(config.defaults().rules.forbid_consecutive_overs);
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert_eq!(*config.llm().provider(), LlmProvider::Anthropic);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ScorerConfig::from_toml_str(
            r#"
[defaults]
overs = 5

[defaults.rules]
forbid_consecutive_overs = false

[llm]
provider = "openai"
model = "gpt-4o-mini"
"#,
        )
        .unwrap();
        assert_eq!(config.defaults().overs, 5);
        assert_eq!(config.defaults().player_count, 11);
        assert!(!config.defaults().rules.forbid_consecutive_overs);
        assert_eq!(*config.llm().provider(), LlmProvider::OpenAI);
        assert_eq!(*config.llm().max_tokens(), 1024);
        assert_eq!(*config.live().refresh_secs(), 60);
    }

    #[test]
    fn test_api_key_lookup() {
        let config = ScorerConfig::default();
        let err = config.llm_config_with(|_| None).unwrap_err();
        assert!(err.message.contains("ANTHROPIC_API_KEY"));

        let llm = config
            .llm_config_with(|var| (var == "ANTHROPIC_API_KEY").then(|| "key".to_string()))
            .unwrap();
        assert_eq!(llm.api_key(), "key");
        assert_eq!(*llm.timeout(), Duration::from_secs(60));
    }
}
