//! LLM API client for OpenAI and Anthropic chat endpoints.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Chat endpoint for the provider.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::OpenAI => OPENAI_CHAT_URL,
            Self::Anthropic => ANTHROPIC_MESSAGES_URL,
        }
    }

    /// Environment variable holding the provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Configuration for LLM client.
#[derive(Clone, Getters, new)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    #[new(value = "Duration::from_secs(30)")]
    timeout: Duration,
}

impl LlmConfig {
    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builds the JSON body of a chat request.
pub fn request_body(config: &LlmConfig, system_prompt: &str, user_message: &str) -> Value {
    match config.provider {
        LlmProvider::Anthropic => json!({
            "model": config.model,
            "max_tokens": config.max_tokens,
            "system": system_prompt,
            "messages": [
                { "role": "user", "content": user_message }
            ]
        }),
        LlmProvider::OpenAI => json!({
            "model": config.model,
            "max_tokens": config.max_tokens,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_message }
            ]
        }),
    }
}

/// Pulls the generated text out of a chat response.
pub fn extract_text(provider: LlmProvider, response: &Value) -> Option<String> {
    let text = match provider {
        LlmProvider::Anthropic => response["content"][0]["text"].as_str(),
        LlmProvider::OpenAI => response["choices"][0]["message"]["content"].as_str(),
    };
    text.map(str::to_string)
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = %config.provider, model = %config.model))]
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::new(format!("Failed to build HTTP client: {}", e)))?;
        info!("Creating LLM client");
        Ok(Self { config, http })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generates a completion from a system prompt and user message.
    #[instrument(
        skip(self, system_prompt, user_message),
        fields(provider = %self.config.provider, model = %self.config.model)
    )]
    pub async fn generate(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
        let provider = self.config.provider;
        let body = request_body(&self.config, system_prompt, user_message);

        let request = self.http.post(provider.endpoint()).json(&body);
        let request = match provider {
            LlmProvider::Anthropic => request
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            LlmProvider::OpenAI => request.bearer_auth(&self.config.api_key),
        };

        debug!("Sending chat request");
        let response = request.send().await.map_err(|e| {
            error!(error = ?e, "LLM request failed");
            LlmError::new(format!("{} request failed: {}", provider, e))
        })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read LLM response");
            LlmError::new(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, response = %response_text, "LLM API error");
            return Err(LlmError::new(format!(
                "{} API error {}: {}",
                provider, status, response_text
            )));
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            error!(error = ?e, "Failed to parse LLM response");
            LlmError::new(format!("Failed to parse response: {}", e))
        })?;

        let content = extract_text(provider, &response_json).ok_or_else(|| {
            error!(response = %response_json, "No text content in LLM response");
            LlmError::new(format!("No text content in {} response", provider))
        })?;

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
