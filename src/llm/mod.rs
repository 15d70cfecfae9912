mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use openai::OpenAiProvider;

/// Result type for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Response parsing failed: {0}")]
    ParseError(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request for a chat completion
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System instructions placed ahead of the conversation
    pub system: String,
    /// Conversation so far, oldest first
    pub messages: Vec<ChatMessage>,
    /// Maximum response length in tokens
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

/// Response from an LLM provider
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub text: String,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    pub provider: String,
    pub model: String,
    /// Tokens consumed (if available)
    pub tokens_used: Option<u32>,
    pub latency_ms: u64,
}

/// Trait that all LLM providers must implement
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> LlmResult<ChatResponse>;

    /// Get the name of this provider
    fn name(&self) -> &str;
}

/// Configuration for the hosted model
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// OpenAI API key (None = assistant disabled)
    pub openai_api_key: Option<String>,
    /// Alternative API base, e.g. an Azure OpenAI deployment
    pub openai_base_url: Option<String>,
    pub openai_model: String,
    pub default_timeout: Duration,
    pub default_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: None,
            openai_model: "gpt-4o-mini".to_string(),
            default_timeout: Duration::from_secs(30),
            default_max_tokens: 400,
        }
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            openai_api_key: non_blank_env("OPENAI_API_KEY"),
            openai_base_url: non_blank_env("OPENAI_BASE_URL"),
            openai_model: non_blank_env("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            default_timeout: std::env::var("LLM_TIMEOUT")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.default_timeout),
            default_max_tokens: std::env::var("LLM_MAX_TOKENS")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.default_max_tokens),
        }
    }

    /// Build the configured provider
    pub fn build_provider(&self) -> LlmResult<Box<dyn LlmProvider>> {
        let api_key = self.openai_api_key.as_ref().ok_or_else(|| {
            LlmError::ConfigError("No LLM provider configured. Set OPENAI_API_KEY".to_string())
        })?;

        Ok(Box::new(OpenAiProvider::new(
            api_key.clone(),
            self.openai_base_url.clone(),
            self.openai_model.clone(),
        )))
    }
}
