use crate::types::{AppError, Result};
use crate::utils::config::Config;
use async_trait::async_trait;

/// Sampling temperature applied to every synthesis call.
pub(crate) const TEMPERATURE: f32 = 0.3;
/// Completion budget applied to every synthesis call.
pub(crate) const MAX_TOKENS: u32 = 1500;

/// Role of a chat message sent to a model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
}

/// One role/content pair in a completion request.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Generic LLM client trait for provider abstraction.
///
/// All providers implement this trait, allowing the synthesis pipeline to
/// swap providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Run one completion over an ordered message list.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection.
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI chat-completions API (including compatible endpoints).
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
    },

    /// Anthropic Claude messages API.
    Anthropic { api_key: String, model: String },

    /// Deterministic offline provider; no credentials, no network.
    Offline,
}

impl Provider {
    /// Resolve the provider from configuration.
    ///
    /// An explicit `CRANE_LLM_PROVIDER` wins; otherwise the first
    /// configured credential (OpenAI, then Anthropic); otherwise the
    /// offline provider, so an unconfigured install still answers.
    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = &config.llm;
        match llm.provider.as_deref() {
            Some("openai") => {
                let api_key = llm.openai_api_key.clone().ok_or_else(|| {
                    AppError::Provider("OPENAI_API_KEY is not set".to_string())
                })?;
                Ok(Provider::OpenAI {
                    api_key,
                    api_base: llm.openai_api_base.clone(),
                    model: llm.openai_model.clone(),
                })
            }
            Some("anthropic") => {
                let api_key = llm.anthropic_api_key.clone().ok_or_else(|| {
                    AppError::Provider("ANTHROPIC_API_KEY is not set".to_string())
                })?;
                Ok(Provider::Anthropic {
                    api_key,
                    model: llm.anthropic_model.clone(),
                })
            }
            Some("offline") => Ok(Provider::Offline),
            Some(other) => Err(AppError::Provider(format!(
                "Unknown LLM provider '{}' (expected openai, anthropic, or offline)",
                other
            ))),
            None => {
                if let Some(api_key) = llm.openai_api_key.clone() {
                    Ok(Provider::OpenAI {
                        api_key,
                        api_base: llm.openai_api_base.clone(),
                        model: llm.openai_model.clone(),
                    })
                } else if let Some(api_key) = llm.anthropic_api_key.clone() {
                    Ok(Provider::Anthropic {
                        api_key,
                        model: llm.anthropic_model.clone(),
                    })
                } else {
                    tracing::info!("no LLM credentials configured, using offline provider");
                    Ok(Provider::Offline)
                }
            }
        }
    }

    /// Create a client instance for this provider.
    pub fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
            } => Ok(Box::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
            ))),

            #[cfg(not(feature = "openai"))]
            Provider::OpenAI { .. } => Err(AppError::Provider(
                "OpenAI support is not compiled in (enable the `openai` feature)".to_string(),
            )),

            #[cfg(feature = "anthropic")]
            Provider::Anthropic { api_key, model } => Ok(Box::new(
                super::anthropic::AnthropicClient::new(api_key.clone(), model.clone()),
            )),

            #[cfg(not(feature = "anthropic"))]
            Provider::Anthropic { .. } => Err(AppError::Provider(
                "Anthropic support is not compiled in (enable the `anthropic` feature)".to_string(),
            )),

            Provider::Offline => Ok(Box::new(super::offline::OfflineClient::new())),
        }
    }

    /// Get a human-readable name for this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Anthropic { .. } => "Anthropic",
            Provider::Offline => "Offline",
        }
    }
}
