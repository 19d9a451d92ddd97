//! Anthropic Claude LLM client implementation
//!
//! Enable with the `anthropic` feature flag. Synthesis needs a single
//! non-streaming messages call, so this wraps exactly that.

use crate::llm::client::{ChatMessage, LLMClient, MessageRole, MAX_TOKENS, TEMPERATURE};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use claude_sdk::{ClaudeClient, ContentBlock, Message, MessagesRequest};

pub struct AnthropicClient {
    client: ClaudeClient,
    model: String,
}

impl AnthropicClient {
    /// Create a new Anthropic client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `model` - Model identifier (e.g., "claude-3-5-sonnet-20241022")
    pub fn new(api_key: String, model: String) -> Self {
        let client = ClaudeClient::anthropic(api_key);
        Self { client, model }
    }

    /// Extract text content from Claude response content blocks.
    fn extract_text_content(content: &[ContentBlock]) -> String {
        content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Split a message list into Claude's separate system prompt and
    /// user-turn messages.
    fn build_request(&self, messages: &[ChatMessage]) -> MessagesRequest {
        let mut system_prompt: Option<String> = None;
        let claude_messages: Vec<Message> = messages
            .iter()
            .filter_map(|m| match m.role {
                MessageRole::System => {
                    system_prompt = Some(m.content.clone());
                    None
                }
                MessageRole::User => Some(Message::user(m.content.clone())),
            })
            .collect();

        let mut request = MessagesRequest::new(self.model.clone(), MAX_TOKENS, claude_messages)
            .with_temperature(TEMPERATURE);

        if let Some(system) = system_prompt {
            request = request.with_system(system);
        }

        request
    }
}

#[async_trait]
impl LLMClient for AnthropicClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = self.build_request(messages);

        let response = self
            .client
            .send_message(request)
            .await
            .map_err(|e| AppError::Provider(format!("Anthropic API error: {}", e)))?;

        Ok(Self::extract_text_content(&response.content))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AnthropicClient::new(
            "test-key".to_string(),
            "claude-3-5-sonnet-20241022".to_string(),
        );
        assert_eq!(client.model_name(), "claude-3-5-sonnet-20241022");
    }
}
