//! Deterministic offline provider
//!
//! Used when no hosted-model credentials are configured. Emits a fixed
//! markdown template that echoes the research question from the prompt, so
//! the whole pipeline (fan-out, aggregation, citation projection) can run
//! and be tested without network access or credentials.

use crate::llm::client::{ChatMessage, LLMClient, MessageRole};
use crate::types::Result;
use async_trait::async_trait;

/// Prefix the synthesis prompt puts in front of the original query; the
/// offline template echoes whatever follows it.
const QUESTION_PREFIX: &str = "Research question: ";

#[derive(Default)]
pub struct OfflineClient;

impl OfflineClient {
    pub fn new() -> Self {
        Self
    }

    fn extract_question(messages: &[ChatMessage]) -> &str {
        messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .and_then(|m| {
                m.content
                    .lines()
                    .find_map(|line| line.strip_prefix(QUESTION_PREFIX))
            })
            .unwrap_or("the submitted query")
            .trim()
    }
}

#[async_trait]
impl LLMClient for OfflineClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let question = Self::extract_question(messages);

        Ok(format!(
            "## Executive Summary\n\n\
             This briefing addresses: {question}. No hosted language model is \
             configured, so the narrative below frames the evidence gathered for \
             this request rather than interpreting it [1].\n\n\
             ## Key Evidence\n\n\
             The aggregated records accompanying this response contain the most \
             relevant material found across the configured data sources [1]. \
             Consult each citation for provenance and retrieval details.\n\n\
             ## Sources\n\n\
             See the numbered citation list attached to this response.\n"
        ))
    }

    fn model_name(&self) -> &str {
        "offline-synthesis"
    }
}
