//! LLM Provider Clients and Abstractions
//!
//! A unified interface over the model providers that back the synthesis
//! pipeline. Synthesis makes exactly one synchronous chat-completion call
//! per research request, so the surface is deliberately small: a message
//! list in, markdown text out.
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `openai` - OpenAI chat-completions API (and compatible endpoints)
//! - `anthropic` - Anthropic Claude messages API
//!
//! The deterministic offline provider is always available and is selected
//! automatically when no provider credentials are configured, so the
//! system can run end-to-end without network access to a model.

/// Core LLM client trait, provider enum, and factory.
pub mod client;
/// Deterministic offline provider for credential-less operation.
pub mod offline;

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{ChatMessage, LLMClient, MessageRole, Provider};
pub use offline::OfflineClient;
