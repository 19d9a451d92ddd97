//! # C.R.A.N.E - Commercial Real-estate Aggregation & Narrative Engine
//!
//! A query-routing research aggregator: given a free-text commercial
//! real-estate question, C.R.A.N.E classifies its intent, fans out to a
//! set of external data sources, merges their evidence, and synthesizes a
//! cited markdown briefing with a language model.
//!
//! ## Overview
//!
//! C.R.A.N.E can be used in two ways:
//!
//! 1. **As a standalone CLI** - Run the `crane-research` binary
//! 2. **As a library** - Drive [`ResearchOrchestrator`] from your own code
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use crane::{Config, ResearchOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let orchestrator = ResearchOrchestrator::from_config(&config)?;
//!
//!     let answer = orchestrator
//!         .run_research("office vacancy rate forecast", "session-1", None)
//!         .await?;
//!     println!("{}", answer.response);
//!
//!     // Progress can be polled concurrently while a request runs
//!     let progress = orchestrator.status("session-1");
//!     assert!(progress.complete);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! A request flows: orchestrator → categorizer (pick topic) → the
//! selected topical adapters plus the always-run fallback adapter
//! (concurrent, each with a fixed budget) → order-preserving aggregation →
//! synthesis. Every step appends to the session progress log, which a
//! status poller can read while the request executes.
//!
//! Adapters never fail a request: provider errors degrade the record set
//! and surface as warnings. Only request validation and the model call
//! itself can fail a research run.
//!
//! ## Modules
//!
//! - [`research`] - Categorizer, orchestrator, synthesis, citations
//! - [`sources`] - Topical source adapters and the fallback adapter
//! - [`session`] - Session progress store
//! - [`llm`] - Model provider clients and abstractions
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration

/// Model provider clients and abstractions.
pub mod llm;
/// Research orchestration: categorizer, orchestrator, synthesis, citations.
pub mod research;
/// Session progress tracking.
pub mod session;
/// Source adapters wrapping the external data providers.
pub mod sources;
/// Core types (records, progress, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::{ChatMessage, LLMClient, Provider};
pub use research::{categorize, format_citation_list, ResearchOrchestrator, Synthesizer};
pub use session::{InMemorySessionStore, SessionStore};
pub use sources::{AdapterOutcome, SourceAdapter};
pub use types::{
    AppError, Citation, DocumentContext, RecordKind, ResearchRecord, Result, SessionProgress,
    SynthesizedResponse, Topic,
};
pub use utils::config::Config;
