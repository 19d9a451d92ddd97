//! Research orchestration core
//!
//! The pipeline behind every research request: categorize the query,
//! fan out to source adapters, aggregate the evidence, synthesize a
//! cited narrative.

pub mod categorizer;
pub mod citations;
pub mod orchestrator;
pub mod synthesis;

pub use categorizer::categorize;
pub use citations::{format_citation, format_citation_list};
pub use orchestrator::ResearchOrchestrator;
pub use synthesis::Synthesizer;
