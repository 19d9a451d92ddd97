//! Source adapters
//!
//! Each adapter wraps one topical cluster of external data providers and
//! normalizes whatever comes back into [`ResearchRecord`]s. Adapters never
//! error past their own boundary: a failed provider shrinks the record set
//! and is reported as a warning on a [`AdapterOutcome::Degraded`] outcome,
//! and an adapter that ends up with nothing returns a single synthetic
//! general-information record so synthesis always has minimal context.

use crate::types::{RecordKind, ResearchRecord, Topic};
use async_trait::async_trait;
use chrono::Utc;

pub mod economic;
pub mod fallback;
pub mod leasing;
pub mod market;
pub mod news;
pub mod sustainability;

pub use fallback::FallbackAdapter;
pub use leasing::LeasingAdapter;
pub use market::MarketAdapter;
pub use sustainability::SustainabilityAdapter;

/// A primary provider that returns fewer records than this triggers the
/// adapter's secondary provider.
pub(crate) const MIN_RESULTS: usize = 3;

/// Result of one adapter run.
///
/// `Degraded` carries the records that could still be gathered plus one
/// warning per failed provider call, so the orchestrator can surface
/// partial data loss in observability output without changing control
/// flow.
#[derive(Debug, Clone)]
pub enum AdapterOutcome {
    Ok(Vec<ResearchRecord>),
    Degraded(Vec<ResearchRecord>, Vec<String>),
}

impl AdapterOutcome {
    /// Build an outcome from gathered records and accumulated warnings.
    pub fn from_parts(records: Vec<ResearchRecord>, warnings: Vec<String>) -> Self {
        if warnings.is_empty() {
            AdapterOutcome::Ok(records)
        } else {
            AdapterOutcome::Degraded(records, warnings)
        }
    }

    pub fn records(&self) -> &[ResearchRecord] {
        match self {
            AdapterOutcome::Ok(records) => records,
            AdapterOutcome::Degraded(records, _) => records,
        }
    }

    pub fn into_records(self) -> Vec<ResearchRecord> {
        match self {
            AdapterOutcome::Ok(records) => records,
            AdapterOutcome::Degraded(records, _) => records,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            AdapterOutcome::Ok(_) => &[],
            AdapterOutcome::Degraded(_, warnings) => warnings,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AdapterOutcome::Degraded(..))
    }
}

/// Base trait for all source adapters.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Display name used in progress events and warnings.
    fn name(&self) -> &str;

    /// Topic this adapter serves; `None` means it runs for every query
    /// (the fallback adapter).
    fn topic(&self) -> Option<Topic>;

    /// Gather evidence for the query. Never errors: provider failures
    /// degrade the outcome instead.
    async fn get_research(&self, query: &str, session_id: &str) -> AdapterOutcome;
}

/// Synthetic record returned when an adapter's providers all came back
/// empty, so the synthesis step is never starved of context.
pub(crate) fn general_information_record(source: &str, query: &str) -> ResearchRecord {
    ResearchRecord {
        title: format!("General commercial real estate context for \"{}\"", query),
        authors: String::new(),
        date: Utc::now().format("%B %Y").to_string(),
        source: source.to_string(),
        link: "#".to_string(),
        summary: format!(
            "No provider results were available for \"{}\". This entry stands in \
             as general background so the synthesized answer can still frame the \
             question within current commercial real estate practice.",
            query
        ),
        kind: RecordKind::WebContent,
    }
}

/// Truncate provider text to a display length without splitting a
/// character.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Strip HTML tags from provider snippets (Wikipedia wraps matched terms
/// in `<span>`s).
pub(crate) fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_parts() {
        let ok = AdapterOutcome::from_parts(vec![], vec![]);
        assert!(!ok.is_degraded());

        let degraded = AdapterOutcome::from_parts(vec![], vec!["arXiv search failed".to_string()]);
        assert!(degraded.is_degraded());
        assert_eq!(degraded.warnings().len(), 1);
    }

    #[test]
    fn test_general_information_record_shape() {
        let record = general_information_record("Sustainability Research", "LEED trends");
        assert_eq!(record.kind, RecordKind::WebContent);
        assert_eq!(record.link, "#");
        assert!(record.title.contains("LEED trends"));
        assert!(record.authors.is_empty());
    }

    #[test]
    fn test_truncate_preserves_short_text() {
        assert_eq!(truncate("short", 10), "short");
        assert!(truncate(&"x".repeat(50), 10).ends_with("..."));
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("office <span class=\"hit\">vacancy</span> rates"),
            "office vacancy rates"
        );
        assert_eq!(strip_tags("no markup"), "no markup");
    }
}
