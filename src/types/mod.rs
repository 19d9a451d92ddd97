use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============= Research Evidence Types =============

/// A normalized unit of evidence returned by a source adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRecord {
    pub title: String,
    /// Free text; may be empty when the provider does not report authorship.
    pub authors: String,
    /// Display-formatted date, not necessarily ISO.
    pub date: String,
    /// Provider or display name.
    pub source: String,
    /// URL or the placeholder `#`.
    pub link: String,
    /// Provider-truncated free text.
    pub summary: String,
    pub kind: RecordKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    AcademicPaper,
    MarketReport,
    WebContent,
    CertificationData,
    NewsArticle,
    EconomicData,
}

/// Detected topic of a research query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Sustainability,
    Leasing,
    Market,
    General,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Sustainability => "sustainability",
            Topic::Leasing => "leasing",
            Topic::Market => "market",
            Topic::General => "general",
        }
    }
}

// ============= Session Progress Types =============

/// One step in a session's progress log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Progress state for one research session, read by status pollers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionProgress {
    pub events: Vec<ProgressEvent>,
    pub complete: bool,
}

// ============= Synthesis Types =============

/// Output of the synthesis pipeline: a markdown narrative with inline
/// bracket citations plus the citation list those brackets index into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizedResponse {
    pub response: String,
    pub citations: Vec<Citation>,
}

/// One citation, aligned by position with bracket numbers in the narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub authors: String,
    pub source: String,
    pub link: String,
    pub date: String,
}

impl From<&ResearchRecord> for Citation {
    fn from(record: &ResearchRecord) -> Self {
        Citation {
            title: record.title.clone(),
            authors: record.authors.clone(),
            source: record.source.clone(),
            link: record.link.clone(),
            date: record.date.clone(),
        }
    }
}

// ============= Document Context Types =============

/// Shape produced by the document-analysis collaborator. The core consumes
/// this as supplementary context; it never parses file formats itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContext {
    pub summary: String,
    pub topics: Vec<String>,
    pub word_count: usize,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or empty query/session id. Surfaced to the caller
    /// immediately; no session state is touched.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A model-provider credential is missing or the completion call
    /// failed. Fatal on the synthesis path only; data-provider failures
    /// degrade inside their adapter instead of constructing this.
    #[error("Provider unavailable: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_serialization() {
        let json = serde_json::to_string(&RecordKind::AcademicPaper).unwrap();
        assert_eq!(json, "\"academic_paper\"");

        let kind: RecordKind = serde_json::from_str("\"economic_data\"").unwrap();
        assert_eq!(kind, RecordKind::EconomicData);
    }

    #[test]
    fn test_topic_as_str() {
        assert_eq!(Topic::Sustainability.as_str(), "sustainability");
        assert_eq!(Topic::General.as_str(), "general");
    }

    #[test]
    fn test_citation_from_record() {
        let record = ResearchRecord {
            title: "Office Vacancy Outlook".to_string(),
            authors: "Smith, J.".to_string(),
            date: "2025".to_string(),
            source: "Market Watch".to_string(),
            link: "https://example.com/report".to_string(),
            summary: "A summary".to_string(),
            kind: RecordKind::MarketReport,
        };

        let citation = Citation::from(&record);
        assert_eq!(citation.title, "Office Vacancy Outlook");
        assert_eq!(citation.link, "https://example.com/report");
        // The summary is deliberately not part of a citation
    }

    #[test]
    fn test_session_progress_default() {
        let progress = SessionProgress::default();
        assert!(progress.events.is_empty());
        assert!(!progress.complete);
    }

    #[test]
    fn test_document_context_field_names() {
        let json = r#"{"summary":"A lease abstract","topics":["leasing"],"wordCount":420}"#;
        let ctx: DocumentContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.word_count, 420);
        assert_eq!(ctx.topics, vec!["leasing"]);
    }
}
