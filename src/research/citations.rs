//! Standalone citation formatting
//!
//! Used by the report-generation path, which wants display-ready citation
//! strings rather than the structured list the live chat path returns.
//! The rendering varies by record kind.

use crate::types::{RecordKind, ResearchRecord};
use chrono::Utc;

/// Render one record as a display citation.
pub fn format_citation(record: &ResearchRecord) -> String {
    match record.kind {
        RecordKind::AcademicPaper => format!(
            "{} ({}). \"{}\". {}. Available at: {}",
            record.authors, record.date, record.title, record.source, record.link
        ),
        // Reports and certification data carry no meaningful authorship
        RecordKind::MarketReport | RecordKind::CertificationData => format!(
            "({}). \"{}\". {}. Available at: {}",
            record.date, record.title, record.source, record.link
        ),
        RecordKind::WebContent => format!(
            "\"{}\". {}. Available at: {}. Retrieved {}",
            record.title,
            record.source,
            record.link,
            Utc::now().format("%d %B %Y")
        ),
        _ => format!(
            "{}. \"{}\". {}. {}. {}",
            record.authors, record.title, record.source, record.date, record.link
        ),
    }
}

/// Render a record list as numbered display citations, preserving order.
pub fn format_citation_list(records: &[ResearchRecord]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("[{}] {}", i + 1, format_citation(record)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: RecordKind) -> ResearchRecord {
        ResearchRecord {
            title: "Title".to_string(),
            authors: "Doe, J.".to_string(),
            date: "2025".to_string(),
            source: "Source".to_string(),
            link: "https://example.com".to_string(),
            summary: String::new(),
            kind,
        }
    }

    #[test]
    fn test_academic_paper_citation() {
        let citation = format_citation(&record(RecordKind::AcademicPaper));
        assert_eq!(
            citation,
            "Doe, J. (2025). \"Title\". Source. Available at: https://example.com"
        );
    }

    #[test]
    fn test_market_report_omits_authors() {
        let citation = format_citation(&record(RecordKind::MarketReport));
        assert!(!citation.contains("Doe, J."));
        assert!(citation.starts_with("(2025)."));
    }

    #[test]
    fn test_certification_data_omits_authors() {
        let citation = format_citation(&record(RecordKind::CertificationData));
        assert!(!citation.contains("Doe, J."));
    }

    #[test]
    fn test_web_content_appends_retrieval_date() {
        let citation = format_citation(&record(RecordKind::WebContent));
        assert!(citation.contains("Retrieved "));
    }

    #[test]
    fn test_other_kinds_use_generic_pattern() {
        let citation = format_citation(&record(RecordKind::NewsArticle));
        assert_eq!(
            citation,
            "Doe, J.. \"Title\". Source. 2025. https://example.com"
        );
    }

    #[test]
    fn test_list_is_numbered_in_order() {
        let records = vec![
            record(RecordKind::AcademicPaper),
            record(RecordKind::NewsArticle),
        ];
        let list = format_citation_list(&records);
        assert_eq!(list.len(), 2);
        assert!(list[0].starts_with("[1] "));
        assert!(list[1].starts_with("[2] "));
    }
}
