//! Sustainability source adapter
//!
//! Primary: arXiv's Atom search API, constrained toward sustainability and
//! the built environment. Secondary: a green-building certification
//! registry that reports rating-system activity (LEED, BREEAM and
//! friends).

use crate::session::SessionStore;
use crate::sources::{
    general_information_record, truncate, AdapterOutcome, SourceAdapter, MIN_RESULTS,
};
use crate::types::{AppError, RecordKind, ResearchRecord, Result, Topic};
use async_trait::async_trait;
use std::sync::Arc;

const DISPLAY_NAME: &str = "Sustainability Research";
const ARXIV_MAX_RESULTS: usize = 5;

pub struct SustainabilityAdapter {
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
    arxiv_url: String,
    certification_url: String,
}

impl SustainabilityAdapter {
    pub fn new(
        http: reqwest::Client,
        store: Arc<dyn SessionStore>,
        arxiv_url: String,
        certification_url: String,
    ) -> Self {
        Self {
            http,
            store,
            arxiv_url,
            certification_url,
        }
    }

    /// Search arXiv for papers around the query, biased toward
    /// sustainability topics. arXiv speaks Atom, which `feed-rs` parses.
    async fn search_papers(&self, query: &str) -> Result<Vec<ResearchRecord>> {
        let search_query = format!("all:\"{} sustainability buildings\"", query);
        let max_results = ARXIV_MAX_RESULTS.to_string();
        let response = self
            .http
            .get(&self.arxiv_url)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "relevance"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let feed = feed_rs::parser::parse(&body[..])
            .map_err(|e| AppError::Parse(format!("arXiv feed: {}", e)))?;

        let records = feed
            .entries
            .into_iter()
            .map(|entry| {
                let authors = entry
                    .authors
                    .iter()
                    .map(|a| a.name.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_else(|| "#".to_string());

                ResearchRecord {
                    title: entry
                        .title
                        .map(|t| t.content)
                        .unwrap_or_else(|| "Untitled paper".to_string()),
                    authors,
                    date: entry
                        .published
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                    source: "arXiv".to_string(),
                    link,
                    summary: entry
                        .summary
                        .map(|s| truncate(&s.content, 300))
                        .unwrap_or_default(),
                    kind: RecordKind::AcademicPaper,
                }
            })
            .collect();

        Ok(records)
    }

    /// Query the certification registry for rating activity matching the
    /// query.
    async fn search_certifications(&self, query: &str) -> Result<Vec<ResearchRecord>> {
        let response = self
            .http
            .get(format!("{}/certifications", self.certification_url))
            .query(&[("q", query), ("limit", "5")])
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        let results = payload
            .get("results")
            .and_then(|v| v.as_array())
            .ok_or_else(|| AppError::Parse("certification payload missing results".to_string()))?;

        let records = results
            .iter()
            .filter_map(|item| {
                let title = item.get("title").and_then(|v| v.as_str())?;
                Some(ResearchRecord {
                    title: title.to_string(),
                    authors: String::new(),
                    date: item
                        .get("date")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    source: item
                        .get("rating_system")
                        .and_then(|v| v.as_str())
                        .unwrap_or("Green Building Registry")
                        .to_string(),
                    link: item
                        .get("url")
                        .and_then(|v| v.as_str())
                        .unwrap_or("#")
                        .to_string(),
                    summary: item
                        .get("summary")
                        .and_then(|v| v.as_str())
                        .map(|s| truncate(s, 300))
                        .unwrap_or_default(),
                    kind: RecordKind::CertificationData,
                })
            })
            .collect();

        Ok(records)
    }
}

#[async_trait]
impl SourceAdapter for SustainabilityAdapter {
    fn name(&self) -> &str {
        DISPLAY_NAME
    }

    fn topic(&self) -> Option<Topic> {
        Some(Topic::Sustainability)
    }

    async fn get_research(&self, query: &str, session_id: &str) -> AdapterOutcome {
        self.store
            .log_event(session_id, "Searching academic databases", Some(DISPLAY_NAME));

        let mut records = Vec::new();
        let mut warnings = Vec::new();

        match self.search_papers(query).await {
            Ok(papers) => records.extend(papers),
            Err(e) => {
                tracing::warn!(adapter = DISPLAY_NAME, error = %e, "paper search failed");
                warnings.push(format!("arXiv search failed: {}", e));
            }
        }

        if records.len() < MIN_RESULTS {
            self.store.log_event(
                session_id,
                "Checking certification registry",
                Some(DISPLAY_NAME),
            );
            match self.search_certifications(query).await {
                Ok(certs) => records.extend(certs),
                Err(e) => {
                    tracing::warn!(adapter = DISPLAY_NAME, error = %e, "certification lookup failed");
                    warnings.push(format!("Certification registry failed: {}", e));
                }
            }
        }

        if records.is_empty() {
            records.push(general_information_record(DISPLAY_NAME, query));
        }

        AdapterOutcome::from_parts(records, warnings)
    }
}
