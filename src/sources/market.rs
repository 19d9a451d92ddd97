//! Market source adapter
//!
//! Composes three providers: the search-trends service, the syndicated
//! news aggregator, and the economic-indicator series client. Unlike the
//! other topical adapters, all three providers contribute rather than
//! forming a primary/secondary ladder; market questions usually want
//! sentiment, coverage, and hard numbers side by side.

use crate::session::SessionStore;
use crate::sources::economic::EconomicDataClient;
use crate::sources::news::NewsAggregator;
use crate::sources::{general_information_record, AdapterOutcome, SourceAdapter};
use crate::types::{AppError, RecordKind, ResearchRecord, Result, Topic};
use async_trait::async_trait;
use std::sync::Arc;

const DISPLAY_NAME: &str = "Market Research";

pub struct MarketAdapter {
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
    trends_url: String,
    news: NewsAggregator,
    economic: EconomicDataClient,
}

impl MarketAdapter {
    pub fn new(
        http: reqwest::Client,
        store: Arc<dyn SessionStore>,
        trends_url: String,
        news: NewsAggregator,
        economic: EconomicDataClient,
    ) -> Self {
        Self {
            http,
            store,
            trends_url,
            news,
            economic,
        }
    }

    /// Search-interest summary for the query from the trends service.
    async fn fetch_trends(&self, query: &str) -> Result<ResearchRecord> {
        let response = self
            .http
            .get(format!("{}/trends/interest", self.trends_url))
            .query(&[("keyword", query)])
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        let average = payload
            .get("average_interest")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| AppError::Parse("trends payload missing average_interest".to_string()))?;

        let related = payload
            .get("related_queries")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .take(5)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        Ok(ResearchRecord {
            title: format!("Search interest for \"{}\"", query),
            authors: String::new(),
            date: chrono::Utc::now().format("%B %Y").to_string(),
            source: "Search Trends".to_string(),
            link: "#".to_string(),
            summary: format!(
                "Average search interest {:.0}/100 over the trailing year. Related \
                 queries: {}.",
                average,
                if related.is_empty() { "none reported" } else { &related }
            ),
            kind: RecordKind::MarketReport,
        })
    }
}

#[async_trait]
impl SourceAdapter for MarketAdapter {
    fn name(&self) -> &str {
        DISPLAY_NAME
    }

    fn topic(&self) -> Option<Topic> {
        Some(Topic::Market)
    }

    async fn get_research(&self, query: &str, session_id: &str) -> AdapterOutcome {
        self.store
            .log_event(session_id, "Analyzing market trends", Some(DISPLAY_NAME));

        let mut records = Vec::new();
        let mut warnings = Vec::new();

        match self.fetch_trends(query).await {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(adapter = DISPLAY_NAME, error = %e, "trends fetch failed");
                warnings.push(format!("Trends service failed: {}", e));
            }
        }

        self.store
            .log_event(session_id, "Scanning industry news feeds", Some(DISPLAY_NAME));
        let (news_records, news_warnings) = self.news.top_items(query).await;
        records.extend(news_records);
        warnings.extend(news_warnings);

        self.store
            .log_event(session_id, "Fetching economic indicators", Some(DISPLAY_NAME));
        let (econ_records, econ_warnings) = self.economic.indicator_records(query).await;
        records.extend(econ_records);
        warnings.extend(econ_warnings);

        if records.is_empty() {
            records.push(general_information_record(DISPLAY_NAME, query));
        }

        AdapterOutcome::from_parts(records, warnings)
    }
}
