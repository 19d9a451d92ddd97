//! Leasing source adapter
//!
//! Primary: the property-listing service (active commercial listings).
//! Secondary: the market-analytics service (submarket leasing analytics).
//! Both are internal JSON services configured by base URL.

use crate::session::SessionStore;
use crate::sources::{
    general_information_record, truncate, AdapterOutcome, SourceAdapter, MIN_RESULTS,
};
use crate::types::{AppError, RecordKind, ResearchRecord, Result, Topic};
use async_trait::async_trait;
use std::sync::Arc;

const DISPLAY_NAME: &str = "Leasing Research";

pub struct LeasingAdapter {
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
    listings_url: String,
    analytics_url: String,
}

impl LeasingAdapter {
    pub fn new(
        http: reqwest::Client,
        store: Arc<dyn SessionStore>,
        listings_url: String,
        analytics_url: String,
    ) -> Self {
        Self {
            http,
            store,
            listings_url,
            analytics_url,
        }
    }

    async fn search_listings(&self, query: &str) -> Result<Vec<ResearchRecord>> {
        let response = self
            .http
            .get(format!("{}/listings/search", self.listings_url))
            .query(&[("query", query), ("limit", "5")])
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        let listings = payload
            .get("listings")
            .and_then(|v| v.as_array())
            .ok_or_else(|| AppError::Parse("listings payload missing listings".to_string()))?;

        let records = listings
            .iter()
            .filter_map(|item| {
                let title = item.get("title").and_then(|v| v.as_str())?;
                Some(ResearchRecord {
                    title: title.to_string(),
                    authors: String::new(),
                    date: item
                        .get("listed_date")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    source: "Commercial Listings".to_string(),
                    link: item
                        .get("url")
                        .and_then(|v| v.as_str())
                        .unwrap_or("#")
                        .to_string(),
                    summary: item
                        .get("description")
                        .and_then(|v| v.as_str())
                        .map(|s| truncate(s, 300))
                        .unwrap_or_default(),
                    kind: RecordKind::MarketReport,
                })
            })
            .collect();

        Ok(records)
    }

    async fn fetch_analytics(&self, query: &str) -> Result<Vec<ResearchRecord>> {
        let response = self
            .http
            .get(format!("{}/analytics/leasing", self.analytics_url))
            .query(&[("query", query)])
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        let reports = payload
            .get("reports")
            .and_then(|v| v.as_array())
            .ok_or_else(|| AppError::Parse("analytics payload missing reports".to_string()))?;

        let records = reports
            .iter()
            .filter_map(|item| {
                let title = item.get("title").and_then(|v| v.as_str())?;
                Some(ResearchRecord {
                    title: title.to_string(),
                    authors: String::new(),
                    date: item
                        .get("period")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    source: "Leasing Analytics".to_string(),
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
                    kind: RecordKind::MarketReport,
                })
            })
            .collect();

        Ok(records)
    }
}

#[async_trait]
impl SourceAdapter for LeasingAdapter {
    fn name(&self) -> &str {
        DISPLAY_NAME
    }

    fn topic(&self) -> Option<Topic> {
        Some(Topic::Leasing)
    }

    async fn get_research(&self, query: &str, session_id: &str) -> AdapterOutcome {
        self.store
            .log_event(session_id, "Searching property listings", Some(DISPLAY_NAME));

        let mut records = Vec::new();
        let mut warnings = Vec::new();

        match self.search_listings(query).await {
            Ok(listings) => records.extend(listings),
            Err(e) => {
                tracing::warn!(adapter = DISPLAY_NAME, error = %e, "listing search failed");
                warnings.push(format!("Listing search failed: {}", e));
            }
        }

        if records.len() < MIN_RESULTS {
            self.store
                .log_event(session_id, "Fetching leasing analytics", Some(DISPLAY_NAME));
            match self.fetch_analytics(query).await {
                Ok(reports) => records.extend(reports),
                Err(e) => {
                    tracing::warn!(adapter = DISPLAY_NAME, error = %e, "analytics fetch failed");
                    warnings.push(format!("Leasing analytics failed: {}", e));
                }
            }
        }

        if records.is_empty() {
            records.push(general_information_record(DISPLAY_NAME, query));
        }

        AdapterOutcome::from_parts(records, warnings)
    }
}
