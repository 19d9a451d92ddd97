//! Syndicated news feed aggregation
//!
//! Fetches a fixed list of commercial real estate feeds (RSS/Atom), scores
//! each item's relevance against the query, and keeps the top 2 items per
//! feed source. Feed fetches are bounded individually so one slow
//! publisher cannot stall the market adapter.

use crate::sources::truncate;
use crate::types::{AppError, RecordKind, ResearchRecord, Result};
use std::time::Duration;

/// Per-feed fetch budget.
const FEED_TIMEOUT: Duration = Duration::from_secs(5);
/// Items kept per feed source after scoring.
const TOP_PER_FEED: usize = 2;
/// Bonus added per domain phrase found in an item.
const PHRASE_BONUS: usize = 2;

/// Domain-specific phrases worth more than individual term hits.
const DOMAIN_PHRASES: &[&str] = &[
    "commercial real estate",
    "office market",
    "vacancy rate",
    "cap rate",
    "lease rates",
    "industrial space",
    "property investment",
];

pub struct NewsAggregator {
    http: reqwest::Client,
    feeds: Vec<String>,
}

/// Relevance score for one feed item: one point per distinct query term
/// appearing as a substring, plus a bonus per domain phrase hit.
fn score_item(haystack: &str, terms: &[String]) -> usize {
    let haystack = haystack.to_lowercase();
    let term_hits = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
    let phrase_hits = DOMAIN_PHRASES
        .iter()
        .filter(|p| haystack.contains(*p))
        .count();
    term_hits + phrase_hits * PHRASE_BONUS
}

fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|t| t.len() > 2)
        .map(|t| t.to_string())
        .collect()
}

impl NewsAggregator {
    pub fn new(http: reqwest::Client, feeds: Vec<String>) -> Self {
        Self { http, feeds }
    }

    /// Fetch every configured feed and return the most relevant items,
    /// top [`TOP_PER_FEED`] per feed, plus a warning per feed that failed.
    pub async fn top_items(&self, query: &str) -> (Vec<ResearchRecord>, Vec<String>) {
        let terms = query_terms(query);

        let fetches = self.feeds.iter().map(|url| self.fetch_feed(url));
        let results = futures::future::join_all(fetches).await;

        let mut records = Vec::new();
        let mut warnings = Vec::new();

        for (url, result) in self.feeds.iter().zip(results) {
            match result {
                Ok(feed) => records.extend(Self::rank_feed(feed, &terms)),
                Err(e) => {
                    tracing::warn!(feed = %url, error = %e, "feed fetch failed");
                    warnings.push(format!("Feed {} failed: {}", url, e));
                }
            }
        }

        (records, warnings)
    }

    async fn fetch_feed(&self, url: &str) -> Result<feed_rs::model::Feed> {
        let response = self
            .http
            .get(url)
            .timeout(FEED_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        feed_rs::parser::parse(&body[..]).map_err(|e| AppError::Parse(format!("feed {}: {}", url, e)))
    }

    /// Score a feed's entries against the query terms, sort descending,
    /// and keep the best few as records.
    fn rank_feed(feed: feed_rs::model::Feed, terms: &[String]) -> Vec<ResearchRecord> {
        let source = feed
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| "Industry News".to_string());

        let mut scored: Vec<(usize, ResearchRecord)> = feed
            .entries
            .into_iter()
            .map(|entry| {
                let title = entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Untitled article".to_string());
                let summary = entry
                    .summary
                    .map(|s| s.content)
                    .unwrap_or_default();
                let score = score_item(&format!("{} {}", title, summary), terms);

                let record = ResearchRecord {
                    title,
                    authors: String::new(),
                    date: entry
                        .published
                        .or(entry.updated)
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                    source: source.clone(),
                    link: entry
                        .links
                        .first()
                        .map(|l| l.href.clone())
                        .unwrap_or_else(|| "#".to_string()),
                    summary: truncate(&crate::sources::strip_tags(&summary), 300),
                    kind: RecordKind::NewsArticle,
                };
                (score, record)
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(TOP_PER_FEED)
            .map(|(_, record)| record)
            .collect()
    }
}
