//! Economic indicator lookup
//!
//! Maps query substrings onto a fixed table of indicator series, fetches
//! the most recent observations for each matched series, and condenses
//! them into one record per series with a coarse trend label computed from
//! the percent change between the newest observation and the oldest of
//! the last twelve.

use crate::types::{AppError, RecordKind, ResearchRecord, Result};

/// Observations fetched per series; the trend spans this window.
const OBSERVATION_WINDOW: usize = 12;
/// Percent-change bounds for the trend labels.
const SIGNIFICANT_CHANGE_PCT: f64 = 10.0;
const NOTABLE_CHANGE_PCT: f64 = 2.0;

/// Query substring → (series id, display name).
const INDICATOR_TABLE: &[(&str, &str, &str)] = &[
    ("interest", "DFF", "Federal Funds Effective Rate"),
    ("inflation", "CPIAUCSL", "Consumer Price Index"),
    ("unemployment", "UNRATE", "Unemployment Rate"),
    ("employment", "PAYEMS", "Total Nonfarm Payrolls"),
    ("gdp", "GDP", "Gross Domestic Product"),
    ("construction", "TLCOMCONS", "Commercial Construction Spending"),
    ("vacancy", "RRVRUSQ156N", "Rental Vacancy Rate"),
    ("mortgage", "MORTGAGE30US", "30-Year Fixed Mortgage Average"),
];

pub struct EconomicDataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Coarse trend label for a percent change over the observation window.
fn trend_label(pct_change: f64) -> &'static str {
    if pct_change >= SIGNIFICANT_CHANGE_PCT {
        "significantly increased"
    } else if pct_change >= NOTABLE_CHANGE_PCT {
        "increased"
    } else if pct_change <= -SIGNIFICANT_CHANGE_PCT {
        "significantly decreased"
    } else if pct_change <= -NOTABLE_CHANGE_PCT {
        "decreased"
    } else {
        "stable"
    }
}

/// Series from the table whose trigger substring appears in the query.
fn matched_series(query: &str) -> Vec<(&'static str, &'static str)> {
    let query = query.to_lowercase();
    INDICATOR_TABLE
        .iter()
        .filter(|(trigger, _, _)| query.contains(trigger))
        .map(|(_, series_id, name)| (*series_id, *name))
        .collect()
}

impl EconomicDataClient {
    pub fn new(http: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// One record per indicator series the query maps onto; empty when
    /// the query names no tracked indicator. A failed series is skipped
    /// with a warning rather than sinking the others.
    pub async fn indicator_records(&self, query: &str) -> (Vec<ResearchRecord>, Vec<String>) {
        let mut records = Vec::new();
        let mut warnings = Vec::new();
        for (series_id, name) in matched_series(query) {
            match self.fetch_series(series_id, name).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(series = series_id, error = %e, "indicator fetch failed");
                    warnings.push(format!("Indicator {} failed: {}", series_id, e));
                }
            }
        }
        (records, warnings)
    }

    async fn fetch_series(&self, series_id: &str, name: &str) -> Result<ResearchRecord> {
        let api_key = self.api_key.as_deref().unwrap_or("demo");
        let limit = OBSERVATION_WINDOW.to_string();
        let response = self
            .http
            .get(format!("{}/fred/series/observations", self.base_url))
            .query(&[
                ("series_id", series_id),
                ("api_key", api_key),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        let observations = payload
            .get("observations")
            .and_then(|v| v.as_array())
            .ok_or_else(|| AppError::Parse(format!("series {}: missing observations", series_id)))?;

        // Newest first; "." marks a missing value in the series data
        let values: Vec<(String, f64)> = observations
            .iter()
            .filter_map(|obs| {
                let date = obs.get("date").and_then(|v| v.as_str())?;
                let value = obs.get("value").and_then(|v| v.as_str())?.parse().ok()?;
                Some((date.to_string(), value))
            })
            .collect();

        let (latest_date, latest) = values
            .first()
            .cloned()
            .ok_or_else(|| AppError::Parse(format!("series {}: no usable observations", series_id)))?;
        let (_, oldest) = values.last().cloned().unwrap_or((String::new(), latest));

        let pct_change = if oldest == 0.0 {
            0.0
        } else {
            (latest - oldest) / oldest * 100.0
        };

        Ok(ResearchRecord {
            title: format!("{} ({})", name, series_id),
            authors: String::new(),
            date: latest_date.clone(),
            source: "Federal Reserve Economic Data".to_string(),
            link: format!("https://fred.stlouisfed.org/series/{}", series_id),
            summary: format!(
                "Latest value {:.2} as of {}. The series has {} ({:+.1}%) across the \
                 last {} observations.",
                latest, latest_date, trend_label(pct_change), pct_change, values.len()
            ),
            kind: RecordKind::EconomicData,
        })
    }
}
