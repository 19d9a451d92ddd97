//! Query categorization
//!
//! Scores a free-text query against fixed keyword tables, one per topic.
//! Matching is case-insensitive substring containment, not word-boundary
//! aware ("rent" matches inside "current"), so keyword lists are curated
//! with that in mind rather than stemmed or expanded. The category with the
//! strictly highest count of distinct matching keywords wins; ties and
//! zero-signal queries fall back to [`Topic::General`].

use crate::types::Topic;

const SUSTAINABILITY_KEYWORDS: &[&str] = &[
    "sustainab",
    "green",
    "leed",
    "energy",
    "carbon",
    "esg",
    "renewable",
    "solar",
    "emission",
    "breeam",
    "net zero",
    "environment",
    "certification",
    "efficiency",
];

const LEASING_KEYWORDS: &[&str] = &[
    "lease",
    "rent",
    "tenant",
    "landlord",
    "occupancy",
    "sublease",
    "listing",
    "square foot",
    "workletter",
    "build-out",
];

const MARKET_KEYWORDS: &[&str] = &[
    "market",
    "trend",
    "forecast",
    "office",
    "vacancy",
    "rate",
    "price",
    "investment",
    "interest",
    "econom",
    "inflation",
    "demand",
    "supply",
    "growth",
];

/// Keyword table driving categorization, exposed for tests and docs.
pub const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Sustainability, SUSTAINABILITY_KEYWORDS),
    (Topic::Leasing, LEASING_KEYWORDS),
    (Topic::Market, MARKET_KEYWORDS),
];

fn score(query: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| query.contains(*k)).count()
}

/// Pick the dominant topic of a query, or `General` when no topic
/// strictly dominates.
pub fn categorize(query: &str) -> Topic {
    let query = query.to_lowercase();

    let mut best = Topic::General;
    let mut best_score = 0usize;
    let mut tied = false;

    for (topic, keywords) in TOPIC_KEYWORDS {
        let s = score(&query, keywords);
        match s.cmp(&best_score) {
            std::cmp::Ordering::Greater => {
                best = *topic;
                best_score = s;
                tied = false;
            }
            std::cmp::Ordering::Equal => tied = true,
            std::cmp::Ordering::Less => {}
        }
    }

    if best_score == 0 || tied {
        Topic::General
    } else {
        best
    }
}
