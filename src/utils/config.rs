use std::env;

/// Runtime configuration, environment-driven.
///
/// Every provider base URL has a default, so an unconfigured install runs
/// (and degrades per the adapter rules where a default service is not
/// reachable). A `.env` file is honored when present.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub providers: ProviderConfig,
    pub research: ResearchConfig,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Explicit provider selection ("openai", "anthropic", "offline");
    /// unset means pick from available credentials.
    pub provider: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub arxiv_url: String,
    pub certification_url: String,
    pub listings_url: String,
    pub analytics_url: String,
    pub trends_url: String,
    pub economic_url: String,
    pub economic_api_key: Option<String>,
    pub wikipedia_url: String,
    pub scrape_url: String,
    pub news_feeds: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Timeout applied to each external HTTP call.
    pub request_timeout_secs: u64,
    /// Wall-clock budget for one adapter's whole run.
    pub adapter_budget_secs: u64,
    /// Optional age at which stale sessions are pruned.
    pub session_ttl_secs: Option<i64>,
}

const DEFAULT_NEWS_FEEDS: &[&str] = &[
    "https://www.bisnow.com/feed",
    "https://commercialobserver.com/feed/",
    "https://www.globest.com/feed/",
];

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Ok(Config {
            llm: LlmConfig {
                provider: env::var("CRANE_LLM_PROVIDER").ok(),
                openai_api_key: env::var("OPENAI_API_KEY").ok(),
                openai_api_base: env::var("OPENAI_API_BASE")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                openai_model: env::var("OPENAI_MODEL")
                    .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
                anthropic_model: env::var("ANTHROPIC_MODEL")
                    .unwrap_or_else(|_| "claude-3-5-sonnet-20241022".to_string()),
            },
            providers: ProviderConfig {
                arxiv_url: env::var("ARXIV_API_URL")
                    .unwrap_or_else(|_| "http://export.arxiv.org/api/query".to_string()),
                certification_url: env::var("CERTIFICATION_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8090".to_string()),
                listings_url: env::var("LISTINGS_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8091".to_string()),
                analytics_url: env::var("ANALYTICS_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8092".to_string()),
                trends_url: env::var("TRENDS_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8093".to_string()),
                economic_url: env::var("ECONOMIC_API_URL")
                    .unwrap_or_else(|_| "https://api.stlouisfed.org".to_string()),
                economic_api_key: env::var("FRED_API_KEY").ok(),
                wikipedia_url: env::var("WIKIPEDIA_URL")
                    .unwrap_or_else(|_| "https://en.wikipedia.org".to_string()),
                scrape_url: env::var("SCRAPE_URL").unwrap_or_else(|_| {
                    "https://en.wikipedia.org/wiki/Commercial_property".to_string()
                }),
                news_feeds: env::var("NEWS_FEED_URLS")
                    .map(|v| {
                        v.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_else(|_| {
                        DEFAULT_NEWS_FEEDS.iter().map(|s| s.to_string()).collect()
                    }),
            },
            research: ResearchConfig {
                request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
                adapter_budget_secs: env::var("ADAPTER_BUDGET_SECS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()?,
                session_ttl_secs: match env::var("SESSION_TTL_SECS") {
                    Ok(v) => Some(v.parse()?),
                    Err(_) => None,
                },
            },
        })
    }

    /// Fixed configuration for tests: no credentials, unroutable provider
    /// endpoints, tight timeouts.
    pub fn default_for_tests() -> Self {
        let unreachable = "http://127.0.0.1:1".to_string();
        Config {
            llm: LlmConfig {
                provider: Some("offline".to_string()),
                openai_api_key: None,
                openai_api_base: "https://api.openai.com/v1".to_string(),
                openai_model: "gpt-4o-mini".to_string(),
                anthropic_api_key: None,
                anthropic_model: "claude-3-5-sonnet-20241022".to_string(),
            },
            providers: ProviderConfig {
                arxiv_url: unreachable.clone(),
                certification_url: unreachable.clone(),
                listings_url: unreachable.clone(),
                analytics_url: unreachable.clone(),
                trends_url: unreachable.clone(),
                economic_url: unreachable.clone(),
                economic_api_key: None,
                wikipedia_url: unreachable.clone(),
                scrape_url: unreachable,
                news_feeds: Vec::new(),
            },
            research: ResearchConfig {
                request_timeout_secs: 1,
                adapter_budget_secs: 5,
                session_ttl_secs: None,
            },
        }
    }
}
