//! End-to-end research scenarios
//!
//! These run the real orchestrator and adapters with every data provider
//! pointed at an unroutable address and the offline model provider, so
//! each adapter exercises its full degradation ladder and the pipeline
//! still produces a cited answer.

use crane::llm::{OfflineClient, Provider};
use crane::sources::fallback::{FallbackAdapter, WebSearchHit, WebSearchProvider};
use crane::sources::economic::EconomicDataClient;
use crane::sources::news::NewsAggregator;
use crane::sources::{LeasingAdapter, MarketAdapter, SourceAdapter, SustainabilityAdapter};
use crane::{
    AppError, Config, DocumentContext, InMemorySessionStore, ResearchOrchestrator, SessionStore,
    Synthesizer,
};
use std::sync::Arc;
use std::time::Duration;

const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Web search stub standing in for the live provider: always empty.
struct EmptyWebSearch;

#[async_trait::async_trait]
impl WebSearchProvider for EmptyWebSearch {
    async fn search(&self, _query: &str, _limit: usize) -> crane::Result<Vec<WebSearchHit>> {
        Ok(Vec::new())
    }
}

fn orchestrator_with_dead_providers() -> ResearchOrchestrator {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(SustainabilityAdapter::new(
            http.clone(),
            Arc::clone(&store),
            UNREACHABLE.to_string(),
            UNREACHABLE.to_string(),
        )),
        Arc::new(LeasingAdapter::new(
            http.clone(),
            Arc::clone(&store),
            UNREACHABLE.to_string(),
            UNREACHABLE.to_string(),
        )),
        Arc::new(MarketAdapter::new(
            http.clone(),
            Arc::clone(&store),
            UNREACHABLE.to_string(),
            NewsAggregator::new(http.clone(), Vec::new()),
            EconomicDataClient::new(http.clone(), UNREACHABLE.to_string(), None),
        )),
        Arc::new(FallbackAdapter::with_search_provider(
            http,
            Arc::clone(&store),
            Box::new(EmptyWebSearch),
            UNREACHABLE.to_string(),
            UNREACHABLE.to_string(),
        )),
    ];

    ResearchOrchestrator::new(
        store,
        adapters,
        Synthesizer::new(Box::new(OfflineClient::new())),
        Duration::from_secs(10),
    )
}

fn event_steps(orchestrator: &ResearchOrchestrator, session_id: &str) -> Vec<String> {
    orchestrator
        .status(session_id)
        .events
        .iter()
        .map(|e| e.step.clone())
        .collect()
}

#[tokio::test]
async fn scenario_sustainability_query_with_empty_providers() {
    let orchestrator = orchestrator_with_dead_providers();

    let answer = orchestrator
        .run_research("What are current LEED certification trends?", "s-a", None)
        .await
        .unwrap();

    // A minimal markdown answer with a Sources section and at least the
    // fallback's canned citation
    assert!(answer.response.contains("## Sources"));
    assert!(!answer.citations.is_empty());
    assert!(answer.citations.iter().any(|c| c.link == "#"));

    let steps = event_steps(&orchestrator, "s-a");
    assert!(steps.iter().any(|s| s == "Detected sustainability focus"));
    // Sustainability and fallback adapters ran; leasing and market did not
    assert!(steps.iter().any(|s| s == "Searching academic databases"));
    assert!(steps.iter().any(|s| s == "Searching knowledge base"));
    assert!(!steps.iter().any(|s| s == "Searching property listings"));
    assert!(!steps.iter().any(|s| s == "Analyzing market trends"));

    assert!(orchestrator.status("s-a").complete);
}

#[tokio::test]
async fn scenario_vacancy_forecast_resolves_to_market() {
    let orchestrator = orchestrator_with_dead_providers();

    orchestrator
        .run_research("office vacancy rate forecast", "s-b", None)
        .await
        .unwrap();

    let steps = event_steps(&orchestrator, "s-b");
    assert!(steps.iter().any(|s| s == "Detected market focus"));
    assert!(steps.iter().any(|s| s == "Analyzing market trends"));
    assert!(!steps.iter().any(|s| s == "Searching academic databases"));
    assert!(!steps.iter().any(|s| s == "Searching property listings"));
}

#[tokio::test]
async fn scenario_missing_session_id_is_rejected_before_any_work() {
    let orchestrator = orchestrator_with_dead_providers();

    let result = orchestrator
        .run_research("office vacancy rate forecast", "  ", None)
        .await;

    assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    let status = orchestrator.status("  ");
    assert!(status.events.is_empty());
    assert!(!status.complete);
}

#[tokio::test]
async fn scenario_document_context_feeds_prompt_but_not_citations() {
    let orchestrator = orchestrator_with_dead_providers();
    let doc = DocumentContext {
        summary: "Tenant-supplied lease abstract covering escalation clauses".to_string(),
        topics: vec!["leasing".to_string()],
        word_count: 3200,
    };

    let answer = orchestrator
        .run_research("summarize what matters here", "s-d", Some(&doc))
        .await
        .unwrap();

    // The document block reaches synthesis (logged as its own step), but
    // the citation list deliberately excludes it: citations are projected
    // from adapter records only.
    let steps = event_steps(&orchestrator, "s-d");
    assert!(steps.iter().any(|s| s == "Including document analysis"));
    assert!(answer
        .citations
        .iter()
        .all(|c| c.source != "Document Analysis"));
    assert!(!answer.citations.is_empty());
}

#[tokio::test]
async fn general_query_runs_all_four_adapters() {
    let orchestrator = orchestrator_with_dead_providers();

    orchestrator
        .run_research("tell me about downtown buildings", "s-g", None)
        .await
        .unwrap();

    let steps = event_steps(&orchestrator, "s-g");
    assert!(steps.iter().any(|s| s == "Detected general focus"));
    assert!(steps.iter().any(|s| s == "Searching academic databases"));
    assert!(steps.iter().any(|s| s == "Searching property listings"));
    assert!(steps.iter().any(|s| s == "Analyzing market trends"));
    assert!(steps.iter().any(|s| s == "Searching knowledge base"));
}

#[tokio::test]
async fn completed_session_log_ends_complete_and_ordered() {
    let orchestrator = orchestrator_with_dead_providers();

    orchestrator
        .run_research("office vacancy rate forecast", "s-log", None)
        .await
        .unwrap();

    let status = orchestrator.status("s-log");
    assert!(status.complete);

    // Timestamps are monotone non-decreasing in append order
    let timestamps: Vec<_> = status.events.iter().map(|e| e.timestamp).collect();
    let mut sorted = timestamps.clone();
    sorted.sort();
    assert_eq!(timestamps, sorted);

    // The log opens with categorization and ends at synthesis
    assert_eq!(status.events.first().unwrap().step, "Categorizing query");
    assert_eq!(status.events.last().unwrap().step, "Synthesizing findings");
}

#[tokio::test]
async fn offline_provider_is_selected_without_credentials() {
    let config = Config::default_for_tests();
    let provider = Provider::from_config(&config).unwrap();
    let client = provider.create_client().unwrap();
    assert_eq!(client.model_name(), "offline-synthesis");
}
