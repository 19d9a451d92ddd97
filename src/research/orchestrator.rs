//! Research orchestrator
//!
//! The inbound surface of the core: validates the request, categorizes the
//! query, fans out to the selected source adapters plus the always-run
//! fallback, flattens the evidence in invocation order, and hands it to
//! the synthesis pipeline. Adapters run as concurrent tasks with a fixed
//! per-adapter budget; they have no data dependency on each other, and a
//! task that misses its budget degrades to an empty outcome instead of
//! failing the request.

use crate::llm::Provider;
use crate::research::categorizer::categorize;
use crate::research::synthesis::Synthesizer;
use crate::session::{InMemorySessionStore, SessionStore};
use crate::sources::economic::EconomicDataClient;
use crate::sources::news::NewsAggregator;
use crate::sources::{
    AdapterOutcome, FallbackAdapter, LeasingAdapter, MarketAdapter, SourceAdapter,
    SustainabilityAdapter,
};
use crate::types::{
    AppError, DocumentContext, Result, SessionProgress, SynthesizedResponse, Topic,
};
use crate::utils::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

pub struct ResearchOrchestrator {
    store: Arc<dyn SessionStore>,
    adapters: Vec<Arc<dyn SourceAdapter>>,
    synthesizer: Synthesizer,
    adapter_budget: Duration,
}

impl ResearchOrchestrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        adapters: Vec<Arc<dyn SourceAdapter>>,
        synthesizer: Synthesizer,
        adapter_budget: Duration,
    ) -> Self {
        Self {
            store,
            adapters,
            synthesizer,
            adapter_budget,
        }
    }

    /// Wire the default adapter set, session store, and model provider
    /// from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.research.request_timeout_secs))
            .user_agent(concat!("crane-research/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let store: Arc<dyn SessionStore> = match config.research.session_ttl_secs {
            Some(ttl) => Arc::new(InMemorySessionStore::with_ttl(ttl)),
            None => Arc::new(InMemorySessionStore::new()),
        };

        let p = &config.providers;
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(SustainabilityAdapter::new(
                http.clone(),
                Arc::clone(&store),
                p.arxiv_url.clone(),
                p.certification_url.clone(),
            )),
            Arc::new(LeasingAdapter::new(
                http.clone(),
                Arc::clone(&store),
                p.listings_url.clone(),
                p.analytics_url.clone(),
            )),
            Arc::new(MarketAdapter::new(
                http.clone(),
                Arc::clone(&store),
                p.trends_url.clone(),
                NewsAggregator::new(http.clone(), p.news_feeds.clone()),
                EconomicDataClient::new(
                    http.clone(),
                    p.economic_url.clone(),
                    p.economic_api_key.clone(),
                ),
            )),
            Arc::new(FallbackAdapter::new(
                http,
                Arc::clone(&store),
                p.wikipedia_url.clone(),
                p.scrape_url.clone(),
            )),
        ];

        let llm = Provider::from_config(config)?.create_client()?;

        Ok(Self::new(
            store,
            adapters,
            Synthesizer::new(llm),
            Duration::from_secs(config.research.adapter_budget_secs),
        ))
    }

    /// Run one research request end to end.
    ///
    /// Topical adapters run when their topic matches the detected one, or
    /// for every `general` query; the fallback adapter always runs. Only
    /// validation failures and synthesis failures surface to the caller;
    /// everything an adapter can suffer has already been absorbed inside
    /// it. The session is marked complete on every path past validation,
    /// including a failed synthesis call.
    pub async fn run_research(
        &self,
        query: &str,
        session_id: &str,
        document: Option<&DocumentContext>,
    ) -> Result<SynthesizedResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidRequest("query is required".to_string()));
        }
        if session_id.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "session id is required".to_string(),
            ));
        }

        self.store.begin(session_id);
        self.store.log_event(session_id, "Categorizing query", None);

        let topic = categorize(query);
        tracing::info!(topic = topic.as_str(), "query categorized");
        self.store.log_event(
            session_id,
            &format!("Detected {} focus", topic.as_str()),
            None,
        );

        let selected: Vec<Arc<dyn SourceAdapter>> = self
            .adapters
            .iter()
            .filter(|a| match a.topic() {
                None => true,
                Some(t) => t == topic || topic == Topic::General,
            })
            .cloned()
            .collect();

        self.store.log_event(session_id, "Gathering sources", None);

        let mut set = JoinSet::new();
        for (slot, adapter) in selected.iter().enumerate() {
            let adapter = Arc::clone(adapter);
            let query = query.to_string();
            let session_id = session_id.to_string();
            let budget = self.adapter_budget;

            set.spawn(async move {
                let outcome =
                    match tokio::time::timeout(budget, adapter.get_research(&query, &session_id))
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            tracing::warn!(adapter = adapter.name(), "adapter exceeded budget");
                            AdapterOutcome::Degraded(
                                Vec::new(),
                                vec![format!("{} timed out", adapter.name())],
                            )
                        }
                    };
                (slot, outcome)
            });
        }

        let mut slots: Vec<Option<AdapterOutcome>> =
            (0..selected.len()).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            if let Ok((slot, outcome)) = joined {
                slots[slot] = Some(outcome);
            }
        }

        // Flatten in adapter invocation order; task completion order is
        // irrelevant to citation numbering
        let mut records = Vec::new();
        for outcome in slots.into_iter().flatten() {
            for warning in outcome.warnings() {
                tracing::warn!(%warning, "partial data loss");
            }
            records.extend(outcome.into_records());
        }

        if document.is_some() {
            self.store.log_event(
                session_id,
                "Including document analysis",
                Some("Document Analysis"),
            );
        }

        self.store.log_event(session_id, "Synthesizing findings", None);
        let result = self.synthesizer.synthesize(query, &records, document).await;

        self.store.mark_complete(session_id);
        result
    }

    /// Progress log for a session, polled while `run_research` executes.
    pub fn status(&self, session_id: &str) -> SessionProgress {
        self.store.status(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, LLMClient, OfflineClient};
    use crate::types::{RecordKind, ResearchRecord};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct StubAdapter {
        name: &'static str,
        topic: Option<Topic>,
        delay_ms: u64,
        invoked: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SourceAdapter for StubAdapter {
        fn name(&self) -> &str {
            self.name
        }

        fn topic(&self) -> Option<Topic> {
            self.topic
        }

        async fn get_research(&self, _query: &str, _session_id: &str) -> AdapterOutcome {
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            self.invoked.lock().push(self.name.to_string());
            AdapterOutcome::Ok(vec![ResearchRecord {
                title: format!("{} record", self.name),
                authors: String::new(),
                date: "2025".to_string(),
                source: self.name.to_string(),
                link: "#".to_string(),
                summary: String::new(),
                kind: RecordKind::WebContent,
            }])
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LLMClient for FailingLlm {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
            Err(AppError::Provider("model offline".to_string()))
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    fn orchestrator_with(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        llm: Box<dyn LLMClient>,
    ) -> ResearchOrchestrator {
        ResearchOrchestrator::new(
            Arc::new(InMemorySessionStore::new()),
            adapters,
            Synthesizer::new(llm),
            Duration::from_secs(5),
        )
    }

    fn stub_set(invoked: &Arc<Mutex<Vec<String>>>) -> Vec<Arc<dyn SourceAdapter>> {
        vec![
            Arc::new(StubAdapter {
                name: "sustainability",
                topic: Some(Topic::Sustainability),
                delay_ms: 0,
                invoked: Arc::clone(invoked),
            }),
            Arc::new(StubAdapter {
                name: "leasing",
                topic: Some(Topic::Leasing),
                delay_ms: 0,
                invoked: Arc::clone(invoked),
            }),
            Arc::new(StubAdapter {
                name: "market",
                topic: Some(Topic::Market),
                delay_ms: 0,
                invoked: Arc::clone(invoked),
            }),
            Arc::new(StubAdapter {
                name: "fallback",
                topic: None,
                delay_ms: 0,
                invoked: Arc::clone(invoked),
            }),
        ]
    }

    #[tokio::test]
    async fn test_general_query_runs_every_adapter() {
        let invoked = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = orchestrator_with(stub_set(&invoked), Box::new(OfflineClient::new()));

        orchestrator
            .run_research("tell me something", "s1", None)
            .await
            .unwrap();

        let mut names = invoked.lock().clone();
        names.sort();
        assert_eq!(names, vec!["fallback", "leasing", "market", "sustainability"]);
    }

    #[tokio::test]
    async fn test_topical_query_runs_matching_adapter_plus_fallback() {
        let invoked = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = orchestrator_with(stub_set(&invoked), Box::new(OfflineClient::new()));

        orchestrator
            .run_research("office vacancy rate forecast", "s1", None)
            .await
            .unwrap();

        let mut names = invoked.lock().clone();
        names.sort();
        assert_eq!(names, vec!["fallback", "market"]);
    }

    #[tokio::test]
    async fn test_missing_query_is_invalid_and_creates_no_session() {
        let invoked = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = orchestrator_with(stub_set(&invoked), Box::new(OfflineClient::new()));

        let result = orchestrator.run_research("   ", "s1", None).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));

        assert!(invoked.lock().is_empty());
        let status = orchestrator.status("s1");
        assert!(status.events.is_empty());
        assert!(!status.complete);
    }

    #[tokio::test]
    async fn test_missing_session_id_is_invalid() {
        let invoked = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = orchestrator_with(stub_set(&invoked), Box::new(OfflineClient::new()));

        let result = orchestrator.run_research("office market", "", None).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert!(invoked.lock().is_empty());
    }

    #[tokio::test]
    async fn test_synthesis_failure_still_marks_session_complete() {
        let invoked = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = orchestrator_with(stub_set(&invoked), Box::new(FailingLlm));

        let result = orchestrator
            .run_research("office vacancy rate forecast", "s1", None)
            .await;
        assert!(matches!(result, Err(AppError::Provider(_))));

        let status = orchestrator.status("s1");
        assert!(status.complete);
        assert!(!status.events.is_empty());
    }

    #[tokio::test]
    async fn test_records_keep_invocation_order_despite_completion_order() {
        let invoked = Arc::new(Mutex::new(Vec::new()));
        // First adapter finishes last; flattening must still lead with it
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(StubAdapter {
                name: "slow-first",
                topic: None,
                delay_ms: 80,
                invoked: Arc::clone(&invoked),
            }),
            Arc::new(StubAdapter {
                name: "fast-second",
                topic: None,
                delay_ms: 0,
                invoked: Arc::clone(&invoked),
            }),
        ];
        let orchestrator = orchestrator_with(adapters, Box::new(OfflineClient::new()));

        let result = orchestrator
            .run_research("anything", "s1", None)
            .await
            .unwrap();

        assert_eq!(result.citations.len(), 2);
        assert_eq!(result.citations[0].title, "slow-first record");
        assert_eq!(result.citations[1].title, "fast-second record");
    }

    #[tokio::test]
    async fn test_adapter_over_budget_degrades_to_empty() {
        let invoked = Arc::new(Mutex::new(Vec::new()));
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(StubAdapter {
                name: "stuck",
                topic: None,
                delay_ms: 5_000,
                invoked: Arc::clone(&invoked),
            }),
            Arc::new(StubAdapter {
                name: "healthy",
                topic: None,
                delay_ms: 0,
                invoked: Arc::clone(&invoked),
            }),
        ];
        let orchestrator = ResearchOrchestrator::new(
            Arc::new(InMemorySessionStore::new()),
            adapters,
            Synthesizer::new(Box::new(OfflineClient::new())),
            Duration::from_millis(100),
        );

        let result = orchestrator
            .run_research("anything", "s1", None)
            .await
            .unwrap();

        assert_eq!(result.citations.len(), 1);
        assert_eq!(result.citations[0].title, "healthy record");
        assert!(orchestrator.status("s1").complete);
    }
}
