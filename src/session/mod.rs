//! Session progress tracking
//!
//! Every component of a research request appends events to a session log
//! keyed by a client-chosen session id, so an external poller can observe
//! progress while the request runs. The store is injected into the
//! orchestrator and the adapters rather than reached through global state,
//! which keeps the backing implementation swappable (in-memory here; an
//! external cache would satisfy the same trait).

use crate::types::{ProgressEvent, SessionProgress};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-wide mapping from session id to progress state.
///
/// `log_event` must be a silent no-op for unknown sessions: adapters log
/// unconditionally and must never fail because a session was not begun.
pub trait SessionStore: Send + Sync {
    /// Create the session, or reset it to an empty, incomplete log.
    fn begin(&self, session_id: &str);

    /// Append a timestamped event if the session exists.
    fn log_event(&self, session_id: &str, step: &str, source: Option<&str>);

    /// Mark the session's research request as finished.
    fn mark_complete(&self, session_id: &str);

    /// Current log and completion flag, or an empty default if unknown.
    fn status(&self, session_id: &str) -> SessionProgress;
}

struct SessionEntry {
    progress: SessionProgress,
    started_at: DateTime<Utc>,
}

/// In-memory session store.
///
/// Entries live for the process lifetime by default, matching the polling
/// contract (a client may fetch status well after completion). Stale
/// entries can optionally be pruned whenever a new session begins; see
/// [`InMemorySessionStore::with_ttl`].
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that drops sessions older than `ttl_secs` each time a new
    /// session begins. Completed and abandoned sessions alike are evicted;
    /// pollers slower than the TTL observe the unknown-session default.
    pub fn with_ttl(ttl_secs: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Some(Duration::seconds(ttl_secs)),
        }
    }

    fn prune_stale(&self, sessions: &mut HashMap<String, SessionEntry>) {
        if let Some(ttl) = self.ttl {
            let cutoff = Utc::now() - ttl;
            sessions.retain(|_, entry| entry.started_at >= cutoff);
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn begin(&self, session_id: &str) {
        let mut sessions = self.sessions.write();
        self.prune_stale(&mut sessions);
        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                progress: SessionProgress::default(),
                started_at: Utc::now(),
            },
        );
    }

    fn log_event(&self, session_id: &str, step: &str, source: Option<&str>) {
        let mut sessions = self.sessions.write();
        if let Some(entry) = sessions.get_mut(session_id) {
            entry.progress.events.push(ProgressEvent {
                step: step.to_string(),
                source: source.map(|s| s.to_string()),
                timestamp: Utc::now(),
            });
        }
    }

    fn mark_complete(&self, session_id: &str) {
        let mut sessions = self.sessions.write();
        if let Some(entry) = sessions.get_mut(session_id) {
            entry.progress.complete = true;
        }
    }

    fn status(&self, session_id: &str) -> SessionProgress {
        self.sessions
            .read()
            .get(session_id)
            .map(|entry| entry.progress.clone())
            .unwrap_or_default()
    }
}
