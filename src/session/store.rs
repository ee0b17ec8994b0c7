use super::session::Session;
use crate::error::{Result, TranscribeError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Concurrency-safe map of live sessions (session id → session).
///
/// Explicitly owned by the process and injected into the `SessionManager`,
/// not ambient global state. A session is fully constructed before it is
/// inserted, so a lookup never observes a partial record. Entries live until
/// process end; there is no idle eviction.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a session under its id.
    pub async fn insert(&self, session: Arc<Session>) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id().to_string(), session);
    }

    /// Look up a session by id.
    pub async fn get(&self, id: &str) -> Result<Arc<Session>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| TranscribeError::SessionNotFound { id: id.to_string() })
    }

    /// Snapshot of all live sessions, no ordering guarantee.
    pub async fn list(&self) -> Vec<Arc<Session>> {
        let sessions = self.sessions.read().await;
        sessions.values().cloned().collect()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
