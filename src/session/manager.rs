use super::chunk::ChunkRef;
use super::config::SessionConfig;
use super::session::Session;
use super::stats::SessionSummary;
use super::store::SessionStore;
use crate::engine::Engine;
use crate::error::{Result, TranscribeError};
use std::collections::HashMap;
use std::sync::Arc;

/// Public entry points of the transcription core.
///
/// Composes the session store, the per-session lanes, and the engine
/// adapter: create a session, submit a chunk, read the transcript, list
/// sessions. Submissions to different sessions proceed independently and
/// concurrently; within one session they are strictly serialized by its
/// lane.
pub struct SessionManager {
    store: SessionStore,
    engine: Arc<dyn Engine>,
}

impl SessionManager {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            store: SessionStore::new(),
            engine,
        }
    }

    /// Allocate a new session and return its id.
    pub async fn create_session(&self, config: SessionConfig) -> String {
        let session = Arc::new(Session::new(config, Arc::clone(&self.engine)));
        let id = session.id().to_string();
        self.store.insert(session).await;
        id
    }

    /// Queue one chunk for a session and wait for its text.
    ///
    /// Resolves only after every earlier chunk of the same session has
    /// completed. The returned text is this chunk's newly recognized text,
    /// not the cumulative transcript.
    pub async fn submit_chunk(&self, session_id: &str, chunk: ChunkRef) -> Result<String> {
        let session = self.store.get(session_id).await?;
        let reply = session.submit_chunk(chunk);

        reply.await.unwrap_or_else(|_| {
            Err(TranscribeError::EngineFailure {
                message: "session lane dropped the chunk result".to_string(),
            })
        })
    }

    /// Current transcript snapshot for a session.
    pub async fn transcript(&self, session_id: &str) -> Result<String> {
        let session = self.store.get(session_id).await?;
        Ok(session.transcript().await)
    }

    /// Diagnostic summaries of all live sessions, keyed by session id.
    pub async fn list_sessions(&self) -> HashMap<String, SessionSummary> {
        let mut summaries = HashMap::new();
        for session in self.store.list().await {
            summaries.insert(session.id().to_string(), session.summary().await);
        }
        summaries
    }
}
