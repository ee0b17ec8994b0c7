use super::chunk::ChunkRef;
use super::config::SessionConfig;
use super::lane::ChunkLane;
use super::stats::SessionSummary;
use crate::engine::Engine;
use crate::error::Result;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::info;

/// One live transcription session: identity, recognition configuration, the
/// growing transcript, and the lane that serializes its chunks.
pub struct Session {
    /// Opaque identifier handed back to the client. Random 128-bit token,
    /// collision-free under concurrent creation.
    id: String,

    /// Model and language, fixed at creation
    config: SessionConfig,

    /// When the session was created
    created_at: chrono::DateTime<chrono::Utc>,

    /// Authoritative transcript, append-only. Written only by the lane's
    /// drain step; readers take a snapshot.
    transcript: Arc<RwLock<String>>,

    /// The session's serialized chunk lane
    lane: ChunkLane,

    /// Chunks transcribed successfully
    chunks_transcribed: Arc<AtomicUsize>,

    /// Chunks that failed in the engine
    chunks_failed: Arc<AtomicUsize>,
}

impl Session {
    /// Create a session and start its lane.
    pub fn new(config: SessionConfig, engine: Arc<dyn Engine>) -> Self {
        let id = uuid::Uuid::new_v4().to_string();

        info!(
            "Creating session {} (model={}, language={})",
            id, config.model, config.language
        );

        let transcript = Arc::new(RwLock::new(String::new()));
        let chunks_transcribed = Arc::new(AtomicUsize::new(0));
        let chunks_failed = Arc::new(AtomicUsize::new(0));

        let lane = ChunkLane::spawn(
            id.clone(),
            config.clone(),
            Arc::clone(&transcript),
            engine,
            Arc::clone(&chunks_transcribed),
            Arc::clone(&chunks_failed),
        );

        Self {
            id,
            config,
            created_at: Utc::now(),
            transcript,
            lane,
            chunks_transcribed,
            chunks_failed,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Queue a chunk onto this session's lane.
    ///
    /// The receiver resolves only after every earlier chunk of the session
    /// has completed.
    pub fn submit_chunk(&self, chunk: ChunkRef) -> oneshot::Receiver<Result<String>> {
        self.lane.submit(chunk)
    }

    /// Snapshot of the transcript accumulated so far.
    pub async fn transcript(&self) -> String {
        self.transcript.read().await.clone()
    }

    /// Diagnostic summary of this session.
    pub async fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id.clone(),
            model: self.config.model.clone(),
            language: self.config.language.clone(),
            created_at: self.created_at,
            chunks_transcribed: self.chunks_transcribed.load(Ordering::SeqCst),
            chunks_failed: self.chunks_failed.load(Ordering::SeqCst),
            transcript_chars: self.transcript.read().await.len(),
        }
    }
}
