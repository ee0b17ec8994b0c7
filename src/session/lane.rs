use super::chunk::ChunkRef;
use super::config::SessionConfig;
use crate::engine::Engine;
use crate::error::{Result, TranscribeError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, error, warn};

/// One queued chunk plus the handle its submitter is waiting on.
struct ChunkJob {
    chunk: ChunkRef,
    reply: oneshot::Sender<Result<String>>,
}

/// Per-session serialized execution lane.
///
/// An unbounded channel feeds a single consumer task, which makes the core
/// guarantees structural rather than emergent: chunks are transcribed in the
/// exact order they were accepted, at most one engine call per session is
/// ever in flight, and chunk n+1 does not start until chunk n's result has
/// been folded into the transcript. The task sits idle on `recv()` when the
/// queue is empty and resumes immediately on the next submission.
pub struct ChunkLane {
    tx: mpsc::UnboundedSender<ChunkJob>,
}

impl ChunkLane {
    /// Spawn the lane's consumer task for one session.
    pub fn spawn(
        session_id: String,
        config: SessionConfig,
        transcript: Arc<RwLock<String>>,
        engine: Arc<dyn Engine>,
        chunks_transcribed: Arc<AtomicUsize>,
        chunks_failed: Arc<AtomicUsize>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(drain(
            session_id,
            config,
            transcript,
            engine,
            chunks_transcribed,
            chunks_failed,
            rx,
        ));

        Self { tx }
    }

    /// Enqueue a chunk.
    ///
    /// The returned receiver resolves with this chunk's text once every
    /// earlier chunk of the session has completed and this one has been
    /// transcribed, or with the chunk's own error.
    pub fn submit(&self, chunk: ChunkRef) -> oneshot::Receiver<Result<String>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job = ChunkJob {
            chunk,
            reply: reply_tx,
        };

        if let Err(mpsc::error::SendError(job)) = self.tx.send(job) {
            // Consumer task is gone; fail the submission instead of leaving
            // the caller waiting forever.
            let _ = job.reply.send(Err(TranscribeError::EngineFailure {
                message: "session lane is no longer running".to_string(),
            }));
        }

        reply_rx
    }
}

/// Single consumer: drains one session's chunks strictly in order.
async fn drain(
    session_id: String,
    config: SessionConfig,
    transcript: Arc<RwLock<String>>,
    engine: Arc<dyn Engine>,
    chunks_transcribed: Arc<AtomicUsize>,
    chunks_failed: Arc<AtomicUsize>,
    mut rx: mpsc::UnboundedReceiver<ChunkJob>,
) {
    debug!("Lane started for session {}", session_id);

    while let Some(job) = rx.recv().await {
        // Snapshot of the transcript so far, fed to the engine as the
        // continuity prompt. This lane is the transcript's only writer.
        let context = transcript.read().await.clone();

        let result = engine
            .transcribe(
                &job.chunk.audio_path,
                &config.model,
                &config.language,
                &context,
            )
            .await;

        match result {
            Ok(text) => {
                if !text.is_empty() {
                    let mut full = transcript.write().await;
                    if !full.is_empty() {
                        full.push(' ');
                    }
                    full.push_str(&text);
                }

                chunks_transcribed.fetch_add(1, Ordering::SeqCst);
                release_audio(&session_id, &job.chunk).await;

                let _ = job.reply.send(Ok(text));
            }
            Err(e) => {
                // Transcript untouched; the audio file is retained for
                // diagnostics. The failure is local to this chunk and the
                // lane keeps draining.
                error!(
                    "Session {}: chunk {} failed: {}",
                    session_id,
                    job.chunk.audio_path.display(),
                    e
                );

                chunks_failed.fetch_add(1, Ordering::SeqCst);

                let _ = job.reply.send(Err(e));
            }
        }
    }

    debug!("Lane stopped for session {}", session_id);
}

/// Best-effort removal of a transcribed chunk's audio file. Failure is
/// logged and never surfaced: cleanup must not block transcript progress.
async fn release_audio(session_id: &str, chunk: &ChunkRef) {
    if let Err(e) = tokio::fs::remove_file(&chunk.audio_path).await {
        warn!(
            "Session {}: failed to remove chunk audio {}: {}",
            session_id,
            chunk.audio_path.display(),
            e
        );
    }
}
