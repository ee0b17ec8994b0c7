use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Diagnostic snapshot of one session, as returned by the session listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier
    pub session_id: String,

    /// Recognition model the session was created with
    pub model: String,

    /// Language code the session was created with
    pub language: String,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// Chunks transcribed successfully so far
    pub chunks_transcribed: usize,

    /// Chunks that failed in the engine
    pub chunks_failed: usize,

    /// Length of the accumulated transcript, in characters
    pub transcript_chars: usize,
}
