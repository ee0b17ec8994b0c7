//! Error types for live-scribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscribeError {
    // Session lookup errors
    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    // Engine errors
    #[error("Transcription engine failed: {message}")]
    EngineFailure { message: String },

    #[error("Engine produced no readable output at {path}")]
    OutputMissing { path: String },
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TranscribeError>;
