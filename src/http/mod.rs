//! HTTP API server for the browser capture client
//!
//! This module provides a REST API around the transcription core:
//! - POST /sessions - Create a transcription session
//! - POST /sessions/:id/chunks - Upload one audio chunk, get its text back
//! - GET /sessions/:id/transcript - Get the accumulated transcript
//! - GET /sessions - List session summaries
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
