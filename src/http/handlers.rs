use super::state::AppState;
use crate::error::TranscribeError;
use crate::session::{ChunkRef, SessionConfig};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Recognition model name (default: "base")
    pub model: Option<String>,

    /// Language code (default: "en")
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub model: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct ChunkResponse {
    /// Text recognized for this chunk only (not the cumulative transcript)
    pub chunk_text: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_status(e: &TranscribeError) -> StatusCode {
    match e {
        TranscribeError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        TranscribeError::EngineFailure { .. } | TranscribeError::OutputMissing { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions
/// Create a new transcription session
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> impl IntoResponse {
    let Json(req) = body.unwrap_or_default();

    let config = SessionConfig::from_options(req.model, req.language);
    let model = config.model.clone();
    let language = config.language.clone();

    let session_id = state.manager.create_session(config).await;

    info!("Session created: {}", session_id);

    (
        StatusCode::OK,
        Json(CreateSessionResponse {
            session_id,
            model,
            language,
        }),
    )
        .into_response()
}

/// POST /sessions/:session_id/chunks
/// Receive one audio chunk, transcribe it in session order, return its text
pub async fn upload_chunk(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    // Pull the audio_chunk field out of the multipart body
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("audio_chunk") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Missing multipart field: audio_chunk".to_string(),
                    }),
                )
                    .into_response();
            }
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Malformed multipart body: {}", e),
                    }),
                )
                    .into_response();
            }
        }
    };

    let extension = field
        .file_name()
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
        .unwrap_or_else(|| "ogg".to_string());

    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read chunk body: {}", e),
                }),
            )
                .into_response();
        }
    };

    // Persist the chunk before it enters the core; the lane owns the file
    // from submission onward.
    let chunk_path = state
        .upload_dir
        .join(format!("chunk-{}.{}", uuid::Uuid::new_v4(), extension));

    if let Err(e) = tokio::fs::write(&chunk_path, &bytes).await {
        error!("Failed to persist chunk {}: {}", chunk_path.display(), e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to persist chunk: {}", e),
            }),
        )
            .into_response();
    }

    match state
        .manager
        .submit_chunk(&session_id, ChunkRef::new(&chunk_path))
        .await
    {
        Ok(chunk_text) => (StatusCode::OK, Json(ChunkResponse { chunk_text })).into_response(),
        Err(e) => {
            if matches!(&e, TranscribeError::SessionNotFound { .. }) {
                // The chunk never entered a lane; don't leave the file behind
                if let Err(remove_err) = tokio::fs::remove_file(&chunk_path).await {
                    warn!(
                        "Failed to remove stray chunk {}: {}",
                        chunk_path.display(),
                        remove_err
                    );
                }
            }
            (
                error_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /sessions/:session_id/transcript
/// Get the transcript accumulated so far
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.manager.transcript(&session_id).await {
        Ok(transcript) => (StatusCode::OK, Json(TranscriptResponse { transcript })).into_response(),
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /sessions
/// List summaries of all live sessions (diagnostic)
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    let summaries = state.manager.list_sessions().await;
    (StatusCode::OK, Json(summaries)).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
