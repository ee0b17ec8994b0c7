use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route(
            "/sessions",
            post(handlers::create_session).get(handlers::list_sessions),
        )
        // Chunk submission
        .route("/sessions/:session_id/chunks", post(handlers::upload_chunk))
        // Transcript queries
        .route(
            "/sessions/:session_id/transcript",
            get(handlers::get_transcript),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        // Browser capture clients upload from other origins
        .layer(CorsLayer::permissive())
        .with_state(state)
}
