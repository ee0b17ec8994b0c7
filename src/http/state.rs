use crate::session::SessionManager;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Transcription core entry points
    pub manager: Arc<SessionManager>,

    /// Directory uploaded chunk audio is persisted into before submission
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(manager: Arc<SessionManager>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            manager,
            upload_dir: upload_dir.into(),
        }
    }
}
