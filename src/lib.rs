pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod session;

pub use config::Config;
pub use engine::{Engine, MockEngine, WhisperCliEngine};
pub use error::{Result, TranscribeError};
pub use http::{create_router, AppState};
pub use session::{ChunkRef, Session, SessionConfig, SessionManager, SessionStore, SessionSummary};
