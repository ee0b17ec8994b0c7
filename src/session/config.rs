use serde::{Deserialize, Serialize};

/// Recognition configuration for a session, captured at creation and
/// immutable for the session's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Recognition model name (e.g. "base", "small.en")
    pub model: String,

    /// Language code (e.g. "en")
    pub language: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: "base".to_string(),
            language: "en".to_string(),
        }
    }
}

impl SessionConfig {
    /// Build a config from optional overrides, falling back to defaults.
    pub fn from_options(model: Option<String>, language: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            model: model.unwrap_or(defaults.model),
            language: language.unwrap_or(defaults.language),
        }
    }
}
