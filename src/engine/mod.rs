//! Transcription engine adapters
//!
//! The engine is an opaque external operation: one invocation per audio
//! chunk, parameterized by model, language, and a continuity prompt (the
//! transcript accumulated so far). Implementations may be slow or fail;
//! callers get a typed error rather than a crash.

mod whisper;

pub use whisper::{sanitize_context, WhisperCliEngine};

use crate::error::{Result, TranscribeError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Trait for speech-to-text engines.
///
/// This trait allows swapping implementations (real whisper CLI vs mock).
#[async_trait]
pub trait Engine: Send + Sync {
    /// Transcribe one audio chunk.
    ///
    /// Returns the text recognized for this chunk only, never the cumulative
    /// transcript. `context` biases recognition toward vocabulary already
    /// seen in the session.
    async fn transcribe(
        &self,
        audio: &Path,
        model: &str,
        language: &str,
        context: &str,
    ) -> Result<String>;
}

/// One recorded engine invocation, kept by [`MockEngine`] for assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub audio: PathBuf,
    pub model: String,
    pub language: String,
    pub context: String,
}

/// Scripted outcome for a single mock invocation.
struct Scripted {
    text: Option<String>,
    delay: Duration,
}

/// Mock engine for testing.
///
/// By default every call returns a fixed text. Individual calls can be
/// scripted in FIFO order with their own text, delay, or failure, and the
/// mock records every invocation plus the maximum number of calls it ever
/// saw in flight at once.
pub struct MockEngine {
    default_text: String,
    echo_stem: bool,
    always_fail: bool,
    delay: Duration,
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            default_text: "mock transcription".to_string(),
            echo_stem: false,
            always_fail: false,
            delay: Duration::ZERO,
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Return this text for every unscripted call.
    pub fn with_response(mut self, text: &str) -> Self {
        self.default_text = text.to_string();
        self
    }

    /// Return the audio file's stem for every unscripted call.
    pub fn echoing_stem(mut self) -> Self {
        self.echo_stem = true;
        self
    }

    /// Fail every unscripted call.
    pub fn with_failure(mut self) -> Self {
        self.always_fail = true;
        self
    }

    /// Sleep this long inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Script the next call to succeed with `text` after `delay`.
    pub fn enqueue_response(&self, text: &str, delay: Duration) {
        self.script.lock().unwrap().push_back(Scripted {
            text: Some(text.to_string()),
            delay,
        });
    }

    /// Script the next call to fail.
    pub fn enqueue_failure(&self) {
        self.script.lock().unwrap().push_back(Scripted {
            text: None,
            delay: Duration::ZERO,
        });
    }

    /// Every invocation seen so far, in call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The most invocations ever observed running concurrently.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn transcribe(
        &self,
        audio: &Path,
        model: &str,
        language: &str,
        context: &str,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            audio: audio.to_path_buf(),
            model: model.to_string(),
            language: language.to_string(),
            context: context.to_string(),
        });

        let entered = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(entered, Ordering::SeqCst);

        let scripted = self.script.lock().unwrap().pop_front();
        let (text, delay) = match scripted {
            Some(Scripted { text, delay }) => (text, delay),
            None if self.always_fail => (None, self.delay),
            None if self.echo_stem => (
                Some(audio.file_stem().unwrap_or_default().to_string_lossy().into_owned()),
                self.delay,
            ),
            None => (Some(self.default_text.clone()), self.delay),
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        text.ok_or_else(|| TranscribeError::EngineFailure {
            message: "mock engine failure".to_string(),
        })
    }
}
