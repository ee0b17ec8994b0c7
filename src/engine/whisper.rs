use super::Engine;
use crate::error::{Result, TranscribeError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, warn};

/// Engine adapter that shells out to the `whisper` CLI.
///
/// One invocation per chunk. The CLI writes `<audio stem>.txt` into
/// `output_dir`; that file holds exactly this chunk's text and is removed on
/// every exit path. The audio file itself is owned by the caller and is not
/// touched here.
pub struct WhisperCliEngine {
    binary: String,
    output_dir: PathBuf,
}

impl WhisperCliEngine {
    pub fn new(binary: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Path of the transcript file the CLI will produce for `audio`.
    fn output_path_for(&self, audio: &Path) -> PathBuf {
        let stem = audio
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_default();
        let mut path = self.output_dir.join(stem);
        path.set_extension("txt");
        path
    }
}

#[async_trait]
impl Engine for WhisperCliEngine {
    async fn transcribe(
        &self,
        audio: &Path,
        model: &str,
        language: &str,
        context: &str,
    ) -> Result<String> {
        let output_path = self.output_path_for(audio);
        let prompt = sanitize_context(context);

        debug!(
            "Invoking {} on {} (model={}, language={})",
            self.binary,
            audio.display(),
            model,
            language
        );

        // Arguments are passed as discrete argv entries, never through a
        // shell. The prompt is still sanitized: quote characters confuse
        // whisper's own prompt parsing.
        let output = Command::new(&self.binary)
            .arg(audio)
            .args(["--model", model])
            .arg("--output_dir")
            .arg(&self.output_dir)
            .args(["--language", language])
            .args(["--output_format", "txt"])
            .args(["--initial_prompt", &prompt])
            .output()
            .await
            .map_err(|e| TranscribeError::EngineFailure {
                message: format!("failed to run {}: {}", self.binary, e),
            })?;

        if !output.status.success() {
            // The engine may have partially written its transcript file
            remove_artifact(&output_path).await;
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscribeError::EngineFailure {
                message: format!(
                    "{} exited with {}: {}",
                    self.binary,
                    output.status,
                    stderr.trim()
                ),
            });
        }

        let text = match tokio::fs::read_to_string(&output_path).await {
            Ok(contents) => contents.trim().to_string(),
            Err(_) => {
                return Err(TranscribeError::OutputMissing {
                    path: output_path.display().to_string(),
                });
            }
        };

        remove_artifact(&output_path).await;

        Ok(text)
    }
}

/// Best-effort removal of a transcript artifact.
async fn remove_artifact(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove engine output {}: {}", path.display(), e);
        }
    }
}

/// Strip characters from the continuity prompt that are unsafe at the engine
/// invocation boundary. Quote characters are removed outright; newlines
/// become single spaces so the prompt stays one argument-friendly line.
pub fn sanitize_context(context: &str) -> String {
    context
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '`'))
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
