use std::path::PathBuf;

/// Reference to one uploaded audio segment awaiting transcription.
///
/// The transport layer persists the bytes to disk before handing the chunk
/// to the core. From enqueue until the chunk is transcribed or declared
/// failed, the file is owned exclusively by the session's lane: nothing else
/// may delete or rewrite it.
#[derive(Debug, Clone)]
pub struct ChunkRef {
    /// Location of the audio payload on disk
    pub audio_path: PathBuf,
}

impl ChunkRef {
    pub fn new(audio_path: impl Into<PathBuf>) -> Self {
        Self {
            audio_path: audio_path.into(),
        }
    }
}
