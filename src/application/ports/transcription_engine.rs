use std::path::Path;

use async_trait::async_trait;

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, file: &Path) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("reading media failed: {0}")]
    MediaUnreadable(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("unsupported media format: {0}")]
    UnsupportedFormat(String),
    #[error("engine initialisation failed: {0}")]
    ModelLoadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
