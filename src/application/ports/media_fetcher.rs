use async_trait::async_trait;

use crate::domain::StagedFile;

#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Downloads `url` into a uniquely named staged file.
    async fn fetch(&self, url: &str) -> Result<StagedFile, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid file url: {0}")]
    InvalidUrl(String),
    #[error("remote responded with status {0}")]
    Status(u16),
    #[error("download failed: {0}")]
    Transport(String),
    #[error("file exceeds {limit_bytes} bytes")]
    TooLarge { limit_bytes: u64 },
    #[error("download timed out after {0} seconds")]
    Timeout(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
