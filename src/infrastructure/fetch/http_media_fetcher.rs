use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::application::ports::{FetchError, MediaFetcher};
use crate::domain::StagedFile;
use crate::infrastructure::observability::sanitize_url;

pub const DEFAULT_FALLBACK_EXTENSION: &str = ".mp4";
const MAX_EXTENSION_LEN: usize = 8;

/// Downloads remote media over HTTP(S) into uniquely named files under a staging directory.
pub struct HttpMediaFetcher {
    client: reqwest::Client,
    staging_dir: PathBuf,
    fallback_extension: String,
    max_bytes: Option<u64>,
    timeout: Option<Duration>,
}

impl HttpMediaFetcher {
    pub fn new(staging_dir: PathBuf) -> Result<Self, FetchError> {
        std::fs::create_dir_all(&staging_dir)?;
        Ok(Self {
            client: reqwest::Client::new(),
            staging_dir,
            fallback_extension: DEFAULT_FALLBACK_EXTENSION.to_string(),
            max_bytes: None,
            timeout: None,
        })
    }

    pub fn with_fallback_extension(mut self, extension: &str) -> Self {
        let trimmed = extension.trim().trim_start_matches('.');
        if !trimmed.is_empty() {
            self.fallback_extension = format!(".{}", trimmed);
        }
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn download(&self, url: Url) -> Result<StagedFile, FetchError> {
        let log_url = sanitize_url(url.as_str());
        tracing::info!(url = %log_url, "Downloading media");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %log_url, status = status.as_u16(), "Media download refused");
            return Err(FetchError::Status(status.as_u16()));
        }

        if let (Some(limit), Some(length)) = (self.max_bytes, response.content_length()) {
            if length > limit {
                return Err(FetchError::TooLarge { limit_bytes: limit });
            }
        }

        let extension = staging_extension(&url, &self.fallback_extension);
        let (file, path) = tempfile::Builder::new()
            .prefix("whisperfy-")
            .suffix(&extension)
            .tempfile_in(&self.staging_dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);

        // Any early return below drops `path`, which removes the partial file.
        let mut stream = response.bytes_stream();
        let mut total_bytes: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| FetchError::Transport(e.to_string()))?;
            total_bytes += bytes.len() as u64;
            if let Some(limit) = self.max_bytes {
                if total_bytes > limit {
                    return Err(FetchError::TooLarge { limit_bytes: limit });
                }
            }
            file.write_all(&bytes).await?;
        }
        file.flush().await?;

        tracing::info!(
            url = %log_url,
            path = %path.display(),
            size_bytes = total_bytes,
            "Media staged"
        );

        Ok(StagedFile::new(path, url.as_str(), total_bytes))
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> Result<StagedFile, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.download(parsed))
                .await
                .map_err(|_| FetchError::Timeout(limit.as_secs()))?,
            None => self.download(parsed).await,
        }
    }
}

/// Extension of the last path segment (query and fragment ignored), with a leading dot.
pub fn staging_extension(url: &Url, fallback: &str) -> String {
    let last_segment = url
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("");

    match Path::new(last_segment).extension().and_then(|e| e.to_str()) {
        Some(ext)
            if !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => fallback.to_string(),
    }
}
