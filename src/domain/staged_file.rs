use std::path::Path;

use tempfile::TempPath;

/// Local copy of a remotely referenced media file, owned by exactly one request.
///
/// The file is removed when the value is released or dropped, whichever
/// comes first, so cancelled requests do not leave it behind.
#[derive(Debug)]
pub struct StagedFile {
    path: Option<TempPath>,
    source_url: String,
    size_bytes: u64,
}

impl StagedFile {
    pub fn new(path: TempPath, source_url: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            path: Some(path),
            source_url: source_url.into(),
            size_bytes,
        }
    }

    /// Path of the staged bytes, `None` once released.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Deletes the staged file. Safe to call repeatedly.
    pub fn release(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        let shown = path.display().to_string();
        match path.close() {
            Ok(()) => tracing::debug!(path = %shown, "Staged file released"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %shown, "Staged file already gone");
            }
            Err(e) => tracing::warn!(error = %e, path = %shown, "Failed to remove staged file"),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        self.release();
    }
}
