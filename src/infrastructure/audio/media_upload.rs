use std::path::Path;

use reqwest::multipart;

use crate::application::ports::TranscriptionError;

/// Reads a staged media file into a multipart part named after the file.
pub async fn media_part(file: &Path) -> Result<multipart::Part, TranscriptionError> {
    let data = tokio::fs::read(file)
        .await
        .map_err(|e| TranscriptionError::MediaUnreadable(format!("{}: {}", file.display(), e)))?;

    if data.is_empty() {
        return Err(TranscriptionError::MediaUnreadable("file is empty".to_string()));
    }

    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("media.mp4")
        .to_string();

    multipart::Part::bytes(data)
        .file_name(file_name)
        .mime_str(mime_for(file))
        .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))
}

fn mime_for(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3" | "mpga" | "mpeg") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("ogg" | "oga") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("webm") => "video/webm",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for(Path::new("/tmp/a.WAV")), "audio/wav");
        assert_eq!(mime_for(Path::new("/tmp/a.mp3")), "audio/mpeg");
        assert_eq!(mime_for(Path::new("/tmp/a.mp4")), "video/mp4");
        assert_eq!(mime_for(Path::new("/tmp/a")), "application/octet-stream");
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();

        let result = media_part(file.path()).await;

        assert!(matches!(result, Err(TranscriptionError::MediaUnreadable(_))));
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let result = media_part(Path::new("/nonexistent/whisperfy/clip.wav")).await;

        assert!(matches!(result, Err(TranscriptionError::MediaUnreadable(_))));
    }
}
