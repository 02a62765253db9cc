use chrono::{DateTime, Utc};

use super::{SubjectId, TranscriptionId};

/// One committed transcription in a subject's history. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRecord {
    pub id: TranscriptionId,
    pub subject_id: SubjectId,
    pub source_url: String,
    pub transcript: String,
    pub preview: String,
    pub word_count: u64,
    pub created_at: DateTime<Utc>,
}

/// What the caller supplies to be recorded alongside a charge.
#[derive(Debug, Clone)]
pub struct TranscriptionPayload {
    pub source_url: String,
    pub transcript: String,
    pub preview: String,
}

impl TranscriptionRecord {
    pub fn new(subject_id: SubjectId, payload: TranscriptionPayload, word_count: u64) -> Self {
        Self {
            id: TranscriptionId::new(),
            subject_id,
            source_url: payload.source_url,
            transcript: payload.transcript,
            preview: payload.preview,
            word_count,
            created_at: Utc::now(),
        }
    }
}
