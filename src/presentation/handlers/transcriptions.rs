use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::{ErrorKind, TranscribeError};
use crate::domain::{TranscriptionId, TranscriptionRecord};
use crate::presentation::handlers::credentials::bearer_credential;
use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionSummary {
    pub id: String,
    pub file_url: String,
    pub preview_text: String,
    pub word_count: u64,
    pub created_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionDetail {
    pub id: String,
    pub file_url: String,
    pub transcript: String,
    pub preview_text: String,
    pub word_count: u64,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub transcriptions: Vec<TranscriptionSummary>,
}

impl From<TranscriptionRecord> for TranscriptionSummary {
    fn from(r: TranscriptionRecord) -> Self {
        Self {
            id: r.id.to_string(),
            file_url: r.source_url,
            preview_text: r.preview,
            word_count: r.word_count,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

impl From<TranscriptionRecord> for TranscriptionDetail {
    fn from(r: TranscriptionRecord) -> Self {
        Self {
            id: r.id.to_string(),
            file_url: r.source_url,
            transcript: r.transcript,
            preview_text: r.preview,
            word_count: r.word_count,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip_all)]
pub async fn list_transcriptions_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let subject_id = state
        .transcription_service
        .authenticate(bearer_credential(&headers))
        .await?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let records = state
        .ledger
        .history(&subject_id, limit)
        .await
        .map_err(TranscribeError::from)?;

    Ok(Json(HistoryResponse {
        transcriptions: records.into_iter().map(Into::into).collect(),
    }))
}

#[tracing::instrument(skip(state, headers))]
pub async fn get_transcription_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<TranscriptionDetail>, ApiError> {
    let subject_id = state
        .transcription_service
        .authenticate(bearer_credential(&headers))
        .await?;

    let uuid = Uuid::parse_str(&id).map_err(|_| {
        ApiError::new(ErrorKind::Validation, format!("Invalid transcription ID: {}", id))
    })?;

    state
        .ledger
        .transcription(&subject_id, TranscriptionId::from_uuid(uuid))
        .await
        .map_err(TranscribeError::from)?
        .map(|record| Json(record.into()))
        .ok_or_else(|| ApiError::not_found(format!("Transcription not found: {}", id)))
}
