use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::application::services::{ErrorKind, TranscriptionReceipt};
use crate::presentation::handlers::credentials::bearer_credential;
use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    pub file_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeResponse {
    pub transcription: String,
    pub tokens_used: u64,
    pub tokens_remaining: u64,
    pub transcription_id: String,
}

impl From<TranscriptionReceipt> for TranscribeResponse {
    fn from(receipt: TranscriptionReceipt) -> Self {
        Self {
            transcription: receipt.transcription,
            tokens_used: receipt.tokens_used,
            tokens_remaining: receipt.tokens_remaining,
            transcription_id: receipt.transcription_id.to_string(),
        }
    }
}

#[tracing::instrument(skip_all)]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TranscribeRequest>, JsonRejection>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let credential = bearer_credential(&headers);

    let file_url = match body {
        Ok(Json(request)) => request.file_url,
        Err(rejection) => {
            // Unauthenticated callers get 401 before any body complaint.
            state.transcription_service.authenticate(credential).await?;
            return Err(ApiError::new(ErrorKind::Validation, rejection.body_text()));
        }
    };

    let receipt = state
        .transcription_service
        .transcribe(credential, file_url.as_deref())
        .await?;

    Ok(Json(receipt.into()))
}
