use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Serialize;

use crate::presentation::handlers::credentials::bearer_credential;
use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub token_balance: u64,
    pub words_transcribed_total: u64,
    pub transcription_count: u64,
    pub created_at: String,
}

#[tracing::instrument(skip_all)]
pub async fn account_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .transcription_service
        .account(bearer_credential(&headers))
        .await?;

    Ok(Json(AccountResponse {
        token_balance: account.token_balance,
        words_transcribed_total: account.words_transcribed_total,
        transcription_count: account.transcription_count,
        created_at: account.created_at.to_rfc3339(),
    }))
}
