use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct CheckoutRequestBody {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub id: String,
}

#[tracing::instrument(skip_all)]
pub async fn create_checkout_session_handler(
    State(state): State<AppState>,
    body: Result<Json<CheckoutRequestBody>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let email = body.ok().and_then(|Json(b)| b.email);

    let session = state
        .checkout_service
        .create_session(email.as_deref())
        .await?;

    Ok(Json(CheckoutResponse { id: session.id }))
}
