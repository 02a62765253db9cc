use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{CheckoutError, ErrorKind, TranscribeError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub kind: &'static str,
}

/// An error already mapped to its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    detail: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            status: status_for(kind),
            kind: kind.as_str(),
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            kind: "not_found",
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Auth => StatusCode::UNAUTHORIZED,
        ErrorKind::Validation | ErrorKind::Fetch => StatusCode::BAD_REQUEST,
        ErrorKind::InsufficientCredit => StatusCode::FORBIDDEN,
        ErrorKind::Engine | ErrorKind::Gateway | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<TranscribeError> for ApiError {
    fn from(e: TranscribeError) -> Self {
        let kind = e.kind();
        if kind.is_fault() {
            tracing::error!(error = %e, kind = %kind, "Transcription request failed");
        } else {
            tracing::info!(error = %e, kind = %kind, "Transcription request refused");
        }
        Self::new(kind, e.to_string())
    }
}

impl From<CheckoutError> for ApiError {
    fn from(e: CheckoutError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                detail: self.detail,
                kind: self.kind,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_credit_is_not_a_server_error() {
        assert_eq!(status_for(ErrorKind::InsufficientCredit), StatusCode::FORBIDDEN);
        assert_ne!(
            status_for(ErrorKind::InsufficientCredit),
            status_for(ErrorKind::Engine)
        );
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(status_for(ErrorKind::Auth), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Fetch), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_is_distinct_from_validation() {
        assert_eq!(ApiError::not_found("missing").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::new(ErrorKind::Validation, "bad").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn faults_map_to_500() {
        for kind in [ErrorKind::Engine, ErrorKind::Gateway, ErrorKind::Internal] {
            assert_eq!(status_for(kind), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
