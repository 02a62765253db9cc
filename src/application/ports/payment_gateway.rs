use async_trait::async_trait;

use crate::domain::{CheckoutRequest, CheckoutSession};

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    RequestFailed(String),
    #[error("gateway rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected gateway response: {0}")]
    InvalidResponse(String),
}
