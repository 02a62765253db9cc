use std::sync::Arc;

use crate::application::ports::{GatewayError, PaymentGateway};
use crate::domain::{CheckoutBundle, CheckoutRequest, CheckoutSession};

use super::error_kind::ErrorKind;

/// Mints payment-gateway checkout sessions for the fixed token bundle.
/// Has no link to the ledger: purchased tokens are credited elsewhere.
pub struct CheckoutService {
    gateway: Arc<dyn PaymentGateway>,
    bundle: CheckoutBundle,
    success_url: String,
    cancel_url: String,
}

impl CheckoutService {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        bundle: CheckoutBundle,
        success_url: String,
        cancel_url: String,
    ) -> Self {
        Self {
            gateway,
            bundle,
            success_url,
            cancel_url,
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn create_session(
        &self,
        buyer_email: Option<&str>,
    ) -> Result<CheckoutSession, CheckoutError> {
        let email = buyer_email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| CheckoutError::Validation("email is required".to_string()))?;

        if !email.contains('@') {
            return Err(CheckoutError::Validation(format!(
                "invalid email address: {}",
                email
            )));
        }

        let request = CheckoutRequest {
            buyer_email: email.to_string(),
            bundle: self.bundle.clone(),
            success_url: self.success_url.clone(),
            cancel_url: self.cancel_url.clone(),
        };

        let session = self.gateway.create_session(&request).await.map_err(|e| {
            tracing::error!(error = %e, "Checkout session creation failed");
            CheckoutError::Gateway(e)
        })?;

        tracing::info!(
            session_id = %session.id,
            amount_cents = self.bundle.unit_amount_cents,
            "Checkout session created"
        );
        Ok(session)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(String),
    #[error("payment gateway: {0}")]
    Gateway(#[from] GatewayError),
}

impl CheckoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckoutError::Validation(_) => ErrorKind::Validation,
            CheckoutError::Gateway(_) => ErrorKind::Gateway,
        }
    }
}
