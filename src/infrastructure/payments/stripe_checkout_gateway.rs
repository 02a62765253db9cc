use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{GatewayError, PaymentGateway};
use crate::domain::{CheckoutRequest, CheckoutSession};

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Creates hosted Stripe Checkout sessions through the REST API.
pub struct StripeCheckoutGateway {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeCheckoutGateway {
    pub fn new(secret_key: String, api_base: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            api_base: api_base.unwrap_or_else(|| STRIPE_API_BASE.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

fn session_form(request: &CheckoutRequest) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "payment".to_string()),
        ("payment_method_types[0]", "card".to_string()),
        ("customer_email", request.buyer_email.clone()),
        (
            "line_items[0][price_data][currency]",
            request.bundle.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]",
            request.bundle.product_name.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]",
            request.bundle.unit_amount_cents.to_string(),
        ),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
    ]
}

#[async_trait]
impl PaymentGateway for StripeCheckoutGateway {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        let url = format!(
            "{}/v1/checkout/sessions",
            self.api_base.trim_end_matches('/')
        );

        tracing::debug!(
            amount_cents = request.bundle.unit_amount_cents,
            currency = %request.bundle.currency,
            "Requesting Stripe checkout session"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&session_form(request))
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(body);
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if session.id.is_empty() {
            return Err(GatewayError::InvalidResponse("empty session id".to_string()));
        }

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }
}
