/// The single token bundle offered for purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutBundle {
    pub product_name: String,
    pub unit_amount_cents: u64,
    pub currency: String,
}

impl Default for CheckoutBundle {
    fn default() -> Self {
        Self {
            product_name: "10,000 Coins".to_string(),
            unit_amount_cents: 500,
            currency: "usd".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub buyer_email: String,
    pub bundle: CheckoutBundle,
    pub success_url: String,
    pub cancel_url: String,
}

/// Gateway-issued session; `id` is opaque to this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}
