use std::sync::Arc;

use crate::application::services::{CheckoutService, CreditLedger, TranscriptionService};

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub checkout_service: Arc<CheckoutService>,
    pub ledger: Arc<CreditLedger>,
}

impl AppState {
    pub fn new(
        transcription_service: Arc<TranscriptionService>,
        checkout_service: Arc<CheckoutService>,
    ) -> Self {
        let ledger = Arc::clone(transcription_service.ledger());
        Self {
            transcription_service,
            checkout_service,
            ledger,
        }
    }
}
