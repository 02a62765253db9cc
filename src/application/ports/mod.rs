mod account_repository;
mod identity_verifier;
mod media_fetcher;
mod payment_gateway;
mod repository_error;
mod transcription_engine;

pub use account_repository::{AccountRepository, CreateOutcome, DebitOutcome};
pub use identity_verifier::{AuthError, IdentityVerifier};
pub use media_fetcher::{FetchError, MediaFetcher};
pub use payment_gateway::{GatewayError, PaymentGateway};
pub use repository_error::RepositoryError;
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
