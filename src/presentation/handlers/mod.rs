mod account;
mod checkout;
mod credentials;
mod error;
mod health;
mod transcribe;
mod transcriptions;

pub use account::account_handler;
pub use checkout::create_checkout_session_handler;
pub use credentials::bearer_credential;
pub use error::{ApiError, ErrorResponse, status_for};
pub use health::{health_handler, root_handler};
pub use transcribe::transcribe_handler;
pub use transcriptions::{get_transcription_handler, list_transcriptions_handler};
