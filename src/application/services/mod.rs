mod checkout_service;
mod credit_ledger;
mod error_kind;
mod transcription_service;
mod word_count;

pub use checkout_service::{CheckoutError, CheckoutService};
pub use credit_ledger::{
    ChargeOutcome, ChargeReceipt, CreditLedger, DEFAULT_STARTING_BALANCE, InsufficientCredit,
    LedgerError,
};
pub use error_kind::ErrorKind;
pub use transcription_service::{TranscribeError, TranscriptionReceipt, TranscriptionService};
pub use word_count::{count_words, preview};
