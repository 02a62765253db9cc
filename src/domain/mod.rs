mod account;
mod checkout;
mod staged_file;
mod subject_id;
mod transcription_id;
mod transcription_record;

pub use account::Account;
pub use checkout::{CheckoutBundle, CheckoutRequest, CheckoutSession};
pub use staged_file::StagedFile;
pub use subject_id::SubjectId;
pub use transcription_id::TranscriptionId;
pub use transcription_record::{TranscriptionPayload, TranscriptionRecord};
