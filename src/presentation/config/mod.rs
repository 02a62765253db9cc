mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AuthSettings, CheckoutSettings, DatabaseSettings, LedgerBackend, LedgerSettings,
    LoggingSettings, ServerSettings, Settings, StagingSettings, TranscriptionProviderSetting,
    TranscriptionSettings,
};
