use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub ledger: LedgerSettings,
    pub auth: AuthSettings,
    pub transcription: TranscriptionSettings,
    pub staging: StagingSettings,
    pub checkout: CheckoutSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads `.env`, then layers `appsettings.<environment>` and `APP_*` variables
    /// (nested keys separated by `__`, e.g. `APP_CHECKOUT__STRIPE_SECRET_KEY`).
    pub fn load() -> Result<(Environment, Self), ConfigError> {
        dotenvy::dotenv().ok();

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(ConfigError::Message)?;

        let settings = Self::from_builder(
            Config::builder()
                .add_source(File::with_name(&environment.settings_file()).required(false))
                .add_source(
                    EnvironmentSource::with_prefix("APP")
                        .prefix_separator("_")
                        .separator("__"),
                ),
        )?;

        Ok((environment, settings))
    }

    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    pub backend: LedgerBackend,
    pub starting_balance: u64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::Memory,
            starting_balance: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub jwt_secret: Option<String>,
    pub jwt_public_key_pem: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: Option<String>,
    pub language: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            provider: TranscriptionProviderSetting::OpenAi,
            model: "whisper-1".to_string(),
            api_key: None,
            base_url: None,
            azure_deployment: None,
            azure_api_version: None,
            language: None,
            timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagingSettings {
    /// Defaults to the OS temp directory.
    pub directory: Option<String>,
    pub max_file_size_mb: u64,
    pub fallback_extension: String,
    pub timeout_secs: u64,
}

impl Default for StagingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            max_file_size_mb: 200,
            fallback_extension: ".mp4".to_string(),
            timeout_secs: 120,
        }
    }
}

impl StagingSettings {
    /// `None` when the configured size does not fit in a byte count.
    pub fn max_file_size_bytes(&self) -> Option<u64> {
        self.max_file_size_mb.checked_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckoutSettings {
    pub stripe_secret_key: Option<String>,
    pub api_base: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    pub unit_amount_cents: u64,
    pub currency: String,
    pub product_name: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            stripe_secret_key: None,
            api_base: None,
            success_url: "http://localhost:3000/success".to_string(),
            cancel_url: "http://localhost:3000/cancel".to_string(),
            unit_amount_cents: 500,
            currency: "usd".to_string(),
            product_name: "10,000 Coins".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
