use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use tokio::net::TcpListener;

use whisperfy::application::ports::{AccountRepository, IdentityVerifier};
use whisperfy::application::services::{CheckoutService, CreditLedger, TranscriptionService};
use whisperfy::domain::CheckoutBundle;
use whisperfy::infrastructure::audio::{EngineHandle, TranscriptionEngineFactory};
use whisperfy::infrastructure::fetch::HttpMediaFetcher;
use whisperfy::infrastructure::identity::JwtIdentityVerifier;
use whisperfy::infrastructure::observability::{TracingConfig, init_tracing};
use whisperfy::infrastructure::payments::StripeCheckoutGateway;
use whisperfy::infrastructure::persistence::{
    InMemoryAccountRepository, PgAccountRepository, create_pool, run_migrations,
};
use whisperfy::presentation::config::{AuthSettings, LedgerBackend, Settings};
use whisperfy::presentation::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (environment, settings) = Settings::load().context("loading settings")?;

    init_tracing(&TracingConfig::new(
        environment.as_str(),
        &settings.logging.level,
        settings.logging.json,
    ));

    let repository: Arc<dyn AccountRepository> = match settings.ledger.backend {
        LedgerBackend::Postgres => {
            let url = settings
                .database
                .url
                .as_deref()
                .context("database.url is required for the postgres ledger")?;
            let pool = create_pool(url, settings.database.max_connections).await?;
            run_migrations(&pool).await?;
            Arc::new(PgAccountRepository::new(pool))
        }
        LedgerBackend::Memory => {
            tracing::warn!("Using the in-memory ledger: balances do not survive a restart");
            Arc::new(InMemoryAccountRepository::new())
        }
    };

    let ledger = Arc::new(
        CreditLedger::new(repository)
            .with_starting_balance(settings.ledger.starting_balance),
    );

    let identity_verifier = build_identity_verifier(&settings.auth)?;

    let staging_dir = settings
        .staging
        .directory
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    let max_file_bytes = settings
        .staging
        .max_file_size_bytes()
        .context("staging.max_file_size_mb is too large")?;
    let media_fetcher = Arc::new(
        HttpMediaFetcher::new(staging_dir)?
            .with_fallback_extension(&settings.staging.fallback_extension)
            .with_max_bytes(max_file_bytes)
            .with_timeout(Duration::from_secs(settings.staging.timeout_secs)),
    );

    let engine = EngineHandle::global()
        .init_with(|| TranscriptionEngineFactory::create(&settings.transcription))?;

    let transcription_service = Arc::new(
        TranscriptionService::new(identity_verifier, media_fetcher, engine, ledger)
            .with_engine_timeout(Duration::from_secs(settings.transcription.timeout_secs)),
    );

    let checkout = &settings.checkout;
    let stripe_key = checkout.stripe_secret_key.clone().unwrap_or_else(|| {
        tracing::warn!("checkout.stripe_secret_key is not set; checkout requests will fail");
        String::new()
    });
    let checkout_service = Arc::new(CheckoutService::new(
        Arc::new(StripeCheckoutGateway::new(stripe_key, checkout.api_base.clone())),
        CheckoutBundle {
            product_name: checkout.product_name.clone(),
            unit_amount_cents: checkout.unit_amount_cents,
            currency: checkout.currency.clone(),
        },
        checkout.success_url.clone(),
        checkout.cancel_url.clone(),
    ));

    let router = create_router(AppState::new(transcription_service, checkout_service));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, environment = %environment, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_identity_verifier(auth: &AuthSettings) -> anyhow::Result<Arc<dyn IdentityVerifier>> {
    let verifier = match (&auth.jwt_public_key_pem, &auth.jwt_secret) {
        (Some(pem), _) if !pem.is_empty() => JwtIdentityVerifier::from_rsa_pem(pem)?,
        (_, Some(secret)) if !secret.is_empty() => JwtIdentityVerifier::from_secret(secret),
        _ => bail!("auth.jwt_secret or auth.jwt_public_key_pem must be set"),
    };

    Ok(Arc::new(
        verifier
            .with_issuer(auth.issuer.as_deref())
            .with_audience(auth.audience.as_deref()),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
