use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    AuthError, FetchError, IdentityVerifier, MediaFetcher, TranscriptionEngine,
    TranscriptionError,
};
use crate::domain::{Account, StagedFile, SubjectId, TranscriptionId, TranscriptionPayload};

use super::credit_ledger::{ChargeOutcome, CreditLedger, InsufficientCredit, LedgerError};
use super::error_kind::ErrorKind;
use super::word_count::{count_words, preview};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionReceipt {
    pub transcription_id: TranscriptionId,
    pub transcription: String,
    pub tokens_used: u64,
    pub tokens_remaining: u64,
}

/// Runs one transcription request end to end:
/// authenticate, stage the remote file, transcribe it, then charge.
///
/// The staged file is released as soon as the engine returns, whatever the
/// result. The charge is spawned onto its own task so that a caller hanging up
/// cannot interrupt a debit that has already started.
pub struct TranscriptionService {
    identity_verifier: Arc<dyn IdentityVerifier>,
    media_fetcher: Arc<dyn MediaFetcher>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    ledger: Arc<CreditLedger>,
    engine_timeout: Option<Duration>,
}

impl TranscriptionService {
    pub fn new(
        identity_verifier: Arc<dyn IdentityVerifier>,
        media_fetcher: Arc<dyn MediaFetcher>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        ledger: Arc<CreditLedger>,
    ) -> Self {
        Self {
            identity_verifier,
            media_fetcher,
            transcription_engine,
            ledger,
            engine_timeout: None,
        }
    }

    pub fn with_engine_timeout(mut self, timeout: Duration) -> Self {
        self.engine_timeout = Some(timeout);
        self
    }

    pub fn ledger(&self) -> &Arc<CreditLedger> {
        &self.ledger
    }

    pub async fn authenticate(
        &self,
        credential: Option<&str>,
    ) -> Result<SubjectId, TranscribeError> {
        let credential = credential
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::MissingCredential)?;
        let subject_id = self.identity_verifier.verify(credential).await?;
        tracing::debug!(subject_id = %subject_id, "Caller authenticated");
        Ok(subject_id)
    }

    /// Authenticates and returns the caller's account, provisioning it on first use.
    pub async fn account(&self, credential: Option<&str>) -> Result<Account, TranscribeError> {
        let subject_id = self.authenticate(credential).await?;
        Ok(self.ledger.get_or_create(&subject_id).await?)
    }

    #[tracing::instrument(skip_all)]
    pub async fn transcribe(
        &self,
        credential: Option<&str>,
        file_url: Option<&str>,
    ) -> Result<TranscriptionReceipt, TranscribeError> {
        let subject_id = self.authenticate(credential).await?;

        let file_url = file_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| TranscribeError::Validation("fileUrl is required".to_string()))?;

        let mut staged = self.media_fetcher.fetch(file_url).await?;
        tracing::info!(
            subject_id = %subject_id,
            size_bytes = staged.size_bytes(),
            "Media staged, transcribing"
        );

        let transcript = self.run_engine(&staged).await;
        staged.release();
        let transcript = transcript?;

        let word_count = count_words(&transcript);
        let payload = TranscriptionPayload {
            source_url: staged.source_url().to_string(),
            transcript: transcript.clone(),
            preview: preview(&transcript),
        };

        let ledger = Arc::clone(&self.ledger);
        let charge_subject = subject_id.clone();
        let outcome = tokio::spawn(async move {
            ledger
                .charge_and_append(&charge_subject, word_count, payload)
                .await
        })
        .await
        .map_err(|e| TranscribeError::Internal(format!("charge task failed: {}", e)))??;

        match outcome {
            ChargeOutcome::Charged(receipt) => Ok(TranscriptionReceipt {
                transcription_id: receipt.transcription_id,
                transcription: transcript,
                tokens_used: receipt.tokens_used,
                tokens_remaining: receipt.tokens_remaining,
            }),
            ChargeOutcome::Rejected(rejection) => Err(TranscribeError::InsufficientCredit(rejection)),
        }
    }

    async fn run_engine(&self, staged: &StagedFile) -> Result<String, TranscribeError> {
        let path = staged.path().ok_or_else(|| {
            TranscribeError::Internal("staged file released before transcription".to_string())
        })?;

        let call = self.transcription_engine.transcribe(path);
        let transcript = match self.engine_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| TranscribeError::EngineTimeout(limit.as_secs()))??,
            None => call.await?,
        };

        tracing::debug!(chars = transcript.len(), "Engine returned transcript");
        Ok(transcript)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Validation(String),
    #[error("fetching file: {0}")]
    Fetch(#[from] FetchError),
    #[error("transcription engine: {0}")]
    Engine(#[from] TranscriptionError),
    #[error("transcription engine timed out after {0} seconds")]
    EngineTimeout(u64),
    #[error(transparent)]
    InsufficientCredit(InsufficientCredit),
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl TranscribeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranscribeError::Auth(_) => ErrorKind::Auth,
            TranscribeError::Validation(_) => ErrorKind::Validation,
            TranscribeError::Fetch(_) => ErrorKind::Fetch,
            TranscribeError::Engine(_) | TranscribeError::EngineTimeout(_) => ErrorKind::Engine,
            TranscribeError::InsufficientCredit(_) => ErrorKind::InsufficientCredit,
            TranscribeError::Ledger(_) | TranscribeError::Internal(_) => ErrorKind::Internal,
        }
    }
}
