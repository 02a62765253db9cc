use std::sync::Arc;

use crate::application::ports::{AccountRepository, CreateOutcome, DebitOutcome, RepositoryError};
use crate::domain::{
    Account, SubjectId, TranscriptionId, TranscriptionPayload, TranscriptionRecord,
};

pub const DEFAULT_STARTING_BALANCE: u64 = 5000;

/// Owns every mutation of account balances.
///
/// A charge is a single conditional debit in the repository: the balance is
/// checked and reduced in one atomic step together with the history append,
/// so racing charges queue behind each other and none can overdraw.
pub struct CreditLedger {
    repository: Arc<dyn AccountRepository>,
    starting_balance: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeReceipt {
    pub transcription_id: TranscriptionId,
    pub tokens_used: u64,
    pub tokens_remaining: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("insufficient credit: {required} tokens required, {available} available")]
pub struct InsufficientCredit {
    pub required: u64,
    pub available: u64,
}

/// Result of a charge that reached the ledger. Faults are reported separately as `LedgerError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    Charged(ChargeReceipt),
    Rejected(InsufficientCredit),
}

impl CreditLedger {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self {
            repository,
            starting_balance: DEFAULT_STARTING_BALANCE,
        }
    }

    pub fn with_starting_balance(mut self, starting_balance: u64) -> Self {
        self.starting_balance = starting_balance;
        self
    }

    pub fn starting_balance(&self) -> u64 {
        self.starting_balance
    }

    #[tracing::instrument(skip(self), fields(subject_id = %subject_id))]
    pub async fn get_or_create(&self, subject_id: &SubjectId) -> Result<Account, LedgerError> {
        if let Some(account) = self.repository.get(subject_id).await? {
            return Ok(account);
        }

        let account = Account::new(subject_id.clone(), self.starting_balance);
        match self.repository.create(&account).await? {
            CreateOutcome::Created => {
                tracing::info!(
                    starting_balance = self.starting_balance,
                    "Provisioned account for new subject"
                );
                Ok(account)
            }
            CreateOutcome::AlreadyExists => {
                tracing::debug!("Account created concurrently, using stored one");
                self.repository
                    .get(subject_id)
                    .await?
                    .ok_or_else(|| LedgerError::AccountMissing(subject_id.clone()))
            }
        }
    }

    #[tracing::instrument(skip(self, payload), fields(subject_id = %subject_id))]
    pub async fn charge_and_append(
        &self,
        subject_id: &SubjectId,
        word_count: u64,
        payload: TranscriptionPayload,
    ) -> Result<ChargeOutcome, LedgerError> {
        self.get_or_create(subject_id).await?;

        let record = TranscriptionRecord::new(subject_id.clone(), payload, word_count);
        match self.repository.debit_and_append(&record).await? {
            DebitOutcome::Applied(account) => {
                tracing::info!(
                    tokens_used = word_count,
                    tokens_remaining = account.token_balance,
                    transcription_id = %record.id,
                    "Charge committed"
                );
                Ok(ChargeOutcome::Charged(ChargeReceipt {
                    transcription_id: record.id,
                    tokens_used: word_count,
                    tokens_remaining: account.token_balance,
                }))
            }
            DebitOutcome::Insufficient { available } => {
                tracing::info!(
                    required = word_count,
                    available,
                    "Charge rejected: insufficient credit"
                );
                Ok(ChargeOutcome::Rejected(InsufficientCredit {
                    required: word_count,
                    available,
                }))
            }
            DebitOutcome::AccountMissing => {
                tracing::warn!("Account disappeared before debit");
                Err(LedgerError::AccountMissing(subject_id.clone()))
            }
        }
    }

    pub async fn history(
        &self,
        subject_id: &SubjectId,
        limit: usize,
    ) -> Result<Vec<TranscriptionRecord>, LedgerError> {
        Ok(self
            .repository
            .list_transcriptions(subject_id, limit)
            .await?)
    }

    pub async fn transcription(
        &self,
        subject_id: &SubjectId,
        id: TranscriptionId,
    ) -> Result<Option<TranscriptionRecord>, LedgerError> {
        Ok(self.repository.get_transcription(subject_id, id).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("account for {0} vanished after creation")]
    AccountMissing(SubjectId),
}
