use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::{AccountRepository, CreateOutcome, DebitOutcome, RepositoryError};
use crate::domain::{Account, SubjectId, TranscriptionId, TranscriptionRecord};

#[derive(Default)]
struct Ledger {
    accounts: HashMap<SubjectId, Account>,
    transcriptions: HashMap<SubjectId, Vec<TranscriptionRecord>>,
}

/// Process-local account store. Account updates and history appends happen
/// under one lock, so they are observed together or not at all.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    inner: Mutex<Ledger>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get(&self, subject_id: &SubjectId) -> Result<Option<Account>, RepositoryError> {
        let ledger = self.inner.lock().await;
        Ok(ledger.accounts.get(subject_id).cloned())
    }

    async fn create(&self, account: &Account) -> Result<CreateOutcome, RepositoryError> {
        let mut ledger = self.inner.lock().await;
        if ledger.accounts.contains_key(&account.subject_id) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        ledger
            .accounts
            .insert(account.subject_id.clone(), account.clone());
        Ok(CreateOutcome::Created)
    }

    async fn debit_and_append(
        &self,
        record: &TranscriptionRecord,
    ) -> Result<DebitOutcome, RepositoryError> {
        let mut ledger = self.inner.lock().await;

        let Some(stored) = ledger.accounts.get_mut(&record.subject_id) else {
            return Ok(DebitOutcome::AccountMissing);
        };
        let Some(updated) = stored.charged(record.word_count) else {
            return Ok(DebitOutcome::Insufficient {
                available: stored.token_balance,
            });
        };

        *stored = updated.clone();
        ledger
            .transcriptions
            .entry(record.subject_id.clone())
            .or_default()
            .push(record.clone());

        Ok(DebitOutcome::Applied(updated))
    }

    async fn list_transcriptions(
        &self,
        subject_id: &SubjectId,
        limit: usize,
    ) -> Result<Vec<TranscriptionRecord>, RepositoryError> {
        let ledger = self.inner.lock().await;
        Ok(ledger
            .transcriptions
            .get(subject_id)
            .map(|records| records.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_transcription(
        &self,
        subject_id: &SubjectId,
        id: TranscriptionId,
    ) -> Result<Option<TranscriptionRecord>, RepositoryError> {
        let ledger = self.inner.lock().await;
        Ok(ledger
            .transcriptions
            .get(subject_id)
            .and_then(|records| records.iter().find(|r| r.id == id).cloned()))
    }
}
