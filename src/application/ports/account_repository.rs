use async_trait::async_trait;

use crate::domain::{Account, SubjectId, TranscriptionId, TranscriptionRecord};

use super::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebitOutcome {
    /// Balance debited and record appended; carries the account as committed.
    Applied(Account),
    Insufficient { available: u64 },
    AccountMissing,
}

/// Durable store of accounts and their transcription history.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get(&self, subject_id: &SubjectId) -> Result<Option<Account>, RepositoryError>;

    /// Inserts `account` unless one already exists for its subject.
    async fn create(&self, account: &Account) -> Result<CreateOutcome, RepositoryError>;

    /// Debits `record.word_count` tokens and appends `record`, both or neither.
    ///
    /// The balance check and the debit are one atomic step against the stored
    /// balance, so concurrent debits serialise instead of failing.
    async fn debit_and_append(
        &self,
        record: &TranscriptionRecord,
    ) -> Result<DebitOutcome, RepositoryError>;

    /// Newest first.
    async fn list_transcriptions(
        &self,
        subject_id: &SubjectId,
        limit: usize,
    ) -> Result<Vec<TranscriptionRecord>, RepositoryError>;

    async fn get_transcription(
        &self,
        subject_id: &SubjectId,
        id: TranscriptionId,
    ) -> Result<Option<TranscriptionRecord>, RepositoryError>;
}
