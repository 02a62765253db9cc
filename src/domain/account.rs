use chrono::{DateTime, Utc};

use super::SubjectId;

/// Per-subject credit balance and usage counters.
///
/// `version` increases by one on every committed charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub subject_id: SubjectId,
    pub token_balance: u64,
    pub words_transcribed_total: u64,
    pub transcription_count: u64,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(subject_id: SubjectId, starting_balance: u64) -> Self {
        let now = Utc::now();
        Self {
            subject_id,
            token_balance: starting_balance,
            words_transcribed_total: 0,
            transcription_count: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the account as it would look after a charge of `words`,
    /// or `None` when the balance cannot cover it.
    pub fn charged(&self, words: u64) -> Option<Self> {
        let token_balance = self.token_balance.checked_sub(words)?;
        Some(Self {
            subject_id: self.subject_id.clone(),
            token_balance,
            words_transcribed_total: self.words_transcribed_total.saturating_add(words),
            transcription_count: self.transcription_count.saturating_add(1),
            version: self.version + 1,
            created_at: self.created_at,
            updated_at: Utc::now(),
        })
    }
}
