use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{AccountRepository, CreateOutcome, DebitOutcome, RepositoryError};
use crate::domain::{Account, SubjectId, TranscriptionId, TranscriptionRecord};

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    subject_id: String,
    token_balance: i64,
    words_transcribed_total: i64,
    transcription_count: i64,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(r: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            subject_id: SubjectId::new(r.subject_id),
            token_balance: from_db(r.token_balance, "token_balance")?,
            words_transcribed_total: from_db(r.words_transcribed_total, "words_transcribed_total")?,
            transcription_count: from_db(r.transcription_count, "transcription_count")?,
            version: from_db(r.version, "version")?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TranscriptionRow {
    id: Uuid,
    subject_id: String,
    source_url: String,
    transcript: String,
    preview: String,
    word_count: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<TranscriptionRow> for TranscriptionRecord {
    type Error = RepositoryError;

    fn try_from(r: TranscriptionRow) -> Result<Self, Self::Error> {
        Ok(TranscriptionRecord {
            id: TranscriptionId::from_uuid(r.id),
            subject_id: SubjectId::new(r.subject_id),
            source_url: r.source_url,
            transcript: r.transcript,
            preview: r.preview,
            word_count: from_db(r.word_count, "word_count")?,
            created_at: r.created_at,
        })
    }
}

fn from_db(value: i64, field: &str) -> Result<u64, RepositoryError> {
    u64::try_from(value).map_err(|_| RepositoryError::InvalidRow(format!("{} = {}", field, value)))
}

fn to_db(value: u64, field: &str) -> Result<i64, RepositoryError> {
    i64::try_from(value)
        .map_err(|_| RepositoryError::ConstraintViolation(format!("{} out of range", field)))
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::Database(db) if db.is_check_violation() || db.is_foreign_key_violation() => {
            RepositoryError::ConstraintViolation(db.to_string())
        }
        other => RepositoryError::QueryFailed(other.to_string()),
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self), fields(subject_id = %subject_id))]
    async fn get(&self, subject_id: &SubjectId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT subject_id, token_balance, words_transcribed_total, transcription_count,
                   version, created_at, updated_at
            FROM accounts
            WHERE subject_id = $1
            "#,
        )
        .bind(subject_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Account::try_from).transpose()
    }

    #[instrument(skip(self, account), fields(subject_id = %account.subject_id))]
    async fn create(&self, account: &Account) -> Result<CreateOutcome, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (subject_id, token_balance, words_transcribed_total,
                                  transcription_count, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (subject_id) DO NOTHING
            "#,
        )
        .bind(account.subject_id.as_str())
        .bind(to_db(account.token_balance, "token_balance")?)
        .bind(to_db(account.words_transcribed_total, "words_transcribed_total")?)
        .bind(to_db(account.transcription_count, "transcription_count")?)
        .bind(to_db(account.version, "version")?)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        if result.rows_affected() == 0 {
            Ok(CreateOutcome::AlreadyExists)
        } else {
            Ok(CreateOutcome::Created)
        }
    }

    #[instrument(
        skip(self, record),
        fields(subject_id = %record.subject_id, transcription_id = %record.id)
    )]
    async fn debit_and_append(
        &self,
        record: &TranscriptionRecord,
    ) -> Result<DebitOutcome, RepositoryError> {
        let words = to_db(record.word_count, "word_count")?;
        let mut tx = self.pool.begin().await.map_err(query_failed)?;

        // Row lock on the account serialises concurrent debits; the balance
        // predicate is re-checked against the committed value after the wait.
        let debited = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET token_balance = token_balance - $1,
                words_transcribed_total = words_transcribed_total + $1,
                transcription_count = transcription_count + 1,
                version = version + 1,
                updated_at = $2
            WHERE subject_id = $3 AND token_balance >= $1
            RETURNING subject_id, token_balance, words_transcribed_total, transcription_count,
                      version, created_at, updated_at
            "#,
        )
        .bind(words)
        .bind(Utc::now())
        .bind(record.subject_id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(query_failed)?;

        let Some(row) = debited else {
            let balance: Option<(i64,)> =
                sqlx::query_as("SELECT token_balance FROM accounts WHERE subject_id = $1")
                    .bind(record.subject_id.as_str())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(query_failed)?;
            tx.rollback().await.map_err(query_failed)?;

            return match balance {
                Some((available,)) => Ok(DebitOutcome::Insufficient {
                    available: from_db(available, "token_balance")?,
                }),
                None => Ok(DebitOutcome::AccountMissing),
            };
        };

        sqlx::query(
            r#"
            INSERT INTO transcriptions (id, subject_id, source_url, transcript, preview,
                                        word_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.subject_id.as_str())
        .bind(&record.source_url)
        .bind(&record.transcript)
        .bind(&record.preview)
        .bind(words)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await
        .map_err(query_failed)?;

        tx.commit().await.map_err(query_failed)?;

        Ok(DebitOutcome::Applied(Account::try_from(row)?))
    }

    #[instrument(skip(self), fields(subject_id = %subject_id))]
    async fn list_transcriptions(
        &self,
        subject_id: &SubjectId,
        limit: usize,
    ) -> Result<Vec<TranscriptionRecord>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, TranscriptionRow>(
            r#"
            SELECT id, subject_id, source_url, transcript, preview, word_count, created_at
            FROM transcriptions
            WHERE subject_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(subject_id.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.into_iter().map(TranscriptionRecord::try_from).collect()
    }

    #[instrument(skip(self), fields(subject_id = %subject_id, transcription_id = %id))]
    async fn get_transcription(
        &self,
        subject_id: &SubjectId,
        id: TranscriptionId,
    ) -> Result<Option<TranscriptionRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, TranscriptionRow>(
            r#"
            SELECT id, subject_id, source_url, transcript, preview, word_count, created_at
            FROM transcriptions
            WHERE id = $1 AND subject_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(subject_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(TranscriptionRecord::try_from).transpose()
    }
}
