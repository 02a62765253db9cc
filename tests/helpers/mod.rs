#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::{Mutex, Notify};

use whisperfy::application::ports::{
    AccountRepository, AuthError, CreateOutcome, DebitOutcome, FetchError, GatewayError,
    IdentityVerifier, MediaFetcher, PaymentGateway, RepositoryError, TranscriptionEngine,
    TranscriptionError,
};
use whisperfy::application::services::{CheckoutService, CreditLedger, TranscriptionService};
use whisperfy::domain::{
    Account, CheckoutBundle, CheckoutRequest, CheckoutSession, StagedFile, SubjectId,
    TranscriptionId, TranscriptionRecord,
};
use whisperfy::infrastructure::persistence::InMemoryAccountRepository;
use whisperfy::presentation::AppState;

pub const TOKEN_PREFIX: &str = "token-";

/// Accepts `token-<subject>` credentials; `expired` yields an expiry error.
pub struct PrefixVerifier;

#[async_trait::async_trait]
impl IdentityVerifier for PrefixVerifier {
    async fn verify(&self, credential: &str) -> Result<SubjectId, AuthError> {
        if credential == "expired" {
            return Err(AuthError::Expired);
        }
        credential
            .strip_prefix(TOKEN_PREFIX)
            .filter(|s| !s.is_empty())
            .map(SubjectId::new)
            .ok_or_else(|| AuthError::InvalidCredential("unknown token".to_string()))
    }
}

pub fn bearer(subject: &str) -> String {
    format!("Bearer {}{}", TOKEN_PREFIX, subject)
}

/// Stages a real temp file per call and remembers where it put it.
pub struct FakeFetcher {
    dir: TempDir,
    refuse_with: Option<u16>,
    staged: std::sync::Mutex<Vec<PathBuf>>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            refuse_with: None,
            staged: std::sync::Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn refusing(status: u16) -> Self {
        Self {
            refuse_with: Some(status),
            ..Self::new()
        }
    }

    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.staged.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn leftover_files(&self) -> usize {
        std::fs::read_dir(self.dir.path()).unwrap().count()
    }
}

#[async_trait::async_trait]
impl MediaFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<StagedFile, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.refuse_with {
            return Err(FetchError::Status(status));
        }

        let mut file = tempfile::Builder::new()
            .suffix(".mp3")
            .tempfile_in(self.dir.path())?;
        std::io::Write::write_all(&mut file, b"fake media")?;
        let path = file.into_temp_path();
        self.staged.lock().unwrap().push(path.to_path_buf());

        Ok(StagedFile::new(path, url, 10))
    }
}

pub enum EngineBehaviour {
    Transcript(String),
    Fail,
    Hang,
}

/// Returns a fixed transcript and records whether the staged file existed when called.
pub struct FakeEngine {
    behaviour: EngineBehaviour,
    saw_file: AtomicBool,
    calls: AtomicUsize,
    pub started: Notify,
}

impl FakeEngine {
    pub fn returning(transcript: &str) -> Self {
        Self::with(EngineBehaviour::Transcript(transcript.to_string()))
    }

    pub fn failing() -> Self {
        Self::with(EngineBehaviour::Fail)
    }

    pub fn hanging() -> Self {
        Self::with(EngineBehaviour::Hang)
    }

    fn with(behaviour: EngineBehaviour) -> Self {
        Self {
            behaviour,
            saw_file: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            started: Notify::new(),
        }
    }

    pub fn saw_file(&self) -> bool {
        self.saw_file.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for FakeEngine {
    async fn transcribe(&self, file: &Path) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.saw_file.store(file.exists(), Ordering::SeqCst);
        self.started.notify_one();

        match &self.behaviour {
            EngineBehaviour::Transcript(text) => Ok(text.clone()),
            EngineBehaviour::Fail => Err(TranscriptionError::TranscriptionFailed(
                "decoder exploded".to_string(),
            )),
            EngineBehaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }
}

/// Wraps the in-memory store with injectable faults and a slow debit.
pub struct ScriptedRepository {
    pub inner: InMemoryAccountRepository,
    fail_updates: bool,
    update_delay: Option<Duration>,
    pub created: AtomicU32,
    pub update_attempts: AtomicU32,
    pub update_started: Notify,
}

impl ScriptedRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryAccountRepository::new(),
            fail_updates: false,
            update_delay: None,
            created: AtomicU32::new(0),
            update_attempts: AtomicU32::new(0),
            update_started: Notify::new(),
        }
    }

    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn with_update_delay(mut self, delay: Duration) -> Self {
        self.update_delay = Some(delay);
        self
    }
}

#[async_trait::async_trait]
impl AccountRepository for ScriptedRepository {
    async fn get(&self, subject_id: &SubjectId) -> Result<Option<Account>, RepositoryError> {
        self.inner.get(subject_id).await
    }

    async fn create(&self, account: &Account) -> Result<CreateOutcome, RepositoryError> {
        let outcome = self.inner.create(account).await?;
        if outcome == CreateOutcome::Created {
            self.created.fetch_add(1, Ordering::SeqCst);
        }
        Ok(outcome)
    }

    async fn debit_and_append(
        &self,
        record: &TranscriptionRecord,
    ) -> Result<DebitOutcome, RepositoryError> {
        self.update_attempts.fetch_add(1, Ordering::SeqCst);
        self.update_started.notify_one();

        if self.fail_updates {
            return Err(RepositoryError::QueryFailed("connection reset".to_string()));
        }
        if let Some(delay) = self.update_delay {
            tokio::time::sleep(delay).await;
        }

        self.inner.debit_and_append(record).await
    }

    async fn list_transcriptions(
        &self,
        subject_id: &SubjectId,
        limit: usize,
    ) -> Result<Vec<TranscriptionRecord>, RepositoryError> {
        self.inner.list_transcriptions(subject_id, limit).await
    }

    async fn get_transcription(
        &self,
        subject_id: &SubjectId,
        id: TranscriptionId,
    ) -> Result<Option<TranscriptionRecord>, RepositoryError> {
        self.inner.get_transcription(subject_id, id).await
    }
}

pub struct RecordingGateway {
    pub requests: Mutex<Vec<CheckoutRequest>>,
    fail: bool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait::async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        self.requests.lock().await.push(request.clone());
        if self.fail {
            return Err(GatewayError::Rejected {
                status: 401,
                message: "Invalid API Key provided".to_string(),
            });
        }
        Ok(CheckoutSession {
            id: "cs_test_123".to_string(),
            url: Some("https://checkout.stripe.test/cs_test_123".to_string()),
        })
    }
}

pub struct Harness {
    pub repository: Arc<ScriptedRepository>,
    pub fetcher: Arc<FakeFetcher>,
    pub engine: Arc<FakeEngine>,
    pub gateway: Arc<RecordingGateway>,
    pub ledger: Arc<CreditLedger>,
    pub service: Arc<TranscriptionService>,
    pub checkout: Arc<CheckoutService>,
}

impl Harness {
    pub fn new(repository: ScriptedRepository, fetcher: FakeFetcher, engine: FakeEngine) -> Self {
        Self::build(repository, fetcher, engine, RecordingGateway::new(), None)
    }

    pub fn build(
        repository: ScriptedRepository,
        fetcher: FakeFetcher,
        engine: FakeEngine,
        gateway: RecordingGateway,
        engine_timeout: Option<Duration>,
    ) -> Self {
        let repository = Arc::new(repository);
        let fetcher = Arc::new(fetcher);
        let engine = Arc::new(engine);
        let gateway = Arc::new(gateway);

        let ledger = Arc::new(CreditLedger::new(repository.clone()));
        let mut service = TranscriptionService::new(
            Arc::new(PrefixVerifier),
            fetcher.clone(),
            engine.clone(),
            ledger.clone(),
        );
        if let Some(limit) = engine_timeout {
            service = service.with_engine_timeout(limit);
        }
        let checkout = Arc::new(CheckoutService::new(
            gateway.clone(),
            CheckoutBundle::default(),
            "http://localhost:3000/success".to_string(),
            "http://localhost:3000/cancel".to_string(),
        ));

        Self {
            repository,
            fetcher,
            engine,
            gateway,
            ledger,
            service: Arc::new(service),
            checkout,
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.service.clone(), self.checkout.clone())
    }

    pub async fn seed(&self, subject: &str, balance: u64) {
        self.repository
            .inner
            .create(&Account::new(SubjectId::new(subject), balance))
            .await
            .unwrap();
    }

    pub async fn account(&self, subject: &str) -> Option<Account> {
        self.repository
            .get(&SubjectId::new(subject))
            .await
            .unwrap()
    }

    pub async fn history_len(&self, subject: &str) -> usize {
        self.repository
            .list_transcriptions(&SubjectId::new(subject), usize::MAX)
            .await
            .unwrap()
            .len()
    }
}
