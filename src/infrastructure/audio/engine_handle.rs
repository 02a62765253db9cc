use std::sync::{Arc, OnceLock};

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

/// Init-once holder for the transcription engine.
///
/// The engine is built once at startup and handed to the services that need
/// it; nothing reads it as ambient state, and it cannot be replaced.
pub struct EngineHandle {
    engine: OnceLock<Arc<dyn TranscriptionEngine>>,
}

impl EngineHandle {
    pub const fn new() -> Self {
        Self {
            engine: OnceLock::new(),
        }
    }

    /// The process-wide handle used by `main`.
    pub fn global() -> &'static EngineHandle {
        static GLOBAL: EngineHandle = EngineHandle::new();
        &GLOBAL
    }

    pub fn init_with<F>(&self, build: F) -> Result<Arc<dyn TranscriptionEngine>, EngineHandleError>
    where
        F: FnOnce() -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError>,
    {
        if self.engine.get().is_some() {
            return Err(EngineHandleError::AlreadyInitialised);
        }

        let engine = build().map_err(EngineHandleError::Build)?;
        self.engine
            .set(Arc::clone(&engine))
            .map_err(|_| EngineHandleError::AlreadyInitialised)?;

        tracing::info!("Transcription engine initialised");
        Ok(engine)
    }
}

impl Default for EngineHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineHandleError {
    #[error("transcription engine already initialised")]
    AlreadyInitialised,
    #[error("building transcription engine: {0}")]
    Build(TranscriptionError),
}
