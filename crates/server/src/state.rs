//! Application state shared across handlers.

use crate::auth::hash_key;
use crate::saga::DeleteSaga;
use crate::service::SubmissionService;
use guestbook_core::config::AppConfig;
use guestbook_records::RecordStore;
use guestbook_storage::FileStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Photo storage backend.
    pub files: Arc<dyn FileStore>,
    /// Submission record store.
    pub records: Arc<dyn RecordStore>,
    /// SHA-256 of the configured API key.
    pub(crate) api_key_hash: [u8; 32],
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        files: Arc<dyn FileStore>,
        records: Arc<dyn RecordStore>,
    ) -> Self {
        let api_key_hash = hash_key(&config.auth.api_key);
        Self {
            config: Arc::new(config),
            files,
            records,
            api_key_hash,
        }
    }

    /// Submission service over this state's stores.
    pub fn service(&self) -> SubmissionService {
        SubmissionService::new(self.files.clone(), self.records.clone())
    }

    /// Delete saga over this state's stores, using the configured step timeout.
    pub fn delete_saga(&self) -> DeleteSaga {
        DeleteSaga::new(
            self.files.clone(),
            self.records.clone(),
            self.config.server.step_timeout(),
        )
    }
}
