//! Submission record store for the guestbook service.
//!
//! Submissions are kept in a single SQLite table keyed by a store-assigned
//! id and listed newest first.

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{RecordError, RecordResult};
pub use models::SubmissionRow;
pub use repos::SubmissionRepo;
pub use store::{RecordStore, SqliteStore};

use guestbook_core::config::RecordsConfig;
use std::sync::Arc;

/// Create a record store from configuration.
pub async fn from_config(config: &RecordsConfig) -> RecordResult<Arc<dyn RecordStore>> {
    match config {
        RecordsConfig::Sqlite { path } => {
            if path.as_os_str().is_empty() {
                return Err(RecordError::Config(
                    "records.path must not be empty".to_string(),
                ));
            }
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn RecordStore>)
        }
    }
}
