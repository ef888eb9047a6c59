//! Photo storage for the guestbook service.
//!
//! Uploaded files live in a flat namespace keyed by their generated name.
//! The only backend is a local directory with atomic writes.

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::filesystem::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use traits::FileStore;

use guestbook_core::config::StorageConfig;
use std::sync::Arc;

/// Create a file store from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn FileStore>> {
    match config {
        StorageConfig::Filesystem { path } => {
            if path.as_os_str().is_empty() {
                return Err(StorageError::Config(
                    "storage.path must not be empty".to_string(),
                ));
            }
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
    }
}
