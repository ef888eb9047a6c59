//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use guestbook_core::filename::generate_filename;

/// Flat store of uploaded photos, keyed by generated filename.
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    /// Check if a file exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get a file's content.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Put a file atomically, replacing any previous content.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Delete a file.
    ///
    /// Fails with `NotFound` when the file is absent and `Io` when it exists
    /// but cannot be removed.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Get the name of this storage backend, for logging and metrics.
    fn backend_name(&self) -> &'static str;

    /// Verify storage backend connectivity.
    ///
    /// The default implementation returns Ok(()).
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    /// Persist an upload under a freshly generated name and return that name.
    ///
    /// The name carries the extension of `original_name` when it has a usable
    /// one (see [`guestbook_core::filename`]). The caller records the returned
    /// name in the submission that owns the file.
    async fn store(&self, data: Bytes, original_name: &str) -> StorageResult<String> {
        let key = generate_filename(original_name);
        self.put(&key, data).await?;
        Ok(key)
    }
}
