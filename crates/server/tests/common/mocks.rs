//! Fault-injecting store wrappers.
//!
//! Each wrapper delegates to a real store and counts calls, and can be told
//! to fail or hang on specific operations.

use async_trait::async_trait;
use bytes::Bytes;
use guestbook_core::NewSubmission;
use guestbook_records::{RecordError, RecordResult, RecordStore, SubmissionRepo, SubmissionRow};
use guestbook_storage::{FileStore, StorageError, StorageResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use time::OffsetDateTime;
use tokio::time::Duration;

/// Long enough to outlast any step timeout used in tests.
const HANG: Duration = Duration::from_secs(3600);

/// File store wrapper that counts calls and injects delete failures.
#[allow(dead_code)]
pub struct FaultyFiles {
    inner: Arc<dyn FileStore>,
    pub exists_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    fail_delete: AtomicBool,
    hang_delete: AtomicBool,
}

#[allow(dead_code)]
impl FaultyFiles {
    pub fn new(inner: Arc<dyn FileStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            exists_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            fail_delete: AtomicBool::new(false),
            hang_delete: AtomicBool::new(false),
        })
    }

    /// Make every delete fail with a permission error.
    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    /// Make every delete hang.
    pub fn hang_deletes(&self) {
        self.hang_delete.store(true, Ordering::SeqCst);
    }

    pub fn delete_count(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Number of calls of any kind made during a delete path.
    pub fn touched(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst) + self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileStore for FaultyFiles {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(key).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.inner.put(key, data).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_delete.load(Ordering::SeqCst) {
            tokio::time::sleep(HANG).await;
        }
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "injected delete failure",
            )));
        }
        self.inner.delete(key).await
    }

    fn backend_name(&self) -> &'static str {
        "faulty"
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.inner.health_check().await
    }
}

/// Record store wrapper that injects lookup and delete failures.
#[allow(dead_code)]
pub struct FaultyRecords {
    inner: Arc<dyn RecordStore>,
    pub delete_calls: AtomicUsize,
    fail_get: AtomicBool,
    fail_delete: AtomicBool,
    hang_delete: AtomicBool,
}

#[allow(dead_code)]
impl FaultyRecords {
    pub fn new(inner: Arc<dyn RecordStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            delete_calls: AtomicUsize::new(0),
            fail_get: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            hang_delete: AtomicBool::new(false),
        })
    }

    pub fn fail_gets(&self) {
        self.fail_get.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn hang_deletes(&self) {
        self.hang_delete.store(true, Ordering::SeqCst);
    }

    pub fn delete_count(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionRepo for FaultyRecords {
    async fn create_submission(
        &self,
        submission: &NewSubmission,
        date: OffsetDateTime,
    ) -> RecordResult<SubmissionRow> {
        self.inner.create_submission(submission, date).await
    }

    async fn get_submission(&self, id: &str) -> RecordResult<Option<SubmissionRow>> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(RecordError::Internal("injected lookup failure".to_string()));
        }
        self.inner.get_submission(id).await
    }

    async fn list_submissions(&self) -> RecordResult<Vec<SubmissionRow>> {
        self.inner.list_submissions().await
    }

    async fn delete_submission(&self, id: &str) -> RecordResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_delete.load(Ordering::SeqCst) {
            tokio::time::sleep(HANG).await;
        }
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(RecordError::Internal("injected delete failure".to_string()));
        }
        self.inner.delete_submission(id).await
    }

    async fn delete_submissions_by_filename(&self, filename: &str) -> RecordResult<u64> {
        self.inner.delete_submissions_by_filename(filename).await
    }

    async fn count_submissions(&self) -> RecordResult<u64> {
        self.inner.count_submissions().await
    }
}

#[async_trait]
impl RecordStore for FaultyRecords {
    async fn migrate(&self) -> RecordResult<()> {
        self.inner.migrate().await
    }

    async fn health_check(&self) -> RecordResult<()> {
        self.inner.health_check().await
    }
}
