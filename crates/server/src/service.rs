//! Business rules for submissions and their photos.

use crate::metrics;
use bytes::Bytes;
use guestbook_core::{NewSubmission, Submission, validate_filename};
use guestbook_records::{RecordError, RecordStore};
use guestbook_storage::{FileStore, StorageError};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use time::OffsetDateTime;

/// Submission service errors.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(#[from] guestbook_core::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("photo not found: {0}")]
    PhotoNotFound(String),

    #[error("file store error: {0}")]
    Io(#[from] StorageError),

    #[error("record store error: {0}")]
    Storage(#[from] RecordError),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Outcome of an orphan reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Missing filenames that had records pointing at them.
    pub filenames: Vec<String>,
    /// Number of records removed.
    pub removed: u64,
}

/// Create, read and upload operations over the two stores.
///
/// Deletion is not here; it goes through [`crate::saga::DeleteSaga`].
#[derive(Clone)]
pub struct SubmissionService {
    files: Arc<dyn FileStore>,
    records: Arc<dyn RecordStore>,
}

impl SubmissionService {
    pub fn new(files: Arc<dyn FileStore>, records: Arc<dyn RecordStore>) -> Self {
        Self { files, records }
    }

    /// Validate and insert a submission dated now.
    ///
    /// A referenced photo must already be in the file store and must not
    /// belong to another submission.
    #[tracing::instrument(skip(self, name, message))]
    pub async fn create(
        &self,
        name: &str,
        message: &str,
        filename: Option<String>,
    ) -> ServiceResult<Submission> {
        let new = NewSubmission::new(name, message, filename)?;

        if let Some(filename) = new.filename()
            && !self.files.exists(filename).await?
        {
            return Err(guestbook_core::Error::UnknownFile(filename.to_string()).into());
        }

        let row = match self
            .records
            .create_submission(&new, OffsetDateTime::now_utc())
            .await
        {
            Ok(row) => row,
            Err(RecordError::FilenameTaken(filename)) => {
                return Err(guestbook_core::Error::FilenameTaken(filename).into());
            }
            Err(e) => return Err(e.into()),
        };
        metrics::SUBMISSIONS_CREATED.inc();
        tracing::info!(id = %row.id, filename = ?row.filename, "submission created");

        Ok(row.into())
    }

    /// All submissions, newest first.
    pub async fn list(&self) -> ServiceResult<Vec<Submission>> {
        let rows = self.records.list_submissions().await?;
        Ok(rows.into_iter().map(Submission::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<Submission> {
        self.records
            .get_submission(id)
            .await?
            .map(Submission::from)
            .ok_or_else(|| ServiceError::NotFound(format!("submission {id}")))
    }

    /// Store an uploaded photo and return its generated name.
    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload(&self, data: Bytes, original_name: &str) -> ServiceResult<String> {
        if data.is_empty() {
            return Err(guestbook_core::Error::EmptyUpload.into());
        }

        let size = data.len() as u64;
        let filename = self.files.store(data, original_name).await?;
        metrics::UPLOADS_STORED.inc();
        metrics::UPLOAD_BYTES.inc_by(size);
        tracing::info!(filename = %filename, "photo stored");

        Ok(filename)
    }

    /// Read a stored photo.
    pub async fn read_photo(&self, filename: &str) -> ServiceResult<Bytes> {
        validate_filename(filename)?;
        match self.files.get(filename).await {
            Ok(data) => Ok(data),
            Err(StorageError::NotFound(_)) => {
                Err(ServiceError::PhotoNotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Submissions whose photo is no longer in the file store.
    pub async fn find_orphans(&self) -> ServiceResult<Vec<Submission>> {
        let mut orphans = Vec::new();
        for submission in self.list().await? {
            if let Some(filename) = &submission.filename
                && !self.files.exists(filename).await?
            {
                orphans.push(submission);
            }
        }
        Ok(orphans)
    }

    /// Remove every record that points at a missing photo.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile_orphans(&self) -> ServiceResult<ReconcileReport> {
        let filenames: BTreeSet<String> = self
            .find_orphans()
            .await?
            .into_iter()
            .filter_map(|s| s.filename)
            .collect();

        let mut report = ReconcileReport::default();
        for filename in filenames {
            let removed = self
                .records
                .delete_submissions_by_filename(&filename)
                .await?;
            tracing::warn!(filename = %filename, removed, "removed records for missing photo");
            report.removed += removed;
            report.filenames.push(filename);
        }

        metrics::ORPHANS_REMOVED.inc_by(report.removed);
        Ok(report)
    }

    /// Check both stores.
    pub async fn health_check(&self) -> ServiceResult<()> {
        self.records.health_check().await?;
        self.files.health_check().await?;
        Ok(())
    }
}
