//! Two-step deletion of a submission and its photo.
//!
//! There is no transaction spanning the file store and the record store, so
//! the delete runs as a fixed sequence:
//!
//! 1. look the submission up by id
//! 2. if it has a photo, delete the file
//! 3. delete the record
//!
//! The file always goes first. A failure after the file is gone leaves a
//! record pointing at a missing photo; that case is reported as a partial
//! delete so it can be cleaned up later (see
//! [`SubmissionService::reconcile_orphans`](crate::service::SubmissionService::reconcile_orphans)).
//! Nothing is retried or compensated.

use crate::metrics;
use guestbook_records::{RecordError, RecordStore};
use guestbook_storage::{FileStore, StorageError};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What happened to the photo during a delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStep {
    /// The submission had no photo; the file store was not called.
    Skipped,
    /// The photo was removed.
    Deleted,
    /// The photo was already gone.
    AlreadyMissing,
}

/// Successful delete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub file: FileStep,
}

/// Underlying cause of a failed step.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Files(#[from] StorageError),

    #[error(transparent)]
    Records(#[from] RecordError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Failed delete, classified by the step that failed.
#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("submission not found: {id}")]
    NotFound { id: String },

    #[error("lookup of submission {id} failed: {source}")]
    LookupFailed { id: String, source: StepError },

    #[error("deleting photo {filename} of submission {id} failed: {source}")]
    FileDeleteFailed {
        id: String,
        filename: String,
        source: StepError,
    },

    #[error("deleting record {id} failed (photo {file:?}): {source}")]
    RecordDeleteFailed {
        id: String,
        filename: Option<String>,
        file: FileStep,
        source: StepError,
    },
}

impl DeleteError {
    /// Whether the photo is gone but the record is still there.
    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            Self::RecordDeleteFailed {
                file: FileStep::Deleted,
                ..
            }
        )
    }

    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::LookupFailed { .. } => "lookup_failed",
            Self::FileDeleteFailed { .. } => "file_delete_failed",
            Self::RecordDeleteFailed { .. } if self.is_partial() => "partial_delete",
            Self::RecordDeleteFailed { .. } => "record_delete_failed",
        }
    }
}

/// Runs deletes against a file store and a record store.
#[derive(Clone)]
pub struct DeleteSaga {
    files: Arc<dyn FileStore>,
    records: Arc<dyn RecordStore>,
    step_timeout: Duration,
}

impl DeleteSaga {
    pub fn new(
        files: Arc<dyn FileStore>,
        records: Arc<dyn RecordStore>,
        step_timeout: Duration,
    ) -> Self {
        Self {
            files,
            records,
            step_timeout,
        }
    }

    /// Delete submission `id` and its photo.
    #[tracing::instrument(name = "delete_saga", skip(self))]
    pub async fn run(&self, id: &str) -> Result<DeleteReport, DeleteError> {
        let started = Instant::now();
        let result = self.execute(id).await;

        let outcome = match &result {
            Ok(_) => "done",
            Err(e) => e.code(),
        };
        metrics::SAGA_OUTCOMES.with_label_values(&[outcome]).inc();
        metrics::SAGA_DURATION.observe(started.elapsed().as_secs_f64());

        match &result {
            Ok(report) => tracing::info!(file = ?report.file, "delete done"),
            Err(e) if e.is_partial() => {
                tracing::error!(error = %e, "partial delete: photo removed, record kept")
            }
            Err(DeleteError::NotFound { .. }) => tracing::info!("delete target not found"),
            Err(e) => tracing::warn!(code = e.code(), error = %e, "delete failed"),
        }

        result
    }

    async fn execute(&self, id: &str) -> Result<DeleteReport, DeleteError> {
        tracing::debug!("lookup");
        let submission = match self.step(self.records.get_submission(id)).await {
            Ok(Some(submission)) => submission,
            Ok(None) => return Err(DeleteError::NotFound { id: id.to_string() }),
            Err(source) => {
                return Err(DeleteError::LookupFailed {
                    id: id.to_string(),
                    source,
                });
            }
        };

        let file = match &submission.filename {
            None => FileStep::Skipped,
            Some(filename) => {
                tracing::debug!(filename = %filename, "deleting photo");
                match self.step(self.files.delete(filename)).await {
                    Ok(()) => FileStep::Deleted,
                    Err(StepError::Files(StorageError::NotFound(_))) => {
                        tracing::warn!(filename = %filename, "photo already missing");
                        FileStep::AlreadyMissing
                    }
                    Err(source) => {
                        return Err(DeleteError::FileDeleteFailed {
                            id: id.to_string(),
                            filename: filename.clone(),
                            source,
                        });
                    }
                }
            }
        };

        tracing::debug!(file = ?file, "deleting record");
        match self.step(self.records.delete_submission(id)).await {
            Ok(()) => Ok(DeleteReport {
                id: id.to_string(),
                filename: submission.filename,
                file,
            }),
            // Another delete of the same id finished first.
            Err(StepError::Records(RecordError::NotFound(_))) => {
                Err(DeleteError::NotFound { id: id.to_string() })
            }
            Err(source) => Err(DeleteError::RecordDeleteFailed {
                id: id.to_string(),
                filename: submission.filename,
                file,
                source,
            }),
        }
    }

    async fn step<T, E>(&self, fut: impl Future<Output = Result<T, E>>) -> Result<T, StepError>
    where
        StepError: From<E>,
    {
        match tokio::time::timeout(self.step_timeout, fut).await {
            Ok(result) => result.map_err(StepError::from),
            Err(_) => Err(StepError::Timeout(self.step_timeout)),
        }
    }
}
