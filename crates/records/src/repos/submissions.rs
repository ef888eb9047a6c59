//! Submission repository trait.

use crate::error::RecordResult;
use crate::models::SubmissionRow;
use async_trait::async_trait;
use guestbook_core::NewSubmission;
use time::OffsetDateTime;

/// Repository for guestbook submissions.
#[async_trait]
pub trait SubmissionRepo: Send + Sync {
    /// Insert a submission and return the stored row with its new id.
    async fn create_submission(
        &self,
        submission: &NewSubmission,
        date: OffsetDateTime,
    ) -> RecordResult<SubmissionRow>;

    /// Get a submission by id.
    async fn get_submission(&self, id: &str) -> RecordResult<Option<SubmissionRow>>;

    /// List all submissions, newest first.
    ///
    /// Submissions sharing a `date` are ordered by insertion, newest first.
    async fn list_submissions(&self) -> RecordResult<Vec<SubmissionRow>>;

    /// Delete a submission by id. Fails with `NotFound` when no row matched.
    async fn delete_submission(&self, id: &str) -> RecordResult<()>;

    /// Delete every submission whose `filename` equals `filename`.
    /// Returns the number of rows removed.
    async fn delete_submissions_by_filename(&self, filename: &str) -> RecordResult<u64>;

    /// Count stored submissions.
    async fn count_submissions(&self) -> RecordResult<u64>;
}
