//! Database models mapping to the record schema.

use guestbook_core::Submission;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Stored submission row.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: String,
    pub name: String,
    pub message: String,
    pub filename: Option<String>,
    pub date: OffsetDateTime,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Submission {
            id: row.id,
            name: row.name,
            message: row.message,
            filename: row.filename,
            date: row.date,
        }
    }
}
