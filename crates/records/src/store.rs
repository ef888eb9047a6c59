//! Record store trait and the SQLite implementation.

use crate::error::{RecordError, RecordResult};
use crate::models::SubmissionRow;
use crate::repos::SubmissionRepo;
use async_trait::async_trait;
use guestbook_core::NewSubmission;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

/// Combined record store trait.
#[async_trait]
pub trait RecordStore: SubmissionRepo + Send + Sync {
    /// Create the schema if it does not exist.
    async fn migrate(&self) -> RecordResult<()>;

    /// Check database connectivity.
    async fn health_check(&self) -> RecordResult<()>;
}

/// SQLite-based record store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub async fn new(path: impl AsRef<Path>) -> RecordResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // A single connection serializes writers and avoids "database is locked".
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::debug!(path = %path.display(), "opened sqlite record store");
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn migrate(&self) -> RecordResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> RecordResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Millisecond sort key for a submission date.
fn sort_key(date: OffsetDateTime) -> RecordResult<i64> {
    i64::try_from(date.unix_timestamp_nanos() / 1_000_000)
        .map_err(|_| RecordError::Internal(format!("date out of range: {date}")))
}

#[async_trait]
impl SubmissionRepo for SqliteStore {
    async fn create_submission(
        &self,
        submission: &NewSubmission,
        date: OffsetDateTime,
    ) -> RecordResult<SubmissionRow> {
        let row = SubmissionRow {
            id: Uuid::new_v4().to_string(),
            name: submission.name().to_string(),
            message: submission.message().to_string(),
            filename: submission.filename().map(str::to_string),
            date,
        };

        sqlx::query(
            "INSERT INTO submissions (id, name, message, filename, date, date_ms) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.message)
        .bind(&row.filename)
        .bind(row.date)
        .bind(sort_key(row.date)?)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let (sqlx::Error::Database(db), Some(filename)) = (&e, &row.filename)
                && db.is_unique_violation()
            {
                return RecordError::FilenameTaken(filename.clone());
            }
            RecordError::Database(e)
        })?;

        Ok(row)
    }

    async fn get_submission(&self, id: &str) -> RecordResult<Option<SubmissionRow>> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            "SELECT id, name, message, filename, date FROM submissions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_submissions(&self) -> RecordResult<Vec<SubmissionRow>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            "SELECT id, name, message, filename, date FROM submissions ORDER BY date_ms DESC, seq DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_submission(&self, id: &str) -> RecordResult<()> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RecordError::NotFound(format!("submission {id} not found")));
        }
        Ok(())
    }

    async fn delete_submissions_by_filename(&self, filename: &str) -> RecordResult<u64> {
        let result = sqlx::query("DELETE FROM submissions WHERE filename = ?")
            .bind(filename)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_submissions(&self) -> RecordResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS submissions (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    message TEXT NOT NULL,
    filename TEXT,
    date TEXT NOT NULL,
    date_ms INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_submissions_date ON submissions(date_ms DESC, seq DESC);
-- A photo belongs to exactly one submission.
CREATE UNIQUE INDEX IF NOT EXISTS idx_submissions_filename ON submissions(filename) WHERE filename IS NOT NULL;
"#;
