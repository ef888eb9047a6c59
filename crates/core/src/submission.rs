//! Guestbook submissions.

use crate::error::{Error, Result};
use crate::filename::validate_filename;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Identifier assigned by the record store.
    pub id: String,
    pub name: String,
    pub message: String,
    /// Name of the attached photo in the file store, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Creation time; the only sort key for listings.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// Validated input for a new submission.
///
/// Construction trims surrounding whitespace and enforces the required
/// fields, so a `NewSubmission` is always safe to insert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSubmission {
    name: String,
    message: String,
    filename: Option<String>,
}

impl NewSubmission {
    /// Validate raw input.
    ///
    /// A blank `filename` is treated as absent.
    pub fn new(
        name: impl Into<String>,
        message: impl Into<String>,
        filename: Option<String>,
    ) -> Result<Self> {
        let name = required(name.into(), "name")?;
        let message = required(message.into(), "message")?;
        let filename = filename
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        if let Some(f) = &filename {
            validate_filename(f)?;
        }

        Ok(Self {
            name,
            message,
            filename,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }
}

fn required(value: String, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingField(field));
    }
    Ok(trimmed.to_string())
}
