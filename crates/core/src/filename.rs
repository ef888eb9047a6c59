//! Generated names for uploaded photos.
//!
//! Uploaded files are stored flat under `<epochMillis>-<suffix>.<ext>`, where
//! `suffix` is drawn uniformly from `0..RANDOM_SUFFIX_BOUND`. Two uploads in the
//! same millisecond that draw the same suffix would collide; that case is
//! accepted and not checked for.

use crate::error::{Error, Result};
use rand::Rng;
use time::OffsetDateTime;

/// Exclusive upper bound of the random part of a generated name.
pub const RANDOM_SUFFIX_BOUND: u32 = 1_000_000_000;

/// Longest extension carried over from the client's original filename.
pub const MAX_EXTENSION_LEN: usize = 16;

/// Longest filename accepted as a storage key.
pub const MAX_FILENAME_LEN: usize = 255;

/// Extract the extension worth keeping from a client-supplied filename.
///
/// Only the text after the last `.` is considered, and only when it is
/// 1..=[`MAX_EXTENSION_LEN`] ASCII alphanumeric characters.
pub fn extension_of(original_name: &str) -> Option<&str> {
    let (_, ext) = original_name.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    ext.chars()
        .all(|c| c.is_ascii_alphanumeric())
        .then_some(ext)
}

/// Build a stored filename from its parts.
pub fn format_filename(epoch_millis: i128, suffix: u32, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{epoch_millis}-{suffix}.{ext}"),
        None => format!("{epoch_millis}-{suffix}"),
    }
}

/// Generate a fresh stored filename for an upload named `original_name`.
pub fn generate_filename(original_name: &str) -> String {
    let epoch_millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix = rand::rng().random_range(0..RANDOM_SUFFIX_BOUND);
    format_filename(epoch_millis, suffix, extension_of(original_name))
}

/// Check that `name` is a plain, flat storage key.
///
/// Names must not be empty, must not start with a dot, and may only use ASCII
/// alphanumerics, `-`, `_` and `.`. This rules out path separators and `..`
/// traversal before a name ever reaches a storage backend.
pub fn validate_filename(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_FILENAME_LEN {
        return Err(Error::InvalidFilename(format!(
            "length must be between 1 and {MAX_FILENAME_LEN}"
        )));
    }
    if name.starts_with('.') || name.contains("..") {
        return Err(Error::InvalidFilename(name.to_string()));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(Error::InvalidFilename(name.to_string()));
    }
    Ok(())
}
