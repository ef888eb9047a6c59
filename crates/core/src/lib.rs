//! Core domain types for the guestbook service.
//!
//! This crate defines the data model shared by the other crates:
//! - Submissions and their validated creation input
//! - Generated names for uploaded photos
//! - Application configuration

pub mod config;
pub mod error;
pub mod filename;
pub mod submission;

pub use error::{Error, Result};
pub use filename::{generate_filename, validate_filename};
pub use submission::{NewSubmission, Submission};
