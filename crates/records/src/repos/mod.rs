//! Repository traits for record operations.

pub mod submissions;

pub use submissions::SubmissionRepo;
