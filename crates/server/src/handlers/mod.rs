//! HTTP request handlers.

pub mod common;
pub mod health;
pub mod orphans;
pub mod submissions;
pub mod uploads;

pub use common::*;
pub use health::*;
pub use orphans::*;
pub use submissions::*;
pub use uploads::*;
