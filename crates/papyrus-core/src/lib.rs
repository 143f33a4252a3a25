//! papyrus-core
//!
//! Pure domain types and storage key conventions.
//! No AWS SDK dependency; this is the shared vocabulary of the Papyrus worker.

pub mod error;
pub mod format;
pub mod keys;
pub mod models;
