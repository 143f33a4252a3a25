//! papyrus-storage
//!
//! S3 operations. Thin wrapper around the AWS S3 SDK, plus the
//! [`store::ObjectStore`] capability the worker fetches and stores through.

pub mod client;
pub mod error;
pub mod objects;
pub mod store;
