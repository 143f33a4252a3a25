//! papyrus-worker library root.
//!
//! Everything the binary wires together lives here so integration tests
//! can drive the router, handlers and queue processing directly.

pub mod callback;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod queue;
pub mod routes;
pub mod state;
