//! Core Service Layer
//!
//! Shared infrastructure: authentication, configuration, request context,
//! errors, document models and storage.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod error;
pub mod models;
pub mod router;
pub mod store;
pub mod validate;

// Re-exports for convenience
pub use config::{AppState, ServerConfig};
pub use ctx::Ctx;
pub use error::{Error, Result};
pub use router::router;
