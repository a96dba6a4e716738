//! Core Module - infrastructure components of the application
//!
//! This module holds everything that is not domain specific:
//! - Configuration
//! - Error handling
//! - Persistence adapter
//! - Request validation
//! - Application state

pub mod config;
pub mod database;
pub mod error;
pub mod state;
pub mod validation;

// Re-exports for easier imports
pub use config::Config;
pub use database::{Database, DbTransaction, ExecResult, SqlParam};
pub use error::{AppError, StorageError};
pub use state::AppState;
pub use validation::{FieldIssue, RawRequest, RequestSchema, Validated, ValidationFailure};
