//! Services module - HTTP handlers
//!
//! Every sub-module serves the endpoints of one feature.

pub mod resource;

// Re-exports for easier imports
pub use resource::{
    create_resource, delete_resource, get_resource, list_resources, update_resource,
};

use crate::core::AppError;
use axum::{http::StatusCode, http::Uri, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}

/// Any route not registered answers with the error envelope
pub async fn fallback(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {} not found", uri.path()))
}
