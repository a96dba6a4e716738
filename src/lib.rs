//! Resource server library - exposes the modules used by the binary and the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

// Re-export of the main types for easier imports
pub use crate::core::{AppError, AppState, Config, Database};

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

/// Base path of the resource API
pub const RESOURCES_PATH: &str = "/api/v1/resources";

/// Builds the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::core::error::handle_panic;
    use services::{fallback, root};

    Router::new()
        .route("/", get(root))
        .merge(configure_resource_routes())
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Configures the resource CRUD routes; validation runs inside each handler's
/// `Validated` extractor before any handler code.
/// The collection answers with and without a trailing slash.
fn configure_resource_routes() -> Router<Arc<AppState>> {
    use services::*;

    let collection = get(list_resources).post(create_resource);

    Router::new()
        .route(RESOURCES_PATH, collection.clone())
        .route(&format!("{}/", RESOURCES_PATH), collection)
        .route(
            &format!("{}/{{id}}", RESOURCES_PATH),
            get(get_resource)
                .put(update_resource)
                .delete(delete_resource),
        )
}
