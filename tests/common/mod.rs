#![allow(dead_code)]

use axum_test::TestServer;
use resource_server::core::{AppState, Database};
use serde_json::{Value, json};
use std::sync::Arc;

pub const RESOURCES: &str = "/api/v1/resources";

/// Builds an AppState over a fresh in-memory database
///
/// # Returns
/// Arc<AppState> isolated from every other test
pub async fn create_test_state() -> Arc<AppState> {
    let db = Database::in_memory()
        .await
        .expect("Failed to open in-memory database");
    Arc::new(AppState::new(db))
}

/// Creates a TestServer for the tests
///
/// # Arguments
/// * `state` - AppState used by the server
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = resource_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Fresh server with an empty database
pub async fn setup() -> TestServer {
    create_test_server(create_test_state().await)
}

pub fn resource_path(id: impl std::fmt::Display) -> String {
    format!("{}/{}", RESOURCES, id)
}

pub fn sample_payload() -> Value {
    json!({
        "name": "Test Resource",
        "description": "A resource created for testing.",
        "category": "test-category"
    })
}

/// POSTs a resource and returns the created JSON, asserting 201
pub async fn create_resource(server: &TestServer, name: &str, category: &str) -> Value {
    let response = server
        .post(RESOURCES)
        .json(&json!({
            "name": name,
            "description": format!("{} - a long enough description", name),
            "category": category
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}
