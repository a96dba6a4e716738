//! Resource services - HTTP handlers for `/api/v1/resources`

use crate::core::{AppError, AppState, Validated};
use crate::dtos::{
    CreateResourceRequest, MessageDTO, NewResourceDTO, ResourceFilters, ResourceIdRequest,
    UpdateResourceRequest,
};
use crate::entities::Resource;
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    extract::{Json, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{Span, debug, info, instrument, warn};

/// Path ids have already matched `^[0-9]+$`; this only catches values past i64
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| {
        warn!("Invalid ID format: {}", raw);
        AppError::bad_request("Invalid ID format")
    })
}

fn resource_not_found() -> AppError {
    AppError::not_found("Resource not found")
}

#[instrument(skip_all)]
pub async fn create_resource(
    State(state): State<Arc<AppState>>,
    Validated(request): Validated<CreateResourceRequest>,
) -> Result<(StatusCode, Json<Resource>), AppError> {
    debug!("Creating resource");
    // 1. The schema already enforced presence and length of every field
    // 2. Re-check the name anyway before touching storage
    // 3. Insert and return the stored row with 201
    let body = request.body;
    let name = body.name.ok_or_else(|| {
        warn!("Create attempted without a name");
        AppError::bad_request("Name is required")
    })?;
    let description = body
        .description
        .ok_or_else(|| AppError::bad_request("Description is required"))?;
    let category = body
        .category
        .ok_or_else(|| AppError::bad_request("Category is required"))?;

    let new_resource = NewResourceDTO {
        name,
        description,
        category,
    };
    let created = state.resource.create(&new_resource).await?;

    info!(resource_id = created.id, "Resource created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip_all)]
pub async fn list_resources(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Resource>>, AppError> {
    // a query string that cannot be read narrows nothing
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_else(|rejection| {
        warn!("Ignoring unreadable query string: {}", rejection.body_text());
        Vec::new()
    });
    let filters = ResourceFilters::from_pairs(pairs);
    debug!(category = ?filters.category, name = ?filters.name, "Listing resources");

    let resources = state.resource.find_all(&filters).await?;
    Ok(Json(resources))
}

#[instrument(skip_all, fields(resource_id))]
pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    Validated(request): Validated<ResourceIdRequest>,
) -> Result<Json<Resource>, AppError> {
    let id = parse_id(&request.params.id)?;
    Span::current().record("resource_id", id);
    debug!("Fetching resource by ID");

    let resource = state.resource.read(&id).await?.ok_or_else(|| {
        warn!("Resource not found");
        resource_not_found()
    })?;

    Ok(Json(resource))
}

#[instrument(skip_all, fields(resource_id))]
pub async fn update_resource(
    State(state): State<Arc<AppState>>,
    Validated(request): Validated<UpdateResourceRequest>,
) -> Result<Json<Resource>, AppError> {
    // 1. Parse the id
    // 2. Reject an empty field set here, so it never reads as "not found"
    // 3. Apply the partial update; no row touched means 404
    let id = parse_id(&request.params.id)?;
    Span::current().record("resource_id", id);

    if request.body.is_empty() {
        warn!("Update attempted without fields");
        return Err(AppError::bad_request(
            "At least one field (name, description, category) is required for update",
        ));
    }

    let updated = state
        .resource
        .update(&id, &request.body)
        .await?
        .ok_or_else(|| {
            warn!("Resource not found");
            resource_not_found()
        })?;

    info!("Resource updated");
    Ok(Json(updated))
}

#[instrument(skip_all, fields(resource_id))]
pub async fn delete_resource(
    State(state): State<Arc<AppState>>,
    Validated(request): Validated<ResourceIdRequest>,
) -> Result<Json<MessageDTO>, AppError> {
    let id = parse_id(&request.params.id)?;
    Span::current().record("resource_id", id);

    if !state.resource.delete(&id).await? {
        warn!("Resource not found");
        return Err(resource_not_found());
    }

    info!("Resource deleted");
    Ok(Json(MessageDTO {
        message: "Resource deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_overflow_is_bad_request() {
        let err = parse_id("99999999999999999999999").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Invalid ID format");
        assert_eq!(parse_id("17").unwrap(), 17);
    }
}
