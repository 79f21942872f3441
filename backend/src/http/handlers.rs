//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer in [`crate::db::services`].

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    Json,
};

use super::dto::{
    DeleteAck, HealthResponse, InsertAck, ListPropertiesQuery, Property, PropertyFields,
    UpdateAck,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::{services as db_services, RepositoryError};
use crate::models::{PropertyId, PropertyQuery};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

pub const LIVENESS_MESSAGE: &str = "HomeNest Server is Running...";

pub const LIST_FAILED: &str = "Error fetching properties";
pub const RECENT_FAILED: &str = "Error fetching recent properties";
pub const GET_FAILED: &str = "Error fetching property";
pub const CREATE_FAILED: &str = "Failed to add property";
pub const DELETE_FAILED: &str = "Failed to delete property";
pub const UPDATE_FAILED: &str = "Failed to update property";

fn parse_id(raw: &str) -> Result<PropertyId, RepositoryError> {
    Ok(raw.parse::<PropertyId>()?)
}

// =============================================================================
// Liveness & Health
// =============================================================================

/// GET /
pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

/// GET /health
///
/// Reports whether the store answers.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    })
}

// =============================================================================
// Property Reads
// =============================================================================

/// GET /properties?email=&search=&sortBy=&order=
pub async fn list_properties(
    State(state): State<AppState>,
    params: Result<Query<ListPropertiesQuery>, QueryRejection>,
) -> HandlerResult<Vec<Property>> {
    let Query(params) = params?;
    let query = PropertyQuery::from(params);
    let properties = db_services::list_properties(state.repository.as_ref(), &query)
        .await
        .map_err(AppError::repository(LIST_FAILED))?;

    Ok(Json(properties))
}

/// GET /properties/recent
pub async fn list_recent(State(state): State<AppState>) -> HandlerResult<Vec<Property>> {
    let properties = db_services::list_recent(state.repository.as_ref())
        .await
        .map_err(AppError::repository(RECENT_FAILED))?;

    Ok(Json(properties))
}

/// GET /properties/{id}
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Property> {
    let id = parse_id(&id).map_err(AppError::repository(GET_FAILED))?;
    let property = db_services::get_property(state.repository.as_ref(), id)
        .await
        .map_err(AppError::repository(GET_FAILED))?;

    Ok(Json(property))
}

// =============================================================================
// Property Writes
// =============================================================================

/// POST /properties
pub async fn create_property(
    State(state): State<AppState>,
    payload: Result<Json<PropertyFields>, JsonRejection>,
) -> Result<(StatusCode, Json<InsertAck>), AppError> {
    let Json(fields) = payload?;
    let ack = db_services::create_property(state.repository.as_ref(), fields)
        .await
        .map_err(AppError::repository(CREATE_FAILED))?;

    Ok((StatusCode::CREATED, Json(ack)))
}

/// DELETE /properties/{id}
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<DeleteAck> {
    let id = parse_id(&id).map_err(AppError::repository(DELETE_FAILED))?;
    let ack = db_services::delete_property(state.repository.as_ref(), id)
        .await
        .map_err(AppError::repository(DELETE_FAILED))?;

    Ok(Json(ack))
}

/// PUT /properties/{id}
///
/// Merges the body's fields into the stored document.
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PropertyFields>, JsonRejection>,
) -> HandlerResult<UpdateAck> {
    let id = parse_id(&id).map_err(AppError::repository(UPDATE_FAILED))?;
    let Json(patch) = payload?;
    let ack = db_services::update_property(state.repository.as_ref(), id, patch)
        .await
        .map_err(AppError::repository(UPDATE_FAILED))?;

    Ok(Json(ack))
}

/// Fallback for unmatched routes.
pub async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
