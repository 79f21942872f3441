//! HTTP error handling and response types.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::RepositoryError;

pub const PROPERTY_NOT_FOUND: &str = "Property not found";
pub const INVALID_BODY: &str = "Invalid request body";
pub const INVALID_QUERY: &str = "Invalid query parameters";
pub const ROUTE_NOT_FOUND: &str = "Route not found";

/// Error envelope returned with every non-2xx JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// What the request was trying to do
    pub message: String,
    /// Why it failed
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: error.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// No route matched
    NotFound(String),
    /// Body was not a JSON object
    BadRequest(String),
    /// Query string could not be decoded
    BadQuery(String),
    /// A store operation failed; `message` names the operation
    Repository {
        message: &'static str,
        source: RepositoryError,
    },
}

impl AppError {
    /// Adapter for `map_err` that tags a repository error with an operation message.
    pub fn repository(message: &'static str) -> impl FnOnce(RepositoryError) -> AppError {
        move |source| AppError::Repository { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::BadQuery(_) => StatusCode::BAD_REQUEST,
            AppError::Repository { source, .. } if source.is_not_found() => StatusCode::NOT_FOUND,
            // Includes malformed identifiers
            AppError::Repository { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::NotFound(detail) => ApiError::new(ROUTE_NOT_FOUND, detail),
            AppError::BadRequest(detail) => ApiError::new(INVALID_BODY, detail),
            AppError::BadQuery(detail) => ApiError::new(INVALID_QUERY, detail),
            AppError::Repository { source, .. } if source.is_not_found() => {
                tracing::warn!(error = %source, "{}", PROPERTY_NOT_FOUND);
                ApiError::new(PROPERTY_NOT_FOUND, source.to_string())
            }
            AppError::Repository { message, source } => {
                tracing::error!(error = %source, "{}", message);
                ApiError::new(message, source.to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadQuery(rejection.body_text())
    }
}
