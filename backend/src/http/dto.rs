//! Data Transfer Objects for the HTTP API.
//!
//! Properties and write acknowledgements already derive Serialize/Deserialize
//! and are re-exported from the models module.

use serde::{Deserialize, Serialize};

pub use crate::models::{DeleteAck, InsertAck, Property, PropertyFields, UpdateAck};
use crate::models::PropertyQuery;

/// Query parameters for the property listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListPropertiesQuery {
    /// Owner email, matched exactly
    #[serde(default)]
    pub email: Option<String>,
    /// Case-insensitive substring of the property name
    #[serde(default)]
    pub search: Option<String>,
    /// Field to sort on (default: newest first)
    #[serde(default, rename = "sortBy")]
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`
    #[serde(default)]
    pub order: Option<String>,
}

impl From<ListPropertiesQuery> for PropertyQuery {
    fn from(params: ListPropertiesQuery) -> Self {
        PropertyQuery::from_params(params.email, params.search, params.sort_by, params.order)
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Store connection status
    pub database: String,
}
