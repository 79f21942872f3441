//! High-level property service layer.
//!
//! Repository-agnostic operations shared by every storage backend:
//!
//! - creation time is stamped here, never taken from the client
//! - server-owned keys are stripped from create and update payloads
//! - a lookup, delete or update that matches nothing becomes
//!   [`RepositoryError::NotFound`]
//!
//! # Usage
//!
//! ```no_run
//! use homenest::db::{services, repositories::LocalRepository};
//! use homenest::models::PropertyQuery;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let properties = services::list_properties(&repo, &PropertyQuery::default()).await?;
//!     println!("Found {} properties", properties.len());
//!     Ok(())
//! }
//! ```

use chrono::Utc;
use log::{debug, info, warn};

use super::repository::{ErrorContext, PropertyRepository, RepositoryError, RepositoryResult};
use crate::models::{
    DeleteAck, InsertAck, NewProperty, Property, PropertyFields, PropertyId, PropertyQuery,
    UpdateAck, RECENT_LIMIT,
};

// ==================== Health & Connection ====================

/// Check if the store connection is healthy.
pub async fn health_check<R: PropertyRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Reads ====================

/// List properties matching `query`.
pub async fn list_properties<R: PropertyRepository + ?Sized>(
    repo: &R,
    query: &PropertyQuery,
) -> RepositoryResult<Vec<Property>> {
    let properties = repo
        .list_properties(query)
        .await
        .map_err(|e| e.with_operation("list_properties"))?;
    debug!(
        "Listed {} properties (filtered={}, sort={} {:?})",
        properties.len(),
        query.has_filter(),
        query.sort.field,
        query.sort.direction
    );
    Ok(properties)
}

/// The most recently created properties, newest first.
pub async fn list_recent<R: PropertyRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<Property>> {
    repo.list_recent(RECENT_LIMIT)
        .await
        .map_err(|e| e.with_operation("list_recent"))
}

/// Fetch one property.
///
/// # Returns
/// * `Err(RepositoryError::NotFound)` - If no property has this id
pub async fn get_property<R: PropertyRepository + ?Sized>(
    repo: &R,
    id: PropertyId,
) -> RepositoryResult<Property> {
    repo.find_property(id)
        .await
        .map_err(|e| e.with_operation("get_property"))?
        .ok_or_else(|| not_found("get_property", id))
}

// ==================== Writes ====================

/// Insert a new property stamped with the current time.
pub async fn create_property<R: PropertyRepository + ?Sized>(
    repo: &R,
    fields: PropertyFields,
) -> RepositoryResult<InsertAck> {
    let property = NewProperty {
        fields: fields.without_server_fields(),
        created_at: Utc::now(),
    };

    let ack = repo
        .insert_property(property)
        .await
        .map_err(|e| e.with_operation("create_property"))?;
    info!("Created property {}", ack.inserted_id);
    Ok(ack)
}

/// Delete a property.
///
/// # Returns
/// * `Err(RepositoryError::NotFound)` - If nothing was deleted
pub async fn delete_property<R: PropertyRepository + ?Sized>(
    repo: &R,
    id: PropertyId,
) -> RepositoryResult<DeleteAck> {
    let ack = repo
        .delete_property(id)
        .await
        .map_err(|e| e.with_operation("delete_property"))?;

    if ack.deleted_count == 0 {
        warn!("Delete matched no property {}", id);
        return Err(not_found("delete_property", id));
    }
    info!("Deleted property {}", id);
    Ok(ack)
}

/// Merge `patch` into an existing property.
///
/// # Returns
/// * `Err(RepositoryError::NotFound)` - If no property matched
pub async fn update_property<R: PropertyRepository + ?Sized>(
    repo: &R,
    id: PropertyId,
    patch: PropertyFields,
) -> RepositoryResult<UpdateAck> {
    let ack = repo
        .update_property(id, patch.without_server_fields())
        .await
        .map_err(|e| e.with_operation("update_property"))?;

    if ack.matched_count == 0 {
        warn!("Update matched no property {}", id);
        return Err(not_found("update_property", id));
    }
    info!(
        "Updated property {} (modified={})",
        id, ack.modified_count
    );
    Ok(ack)
}

fn not_found(operation: &str, id: PropertyId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Property {} not found", id),
        ErrorContext::new(operation)
            .with_entity("property")
            .with_entity_id(id),
    )
}
