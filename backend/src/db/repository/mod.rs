//! Repository trait for abstracting document-store operations.
//!
//! Implementations (MongoDB, in-memory) are swapped via dependency injection:
//! the binary builds one, wraps it in an `Arc`, and hands it to the HTTP state.
//!
//! Repositories report what the store did. Deciding that a zero match count is
//! a "not found" belongs to [`crate::db::services`].

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{
    DeleteAck, InsertAck, NewProperty, Property, PropertyFields, PropertyId, PropertyQuery,
    UpdateAck,
};

/// Repository trait for property document operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; handlers call them concurrently.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List properties matching the query's filter, in the query's sort order.
    async fn list_properties(&self, query: &PropertyQuery) -> RepositoryResult<Vec<Property>>;

    /// The `limit` most recently created properties, newest first.
    async fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<Property>>;

    /// Point lookup by identifier.
    ///
    /// # Returns
    /// * `Ok(None)` - If no document has this identifier
    async fn find_property(&self, id: PropertyId) -> RepositoryResult<Option<Property>>;

    /// Insert a property; the store assigns the identifier.
    async fn insert_property(&self, property: NewProperty) -> RepositoryResult<InsertAck>;

    /// Delete by exact identifier. A zero `deleted_count` is not an error here.
    async fn delete_property(&self, id: PropertyId) -> RepositoryResult<DeleteAck>;

    /// Merge `patch` into the document: fields set in the patch overwrite,
    /// everything else is untouched.
    async fn update_property(
        &self,
        id: PropertyId,
        patch: PropertyFields,
    ) -> RepositoryResult<UpdateAck>;

    /// Release the underlying connection. Called once, at shutdown.
    async fn shutdown(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
