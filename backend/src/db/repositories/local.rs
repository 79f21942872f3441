//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. Documents live in a
//! `Vec` in insertion order behind a single read/write lock, and listings
//! mirror the document store's filter and sort semantics.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::db::repository::{PropertyRepository, RepositoryError, RepositoryResult};
use crate::models::{
    DeleteAck, InsertAck, NewProperty, Property, PropertyFields, PropertyId, PropertyQuery,
    SortSpec, UpdateAck,
};

/// In-memory local repository.
///
/// # Example
/// ```
/// use homenest::db::repositories::LocalRepository;
/// use homenest::db::PropertyRepository;
/// use homenest::models::PropertyQuery;
///
/// #[tokio::main]
/// async fn main() {
///     let repo = LocalRepository::new();
///     let properties = repo.list_properties(&PropertyQuery::default()).await.unwrap();
///     assert!(properties.is_empty());
/// }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    properties: Vec<Property>,
    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            properties: Vec::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Store a fully-formed property as-is, bypassing timestamp stamping.
    ///
    /// Test helper for seeding documents with chosen creation times.
    pub fn seed(&self, property: Property) {
        self.data.write().properties.push(property);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Get the number of properties stored.
    pub fn property_count(&self) -> usize {
        self.data.read().properties.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Order two properties on `sort`, falling back to insertion order.
fn compare_properties(a: &Property, b: &Property, sort: &SortSpec) -> Ordering {
    let ordering = if sort.is_created_at() {
        a.created_at.cmp(&b.created_at)
    } else if sort.field == "_id" {
        a.id.cmp(&b.id)
    } else {
        compare_values(a.fields.get(&sort.field).as_ref(), b.fields.get(&sort.field).as_ref())
    };
    sort.direction.apply(ordering)
}

/// Cross-type ordering following the document store's comparison order:
/// missing/null, numbers, strings, objects, arrays, booleans.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Number(_)) => 1,
            Some(Value::String(_)) => 2,
            Some(Value::Object(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Bool(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl PropertyRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_properties(&self, query: &PropertyQuery) -> RepositoryResult<Vec<Property>> {
        self.check_health()?;

        let mut matched: Vec<Property> = self
            .data
            .read()
            .properties
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal keys.
        matched.sort_by(|a, b| compare_properties(a, b, &query.sort));
        Ok(matched)
    }

    async fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<Property>> {
        self.check_health()?;

        let mut all = self.data.read().properties.clone();
        // Identifiers grow monotonically, so they break timestamp ties.
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        all.truncate(limit);
        Ok(all)
    }

    async fn find_property(&self, id: PropertyId) -> RepositoryResult<Option<Property>> {
        self.check_health()?;
        Ok(self
            .data
            .read()
            .properties
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert_property(&self, property: NewProperty) -> RepositoryResult<InsertAck> {
        self.check_health()?;

        let id = PropertyId::generate();
        self.data.write().properties.push(Property {
            id,
            fields: property.fields,
            created_at: property.created_at,
        });

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn delete_property(&self, id: PropertyId) -> RepositoryResult<DeleteAck> {
        self.check_health()?;

        let mut data = self.data.write();
        let before = data.properties.len();
        data.properties.retain(|p| p.id != id);

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: (before - data.properties.len()) as u64,
        })
    }

    async fn update_property(
        &self,
        id: PropertyId,
        patch: PropertyFields,
    ) -> RepositoryResult<UpdateAck> {
        self.check_health()?;

        let mut data = self.data.write();
        match data.properties.iter_mut().find(|p| p.id == id) {
            Some(property) => {
                let modified = property.fields.merge(patch);
                Ok(UpdateAck::new(1, u64::from(modified)))
            }
            None => Ok(UpdateAck::new(0, 0)),
        }
    }
}
