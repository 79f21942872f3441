//! MongoDB repository implementation.
//!
//! Properties live in a single collection of schema-flexible documents. The
//! driver pools connections internally, so the repository is a cheap `Clone`
//! around one `Client` and every handler issues its calls independently.
//!
//! ## Configuration
//!
//! See [`MongoConfig::from_env`] for the environment variables.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document};
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use std::time::Duration;

use crate::db::config::MongoConfig;
use crate::db::repository::{
    ErrorContext, PropertyRepository, RepositoryError, RepositoryResult,
};
use crate::models::{
    DeleteAck, InsertAck, NewProperty, Property, PropertyFields, PropertyId, PropertyQuery,
    SortSpec, UpdateAck, CREATED_AT_FIELD,
};

/// MongoDB-backed property repository.
#[derive(Clone, Debug)]
pub struct MongoRepository {
    client: Client,
    collection: Collection<Document>,
}

impl MongoRepository {
    /// Connect and verify the deployment answers a `ping`.
    ///
    /// # Returns
    /// * `Ok(MongoRepository)` on success
    /// * `Err(RepositoryError)` if the connection string is invalid or the
    ///   server cannot be reached
    pub async fn connect(config: MongoConfig) -> RepositoryResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            RepositoryError::configuration(format!(
                "Invalid connection string {}: {}",
                config.redacted_uri(),
                e
            ))
        })?;
        options.app_name = Some(config.app_name.clone());
        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = Some(config.min_pool_size);
        options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_sec));
        options.server_selection_timeout = Some(Duration::from_secs(config.connect_timeout_sec));
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)?;
        Self::ping(&client).await.map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("connect").with_details(config.redacted_uri()),
            )
        })?;
        info!(
            "Connected to MongoDB at {} (database={}, collection={})",
            config.redacted_uri(),
            config.database,
            config.collection
        );

        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        Ok(Self { client, collection })
    }

    async fn ping(client: &Client) -> RepositoryResult<()> {
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn collect(&self, cursor: mongodb::Cursor<Document>) -> RepositoryResult<Vec<Property>> {
        let documents: Vec<Document> = cursor.try_collect().await?;
        documents.into_iter().map(document_to_property).collect()
    }
}

/// Filter document for a listing query.
pub fn filter_document(query: &PropertyQuery) -> Document {
    let mut filter = Document::new();
    if let Some(email) = &query.owner_email {
        filter.insert("userEmail", email.clone());
    }
    if let Some(search) = &query.search {
        // Substring semantics: the input is matched literally.
        filter.insert(
            "propertyName",
            doc! { "$regex": regex::escape(search), "$options": "i" },
        );
    }
    filter
}

/// Sort document for a single-field sort.
pub fn sort_document(sort: &SortSpec) -> Document {
    let mut document = Document::new();
    document.insert(sort.field.clone(), sort.direction.as_i32());
    document
}

/// Split a stored document into identifier, timestamp and client fields.
fn document_to_property(mut document: Document) -> RepositoryResult<Property> {
    let id = match document.remove("_id") {
        Some(Bson::ObjectId(oid)) => oid,
        other => {
            return Err(RepositoryError::internal_with_context(
                format!("Stored document has a non-ObjectId _id: {:?}", other),
                ErrorContext::new("decode_property"),
            ))
        }
    };

    let created_at = match document.remove(CREATED_AT_FIELD) {
        Some(Bson::DateTime(dt)) => dt.to_chrono(),
        // Documents written without a timestamp fall back to the id's own.
        _ => id.timestamp().to_chrono(),
    };

    let fields: PropertyFields = serde_json::from_value(Bson::Document(document).into_relaxed_extjson())
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Stored property fields are malformed: {}", e),
                ErrorContext::new("decode_property").with_entity_id(id.to_hex()),
            )
        })?;

    Ok(Property {
        id: PropertyId::from(id),
        fields,
        created_at,
    })
}

fn id_filter(id: PropertyId) -> Document {
    doc! { "_id": ObjectId::from(id) }
}

#[async_trait]
impl PropertyRepository for MongoRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Self::ping(&self.client).await?;
        Ok(true)
    }

    async fn list_properties(&self, query: &PropertyQuery) -> RepositoryResult<Vec<Property>> {
        let filter = filter_document(query);
        let sort = sort_document(&query.sort);
        debug!("find filter={} sort={}", filter, sort);

        let cursor = self.collection.find(filter).sort(sort).await?;
        self.collect(cursor).await
    }

    async fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<Property>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(sort_document(&SortSpec::newest_first()))
            .limit(limit as i64)
            .await?;
        self.collect(cursor).await
    }

    async fn find_property(&self, id: PropertyId) -> RepositoryResult<Option<Property>> {
        self.collection
            .find_one(id_filter(id))
            .await?
            .map(document_to_property)
            .transpose()
    }

    async fn insert_property(&self, property: NewProperty) -> RepositoryResult<InsertAck> {
        let mut document = bson::to_document(&property.fields)?;
        document.insert(
            CREATED_AT_FIELD,
            bson::DateTime::from_chrono(property.created_at),
        );

        let result = self.collection.insert_one(document).await?;
        let inserted_id = result.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::internal_with_context(
                format!("Store returned a non-ObjectId id: {}", result.inserted_id),
                ErrorContext::new("insert_property"),
            )
        })?;

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: PropertyId::from(inserted_id),
        })
    }

    async fn delete_property(&self, id: PropertyId) -> RepositoryResult<DeleteAck> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn update_property(
        &self,
        id: PropertyId,
        patch: PropertyFields,
    ) -> RepositoryResult<UpdateAck> {
        if patch.is_empty() {
            // `$set: {}` is rejected by the server; report the match only.
            let matched = self.collection.count_documents(id_filter(id)).await?;
            return Ok(UpdateAck::new(matched, 0));
        }

        let set = bson::to_document(&patch)?;
        let result = self
            .collection
            .update_one(id_filter(id), doc! { "$set": set })
            .await?;
        Ok(UpdateAck::new(result.matched_count, result.modified_count))
    }

    async fn shutdown(&self) -> RepositoryResult<()> {
        info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortDirection;

    #[test]
    fn test_empty_query_has_empty_filter() {
        let query = PropertyQuery::default();
        assert!(filter_document(&query).is_empty());
        assert_eq!(sort_document(&query.sort), doc! { "createdAt": -1 });
    }

    #[test]
    fn test_filter_combines_email_and_escaped_search() {
        let query = PropertyQuery::default()
            .with_owner_email("owner@example.com")
            .with_search("a.b");
        assert_eq!(
            filter_document(&query),
            doc! {
                "userEmail": "owner@example.com",
                "propertyName": { "$regex": "a\\.b", "$options": "i" },
            }
        );
    }

    #[test]
    fn test_sort_document_uses_direction() {
        let sort = SortSpec::new("price", SortDirection::Ascending);
        assert_eq!(sort_document(&sort), doc! { "price": 1 });
    }

    #[test]
    fn test_document_to_property_splits_fields() {
        let oid = ObjectId::new();
        let created = bson::DateTime::now();
        let property = document_to_property(doc! {
            "_id": oid,
            "propertyName": "Chalet",
            "price": 900.0,
            "rooms": 4_i64,
            "createdAt": created,
        })
        .unwrap();

        assert_eq!(property.id, PropertyId::from(oid));
        assert_eq!(property.created_at, created.to_chrono());
        assert_eq!(property.fields.price, Some(900.0));
        assert_eq!(property.fields.extra.get("rooms"), Some(&serde_json::json!(4)));
        assert!(!property.fields.extra.contains_key("createdAt"));
    }

    #[test]
    fn test_document_without_timestamp_uses_id_time() {
        let oid = ObjectId::new();
        let property = document_to_property(doc! { "_id": oid }).unwrap();
        assert_eq!(property.created_at, oid.timestamp().to_chrono());
    }

    #[test]
    fn test_documents_from_other_writers_decode() {
        let oid = ObjectId::new();
        let property = document_to_property(doc! {
            "_id": oid,
            "propertyName": "Old",
            "price": "1200",
            "location": { "city": "Dhaka" },
        })
        .unwrap();

        assert_eq!(property.fields.property_name.as_deref(), Some("Old"));
        assert_eq!(property.fields.price, None);
        assert_eq!(property.fields.get("price"), Some(serde_json::json!("1200")));
        assert_eq!(
            property.fields.get("location"),
            Some(serde_json::json!({ "city": "Dhaka" }))
        );
    }

    #[test]
    fn test_decimal_price_decodes() {
        let property = document_to_property(doc! {
            "_id": ObjectId::new(),
            "price": Bson::Decimal128(bson::Decimal128::from_bytes([0; 16])),
        })
        .unwrap();

        assert_eq!(property.fields.price, None);
        let stored = property.fields.get("price").unwrap();
        assert!(stored.get("$numberDecimal").is_some());
    }
}
