//! Collection-oriented document store
//!
//! Every piece of portal data lives in a named collection of JSON documents
//! keyed by string ids. Writes are whole-document overwrites or field-level
//! patches, and each collection can be observed through a live snapshot
//! channel that is republished after every committed write.
//!
//! Two backends implement [`DocumentStore`]:
//! - [`SqlDocumentStore`] persists documents through sea-orm
//! - [`MemoryDocumentStore`] keeps them in process memory

mod memory;
mod sql;
mod subscription;

pub use memory::MemoryDocumentStore;
pub use sql::SqlDocumentStore;
pub use subscription::{Subscription, SubscriptionHub};

use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Named collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Users,
    Credentials,
    Funds,
    ProjectRequests,
    GalleryAlbums,
    Settings,
    SiteConfig,
    IdCards,
    News,
}

impl Collection {
    /// Every collection, in declaration order
    pub const ALL: [Collection; 9] = [
        Collection::Users,
        Collection::Credentials,
        Collection::Funds,
        Collection::ProjectRequests,
        Collection::GalleryAlbums,
        Collection::Settings,
        Collection::SiteConfig,
        Collection::IdCards,
        Collection::News,
    ];

    /// Stored collection name
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Credentials => "credentials",
            Collection::Funds => "funds",
            Collection::ProjectRequests => "project_requests",
            Collection::GalleryAlbums => "gallery_albums",
            Collection::Settings => "settings",
            Collection::SiteConfig => "site_config",
            Collection::IdCards => "id_cards",
            Collection::News => "news",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Decode into a typed record; the document id fills an absent `id` field
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut data = self.data.clone();
        if let Value::Object(map) = &mut data {
            map.entry("id")
                .or_insert_with(|| Value::String(self.id.clone()));
        }
        serde_json::from_value(data)
            .map_err(|e| PortalError::store(format!("Malformed document {}: {}", self.id, e)))
    }
}

/// Current contents of a collection, shared between subscribers
pub type Snapshot = Arc<Vec<Document>>;

/// In-place edit applied to an existing document's data
pub type DocumentMutation = Box<dyn FnOnce(&mut Value) -> Result<()> + Send>;

/// Serialize a record into document data, dropping a redundant `id` field
pub fn to_document_data<T: Serialize>(record: &T) -> Result<Value> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    Ok(value)
}

/// Storage contract shared by all backends
///
/// Writes to one collection are applied one at a time and each committed
/// write is followed by a snapshot publish, so a subscriber never observes
/// snapshots out of write order. Distinct collections are independent.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Fetch one document
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>>;

    /// All documents of a collection, oldest first
    async fn list(&self, collection: Collection) -> Result<Vec<Document>>;

    /// Create or overwrite a document
    async fn set(&self, collection: Collection, id: &str, data: Value) -> Result<Document>;

    /// Deep-merge fields into a document, creating it when absent
    async fn merge(&self, collection: Collection, id: &str, patch: Value) -> Result<Document>;

    /// Apply a mutation to an existing document; `NotFound` when absent
    async fn modify(
        &self,
        collection: Collection,
        id: &str,
        mutation: DocumentMutation,
    ) -> Result<Document>;

    /// Insert a document under a generated id
    async fn add(&self, collection: Collection, data: Value) -> Result<Document>;

    /// Remove a document; returns whether it existed
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool>;

    /// Live snapshots of a collection, starting with its current contents
    async fn subscribe(&self, collection: Collection) -> Result<watch::Receiver<Snapshot>>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> Result<()>;

    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;

    /// Replace top-level fields of an existing document
    async fn update(&self, collection: Collection, id: &str, fields: Value) -> Result<Document> {
        let Value::Object(fields) = fields else {
            return Err(PortalError::bad_request("Update fields must be a JSON object"));
        };
        self.modify(
            collection,
            id,
            Box::new(move |data: &mut Value| {
                let map = object_mut(data)?;
                for (key, value) in fields {
                    map.insert(key, value);
                }
                Ok(())
            }),
        )
        .await
    }

    /// Append values to an array field, skipping ones already present
    async fn array_union(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> Result<Document> {
        let field = field.to_string();
        self.modify(
            collection,
            id,
            Box::new(move |data: &mut Value| {
                let items = array_field_mut(data, &field)?;
                for value in values {
                    if !items.contains(&value) {
                        items.push(value);
                    }
                }
                Ok(())
            }),
        )
        .await
    }

    /// Remove every occurrence of the given values from an array field
    async fn array_remove(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> Result<Document> {
        let field = field.to_string();
        self.modify(
            collection,
            id,
            Box::new(move |data: &mut Value| {
                let items = array_field_mut(data, &field)?;
                items.retain(|item| !values.contains(item));
                Ok(())
            }),
        )
        .await
    }
}

fn object_mut(data: &mut Value) -> Result<&mut serde_json::Map<String, Value>> {
    data.as_object_mut()
        .ok_or_else(|| PortalError::store("Document data is not an object"))
}

fn array_field_mut<'a>(data: &'a mut Value, field: &str) -> Result<&'a mut Vec<Value>> {
    let entry = object_mut(data)?
        .entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if entry.is_null() {
        *entry = Value::Array(Vec::new());
    }
    entry
        .as_array_mut()
        .ok_or_else(|| PortalError::validation(format!("Field '{}' is not an array", field)))
}

/// Fetch and decode one record
pub async fn get_typed<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
) -> Result<Option<T>> {
    store
        .get(collection, id)
        .await?
        .map(|doc| doc.decode())
        .transpose()
}

/// List and decode a collection, skipping documents that do not decode
pub async fn list_typed<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
) -> Result<Vec<T>> {
    Ok(decode_all(&store.list(collection).await?, collection))
}

/// Decode a document slice, logging and skipping malformed entries
pub fn decode_all<T: DeserializeOwned>(docs: &[Document], collection: Collection) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| match doc.decode() {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(%collection, id = %doc.id, error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}
