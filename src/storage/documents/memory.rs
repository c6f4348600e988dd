//! In-process document store

use super::{Collection, Document, DocumentMutation, DocumentStore, Snapshot, SubscriptionHub};
use crate::utils::error::{PortalError, Result};
use crate::utils::{generate_id, merge_json_values};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

type CollectionMap = BTreeMap<String, Document>;

/// Document store held entirely in memory
///
/// Used by tests and by deployments that select `storage.documents: memory`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, CollectionMap>>,
    hub: SubscriptionHub,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self, collection: Collection) -> Snapshot {
        let collections = self.collections.read();
        let mut docs: Vec<Document> = collections
            .get(&collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default();
        docs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Arc::new(docs)
    }

    fn publish(&self, collection: Collection) {
        if self.hub.is_watched(collection) {
            self.hub.publish(collection, self.snapshot(collection));
        }
    }

    fn write(&self, collection: Collection, id: &str, data: Value) -> Document {
        let now = Utc::now();
        let mut collections = self.collections.write();
        let docs = collections.entry(collection).or_default();
        let created_at = docs.get(id).map(|doc| doc.created_at).unwrap_or(now);
        let doc = Document {
            id: id.to_string(),
            data,
            created_at,
            updated_at: now,
        };
        docs.insert(id.to_string(), doc.clone());
        doc
    }

    fn read(&self, collection: Collection, id: &str) -> Option<Document> {
        self.collections
            .read()
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        Ok(self.read(collection, id))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>> {
        Ok(self.snapshot(collection).as_ref().clone())
    }

    async fn set(&self, collection: Collection, id: &str, data: Value) -> Result<Document> {
        let _guard = self.hub.lock(collection).await;
        let doc = self.write(collection, id, data);
        self.publish(collection);
        Ok(doc)
    }

    async fn merge(&self, collection: Collection, id: &str, patch: Value) -> Result<Document> {
        let _guard = self.hub.lock(collection).await;
        let mut data = self
            .read(collection, id)
            .map(|doc| doc.data)
            .unwrap_or_else(|| Value::Object(Default::default()));
        merge_json_values(&mut data, &patch);
        let doc = self.write(collection, id, data);
        self.publish(collection);
        Ok(doc)
    }

    async fn modify(
        &self,
        collection: Collection,
        id: &str,
        mutation: DocumentMutation,
    ) -> Result<Document> {
        let _guard = self.hub.lock(collection).await;
        let mut data = self
            .read(collection, id)
            .map(|doc| doc.data)
            .ok_or_else(|| PortalError::not_found(format!("{}/{} not found", collection, id)))?;
        mutation(&mut data)?;
        let doc = self.write(collection, id, data);
        self.publish(collection);
        Ok(doc)
    }

    async fn add(&self, collection: Collection, data: Value) -> Result<Document> {
        let id = generate_id();
        self.set(collection, &id, data).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let _guard = self.hub.lock(collection).await;
        let existed = self
            .collections
            .write()
            .get_mut(&collection)
            .and_then(|docs| docs.remove(id))
            .is_some();
        if existed {
            debug!(%collection, id, "Deleted document");
            self.publish(collection);
        }
        Ok(existed)
    }

    async fn subscribe(&self, collection: Collection) -> Result<watch::Receiver<Snapshot>> {
        let _guard = self.hub.lock(collection).await;
        Ok(self
            .hub
            .subscribe_with(collection, self.snapshot(collection)))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
