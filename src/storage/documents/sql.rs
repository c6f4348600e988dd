//! Document store persisted through sea-orm

use super::{Collection, Document, DocumentMutation, DocumentStore, Snapshot, SubscriptionHub};
use crate::config::DatabaseConfig;
use crate::storage::database::Database;
use crate::storage::database::entities::{self, document};
use crate::utils::error::{PortalError, Result};
use crate::utils::{generate_id, merge_json_values};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

impl From<document::Model> for Document {
    fn from(model: document::Model) -> Self {
        Self {
            id: model.id,
            data: model.data,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Document store backed by the `documents` table
#[derive(Debug)]
pub struct SqlDocumentStore {
    db: Database,
    hub: Arc<SubscriptionHub>,
}

impl SqlDocumentStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            hub: Arc::new(SubscriptionHub::new()),
        }
    }

    /// Connect, and migrate when the configuration asks for it
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db = Database::new(config).await?;
        if config.auto_migrate {
            db.migrate().await?;
        }
        Ok(Self::new(db))
    }

    async fn fetch(&self, collection: Collection, id: &str) -> Result<Option<document::Model>> {
        entities::Document::find_by_id((collection.as_str().to_string(), id.to_string()))
            .one(self.db.connection())
            .await
            .map_err(PortalError::Database)
    }

    async fn load_all(&self, collection: Collection) -> Result<Vec<Document>> {
        load_collection(&self.db, collection).await
    }

    async fn store(
        &self,
        collection: Collection,
        id: &str,
        data: Value,
        existing: Option<document::Model>,
    ) -> Result<Document> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let model = match existing {
            Some(model) => {
                let mut active: document::ActiveModel = model.into();
                active.data = Set(data);
                active.updated_at = Set(now);
                active.update(self.db.connection()).await?
            }
            None => {
                document::ActiveModel {
                    collection: Set(collection.as_str().to_string()),
                    id: Set(id.to_string()),
                    data: Set(data),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(self.db.connection())
                .await?
            }
        };
        Ok(model.into())
    }

    /// Republish the collection; the write already committed, so a failed
    /// reload is retried in the background instead of failing the write
    async fn publish(&self, collection: Collection) {
        if !self.hub.is_watched(collection) {
            return;
        }
        match self.load_all(collection).await {
            Ok(docs) => self.hub.publish(collection, Arc::new(docs)),
            Err(e) => {
                warn!(%collection, error = %e, "Failed to reload snapshot after write");
                let db = self.db.clone();
                self.hub.spawn_reload(collection, move || {
                    let db = db.clone();
                    async move { load_collection(&db, collection).await }
                });
            }
        }
    }
}

/// Every document of a collection, oldest first
async fn load_collection(db: &Database, collection: Collection) -> Result<Vec<Document>> {
    let models = entities::Document::find()
        .filter(document::Column::Collection.eq(collection.as_str()))
        .order_by_asc(document::Column::CreatedAt)
        .order_by_asc(document::Column::Id)
        .all(db.connection())
        .await
        .map_err(PortalError::Database)?;
    Ok(models.into_iter().map(Document::from).collect())
}

#[async_trait]
impl DocumentStore for SqlDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        Ok(self.fetch(collection, id).await?.map(Document::from))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>> {
        self.load_all(collection).await
    }

    async fn set(&self, collection: Collection, id: &str, data: Value) -> Result<Document> {
        let _guard = self.hub.lock(collection).await;
        let existing = self.fetch(collection, id).await?;
        let doc = self.store(collection, id, data, existing).await?;
        self.publish(collection).await;
        Ok(doc)
    }

    async fn merge(&self, collection: Collection, id: &str, patch: Value) -> Result<Document> {
        let _guard = self.hub.lock(collection).await;
        let existing = self.fetch(collection, id).await?;
        let mut data = existing
            .as_ref()
            .map(|model| model.data.clone())
            .unwrap_or_else(|| Value::Object(Default::default()));
        merge_json_values(&mut data, &patch);
        let doc = self.store(collection, id, data, existing).await?;
        self.publish(collection).await;
        Ok(doc)
    }

    async fn modify(
        &self,
        collection: Collection,
        id: &str,
        mutation: DocumentMutation,
    ) -> Result<Document> {
        let _guard = self.hub.lock(collection).await;
        let existing = self
            .fetch(collection, id)
            .await?
            .ok_or_else(|| PortalError::not_found(format!("{}/{} not found", collection, id)))?;
        let mut data = existing.data.clone();
        mutation(&mut data)?;
        let doc = self.store(collection, id, data, Some(existing)).await?;
        self.publish(collection).await;
        Ok(doc)
    }

    async fn add(&self, collection: Collection, data: Value) -> Result<Document> {
        let id = generate_id();
        let _guard = self.hub.lock(collection).await;
        let doc = self.store(collection, &id, data, None).await?;
        self.publish(collection).await;
        Ok(doc)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let _guard = self.hub.lock(collection).await;
        let result =
            entities::Document::delete_by_id((collection.as_str().to_string(), id.to_string()))
                .exec(self.db.connection())
                .await
                .map_err(PortalError::Database)?;
        let existed = result.rows_affected > 0;
        if existed {
            debug!(%collection, id, "Deleted document");
            self.publish(collection).await;
        }
        Ok(existed)
    }

    async fn subscribe(&self, collection: Collection) -> Result<watch::Receiver<Snapshot>> {
        let _guard = self.hub.lock(collection).await;
        let current = Arc::new(self.load_all(collection).await?);
        Ok(self.hub.subscribe_with(collection, current))
    }

    async fn health_check(&self) -> Result<()> {
        self.db.health_check().await
    }

    fn backend_name(&self) -> &'static str {
        match self.db.backend_type() {
            crate::storage::database::DatabaseBackendType::SQLite => "sqlite",
            crate::storage::database::DatabaseBackendType::PostgreSQL => "postgres",
        }
    }
}
