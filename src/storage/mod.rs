//! Storage layer for the portal
//!
//! This module provides document persistence and uploaded file storage.

/// Database storage module
pub mod database;
/// Collection document store module
pub mod documents;
/// File storage module
pub mod files;

use crate::config::{DocumentBackend, StorageConfig};
use crate::utils::error::Result;
use documents::{DocumentStore, MemoryDocumentStore, SqlDocumentStore};
use files::{FileStorage, LocalStorage};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main storage layer that orchestrates all storage backends
#[derive(Debug, Clone)]
pub struct StorageLayer {
    /// Collection documents
    pub documents: Arc<dyn DocumentStore>,
    /// Uploaded blobs
    pub files: Arc<dyn FileStorage>,
    /// Origin prepended to blob URLs
    pub public_base_url: Option<String>,
}

impl StorageLayer {
    /// Create a new storage layer
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        info!("Initializing storage layer");

        let documents: Arc<dyn DocumentStore> = match config.documents {
            DocumentBackend::Database => {
                debug!("Connecting to database");
                Arc::new(SqlDocumentStore::connect(&config.database).await?)
            }
            DocumentBackend::Memory => {
                warn!("Using in-memory document store; data is lost on restart");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        debug!("Initializing file storage");
        let files = Arc::new(LocalStorage::new(&config.files.local_path).await?);

        info!(
            backend = documents.backend_name(),
            "Storage layer initialized successfully"
        );
        Ok(Self::from_parts(
            documents,
            files,
            config.files.public_base_url.clone(),
        ))
    }

    /// Assemble a storage layer from ready backends
    pub fn from_parts(
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStorage>,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            documents,
            files,
            public_base_url,
        }
    }

    /// Retrievable URL of a stored blob
    pub fn blob_url(&self, file_id: &str) -> String {
        files::public_url(self.public_base_url.as_deref(), file_id)
    }

    /// Health check for all storage backends
    pub async fn health_check(&self) -> StorageHealthStatus {
        let documents = match self.documents.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Document store health check failed: {}", e);
                false
            }
        };

        let files = match self.files.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("File storage health check failed: {}", e);
                false
            }
        };

        StorageHealthStatus {
            backend: self.documents.backend_name(),
            documents,
            files,
            overall: documents && files,
        }
    }
}

/// Storage health status
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageHealthStatus {
    /// Document store backend name
    pub backend: &'static str,
    /// Document store health status
    pub documents: bool,
    /// File storage health status
    pub files: bool,
    /// Overall health status
    pub overall: bool,
}
