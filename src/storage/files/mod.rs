//! Uploaded file storage
//!
//! Blobs (hero images, gallery photos, card photos) are written once and
//! served back by id under `/api/blobs/{id}`.

mod local;
mod types;

pub use local::LocalStorage;
pub use types::{FileMetadata, StoredFile};

use crate::utils::error::Result;
use async_trait::async_trait;

/// Path prefix blobs are served from
pub const BLOB_ROUTE: &str = "/api/blobs";

/// Blob storage backend
#[async_trait]
pub trait FileStorage: Send + Sync + std::fmt::Debug {
    /// Store a file and return its metadata
    async fn store(&self, filename: &str, content: &[u8]) -> Result<FileMetadata>;

    /// Retrieve file content by ID
    async fn get(&self, file_id: &str) -> Result<StoredFile>;

    /// Delete a file by ID; returns whether it existed
    async fn delete(&self, file_id: &str) -> Result<bool>;

    /// Check if a file exists
    async fn exists(&self, file_id: &str) -> Result<bool>;

    /// Get file metadata
    async fn metadata(&self, file_id: &str) -> Result<FileMetadata>;

    /// Health check
    async fn health_check(&self) -> Result<()>;
}

/// Retrievable URL of a stored blob
///
/// Relative to the server root when no public base URL is configured.
pub fn public_url(public_base_url: Option<&str>, file_id: &str) -> String {
    match public_base_url {
        Some(base) => format!("{}{}/{}", base.trim_end_matches('/'), BLOB_ROUTE, file_id),
        None => format!("{}/{}", BLOB_ROUTE, file_id),
    }
}

/// Extract the blob id from a URL produced by [`public_url`]
pub fn blob_id_from_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once(BLOB_ROUTE)?;
    let id = rest.strip_prefix('/')?;
    let id = id.split(['?', '#']).next().unwrap_or_default();
    (!id.is_empty() && !id.contains('/')).then_some(id)
}
