//! File storage types

use serde::{Deserialize, Serialize};

/// File metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// File ID
    pub id: String,
    /// Original filename
    pub filename: String,
    /// MIME content type
    pub content_type: String,
    /// File size in bytes
    pub size: u64,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// SHA-256 of the content, hex encoded
    pub checksum: String,
}

/// File content together with its metadata
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub metadata: FileMetadata,
    pub content: Vec<u8>,
}
