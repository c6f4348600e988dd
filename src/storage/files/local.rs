//! Local file system storage implementation

use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use super::FileStorage;
use super::types::{FileMetadata, StoredFile};

/// Local file storage
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage instance
    pub async fn new(base_path: &str) -> Result<Self> {
        let path = PathBuf::from(base_path);

        if !path.exists() {
            fs::create_dir_all(&path).await.map_err(|e| {
                PortalError::FileStorage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        info!("Local file storage initialized at: {}", path.display());
        Ok(Self { base_path: path })
    }

    /// Reject ids that are not ours before they reach the file system
    fn checked_id(file_id: &str) -> Result<Uuid> {
        Uuid::parse_str(file_id)
            .map_err(|_| PortalError::not_found(format!("File not found: {}", file_id)))
    }

    /// Get file path for a given file ID
    fn get_file_path(&self, file_id: &Uuid) -> PathBuf {
        let id = file_id.to_string();
        self.base_path.join(&id[..2]).join(&id)
    }

    /// Get metadata path for a given file ID
    fn get_metadata_path(&self, file_id: &Uuid) -> PathBuf {
        let id = file_id.to_string();
        self.base_path.join(&id[..2]).join(format!("{}.meta", id))
    }

    async fn store_metadata(&self, file_id: &Uuid, metadata: &FileMetadata) -> Result<()> {
        let content = serde_json::to_string_pretty(metadata).map_err(|e| {
            PortalError::FileStorage(format!("Failed to serialize metadata: {}", e))
        })?;

        fs::write(self.get_metadata_path(file_id), content)
            .await
            .map_err(|e| PortalError::FileStorage(format!("Failed to write metadata: {}", e)))
    }

    /// Detect content type from filename; scriptable formats such as SVG stay opaque
    pub(crate) fn detect_content_type(filename: &str) -> String {
        let ext = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("pdf") => "application/pdf",
            Some("txt") => "text/plain",
            Some("json") => "application/json",
            _ => "application/octet-stream",
        }
        .to_string()
    }

    /// Calculate file checksum
    fn calculate_checksum(content: &[u8]) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(content);
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    async fn store(&self, filename: &str, content: &[u8]) -> Result<FileMetadata> {
        let file_id = Uuid::new_v4();
        let file_path = self.get_file_path(&file_id);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                PortalError::FileStorage(format!("Failed to create directory: {}", e))
            })?;
        }

        fs::write(&file_path, content)
            .await
            .map_err(|e| PortalError::FileStorage(format!("Failed to write file: {}", e)))?;

        let metadata = FileMetadata {
            id: file_id.to_string(),
            filename: filename.to_string(),
            content_type: Self::detect_content_type(filename),
            size: content.len() as u64,
            created_at: chrono::Utc::now(),
            checksum: Self::calculate_checksum(content),
        };
        self.store_metadata(&file_id, &metadata).await?;

        debug!("File stored: {} -> {}", filename, file_id);
        Ok(metadata)
    }

    async fn get(&self, file_id: &str) -> Result<StoredFile> {
        let metadata = self.metadata(file_id).await?;
        let id = Self::checked_id(file_id)?;

        let content = fs::read(self.get_file_path(&id))
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    PortalError::not_found(format!("File not found: {}", file_id))
                }
                _ => PortalError::FileStorage(format!("Failed to read file: {}", e)),
            })?;

        Ok(StoredFile { metadata, content })
    }

    async fn delete(&self, file_id: &str) -> Result<bool> {
        let Ok(id) = Self::checked_id(file_id) else {
            return Ok(false);
        };
        let file_path = self.get_file_path(&id);
        let metadata_path = self.get_metadata_path(&id);
        let existed = file_path.exists();

        if existed {
            fs::remove_file(&file_path)
                .await
                .map_err(|e| PortalError::FileStorage(format!("Failed to delete file: {}", e)))?;
        }
        if metadata_path.exists() {
            fs::remove_file(&metadata_path).await.map_err(|e| {
                PortalError::FileStorage(format!("Failed to delete metadata: {}", e))
            })?;
        }

        debug!("File deleted: {}", file_id);
        Ok(existed)
    }

    async fn exists(&self, file_id: &str) -> Result<bool> {
        Ok(Self::checked_id(file_id).is_ok_and(|id| self.get_file_path(&id).exists()))
    }

    async fn metadata(&self, file_id: &str) -> Result<FileMetadata> {
        let id = Self::checked_id(file_id)?;
        let metadata_path = self.get_metadata_path(&id);

        if !metadata_path.exists() {
            return Err(PortalError::not_found(format!(
                "File metadata not found: {}",
                file_id
            )));
        }

        let content = fs::read_to_string(&metadata_path)
            .await
            .map_err(|e| PortalError::FileStorage(format!("Failed to read metadata: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| PortalError::FileStorage(format!("Failed to parse metadata: {}", e)))
    }

    async fn health_check(&self) -> Result<()> {
        if !self.base_path.exists() {
            return Err(PortalError::FileStorage(
                "Storage directory does not exist".to_string(),
            ));
        }

        let test_file = self.base_path.join(".health_check");
        fs::write(&test_file, b"health_check")
            .await
            .map_err(|e| PortalError::FileStorage(format!("Storage not writable: {}", e)))?;
        let _ = fs::remove_file(&test_file).await;

        Ok(())
    }
}
