//! Photo gallery albums

use crate::models::GalleryAlbum;
use crate::storage::documents::{Collection, DocumentStore, list_typed, to_document_data};
use crate::utils::error::{PortalError, Result};
use crate::utils::is_blank;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct GalleryService {
    store: Arc<dyn DocumentStore>,
}

impl GalleryService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Albums, newest first
    pub async fn list(&self) -> Result<Vec<GalleryAlbum>> {
        let mut albums: Vec<GalleryAlbum> =
            list_typed(self.store.as_ref(), Collection::GalleryAlbums).await?;
        albums.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(albums)
    }

    pub async fn create_album(&self, name: &str) -> Result<GalleryAlbum> {
        if is_blank(name) {
            return Err(PortalError::validation("Album name is required"));
        }

        let mut album = GalleryAlbum {
            id: String::new(),
            name: name.trim().to_string(),
            images: Vec::new(),
            created_at: Utc::now(),
        };
        let doc = self
            .store
            .add(Collection::GalleryAlbums, to_document_data(&album)?)
            .await?;
        album.id = doc.id;

        info!(id = %album.id, name = %album.name, "Created album");
        Ok(album)
    }

    pub async fn delete_album(&self, id: &str) -> Result<bool> {
        self.store.delete(Collection::GalleryAlbums, id).await
    }

    /// Add an image URL unless the album already has it
    pub async fn add_image(&self, id: &str, url: &str) -> Result<GalleryAlbum> {
        if is_blank(url) {
            return Err(PortalError::validation("Image URL is required"));
        }
        self.store
            .array_union(Collection::GalleryAlbums, id, "images", vec![json!(url.trim())])
            .await?
            .decode()
    }

    pub async fn remove_image(&self, id: &str, url: &str) -> Result<GalleryAlbum> {
        self.store
            .array_remove(Collection::GalleryAlbums, id, "images", vec![json!(url)])
            .await?
            .decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::documents::MemoryDocumentStore;

    fn service() -> GalleryService {
        GalleryService::new(Arc::new(MemoryDocumentStore::new()))
    }

    #[tokio::test]
    async fn test_album_images_are_a_set() {
        let gallery = service();
        let album = gallery.create_album("Star Night 2025").await.unwrap();

        gallery.add_image(&album.id, "/api/blobs/a").await.unwrap();
        gallery.add_image(&album.id, "/api/blobs/b").await.unwrap();
        let album = gallery.add_image(&album.id, "/api/blobs/a").await.unwrap();
        assert_eq!(album.images, ["/api/blobs/a", "/api/blobs/b"]);

        let album = gallery.remove_image(&album.id, "/api/blobs/a").await.unwrap();
        assert_eq!(album.images, ["/api/blobs/b"]);
    }

    #[tokio::test]
    async fn test_album_name_required() {
        let gallery = service();
        assert!(matches!(
            gallery.create_album("   ").await.unwrap_err(),
            PortalError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_album() {
        let gallery = service();
        assert!(gallery.add_image("nope", "/x.png").await.is_err());
        assert!(!gallery.delete_album("nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let gallery = service();
        gallery.create_album("First").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        gallery.create_album("Second").await.unwrap();

        let names: Vec<_> = gallery.list().await.unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, ["Second", "First"]);
    }
}
