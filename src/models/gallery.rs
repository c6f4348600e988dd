//! Photo gallery albums

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Album of image URLs (collection `gallery_albums`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryAlbum {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}
