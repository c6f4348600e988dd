//! News and announcements

use super::dashboard::by_date_desc;
use crate::models::{DownloadLink, NewsItem};
use crate::storage::documents::{Collection, DocumentStore, list_typed, to_document_data};
use crate::utils::error::{PortalError, Result};
use crate::utils::{generate_id, is_blank, is_valid_url};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Items shown on the homepage when no limit is given
pub const DEFAULT_LATEST: usize = 3;

/// Submitted news item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNewsItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub download_links: Vec<NewDownloadLink>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDownloadLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct NewsService {
    store: Arc<dyn DocumentStore>,
}

impl NewsService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Most recent `limit` items
    pub async fn latest(&self, limit: Option<usize>) -> Result<Vec<NewsItem>> {
        let mut items: Vec<NewsItem> = list_typed(self.store.as_ref(), Collection::News).await?;
        items.sort_by(|a, b| by_date_desc(&a.date, &b.date));
        items.truncate(limit.unwrap_or(DEFAULT_LATEST));
        Ok(items)
    }

    pub async fn create(&self, item: NewNewsItem) -> Result<NewsItem> {
        if is_blank(&item.title) {
            return Err(PortalError::validation("Title is required"));
        }
        let download_links = item
            .download_links
            .into_iter()
            .filter(|link| !is_blank(&link.url))
            .map(|link| {
                if !is_valid_url(&link.url) && !link.url.starts_with('/') {
                    return Err(PortalError::validation(format!("Invalid link URL: {}", link.url)));
                }
                Ok(DownloadLink {
                    id: generate_id(),
                    label: link.label.trim().to_string(),
                    url: link.url.trim().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut news = NewsItem {
            id: String::new(),
            title: item.title.trim().to_string(),
            description: item.description.trim().to_string(),
            image_url: item.image_url.filter(|u| !is_blank(u)),
            category: item.category.filter(|c| !is_blank(c)),
            pdf_url: item.pdf_url.filter(|u| !is_blank(u)),
            download_links,
            date: item
                .date
                .filter(|d| !is_blank(d))
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
        };
        let doc = self
            .store
            .add(Collection::News, to_document_data(&news)?)
            .await?;
        news.id = doc.id;

        info!(id = %news.id, title = %news.title, "Published news item");
        Ok(news)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete(Collection::News, id).await
    }
}
