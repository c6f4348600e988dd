//! Homepage and footer content
//!
//! Both are singleton documents. A missing singleton is written with its
//! defaults on first read so later field patches have something to merge into.

use crate::models::{FooterSettings, HomepageSettings};
use crate::storage::documents::{Collection, DocumentStore, get_typed, to_document_data};
use crate::utils::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::info;

const HOMEPAGE: (Collection, &str) = (Collection::Settings, "homepage");
const FOOTER: (Collection, &str) = (Collection::SiteConfig, "footer_data");

#[derive(Debug, Clone)]
pub struct SiteService {
    store: Arc<dyn DocumentStore>,
}

impl SiteService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn homepage(&self) -> Result<HomepageSettings> {
        self.load_or_seed(HOMEPAGE).await
    }

    pub async fn save_homepage(&self, settings: &HomepageSettings) -> Result<HomepageSettings> {
        self.save(HOMEPAGE, settings).await
    }

    pub async fn footer(&self) -> Result<FooterSettings> {
        self.load_or_seed(FOOTER).await
    }

    pub async fn save_footer(&self, settings: &FooterSettings) -> Result<FooterSettings> {
        self.save(FOOTER, settings).await
    }

    async fn load_or_seed<T>(&self, (collection, id): (Collection, &str)) -> Result<T>
    where
        T: Default + Serialize + DeserializeOwned,
    {
        if let Some(settings) = get_typed(self.store.as_ref(), collection, id).await? {
            return Ok(settings);
        }

        let defaults = T::default();
        self.store
            .set(collection, id, to_document_data(&defaults)?)
            .await?;
        info!(%collection, id, "Seeded default site content");
        Ok(defaults)
    }

    async fn save<T>(&self, (collection, id): (Collection, &str), settings: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let doc = self
            .store
            .set(collection, id, to_document_data(settings)?)
            .await?;
        info!(%collection, id, "Saved site content");
        doc.decode()
    }
}
