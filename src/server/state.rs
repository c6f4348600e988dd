//! Application state shared across HTTP handlers
//!
//! This module provides the AppState struct and its implementations.

use crate::auth::{AccessCodeVerifier, AuthSystem};
use crate::config::Config;
use crate::services::{
    CardExporter, CardService, DashboardProjection, FinanceService, GalleryService,
    HttpPhotoSource, NewsService, PhotoSource, SiteService, UserService,
};
use crate::storage::StorageLayer;
use crate::utils::error::Result;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Services hold their own handle to the document store; cloning the state
/// only bumps reference counts.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Portal configuration (shared read-only)
    pub config: Arc<Config>,
    /// Authentication system
    pub auth: Arc<AuthSystem>,
    /// Storage layer
    pub storage: Arc<StorageLayer>,
    /// Access-code unlock flow
    pub access: AccessCodeVerifier,
    pub users: UserService,
    pub cards: CardService,
    pub exporter: CardExporter,
    pub finance: FinanceService,
    pub gallery: GalleryService,
    pub site: SiteService,
    pub news: NewsService,
    /// Live dashboard figures
    pub dashboard: DashboardProjection,
}

impl AppState {
    /// Create a new AppState, fetching card photos over HTTP
    pub async fn new(config: Config, auth: AuthSystem, storage: StorageLayer) -> Result<Self> {
        let photos = Arc::new(HttpPhotoSource::new(storage.files.clone(), config.card())?);
        Self::with_photo_source(config, auth, storage, photos).await
    }

    /// Create a new AppState with a custom photo source
    pub async fn with_photo_source(
        config: Config,
        auth: AuthSystem,
        storage: StorageLayer,
        photos: Arc<dyn PhotoSource>,
    ) -> Result<Self> {
        let store = storage.documents.clone();

        Ok(Self {
            access: AccessCodeVerifier::new(store.clone(), auth.sessions().clone()),
            users: UserService::new(store.clone(), config.auth().default_member_password.clone()),
            cards: CardService::new(store.clone(), config.card().defaults.clone()),
            exporter: CardExporter::new(config.card(), photos),
            finance: FinanceService::new(store.clone()),
            gallery: GalleryService::new(store.clone()),
            site: SiteService::new(store.clone()),
            news: NewsService::new(store.clone()),
            dashboard: DashboardProjection::open(store.as_ref()).await?,
            config: Arc::new(config),
            auth: Arc::new(auth),
            storage: Arc::new(storage),
        })
    }

    /// Get portal configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
