//! Portal fixtures
//!
//! Every fixture builds real services over a real store; only card photo
//! downloads are replaced.

use async_trait::async_trait;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use society_portal::Config;
use society_portal::auth::AuthSystem;
use society_portal::models::{Role, UserRecord};
use society_portal::server::AppState;
use society_portal::services::{NewUser, PhotoSource, UserCodes};
use society_portal::storage::StorageLayer;
use society_portal::storage::documents::{DocumentStore, MemoryDocumentStore};
use society_portal::storage::files::LocalStorage;
use society_portal::utils::error::{PortalError, Result};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

pub const PASSWORD: &str = "correct-horse";

/// Photo source that serves one solid-colour PNG, or fails on demand
#[derive(Debug, Default)]
pub struct StubPhotos {
    pub fail: bool,
}

#[async_trait]
impl PhotoSource for StubPhotos {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if self.fail {
            return Err(PortalError::export(format!("unreachable: {}", url)));
        }
        let photo = RgbImage::from_pixel(60, 80, Rgb([200, 40, 40]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(photo)
            .write_to(&mut bytes, ImageOutputFormat::Png)
            .map_err(|e| PortalError::internal(e.to_string()))?;
        Ok(bytes.into_inner())
    }
}

/// A portal with its state and the temp dir holding its blobs
pub struct TestPortal {
    pub state: AppState,
    _blobs: TempDir,
}

impl TestPortal {
    /// Portal over an in-memory document store
    pub async fn new() -> Self {
        Self::with_store(Arc::new(MemoryDocumentStore::new()), StubPhotos::default()).await
    }

    /// Portal whose card photos cannot be fetched
    pub async fn with_broken_photos() -> Self {
        Self::with_store(Arc::new(MemoryDocumentStore::new()), StubPhotos { fail: true }).await
    }

    pub async fn with_store(store: Arc<dyn DocumentStore>, photos: StubPhotos) -> Self {
        Self::with_parts(store, photos, Config::default()).await
    }

    pub async fn with_parts(
        store: Arc<dyn DocumentStore>,
        photos: StubPhotos,
        config: Config,
    ) -> Self {
        let blobs = tempfile::tempdir().expect("temp dir");
        let files = Arc::new(
            LocalStorage::new(blobs.path().to_str().expect("utf-8 path"))
                .await
                .expect("blob storage"),
        );
        let storage = StorageLayer::from_parts(store, files, None);
        let auth = AuthSystem::new(config.auth());
        let state = AppState::with_photo_source(config, auth, storage, Arc::new(photos))
            .await
            .expect("app state");

        Self {
            state,
            _blobs: blobs,
        }
    }

    pub fn data(&self) -> actix_web::web::Data<AppState> {
        actix_web::web::Data::new(self.state.clone())
    }

    /// Create an account with the fixture password
    pub async fn user(&self, email: &str, role: Role) -> UserRecord {
        self.state
            .users
            .create(NewUser {
                name: email.split('@').next().unwrap_or("member").to_string(),
                email: email.to_string(),
                password: Some(PASSWORD.to_string()),
                role: Some(role),
                designation: None,
            })
            .await
            .expect("create user")
    }

    pub async fn member(&self, email: &str) -> UserRecord {
        self.user(email, Role::Member).await
    }

    pub async fn admin(&self, email: &str) -> UserRecord {
        self.user(email, Role::Admin).await
    }

    /// Assign both access codes to a user
    pub async fn assign_codes(&self, uid: &str, id_code: &str, transparency_code: &str) {
        self.state
            .users
            .set_codes(
                uid,
                UserCodes {
                    access_code: Some(id_code.to_string()),
                    transparency_code: Some(transparency_code.to_string()),
                },
            )
            .await
            .expect("assign codes");
    }

    /// Open a session and return its bearer header value
    pub fn bearer(&self, user: &UserRecord) -> String {
        let session = self.state.auth.issue(user).expect("issue session");
        format!("Bearer {}", session.access_token)
    }
}
