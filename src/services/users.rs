//! Member accounts
//!
//! User records live in `users` keyed by uid; password hashes live apart in
//! `credentials` keyed by normalized email so they never travel with a
//! profile.

use crate::auth::password::{hash_password, validate_new_password, verify_password};
use crate::config::BootstrapAdminConfig;
use crate::models::user::credential_key;
use crate::models::{Credential, Role, UserRecord};
use crate::storage::documents::{
    Collection, DocumentStore, get_typed, list_typed, to_document_data,
};
use crate::utils::error::{PortalError, Result};
use crate::utils::{generate_id, is_blank, is_valid_email};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Account creation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub designation: Option<String>,
}

/// Access codes assigned by an admin; absent fields are left as they are
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCodes {
    #[serde(default)]
    pub access_code: Option<String>,
    #[serde(default)]
    pub transparency_code: Option<String>,
}

/// Account management
#[derive(Debug, Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
    default_password: String,
    /// Held from the duplicate-email check until both records are written
    registration: Arc<Mutex<()>>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>, default_password: impl Into<String>) -> Self {
        Self {
            store,
            default_password: default_password.into(),
            registration: Arc::new(Mutex::new(())),
        }
    }

    pub async fn get(&self, uid: &str) -> Result<Option<UserRecord>> {
        get_typed(self.store.as_ref(), Collection::Users, uid).await
    }

    /// Fetch a user or fail with `NotFound`
    pub async fn require(&self, uid: &str) -> Result<UserRecord> {
        self.get(uid)
            .await?
            .ok_or_else(|| PortalError::not_found(format!("User not found: {}", uid)))
    }

    /// All users, newest first
    pub async fn list(&self) -> Result<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = list_typed(self.store.as_ref(), Collection::Users).await?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    /// Create an account; the default member password applies when none is given
    pub async fn create(&self, request: NewUser) -> Result<UserRecord> {
        let name = request.name.trim().to_string();
        let email = request.email.trim().to_string();
        if is_blank(&name) {
            return Err(PortalError::validation("Name is required"));
        }
        if !is_valid_email(&email) {
            return Err(PortalError::validation(format!("Invalid email: {}", email)));
        }

        let password = request
            .password
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.default_password.clone());
        validate_new_password(&password)?;

        let password_hash = hash_password(&password)?;
        let key = credential_key(&email);

        let _registration = self.registration.lock().await;
        if self.store.get(Collection::Credentials, &key).await?.is_some() {
            return Err(PortalError::conflict(format!("Email already registered: {}", email)));
        }

        let user = UserRecord {
            uid: generate_id(),
            email,
            name: name.clone(),
            display_name: Some(name),
            role: request.role.unwrap_or_default(),
            designation: request.designation.filter(|d| !is_blank(d)),
            access_code: None,
            transparency_code: None,
            created_at: Utc::now(),
        };
        let credential = Credential {
            uid: user.uid.clone(),
            password_hash,
        };

        self.store
            .set(Collection::Credentials, &key, to_document_data(&credential)?)
            .await?;
        let written = match to_document_data(&user) {
            Ok(data) => self.store.set(Collection::Users, &user.uid, data).await.map(drop),
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = self.store.delete(Collection::Credentials, &key).await {
                warn!(error = %cleanup, "Failed to remove credential of unsaved user");
            }
            return Err(e);
        }

        info!(uid = %user.uid, role = %user.role, "Created user");
        Ok(user)
    }

    /// Check an email/password pair
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserRecord> {
        let invalid = || PortalError::auth("Invalid email or password");

        let credential: Credential =
            get_typed(self.store.as_ref(), Collection::Credentials, &credential_key(email))
                .await?
                .ok_or_else(invalid)?;
        if !verify_password(password, &credential.password_hash)? {
            return Err(invalid());
        }

        self.get(&credential.uid).await?.ok_or_else(|| {
            warn!(uid = %credential.uid, "Credential without user record");
            invalid()
        })
    }

    /// Remove a user and their credential; returns whether the user existed
    pub async fn delete(&self, uid: &str) -> Result<bool> {
        let Some(user) = self.get(uid).await? else {
            return Ok(false);
        };

        self.store
            .delete(Collection::Credentials, &credential_key(&user.email))
            .await?;
        let deleted = self.store.delete(Collection::Users, uid).await?;
        info!(uid, "Deleted user");
        Ok(deleted)
    }

    /// Change a user's role
    pub async fn set_role(&self, uid: &str, role: Role) -> Result<UserRecord> {
        let doc = self
            .store
            .update(Collection::Users, uid, json!({ "role": role }))
            .await?;
        info!(uid, %role, "Changed user role");
        doc.decode()
    }

    /// Assign access codes verbatim
    pub async fn set_codes(&self, uid: &str, codes: UserCodes) -> Result<UserRecord> {
        let mut fields = serde_json::Map::new();
        if let Some(code) = codes.access_code {
            fields.insert("accessCode".to_string(), json!(code));
        }
        if let Some(code) = codes.transparency_code {
            fields.insert("transparencyCode".to_string(), json!(code));
        }
        if fields.is_empty() {
            return Err(PortalError::validation("No codes given"));
        }

        let doc = self
            .store
            .update(Collection::Users, uid, serde_json::Value::Object(fields))
            .await?;
        info!(uid, "Updated access codes");
        doc.decode()
    }

    /// Create the configured super admin when no user exists yet
    pub async fn ensure_bootstrap_admin(
        &self,
        admin: Option<&BootstrapAdminConfig>,
    ) -> Result<Option<UserRecord>> {
        let Some(admin) = admin else {
            return Ok(None);
        };
        if !self.store.list(Collection::Users).await?.is_empty() {
            return Ok(None);
        }

        info!(email = %admin.email, "Creating bootstrap super admin");
        self.create(NewUser {
            name: admin.name.clone(),
            email: admin.email.clone(),
            password: Some(admin.password.clone()),
            role: Some(Role::SuperAdmin),
            designation: None,
        })
        .await
        .map(Some)
    }
}
