//! Top-level portal configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Main portal configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PortalConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// ID card configuration
    #[serde(default)]
    pub card: CardConfig,
}

impl PortalConfig {
    /// Build a configuration from defaults plus `PORTAL_*` environment variables
    pub fn from_env() -> crate::utils::error::Result<Self> {
        let mut config = Self::default();
        config
            .apply_env_overrides(|key| std::env::var(key).ok())
            .map_err(crate::utils::error::PortalError::Config)?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("PORTAL_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORTAL_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| format!("PORTAL_PORT is not a valid port: {}", port))?;
        }
        if let Some(secret) = lookup("PORTAL_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(url) = lookup("PORTAL_DATABASE_URL") {
            self.storage.database.url = url;
        }
        if let Some(path) = lookup("PORTAL_FILES_PATH") {
            self.storage.files.local_path = path;
        }
        if let Some(base) = lookup("PORTAL_PUBLIC_BASE_URL") {
            self.storage.files.public_base_url = Some(base);
        }
        if let Some(base) = lookup("PORTAL_VERIFY_BASE_URL") {
            self.card.verify_base_url = base;
        }
        Ok(())
    }

    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.server = self.server.merge(other.server);
        self.auth = self.auth.merge(other.auth);
        self.storage = self.storage.merge(other.storage);
        self.card = self.card.merge(other.card);
        self
    }
}
