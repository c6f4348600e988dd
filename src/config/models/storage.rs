//! Storage configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Where collection documents live
    #[serde(default)]
    pub documents: DocumentBackend,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Uploaded file configuration
    #[serde(default)]
    pub files: FileStorageConfig,
}

/// Document store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentBackend {
    /// SQL database through sea-orm
    #[default]
    Database,
    /// Process memory; contents are lost on restart
    Memory,
}

impl StorageConfig {
    /// Merge storage configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.documents != DocumentBackend::default() {
            self.documents = other.documents;
        }
        self.database = self.database.merge(other.database);
        self.files = self.files.merge(other.files);
        self
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.documents == DocumentBackend::Database {
            self.database.validate()?;
        }
        self.files.validate()
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Run migrations on startup
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Merge database configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.url.is_empty() && other.url != default_database_url() {
            self.url = other.url;
        }
        if other.max_connections != default_max_connections() {
            self.max_connections = other.max_connections;
        }
        if other.connection_timeout != default_connection_timeout() {
            self.connection_timeout = other.connection_timeout;
        }
        if !other.auto_migrate {
            self.auto_migrate = other.auto_migrate;
        }
        self
    }

    /// Validate database configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Database URL is required".to_string());
        }
        if !(self.url.starts_with("sqlite:")
            || self.url.starts_with("postgres://")
            || self.url.starts_with("postgresql://"))
        {
            return Err(format!("Unsupported database URL: {}", self.url));
        }
        if self.max_connections == 0 {
            return Err("Database max connections cannot be 0".to_string());
        }
        Ok(())
    }

    /// Whether the URL points at SQLite
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }
}

/// Uploaded file storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStorageConfig {
    /// Local storage path
    #[serde(default = "default_local_path")]
    pub local_path: String,
    /// Origin prepended to blob URLs; relative URLs are returned when unset
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            local_path: default_local_path(),
            public_base_url: None,
            max_upload_size: default_max_upload_size(),
        }
    }
}

impl FileStorageConfig {
    /// Merge file storage configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.local_path != default_local_path() {
            self.local_path = other.local_path;
        }
        if other.public_base_url.is_some() {
            self.public_base_url = other.public_base_url;
        }
        if other.max_upload_size != default_max_upload_size() {
            self.max_upload_size = other.max_upload_size;
        }
        self
    }

    /// Validate file storage configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.local_path.is_empty() {
            return Err("File storage path is required".to_string());
        }
        if self.max_upload_size == 0 {
            return Err("Max upload size cannot be 0".to_string());
        }
        if let Some(base) = &self.public_base_url {
            if !crate::utils::is_valid_url(base) {
                return Err(format!("Public base URL is invalid: {}", base));
            }
        }
        Ok(())
    }
}

fn default_database_url() -> String {
    "sqlite://data/portal.db?mode=rwc".to_string()
}

fn default_local_path() -> String {
    "./data/blobs".to_string()
}

fn default_max_upload_size() -> usize {
    5 * 1024 * 1024 // 5MB
}
