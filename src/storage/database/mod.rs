//! Database storage implementation using SeaORM
//!
//! This module provides database connectivity and the schema behind the
//! SQL document store.

/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;

use crate::config::DatabaseConfig;
use crate::utils::error::{PortalError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use migration::Migrator;

/// Database backend type indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackendType {
    PostgreSQL,
    SQLite,
}

/// SeaORM connection pool
#[derive(Debug, Clone)]
pub struct Database {
    db: DatabaseConnection,
    backend_type: DatabaseBackendType,
}

impl Database {
    /// Connect using the configured URL
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let backend_type = if config.is_sqlite() {
            ensure_sqlite_dir(&config.url)?;
            DatabaseBackendType::SQLite
        } else {
            DatabaseBackendType::PostgreSQL
        };

        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let db = sea_orm::Database::connect(opt)
            .await
            .map_err(PortalError::Database)?;
        info!("Database connection established ({:?})", backend_type);

        Ok(Self { db, backend_type })
    }

    /// Get the current backend type
    pub fn backend_type(&self) -> DatabaseBackendType {
        self.backend_type
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            PortalError::Database(e)
        })?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing database health check");
        self.db.ping().await.map_err(PortalError::Database)?;
        debug!(
            backend = ?self.db.get_database_backend(),
            "Database health check passed"
        );
        Ok(())
    }
}

/// Create the parent directory of a file-backed SQLite URL
fn ensure_sqlite_dir(url: &str) -> Result<()> {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PortalError::Config(format!("Failed to create data directory: {}", e))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_sqlite_dir_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested/portal.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        ensure_sqlite_dir(&url).unwrap();
        assert!(temp_dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_ensure_sqlite_dir_ignores_memory() {
        assert!(ensure_sqlite_dir("sqlite::memory:").is_ok());
    }

    #[tokio::test]
    async fn test_in_memory_database_migrates() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        };

        let db = Database::new(&config).await.unwrap();
        assert_eq!(db.backend_type(), DatabaseBackendType::SQLite);
        db.migrate().await.unwrap();
        db.health_check().await.unwrap();
    }
}
