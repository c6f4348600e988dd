//! SQLite-backed document store for tests

use society_portal::config::DatabaseConfig;
use society_portal::storage::documents::SqlDocumentStore;

/// Migrated in-memory SQLite document store
pub struct TestDatabase {
    pub store: SqlDocumentStore,
}

impl TestDatabase {
    /// Connect and migrate a fresh database
    pub async fn new() -> Self {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        };
        let store = SqlDocumentStore::connect(&config)
            .await
            .expect("Failed to open test database");
        Self { store }
    }
}
