//! Server builder and run_server function
//!
//! This module provides the ServerBuilder for easier server configuration
//! and the run_server function used by the binary.

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{PortalError, Result};
use tracing::info;

/// Server builder for easier configuration
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| PortalError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config).await
    }
}

/// Build the server, seed the bootstrap admin and serve until shutdown
pub async fn run_server(config: Config) -> Result<()> {
    let server = ServerBuilder::new().with_config(config).build().await?;

    let bootstrap = server.state().config.auth().bootstrap_admin.clone();
    if let Some(admin) = server
        .state()
        .users
        .ensure_bootstrap_admin(bootstrap.as_ref())
        .await?
    {
        info!(email = %admin.email, "Created bootstrap administrator");
    }

    info!(
        "Portal listening at http://{}",
        server.config().address()
    );
    info!("   GET  /health - Health check");
    info!("   POST /api/auth/login - Sign in");
    info!("   GET  /api/admin/dashboard - Dashboard summary");
    info!("   GET  /api/cards/me/export/{{side}} - Card PDF");

    server.start().await
}
