//! Configuration management for the portal
//!
//! This module handles loading, validation, and management of all portal configuration.

pub mod models;

pub use models::*;

use crate::utils::error::{PortalError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/portal.yaml";

/// Main configuration struct for the portal
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Portal configuration
    pub portal: PortalConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PortalError::Config(format!("Failed to read config file: {}", e)))?;

        let portal: PortalConfig = serde_yaml::from_str(&content)
            .map_err(|e| PortalError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { portal };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let portal = PortalConfig::from_env()?;
        let config = Self { portal };

        config.validate()?;
        Ok(config)
    }

    /// Apply `PORTAL_*` environment overrides on top of the loaded values
    pub fn with_env_overrides(mut self) -> Result<Self> {
        self.portal
            .apply_env_overrides(|key| std::env::var(key).ok())
            .map_err(PortalError::Config)?;
        self.validate()?;
        Ok(self)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.portal.server
    }

    /// Get storage configuration
    pub fn storage(&self) -> &StorageConfig {
        &self.portal.storage
    }

    /// Get auth configuration
    pub fn auth(&self) -> &AuthConfig {
        &self.portal.auth
    }

    /// Get card configuration
    pub fn card(&self) -> &CardConfig {
        &self.portal.card
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.portal
            .server
            .validate()
            .map_err(|e| PortalError::Config(format!("Server config error: {}", e)))?;

        self.portal
            .server
            .cors
            .validate()
            .map_err(|e| PortalError::Config(format!("CORS config error: {}", e)))?;

        self.portal
            .auth
            .validate()
            .map_err(|e| PortalError::Config(format!("Auth config error: {}", e)))?;

        self.portal
            .storage
            .validate()
            .map_err(|e| PortalError::Config(format!("Storage config error: {}", e)))?;

        self.portal
            .card
            .validate()
            .map_err(|e| PortalError::Config(format!("Card config error: {}", e)))?;

        crate::config::models::auth::warn_insecure_config(&self.portal.auth);

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.portal = self.portal.merge(other.portal);
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.portal)
            .map_err(|e| PortalError::Config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.portal)
            .map_err(|e| PortalError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
