//! # Society Portal
//!
//! Backend for a college science society's membership portal: public site
//! content, a members area gated by access codes, an admin finance dashboard
//! and printable digital member ID cards.
//!
//! ## Features
//!
//! - **Content**: homepage, footer, news with download links and a photo gallery
//! - **Roles and gates**: role-based admin routes plus per-session feature
//!   flags unlocked with personal access codes
//! - **Finance**: transaction ledger, funding requests and a live dashboard
//!   projection over the stored collections
//! - **ID cards**: card records rendered to raster images with a verification
//!   QR code and exported as single-page A4 PDFs
//! - **Storage**: JSON document collections on SQLite/PostgreSQL (sea-orm) or
//!   in memory, with blobs on the local filesystem
//!
//! ## Running the server
//!
//! ```rust,no_run
//! use society_portal::{Config, Portal};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/portal.yaml").await?;
//!     Portal::new(config).run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod models;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use utils::error::{PortalError, Result};

use tracing::info;

/// The portal server, ready to run
#[derive(Debug)]
pub struct Portal {
    config: Config,
}

impl Portal {
    /// Create a new portal instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build storage and services, then serve until shutdown
    pub async fn run(self) -> Result<()> {
        let build = build_info();
        info!(
            version = build.version,
            git_hash = build.git_hash,
            "Starting society portal"
        );
        server::run_server(self.config).await
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information stamped by the build script
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Unix seconds at build time
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
