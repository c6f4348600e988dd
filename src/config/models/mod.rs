//! Configuration data models
//!
//! This module defines all configuration structures used throughout the portal.

#![allow(missing_docs)]

pub mod auth;
pub mod card;
pub mod portal;
pub mod server;
pub mod storage;

// Re-export all configuration types
pub use auth::*;
pub use card::*;
pub use portal::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    5
}

/// Default database pool size
pub fn default_max_connections() -> u32 {
    10
}

pub(crate) fn default_true() -> bool {
    true
}
