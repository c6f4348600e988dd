//! JWT token handling
//!
//! This module provides session token creation and verification.

mod handler;
pub mod types;


pub use types::{Claims, JwtHandler};
