//! Error handling for the portal
//!
//! This module defines all error types used throughout the service.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod response;
mod types;

pub use helpers::LOGIN_REDIRECT;
pub use response::{ErrorDetail, ErrorResponse, current_request_id, with_request_id};
pub use types::{PortalError, Result};
