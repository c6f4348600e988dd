//! Helper functions for creating specific error types

use super::types::PortalError;

/// Login page clients are sent to when no session is present
pub const LOGIN_REDIRECT: &str = "/login";

impl PortalError {
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth(message.into())
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn access_denied<S: Into<String>, R: Into<String>>(message: S, redirect: R) -> Self {
        Self::AccessDenied {
            message: message.into(),
            redirect: redirect.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_code<S: Into<String>>(message: S) -> Self {
        Self::InvalidCode(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::Export(message.into())
    }

    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Page the client should navigate to after this error, if any
    pub fn redirect(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(_) => Some(LOGIN_REDIRECT),
            Self::AccessDenied { redirect, .. } => Some(redirect.as_str()),
            _ => None,
        }
    }

    /// Whether the error came from the persistence layer
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Store(_))
    }
}
