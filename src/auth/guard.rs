//! Route guards
//!
//! Three kinds of protection: a logged-in session, an admin role, or an
//! unlocked feature flag. Each denial names the page the client should go to.

use super::AuthContext;
use super::session::Feature;
use crate::utils::error::{PortalError, Result};

/// Client-side pages referenced by redirects and verification links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePath {
    Home,
    Login,
    Transparency,
    GenerateId,
    VerifyId,
}

impl RoutePath {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutePath::Home => "/",
            RoutePath::Login => "/login",
            RoutePath::Transparency => "/transparency",
            RoutePath::GenerateId => "/admin/generate-id",
            RoutePath::VerifyId => "/verify-id/:uid",
        }
    }

    /// Hash-routed link a scanned card resolves to
    pub fn verify_link(base_url: &str, uid: &str) -> String {
        format!("{}/#/verify-id/{}", base_url.trim_end_matches('/'), uid)
    }
}

/// What a route requires of its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGuard {
    /// Any logged-in user
    Authenticated,
    /// Admin or super admin
    Admin,
    /// Admin, or a session holding the feature's unlock flag
    Feature(Feature),
}

impl RouteGuard {
    /// Admit or reject a caller
    pub fn check(self, caller: Option<&AuthContext>) -> Result<()> {
        let Some(ctx) = caller else {
            return Err(PortalError::unauthorized("Login required"));
        };

        match self {
            RouteGuard::Authenticated => Ok(()),
            RouteGuard::Admin if ctx.is_admin() => Ok(()),
            RouteGuard::Admin => Err(PortalError::access_denied(
                "Admin access required",
                RoutePath::Transparency.as_str(),
            )),
            RouteGuard::Feature(feature) if ctx.can_use(feature) => Ok(()),
            RouteGuard::Feature(feature) => Err(PortalError::access_denied(
                format!("Enter your access code to unlock {}", feature.as_str()),
                RoutePath::Home.as_str(),
            )),
        }
    }
}
