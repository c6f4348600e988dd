//! Authentication middleware
//!
//! Resolves a bearer token into an [`AuthContext`] and stores it in the
//! request extensions. Requests without a valid token pass through untouched;
//! handlers decide what they require through [`authorize`]. The request id
//! assigned by the tracing logger is scoped over the rest of the chain so
//! error bodies can report it.

use crate::auth::{AuthContext, RouteGuard};
use crate::server::AppState;
use crate::server::middleware::helpers::{extract_bearer_token, is_public_route};
use crate::utils::error::{PortalError, with_request_id};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{HttpMessage, HttpRequest, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::debug;
use tracing_actix_web::RequestId;

/// Auth middleware for Actix-web
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for auth middleware
pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if !is_public_route(req.path()) {
                let state = req.app_data::<web::Data<AppState>>().cloned();
                let token = extract_bearer_token(req.headers());

                if let (Some(state), Some(token)) = (state, token) {
                    match resolve_context(&state, &token).await {
                        Ok(ctx) => {
                            req.extensions_mut().insert(ctx);
                        }
                        Err(e) => debug!(path = %req.path(), error = %e, "Rejected bearer token"),
                    }
                }
            }

            let request_id = req.extensions().get::<RequestId>().map(ToString::to_string);
            match request_id {
                Some(id) => with_request_id(id, service.call(req)).await,
                None => service.call(req).await,
            }
        })
    }
}

/// Verify a token and load the caller's current user record
async fn resolve_context(
    state: &AppState,
    token: &str,
) -> crate::utils::error::Result<AuthContext> {
    let verified = state.auth.authenticate(token)?;
    let user = state
        .users
        .get(&verified.user_id)
        .await?
        .ok_or_else(|| PortalError::unauthorized("Account no longer exists"))?;

    Ok(AuthContext {
        user,
        session_id: verified.session_id,
        access: verified.access,
    })
}

/// Caller attached by the middleware, if any
pub fn get_auth_context(req: &HttpRequest) -> Option<AuthContext> {
    req.extensions().get::<AuthContext>().cloned()
}

/// Apply a route guard and hand back the admitted caller
pub fn authorize(req: &HttpRequest, guard: RouteGuard) -> crate::utils::error::Result<AuthContext> {
    let ctx = get_auth_context(req);
    guard.check(ctx.as_ref())?;
    ctx.ok_or_else(|| PortalError::unauthorized("Login required"))
}
