//! Session middleware.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use murmur_core::MurmurError;
use murmur_security::Claims;
use murmur_service::AuthService;
use std::sync::Arc;
use tracing::debug;

/// Authentication middleware state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub auth_service: Arc<dyn AuthService>,
}

impl AuthMiddlewareState {
    /// Creates the middleware state.
    pub fn new(auth_service: Arc<dyn AuthService>) -> Self {
        Self { auth_service }
    }
}

/// Verified session attached to the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
    /// The raw bearer token, needed to revoke it on logout.
    pub token: String,
}

/// Extracts the bearer token from an `Authorization` header value.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a usable session.
///
/// A token is usable when it verifies, has not expired, and the revocation
/// registry confirms it has not been revoked. When the registry cannot
/// answer the request is rejected.
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(ToString::to_string);

    let Some(token) = token else {
        return AppError(MurmurError::unauthorized("Missing bearer token")).into_response();
    };

    match state.auth_service.authenticate(&token).await {
        Ok(claims) => {
            debug!("Authenticated account: {}", claims.sub);
            request.extensions_mut().insert(AuthContext { claims, token });
            next.run(request).await
        }
        Err(e) => {
            debug!("Session rejected: {}", e);
            AppError(e).into_response()
        }
    }
}
