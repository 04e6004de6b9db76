//! Authenticated session extractor.

use crate::middleware::AuthContext;
use crate::responses::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use murmur_core::{AccountId, MurmurError};
use murmur_security::Claims;

/// The caller's verified session.
///
/// Only available behind [`auth_middleware`](crate::middleware::auth_middleware).
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub account_id: AccountId,
    pub claims: Claims,
    pub token: String,
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.claims
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| AppError(MurmurError::unauthorized("Authentication required")))?;

        let account_id = context
            .claims
            .account_id()
            .ok_or_else(|| AppError(MurmurError::InvalidToken("Malformed subject".to_string())))?;

        Ok(Self {
            account_id,
            claims: context.claims,
            token: context.token,
        })
    }
}
