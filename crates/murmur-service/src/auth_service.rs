//! Authentication service trait definition.

use crate::dto::{AccountResponse, LoginRequest, RegisterRequest, TokenResponse};
use async_trait::async_trait;
use murmur_core::{Interface, MurmurResult};
use murmur_security::Claims;

/// Registration, login, logout, and per-request session checks.
#[async_trait]
pub trait AuthService: Interface + Send + Sync {
    /// Creates an account and its profile.
    async fn register(&self, request: RegisterRequest) -> MurmurResult<AccountResponse>;

    /// Exchanges credentials for a session token.
    async fn login(&self, request: LoginRequest) -> MurmurResult<TokenResponse>;

    /// Revokes `token` for the rest of its lifetime.
    ///
    /// Fails with `Cache` when the revocation could not be recorded.
    async fn logout(&self, token: &str, claims: &Claims) -> MurmurResult<()>;

    /// Verifies a token and checks it against the revocation registry.
    ///
    /// A registry failure rejects the token.
    async fn authenticate(&self, token: &str) -> MurmurResult<Claims>;
}
