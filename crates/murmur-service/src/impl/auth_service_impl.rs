//! Authentication service implementation.

use crate::auth_service::AuthService;
use crate::dto::{AccountResponse, LoginRequest, RegisterRequest, TokenResponse};
use crate::metrics::SessionMetrics;
use crate::revocation::RevocationRegistry;
use async_trait::async_trait;
use murmur_core::{Email, MurmurError, MurmurResult, NewAccount, ValidateExt};
use murmur_repository::AccountRepository;
use murmur_security::{Claims, PasswordHasherInterface, TokenProviderInterface};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Authentication service implementation.
pub struct AuthServiceImpl {
    accounts: Arc<dyn AccountRepository>,
    password_hasher: Arc<dyn PasswordHasherInterface>,
    token_provider: Arc<dyn TokenProviderInterface>,
    revocations: Arc<dyn RevocationRegistry>,
}

impl AuthServiceImpl {
    /// Creates a new authentication service.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        token_provider: Arc<dyn TokenProviderInterface>,
        revocations: Arc<dyn RevocationRegistry>,
    ) -> Self {
        Self {
            accounts,
            password_hasher,
            token_provider,
            revocations,
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: RegisterRequest) -> MurmurResult<AccountResponse> {
        debug!("Registering account: {}", request.email);

        request.validate_request()?;

        let email = Email::new(&request.email).map_err(|e| MurmurError::Validation(e.to_string()))?;
        let fullname = request
            .fullname
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email.local_part())
            .to_string();

        let password_hash = self.password_hasher.hash(&request.password)?;

        let account = self
            .accounts
            .create(&NewAccount {
                email,
                password_hash,
                fullname: fullname.clone(),
            })
            .await
            .map_err(|e| match e {
                MurmurError::Conflict(_) => {
                    MurmurError::Conflict(format!("Email '{}' is already registered", request.email))
                }
                other => other,
            })?;

        info!("Account registered: {}", account.id);
        Ok(AccountResponse {
            id: account.id,
            email: account.email.to_string(),
            fullname,
            created_at: account.created_at,
        })
    }

    async fn login(&self, request: LoginRequest) -> MurmurResult<TokenResponse> {
        debug!("Login attempt for: {}", request.email);

        request.validate_request()?;

        let email = Email::new(&request.email).map_err(|_| MurmurError::InvalidCredentials)?;

        let account = self.accounts.find_by_email(&email).await?.ok_or_else(|| {
            warn!("Login failed: unknown email - {}", email);
            MurmurError::InvalidCredentials
        })?;

        if !self.password_hasher.verify(&request.password, &account.password_hash)? {
            warn!("Login failed: invalid password - {}", account.id);
            return Err(MurmurError::InvalidCredentials);
        }

        let issued = self.token_provider.issue(account.id)?;

        info!("Account logged in: {}", account.id);
        Ok(TokenResponse::bearer(issued.token, issued.expires_at))
    }

    async fn logout(&self, token: &str, claims: &Claims) -> MurmurResult<()> {
        debug!("Logging out: {}", claims.sub);

        self.revocations.revoke(token, claims.expires_at()).await?;

        info!("Account logged out: {}", claims.sub);
        Ok(())
    }

    async fn authenticate(&self, token: &str) -> MurmurResult<Claims> {
        let claims = self.token_provider.verify(token)?;

        match self.revocations.is_revoked(token).await {
            Ok(false) => Ok(claims),
            Ok(true) => {
                debug!("Rejected revoked token for: {}", claims.sub);
                SessionMetrics::rejected("revoked");
                Err(MurmurError::unauthorized("Token has been revoked"))
            }
            Err(e) => {
                error!("Revocation check failed, rejecting request: {}", e);
                SessionMetrics::rejected("registry_unavailable");
                Err(MurmurError::unauthorized("Session could not be verified"))
            }
        }
    }
}

impl std::fmt::Debug for AuthServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceImpl").finish_non_exhaustive()
    }
}
