//! JWT token provider for issuing and verifying session tokens.

use super::Claims;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use murmur_config::SecurityConfig;
use murmur_core::{AccountId, Interface, MurmurError, MurmurResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// A freshly minted session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded JWT.
    pub token: String,
    /// Instant after which the token no longer verifies.
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens.
pub trait TokenProviderInterface: Interface + Send + Sync {
    /// Mints a token for an account.
    fn issue(&self, account_id: AccountId) -> MurmurResult<IssuedToken>;

    /// Verifies signature, issuer, audience, and expiry.
    fn verify(&self, token: &str) -> MurmurResult<Claims>;
}

/// HS256 JWT token provider.
///
/// Expiry is checked with zero leeway, and a token whose `exp` equals the
/// current second is already rejected. Revocation entries live exactly until
/// `exp`, so a revoked token can never verify after its entry is gone.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    fn expiry_for(&self, issued_at: DateTime<Utc>) -> MurmurResult<DateTime<Utc>> {
        i64::try_from(self.config.jwt_expiration_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| MurmurError::Configuration("Token lifetime out of range".to_string()))
    }

    fn encode_claims(&self, claims: &Claims) -> MurmurResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| MurmurError::Internal(format!("Failed to sign token: {}", e)))
    }
}

impl TokenProviderInterface for TokenProvider {
    fn issue(&self, account_id: AccountId) -> MurmurResult<IssuedToken> {
        let issued_at = Utc::now();
        let claims = Claims::new(
            account_id,
            self.config.jwt_issuer.clone(),
            self.config.jwt_audience.clone(),
            issued_at,
            self.expiry_for(issued_at)?,
        );

        let token = self.encode_claims(&claims)?;

        debug!("Issued session token for account {}", account_id);
        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    fn verify(&self, token: &str) -> MurmurResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!("Token validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => MurmurError::TokenExpired,
                ErrorKind::InvalidSignature => MurmurError::InvalidToken("Invalid token signature".to_string()),
                ErrorKind::InvalidIssuer => MurmurError::InvalidToken("Invalid token issuer".to_string()),
                ErrorKind::InvalidAudience => MurmurError::InvalidToken("Invalid token audience".to_string()),
                ErrorKind::ImmatureSignature => MurmurError::InvalidToken("Token not yet valid".to_string()),
                _ => MurmurError::InvalidToken(e.to_string()),
            }
        })?;

        let claims = token_data.claims;
        if claims.is_expired_at(Utc::now()) {
            return Err(MurmurError::TokenExpired);
        }
        if claims.account_id().is_none() {
            return Err(MurmurError::InvalidToken("Malformed subject".to_string()));
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}
