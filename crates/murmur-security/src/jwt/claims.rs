//! JWT claims structure.

use chrono::{DateTime, Utc};
use murmur_core::AccountId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: String,

    /// Issued at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Not before timestamp.
    pub nbf: i64,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// JWT ID, unique per issued token.
    pub jti: String,
}

impl Claims {
    /// Creates session claims for an account.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        issuer: String,
        audience: String,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: account_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            nbf: issued_at.timestamp(),
            iss: issuer,
            aud: audience,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Parses the subject back into an account ID.
    #[must_use]
    pub fn account_id(&self) -> Option<AccountId> {
        self.sub.parse().ok()
    }

    /// Checks if the token is expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    /// Returns the expiration time.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
