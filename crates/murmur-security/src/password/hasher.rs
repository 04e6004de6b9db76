//! Password hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2, Params,
};
use murmur_core::{Interface, MurmurError, MurmurResult};
use std::sync::Arc;
use tracing::debug;

/// Interface for password hashing operations.
pub trait PasswordHasherInterface: Interface + Send + Sync {
    /// Hashes a password into a PHC string.
    fn hash(&self, password: &str) -> MurmurResult<String>;

    /// Verifies a password against a PHC string.
    fn verify(&self, password: &str, hash: &str) -> MurmurResult<bool>;
}

/// Argon2id password hasher.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Creates a new password hasher with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// Creates a new password hasher with custom parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Creates a password hasher with the given time cost (iterations) and
    /// the default memory and parallelism settings.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .unwrap_or(Params::DEFAULT);

        Self::with_params(params)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherInterface for PasswordHasher {
    fn hash(&self, password: &str) -> MurmurResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| MurmurError::Internal(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> MurmurResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| MurmurError::Internal(format!("Invalid password hash format: {}", e)))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => Err(MurmurError::Internal(format!("Password verification error: {}", e))),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::with_cost(1);
        let hash = hasher.hash("MySecurePassword123!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("MySecurePassword123!", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hasher = PasswordHasher::with_cost(1);
        let hash1 = hasher.hash("TestPassword123!").unwrap();
        let hash2 = hasher.hash("TestPassword123!").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("TestPassword123!", &hash2).unwrap());
    }

    #[test]
    fn test_invalid_hash_format_returns_error() {
        let hasher = PasswordHasher::new();
        assert!(hasher.verify("password", "not-a-valid-hash").is_err());
    }

    #[test]
    fn test_hash_from_other_cost_still_verifies() {
        let hash = PasswordHasher::with_cost(1).hash("Pa55word!").unwrap();
        assert!(PasswordHasher::with_cost(3).verify("Pa55word!", &hash).unwrap());
    }

    #[test]
    fn test_zero_cost_falls_back_to_default() {
        let hasher = PasswordHasher::with_cost(0);
        let hash = hasher.hash("Pa55word!").unwrap();
        assert!(hasher.verify("Pa55word!", &hash).unwrap());
    }
}
