//! # Murmur Security
//!
//! Signed session tokens (HS256 JWT) and Argon2id password hashing.

pub mod jwt;
pub mod password;

pub use jwt::*;
pub use password::*;
