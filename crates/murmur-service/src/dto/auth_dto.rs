//! Authentication-related DTOs.

use chrono::{DateTime, Utc};
use murmur_core::rules::password_complexity;
use murmur_core::AccountId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(function = "password_complexity"))]
    pub password: String,

    /// Defaults to the local part of the email.
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub fullname: Option<String>,
}

/// Issued session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

impl TokenResponse {
    /// Builds a bearer token response.
    #[must_use]
    pub fn bearer(access_token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: (expires_at - Utc::now()).num_seconds().max(0),
            expires_at,
        }
    }
}

/// Newly registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: AccountId,
    pub email: String,
    pub fullname: String,
    pub created_at: DateTime<Utc>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
