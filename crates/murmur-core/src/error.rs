//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Murmur.
///
/// The variants map onto the failure categories the API distinguishes:
/// missing entities, uniqueness conflicts, authentication failures, and the
/// two infrastructure outages (cache and relational store). Cache failures
/// are normally absorbed by the cache layer and only escape where a caller
/// explicitly needs the write to land, such as token revocation on logout.
#[derive(Error, Debug)]
pub enum MurmurError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Authentication Errors ============
    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expired
    #[error("Token expired")]
    TokenExpired,

    /// Invalid credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ============ Infrastructure Errors ============
    /// Relational store unavailable or query failed
    #[error("Database error: {0}")]
    Database(String),

    /// Key-value cache unavailable
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MurmurError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Unauthorized(_)
            | Self::InvalidToken(_)
            | Self::TokenExpired
            | Self::InvalidCredentials => 401,
            Self::Cache(_) => 503,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Database(_) => "STORE_UNAVAILABLE",
            Self::Cache(_) => "CACHE_UNAVAILABLE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true for any of the authentication failure variants.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_) | Self::InvalidToken(_) | Self::TokenExpired | Self::InvalidCredentials
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for MurmurError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                match db_err.code().as_deref() {
                    // unique_violation
                    Some("23505") => Self::Conflict(db_err.message().to_string()),
                    // foreign_key_violation: the referenced account or post is gone
                    Some("23503") => Self::NotFound {
                        resource_type: "referenced_row",
                        id: db_err.constraint().unwrap_or("unknown").to_string(),
                    },
                    _ => Self::Database(err.to_string()),
                }
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for MurmurError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `MurmurError`.
    ///
    /// Store and internal failures are reported without their underlying
    /// message so driver details never reach API clients.
    #[must_use]
    pub fn from_error(error: &MurmurError) -> Self {
        let message = match error {
            MurmurError::Database(_) => "The data store is temporarily unavailable".to_string(),
            MurmurError::Internal(_) | MurmurError::Other(_) | MurmurError::Configuration(_) => {
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        Self {
            code: error.error_code().to_string(),
            message,
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&MurmurError> for ErrorResponse {
    fn from(error: &MurmurError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(MurmurError::not_found("Post", 1).status_code(), 404);
        assert_eq!(MurmurError::validation("invalid email").status_code(), 400);
        assert_eq!(MurmurError::unauthorized("not logged in").status_code(), 401);
        assert_eq!(MurmurError::conflict("duplicate").status_code(), 409);
        assert_eq!(MurmurError::Cache("down".to_string()).status_code(), 503);
        assert_eq!(MurmurError::Database("down".to_string()).status_code(), 500);
    }

    #[test]
    fn test_auth_variants_are_unauthorized() {
        assert!(MurmurError::TokenExpired.is_unauthorized());
        assert!(MurmurError::InvalidCredentials.is_unauthorized());
        assert!(MurmurError::InvalidToken("bad".to_string()).is_unauthorized());
        assert!(!MurmurError::not_found("Post", 1).is_unauthorized());
        assert_eq!(MurmurError::TokenExpired.status_code(), 401);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(MurmurError::not_found("Post", 1).error_code(), "NOT_FOUND");
        assert_eq!(MurmurError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(MurmurError::Database("db".to_string()).error_code(), "STORE_UNAVAILABLE");
        assert_eq!(MurmurError::Cache("c".to_string()).error_code(), "CACHE_UNAVAILABLE");
        assert_eq!(MurmurError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_not_found_message_names_resource() {
        let err = MurmurError::not_found("Profile", 42);
        assert_eq!(err.to_string(), "Resource not found: Profile with id 42");
    }

    #[test]
    fn test_error_response_hides_store_details() {
        let err = MurmurError::Database("connection refused at 10.0.0.3:5432".to_string());
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "STORE_UNAVAILABLE");
        assert!(!response.message.contains("10.0.0.3"));
    }

    #[test]
    fn test_error_response_with_details() {
        let err = MurmurError::validation("bad input");
        let details = vec![FieldError {
            field: "email".to_string(),
            message: "Invalid email".to_string(),
            code: "email".to_string(),
        }];
        let response = ErrorResponse::from_error(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }
}
