//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use murmur_core::{ErrorResponse, MurmurError};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates an error response.
    pub fn error(error: ErrorResponse) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub MurmurError);

impl From<MurmurError> for AppError {
    fn from(err: MurmurError) -> Self {
        Self(err)
    }
}

impl AppError {
    /// Builds the error response with an explicit body.
    pub fn with_body(error: &MurmurError, body: ErrorResponse) -> Response {
        let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ApiResponse::<()>::error(body))).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.0.status_code() >= 500 {
            error!("Request failed: {}", self.0);
        }

        let body = ErrorResponse::from_error(&self.0);
        Self::with_body(&self.0, body)
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (MurmurError::not_found("Post", 1), StatusCode::NOT_FOUND),
            (MurmurError::validation("bad"), StatusCode::BAD_REQUEST),
            (MurmurError::conflict("dup"), StatusCode::CONFLICT),
            (MurmurError::TokenExpired, StatusCode::UNAUTHORIZED),
            (MurmurError::Cache("down".to_string()), StatusCode::SERVICE_UNAVAILABLE),
            (MurmurError::Database("down".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(AppError(error).into_response().status(), status);
        }
    }

    #[test]
    fn test_success_envelope_omits_error() {
        let json = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 5);
        assert!(json.get("error").is_none());
    }
}
