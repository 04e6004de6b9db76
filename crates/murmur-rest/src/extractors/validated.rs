//! Validated JSON extractor for automatic request validation.
//!
//! `ValidatedJson<T>` deserializes the body and runs `validator` rules on
//! it. Failures become 400 responses carrying field-level details.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use murmur_core::{field_errors, validation_errors_to_murmur_error, ErrorResponse, MurmurError};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor that validates the deserialized value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                AppError(MurmurError::Validation(format!("Invalid JSON: {}", rejection.body_text()))).into_response()
            }
            Self::ValidationError(errors) => {
                let details = field_errors(&errors);
                let error = validation_errors_to_murmur_error(errors);
                let body = ErrorResponse::from_error(&error).with_details(details);
                AppError::with_body(&error, body)
            }
        }
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value.validate().map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}
