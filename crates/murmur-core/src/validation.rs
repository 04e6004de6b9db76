//! Validation utilities.

use crate::{FieldError, MurmurError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `MurmurError` on failure.
    fn validate_request(&self) -> Result<(), MurmurError> {
        self.validate().map_err(validation_errors_to_murmur_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();
    // HashMap iteration order is unstable
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `MurmurError`.
#[must_use]
pub fn validation_errors_to_murmur_error(errors: ValidationErrors) -> MurmurError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    MurmurError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that a password meets complexity requirements.
    pub fn password_complexity(password: &str) -> Result<(), ValidationError> {
        if password.len() < 8 {
            return Err(ValidationError::new("password_too_short"));
        }

        let has_uppercase = password.chars().any(char::is_uppercase);
        let has_lowercase = password.chars().any(char::is_lowercase);
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password.chars().any(|c| !c.is_alphanumeric());

        if !has_uppercase {
            return Err(ValidationError::new("password_missing_uppercase"));
        }
        if !has_lowercase {
            return Err(ValidationError::new("password_missing_lowercase"));
        }
        if !has_digit {
            return Err(ValidationError::new("password_missing_digit"));
        }
        if !has_special {
            return Err(ValidationError::new("password_missing_special"));
        }

        Ok(())
    }

    /// Validates a phone number: digits with an optional leading `+`.
    pub fn phone_number(phone: &str) -> Result<(), ValidationError> {
        let digits = phone.strip_prefix('+').unwrap_or(phone);
        if digits.len() < 6 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new("phone_invalid"));
        }
        Ok(())
    }

    /// Validates that an image path ends in a supported extension.
    pub fn image_path(path: &str) -> Result<(), ValidationError> {
        let supported = path
            .rsplit_once('.')
            .map(|(stem, ext)| {
                !stem.trim().is_empty()
                    && IMAGE_EXTENSIONS
                        .iter()
                        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
            .unwrap_or(false);

        if !supported {
            return Err(ValidationError::new("image_unsupported_extension"));
        }
        Ok(())
    }

    /// Validates every entry of an image path list.
    pub fn image_paths(paths: &[String]) -> Result<(), ValidationError> {
        paths.iter().try_for_each(|p| image_path(p))
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
        #[validate(custom(function = "password_complexity"))]
        password: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_password_complexity() {
        assert!(password_complexity("Secret12!").is_ok());
        assert!(password_complexity("Sh0rt!").is_err());
        assert!(password_complexity("nouppercase1!").is_err());
        assert!(password_complexity("NOLOWERCASE1!").is_err());
        assert!(password_complexity("NoDigits!!").is_err());
        assert!(password_complexity("NoSpecial12").is_err());
    }

    #[test]
    fn test_phone_number() {
        assert!(phone_number("+15551234567").is_ok());
        assert!(phone_number("0812345678").is_ok());
        assert!(phone_number("12-34").is_err());
        assert!(phone_number("+").is_err());
    }

    #[test]
    fn test_image_path() {
        assert!(image_path("uploads/cat.jpg").is_ok());
        assert!(image_path("uploads/cat.JPEG").is_ok());
        assert!(image_path("a.png").is_ok());
        assert!(image_path("uploads/cat.gif").is_err());
        assert!(image_path("noextension").is_err());
        assert!(image_path(".png").is_err());
    }

    #[test]
    fn test_validate_request_collects_fields() {
        let req = Signup {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let err = req.validate_request().unwrap_err();
        let MurmurError::Validation(message) = err else {
            panic!("expected validation error");
        };
        assert!(message.starts_with("email:"));
        assert!(message.contains("password: password_too_short"));
    }
}
