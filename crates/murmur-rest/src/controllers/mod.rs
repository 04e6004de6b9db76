//! REST API controllers.

pub mod auth_controller;
pub mod health_controller;
pub mod notification_controller;
pub mod post_controller;
pub mod user_controller;

pub use health_controller::*;

use crate::responses::AppError;
use murmur_core::MurmurError;
use std::str::FromStr;

/// Parses a numeric path segment into a typed ID.
pub(crate) fn parse_id<T: FromStr>(kind: &str, raw: &str) -> Result<T, AppError> {
    raw.parse::<T>()
        .map_err(|_| AppError(MurmurError::Validation(format!("{} id must be a number", kind))))
}
