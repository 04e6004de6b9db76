//! Profile DTOs.

use murmur_core::rules::{image_path, not_blank, phone_number};
use murmur_core::ProfilePatch;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Partial profile update. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = 100, message = "Full name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub fullname: Option<String>,

    #[validate(custom(function = "phone_number"))]
    pub phone: Option<String>,

    /// Path of an already-stored image.
    #[validate(custom(function = "image_path"))]
    pub img: Option<String>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            fullname: request.fullname.map(|name| name.trim().to_string()),
            phone: request.phone,
            img: request.img,
        }
    }
}
