//! Post and comment DTOs.

use murmur_core::rules::{image_paths, not_blank};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create-post request. Needs a caption, at least one image, or both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(max = 2200, message = "Caption must be at most 2200 characters"))]
    pub caption: Option<String>,

    /// Already-stored image paths, in display order.
    #[serde(default)]
    #[validate(
        length(max = 10, message = "At most 10 images per post"),
        custom(function = "image_paths")
    )]
    pub images: Vec<String>,
}

impl CreatePostRequest {
    /// Caption with surrounding whitespace removed; blank becomes `None`.
    #[must_use]
    pub fn normalized_caption(&self) -> Option<String> {
        self.caption
            .as_deref()
            .map(str::trim)
            .filter(|caption| !caption.is_empty())
            .map(ToString::to_string)
    }
}

/// Create-comment request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(
        length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"),
        custom(function = "not_blank")
    )]
    pub comment: String,
}
