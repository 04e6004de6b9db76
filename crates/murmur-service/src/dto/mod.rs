//! Data Transfer Objects (DTOs).

mod auth_dto;
mod post_dto;
mod profile_dto;

pub use auth_dto::*;
pub use post_dto::*;
pub use profile_dto::*;
