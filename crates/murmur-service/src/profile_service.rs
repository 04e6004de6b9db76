//! Profile service trait definition.

use crate::dto::UpdateProfileRequest;
use async_trait::async_trait;
use murmur_core::{AccountId, Interface, MurmurResult, Profile};

/// Profile reads (cached) and partial updates.
#[async_trait]
pub trait ProfileService: Interface + Send + Sync {
    /// Gets a profile, served from the entity cache when possible.
    async fn get_profile(&self, id: AccountId) -> MurmurResult<Profile>;

    /// Applies a partial update and invalidates the cached profile.
    async fn update_profile(&self, id: AccountId, request: UpdateProfileRequest) -> MurmurResult<()>;
}
