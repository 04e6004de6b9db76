//! Profile service implementation.

use crate::cache::{cache_keys, ReadThroughCache};
use crate::dto::UpdateProfileRequest;
use crate::profile_service::ProfileService;
use async_trait::async_trait;
use murmur_core::{AccountId, MurmurError, MurmurResult, Profile, ProfilePatch, ValidateExt};
use murmur_repository::ProfileRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Profile service with read-through caching at `profile-{id}`.
pub struct ProfileServiceImpl {
    profiles: Arc<dyn ProfileRepository>,
    cache: ReadThroughCache,
}

impl ProfileServiceImpl {
    /// Creates a new profile service.
    pub fn new(profiles: Arc<dyn ProfileRepository>, cache: ReadThroughCache) -> Self {
        Self { profiles, cache }
    }
}

#[async_trait]
impl ProfileService for ProfileServiceImpl {
    async fn get_profile(&self, id: AccountId) -> MurmurResult<Profile> {
        debug!("Getting profile: {}", id);

        self.cache
            .get_or_load(&cache_keys::profile(id), || async {
                self.profiles
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| MurmurError::not_found("Profile", id))
            })
            .await
    }

    async fn update_profile(&self, id: AccountId, request: UpdateProfileRequest) -> MurmurResult<()> {
        debug!("Updating profile: {}", id);

        request.validate_request()?;

        let patch = ProfilePatch::from(request);
        if patch.is_empty() {
            return Err(MurmurError::validation("At least one profile field is required"));
        }

        if !self.profiles.update(id, &patch).await? {
            return Err(MurmurError::not_found("Profile", id));
        }

        self.cache.invalidate(&cache_keys::profile(id)).await;

        info!("Profile updated: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for ProfileServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileServiceImpl")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
