//! Follow service implementation.

use crate::follow_service::FollowService;
use async_trait::async_trait;
use murmur_core::{AccountId, MurmurError, MurmurResult, ProfileSummary};
use murmur_repository::{FollowRepository, ProfileRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// Follow service implementation.
pub struct FollowServiceImpl {
    follows: Arc<dyn FollowRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl FollowServiceImpl {
    /// Creates a new follow service.
    pub fn new(follows: Arc<dyn FollowRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { follows, profiles }
    }

    async fn ensure_target(&self, follower: AccountId, target: AccountId) -> MurmurResult<()> {
        if follower == target {
            return Err(MurmurError::validation("Cannot follow yourself"));
        }
        if !self.profiles.exists(target).await? {
            return Err(MurmurError::not_found("Account", target));
        }
        Ok(())
    }
}

#[async_trait]
impl FollowService for FollowServiceImpl {
    async fn follow(&self, follower: AccountId, target: AccountId) -> MurmurResult<()> {
        debug!("Follow: {} -> {}", follower, target);

        self.ensure_target(follower, target).await?;
        self.follows.follow(follower, target).await?;

        info!("Account {} followed {}", follower, target);
        Ok(())
    }

    async fn unfollow(&self, follower: AccountId, target: AccountId) -> MurmurResult<()> {
        debug!("Unfollow: {} -> {}", follower, target);

        self.ensure_target(follower, target).await?;
        if self.follows.unfollow(follower, target).await? {
            info!("Account {} unfollowed {}", follower, target);
        }
        Ok(())
    }

    async fn followers(&self, id: AccountId) -> MurmurResult<Vec<ProfileSummary>> {
        debug!("Listing followers of {}", id);
        self.follows.followers(id).await
    }

    async fn following(&self, id: AccountId) -> MurmurResult<Vec<ProfileSummary>> {
        debug!("Listing accounts followed by {}", id);
        self.follows.following(id).await
    }
}

impl std::fmt::Debug for FollowServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FollowServiceImpl").finish_non_exhaustive()
    }
}
