//! Follow service trait definition.

use async_trait::async_trait;
use murmur_core::{AccountId, Interface, MurmurResult, ProfileSummary};

/// Follow graph operations.
#[async_trait]
pub trait FollowService: Interface + Send + Sync {
    /// Follows `target`. Idempotent.
    async fn follow(&self, follower: AccountId, target: AccountId) -> MurmurResult<()>;

    /// Stops following `target`. Idempotent.
    async fn unfollow(&self, follower: AccountId, target: AccountId) -> MurmurResult<()>;

    /// Accounts following `id`.
    async fn followers(&self, id: AccountId) -> MurmurResult<Vec<ProfileSummary>>;

    /// Accounts `id` follows.
    async fn following(&self, id: AccountId) -> MurmurResult<Vec<ProfileSummary>>;
}
