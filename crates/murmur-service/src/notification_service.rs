//! Notification service trait definition.

use async_trait::async_trait;
use murmur_core::{AccountId, Interface, MurmurResult, Notification};

/// Unread notification feed.
#[async_trait]
pub trait NotificationService: Interface + Send + Sync {
    /// Unread follows, likes, and comments for `owner`, newest first.
    ///
    /// Recomputed from the store on every call.
    async fn get_unread(&self, owner: AccountId) -> MurmurResult<Vec<Notification>>;
}
