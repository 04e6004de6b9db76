//! Repository trait definitions.
//!
//! Every method maps onto one statement or one transaction against the
//! relational store. Soft-deleted rows (`deleted_at IS NOT NULL`) are
//! invisible to all reads.

use async_trait::async_trait;
use murmur_core::{
    Account, AccountId, Comment, CommentView, Email, Interface, MurmurResult, NewAccount, NewPost, Post,
    PostDetail, PostFeedItem, PostId, Profile, ProfilePatch, ProfileSummary, UnreadEvent,
};

/// Account repository trait.
#[async_trait]
pub trait AccountRepository: Interface + Send + Sync {
    /// Inserts an account and its profile in one transaction.
    ///
    /// A duplicate email fails with `Conflict`.
    async fn create(&self, account: &NewAccount) -> MurmurResult<Account>;

    /// Finds an account by its normalized email.
    async fn find_by_email(&self, email: &Email) -> MurmurResult<Option<Account>>;
}

/// Profile repository trait.
#[async_trait]
pub trait ProfileRepository: Interface + Send + Sync {
    /// Finds a profile by account ID.
    async fn find_by_id(&self, id: AccountId) -> MurmurResult<Option<Profile>>;

    /// Applies a partial update. Returns false when the profile does not exist.
    async fn update(&self, id: AccountId, patch: &ProfilePatch) -> MurmurResult<bool>;

    /// Checks whether a profile exists.
    async fn exists(&self, id: AccountId) -> MurmurResult<bool>;
}

/// Follow-edge repository trait.
#[async_trait]
pub trait FollowRepository: Interface + Send + Sync {
    /// Creates or reactivates the edge `follower -> target`.
    ///
    /// Following an account already followed is a no-op.
    async fn follow(&self, follower: AccountId, target: AccountId) -> MurmurResult<()>;

    /// Soft-deletes the edge. Returns false when no active edge existed.
    async fn unfollow(&self, follower: AccountId, target: AccountId) -> MurmurResult<bool>;

    /// Lists accounts following `id`.
    async fn followers(&self, id: AccountId) -> MurmurResult<Vec<ProfileSummary>>;

    /// Lists accounts `id` follows.
    async fn following(&self, id: AccountId) -> MurmurResult<Vec<ProfileSummary>>;
}

/// Post repository trait: posts, images, likes, and comments.
#[async_trait]
pub trait PostRepository: Interface + Send + Sync {
    /// Inserts a post and its images in one transaction.
    async fn create(&self, post: &NewPost) -> MurmurResult<Post>;

    /// Checks whether an active post exists.
    async fn exists(&self, id: PostId) -> MurmurResult<bool>;

    /// Posts by accounts the viewer follows, newest first.
    async fn feed_for(&self, viewer: AccountId) -> MurmurResult<Vec<PostFeedItem>>;

    /// Loads the detail view with up to `comment_limit` latest comments.
    async fn find_detail(&self, id: PostId, comment_limit: usize) -> MurmurResult<Option<PostDetail>>;

    /// Creates or reactivates a like.
    ///
    /// Re-liking an active like keeps its read flag; reactivating a
    /// soft-deleted like marks it unread again.
    async fn like(&self, account: AccountId, post: PostId) -> MurmurResult<()>;

    /// Soft-deletes a like. Returns false when no active like existed.
    async fn unlike(&self, account: AccountId, post: PostId) -> MurmurResult<bool>;

    /// Adds a comment.
    async fn add_comment(&self, account: AccountId, post: PostId, comment: &str) -> MurmurResult<Comment>;

    /// All active comments on a post, oldest first.
    async fn comments_for(&self, post: PostId) -> MurmurResult<Vec<CommentView>>;
}

/// Source queries for the notification feed.
///
/// Each query returns unread, active rows targeting `owner`, excluding
/// events the owner caused.
#[async_trait]
pub trait NotificationRepository: Interface + Send + Sync {
    /// Follow edges pointing at the owner.
    async fn unread_follows(&self, owner: AccountId) -> MurmurResult<Vec<UnreadEvent>>;

    /// Likes on the owner's posts.
    async fn unread_likes(&self, owner: AccountId) -> MurmurResult<Vec<UnreadEvent>>;

    /// Comments on the owner's posts.
    async fn unread_comments(&self, owner: AccountId) -> MurmurResult<Vec<UnreadEvent>>;
}
