//! Post service trait definition.

use crate::dto::{CreateCommentRequest, CreatePostRequest};
use async_trait::async_trait;
use murmur_core::{AccountId, Comment, CommentView, Interface, MurmurResult, Post, PostDetail, PostFeedItem, PostId};

/// Posts, likes, and comments.
///
/// Every write that changes a post detail invalidates its cache entry
/// before returning.
#[async_trait]
pub trait PostService: Interface + Send + Sync {
    /// Creates a post with its images.
    async fn create_post(&self, author: AccountId, request: CreatePostRequest) -> MurmurResult<Post>;

    /// Posts from followed accounts, newest first.
    async fn feed(&self, viewer: AccountId) -> MurmurResult<Vec<PostFeedItem>>;

    /// Gets a post detail, served from the entity cache when possible.
    async fn get_post_detail(&self, id: PostId) -> MurmurResult<PostDetail>;

    /// Likes a post. Idempotent.
    async fn like_post(&self, account: AccountId, post: PostId) -> MurmurResult<()>;

    /// Removes a like. Idempotent.
    async fn unlike_post(&self, account: AccountId, post: PostId) -> MurmurResult<()>;

    /// Comments on a post.
    async fn create_comment(
        &self,
        account: AccountId,
        post: PostId,
        request: CreateCommentRequest,
    ) -> MurmurResult<Comment>;

    /// All comments on a post, oldest first.
    async fn list_comments(&self, post: PostId) -> MurmurResult<Vec<CommentView>>;
}
