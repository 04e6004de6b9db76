//! Post service implementation.

use crate::cache::{cache_keys, ReadThroughCache};
use crate::dto::{CreateCommentRequest, CreatePostRequest};
use crate::post_service::PostService;
use async_trait::async_trait;
use murmur_core::{
    AccountId, Comment, CommentView, MurmurError, MurmurResult, NewPost, Post, PostDetail, PostFeedItem, PostId,
    ValidateExt, COMMENT_PREVIEW_LIMIT,
};
use murmur_repository::PostRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Post service with read-through caching at `post-detail-{id}`.
pub struct PostServiceImpl {
    posts: Arc<dyn PostRepository>,
    cache: ReadThroughCache,
}

impl PostServiceImpl {
    /// Creates a new post service.
    pub fn new(posts: Arc<dyn PostRepository>, cache: ReadThroughCache) -> Self {
        Self { posts, cache }
    }

    async fn ensure_post(&self, id: PostId) -> MurmurResult<()> {
        if self.posts.exists(id).await? {
            Ok(())
        } else {
            Err(MurmurError::not_found("Post", id))
        }
    }
}

#[async_trait]
impl PostService for PostServiceImpl {
    async fn create_post(&self, author: AccountId, request: CreatePostRequest) -> MurmurResult<Post> {
        debug!("Creating post for {}", author);

        request.validate_request()?;

        let caption = request.normalized_caption();
        if caption.is_none() && request.images.is_empty() {
            return Err(MurmurError::validation("A post needs a caption or at least one image"));
        }

        let post = self
            .posts
            .create(&NewPost {
                account_id: author,
                caption,
                images: request.images,
            })
            .await?;

        info!("Post created: {} by {}", post.id, author);
        Ok(post)
    }

    async fn feed(&self, viewer: AccountId) -> MurmurResult<Vec<PostFeedItem>> {
        debug!("Loading following feed for {}", viewer);
        self.posts.feed_for(viewer).await
    }

    async fn get_post_detail(&self, id: PostId) -> MurmurResult<PostDetail> {
        debug!("Getting post detail: {}", id);

        self.cache
            .get_or_load(&cache_keys::post_detail(id), || async {
                self.posts
                    .find_detail(id, COMMENT_PREVIEW_LIMIT)
                    .await?
                    .ok_or_else(|| MurmurError::not_found("Post", id))
            })
            .await
    }

    async fn like_post(&self, account: AccountId, post: PostId) -> MurmurResult<()> {
        debug!("Like: {} -> post {}", account, post);

        self.ensure_post(post).await?;
        self.posts.like(account, post).await?;
        self.cache.invalidate(&cache_keys::post_detail(post)).await;

        info!("Post {} liked by {}", post, account);
        Ok(())
    }

    async fn unlike_post(&self, account: AccountId, post: PostId) -> MurmurResult<()> {
        debug!("Unlike: {} -> post {}", account, post);

        self.ensure_post(post).await?;
        let removed = self.posts.unlike(account, post).await?;
        self.cache.invalidate(&cache_keys::post_detail(post)).await;

        if removed {
            info!("Post {} unliked by {}", post, account);
        }
        Ok(())
    }

    async fn create_comment(
        &self,
        account: AccountId,
        post: PostId,
        request: CreateCommentRequest,
    ) -> MurmurResult<Comment> {
        debug!("Comment: {} -> post {}", account, post);

        request.validate_request()?;
        self.ensure_post(post).await?;

        let comment = self.posts.add_comment(account, post, request.comment.trim()).await?;
        self.cache.invalidate(&cache_keys::post_detail(post)).await;

        info!("Comment {} added to post {}", comment.id, post);
        Ok(comment)
    }

    async fn list_comments(&self, post: PostId) -> MurmurResult<Vec<CommentView>> {
        debug!("Listing comments of post {}", post);

        self.ensure_post(post).await?;
        self.posts.comments_for(post).await
    }
}

impl std::fmt::Debug for PostServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostServiceImpl")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheInterface;
    use crate::follow_service::FollowService;
    use crate::notification_service::NotificationService;
    use crate::test_support::{FailingCache, Fixture};
    use murmur_core::NotificationKind;
    use std::sync::Arc;

    fn post_request(caption: &str, images: &[&str]) -> CreatePostRequest {
        CreatePostRequest {
            caption: Some(caption.to_string()),
            images: images.iter().map(ToString::to_string).collect(),
        }
    }

    fn comment(text: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            comment: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_post_requires_content() {
        let fx = Fixture::new();
        let author = fx.account("a@example.com", "Author").await;

        let empty = fx.posts.create_post(author, CreatePostRequest::default()).await;
        let blank = fx.posts.create_post(author, post_request("   ", &[])).await;
        let image_only = fx
            .posts
            .create_post(
                author,
                CreatePostRequest {
                    caption: None,
                    images: vec!["a.jpg".to_string()],
                },
            )
            .await
            .unwrap();

        assert!(matches!(empty, Err(MurmurError::Validation(_))));
        assert!(matches!(blank, Err(MurmurError::Validation(_))));
        assert_eq!(image_only.caption, None);
    }

    #[tokio::test]
    async fn test_create_post_rejects_unsupported_images() {
        let fx = Fixture::new();
        let author = fx.account("a@example.com", "Author").await;

        let result = fx.posts.create_post(author, post_request("hi", &["clip.gif"])).await;

        assert!(matches!(result, Err(MurmurError::Validation(_))));
    }

    #[tokio::test]
    async fn test_like_invalidates_cached_detail() {
        let fx = Fixture::new();
        let author = fx.account("a@example.com", "Author").await;
        let fan = fx.account("f@example.com", "Fan").await;
        let post = fx.posts.create_post(author, post_request("hi", &[])).await.unwrap();
        let key = cache_keys::post_detail(post.id);

        assert_eq!(fx.posts.get_post_detail(post.id).await.unwrap().likes, 0);
        assert!(fx.cache.exists(&key).await.unwrap());

        fx.posts.like_post(fan, post.id).await.unwrap();

        assert!(!fx.cache.exists(&key).await.unwrap());
        assert_eq!(fx.posts.get_post_detail(post.id).await.unwrap().likes, 1);
    }

    #[tokio::test]
    async fn test_like_toggle_keeps_single_row() {
        let fx = Fixture::new();
        let author = fx.account("a@example.com", "Author").await;
        let fan = fx.account("f@example.com", "Fan").await;
        let post = fx.posts.create_post(author, post_request("hi", &[])).await.unwrap();

        fx.posts.like_post(fan, post.id).await.unwrap();
        fx.posts.like_post(fan, post.id).await.unwrap();
        assert_eq!(fx.posts.get_post_detail(post.id).await.unwrap().likes, 1);

        fx.posts.unlike_post(fan, post.id).await.unwrap();
        fx.posts.like_post(fan, post.id).await.unwrap();

        assert_eq!(fx.store.like_rows(post.id), 1);
        assert_eq!(fx.posts.get_post_detail(post.id).await.unwrap().likes, 1);
    }

    #[tokio::test]
    async fn test_comment_invalidates_and_previews_latest() {
        let fx = Fixture::new();
        let author = fx.account("a@example.com", "Author").await;
        let post = fx.posts.create_post(author, post_request("hi", &[])).await.unwrap();
        fx.posts.get_post_detail(post.id).await.unwrap();

        for i in 1..=6 {
            fx.posts
                .create_comment(author, post.id, comment(&format!("c{}", i)))
                .await
                .unwrap();
        }

        let detail = fx.posts.get_post_detail(post.id).await.unwrap();
        assert_eq!(detail.comments.len(), COMMENT_PREVIEW_LIMIT);
        assert_eq!(detail.comments[0].comment, "c6");

        let all = fx.posts.list_comments(post.id).await.unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].comment, "c1");
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let fx = Fixture::new();
        let fan = fx.account("f@example.com", "Fan").await;
        let missing = PostId::new(777);

        assert!(matches!(
            fx.posts.get_post_detail(missing).await,
            Err(MurmurError::NotFound { .. })
        ));
        assert!(matches!(
            fx.posts.like_post(fan, missing).await,
            Err(MurmurError::NotFound { .. })
        ));
        assert!(matches!(
            fx.posts.create_comment(fan, missing, comment("hey")).await,
            Err(MurmurError::NotFound { .. })
        ));
        assert!(!fx.cache.exists(&cache_keys::post_detail(missing)).await.unwrap());
    }

    #[tokio::test]
    async fn test_writes_succeed_when_cache_down() {
        let fx = Fixture::with_cache(Arc::new(FailingCache));
        let author = fx.account("a@example.com", "Author").await;
        let fan = fx.account("f@example.com", "Fan").await;
        let post = fx.posts.create_post(author, post_request("hi", &[])).await.unwrap();

        fx.posts.like_post(fan, post.id).await.unwrap();
        fx.posts.create_comment(fan, post.id, comment("hey")).await.unwrap();

        let detail = fx.posts.get_post_detail(post.id).await.unwrap();
        assert_eq!(detail.likes, 1);
        assert_eq!(detail.comments.len(), 1);
    }

    #[tokio::test]
    async fn test_feed_to_notification_scenario() {
        let fx = Fixture::new();
        let author = fx.account("a@example.com", "Author").await;
        let viewer = fx.account("v@example.com", "Viewer").await;
        fx.follows.follow(viewer, author).await.unwrap();

        let post = fx
            .posts
            .create_post(author, post_request("sunset", &["1.jpg", "2.png"]))
            .await
            .unwrap();

        let feed = fx.posts.feed(viewer).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!((feed[0].like_count, feed[0].comment_count), (0, 0));
        assert_eq!(feed[0].images, vec!["1.jpg", "2.png"]);

        fx.posts.like_post(viewer, post.id).await.unwrap();

        let unread = fx.notifications.get_unread(author).await.unwrap();
        assert_eq!(unread[0].kind, NotificationKind::Like);
        assert_eq!(unread[0].message, "Viewer liked your post");
        assert_eq!(unread[0].post_id, Some(post.id));

        assert_eq!(fx.posts.get_post_detail(post.id).await.unwrap().likes, 1);
        fx.posts.unlike_post(viewer, post.id).await.unwrap();
        assert_eq!(fx.posts.get_post_detail(post.id).await.unwrap().likes, 0);
    }
}
