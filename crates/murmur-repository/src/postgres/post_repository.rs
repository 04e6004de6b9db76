//! PostgreSQL post repository: posts, images, likes, and comments.

use crate::{traits::PostRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use murmur_core::{
    AccountId, Comment, CommentId, CommentView, MurmurResult, NewPost, Post, PostAuthor, PostDetail, PostFeedItem,
    PostId,
};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL post repository.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgPostRepository {
    /// Creates a new post repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    account_id: i64,
    caption: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::new(row.id),
            account_id: AccountId::new(row.account_id),
            caption: row.caption,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct FeedRow {
    id: i64,
    account_id: i64,
    fullname: String,
    caption: Option<String>,
    images: Vec<String>,
    like_count: i64,
    comment_count: i64,
    created_at: DateTime<Utc>,
}

impl From<FeedRow> for PostFeedItem {
    fn from(row: FeedRow) -> Self {
        Self {
            id: PostId::new(row.id),
            account_id: AccountId::new(row.account_id),
            fullname: row.fullname,
            caption: row.caption,
            images: row.images,
            like_count: row.like_count,
            comment_count: row.comment_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct DetailRow {
    id: i64,
    caption: Option<String>,
    created_at: DateTime<Utc>,
    author_id: i64,
    author_fullname: String,
    author_img: Option<String>,
    images: Vec<String>,
    likes: i64,
}

#[derive(Debug, FromRow)]
struct CommentViewRow {
    id: i64,
    account_id: i64,
    fullname: String,
    img: Option<String>,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<CommentViewRow> for CommentView {
    fn from(row: CommentViewRow) -> Self {
        Self {
            id: CommentId::new(row.id),
            account_id: AccountId::new(row.account_id),
            fullname: row.fullname,
            img: row.img,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    account_id: i64,
    post_id: i64,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId::new(row.id),
            account_id: AccountId::new(row.account_id),
            post_id: PostId::new(row.post_id),
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: &NewPost) -> MurmurResult<Post> {
        debug!("Creating post for account {} with {} images", post.account_id, post.images.len());

        let mut tx = self.pool.inner().begin().await?;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (account_id, caption)
            VALUES ($1, $2)
            RETURNING id, account_id, caption, created_at
            "#,
        )
        .bind(post.account_id.into_inner())
        .bind(post.caption.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        if !post.images.is_empty() {
            // UNNEST ... WITH ORDINALITY keeps the given order in the ids.
            sqlx::query(
                r#"
                INSERT INTO post_images (post_id, img)
                SELECT $1, img
                FROM UNNEST($2::TEXT[]) WITH ORDINALITY AS t(img, ord)
                ORDER BY ord
                "#,
            )
            .bind(row.id)
            .bind(post.images.as_slice())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }

    async fn exists(&self, id: PostId) -> MurmurResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1 AND deleted_at IS NULL)")
                .bind(id.into_inner())
                .fetch_one(self.pool.inner())
                .await?;

        Ok(exists)
    }

    async fn feed_for(&self, viewer: AccountId) -> MurmurResult<Vec<PostFeedItem>> {
        debug!("Loading feed for account {}", viewer);

        let rows = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT p.id, p.account_id, pr.fullname, p.caption, p.created_at,
                   COALESCE((SELECT ARRAY_AGG(i.img ORDER BY i.id)
                             FROM post_images i
                             WHERE i.post_id = p.id AND i.deleted_at IS NULL), '{}') AS images,
                   (SELECT COUNT(*) FROM likes l
                    WHERE l.post_id = p.id AND l.deleted_at IS NULL) AS like_count,
                   (SELECT COUNT(*) FROM comments c
                    WHERE c.post_id = p.id AND c.deleted_at IS NULL) AS comment_count
            FROM posts p
            JOIN followers f ON f.account_id = p.account_id
                            AND f.follower_id = $1
                            AND f.deleted_at IS NULL
            JOIN profiles pr ON pr.id = p.account_id
            WHERE p.deleted_at IS NULL
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(viewer.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(PostFeedItem::from).collect())
    }

    async fn find_detail(&self, id: PostId, comment_limit: usize) -> MurmurResult<Option<PostDetail>> {
        debug!("Loading post detail: {}", id);

        let row = sqlx::query_as::<_, DetailRow>(
            r#"
            SELECT p.id, p.caption, p.created_at,
                   pr.id AS author_id, pr.fullname AS author_fullname, pr.img AS author_img,
                   COALESCE((SELECT ARRAY_AGG(i.img ORDER BY i.id)
                             FROM post_images i
                             WHERE i.post_id = p.id AND i.deleted_at IS NULL), '{}') AS images,
                   (SELECT COUNT(*) FROM likes l
                    WHERE l.post_id = p.id AND l.deleted_at IS NULL) AS likes
            FROM posts p
            JOIN profiles pr ON pr.id = p.account_id
            WHERE p.id = $1 AND p.deleted_at IS NULL
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let comments = sqlx::query_as::<_, CommentViewRow>(
            r#"
            SELECT c.id, c.account_id, pr.fullname, pr.img, c.comment, c.created_at
            FROM comments c
            JOIN profiles pr ON pr.id = c.account_id
            WHERE c.post_id = $1 AND c.deleted_at IS NULL
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $2
            "#,
        )
        .bind(id.into_inner())
        .bind(i64::try_from(comment_limit).unwrap_or(i64::MAX))
        .fetch_all(self.pool.inner())
        .await?;

        Ok(Some(PostDetail {
            id: PostId::new(row.id),
            caption: row.caption,
            created_at: row.created_at,
            author: PostAuthor {
                id: AccountId::new(row.author_id),
                fullname: row.author_fullname,
                img: row.author_img,
            },
            images: row.images,
            likes: row.likes,
            comments: comments.into_iter().map(CommentView::from).collect(),
        }))
    }

    async fn like(&self, account: AccountId, post: PostId) -> MurmurResult<()> {
        debug!("Account {} likes post {}", account, post);

        // All SET expressions see the pre-update row.
        sqlx::query(
            r#"
            INSERT INTO likes (account_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT (account_id, post_id) DO UPDATE
            SET read       = CASE WHEN likes.deleted_at IS NULL THEN likes.read ELSE FALSE END,
                created_at = CASE WHEN likes.deleted_at IS NULL THEN likes.created_at ELSE NOW() END,
                deleted_at = NULL
            "#,
        )
        .bind(account.into_inner())
        .bind(post.into_inner())
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }

    async fn unlike(&self, account: AccountId, post: PostId) -> MurmurResult<bool> {
        debug!("Account {} unlikes post {}", account, post);

        let result = sqlx::query(
            r#"
            UPDATE likes
            SET deleted_at = NOW()
            WHERE account_id = $1 AND post_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(account.into_inner())
        .bind(post.into_inner())
        .execute(self.pool.inner())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_comment(&self, account: AccountId, post: PostId, comment: &str) -> MurmurResult<Comment> {
        debug!("Account {} comments on post {}", account, post);

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (account_id, post_id, comment)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, post_id, comment, created_at
            "#,
        )
        .bind(account.into_inner())
        .bind(post.into_inner())
        .bind(comment)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn comments_for(&self, post: PostId) -> MurmurResult<Vec<CommentView>> {
        let rows = sqlx::query_as::<_, CommentViewRow>(
            r#"
            SELECT c.id, c.account_id, pr.fullname, pr.img, c.comment, c.created_at
            FROM comments c
            JOIN profiles pr ON pr.id = c.account_id
            WHERE c.post_id = $1 AND c.deleted_at IS NULL
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(post.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(CommentView::from).collect())
    }
}
