//! PostgreSQL notification source queries.

use crate::{traits::NotificationRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use murmur_core::{AccountId, MurmurResult, NotificationKind, PostId, UnreadEvent};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL notification repository.
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgNotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn fetch(&self, kind: NotificationKind, sql: &'static str, owner: AccountId) -> MurmurResult<Vec<UnreadEvent>> {
        debug!(?kind, "Loading unread events for account {}", owner);

        let rows = sqlx::query_as::<_, UnreadRow>(sql)
            .bind(owner.into_inner())
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(|row| row.into_event(kind)).collect())
    }
}

#[derive(Debug, FromRow)]
struct UnreadRow {
    source_id: i64,
    actor_id: i64,
    actor_fullname: String,
    post_id: Option<i64>,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl UnreadRow {
    fn into_event(self, kind: NotificationKind) -> UnreadEvent {
        UnreadEvent {
            kind,
            source_id: self.source_id,
            actor_id: AccountId::new(self.actor_id),
            actor_fullname: self.actor_fullname,
            post_id: self.post_id.map(PostId::new),
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

const UNREAD_FOLLOWS: &str = r#"
    SELECT f.id AS source_id, f.follower_id AS actor_id, pr.fullname AS actor_fullname,
           NULL::BIGINT AS post_id, NULL::TEXT AS comment, f.created_at
    FROM followers f
    JOIN profiles pr ON pr.id = f.follower_id
    WHERE f.account_id = $1 AND f.read = FALSE AND f.deleted_at IS NULL
"#;

const UNREAD_LIKES: &str = r#"
    SELECT l.id AS source_id, l.account_id AS actor_id, pr.fullname AS actor_fullname,
           l.post_id, NULL::TEXT AS comment, l.created_at
    FROM likes l
    JOIN posts p ON p.id = l.post_id
    JOIN profiles pr ON pr.id = l.account_id
    WHERE p.account_id = $1
      AND l.read = FALSE AND l.deleted_at IS NULL AND p.deleted_at IS NULL
"#;

const UNREAD_COMMENTS: &str = r#"
    SELECT c.id AS source_id, c.account_id AS actor_id, pr.fullname AS actor_fullname,
           c.post_id, c.comment, c.created_at
    FROM comments c
    JOIN posts p ON p.id = c.post_id
    JOIN profiles pr ON pr.id = c.account_id
    WHERE p.account_id = $1
      AND c.read = FALSE AND c.deleted_at IS NULL AND p.deleted_at IS NULL
"#;

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn unread_follows(&self, owner: AccountId) -> MurmurResult<Vec<UnreadEvent>> {
        self.fetch(NotificationKind::Follow, UNREAD_FOLLOWS, owner).await
    }

    async fn unread_likes(&self, owner: AccountId) -> MurmurResult<Vec<UnreadEvent>> {
        self.fetch(NotificationKind::Like, UNREAD_LIKES, owner).await
    }

    async fn unread_comments(&self, owner: AccountId) -> MurmurResult<Vec<UnreadEvent>> {
        self.fetch(NotificationKind::Comment, UNREAD_COMMENTS, owner).await
    }
}
