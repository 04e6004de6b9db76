//! Notification feed implementation.

use crate::notification_service::NotificationService;
use async_trait::async_trait;
use murmur_core::{AccountId, MurmurResult, Notification};
use murmur_repository::NotificationRepository;
use std::sync::Arc;
use tracing::debug;

/// Merges the three unread sources into one feed.
pub struct NotificationServiceImpl {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationServiceImpl {
    /// Creates a new notification service.
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl NotificationService for NotificationServiceImpl {
    async fn get_unread(&self, owner: AccountId) -> MurmurResult<Vec<Notification>> {
        debug!("Collecting unread notifications for {}", owner);

        let (follows, likes, comments) = tokio::try_join!(
            self.notifications.unread_follows(owner),
            self.notifications.unread_likes(owner),
            self.notifications.unread_comments(owner),
        )?;

        let mut feed: Vec<Notification> = follows
            .into_iter()
            .chain(likes)
            .chain(comments)
            .map(Notification::from)
            .collect();
        feed.sort_by(Notification::feed_order);

        debug!("{} unread notifications for {}", feed.len(), owner);
        Ok(feed)
    }
}

impl std::fmt::Debug for NotificationServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use chrono::{DateTime, TimeZone, Utc};
    use murmur_core::{MurmurError, NewPost, NotificationKind, PostId, UnreadEvent};
    use murmur_repository::{FollowRepository, PostRepository};

    /// Serves fixed rows, for ordering tests that need equal timestamps.
    struct FixedRows {
        follows: Vec<UnreadEvent>,
        likes: Vec<UnreadEvent>,
        comments: Vec<UnreadEvent>,
    }

    #[async_trait]
    impl NotificationRepository for FixedRows {
        async fn unread_follows(&self, _owner: AccountId) -> MurmurResult<Vec<UnreadEvent>> {
            Ok(self.follows.clone())
        }

        async fn unread_likes(&self, _owner: AccountId) -> MurmurResult<Vec<UnreadEvent>> {
            Ok(self.likes.clone())
        }

        async fn unread_comments(&self, _owner: AccountId) -> MurmurResult<Vec<UnreadEvent>> {
            Ok(self.comments.clone())
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn event(kind: NotificationKind, source_id: i64, created_at: DateTime<Utc>) -> UnreadEvent {
        UnreadEvent {
            kind,
            source_id,
            actor_id: AccountId::new(2),
            actor_fullname: "Grace".to_string(),
            post_id: (kind != NotificationKind::Follow).then_some(PostId::new(10)),
            comment: (kind == NotificationKind::Comment).then(|| "nice".to_string()),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_merge_orders_newest_first() {
        let service = NotificationServiceImpl::new(Arc::new(FixedRows {
            follows: vec![event(NotificationKind::Follow, 1, at(1))],
            likes: vec![event(NotificationKind::Like, 1, at(2))],
            comments: vec![event(NotificationKind::Comment, 1, at(3))],
        }));

        let feed = service.get_unread(AccountId::new(1)).await.unwrap();

        let kinds: Vec<_> = feed.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::Comment, NotificationKind::Like, NotificationKind::Follow]
        );
        assert_eq!(feed[0].message, "Grace commented: nice");
        assert_eq!(feed[1].message, "Grace liked your post");
        assert_eq!(feed[2].message, "Grace followed you");
        assert_eq!(feed[2].post_id, None);
    }

    #[tokio::test]
    async fn test_equal_timestamps_tie_break() {
        let service = NotificationServiceImpl::new(Arc::new(FixedRows {
            follows: vec![event(NotificationKind::Follow, 9, at(0))],
            likes: vec![event(NotificationKind::Like, 3, at(0)), event(NotificationKind::Like, 7, at(0))],
            comments: vec![event(NotificationKind::Comment, 1, at(0))],
        }));

        let feed = service.get_unread(AccountId::new(1)).await.unwrap();

        let order: Vec<_> = feed.iter().map(|n| (n.kind, n.created_at)).collect();
        assert_eq!(order[0].0, NotificationKind::Comment);
        assert_eq!(order[1].0, NotificationKind::Like);
        assert_eq!(order[2].0, NotificationKind::Like);
        assert_eq!(order[3].0, NotificationKind::Follow);
        let json = serde_json::to_value(&feed).unwrap();
        assert!(json[3].get("post_id").is_none());
        assert_eq!(json[1]["post_id"], 10);
    }

    #[tokio::test]
    async fn test_feed_from_store_activity() {
        let fx = Fixture::new();
        let owner = fx.account("owner@example.com", "Owner").await;
        let grace = fx.account("grace@example.com", "Grace").await;
        let post = PostRepository::create(
            &*fx.store,
            &NewPost {
                account_id: owner,
                caption: Some("hello".to_string()),
                images: vec![],
            },
        )
        .await
        .unwrap();

        FollowRepository::follow(&*fx.store, grace, owner).await.unwrap();
        fx.store.like(grace, post.id).await.unwrap();
        fx.store.add_comment(grace, post.id, "lovely").await.unwrap();
        fx.store.add_comment(owner, post.id, "thanks").await.unwrap();

        let feed = fx.notifications.get_unread(owner).await.unwrap();

        let kinds: Vec<_> = feed.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::Comment,
                NotificationKind::Comment,
                NotificationKind::Like,
                NotificationKind::Follow
            ]
        );
        assert_eq!(feed[0].message, "Owner commented: thanks");
        assert_eq!(feed[1].message, "Grace commented: lovely");

        fx.store.mark_all_read();
        assert!(fx.notifications.get_unread(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_activity_on_own_post_is_included() {
        let fx = Fixture::new();
        let owner = fx.account("owner@example.com", "Owner").await;
        let post = PostRepository::create(
            &*fx.store,
            &NewPost {
                account_id: owner,
                caption: Some("hello".to_string()),
                images: vec![],
            },
        )
        .await
        .unwrap();

        fx.store.like(owner, post.id).await.unwrap();
        fx.store.add_comment(owner, post.id, "thanks").await.unwrap();

        let feed = fx.notifications.get_unread(owner).await.unwrap();

        let messages: Vec<_> = feed.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["Owner commented: thanks", "Owner liked your post"]);
        assert!(feed.iter().all(|n| n.from_id == owner && n.post_id == Some(post.id)));

        fx.store.mark_all_read();
        assert!(fx.notifications.get_unread(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let fx = Fixture::new();
        let owner = fx.account("owner@example.com", "Owner").await;
        fx.store.set_unavailable(true);

        let result = fx.notifications.get_unread(owner).await;

        assert!(matches!(result, Err(MurmurError::Database(_))));
    }
}
