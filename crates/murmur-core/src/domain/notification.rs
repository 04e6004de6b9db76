//! Derived notifications.
//!
//! Notifications are never stored. Each one is projected from an unread,
//! active follow, like, or comment row that targets the owner.

use crate::{AccountId, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Source of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Follow,
    Like,
    Comment,
}

impl NotificationKind {
    /// Precedence among events sharing a timestamp; higher sorts first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Comment => 2,
            Self::Like => 1,
            Self::Follow => 0,
        }
    }
}

/// An unread relationship row as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadEvent {
    pub kind: NotificationKind,
    /// Id of the follow, like, or comment row.
    pub source_id: i64,
    pub actor_id: AccountId,
    pub actor_fullname: String,
    pub post_id: Option<PostId>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A notification as presented to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub from_id: AccountId,
    pub from_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    source_id: i64,
}

impl Notification {
    /// Orders newest first; ties go comment, like, follow, then the newer row.
    #[must_use]
    pub fn feed_order(a: &Self, b: &Self) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.kind.rank().cmp(&a.kind.rank()))
            .then_with(|| b.source_id.cmp(&a.source_id))
    }
}

impl From<UnreadEvent> for Notification {
    fn from(event: UnreadEvent) -> Self {
        let message = match event.kind {
            NotificationKind::Follow => format!("{} followed you", event.actor_fullname),
            NotificationKind::Like => format!("{} liked your post", event.actor_fullname),
            NotificationKind::Comment => format!(
                "{} commented: {}",
                event.actor_fullname,
                event.comment.as_deref().unwrap_or_default()
            ),
        };
        let post_id = match event.kind {
            NotificationKind::Follow => None,
            NotificationKind::Like | NotificationKind::Comment => event.post_id,
        };

        Self {
            kind: event.kind,
            from_id: event.actor_id,
            from_name: event.actor_fullname,
            post_id,
            message,
            created_at: event.created_at,
            source_id: event.source_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(kind: NotificationKind, source_id: i64, secs: i64) -> UnreadEvent {
        UnreadEvent {
            kind,
            source_id,
            actor_id: AccountId::new(9),
            actor_fullname: "Grace".to_string(),
            post_id: Some(PostId::new(4)),
            comment: Some("nice shot".to_string()),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_messages() {
        let follow = Notification::from(event(NotificationKind::Follow, 1, 0));
        let like = Notification::from(event(NotificationKind::Like, 1, 0));
        let comment = Notification::from(event(NotificationKind::Comment, 1, 0));
        assert_eq!(follow.message, "Grace followed you");
        assert_eq!(like.message, "Grace liked your post");
        assert_eq!(comment.message, "Grace commented: nice shot");
    }

    #[test]
    fn test_follow_has_no_post_id_field() {
        let follow = Notification::from(event(NotificationKind::Follow, 1, 0));
        assert_eq!(follow.post_id, None);
        let json = serde_json::to_value(&follow).unwrap();
        assert!(json.get("post_id").is_none());
        assert!(json.get("source_id").is_none());
        assert_eq!(json["kind"], "follow");

        let like = serde_json::to_value(Notification::from(event(NotificationKind::Like, 1, 0))).unwrap();
        assert_eq!(like["post_id"], 4);
    }

    #[test]
    fn test_feed_order_ties() {
        let mut feed: Vec<Notification> = vec![
            event(NotificationKind::Follow, 10, 5).into(),
            event(NotificationKind::Like, 3, 5).into(),
            event(NotificationKind::Like, 7, 5).into(),
            event(NotificationKind::Comment, 1, 5).into(),
            event(NotificationKind::Follow, 11, 9).into(),
        ];
        feed.sort_by(Notification::feed_order);
        let order: Vec<(NotificationKind, i64)> = feed.iter().map(|n| (n.kind, n.source_id)).collect();
        assert_eq!(
            order,
            vec![
                (NotificationKind::Follow, 11),
                (NotificationKind::Comment, 1),
                (NotificationKind::Like, 7),
                (NotificationKind::Like, 3),
                (NotificationKind::Follow, 10),
            ]
        );
    }
}
