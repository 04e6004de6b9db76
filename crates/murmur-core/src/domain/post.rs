//! Post aggregate and its read models.

use crate::{AccountId, CommentId, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of comment previews embedded in a post detail.
pub const COMMENT_PREVIEW_LIMIT: usize = 5;

/// A stored post row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub account_id: AccountId,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a post with its images.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub account_id: AccountId,
    pub caption: Option<String>,
    /// Already-stored image paths, kept in the given order.
    pub images: Vec<String>,
}

/// Entry of the following feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFeedItem {
    pub id: PostId,
    pub account_id: AccountId,
    pub fullname: String,
    pub caption: Option<String>,
    pub images: Vec<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Author block of a post detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub id: AccountId,
    pub fullname: String,
    pub img: Option<String>,
}

/// A comment joined with its author's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: CommentId,
    pub account_id: AccountId,
    pub fullname: String,
    pub img: Option<String>,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Cached detail view of a single post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: PostId,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: PostAuthor,
    pub images: Vec<String>,
    /// Active likes only.
    pub likes: i64,
    /// Latest comments, newest first.
    pub comments: Vec<CommentView>,
}

/// A stored comment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub account_id: AccountId,
    pub post_id: PostId,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
