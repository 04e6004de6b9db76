//! In-memory implementation of every repository trait.
//!
//! Mirrors the SQL semantics (unique edges, upsert toggles, soft deletes,
//! unread flags) so service and HTTP tests can run without PostgreSQL.

use crate::traits::{AccountRepository, FollowRepository, NotificationRepository, PostRepository, ProfileRepository};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use murmur_core::{
    Account, AccountId, Comment, CommentId, CommentView, Email, MurmurError, MurmurResult, NewAccount, NewPost,
    NotificationKind, Post, PostAuthor, PostDetail, PostFeedItem, PostId, Profile, ProfilePatch, ProfileSummary,
    UnreadEvent,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
struct Edge {
    id: i64,
    read: bool,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Edge {
    const fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone)]
struct StoredComment {
    id: i64,
    account_id: AccountId,
    post_id: PostId,
    comment: String,
    read: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredPost {
    post: Post,
    images: Vec<String>,
    deleted: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    last_instant: Option<DateTime<Utc>>,
    accounts: HashMap<AccountId, Account>,
    profiles: HashMap<AccountId, Profile>,
    /// (target, follower) -> edge
    follows: HashMap<(AccountId, AccountId), Edge>,
    posts: HashMap<PostId, StoredPost>,
    /// (account, post) -> edge
    likes: HashMap<(AccountId, PostId), Edge>,
    comments: Vec<StoredComment>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps keep orderings deterministic.
    fn now(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_instant {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_instant = Some(now);
        now
    }

    fn summary(&self, id: AccountId) -> Option<ProfileSummary> {
        self.profiles.get(&id).map(ProfileSummary::from)
    }

    fn fullname(&self, id: AccountId) -> String {
        self.profiles.get(&id).map(|p| p.fullname.clone()).unwrap_or_default()
    }

    fn active_post(&self, id: PostId) -> Option<&StoredPost> {
        self.posts.get(&id).filter(|p| !p.deleted)
    }

    fn like_count(&self, post: PostId) -> i64 {
        let count = self.likes.iter().filter(|((_, p), e)| *p == post && e.is_active()).count();
        i64::try_from(count).unwrap_or(i64::MAX)
    }

    fn comment_views(&self, post: PostId) -> Vec<CommentView> {
        let mut views: Vec<CommentView> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post)
            .map(|c| {
                let profile = self.profiles.get(&c.account_id);
                CommentView {
                    id: CommentId::new(c.id),
                    account_id: c.account_id,
                    fullname: profile.map(|p| p.fullname.clone()).unwrap_or_default(),
                    img: profile.and_then(|p| p.img.clone()),
                    comment: c.comment.clone(),
                    created_at: c.created_at,
                }
            })
            .collect();
        views.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        views
    }
}

/// In-memory store backing all repository traits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a `Database` error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Marks every notification source row as read.
    pub fn mark_all_read(&self) {
        let mut state = self.state.lock();
        state.follows.values_mut().for_each(|e| e.read = true);
        state.likes.values_mut().for_each(|e| e.read = true);
        state.comments.iter_mut().for_each(|c| c.read = true);
    }

    /// Number of like rows for a post, active or not.
    #[must_use]
    pub fn like_rows(&self, post: PostId) -> usize {
        self.state.lock().likes.keys().filter(|(_, p)| *p == post).count()
    }

    fn check(&self) -> MurmurResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(MurmurError::Database("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create(&self, account: &NewAccount) -> MurmurResult<Account> {
        self.check()?;
        let mut state = self.state.lock();
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(MurmurError::conflict("duplicate key value violates unique constraint \"accounts_email_key\""));
        }

        let id = AccountId::new(state.next_id());
        let now = state.now();
        let created = Account {
            id,
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            created_at: now,
        };
        state.accounts.insert(id, created.clone());
        state.profiles.insert(
            id,
            Profile {
                id,
                fullname: account.fullname.clone(),
                phone: None,
                img: None,
                updated_at: now,
            },
        );
        Ok(created)
    }

    async fn find_by_email(&self, email: &Email) -> MurmurResult<Option<Account>> {
        self.check()?;
        Ok(self.state.lock().accounts.values().find(|a| &a.email == email).cloned())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_by_id(&self, id: AccountId) -> MurmurResult<Option<Profile>> {
        self.check()?;
        Ok(self.state.lock().profiles.get(&id).cloned())
    }

    async fn update(&self, id: AccountId, patch: &ProfilePatch) -> MurmurResult<bool> {
        self.check()?;
        let mut state = self.state.lock();
        let now = state.now();
        let Some(profile) = state.profiles.get_mut(&id) else {
            return Ok(false);
        };
        patch.apply_to(profile);
        profile.updated_at = now;
        Ok(true)
    }

    async fn exists(&self, id: AccountId) -> MurmurResult<bool> {
        self.check()?;
        Ok(self.state.lock().profiles.contains_key(&id))
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn follow(&self, follower: AccountId, target: AccountId) -> MurmurResult<()> {
        self.check()?;
        let mut state = self.state.lock();
        if !state.accounts.contains_key(&target) || !state.accounts.contains_key(&follower) {
            return Err(MurmurError::not_found("referenced_row", "followers_account_id_fkey"));
        }
        let now = state.now();
        match state.follows.get(&(target, follower)).cloned() {
            Some(edge) if edge.is_active() => {}
            Some(edge) => {
                state.follows.insert(
                    (target, follower),
                    Edge {
                        read: false,
                        created_at: now,
                        deleted_at: None,
                        ..edge
                    },
                );
            }
            None => {
                let id = state.next_id();
                state.follows.insert(
                    (target, follower),
                    Edge {
                        id,
                        read: false,
                        created_at: now,
                        deleted_at: None,
                    },
                );
            }
        }
        Ok(())
    }

    async fn unfollow(&self, follower: AccountId, target: AccountId) -> MurmurResult<bool> {
        self.check()?;
        let mut state = self.state.lock();
        let now = state.now();
        match state.follows.get_mut(&(target, follower)) {
            Some(edge) if edge.is_active() => {
                edge.deleted_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn followers(&self, id: AccountId) -> MurmurResult<Vec<ProfileSummary>> {
        self.check()?;
        let state = self.state.lock();
        let mut edges: Vec<(&(AccountId, AccountId), &Edge)> = state
            .follows
            .iter()
            .filter(|((target, _), e)| *target == id && e.is_active())
            .collect();
        edges.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at).then(b.1.id.cmp(&a.1.id)));
        Ok(edges.into_iter().filter_map(|((_, follower), _)| state.summary(*follower)).collect())
    }

    async fn following(&self, id: AccountId) -> MurmurResult<Vec<ProfileSummary>> {
        self.check()?;
        let state = self.state.lock();
        let mut edges: Vec<(&(AccountId, AccountId), &Edge)> = state
            .follows
            .iter()
            .filter(|((_, follower), e)| *follower == id && e.is_active())
            .collect();
        edges.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at).then(b.1.id.cmp(&a.1.id)));
        Ok(edges.into_iter().filter_map(|((target, _), _)| state.summary(*target)).collect())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: &NewPost) -> MurmurResult<Post> {
        self.check()?;
        let mut state = self.state.lock();
        if !state.accounts.contains_key(&post.account_id) {
            return Err(MurmurError::not_found("referenced_row", "posts_account_id_fkey"));
        }
        let id = PostId::new(state.next_id());
        let created = Post {
            id,
            account_id: post.account_id,
            caption: post.caption.clone(),
            created_at: state.now(),
        };
        state.posts.insert(
            id,
            StoredPost {
                post: created.clone(),
                images: post.images.clone(),
                deleted: false,
            },
        );
        Ok(created)
    }

    async fn exists(&self, id: PostId) -> MurmurResult<bool> {
        self.check()?;
        Ok(self.state.lock().active_post(id).is_some())
    }

    async fn feed_for(&self, viewer: AccountId) -> MurmurResult<Vec<PostFeedItem>> {
        self.check()?;
        let state = self.state.lock();
        let mut items: Vec<PostFeedItem> = state
            .posts
            .values()
            .filter(|p| !p.deleted)
            .filter(|p| {
                state
                    .follows
                    .get(&(p.post.account_id, viewer))
                    .is_some_and(Edge::is_active)
            })
            .map(|p| PostFeedItem {
                id: p.post.id,
                account_id: p.post.account_id,
                fullname: state.fullname(p.post.account_id),
                caption: p.post.caption.clone(),
                images: p.images.clone(),
                like_count: state.like_count(p.post.id),
                comment_count: i64::try_from(state.comment_views(p.post.id).len()).unwrap_or(i64::MAX),
                created_at: p.post.created_at,
            })
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn find_detail(&self, id: PostId, comment_limit: usize) -> MurmurResult<Option<PostDetail>> {
        self.check()?;
        let state = self.state.lock();
        let Some(stored) = state.active_post(id) else {
            return Ok(None);
        };
        let author = state.profiles.get(&stored.post.account_id);
        let mut comments = state.comment_views(id);
        comments.reverse();
        comments.truncate(comment_limit);

        Ok(Some(PostDetail {
            id,
            caption: stored.post.caption.clone(),
            created_at: stored.post.created_at,
            author: PostAuthor {
                id: stored.post.account_id,
                fullname: author.map(|p| p.fullname.clone()).unwrap_or_default(),
                img: author.and_then(|p| p.img.clone()),
            },
            images: stored.images.clone(),
            likes: state.like_count(id),
            comments,
        }))
    }

    async fn like(&self, account: AccountId, post: PostId) -> MurmurResult<()> {
        self.check()?;
        let mut state = self.state.lock();
        if !state.posts.contains_key(&post) {
            return Err(MurmurError::not_found("referenced_row", "likes_post_id_fkey"));
        }
        let now = state.now();
        match state.likes.get(&(account, post)).cloned() {
            Some(edge) if edge.is_active() => {}
            Some(edge) => {
                state.likes.insert(
                    (account, post),
                    Edge {
                        read: false,
                        created_at: now,
                        deleted_at: None,
                        ..edge
                    },
                );
            }
            None => {
                let id = state.next_id();
                state.likes.insert(
                    (account, post),
                    Edge {
                        id,
                        read: false,
                        created_at: now,
                        deleted_at: None,
                    },
                );
            }
        }
        Ok(())
    }

    async fn unlike(&self, account: AccountId, post: PostId) -> MurmurResult<bool> {
        self.check()?;
        let mut state = self.state.lock();
        let now = state.now();
        match state.likes.get_mut(&(account, post)) {
            Some(edge) if edge.is_active() => {
                edge.deleted_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn add_comment(&self, account: AccountId, post: PostId, comment: &str) -> MurmurResult<Comment> {
        self.check()?;
        let mut state = self.state.lock();
        if !state.posts.contains_key(&post) {
            return Err(MurmurError::not_found("referenced_row", "comments_post_id_fkey"));
        }
        let stored = StoredComment {
            id: state.next_id(),
            account_id: account,
            post_id: post,
            comment: comment.to_string(),
            read: false,
            created_at: state.now(),
        };
        state.comments.push(stored.clone());
        Ok(Comment {
            id: CommentId::new(stored.id),
            account_id: stored.account_id,
            post_id: stored.post_id,
            comment: stored.comment,
            created_at: stored.created_at,
        })
    }

    async fn comments_for(&self, post: PostId) -> MurmurResult<Vec<CommentView>> {
        self.check()?;
        Ok(self.state.lock().comment_views(post))
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn unread_follows(&self, owner: AccountId) -> MurmurResult<Vec<UnreadEvent>> {
        self.check()?;
        let state = self.state.lock();
        Ok(state
            .follows
            .iter()
            .filter(|((target, _), e)| *target == owner && e.is_active() && !e.read)
            .map(|((_, follower), e)| UnreadEvent {
                kind: NotificationKind::Follow,
                source_id: e.id,
                actor_id: *follower,
                actor_fullname: state.fullname(*follower),
                post_id: None,
                comment: None,
                created_at: e.created_at,
            })
            .collect())
    }

    async fn unread_likes(&self, owner: AccountId) -> MurmurResult<Vec<UnreadEvent>> {
        self.check()?;
        let state = self.state.lock();
        Ok(state
            .likes
            .iter()
            .filter(|((_, post), e)| {
                e.is_active()
                    && !e.read
                    && state.active_post(*post).is_some_and(|p| p.post.account_id == owner)
            })
            .map(|((actor, post), e)| UnreadEvent {
                kind: NotificationKind::Like,
                source_id: e.id,
                actor_id: *actor,
                actor_fullname: state.fullname(*actor),
                post_id: Some(*post),
                comment: None,
                created_at: e.created_at,
            })
            .collect())
    }

    async fn unread_comments(&self, owner: AccountId) -> MurmurResult<Vec<UnreadEvent>> {
        self.check()?;
        let state = self.state.lock();
        Ok(state
            .comments
            .iter()
            .filter(|c| {
                !c.read
                    && state.active_post(c.post_id).is_some_and(|p| p.post.account_id == owner)
            })
            .map(|c| UnreadEvent {
                kind: NotificationKind::Comment,
                source_id: c.id,
                actor_id: c.account_id,
                actor_fullname: state.fullname(c.account_id),
                post_id: Some(c.post_id),
                comment: Some(c.comment.clone()),
                created_at: c.created_at,
            })
            .collect())
    }
}
