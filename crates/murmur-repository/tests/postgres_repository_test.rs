//! Integration tests for the PostgreSQL repositories.
//!
//! These run against a real PostgreSQL started with testcontainers and need
//! Docker: `cargo test -p murmur-repository -- --ignored`.

mod common;

use common::TestDatabase;
use murmur_core::{AccountId, Email, MurmurError, NewAccount, NewPost, NotificationKind, PostId, ProfilePatch};
use murmur_repository::{
    AccountRepository, FollowRepository, NotificationRepository, PgAccountRepository, PgFollowRepository,
    PgNotificationRepository, PgPostRepository, PgProfileRepository, PostRepository, ProfileRepository,
};

struct Repos {
    accounts: PgAccountRepository,
    profiles: PgProfileRepository,
    follows: PgFollowRepository,
    posts: PgPostRepository,
    notifications: PgNotificationRepository,
}

fn repos(db: &TestDatabase) -> Repos {
    Repos {
        accounts: PgAccountRepository::new(db.pool()),
        profiles: PgProfileRepository::new(db.pool()),
        follows: PgFollowRepository::new(db.pool()),
        posts: PgPostRepository::new(db.pool()),
        notifications: PgNotificationRepository::new(db.pool()),
    }
}

async fn create_account(repos: &Repos, email: &str, fullname: &str) -> AccountId {
    repos
        .accounts
        .create(&NewAccount {
            email: Email::new(email).unwrap(),
            password_hash: "$argon2id$test".to_string(),
            fullname: fullname.to_string(),
        })
        .await
        .expect("Failed to create account")
        .id
}

async fn create_post(repos: &Repos, author: AccountId, images: &[&str]) -> PostId {
    repos
        .posts
        .create(&NewPost {
            account_id: author,
            caption: Some("sunset".to_string()),
            images: images.iter().map(ToString::to_string).collect(),
        })
        .await
        .expect("Failed to create post")
        .id
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_register_creates_profile_and_rejects_duplicates() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);

    let id = create_account(&repos, "ada@example.com", "Ada").await;
    let profile = repos.profiles.find_by_id(id).await.unwrap().expect("profile missing");
    assert_eq!(profile.fullname, "Ada");

    let duplicate = repos
        .accounts
        .create(&NewAccount {
            email: Email::new("ada@example.com").unwrap(),
            password_hash: "x".to_string(),
            fullname: "Other".to_string(),
        })
        .await;
    assert!(matches!(duplicate, Err(MurmurError::Conflict(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_profile_patch_keeps_absent_fields() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let id = create_account(&repos, "ada@example.com", "Ada").await;

    let patch = ProfilePatch {
        phone: Some("+441234567".to_string()),
        ..Default::default()
    };
    assert!(repos.profiles.update(id, &patch).await.unwrap());

    let profile = repos.profiles.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(profile.fullname, "Ada");
    assert_eq!(profile.phone.as_deref(), Some("+441234567"));

    assert!(!repos.profiles.update(AccountId::new(9999), &patch).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_like_upsert_is_idempotent() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let author = create_account(&repos, "a@example.com", "Author").await;
    let fan = create_account(&repos, "f@example.com", "Fan").await;
    let post = create_post(&repos, author, &["1.jpg", "2.png", "3.jpeg"]).await;

    repos.posts.like(fan, post).await.unwrap();
    repos.posts.like(fan, post).await.unwrap();

    let detail = repos.posts.find_detail(post, 5).await.unwrap().unwrap();
    assert_eq!(detail.likes, 1);
    assert_eq!(detail.images, vec!["1.jpg", "2.png", "3.jpeg"]);

    assert!(repos.posts.unlike(fan, post).await.unwrap());
    assert_eq!(repos.posts.find_detail(post, 5).await.unwrap().unwrap().likes, 0);
    assert!(repos.notifications.unread_likes(author).await.unwrap().is_empty());

    repos.posts.like(fan, post).await.unwrap();
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post.into_inner())
        .fetch_one(db.pool().inner())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_like_on_missing_post_is_not_found() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let fan = create_account(&repos, "f@example.com", "Fan").await;

    let result = repos.posts.like(fan, PostId::new(424242)).await;
    assert!(matches!(result, Err(MurmurError::NotFound { .. })));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unread_notification_sources() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let owner = create_account(&repos, "o@example.com", "Owner").await;
    let grace = create_account(&repos, "g@example.com", "Grace").await;
    let post = create_post(&repos, owner, &[]).await;

    repos.follows.follow(grace, owner).await.unwrap();
    repos.posts.like(grace, post).await.unwrap();
    repos.posts.add_comment(grace, post, "lovely").await.unwrap();

    let follows = repos.notifications.unread_follows(owner).await.unwrap();
    let likes = repos.notifications.unread_likes(owner).await.unwrap();
    let comments = repos.notifications.unread_comments(owner).await.unwrap();

    assert_eq!(follows.len(), 1);
    assert_eq!(follows[0].kind, NotificationKind::Follow);
    assert_eq!(follows[0].post_id, None);
    assert_eq!(likes[0].post_id, Some(post));
    assert_eq!(comments[0].comment.as_deref(), Some("lovely"));
    assert_eq!(comments[0].actor_fullname, "Grace");

    repos.posts.like(owner, post).await.unwrap();
    repos.posts.add_comment(owner, post, "thanks").await.unwrap();
    assert_eq!(repos.notifications.unread_likes(owner).await.unwrap().len(), 2);
    let comments = repos.notifications.unread_comments(owner).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert!(comments.iter().any(|c| c.actor_id == owner));

    assert!(repos.follows.unfollow(grace, owner).await.unwrap());
    assert!(repos.notifications.unread_follows(owner).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_feed_and_comment_ordering() {
    let db = TestDatabase::new().await;
    let repos = repos(&db);
    let author = create_account(&repos, "a@example.com", "Author").await;
    let viewer = create_account(&repos, "v@example.com", "Viewer").await;
    let post = create_post(&repos, author, &["x.jpg"]).await;

    assert!(repos.posts.feed_for(viewer).await.unwrap().is_empty());
    repos.follows.follow(viewer, author).await.unwrap();

    for text in ["one", "two", "three", "four", "five", "six"] {
        repos.posts.add_comment(viewer, post, text).await.unwrap();
    }

    let feed = repos.posts.feed_for(viewer).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].comment_count, 6);
    assert_eq!(feed[0].like_count, 0);

    let detail = repos.posts.find_detail(post, 5).await.unwrap().unwrap();
    assert_eq!(detail.comments.len(), 5);
    assert_eq!(detail.comments[0].comment, "six");

    let all = repos.posts.comments_for(post).await.unwrap();
    assert_eq!(all.first().map(|c| c.comment.as_str()), Some("one"));

    let following = repos.follows.following(viewer).await.unwrap();
    assert_eq!(following[0].fullname, "Author");
}
