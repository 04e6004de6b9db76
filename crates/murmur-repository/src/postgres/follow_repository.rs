//! PostgreSQL follow-edge repository.

use crate::{traits::FollowRepository, DatabasePoolInterface};
use async_trait::async_trait;
use murmur_core::{AccountId, MurmurResult, ProfileSummary};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL follow-edge repository.
#[derive(Clone)]
pub struct PgFollowRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgFollowRepository {
    /// Creates a new follow repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: i64,
    fullname: String,
    img: Option<String>,
}

impl From<SummaryRow> for ProfileSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: AccountId::new(row.id),
            fullname: row.fullname,
            img: row.img,
        }
    }
}

#[async_trait]
impl FollowRepository for PgFollowRepository {
    async fn follow(&self, follower: AccountId, target: AccountId) -> MurmurResult<()> {
        debug!("Account {} follows {}", follower, target);

        // All SET expressions see the pre-update row.
        sqlx::query(
            r#"
            INSERT INTO followers (account_id, follower_id)
            VALUES ($1, $2)
            ON CONFLICT (account_id, follower_id) DO UPDATE
            SET read       = CASE WHEN followers.deleted_at IS NULL THEN followers.read ELSE FALSE END,
                created_at = CASE WHEN followers.deleted_at IS NULL THEN followers.created_at ELSE NOW() END,
                deleted_at = NULL
            "#,
        )
        .bind(target.into_inner())
        .bind(follower.into_inner())
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }

    async fn unfollow(&self, follower: AccountId, target: AccountId) -> MurmurResult<bool> {
        debug!("Account {} unfollows {}", follower, target);

        let result = sqlx::query(
            r#"
            UPDATE followers
            SET deleted_at = NOW()
            WHERE account_id = $1 AND follower_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(target.into_inner())
        .bind(follower.into_inner())
        .execute(self.pool.inner())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn followers(&self, id: AccountId) -> MurmurResult<Vec<ProfileSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT p.id, p.fullname, p.img
            FROM followers f
            JOIN profiles p ON p.id = f.follower_id
            WHERE f.account_id = $1 AND f.deleted_at IS NULL
            ORDER BY f.created_at DESC, f.id DESC
            "#,
        )
        .bind(id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(ProfileSummary::from).collect())
    }

    async fn following(&self, id: AccountId) -> MurmurResult<Vec<ProfileSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT p.id, p.fullname, p.img
            FROM followers f
            JOIN profiles p ON p.id = f.account_id
            WHERE f.follower_id = $1 AND f.deleted_at IS NULL
            ORDER BY f.created_at DESC, f.id DESC
            "#,
        )
        .bind(id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(ProfileSummary::from).collect())
    }
}
