//! PostgreSQL profile repository.

use crate::{traits::ProfileRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use murmur_core::{AccountId, MurmurResult, Profile, ProfilePatch};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL profile repository.
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgProfileRepository {
    /// Creates a new profile repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: i64,
    fullname: String,
    phone: Option<String>,
    img: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: AccountId::new(row.id),
            fullname: row.fullname,
            phone: row.phone,
            img: row.img,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_id(&self, id: AccountId) -> MurmurResult<Option<Profile>> {
        debug!("Finding profile by id: {}", id);

        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, fullname, phone, img, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Profile::from))
    }

    async fn update(&self, id: AccountId, patch: &ProfilePatch) -> MurmurResult<bool> {
        debug!("Updating profile: {}", id);

        // NULL parameters keep the current column value.
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET fullname   = COALESCE($1, fullname),
                phone      = COALESCE($2, phone),
                img        = COALESCE($3, img),
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(patch.fullname.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.img.as_deref())
        .bind(id.into_inner())
        .execute(self.pool.inner())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: AccountId) -> MurmurResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1)")
            .bind(id.into_inner())
            .fetch_one(self.pool.inner())
            .await?;

        Ok(exists)
    }
}
