//! PostgreSQL account repository.

use crate::{traits::AccountRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use murmur_core::{Account, AccountId, Email, MurmurResult, NewAccount};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL account repository.
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgAccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: AccountId::new(row.id),
            email: Email::from_trusted(row.email),
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: &NewAccount) -> MurmurResult<Account> {
        debug!("Creating account for {}", account.email);

        let mut tx = self.pool.inner().begin().await?;

        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO profiles (id, fullname) VALUES ($1, $2)")
            .bind(row.id)
            .bind(&account.fullname)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn find_by_email(&self, email: &Email) -> MurmurResult<Option<Account>> {
        debug!("Finding account by email: {}", email);

        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Account::from))
    }
}
