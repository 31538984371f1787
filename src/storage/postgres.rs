/// PostgreSQL account store
use super::AccountStore;
use crate::{
    account::Account,
    error::{ApiError, ApiResult},
};
use async_trait::async_trait;
use sqlx::PgPool;

/// Account store over a PostgreSQL pool
#[derive(Clone)]
pub struct PostgresStore {
    db: PgPool,
}

impl PostgresStore {
    /// Wrap a pool whose schema has already been migrated
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn create_account(&self, account: Account) -> ApiResult<Account> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO account (first_name, last_name, number, balance, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(account.balance)
        .bind(account.created_at)
        .fetch_one(&self.db)
        .await?;

        Ok(Account { id, ..account })
    }

    async fn get_account_by_id(&self, id: i64) -> ApiResult<Account> {
        sqlx::query_as::<_, Account>(
            "SELECT id, first_name, last_name, number, balance, created_at
             FROM account WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("account {}", id)))
    }

    async fn get_accounts(&self) -> ApiResult<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            "SELECT id, first_name, last_name, number, balance, created_at
             FROM account ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(accounts)
    }

    async fn delete_account(&self, id: i64) -> ApiResult<()> {
        sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn update_account(&self, account: &Account) -> ApiResult<()> {
        tracing::debug!("update_account is a no-op (account {})", account.id);
        Ok(())
    }
}
