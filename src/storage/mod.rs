/// Account persistence
///
/// Handlers and the authorization guard only see the `AccountStore` trait.
/// Implementations exist for SQLite (file or in-memory) and PostgreSQL.

pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use crate::{account::Account, error::ApiResult};
use async_trait::async_trait;

/// Account storage backend trait
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return it with its assigned id
    async fn create_account(&self, account: Account) -> ApiResult<Account>;

    /// Fetch one account, `ApiError::NotFound` when no row matches
    async fn get_account_by_id(&self, id: i64) -> ApiResult<Account>;

    /// Fetch every account; no ordering is promised
    async fn get_accounts(&self) -> ApiResult<Vec<Account>>;

    /// Delete an account; unknown ids are not an error
    async fn delete_account(&self, id: i64) -> ApiResult<()>;

    /// Declared but intentionally a no-op: stored state is never changed.
    async fn update_account(&self, account: &Account) -> ApiResult<()>;
}
