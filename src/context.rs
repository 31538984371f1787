/// Application context and dependency injection
use crate::{
    config::{ServerConfig, StorageConfig},
    db,
    error::ApiResult,
    storage::{AccountStore, PostgresStore, SqliteStore},
    token::TokenAuthority,
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenAuthority>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        config.validate()?;

        let store: Arc<dyn AccountStore> = match &config.storage {
            StorageConfig::Sqlite { account_db } => {
                tracing::info!("Using SQLite account store at {:?}", account_db);
                let pool = db::create_pool(account_db, db::DatabaseOptions::default()).await?;
                db::run_migrations(&pool).await?;
                db::test_connection(&pool).await?;
                Arc::new(SqliteStore::new(pool))
            }
            StorageConfig::Memory => {
                tracing::warn!("Using in-memory account store, data is lost on exit");
                let pool = db::create_memory_pool().await?;
                db::run_migrations(&pool).await?;
                Arc::new(SqliteStore::new(pool))
            }
            StorageConfig::Postgres(pg) => {
                let pool = db::postgres::create_pool(pg).await?;
                db::postgres::run_migrations(&pool).await?;
                Arc::new(PostgresStore::new(pool))
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// Assemble a context around an existing store
    pub fn with_store(config: ServerConfig, store: Arc<dyn AccountStore>) -> Self {
        let tokens = Arc::new(TokenAuthority::new(&config.authentication.jwt_secret));

        Self {
            config: Arc::new(config),
            store,
            tokens,
        }
    }
}
