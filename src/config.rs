/// Configuration management for Teller
use crate::{
    db::postgres::PostgresConfig,
    error::{ApiError, ApiResult},
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset or does not parse
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub authentication: AuthConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StorageConfig {
    Sqlite { account_db: PathBuf },
    Memory,
    Postgres(PostgresConfig),
}

/// Authentication configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Filter for the tracing subscriber
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|e| {
            eprintln!("Ignoring invalid log filter {:?}: {}", self.level, e);
            EnvFilter::new(DEFAULT_LOG_FILTER)
        })
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hostname = var("TELLER_HOSTNAME").unwrap_or_else(|| "localhost".to_string());
        let port = var("TELLER_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ApiError::Config("Invalid port number".to_string()))?;

        let storage = match var("TELLER_DATABASE_URL") {
            Some(url) if PostgresConfig::is_postgres_url(&url) => {
                let defaults = PostgresConfig::default();
                StorageConfig::Postgres(PostgresConfig {
                    database_url: url,
                    max_connections: var("TELLER_POSTGRES_MAX_CONNECTIONS")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(defaults.max_connections),
                    connect_timeout: var("TELLER_POSTGRES_CONNECT_TIMEOUT")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(defaults.connect_timeout),
                })
            }
            Some(url) => {
                return Err(ApiError::Config(format!(
                    "Unsupported database URL scheme: {}",
                    url.split("://").next().unwrap_or_default()
                )));
            }
            None => match var("TELLER_ACCOUNT_DB_LOCATION").as_deref() {
                Some(":memory:") => StorageConfig::Memory,
                Some(path) => StorageConfig::Sqlite {
                    account_db: PathBuf::from(path),
                },
                None => StorageConfig::Sqlite {
                    account_db: PathBuf::from("./data/accounts.sqlite"),
                },
            },
        };

        let jwt_secret = var("TELLER_JWT_SECRET")
            .ok_or_else(|| ApiError::Config("JWT secret required".to_string()))?;

        let level = var("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let format = match var("TELLER_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ApiError::Config(format!("Unknown log format: {}", other)));
            }
        };

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            storage,
            authentication: AuthConfig { jwt_secret },
            logging: LoggingConfig { level, format },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Config("Hostname cannot be empty".to_string()));
        }

        if self.authentication.jwt_secret.len() < 32 {
            return Err(ApiError::Config(
                "JWT secret must be at least 32 characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.hostname, self.service.port)
    }
}
