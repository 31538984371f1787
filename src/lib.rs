//! Teller - bank account HTTP API
//!
//! Accounts are created, listed, fetched and deleted over HTTP. Each account is
//! issued a signed token bound to its account number; protected routes only
//! run when the presented token matches the account named in the path.

pub mod account;
pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod server;
pub mod storage;
pub mod token;

pub use account::Account;
pub use config::ServerConfig;
pub use context::AppContext;
pub use error::{ApiError, ApiResult};
pub use storage::AccountStore;
pub use token::{AccountClaims, TokenAuthority, TokenError, TOKEN_HEADER};
