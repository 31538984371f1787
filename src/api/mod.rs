/// API routes and handlers
pub mod account;
pub mod middleware;
pub mod transfer;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes(ctx: &AppContext) -> Router<AppContext> {
    Router::new()
        .merge(account::routes(ctx))
        .merge(transfer::routes())
}
