/// Transfer endpoint
///
/// Accepts a transfer request and echoes it back. No balance changes.
use crate::{
    account::TransferRequest,
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{body::Bytes, routing::get, Json, Router};

/// Build transfer routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/transfer", get(transfer))
}

/// GET /transfer
async fn transfer(body: Bytes) -> ApiResult<Json<TransferRequest>> {
    let req: TransferRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("transfer: failed to parse body: {}", e);
        ApiError::Validation("failed to parse".to_string())
    })?;

    Ok(Json(req))
}
