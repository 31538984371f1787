/// Unified error types for Teller
use crate::token::TokenError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store unreachable or write rejected
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Schema setup failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// Token could not be issued or verified
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Token is valid but bound to a different account
    #[error("Token bound to account number {token_number}, account {account_id} has number {account_number}")]
    SubjectMismatch {
        account_id: i64,
        account_number: i32,
        token_number: i32,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error body returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ApiError {
    /// HTTP status this error is rendered with
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Token(TokenError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Token(_) | ApiError::SubjectMismatch { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Persistence(_)
            | ApiError::Migration(_)
            | ApiError::Config(_)
            | ApiError::Internal(_)
            | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match &self {
            ApiError::Validation(msg) => ("InvalidRequest", msg.clone()),
            ApiError::NotFound(msg) => ("NotFound", msg.clone()),
            ApiError::Token(TokenError::Signing(_)) => {
                ("InternalServerError", "Internal server error".to_string())
            }
            ApiError::Token(_) | ApiError::SubjectMismatch { .. } => {
                ("AuthenticationRequired", "Failed to authenticate".to_string())
            }
            // Don't leak driver or filesystem details
            _ => ("InternalServerError", "Internal server error".to_string()),
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::warn!("request rejected ({}): {}", status.as_u16(), self);
        }

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for service operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("account 1".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Persistence(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Token(TokenError::Expired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Token(TokenError::Signing("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::SubjectMismatch {
                account_id: 1,
                account_number: 2,
                token_number: 3,
            }
            .status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_persistence_error_does_not_leak() {
        let err = ApiError::Persistence(sqlx::Error::Protocol(
            "connection refused by 10.0.0.5".to_string(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "InternalServerError");
        assert_eq!(body.message, "Internal server error");
    }
}
