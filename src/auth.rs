/// Account-bound authorization guard
///
/// A protected request must name an account id in its path and present a token
/// whose embedded account number equals that account's number. The checks run
/// in a fixed order and the first failure ends the request.
use crate::{
    account::Account,
    error::{ApiError, ErrorResponse},
    storage::AccountStore,
    token::{TokenAuthority, TokenError},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Why the guard refused a request
///
/// The wire status stays coarse (400 or 401); the variant keeps the cause for
/// logs and tests.
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("account id is missing from the request path")]
    MissingAccountId,

    #[error("account id {0:?} is not a valid number")]
    InvalidAccountId(String),

    #[error("failed to load account {id}: {source}")]
    AccountLookup {
        id: i64,
        #[source]
        source: ApiError,
    },

    #[error("token header is missing")]
    MissingToken,

    #[error("token rejected: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    SubjectMismatch(ApiError),
}

impl GuardError {
    /// HTTP status this rejection is rendered with
    pub fn status(&self) -> StatusCode {
        match self {
            GuardError::MissingAccountId
            | GuardError::InvalidAccountId(_)
            | GuardError::AccountLookup { .. } => StatusCode::BAD_REQUEST,
            GuardError::MissingToken
            | GuardError::Token(_)
            | GuardError::SubjectMismatch(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        tracing::warn!("authorization guard rejected request: {}", self);

        let status = self.status();
        let (error_code, message) = match &self {
            GuardError::MissingAccountId => ("InvalidRequest", "id is missing"),
            // Lookup failures share the malformed-id answer
            GuardError::InvalidAccountId(_) | GuardError::AccountLookup { .. } => {
                ("InvalidRequest", "id is not a valid number")
            }
            _ => ("AuthenticationRequired", "Failed to authenticate"),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message: message.to_string(),
        });

        (status, body).into_response()
    }
}

/// Run the guard's checks for one request
///
/// Returns the loaded account once the path id resolves, the token verifies
/// and the token's account number equals the account's number.
pub async fn authorize(
    store: &dyn AccountStore,
    tokens: &TokenAuthority,
    raw_id: Option<&str>,
    token: Option<&str>,
) -> Result<Account, GuardError> {
    let raw_id = raw_id.ok_or(GuardError::MissingAccountId)?;
    let id: i64 = raw_id
        .parse()
        .map_err(|_| GuardError::InvalidAccountId(raw_id.to_string()))?;

    let account = store
        .get_account_by_id(id)
        .await
        .map_err(|source| GuardError::AccountLookup { id, source })?;

    let token = token.ok_or(GuardError::MissingToken)?;
    let claims = tokens.validate(token)?;

    if claims.account_number != account.number {
        return Err(GuardError::SubjectMismatch(ApiError::SubjectMismatch {
            account_id: account.id,
            account_number: account.number,
            token_number: claims.account_number,
        }));
    }

    tracing::debug!("authorized access to account {}", account.id);
    Ok(account)
}
