/// Authorization middleware
use crate::{
    auth::{authorize, GuardError},
    context::AppContext,
    token::TOKEN_HEADER,
};
use axum::{
    extract::{rejection::PathRejection, Path, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;

/// Extract the account token from the custom token header
pub fn extract_account_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Require a token bound to the account named by the `id` path parameter
///
/// Must be installed with `route_layer` so the path parameters are resolved.
/// On success the loaded `Account` is added to the request extensions.
pub async fn require_account_token(
    State(ctx): State<AppContext>,
    path: Result<Path<HashMap<String, String>>, PathRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, GuardError> {
    tracing::debug!("authorization guard: {} {}", req.method(), req.uri().path());

    let params = path.map(|Path(params)| params).unwrap_or_default();
    let raw_id = params.get("id").map(String::as_str);
    // Owned so no borrow of the request is held across the store call
    let token = extract_account_token(req.headers()).map(str::to_owned);

    let account = authorize(ctx.store.as_ref(), &ctx.tokens, raw_id, token.as_deref()).await?;
    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_account_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_account_token(&headers), None);

        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(extract_account_token(&headers), Some("abc.def.ghi"));

        headers.insert(TOKEN_HEADER, HeaderValue::from_static("   "));
        assert_eq!(extract_account_token(&headers), None);
    }

    #[test]
    fn test_authorization_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_account_token(&headers), None);
    }
}
