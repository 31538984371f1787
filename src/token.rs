/// Account-bound token issuance and verification
///
/// Tokens are HS256 JWTs carrying the account number and an expiry. They are
/// never stored: every protected request re-verifies the presented string
/// against the configured secret.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request header carrying the token on protected routes
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Lifetime of an issued token
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Token failure kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("unexpected signing method: {0}")]
    UnexpectedSigningMethod(String),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnexpectedSigningMethod(e.to_string())
            }
            _ => TokenError::Malformed(e.to_string()),
        }
    }
}

/// Claims embedded in every account token
///
/// `account_number` is `i32` on both the issuing and the verifying side, the
/// same width as `Account::number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountClaims {
    pub account_number: i32,
    pub exp: i64,
}

/// Issues and verifies account tokens with a shared HMAC secret
#[derive(Clone)]
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenAuthority {
    /// Create an authority for the given secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for `account_number`, valid for 24 hours from now
    pub fn issue(&self, account_number: i32) -> Result<String, TokenError> {
        self.issue_at(account_number, Utc::now())
    }

    /// Issue a token as if it had been minted at `issued_at`
    pub fn issue_at(
        &self,
        account_number: i32,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = AccountClaims {
            account_number,
            exp: (issued_at + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return its claims
    ///
    /// This performs:
    /// 1. Header parsing
    /// 2. Algorithm family check (HMAC only)
    /// 3. Signature verification
    /// 4. Expiration checking with no leeway
    /// 5. Claim shape checking
    pub fn validate(&self, token: &str) -> Result<AccountClaims, TokenError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!("token header rejected: {}", e);
            // Algorithms jsonwebtoken has no variant for, such as "none"
            match raw_header_alg(token) {
                Some(alg) if !matches!(alg.as_str(), "HS256" | "HS384" | "HS512") => {
                    TokenError::UnexpectedSigningMethod(alg)
                }
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        if !matches!(
            header.alg,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::UnexpectedSigningMethod(format!(
                "{:?}",
                header.alg
            )));
        }

        let mut validation = Validation::new(header.alg);
        validation.leeway = 0;

        decode::<AccountClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}

/// `alg` from the first token segment, read without typed header parsing
fn raw_header_alg(token: &str) -> Option<String> {
    let segment = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    let header: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    header.get("alg")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    #[test]
    fn test_issue_and_validate() {
        let authority = TokenAuthority::new(SECRET);
        let token = authority.issue(1_234_567).unwrap();

        let claims = authority.validate(&token).unwrap();
        assert_eq!(claims.account_number, 1_234_567);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_claim_width_matches_account_number() {
        let authority = TokenAuthority::new(SECRET);

        for number in [0, 1, 42, i32::MAX - 1, i32::MAX] {
            let token = authority.issue(number).unwrap();
            let claims = authority.validate(&token).unwrap();
            assert_eq!(claims.account_number, number);
        }
    }

    #[test]
    fn test_expiry_is_24_hours() {
        let authority = TokenAuthority::new(SECRET);
        let issued_at = Utc::now();
        let token = authority.issue_at(7, issued_at).unwrap();

        let claims = authority.validate(&token).unwrap();
        assert_eq!(claims.exp, issued_at.timestamp() + 24 * 3600);
    }

    #[test]
    fn test_still_valid_just_before_expiry() {
        let authority = TokenAuthority::new(SECRET);
        let issued_at = Utc::now() - Duration::hours(23) - Duration::minutes(59);
        let token = authority.issue_at(7, issued_at).unwrap();

        assert!(authority.validate(&token).is_ok());
    }

    #[test]
    fn test_expired_token() {
        let authority = TokenAuthority::new(SECRET);
        let token = authority
            .issue_at(7, Utc::now() - Duration::hours(25))
            .unwrap();

        assert_eq!(authority.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_key() {
        let issuer = TokenAuthority::new("another-secret-that-is-also-long-enough");
        let verifier = TokenAuthority::new(SECRET);
        let token = issuer.issue(7).unwrap();

        assert_eq!(verifier.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_non_hmac_algorithm_rejected() {
        let authority = TokenAuthority::new(SECRET);
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(
            json!({ "accountNumber": 7, "exp": Utc::now().timestamp() + 3600 }).to_string(),
        );
        let forged = format!("{}.{}.{}", header, claims, URL_SAFE_NO_PAD.encode("sig"));

        assert!(matches!(
            authority.validate(&forged),
            Err(TokenError::UnexpectedSigningMethod(_))
        ));
    }

    #[test]
    fn test_alg_none_rejected_as_signing_method() {
        let authority = TokenAuthority::new(SECRET);
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(
            json!({ "accountNumber": 7, "exp": Utc::now().timestamp() + 3600 }).to_string(),
        );
        let unsigned = format!("{}.{}.", header, claims);

        assert_eq!(
            authority.validate(&unsigned),
            Err(TokenError::UnexpectedSigningMethod("none".to_string()))
        );
    }

    #[test]
    fn test_header_without_alg_is_malformed() {
        let authority = TokenAuthority::new(SECRET);
        let header = URL_SAFE_NO_PAD.encode(r#"{"typ":"JWT"}"#);
        let token = format!("{}.e30.c2ln", header);

        assert!(matches!(
            authority.validate(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_malformed_token() {
        let authority = TokenAuthority::new(SECRET);

        assert!(matches!(
            authority.validate("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(authority.validate(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_claim_outside_i32_rejected() {
        let authority = TokenAuthority::new(SECRET);
        let claims = json!({
            "accountNumber": i64::from(i32::MAX) + 1,
            "exp": Utc::now().timestamp() + 3600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            authority.validate(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_fractional_claim_rejected() {
        let authority = TokenAuthority::new(SECRET);
        let claims = json!({
            "accountNumber": 7.5,
            "exp": Utc::now().timestamp() + 3600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            authority.validate(&token),
            Err(TokenError::Malformed(_))
        ));
    }
}
