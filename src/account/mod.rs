/// Account entity and request bodies
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A bank account as persisted by an `AccountStore`
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Assigned by the store; `0` until persisted
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Authorization subject embedded in tokens
    pub number: i32,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create an unsaved account with a random number and zero balance
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            number: rand::thread_rng().gen_range(0..=i32::MAX),
            balance: 0,
            created_at: now_micros(),
        }
    }
}

/// Current time rounded up to whole microseconds
///
/// Microsecond precision survives both SQLite and PostgreSQL; rounding up keeps
/// the value no earlier than the moment of the call.
fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    let truncated = now.trunc_subsecs(6);
    if truncated < now {
        truncated + Duration::microseconds(1)
    } else {
        truncated
    }
}

/// Body of `POST /account`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
}

/// Body of `GET /transfer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_account: i32,
    pub amount: i64,
}
