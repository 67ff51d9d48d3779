//! Claims carried by an admin access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims written into a freshly minted token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Username of the authenticated administrator.
    pub username: String,

    /// Unique id of this token, for log correlation.
    pub token_id: Uuid,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl AdminClaims {
    pub fn new(username: impl Into<String>, ttl: chrono::Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            username: username.into(),
            token_id: Uuid::new_v4(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }
}

/// Identity recovered from a token that passed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedAdmin {
    pub username: String,
    pub token_id: String,
    pub issued_at: Option<DateTime<Utc>>,
}
