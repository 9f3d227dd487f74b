//! Claims carried in every session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity claims embedded in a session token.
///
/// `userid` and `expiresAt` are required; a token without them does not
/// decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject id of the user.
    #[serde(rename = "userid")]
    pub subject_id: Uuid,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Role label at issuance time.
    #[serde(default)]
    pub role: String,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch).
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
    /// Unique token id, so two tokens issued within the same second differ.
    #[serde(default)]
    pub jti: Uuid,
}

impl Claims {
    /// Expiry as a `DateTime<Utc>`.
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.expires_at, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// A token is expired once `now` is strictly past `expires_at`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }
}
