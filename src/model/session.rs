use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{User, WireUser};

/// A persisted authentication session: bearer token, the user it belongs to,
/// and an absolute expiry. Serialized field names match the record the
/// original web client kept in local storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "jwtToken")]
    pub token: String,
    pub user: WireUser,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, user: User, ttl: Duration) -> Self {
        Self {
            token,
            user: user.into(),
            expires_at: Utc::now() + ttl,
        }
    }

    /// A session is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
