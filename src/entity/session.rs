use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single issued access token. Created at signin, mutated exactly once
/// at signout to set `logout_at`, never deleted (audit trail).
#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub access_token: String,
    pub login_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub logout_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A session is active while it has not been signed out. Expiry is a
    /// separate time comparison made by whoever consumes the session.
    pub fn is_ended(&self) -> bool {
        self.logout_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
