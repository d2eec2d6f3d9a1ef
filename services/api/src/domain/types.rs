use chrono::{DateTime, Utc};

use carlot_domain::user::UserRole;

/// Login identity as the auth flow sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i32,
    pub email: String,
    pub role: UserRole,
}

/// One-time login code, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCode {
    pub user_id: i32,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Persisted one-time login code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    pub id: i32,
    pub user_id: i32,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// A code is usable strictly before `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Number of digits in a login code.
pub const AUTHCODE_LEN: usize = 6;

/// Default login code time-to-live in seconds (15 minutes).
pub const DEFAULT_AUTHCODE_TTL_SECS: i64 = 900;
