//! Session token issuing and validation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use carlot_domain::user::UserRole;

/// Default session-token lifetime in seconds (5 minutes).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 300;

/// JWT claims carried by a session token.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID, decimal string |
/// | `role` | custom | role wire value (`"user"` / `"admin"`) |
/// | `exp` | `exp` | expiration, seconds since UNIX epoch |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
}

/// Errors returned by [`TokenService`].
///
/// `InvalidSignature`, `Expired` and `Malformed` are all "invalid token" to
/// callers; the split only matters for logs.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("signing secret must not be empty")]
    EmptySecret,
    #[error("token lifetime puts expiry out of range")]
    ExpiryOutOfRange,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and validates HMAC-signed session tokens.
///
/// Holds the process-wide signing secret. Read-only after construction, so a
/// single instance is shared across request tasks behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Build a token service. An empty secret is rejected.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: i32, role: UserRole) -> Result<String, AuthError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        user_id: i32,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?;
        let claims = SessionClaims {
            sub: user_id.to_string(),
            role: role.as_str().to_owned(),
            exp: exp.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(AuthError::Signing)
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate signature and expiry against `now`.
    ///
    /// Zero leeway: a token is already rejected at its `exp` instant.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &validation()).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm
                | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
                | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(AuthError::Expired);
        }
        Ok(data.claims)
    }
}

/// HMAC family only; `exp` is checked by [`TokenService::validate_at`] so the
/// boundary and the clock stay under our control.
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}
