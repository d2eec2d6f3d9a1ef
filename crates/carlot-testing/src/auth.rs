//! Session fixtures for tests.
//!
//! `MockSession` mints real signed tokens with [`TEST_JWT_SECRET`], so tests
//! exercise the same middleware path as production requests.

use std::sync::Arc;

use chrono::Duration;
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};

use carlot_auth_types::principal::{Caller, Principal};
use carlot_auth_types::token::{DEFAULT_SESSION_TTL_SECS, TokenService};
use carlot_domain::user::UserRole;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Token service signing with [`TEST_JWT_SECRET`] and the default session TTL.
pub fn test_token_service() -> Arc<TokenService> {
    Arc::new(
        TokenService::new(TEST_JWT_SECRET, Duration::seconds(DEFAULT_SESSION_TTL_SECS))
            .expect("test secret is non-empty"),
    )
}

/// Configurable identity used to build callers and bearer headers.
pub struct MockSession {
    pub user_id: i32,
    pub role: UserRole,
}

impl MockSession {
    pub fn new(user_id: i32, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn admin() -> Self {
        Self::new(1, UserRole::Admin)
    }

    pub fn user() -> Self {
        Self::new(2, UserRole::User)
    }

    /// Caller as the middleware would have produced it.
    pub fn caller(&self) -> Caller {
        Caller::authenticated(Principal {
            user_id: self.user_id,
            role: self.role.as_str().to_owned(),
        })
    }

    pub fn token(&self, tokens: &TokenService) -> String {
        tokens
            .issue(self.user_id, self.role)
            .expect("signing with test secret")
    }

    /// `Authorization: Bearer <token>` headers.
    pub fn headers(&self, tokens: &TokenService) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token(tokens))).unwrap(),
        );
        map
    }
}
