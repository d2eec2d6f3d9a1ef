use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngExt;
use tracing::{info, warn};

use carlot_auth_types::token::TokenService;

use crate::domain::repository::{CodeNotifier, CodeRepository, IdentityRepository};
use crate::domain::types::{AUTHCODE_LEN, NewCode};
use crate::error::ApiError;

/// Uniform 6-digit code, zero-padded (`000000`..=`999999`).
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:0width$}", width = AUTHCODE_LEN)
}

// ── RequestLogin ─────────────────────────────────────────────────────────────

pub struct RequestLoginInput {
    pub email: String,
}

pub struct RequestLoginUseCase<I, C, N>
where
    I: IdentityRepository,
    C: CodeRepository,
    N: CodeNotifier,
{
    pub identities: I,
    pub codes: C,
    pub notifier: N,
    pub code_ttl: Duration,
}

impl<I, C, N> RequestLoginUseCase<I, C, N>
where
    I: IdentityRepository,
    C: CodeRepository,
    N: CodeNotifier,
{
    pub async fn execute(&self, input: RequestLoginInput) -> Result<(), ApiError> {
        // 1. Ensure the identity exists; role is never touched here
        let user_id = self.identities.upsert_by_email(&input.email).await?;

        // 2. Persist a fresh code; earlier codes stay until a successful verify
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.code_ttl)
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("code ttl puts expiry out of range")))?;
        let code = NewCode {
            user_id,
            code: generate_code(),
            expires_at,
            created_at: now,
        };
        self.codes.insert(&code).await?;
        info!(user_id, "login code issued");

        // 3. Deliver; the stored code is kept even if this fails
        self.notifier.send_code(&input.email, &code.code).await
    }
}

// ── VerifyLogin ──────────────────────────────────────────────────────────────

pub struct VerifyLoginInput {
    pub email: String,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyLoginOutput {
    pub user_id: i32,
    pub token: String,
}

pub struct VerifyLoginUseCase<I: IdentityRepository, C: CodeRepository> {
    pub identities: I,
    pub codes: C,
    pub tokens: Arc<TokenService>,
}

impl<I: IdentityRepository, C: CodeRepository> VerifyLoginUseCase<I, C> {
    pub async fn execute(&self, input: VerifyLoginInput) -> Result<VerifyLoginOutput, ApiError> {
        let identity = self
            .identities
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        // Only the newest code counts; an older one with the same digits does not.
        let latest = self
            .codes
            .find_latest(identity.id)
            .await?
            .filter(|c| c.code == input.code)
            .ok_or(ApiError::InvalidCode)?;

        if latest.is_expired_at(Utc::now()) {
            return Err(ApiError::ExpiredCode);
        }

        let token = self.tokens.issue(identity.id, identity.role)?;

        // The session is granted at this point; cleanup failure is only logged.
        if let Err(e) = self.codes.delete_for_user(identity.id).await {
            warn!(user_id = identity.id, error = %e, "failed to delete used login codes");
        }
        info!(user_id = identity.id, role = %identity.role, "login verified");

        Ok(VerifyLoginOutput {
            user_id: identity.id,
            token,
        })
    }
}
