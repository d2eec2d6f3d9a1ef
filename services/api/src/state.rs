use std::sync::Arc;

use axum::extract::FromRef;
use chrono::Duration;
use sea_orm::DatabaseConnection;

use carlot_auth_types::token::TokenService;

use crate::infra::db::{DbCarRepository, DbCodeRepository, DbIdentityRepository};
use crate::infra::mailer::Mailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: Arc<TokenService>,
    pub mailer: Mailer,
    /// Lifetime of a freshly issued login code.
    pub code_ttl: Duration,
}

impl AppState {
    pub fn identity_repo(&self) -> DbIdentityRepository {
        DbIdentityRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_repo(&self) -> DbCodeRepository {
        DbCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn car_repo(&self) -> DbCarRepository {
        DbCarRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
