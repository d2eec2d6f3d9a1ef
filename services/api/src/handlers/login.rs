use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use carlot_auth_types::principal::Caller;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::login::{
    RequestLoginInput, RequestLoginUseCase, VerifyLoginInput, VerifyLoginUseCase,
};

pub const LOGIN_SENT_MESSAGE: &str = "Verification code sent to email";

#[derive(Deserialize)]
pub struct RequestLoginRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn request_login(
    State(state): State<AppState>,
    Json(body): Json<RequestLoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if body.email.trim().is_empty() {
        return Err(ApiError::MissingEmail);
    }
    let usecase = RequestLoginUseCase {
        identities: state.identity_repo(),
        codes: state.code_repo(),
        notifier: state.mailer.clone(),
        code_ttl: state.code_ttl,
    };
    usecase
        .execute(RequestLoginInput { email: body.email })
        .await?;
    Ok(Json(MessageResponse {
        message: LOGIN_SENT_MESSAGE,
    }))
}

#[derive(Deserialize)]
pub struct VerifyLoginRequest {
    pub email: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn verify_login(
    State(state): State<AppState>,
    Json(body): Json<VerifyLoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let usecase = VerifyLoginUseCase {
        identities: state.identity_repo(),
        codes: state.code_repo(),
        tokens: state.tokens.clone(),
    };
    let output = usecase
        .execute(VerifyLoginInput {
            email: body.email,
            code: body.code,
        })
        .await?;
    Ok(Json(TokenResponse {
        token: output.token,
    }))
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionResponse {
    pub user_id: i32,
    pub role: String,
}

/// `GET /auth/session` — who the bearer token belongs to.
pub async fn session(caller: Caller) -> Result<Json<SessionResponse>, ApiError> {
    let principal = caller.principal().ok_or(ApiError::Unauthorized)?;
    Ok(Json(SessionResponse {
        user_id: principal.user_id,
        role: principal.role.clone(),
    }))
}
