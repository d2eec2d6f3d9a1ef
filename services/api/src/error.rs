use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use carlot_auth_types::principal::AccessError;
use carlot_auth_types::token::AuthError;
use carlot_domain::car::CarValidationError;

/// API service error variants.
///
/// `Store` wraps every persistence failure; repositories convert with
/// `anyhow::Context` and `?`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing email")]
    MissingEmail,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid code")]
    InvalidCode,
    #[error("code expired")]
    ExpiredCode,
    #[error("invalid token")]
    InvalidToken,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden: admins only")]
    Forbidden,
    #[error("car not found")]
    CarNotFound,
    #[error("{0}")]
    InvalidCar(#[from] CarValidationError),
    #[error("missing data")]
    MissingData,
    #[error("failed to send email")]
    Delivery(#[source] anyhow::Error),
    #[error("database error")]
    Store(#[from] anyhow::Error),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingEmail => "MISSING_EMAIL",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidCode => "INVALID_CODE",
            Self::ExpiredCode => "EXPIRED_CODE",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::CarNotFound => "CAR_NOT_FOUND",
            Self::InvalidCar(_) => "INVALID_CAR",
            Self::MissingData => "MISSING_DATA",
            Self::Delivery(_) => "DELIVERY_ERROR",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Unauthorized => Self::Unauthorized,
            AccessError::Forbidden => Self::Forbidden,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidSignature | AuthError::Expired | AuthError::Malformed => {
                Self::InvalidToken
            }
            AuthError::EmptySecret | AuthError::ExpiryOutOfRange | AuthError::Signing(_) => {
                Self::Internal(e.into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingEmail | Self::InvalidCar(_) | Self::MissingData => {
                StatusCode::BAD_REQUEST
            }
            Self::UserNotFound | Self::CarNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCode | Self::ExpiredCode | Self::InvalidToken | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Delivery(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors and TraceLayer already records them.
        // 5xx need the source chain to be traceable.
        match &self {
            Self::Delivery(e) | Self::Store(e) | Self::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = self.kind(), "request failed");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
