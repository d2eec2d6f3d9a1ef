//! Bearer-token middleware.
//!
//! Gates every request on the shape and validity of its `Authorization`
//! header. It never looks at the role; that is the job of
//! [`Caller::require_role`](crate::principal::Caller::require_role) inside
//! each protected operation.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::AUTHORIZATION;
use http::{HeaderValue, StatusCode};

use crate::principal::Principal;
use crate::token::TokenService;

/// Why a request was turned away before reaching its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BearerRejection {
    #[error("invalid authorization header format")]
    MalformedHeader,
    #[error("invalid or expired token")]
    InvalidToken,
}

impl BearerRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedHeader => "MALFORMED_AUTHORIZATION",
            Self::InvalidToken => "INVALID_TOKEN",
        }
    }
}

impl IntoResponse for BearerRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Resolve an `Authorization` header value.
///
/// - absent or empty: `Ok(None)`, the request stays anonymous
/// - not exactly two space-separated parts: `MalformedHeader`
/// - token fails validation, or `sub` is not numeric: `InvalidToken`
///
/// The scheme part is not inspected; `Token abc` goes on to validation.
pub fn validate_bearer(
    header: Option<&HeaderValue>,
    tokens: &TokenService,
) -> Result<Option<Principal>, BearerRejection> {
    let Some(value) = header else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| BearerRejection::MalformedHeader)?;
    if value.is_empty() {
        return Ok(None);
    }

    let mut parts = value.split(' ');
    let (Some(_scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(BearerRejection::MalformedHeader);
    };

    let claims = tokens.validate(token).map_err(|e| {
        tracing::debug!(error = %e, "session token rejected");
        BearerRejection::InvalidToken
    })?;
    let user_id = claims
        .sub
        .parse::<i32>()
        .map_err(|_| BearerRejection::InvalidToken)?;

    Ok(Some(Principal {
        user_id,
        role: claims.role,
    }))
}

/// Axum middleware: apply with
/// `middleware::from_fn_with_state(tokens, authenticate)`.
///
/// On success the [`Principal`] (if any) is stored in request extensions for
/// the [`Caller`](crate::principal::Caller) extractor.
pub async fn authenticate(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    match validate_bearer(request.headers().get(AUTHORIZATION), &tokens) {
        Ok(Some(principal)) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(rejection) => rejection.into_response(),
    }
}
