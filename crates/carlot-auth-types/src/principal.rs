//! Authenticated caller identity and the role guard.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::request::Parts;

use carlot_domain::user::UserRole;

/// Identity decoded from a valid session token.
///
/// Inserted into request extensions by [`crate::bearer::authenticate`].
/// `role` is the raw claim value; the guard compares it against
/// [`UserRole::as_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub role: String,
}

/// Failures of [`Caller::require_role`], in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// No identity on the request.
    #[error("unauthorized")]
    Unauthorized,
    /// Identity present but the role does not match.
    #[error("forbidden")]
    Forbidden,
}

/// The request's caller: a [`Principal`] or anonymous.
///
/// Extracting never fails; anonymous requests get `Caller(None)`. Protected
/// operations take a `&Caller` and call [`Caller::require_role`] themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller(Option<Principal>);

impl Caller {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self(Some(principal))
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }

    /// Identity presence first, then exact role match.
    pub fn require_role(&self, role: UserRole) -> Result<&Principal, AccessError> {
        let principal = self.principal().ok_or(AccessError::Unauthorized)?;
        if principal.role != role.as_str() {
            return Err(AccessError::Forbidden);
        }
        Ok(principal)
    }
}

impl From<Option<Principal>> for Caller {
    fn from(principal: Option<Principal>) -> Self {
        Self(principal)
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    // Same shape as axum-core's declaration: read synchronously, return a
    // 'static future so no borrow of `parts` is captured.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let principal = parts.extensions.get::<Principal>().cloned();
        async move { Ok(Self(principal)) }
    }
}
