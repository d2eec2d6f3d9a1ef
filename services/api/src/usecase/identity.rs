use carlot_domain::user::UserRole;

use crate::domain::repository::IdentityRepository;
use crate::domain::types::Identity;
use crate::error::ApiError;

/// Every identity with its role, oldest first.
pub struct ListUsersUseCase<I: IdentityRepository> {
    pub identities: I,
}

impl<I: IdentityRepository> ListUsersUseCase<I> {
    pub async fn execute(&self) -> Result<Vec<Identity>, ApiError> {
        self.identities.list().await
    }
}

/// Grant the admin role to an existing identity.
pub struct PromoteAdminUseCase<I: IdentityRepository> {
    pub identities: I,
}

impl<I: IdentityRepository> PromoteAdminUseCase<I> {
    pub async fn execute(&self, email: &str) -> Result<(), ApiError> {
        if self.identities.set_role(email, UserRole::Admin).await? {
            Ok(())
        } else {
            Err(ApiError::UserNotFound)
        }
    }
}
