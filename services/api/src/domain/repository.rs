#![allow(async_fn_in_trait)]

use carlot_domain::car::{Car, CarDraft};
use carlot_domain::user::UserRole;

use crate::domain::types::{Identity, NewCode, OneTimeCode};
use crate::error::ApiError;

/// Identity records, keyed by email.
pub trait IdentityRepository: Send + Sync {
    /// Insert the email with the default role, or leave an existing row's role
    /// untouched. Returns the identity id either way.
    async fn upsert_by_email(&self, email: &str) -> Result<i32, ApiError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, ApiError>;

    /// All identities ordered by id.
    async fn list(&self) -> Result<Vec<Identity>, ApiError>;

    /// Set the role of the identity with this email. Returns `false` if no
    /// such identity exists.
    async fn set_role(&self, email: &str, role: UserRole) -> Result<bool, ApiError>;
}

/// One-time login codes.
pub trait CodeRepository: Send + Sync {
    async fn insert(&self, code: &NewCode) -> Result<(), ApiError>;

    /// Most recently issued code for the user (by `created_at`, then id).
    async fn find_latest(&self, user_id: i32) -> Result<Option<OneTimeCode>, ApiError>;

    /// Delete every code of the user. Returns the number of rows removed.
    async fn delete_for_user(&self, user_id: i32) -> Result<u64, ApiError>;
}

/// Delivery of login codes to the user's mailbox.
pub trait CodeNotifier: Send + Sync {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), ApiError>;
}

/// Car inventory.
pub trait CarRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Car>, ApiError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Car>, ApiError>;

    async fn create(&self, draft: &CarDraft) -> Result<Car, ApiError>;

    /// Overwrite all fields. Returns `None` if the car does not exist.
    async fn update(&self, car: &Car) -> Result<Option<Car>, ApiError>;

    /// Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}
