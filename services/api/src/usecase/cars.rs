use carlot_auth_types::principal::Caller;
use carlot_domain::car::{Car, CarDraft, CarPatch, validate_car};
use carlot_domain::user::UserRole;

use crate::domain::repository::CarRepository;
use crate::error::ApiError;

// ── Reads (public) ───────────────────────────────────────────────────────────

pub struct ListCarsUseCase<R: CarRepository> {
    pub repo: R,
}

impl<R: CarRepository> ListCarsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Car>, ApiError> {
        self.repo.list().await
    }
}

pub struct GetCarUseCase<R: CarRepository> {
    pub repo: R,
}

impl<R: CarRepository> GetCarUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Car, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::CarNotFound)
    }
}

// ── Writes (admin only) ──────────────────────────────────────────────────────

pub struct CreateCarUseCase<R: CarRepository> {
    pub repo: R,
}

impl<R: CarRepository> CreateCarUseCase<R> {
    pub async fn execute(&self, caller: &Caller, draft: CarDraft) -> Result<Car, ApiError> {
        caller.require_role(UserRole::Admin)?;
        validate_car(draft.price, draft.year)?;
        self.repo.create(&draft).await
    }
}

pub struct UpdateCarUseCase<R: CarRepository> {
    pub repo: R,
}

impl<R: CarRepository> UpdateCarUseCase<R> {
    pub async fn execute(&self, caller: &Caller, id: i32, patch: CarPatch) -> Result<Car, ApiError> {
        caller.require_role(UserRole::Admin)?;
        if patch.is_empty() {
            return Err(ApiError::MissingData);
        }
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::CarNotFound)?;
        let updated = patch.apply(current);
        validate_car(updated.price, updated.year)?;
        self.repo
            .update(&updated)
            .await?
            .ok_or(ApiError::CarNotFound)
    }
}

pub struct DeleteCarUseCase<R: CarRepository> {
    pub repo: R,
}

impl<R: CarRepository> DeleteCarUseCase<R> {
    pub async fn execute(&self, caller: &Caller, id: i32) -> Result<(), ApiError> {
        caller.require_role(UserRole::Admin)?;
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(ApiError::CarNotFound)
        }
    }
}
