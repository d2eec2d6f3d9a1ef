use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, OnConflict},
};

use carlot_api_schema::{cars, users, verification_codes};
use carlot_domain::car::{Car, CarDraft};
use carlot_domain::user::UserRole;

use crate::domain::repository::{CarRepository, CodeRepository, IdentityRepository};
use crate::domain::types::{Identity, NewCode, OneTimeCode};
use crate::error::ApiError;

// ── Identity repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIdentityRepository {
    pub db: DatabaseConnection,
}

impl IdentityRepository for DbIdentityRepository {
    async fn upsert_by_email(&self, email: &str) -> Result<i32, ApiError> {
        let model = users::ActiveModel {
            id: NotSet,
            email: Set(email.to_owned()),
            role: Set(UserRole::default().as_str().to_owned()),
            created_at: Set(Utc::now()),
        };
        // DO UPDATE (not DO NOTHING) so RETURNING yields the existing row's id.
        let result = users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Email)
                    .update_column(users::Column::Email)
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .context("upsert user by email")?;
        Ok(result.last_insert_id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(identity_from_model).transpose()
    }

    async fn list(&self) -> Result<Vec<Identity>, ApiError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(identity_from_model).collect()
    }

    async fn set_role(&self, email: &str, role: UserRole) -> Result<bool, ApiError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Role, Expr::value(role.as_str()))
            .filter(users::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .context("set user role")?;
        Ok(result.rows_affected > 0)
    }
}

fn identity_from_model(model: users::Model) -> Result<Identity, ApiError> {
    let role = model
        .role
        .parse::<UserRole>()
        .with_context(|| format!("user {} has invalid role", model.id))?;
    Ok(Identity {
        id: model.id,
        email: model.email,
        role,
    })
}

// ── Code repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCodeRepository {
    pub db: DatabaseConnection,
}

impl CodeRepository for DbCodeRepository {
    async fn insert(&self, code: &NewCode) -> Result<(), ApiError> {
        verification_codes::ActiveModel {
            id: NotSet,
            user_id: Set(code.user_id),
            code: Set(code.code.clone()),
            expires_at: Set(code.expires_at),
            created_at: Set(code.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert verification code")?;
        Ok(())
    }

    async fn find_latest(&self, user_id: i32) -> Result<Option<OneTimeCode>, ApiError> {
        let model = verification_codes::Entity::find()
            .filter(verification_codes::Column::UserId.eq(user_id))
            .order_by_desc(verification_codes::Column::CreatedAt)
            .order_by_desc(verification_codes::Column::Id)
            .one(&self.db)
            .await
            .context("find latest verification code")?;
        Ok(model.map(code_from_model))
    }

    async fn delete_for_user(&self, user_id: i32) -> Result<u64, ApiError> {
        let result = verification_codes::Entity::delete_many()
            .filter(verification_codes::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete verification codes")?;
        Ok(result.rows_affected)
    }
}

fn code_from_model(model: verification_codes::Model) -> OneTimeCode {
    OneTimeCode {
        id: model.id,
        user_id: model.user_id,
        code: model.code,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}

// ── Car repository ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCarRepository {
    pub db: DatabaseConnection,
}

impl CarRepository for DbCarRepository {
    async fn list(&self) -> Result<Vec<Car>, ApiError> {
        let models = cars::Entity::find()
            .order_by_asc(cars::Column::Id)
            .all(&self.db)
            .await
            .context("list cars")?;
        Ok(models.into_iter().map(car_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Car>, ApiError> {
        let model = cars::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find car by id")?;
        Ok(model.map(car_from_model))
    }

    async fn create(&self, draft: &CarDraft) -> Result<Car, ApiError> {
        let model = cars::ActiveModel {
            id: NotSet,
            make: Set(draft.make.clone()),
            model: Set(draft.model.clone()),
            year: Set(draft.year),
            price: Set(draft.price),
            color: Set(draft.color.clone()),
            mileage: Set(draft.mileage),
        }
        .insert(&self.db)
        .await
        .context("create car")?;
        Ok(car_from_model(model))
    }

    async fn update(&self, car: &Car) -> Result<Option<Car>, ApiError> {
        let result = cars::ActiveModel {
            id: Set(car.id),
            make: Set(car.make.clone()),
            model: Set(car.model.clone()),
            year: Set(car.year),
            price: Set(car.price),
            color: Set(car.color.clone()),
            mileage: Set(car.mileage),
        }
        .update(&self.db)
        .await;
        match result {
            Ok(model) => Ok(Some(car_from_model(model))),
            // Deleted between read and write.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("update car").into()),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = cars::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete car")?;
        Ok(result.rows_affected > 0)
    }
}

fn car_from_model(model: cars::Model) -> Car {
    Car {
        id: model.id,
        make: model.make,
        model: model.model,
        year: model.year,
        price: model.price,
        color: model.color,
        mileage: model.mileage,
    }
}
