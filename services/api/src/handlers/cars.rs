use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use carlot_auth_types::principal::Caller;
use carlot_domain::car::{Car, CarDraft, CarPatch};

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::cars::{
    CreateCarUseCase, DeleteCarUseCase, GetCarUseCase, ListCarsUseCase, UpdateCarUseCase,
};

pub async fn list_cars(State(state): State<AppState>) -> Result<Json<Vec<Car>>, ApiError> {
    let usecase = ListCarsUseCase {
        repo: state.car_repo(),
    };
    Ok(Json(usecase.execute().await?))
}

pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Car>, ApiError> {
    let usecase = GetCarUseCase {
        repo: state.car_repo(),
    };
    Ok(Json(usecase.execute(id).await?))
}

pub async fn create_car(
    State(state): State<AppState>,
    caller: Caller,
    Json(body): Json<CarDraft>,
) -> Result<(StatusCode, Json<Car>), ApiError> {
    let usecase = CreateCarUseCase {
        repo: state.car_repo(),
    };
    let car = usecase.execute(&caller, body).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

pub async fn update_car(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(body): Json<CarPatch>,
) -> Result<Json<Car>, ApiError> {
    let usecase = UpdateCarUseCase {
        repo: state.car_repo(),
    };
    Ok(Json(usecase.execute(&caller, id, body).await?))
}

pub async fn delete_car(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteCarUseCase {
        repo: state.car_repo(),
    };
    usecase.execute(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
