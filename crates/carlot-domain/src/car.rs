//! Car inventory types.

use serde::{Deserialize, Serialize};

/// Year of the first production automobile; older model years are rejected.
pub const EARLIEST_MODEL_YEAR: i32 = 1886;

/// A car record as stored in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub color: String,
    pub mileage: i32,
}

/// Car fields without the store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarDraft {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub color: String,
    pub mileage: i32,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CarPatch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub color: Option<String>,
    pub mileage: Option<i32>,
}

impl CarPatch {
    pub fn is_empty(&self) -> bool {
        self.make.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.price.is_none()
            && self.color.is_none()
            && self.mileage.is_none()
    }

    /// Apply the set fields on top of `car`.
    pub fn apply(self, car: Car) -> Car {
        Car {
            id: car.id,
            make: self.make.unwrap_or(car.make),
            model: self.model.unwrap_or(car.model),
            year: self.year.unwrap_or(car.year),
            price: self.price.unwrap_or(car.price),
            color: self.color.unwrap_or(car.color),
            mileage: self.mileage.unwrap_or(car.mileage),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarValidationError {
    #[error("price must be greater than zero")]
    NonPositivePrice,
    #[error("year cannot be before 1886")]
    YearTooEarly,
}

/// Validate price and model year.
pub fn validate_car(price: f64, year: i32) -> Result<(), CarValidationError> {
    // NaN fails `> 0.0` as well
    if !(price > 0.0) {
        return Err(CarValidationError::NonPositivePrice);
    }
    if year < EARLIEST_MODEL_YEAR {
        return Err(CarValidationError::YearTooEarly);
    }
    Ok(())
}
