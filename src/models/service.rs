//! Salon service (haircut, beard trim, ...) models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A service offered by the salon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub id: i32,
    pub name: String,
    /// Duration in minutes (always positive)
    pub duration_minutes: i32,
    /// Price (never negative)
    #[schema(value_type = String, example = "15.00")]
    pub price: Decimal,
}

/// Service row as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRow {
    pub id: i32,
    pub name: String,
    pub duration_minutes: i32,
    pub price: Decimal,
}

impl TryFrom<ServiceRow> for Service {
    type Error = String;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        if row.name.trim().is_empty() {
            return Err(format!("service {} has no name", row.id));
        }
        if row.duration_minutes <= 0 {
            return Err(format!("service {} has duration {}", row.id, row.duration_minutes));
        }
        if row.price.is_sign_negative() {
            return Err(format!("service {} has negative price {}", row.id, row.price));
        }
        Ok(Service {
            id: row.id,
            name: row.name,
            duration_minutes: row.duration_minutes,
            price: row.price,
        })
    }
}

/// Create service request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateService {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(range(min = 1, max = 600, message = "Duration must be between 1 and 600 minutes"))]
    pub duration_minutes: i32,
    #[schema(value_type = String, example = "15.00")]
    pub price: Decimal,
}
