//! Availability endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::booking::{AvailabilityQuery, AvailabilityResponse},
};

use super::AuthenticatedUser;

/// Free slots of a barber (or any barber) on a date
#[utoipa::path(
    get,
    path = "/availability",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Free slots, ascending", body = AvailabilityResponse),
        (status = 400, description = "Invalid date"),
        (status = 404, description = "Barber not found")
    )
)]
pub async fn get_availability(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let date = NaiveDate::parse_from_str(query.date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date (use YYYY-MM-DD)".to_string()))?;

    let slots = state
        .services
        .availability
        .list_available_slots(query.barber_id, date)
        .await?;

    Ok(Json(AvailabilityResponse {
        barber_id: query.barber_id,
        date,
        slots,
    }))
}
