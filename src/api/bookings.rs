//! Booking endpoints

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, BookingRequest, WeeklyBookingReport, WeeklyBookingRequest},
};

use super::AuthenticatedUser;

/// Book a slot for the authenticated user
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Incomplete selection"),
        (status = 409, description = "Slot already booked")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BookingRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = request.into_new_booking(claims.user_id())?;
    let created = state.services.availability.commit_booking(booking).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Book the same slot every week
#[utoipa::path(
    post,
    path = "/bookings/weekly",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = WeeklyBookingRequest,
    responses(
        (status = 201, description = "Occurrences created and failed", body = WeeklyBookingReport),
        (status = 400, description = "Incomplete selection or invalid range")
    )
)]
pub async fn create_weekly_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<WeeklyBookingRequest>,
) -> AppResult<(StatusCode, Json<WeeklyBookingReport>)> {
    let until = request
        .until
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
        .transpose()
        .map_err(|_| AppError::Validation("Invalid until date (use YYYY-MM-DD)".to_string()))?;
    let booking = request.booking.into_new_booking(claims.user_id())?;

    let report = state.services.availability.repeat_weekly(booking, until).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// Bookings of the authenticated user
#[utoipa::path(
    get,
    path = "/bookings/me",
    tag = "bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User bookings", body = Vec<Booking>)
    )
)]
pub async fn my_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.services.availability.user_bookings(claims.user_id()).await?;
    Ok(Json(bookings))
}
