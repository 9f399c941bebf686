//! Booking (appointment) models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::schedule::hhmm;
use crate::error::{AppError, AppResult};

/// A committed appointment. Bookings are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: i32,
    /// ID of the client, as issued by the sign-in provider
    pub user_id: String,
    /// None when the client had no barber preference
    pub barber_id: Option<i32>,
    #[sqlx(rename = "booking_date")]
    pub date: NaiveDate,
    #[sqlx(rename = "booking_time")]
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "10:15")]
    pub time: NaiveTime,
    pub service_id: i32,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Validated input of a booking commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub user_id: String,
    pub barber_id: Option<i32>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service_id: i32,
}

impl NewBooking {
    pub fn on(&self, date: NaiveDate) -> Self {
        Self { date, ..self.clone() }
    }
}

/// Create booking request. Every field but `barber_id` must be present.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookingRequest {
    pub barber_id: Option<i32>,
    /// Date (YYYY-MM-DD)
    pub date: Option<String>,
    /// Time slot (HH:MM)
    pub time: Option<String>,
    pub service_id: Option<i32>,
}

impl BookingRequest {
    /// Check the selection is complete and well-formed, before touching any store
    pub fn into_new_booking(self, user_id: &str) -> AppResult<NewBooking> {
        if user_id.trim().is_empty() {
            return Err(AppError::Validation("A signed-in user is required".to_string()));
        }
        let date = self
            .date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Please select a date".to_string()))?;
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid date (use YYYY-MM-DD)".to_string()))?;
        let time = self
            .time
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Please select a time".to_string()))?;
        let time = hhmm::parse(time).map_err(AppError::Validation)?;
        let service_id = self
            .service_id
            .ok_or_else(|| AppError::Validation("Please select a service".to_string()))?;

        Ok(NewBooking {
            user_id: user_id.to_string(),
            barber_id: self.barber_id,
            date,
            time,
            service_id,
        })
    }
}

/// Repeat a booking every week
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WeeklyBookingRequest {
    #[serde(flatten)]
    pub booking: BookingRequest,
    /// Last date that may receive an occurrence (YYYY-MM-DD); defaults to the end of the year
    pub until: Option<String>,
}

/// Query on the booking store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// None means every barber
    pub barber_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub user_id: Option<String>,
}

impl BookingFilter {
    pub fn slot_day(barber_id: Option<i32>, date: NaiveDate) -> Self {
        Self { barber_id, date: Some(date), user_id: None }
    }

    pub fn user(user_id: &str) -> Self {
        Self { user_id: Some(user_id.to_string()), ..Default::default() }
    }
}

/// One occurrence of a weekly repeat that could not be booked
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeeklyBookingFailure {
    pub date: NaiveDate,
    pub reason: String,
}

/// Outcome of a weekly repeat: created occurrences and the ones that failed
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct WeeklyBookingReport {
    pub created: Vec<Booking>,
    pub failed: Vec<WeeklyBookingFailure>,
}

/// Availability query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    /// Barber ID; omit for "any barber"
    pub barber_id: Option<i32>,
    /// Date (YYYY-MM-DD)
    pub date: String,
}

/// Free slots for a barber on a date
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub barber_id: Option<i32>,
    pub date: NaiveDate,
    /// Free slots (HH:MM), ascending
    pub slots: Vec<String>,
}
