//! Bookings repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookingStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingFilter, NewBooking},
        schedule::hhmm,
    },
};

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for BookingsRepository {
    /// List bookings matching the filter, ordered by date then time
    async fn get_bookings(&self, filter: &BookingFilter) -> AppResult<Vec<Booking>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.barber_id.is_some() {
            conditions.push(format!("barber_id = ${}", idx));
            idx += 1;
        }
        if filter.date.is_some() {
            conditions.push(format!("booking_date = ${}", idx));
            idx += 1;
        }
        if filter.user_id.is_some() {
            conditions.push(format!("user_id = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT * FROM bookings {} ORDER BY booking_date, booking_time",
            where_clause
        );

        let mut builder = sqlx::query_as::<_, Booking>(&query);
        if let Some(barber_id) = filter.barber_id { builder = builder.bind(barber_id); }
        if let Some(date) = filter.date { builder = builder.bind(date); }
        if let Some(ref user_id) = filter.user_id { builder = builder.bind(user_id); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Insert a booking unless the barber/date/time is already held (unique index)
    async fn create_booking(&self, booking: &NewBooking) -> AppResult<Booking> {
        let row = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (user_id, barber_id, booking_date, booking_time, service_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&booking.user_id)
        .bind(booking.barber_id)
        .bind(booking.date)
        .bind(booking.time)
        .bind(booking.service_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| {
            AppError::SlotTaken(format!(
                "{} at {} is already booked",
                booking.date,
                hhmm::label(booking.time)
            ))
        })
    }
}
