//! Repository layer: the directory and booking stores and their PostgreSQL implementations

pub mod bookings;
pub mod directory;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        barber::{Barber, CreateBarber},
        booking::{Booking, BookingFilter, NewBooking},
        schedule::{BlackoutDate, WorkingHours},
        service::{CreateService, Service},
    },
};

/// Read-mostly reference data: barbers, services, working hours, blackout dates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn get_barbers(&self) -> AppResult<Vec<Barber>>;

    async fn get_barber(&self, id: i32) -> AppResult<Barber>;

    async fn get_services(&self) -> AppResult<Vec<Service>>;

    async fn get_services_for_barber(&self, barber_id: i32) -> AppResult<Vec<Service>>;

    async fn get_working_hours(&self, barber_id: i32) -> AppResult<WorkingHours>;

    async fn get_blackout_dates(&self) -> AppResult<Vec<BlackoutDate>>;

    // ---- Administration ----

    async fn create_service(&self, data: &CreateService) -> AppResult<Service>;

    async fn create_barber(&self, data: &CreateBarber) -> AppResult<Barber>;

    async fn set_barber_services(&self, barber_id: i32, service_ids: Vec<i32>) -> AppResult<Barber>;

    async fn set_working_hours(&self, barber_id: i32, hours: &WorkingHours) -> AppResult<Barber>;

    async fn create_blackout_date(
        &self,
        date: NaiveDate,
        barber_id: Option<i32>,
        reason: Option<String>,
    ) -> AppResult<BlackoutDate>;

    async fn delete_blackout_date(&self, id: i32) -> AppResult<()>;
}

/// Append-mostly record of reservations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get_bookings(&self, filter: &BookingFilter) -> AppResult<Vec<Booking>>;

    /// Conditional write: fails with `SlotTaken` when the barber/date/time is already booked
    async fn create_booking(&self, booking: &NewBooking) -> AppResult<Booking>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub directory: directory::DirectoryRepository,
    pub bookings: bookings::BookingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            directory: directory::DirectoryRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            pool,
        }
    }
}
