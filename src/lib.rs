//! Salon Booking
//!
//! Appointment server for a barbershop: clients browse services and barbers,
//! list the free slots of a day and book them; administrators maintain the
//! catalog, working hours and blackout dates.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
