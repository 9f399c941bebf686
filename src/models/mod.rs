//! Data models for the booking server

pub mod auth;
pub mod barber;
pub mod booking;
pub mod schedule;
pub mod service;

// Re-export commonly used types
pub use auth::{Role, UserClaims};
pub use barber::Barber;
pub use booking::{Booking, BookingFilter, BookingRequest, NewBooking, WeeklyBookingReport};
pub use schedule::{BlackoutDate, DayOfWeek, DaySchedule, Shift, TimeWindow, WorkingHours};
pub use service::Service;
