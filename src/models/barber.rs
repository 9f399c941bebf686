//! Barber models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::schedule::{DayOfWeek, Shift, TimeWindow, WorkingHours};

/// A barber together with weekly hours and offered services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Barber {
    pub id: i32,
    pub name: String,
    /// Picture reference (URL or storage key)
    pub image_ref: Option<String>,
    /// Weekday name -> { morning, afternoon } windows
    pub working_hours: WorkingHours,
    /// IDs of the services this barber offers
    pub service_ids: Vec<i32>,
}

#[derive(Debug, Clone, FromRow)]
pub struct BarberRow {
    pub id: i32,
    pub name: String,
    pub image_ref: Option<String>,
}

/// Working hours row as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct WorkingHoursRow {
    pub barber_id: i32,
    pub day_of_week: i16,
    pub shift: String,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
}

impl WorkingHoursRow {
    /// Decode one row, rejecting anything the schedule model cannot represent
    pub fn decode(&self) -> Result<(DayOfWeek, Shift, TimeWindow), String> {
        let day = DayOfWeek::from_index(self.day_of_week).ok_or_else(|| {
            format!("barber {}: invalid day_of_week {}", self.barber_id, self.day_of_week)
        })?;
        let shift = self
            .shift
            .parse::<Shift>()
            .map_err(|e| format!("barber {}: {}", self.barber_id, e))?;
        let window = TimeWindow::new(self.start_time, self.end_time)
            .map_err(|e| format!("barber {}: {}", self.barber_id, e))?;
        Ok((day, shift, window))
    }
}

/// Create barber request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBarber {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    pub image_ref: Option<String>,
    #[serde(default)]
    pub service_ids: Vec<i32>,
    #[serde(default)]
    pub working_hours: WorkingHours,
}

/// Replace the services a barber offers
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBarberServices {
    pub service_ids: Vec<i32>,
}
