//! Schedule models (weekdays, working-hour windows, blackout dates)

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// "HH:MM" (de)serialization for `NaiveTime`
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse a "HH:MM" label
    pub fn parse(raw: &str) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(raw.trim(), FORMAT)
            .map_err(|_| format!("Invalid time '{}' (use HH:MM)", raw))
    }

    pub fn label(time: NaiveTime) -> String {
        time.format(FORMAT).to_string()
    }
}

// ---------------------------------------------------------------------------
// DayOfWeek
// ---------------------------------------------------------------------------

/// Day of week, stored as 0=Monday .. 6=Sunday
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn index(self) -> i16 {
        self as i16
    }

    pub fn from_index(index: i16) -> Option<Self> {
        Some(match index {
            0 => DayOfWeek::Monday,
            1 => DayOfWeek::Tuesday,
            2 => DayOfWeek::Wednesday,
            3 => DayOfWeek::Thursday,
            4 => DayOfWeek::Friday,
            5 => DayOfWeek::Saturday,
            6 => DayOfWeek::Sunday,
            _ => return None,
        })
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        // num_days_from_monday is always 0..=6
        Self::from_index(day.num_days_from_monday() as i16).unwrap_or(DayOfWeek::Sunday)
    }
}

// ---------------------------------------------------------------------------
// TimeWindow / Shift / DaySchedule
// ---------------------------------------------------------------------------

/// Opening window inside a day, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    /// Start (HH:MM)
    #[serde(serialize_with = "hhmm::serialize")]
    #[schema(value_type = String, example = "10:00")]
    pub start: NaiveTime,
    /// End (HH:MM)
    #[serde(serialize_with = "hhmm::serialize")]
    #[schema(value_type = String, example = "14:00")]
    pub end: NaiveTime,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    start: String,
    end: String,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = String;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        TimeWindow::new(hhmm::parse(&raw.start)?, hhmm::parse(&raw.end)?)
    }
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, String> {
        if start > end {
            return Err(format!(
                "Window start {} is after end {}",
                hhmm::label(start),
                hhmm::label(end)
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Named part of a working day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Afternoon,
}

impl Shift {
    pub fn as_str(self) -> &'static str {
        match self {
            Shift::Morning => "morning",
            Shift::Afternoon => "afternoon",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Shift::Morning),
            "afternoon" => Ok(Shift::Afternoon),
            other => Err(format!("Unknown shift '{}'", other)),
        }
    }
}

/// Windows a barber works on one weekday
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DaySchedule {
    pub morning: Option<TimeWindow>,
    pub afternoon: Option<TimeWindow>,
}

impl DaySchedule {
    pub fn windows(&self) -> impl Iterator<Item = TimeWindow> + '_ {
        self.morning.iter().chain(self.afternoon.iter()).copied()
    }

    pub fn set(&mut self, shift: Shift, window: TimeWindow) {
        match shift {
            Shift::Morning => self.morning = Some(window),
            Shift::Afternoon => self.afternoon = Some(window),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.morning.is_none() && self.afternoon.is_none()
    }
}

/// Weekly working hours. Days absent from the map are days off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct WorkingHours(pub BTreeMap<DayOfWeek, DaySchedule>);

impl WorkingHours {
    pub fn windows_on(&self, day: DayOfWeek) -> Vec<TimeWindow> {
        self.0
            .get(&day)
            .map(|schedule| schedule.windows().collect())
            .unwrap_or_default()
    }

    pub fn set(&mut self, day: DayOfWeek, shift: Shift, window: TimeWindow) {
        self.0.entry(day).or_default().set(shift, window);
    }

    /// Flatten into (day, shift, window) rows
    pub fn entries(&self) -> Vec<(DayOfWeek, Shift, TimeWindow)> {
        let mut rows = Vec::new();
        for (day, schedule) in &self.0 {
            if let Some(w) = schedule.morning {
                rows.push((*day, Shift::Morning, w));
            }
            if let Some(w) = schedule.afternoon {
                rows.push((*day, Shift::Afternoon, w));
            }
        }
        rows
    }
}

// ---------------------------------------------------------------------------
// BlackoutDate
// ---------------------------------------------------------------------------

/// A day on which no slot is offered, for the whole salon or for one barber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BlackoutDate {
    pub id: i32,
    #[sqlx(rename = "blackout_date")]
    pub date: NaiveDate,
    /// None when the whole salon is closed
    pub barber_id: Option<i32>,
    pub reason: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
}

impl BlackoutDate {
    pub fn is_global(&self) -> bool {
        self.barber_id.is_none()
    }

    /// Whether this blackout closes `barber_id` on `date`
    pub fn closes(&self, date: NaiveDate, barber_id: i32) -> bool {
        self.date == date && self.barber_id.map_or(true, |id| id == barber_id)
    }
}

/// Create blackout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBlackoutDate {
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Restrict the blackout to one barber
    pub barber_id: Option<i32>,
    #[validate(length(max = 200, message = "Reason must be at most 200 characters"))]
    pub reason: Option<String>,
}
