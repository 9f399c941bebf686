//! Availability engine: free slots, booking commits and weekly repeats

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime};

use super::slots;
use crate::{
    config::BookingConfig,
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingFilter, NewBooking, WeeklyBookingFailure, WeeklyBookingReport},
        schedule::{hhmm, DayOfWeek, TimeWindow},
    },
    repository::{BookingStore, DirectoryStore},
};

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Clone)]
pub struct AvailabilityService {
    directory: Arc<dyn DirectoryStore>,
    bookings: Arc<dyn BookingStore>,
    rules: BookingConfig,
    today: fn() -> NaiveDate,
}

impl AvailabilityService {
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        bookings: Arc<dyn BookingStore>,
        rules: BookingConfig,
    ) -> Self {
        Self {
            directory,
            bookings,
            rules,
            today: local_today,
        }
    }

    /// Replace the clock used to decide what "today" is
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    fn step(&self) -> Duration {
        Duration::minutes(i64::from(self.rules.slot_step_minutes))
    }

    /// Free "HH:MM" slots for a barber (or any barber when `barber_id` is None) on `date`.
    ///
    /// Empty when the date is past, falls on a closed weekday or a blackout date,
    /// or when nobody works that day. Never writes.
    pub async fn list_available_slots(
        &self,
        barber_id: Option<i32>,
        date: NaiveDate,
    ) -> AppResult<Vec<String>> {
        if date < (self.today)() {
            tracing::debug!("No slots for past date {}", date);
            return Ok(Vec::new());
        }

        let weekday = DayOfWeek::of(date);
        if self.rules.closed_weekdays.contains(&weekday) {
            tracing::debug!("No slots on {} ({:?} is a closed weekday)", date, weekday);
            return Ok(Vec::new());
        }

        let windows = self.open_windows(barber_id, date, weekday).await?;
        if windows.is_empty() {
            tracing::debug!("No working hours for barber {:?} on {}", barber_id, date);
            return Ok(Vec::new());
        }

        let grid = slots::slot_grid(&windows, self.step());

        let reserved: HashSet<NaiveTime> = self
            .bookings
            .get_bookings(&BookingFilter::slot_day(barber_id, date))
            .await
            .map_err(AppError::into_store)?
            .into_iter()
            .map(|booking| booking.time)
            .collect();

        let free = slots::free_slots(&grid, &reserved);
        tracing::debug!(
            "Barber {:?} on {}: {} candidate slots, {} reserved, {} free",
            barber_id,
            date,
            grid.len(),
            reserved.len(),
            free.len()
        );
        Ok(slots::labels(&free))
    }

    /// Working-hour windows open on `date`, after blackout dates
    async fn open_windows(
        &self,
        barber_id: Option<i32>,
        date: NaiveDate,
        weekday: DayOfWeek,
    ) -> AppResult<Vec<TimeWindow>> {
        let blackouts = self
            .directory
            .get_blackout_dates()
            .await
            .map_err(AppError::into_directory)?;

        if blackouts.iter().any(|b| b.is_global() && b.date == date) {
            return Ok(Vec::new());
        }

        match barber_id {
            Some(id) => {
                if blackouts.iter().any(|b| b.closes(date, id)) {
                    return Ok(Vec::new());
                }
                let hours = self
                    .directory
                    .get_working_hours(id)
                    .await
                    .map_err(AppError::into_directory)?;
                Ok(hours.windows_on(weekday))
            }
            None => {
                let barbers = self
                    .directory
                    .get_barbers()
                    .await
                    .map_err(AppError::into_directory)?;
                Ok(barbers
                    .iter()
                    .filter(|barber| !blackouts.iter().any(|b| b.closes(date, barber.id)))
                    .flat_map(|barber| barber.working_hours.windows_on(weekday))
                    .collect())
            }
        }
    }

    /// Append a booking to the store.
    ///
    /// The date must be open and the time must sit on the slot grid of the
    /// chosen barber (or of any barber). Reservations are not re-read: the
    /// store write is conditional and a concurrent booking of the same
    /// barber/date/time makes this fail with `SlotTaken`.
    pub async fn commit_booking(&self, booking: NewBooking) -> AppResult<Booking> {
        self.check_slot(&booking).await?;

        let offered = match booking.barber_id {
            Some(id) => self.directory.get_services_for_barber(id).await,
            None => self.directory.get_services().await,
        }
        .map_err(AppError::into_directory)?;

        if !offered.iter().any(|service| service.id == booking.service_id) {
            return Err(AppError::Validation(match booking.barber_id {
                Some(id) => format!("Barber {} does not offer service {}", id, booking.service_id),
                None => format!("Unknown service {}", booking.service_id),
            }));
        }

        let created = self
            .bookings
            .create_booking(&booking)
            .await
            .map_err(AppError::into_store)?;

        tracing::info!(
            "Booking {} created for user {} on {} at {} (barber {:?})",
            created.id,
            created.user_id,
            created.date,
            hhmm::label(created.time),
            created.barber_id
        );
        Ok(created)
    }

    /// Reject a past date, a closed weekday, a blackout date or a time off the grid
    async fn check_slot(&self, booking: &NewBooking) -> AppResult<()> {
        if booking.date < (self.today)() {
            return Err(AppError::Validation(format!(
                "Cannot book {}: the date is in the past",
                booking.date
            )));
        }

        let weekday = DayOfWeek::of(booking.date);
        if self.rules.closed_weekdays.contains(&weekday) {
            return Err(AppError::Validation(format!(
                "Cannot book {}: the salon is closed on {:?}",
                booking.date, weekday
            )));
        }

        let windows = self.open_windows(booking.barber_id, booking.date, weekday).await?;
        if windows.is_empty() {
            return Err(AppError::Validation(format!(
                "Cannot book {}: barber {:?} is not working that day",
                booking.date, booking.barber_id
            )));
        }

        if !slots::slot_grid(&windows, self.step()).contains(&booking.time) {
            return Err(AppError::Validation(format!(
                "Cannot book {} at {}: not an open slot",
                booking.date,
                hhmm::label(booking.time)
            )));
        }
        Ok(())
    }

    /// Book the same time every 7 days from `booking.date` through `until`
    /// (default: 31 December of the start year).
    ///
    /// Best effort: a failed occurrence is logged and reported, the others are still attempted.
    pub async fn repeat_weekly(
        &self,
        booking: NewBooking,
        until: Option<NaiveDate>,
    ) -> AppResult<WeeklyBookingReport> {
        let start = booking.date;
        let until = match until {
            Some(date) => date,
            None => NaiveDate::from_ymd_opt(start.year(), 12, 31)
                .ok_or_else(|| AppError::Internal(format!("No end of year for {}", start)))?,
        };

        if until < start {
            return Err(AppError::Validation(format!(
                "Repeat end {} is before the first appointment {}",
                until, start
            )));
        }

        let occurrences = (until - start).num_days() / 7 + 1;
        if occurrences > i64::from(self.rules.max_weekly_repeats) {
            return Err(AppError::Validation(format!(
                "Too many weekly occurrences ({}, max {})",
                occurrences, self.rules.max_weekly_repeats
            )));
        }

        let mut report = WeeklyBookingReport::default();
        for week in 0..occurrences {
            let date = start + Duration::days(7 * week);
            match self.commit_booking(booking.on(date)).await {
                Ok(created) => report.created.push(created),
                Err(e) => {
                    tracing::warn!("Weekly repeat: booking on {} failed: {}", date, e);
                    report.failed.push(WeeklyBookingFailure {
                        date,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Weekly repeat for user {}: {} created, {} failed",
            booking.user_id,
            report.created.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Bookings of one user, oldest first
    pub async fn user_bookings(&self, user_id: &str) -> AppResult<Vec<Booking>> {
        self.bookings
            .get_bookings(&BookingFilter::user(user_id))
            .await
            .map_err(AppError::into_store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        barber::Barber,
        schedule::{BlackoutDate, Shift, WorkingHours},
        service::Service,
    };
    use crate::repository::{MockBookingStore, MockDirectoryStore};
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    // 2024-01-01 is a Monday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// Every day of the week, 10:00-14:00
    fn morning_hours() -> WorkingHours {
        let mut hours = WorkingHours::default();
        for index in 0..7 {
            let day = DayOfWeek::from_index(index).unwrap();
            hours.set(day, Shift::Morning, TimeWindow::new(t(10, 0), t(14, 0)).unwrap());
        }
        hours
    }

    fn barber(id: i32, hours: WorkingHours) -> Barber {
        Barber {
            id,
            name: format!("Barber {}", id),
            image_ref: None,
            working_hours: hours,
            service_ids: vec![1],
        }
    }

    fn service(id: i32) -> Service {
        Service { id, name: "Corte".into(), duration_minutes: 30, price: Decimal::new(1500, 2) }
    }

    fn booked(barber_id: Option<i32>, date: NaiveDate, time: NaiveTime) -> Booking {
        Booking {
            id: 99,
            user_id: "someone".into(),
            barber_id,
            date,
            time,
            service_id: 1,
            crea_date: None,
        }
    }

    fn stored(booking: &NewBooking) -> Booking {
        Booking {
            id: booking.date.ordinal() as i32,
            user_id: booking.user_id.clone(),
            barber_id: booking.barber_id,
            date: booking.date,
            time: booking.time,
            service_id: booking.service_id,
            crea_date: None,
        }
    }

    fn new_booking(date: NaiveDate) -> NewBooking {
        NewBooking {
            user_id: "uid-1".into(),
            barber_id: Some(1),
            date,
            time: t(10, 0),
            service_id: 1,
        }
    }

    fn engine(directory: MockDirectoryStore, bookings: MockBookingStore) -> AvailabilityService {
        engine_with(directory, bookings, BookingConfig::default())
    }

    fn engine_with(
        directory: MockDirectoryStore,
        bookings: MockBookingStore,
        rules: BookingConfig,
    ) -> AvailabilityService {
        AvailabilityService::new(Arc::new(directory), Arc::new(bookings), rules).with_today(today)
    }

    /// Directory with barbers 1 and 2 on identical morning hours and no blackouts
    fn directory() -> MockDirectoryStore {
        let mut directory = MockDirectoryStore::new();
        directory.expect_get_blackout_dates().returning(|| Ok(Vec::new()));
        directory.expect_get_working_hours().returning(|_| Ok(morning_hours()));
        directory
            .expect_get_barbers()
            .returning(|| Ok(vec![barber(1, morning_hours()), barber(2, morning_hours())]));
        directory
    }

    fn no_bookings() -> MockBookingStore {
        let mut bookings = MockBookingStore::new();
        bookings.expect_get_bookings().returning(|_| Ok(Vec::new()));
        bookings
    }

    fn expected_morning() -> Vec<String> {
        (0..17)
            .map(|i| hhmm::label(t(10, 0) + Duration::minutes(15 * i)))
            .collect()
    }

    #[tokio::test]
    async fn test_past_date_has_no_slots() {
        // No expectations: any store call would panic
        let engine = engine(MockDirectoryStore::new(), MockBookingStore::new());
        let slots = engine.list_available_slots(Some(1), d(2023, 12, 29)).await.unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_today_is_bookable() {
        let engine = engine(directory(), no_bookings());
        let slots = engine.list_available_slots(Some(1), today()).await.unwrap();
        assert_eq!(slots.len(), 17);
    }

    #[tokio::test]
    async fn test_sunday_has_no_slots() {
        let engine = engine(MockDirectoryStore::new(), MockBookingStore::new());
        for sunday in [d(2024, 1, 7), d(2024, 1, 14), d(2024, 6, 2)] {
            assert!(engine.list_available_slots(Some(1), sunday).await.unwrap().is_empty());
            assert!(engine.list_available_slots(None, sunday).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_sunday_rule_is_configurable() {
        let rules = BookingConfig { closed_weekdays: Vec::new(), ..BookingConfig::default() };
        let engine = engine_with(directory(), no_bookings(), rules);
        let slots = engine.list_available_slots(Some(1), d(2024, 1, 7)).await.unwrap();
        assert_eq!(slots.len(), 17);
    }

    #[tokio::test]
    async fn test_morning_window_without_bookings() {
        let engine = engine(directory(), no_bookings());
        let slots = engine.list_available_slots(Some(1), d(2024, 1, 2)).await.unwrap();
        assert_eq!(slots, expected_morning());
        assert_eq!(slots.first().map(String::as_str), Some("10:00"));
        assert_eq!(slots.last().map(String::as_str), Some("14:00"));
    }

    #[tokio::test]
    async fn test_booked_slot_is_removed_for_that_barber_only() {
        let date = d(2024, 1, 2);
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_get_bookings()
            .withf(move |f| f.barber_id == Some(1) && f.date == Some(date))
            .returning(move |_| Ok(vec![booked(Some(1), date, t(11, 0))]));
        bookings
            .expect_get_bookings()
            .withf(move |f| f.barber_id == Some(2) && f.date == Some(date))
            .returning(|_| Ok(Vec::new()));
        let engine = engine(directory(), bookings);

        let first = engine.list_available_slots(Some(1), date).await.unwrap();
        assert_eq!(first.len(), 16);
        assert!(!first.contains(&"11:00".to_string()));

        let second = engine.list_available_slots(Some(2), date).await.unwrap();
        assert_eq!(second.len(), 17);
        assert!(second.contains(&"11:00".to_string()));
    }

    #[tokio::test]
    async fn test_any_barber_booking_reserves_no_specific_barber() {
        let date = d(2024, 1, 2);
        let mut bookings = MockBookingStore::new();
        // Store semantics: a barber filter never matches NULL barber rows
        bookings
            .expect_get_bookings()
            .with(eq(BookingFilter::slot_day(Some(1), date)))
            .returning(|_| Ok(Vec::new()));
        bookings
            .expect_get_bookings()
            .with(eq(BookingFilter::slot_day(None, date)))
            .returning(move |_| Ok(vec![booked(None, date, t(11, 0))]));
        let engine = engine(directory(), bookings);

        let any = engine.list_available_slots(None, date).await.unwrap();
        assert!(!any.contains(&"11:00".to_string()));

        let first = engine.list_available_slots(Some(1), date).await.unwrap();
        assert!(first.contains(&"11:00".to_string()));
    }

    #[tokio::test]
    async fn test_listing_is_idempotent() {
        let date = d(2024, 1, 3);
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_get_bookings()
            .times(2)
            .returning(move |_| Ok(vec![booked(Some(1), date, t(12, 30))]));
        let engine = engine(directory(), bookings);

        let first = engine.list_available_slots(Some(1), date).await.unwrap();
        let second = engine.list_available_slots(Some(1), date).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_global_blackout() {
        let date = d(2024, 1, 6);
        let mut directory = MockDirectoryStore::new();
        directory.expect_get_blackout_dates().returning(move || {
            Ok(vec![BlackoutDate { id: 1, date, barber_id: None, reason: Some("Holiday".into()), crea_date: None }])
        });
        let engine = engine(directory, MockBookingStore::new());

        assert!(engine.list_available_slots(Some(1), date).await.unwrap().is_empty());
        assert!(engine.list_available_slots(None, date).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_barber_blackout_and_any_barber_union() {
        let date = d(2024, 1, 5);
        let mut directory = MockDirectoryStore::new();
        directory.expect_get_blackout_dates().returning(move || {
            Ok(vec![BlackoutDate { id: 2, date, barber_id: Some(1), reason: None, crea_date: None }])
        });
        directory.expect_get_barbers().returning(|| {
            let mut late = WorkingHours::default();
            late.set(
                DayOfWeek::Friday,
                Shift::Afternoon,
                TimeWindow::new(t(16, 0), t(16, 30)).unwrap(),
            );
            Ok(vec![barber(1, morning_hours()), barber(2, late)])
        });
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_get_bookings()
            .with(eq(BookingFilter::slot_day(None, date)))
            .returning(|_| Ok(Vec::new()));
        let engine = engine(directory, bookings);

        // Barber 1 is off: no working-hours lookup, no bookings lookup
        assert!(engine.list_available_slots(Some(1), date).await.unwrap().is_empty());

        // Any barber: only barber 2's afternoon remains
        let any = engine.list_available_slots(None, date).await.unwrap();
        assert_eq!(any, vec!["16:00", "16:15", "16:30"]);
    }

    #[tokio::test]
    async fn test_day_without_hours() {
        let mut directory = MockDirectoryStore::new();
        directory.expect_get_blackout_dates().returning(|| Ok(Vec::new()));
        directory
            .expect_get_working_hours()
            .with(eq(3))
            .returning(|_| Ok(WorkingHours::default()));
        let engine = engine(directory, MockBookingStore::new());

        assert!(engine.list_available_slots(Some(3), d(2024, 1, 2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_directory_failure() {
        let mut directory = MockDirectoryStore::new();
        directory
            .expect_get_blackout_dates()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let engine = engine(directory, MockBookingStore::new());

        let err = engine.list_available_slots(Some(1), d(2024, 1, 2)).await.unwrap_err();
        assert!(matches!(err, AppError::DirectoryUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unknown_barber_is_not_found() {
        let mut directory = MockDirectoryStore::new();
        directory.expect_get_blackout_dates().returning(|| Ok(Vec::new()));
        directory
            .expect_get_working_hours()
            .returning(|id| Err(AppError::NotFound(format!("Barber {} not found", id))));
        let engine = engine(directory, MockBookingStore::new());

        let err = engine.list_available_slots(Some(42), d(2024, 1, 2)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    /// `directory()` plus the services: barber 1 offers service 1, the catalog has 1 and 2
    fn catalog() -> MockDirectoryStore {
        let mut directory = directory();
        directory
            .expect_get_services_for_barber()
            .returning(|_| Ok(vec![service(1)]));
        directory
            .expect_get_services()
            .returning(|| Ok(vec![service(1), service(2)]));
        directory
    }

    #[tokio::test]
    async fn test_commit_booking() {
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_create_booking()
            .times(1)
            .returning(|b| Ok(stored(b)));
        let engine = engine(catalog(), bookings);

        let created = engine.commit_booking(new_booking(d(2024, 1, 2))).await.unwrap();
        assert_eq!(created.user_id, "uid-1");
        assert_eq!(created.time, t(10, 0));
    }

    #[tokio::test]
    async fn test_commit_rejects_past_date_before_store() {
        let engine = engine(MockDirectoryStore::new(), MockBookingStore::new());
        let err = engine.commit_booking(new_booking(d(2023, 12, 31))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_commit_rejects_closed_days_and_off_grid_times() {
        // No create_booking expectation: reaching the store would panic
        let refusing = engine(catalog(), MockBookingStore::new());

        let sunday = refusing.commit_booking(new_booking(d(2024, 1, 7))).await.unwrap_err();
        assert!(matches!(sunday, AppError::Validation(_)));

        for time in [t(3, 17), t(10, 7), t(14, 15), t(9, 45)] {
            let booking = NewBooking { time, ..new_booking(d(2024, 1, 2)) };
            let err = refusing.commit_booking(booking).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{} was accepted", time);
        }

        // Last tick of the window is bookable
        let mut bookings = MockBookingStore::new();
        bookings.expect_create_booking().times(1).returning(|b| Ok(stored(b)));
        let accepting = engine(catalog(), bookings);
        let booking = NewBooking { time: t(14, 0), ..new_booking(d(2024, 1, 2)) };
        assert!(accepting.commit_booking(booking).await.is_ok());
    }

    #[tokio::test]
    async fn test_commit_rejects_blackout_dates() {
        let holiday = d(2024, 1, 3);
        let day_off = d(2024, 1, 4);
        let mut directory = MockDirectoryStore::new();
        directory.expect_get_blackout_dates().returning(move || {
            Ok(vec![
                BlackoutDate { id: 1, date: holiday, barber_id: None, reason: None, crea_date: None },
                BlackoutDate { id: 2, date: day_off, barber_id: Some(1), reason: None, crea_date: None },
            ])
        });
        directory.expect_get_working_hours().returning(|_| Ok(morning_hours()));
        directory
            .expect_get_barbers()
            .returning(|| Ok(vec![barber(1, morning_hours()), barber(2, morning_hours())]));
        directory.expect_get_services_for_barber().returning(|_| Ok(vec![service(1)]));
        directory.expect_get_services().returning(|| Ok(vec![service(1)]));
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_create_booking()
            .withf(move |b| b.date == day_off && b.barber_id.is_none())
            .times(1)
            .returning(|b| Ok(stored(b)));
        let engine = engine(directory, bookings);

        for barber_id in [Some(1), None] {
            let booking = NewBooking { barber_id, ..new_booking(holiday) };
            let err = engine.commit_booking(booking).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }

        let err = engine.commit_booking(new_booking(day_off)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Barber 2 still works, so "any barber" can be booked
        let booking = NewBooking { barber_id: None, ..new_booking(day_off) };
        assert!(engine.commit_booking(booking).await.is_ok());
    }

    #[tokio::test]
    async fn test_repeat_weekly_skips_blackout_week() {
        let christmas = d(2024, 12, 25);
        let mut directory = MockDirectoryStore::new();
        directory.expect_get_blackout_dates().returning(move || {
            Ok(vec![BlackoutDate {
                id: 1,
                date: christmas,
                barber_id: None,
                reason: Some("Navidad".into()),
                crea_date: None,
            }])
        });
        directory.expect_get_working_hours().returning(|_| Ok(morning_hours()));
        directory.expect_get_services_for_barber().returning(|_| Ok(vec![service(1)]));
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_create_booking()
            .withf(move |b| b.date != christmas)
            .returning(|b| Ok(stored(b)));
        let engine = engine(directory, bookings);

        assert!(engine.list_available_slots(Some(1), christmas).await.unwrap().is_empty());

        let report = engine.repeat_weekly(new_booking(d(2024, 12, 18)), None).await.unwrap();
        let dates: Vec<_> = report.created.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d(2024, 12, 18)]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].date, christmas);
    }

    #[tokio::test]
    async fn test_commit_rejects_service_not_offered() {
        let strict = engine(catalog(), MockBookingStore::new());
        let booking = NewBooking { service_id: 2, ..new_booking(d(2024, 1, 2)) };
        let err = strict.commit_booking(booking).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Any barber may take any service of the catalog
        let mut bookings = MockBookingStore::new();
        bookings.expect_create_booking().returning(|b| Ok(stored(b)));
        let any_barber = engine(catalog(), bookings);
        let booking = NewBooking { barber_id: None, service_id: 2, ..new_booking(d(2024, 1, 2)) };
        assert!(any_barber.commit_booking(booking).await.is_ok());
    }

    #[tokio::test]
    async fn test_commit_conflict_and_store_failure() {
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_create_booking()
            .with(eq(new_booking(d(2024, 1, 2))))
            .returning(|_| Err(AppError::SlotTaken("2024-01-02 at 10:00 is already booked".into())));
        bookings
            .expect_create_booking()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let engine = engine(catalog(), bookings);

        let err = engine.commit_booking(new_booking(d(2024, 1, 2))).await.unwrap_err();
        assert!(matches!(err, AppError::SlotTaken(_)));

        let err = engine.commit_booking(new_booking(d(2024, 1, 3))).await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }

    #[tokio::test]
    async fn test_repeat_weekly_creates_one_booking_per_week() {
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_create_booking()
            .times(4)
            .returning(|b| Ok(stored(b)));
        let engine = engine(catalog(), bookings);

        let report = engine
            .repeat_weekly(new_booking(d(2024, 1, 1)), Some(d(2024, 1, 22)))
            .await
            .unwrap();

        let dates: Vec<_> = report.created.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 8), d(2024, 1, 15), d(2024, 1, 22)]);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn test_repeat_weekly_continues_after_failure() {
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_create_booking()
            .withf(|b| b.date == NaiveDate::from_ymd_opt(2024, 1, 8).unwrap())
            .returning(|_| Err(AppError::SlotTaken("taken".into())));
        bookings.expect_create_booking().returning(|b| Ok(stored(b)));
        let engine = engine(catalog(), bookings);

        let report = engine
            .repeat_weekly(new_booking(d(2024, 1, 1)), Some(d(2024, 1, 27)))
            .await
            .unwrap();

        assert_eq!(report.created.len(), 3);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].date, d(2024, 1, 8));
    }

    #[tokio::test]
    async fn test_repeat_weekly_bounds() {
        let engine = engine(MockDirectoryStore::new(), MockBookingStore::new());

        let err = engine
            .repeat_weekly(new_booking(d(2024, 1, 8)), Some(d(2024, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = engine
            .repeat_weekly(new_booking(d(2024, 1, 1)), Some(d(2026, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_repeat_weekly_defaults_to_end_of_year() {
        let mut bookings = MockBookingStore::new();
        bookings.expect_create_booking().returning(|b| Ok(stored(b)));
        let engine = engine(catalog(), bookings);

        let report = engine.repeat_weekly(new_booking(d(2024, 12, 2)), None).await.unwrap();
        let dates: Vec<_> = report.created.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d(2024, 12, 2), d(2024, 12, 9), d(2024, 12, 16), d(2024, 12, 23), d(2024, 12, 30)]);
    }

    #[tokio::test]
    async fn test_user_bookings() {
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_get_bookings()
            .with(eq(BookingFilter::user("uid-1")))
            .returning(|_| Ok(vec![booked(Some(1), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), NaiveTime::from_hms_opt(10, 0, 0).unwrap())]));
        let engine = engine(MockDirectoryStore::new(), bookings);

        assert_eq!(engine.user_bookings("uid-1").await.unwrap().len(), 1);
    }
}
