//! Directory repository: barbers, services, working hours and blackout dates

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres, Transaction};

use super::DirectoryStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        barber::{Barber, BarberRow, CreateBarber, WorkingHoursRow},
        schedule::{BlackoutDate, WorkingHours},
        service::{CreateService, Service, ServiceRow},
    },
};

#[derive(Clone)]
pub struct DirectoryRepository {
    pool: Pool<Postgres>,
}

impl DirectoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn barber_row(&self, id: i32) -> AppResult<BarberRow> {
        sqlx::query_as::<_, BarberRow>("SELECT id, name, image_ref FROM barbers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Barber {} not found", id)))
    }

    /// Working hours of the given barbers (all barbers when `barber_id` is None)
    async fn hours_by_barber(&self, barber_id: Option<i32>) -> AppResult<HashMap<i32, WorkingHours>> {
        let rows = sqlx::query_as::<_, WorkingHoursRow>(
            r#"
            SELECT barber_id, day_of_week, shift, start_time, end_time
            FROM working_hours
            WHERE $1::int IS NULL OR barber_id = $1
            ORDER BY barber_id, day_of_week, start_time
            "#,
        )
        .bind(barber_id)
        .fetch_all(&self.pool)
        .await?;

        let mut hours: HashMap<i32, WorkingHours> = HashMap::new();
        for row in rows {
            match row.decode() {
                Ok((day, shift, window)) => {
                    hours.entry(row.barber_id).or_default().set(day, shift, window)
                }
                Err(e) => tracing::warn!("Skipping malformed working hours row: {}", e),
            }
        }
        Ok(hours)
    }

    async fn service_ids_by_barber(&self, barber_id: Option<i32>) -> AppResult<HashMap<i32, Vec<i32>>> {
        let rows: Vec<(i32, i32)> = sqlx::query_as(
            r#"
            SELECT barber_id, service_id FROM barber_services
            WHERE $1::int IS NULL OR barber_id = $1
            ORDER BY barber_id, service_id
            "#,
        )
        .bind(barber_id)
        .fetch_all(&self.pool)
        .await?;

        let mut ids: HashMap<i32, Vec<i32>> = HashMap::new();
        for (barber, service) in rows {
            ids.entry(barber).or_default().push(service);
        }
        Ok(ids)
    }

    async fn replace_services(
        tx: &mut Transaction<'_, Postgres>,
        barber_id: i32,
        service_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM barber_services WHERE barber_id = $1")
            .bind(barber_id)
            .execute(&mut **tx)
            .await?;
        for service_id in service_ids {
            sqlx::query(
                "INSERT INTO barber_services (barber_id, service_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(barber_id)
            .bind(service_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn replace_hours(
        tx: &mut Transaction<'_, Postgres>,
        barber_id: i32,
        hours: &WorkingHours,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM working_hours WHERE barber_id = $1")
            .bind(barber_id)
            .execute(&mut **tx)
            .await?;
        for (day, shift, window) in hours.entries() {
            sqlx::query(
                r#"
                INSERT INTO working_hours (barber_id, day_of_week, shift, start_time, end_time)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(barber_id)
            .bind(day.index())
            .bind(shift.as_str())
            .bind(window.start)
            .bind(window.end)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryStore for DirectoryRepository {
    /// List all barbers with their hours and services
    async fn get_barbers(&self) -> AppResult<Vec<Barber>> {
        let rows = sqlx::query_as::<_, BarberRow>("SELECT id, name, image_ref FROM barbers ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        let mut hours = self.hours_by_barber(None).await?;
        let mut services = self.service_ids_by_barber(None).await?;

        let barbers = rows
            .into_iter()
            .filter(|row| {
                let valid = !row.name.trim().is_empty();
                if !valid {
                    tracing::warn!("Skipping barber {} with an empty name", row.id);
                }
                valid
            })
            .map(|row| Barber {
                working_hours: hours.remove(&row.id).unwrap_or_default(),
                service_ids: services.remove(&row.id).unwrap_or_default(),
                id: row.id,
                name: row.name,
                image_ref: row.image_ref,
            })
            .collect();
        Ok(barbers)
    }

    async fn get_barber(&self, id: i32) -> AppResult<Barber> {
        let row = self.barber_row(id).await?;
        let working_hours = self.hours_by_barber(Some(id)).await?.remove(&id).unwrap_or_default();
        let service_ids = self.service_ids_by_barber(Some(id)).await?.remove(&id).unwrap_or_default();
        Ok(Barber {
            id: row.id,
            name: row.name,
            image_ref: row.image_ref,
            working_hours,
            service_ids,
        })
    }

    /// List the full service catalog, ordered by name
    async fn get_services(&self) -> AppResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, name, duration_minutes, price FROM services ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(valid_services(rows))
    }

    async fn get_services_for_barber(&self, barber_id: i32) -> AppResult<Vec<Service>> {
        self.barber_row(barber_id).await?;
        let rows = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT s.id, s.name, s.duration_minutes, s.price
            FROM services s
            JOIN barber_services bs ON bs.service_id = s.id
            WHERE bs.barber_id = $1
            ORDER BY s.name, s.id
            "#,
        )
        .bind(barber_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(valid_services(rows))
    }

    async fn get_working_hours(&self, barber_id: i32) -> AppResult<WorkingHours> {
        self.barber_row(barber_id).await?;
        Ok(self
            .hours_by_barber(Some(barber_id))
            .await?
            .remove(&barber_id)
            .unwrap_or_default())
    }

    async fn get_blackout_dates(&self) -> AppResult<Vec<BlackoutDate>> {
        let rows = sqlx::query_as::<_, BlackoutDate>(
            "SELECT * FROM blackout_dates ORDER BY blackout_date, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_service(&self, data: &CreateService) -> AppResult<Service> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            INSERT INTO services (name, duration_minutes, price)
            VALUES ($1, $2, $3)
            RETURNING id, name, duration_minutes, price
            "#,
        )
        .bind(data.name.trim())
        .bind(data.duration_minutes)
        .bind(data.price)
        .fetch_one(&self.pool)
        .await?;
        Service::try_from(row).map_err(AppError::Validation)
    }

    async fn create_barber(&self, data: &CreateBarber) -> AppResult<Barber> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO barbers (name, image_ref) VALUES ($1, $2) RETURNING id",
        )
        .bind(data.name.trim())
        .bind(&data.image_ref)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_services(&mut tx, id, &data.service_ids).await?;
        Self::replace_hours(&mut tx, id, &data.working_hours).await?;
        tx.commit().await?;

        self.get_barber(id).await
    }

    async fn set_barber_services(&self, barber_id: i32, service_ids: Vec<i32>) -> AppResult<Barber> {
        self.barber_row(barber_id).await?;
        let mut tx = self.pool.begin().await?;
        Self::replace_services(&mut tx, barber_id, &service_ids).await?;
        tx.commit().await?;
        self.get_barber(barber_id).await
    }

    async fn set_working_hours(&self, barber_id: i32, hours: &WorkingHours) -> AppResult<Barber> {
        self.barber_row(barber_id).await?;
        let mut tx = self.pool.begin().await?;
        Self::replace_hours(&mut tx, barber_id, hours).await?;
        tx.commit().await?;
        self.get_barber(barber_id).await
    }

    async fn create_blackout_date(
        &self,
        date: NaiveDate,
        barber_id: Option<i32>,
        reason: Option<String>,
    ) -> AppResult<BlackoutDate> {
        let row = sqlx::query_as::<_, BlackoutDate>(
            "INSERT INTO blackout_dates (blackout_date, barber_id, reason) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(date)
        .bind(barber_id)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_blackout_date(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM blackout_dates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Blackout date {} not found", id)));
        }
        Ok(())
    }
}

/// Convert service rows, dropping the ones that break the catalog invariants
fn valid_services(rows: Vec<ServiceRow>) -> Vec<Service> {
    rows.into_iter()
        .filter_map(|row| match Service::try_from(row) {
            Ok(service) => Some(service),
            Err(e) => {
                tracing::warn!("Skipping malformed service: {}", e);
                None
            }
        })
        .collect()
}
