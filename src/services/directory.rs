//! Directory service: catalog reads and salon administration

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        barber::{Barber, CreateBarber},
        schedule::{BlackoutDate, CreateBlackoutDate, WorkingHours},
        service::{CreateService, Service},
    },
    repository::DirectoryStore,
};

#[derive(Clone)]
pub struct DirectoryService {
    directory: Arc<dyn DirectoryStore>,
}

impl DirectoryService {
    pub fn new(directory: Arc<dyn DirectoryStore>) -> Self {
        Self { directory }
    }

    // ---- Catalog ----
    pub async fn list_services(&self) -> AppResult<Vec<Service>> {
        self.directory.get_services().await.map_err(AppError::into_directory)
    }

    pub async fn list_barbers(&self) -> AppResult<Vec<Barber>> {
        self.directory.get_barbers().await.map_err(AppError::into_directory)
    }

    pub async fn get_barber(&self, id: i32) -> AppResult<Barber> {
        self.directory.get_barber(id).await.map_err(AppError::into_directory)
    }

    /// Services offered by a barber; the whole catalog for "any barber"
    pub async fn services_for(&self, barber_id: Option<i32>) -> AppResult<Vec<Service>> {
        match barber_id {
            Some(id) => self.directory.get_services_for_barber(id).await,
            None => self.directory.get_services().await,
        }
        .map_err(AppError::into_directory)
    }

    // ---- Administration ----
    pub async fn create_service(&self, data: &CreateService) -> AppResult<Service> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if data.price.is_sign_negative() {
            return Err(AppError::Validation("Price cannot be negative".to_string()));
        }

        let service = self.directory.create_service(data).await?;
        tracing::info!("Service {} '{}' created", service.id, service.name);
        Ok(service)
    }

    pub async fn create_barber(&self, data: &CreateBarber) -> AppResult<Barber> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.check_service_ids(&data.service_ids).await?;

        let barber = self.directory.create_barber(data).await?;
        tracing::info!("Barber {} '{}' created", barber.id, barber.name);
        Ok(barber)
    }

    pub async fn set_barber_services(&self, barber_id: i32, service_ids: Vec<i32>) -> AppResult<Barber> {
        self.check_service_ids(&service_ids).await?;
        self.directory.set_barber_services(barber_id, service_ids).await
    }

    pub async fn set_working_hours(&self, barber_id: i32, hours: &WorkingHours) -> AppResult<Barber> {
        let barber = self.directory.set_working_hours(barber_id, hours).await?;
        tracing::info!("Working hours of barber {} replaced ({} windows)", barber_id, hours.entries().len());
        Ok(barber)
    }

    /// Reject IDs that are not in the service catalog
    async fn check_service_ids(&self, service_ids: &[i32]) -> AppResult<()> {
        if service_ids.is_empty() {
            return Ok(());
        }
        let known: HashSet<i32> = self.list_services().await?.iter().map(|s| s.id).collect();
        let unknown: Vec<String> = service_ids
            .iter()
            .filter(|id| !known.contains(id))
            .map(|id| id.to_string())
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!("Unknown services: {}", unknown.join(", "))))
        }
    }

    // ---- Blackout dates ----
    pub async fn list_blackout_dates(&self) -> AppResult<Vec<BlackoutDate>> {
        self.directory.get_blackout_dates().await.map_err(AppError::into_directory)
    }

    pub async fn create_blackout_date(&self, data: CreateBlackoutDate) -> AppResult<BlackoutDate> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let date = NaiveDate::parse_from_str(data.date.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid date (use YYYY-MM-DD)".to_string()))?;
        if let Some(id) = data.barber_id {
            self.directory.get_barber(id).await?;
        }

        let blackout = self
            .directory
            .create_blackout_date(date, data.barber_id, data.reason)
            .await?;
        tracing::info!("Blackout date {} added (barber {:?})", blackout.date, blackout.barber_id);
        Ok(blackout)
    }

    pub async fn delete_blackout_date(&self, id: i32) -> AppResult<()> {
        self.directory.delete_blackout_date(id).await
    }
}
