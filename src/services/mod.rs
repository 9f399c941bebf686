//! Business logic services

pub mod availability;
pub mod directory;
pub mod slots;

use std::sync::Arc;

use crate::{
    config::BookingConfig,
    repository::{BookingStore, DirectoryStore, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub directory: directory::DirectoryService,
}

impl Services {
    /// Create all services backed by the PostgreSQL repository
    pub fn new(repository: Repository, booking_config: BookingConfig) -> Self {
        Self::from_stores(
            Arc::new(repository.directory),
            Arc::new(repository.bookings),
            booking_config,
        )
    }

    /// Create all services on top of arbitrary store implementations
    pub fn from_stores(
        directory_store: Arc<dyn DirectoryStore>,
        booking_store: Arc<dyn BookingStore>,
        booking_config: BookingConfig,
    ) -> Self {
        Self {
            availability: availability::AvailabilityService::new(
                directory_store.clone(),
                booking_store,
                booking_config,
            ),
            directory: directory::DirectoryService::new(directory_store),
        }
    }
}
