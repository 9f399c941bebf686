//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, availability, bookings, catalog, health};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salon Booking API",
        version = "1.0.0",
        description = "Barber appointment availability and booking REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::list_services,
        catalog::list_barbers,
        catalog::get_barber,
        catalog::list_barber_services,
        // Bookings
        availability::get_availability,
        bookings::create_booking,
        bookings::create_weekly_booking,
        bookings::my_bookings,
        // Admin
        admin::create_service,
        admin::create_barber,
        admin::update_barber_services,
        admin::update_working_hours,
        admin::list_blackouts,
        admin::create_blackout,
        admin::delete_blackout,
    ),
    components(
        schemas(
            crate::models::service::Service,
            crate::models::service::CreateService,
            crate::models::barber::Barber,
            crate::models::barber::CreateBarber,
            crate::models::barber::UpdateBarberServices,
            crate::models::schedule::DayOfWeek,
            crate::models::schedule::DaySchedule,
            crate::models::schedule::WorkingHours,
            crate::models::schedule::TimeWindow,
            crate::models::schedule::BlackoutDate,
            crate::models::schedule::CreateBlackoutDate,
            crate::models::booking::Booking,
            crate::models::booking::BookingRequest,
            crate::models::booking::WeeklyBookingRequest,
            crate::models::booking::WeeklyBookingReport,
            crate::models::booking::WeeklyBookingFailure,
            crate::models::booking::AvailabilityQuery,
            crate::models::booking::AvailabilityResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Services and barbers"),
        (name = "bookings", description = "Availability and appointments"),
        (name = "admin", description = "Salon administration")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
