//! API handlers for the booking REST endpoints

pub mod admin;
pub mod availability;
pub mod bookings;
pub mod catalog;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::auth::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalog (writes are admin only)
        .route("/services", get(catalog::list_services).post(admin::create_service))
        .route("/barbers", get(catalog::list_barbers).post(admin::create_barber))
        .route("/barbers/:id", get(catalog::get_barber))
        .route(
            "/barbers/:id/services",
            get(catalog::list_barber_services).put(admin::update_barber_services),
        )
        .route("/barbers/:id/working-hours", put(admin::update_working_hours))
        // Availability and bookings
        .route("/availability", get(availability::get_availability))
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/weekly", post(bookings::create_weekly_booking))
        .route("/bookings/me", get(bookings::my_bookings))
        // Blackout dates
        .route("/blackouts", get(admin::list_blackouts).post(admin::create_blackout))
        .route("/blackouts/:id", delete(admin::delete_blackout))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
