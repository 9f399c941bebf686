//! Salon administration endpoints (admin role)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        barber::{Barber, CreateBarber, UpdateBarberServices},
        schedule::{BlackoutDate, CreateBlackoutDate, WorkingHours},
        service::{CreateService, Service},
    },
};

use super::AuthenticatedUser;

/// Create a service
#[utoipa::path(
    post,
    path = "/services",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateService,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 403, description = "Admin rights required")
    )
)]
pub async fn create_service(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateService>,
) -> AppResult<(StatusCode, Json<Service>)> {
    claims.require_admin()?;
    let service = state.services.directory.create_service(&data).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// Create a barber
#[utoipa::path(
    post,
    path = "/barbers",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateBarber,
    responses(
        (status = 201, description = "Barber created", body = Barber),
        (status = 403, description = "Admin rights required")
    )
)]
pub async fn create_barber(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBarber>,
) -> AppResult<(StatusCode, Json<Barber>)> {
    claims.require_admin()?;
    let barber = state.services.directory.create_barber(&data).await?;
    Ok((StatusCode::CREATED, Json(barber)))
}

/// Replace the services a barber offers
#[utoipa::path(
    put,
    path = "/barbers/{id}/services",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Barber ID")),
    request_body = UpdateBarberServices,
    responses(
        (status = 200, description = "Barber updated", body = Barber)
    )
)]
pub async fn update_barber_services(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBarberServices>,
) -> AppResult<Json<Barber>> {
    claims.require_admin()?;
    let barber = state.services.directory.set_barber_services(id, data.service_ids).await?;
    Ok(Json(barber))
}

/// Replace a barber's weekly working hours
#[utoipa::path(
    put,
    path = "/barbers/{id}/working-hours",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Barber ID")),
    request_body = WorkingHours,
    responses(
        (status = 200, description = "Barber updated", body = Barber),
        (status = 400, description = "Invalid time window")
    )
)]
pub async fn update_working_hours(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(hours): Json<WorkingHours>,
) -> AppResult<Json<Barber>> {
    claims.require_admin()?;
    let barber = state.services.directory.set_working_hours(id, &hours).await?;
    Ok(Json(barber))
}

/// List blackout dates
#[utoipa::path(
    get,
    path = "/blackouts",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Blackout dates", body = Vec<BlackoutDate>),
        (status = 403, description = "Admin rights required")
    )
)]
pub async fn list_blackouts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BlackoutDate>>> {
    claims.require_admin()?;
    let blackouts = state.services.directory.list_blackout_dates().await?;
    Ok(Json(blackouts))
}

/// Add a blackout date
#[utoipa::path(
    post,
    path = "/blackouts",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateBlackoutDate,
    responses(
        (status = 201, description = "Blackout date created", body = BlackoutDate)
    )
)]
pub async fn create_blackout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBlackoutDate>,
) -> AppResult<(StatusCode, Json<BlackoutDate>)> {
    claims.require_admin()?;
    let blackout = state.services.directory.create_blackout_date(data).await?;
    Ok((StatusCode::CREATED, Json(blackout)))
}

/// Remove a blackout date
#[utoipa::path(
    delete,
    path = "/blackouts/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Blackout date ID")),
    responses(
        (status = 204, description = "Blackout date deleted")
    )
)]
pub async fn delete_blackout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.directory.delete_blackout_date(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
