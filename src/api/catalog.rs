//! Catalog endpoints: services and barbers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{barber::Barber, service::Service},
};

use super::AuthenticatedUser;

/// List the service catalog
#[utoipa::path(
    get,
    path = "/services",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Services", body = Vec<Service>)
    )
)]
pub async fn list_services(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Service>>> {
    let services = state.services.directory.list_services().await?;
    Ok(Json(services))
}

/// List barbers with their working hours
#[utoipa::path(
    get,
    path = "/barbers",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Barbers", body = Vec<Barber>)
    )
)]
pub async fn list_barbers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Barber>>> {
    let barbers = state.services.directory.list_barbers().await?;
    Ok(Json(barbers))
}

/// Get a barber
#[utoipa::path(
    get,
    path = "/barbers/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Barber ID")),
    responses(
        (status = 200, description = "Barber", body = Barber),
        (status = 404, description = "Barber not found")
    )
)]
pub async fn get_barber(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Barber>> {
    let barber = state.services.directory.get_barber(id).await?;
    Ok(Json(barber))
}

/// List the services a barber offers
#[utoipa::path(
    get,
    path = "/barbers/{id}/services",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Barber ID")),
    responses(
        (status = 200, description = "Services offered by the barber", body = Vec<Service>),
        (status = 404, description = "Barber not found")
    )
)]
pub async fn list_barber_services(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Service>>> {
    let services = state.services.directory.services_for(Some(id)).await?;
    Ok(Json(services))
}
