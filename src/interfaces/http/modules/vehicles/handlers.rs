//! Vehicle HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::domain::models::{Vehicle, VehicleType};
use crate::domain::{DomainError, RepositoryProvider};
use crate::interfaces::http::common::{bad_request, domain_error, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for vehicle handlers.
#[derive(Clone)]
pub struct VehicleAppState {
    pub repos: Arc<dyn RepositoryProvider>,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    request_body = RegisterVehicleRequest,
    responses(
        (status = 200, description = "Vehicle registered", body = ApiResponse<VehicleDto>),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn register_vehicle(
    State(state): State<VehicleAppState>,
    ValidatedJson(request): ValidatedJson<RegisterVehicleRequest>,
) -> HandlerResult<VehicleDto> {
    let Some(vehicle_type) = VehicleType::parse(&request.vehicle_type) else {
        return Err(bad_request(format!(
            "Unknown vehicle type '{}'",
            request.vehicle_type
        )));
    };

    let vehicle = Vehicle::new(
        Uuid::new_v4().to_string(),
        request.user_id,
        vehicle_type,
        request.number,
        request.model,
    );
    state
        .repos
        .vehicles()
        .save(vehicle.clone())
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(vehicle.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{vehicle_id}",
    tag = "Vehicles",
    params(("vehicle_id" = String, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle details", body = ApiResponse<VehicleDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_vehicle(
    State(state): State<VehicleAppState>,
    Path(vehicle_id): Path<String>,
) -> HandlerResult<VehicleDto> {
    let vehicle = state
        .repos
        .vehicles()
        .find_by_id(&vehicle_id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| domain_error(DomainError::not_found("Vehicle", &vehicle_id)))?;
    Ok(Json(ApiResponse::success(vehicle.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    params(VehicleListQuery),
    responses(
        (status = 200, description = "User's vehicles", body = ApiResponse<Vec<VehicleDto>>)
    )
)]
pub async fn list_vehicles(
    State(state): State<VehicleAppState>,
    Query(query): Query<VehicleListQuery>,
) -> HandlerResult<Vec<VehicleDto>> {
    let vehicles = state
        .repos
        .vehicles()
        .find_by_user(&query.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        vehicles.into_iter().map(VehicleDto::from).collect(),
    )))
}
