//! Parking space HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::services::{ParkingSpaceService, RegisterParkingSpace, UpdateParkingSpace};
use crate::domain::models::{ParkingCategory, ParkingType};
use crate::interfaces::http::common::{
    bad_request, domain_error, ApiResponse, EmptyData, ValidatedJson,
};

use super::dto::*;

/// Application state for parking space handlers.
#[derive(Clone)]
pub struct ParkingAppState {
    pub service: Arc<ParkingSpaceService>,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

#[utoipa::path(
    post,
    path = "/api/v1/parking-spaces",
    tag = "Parking spaces",
    request_body = RegisterParkingSpaceRequest,
    responses(
        (status = 200, description = "Parking space registered", body = ApiResponse<ParkingSpaceDto>),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn register_parking_space(
    State(state): State<ParkingAppState>,
    ValidatedJson(request): ValidatedJson<RegisterParkingSpaceRequest>,
) -> HandlerResult<ParkingSpaceDto> {
    let Some(parking_type) = ParkingType::parse(&request.parking_type) else {
        return Err(bad_request(format!(
            "Unknown parking type '{}'",
            request.parking_type
        )));
    };
    let Some(category) = ParkingCategory::parse(&request.category) else {
        return Err(bad_request(format!(
            "Unknown category '{}'",
            request.category
        )));
    };
    if request.car_slots + request.bike_slots == 0 {
        return Err(bad_request("A parking space needs at least one slot"));
    }

    let space = state
        .service
        .register(RegisterParkingSpace {
            owner_id: request.owner_id,
            name: request.name,
            address: request.address,
            latitude: request.latitude,
            longitude: request.longitude,
            parking_type,
            category,
            car_slots: request.car_slots,
            car_price_per_hour: request.car_price_per_hour,
            bike_slots: request.bike_slots,
            bike_price_per_hour: request.bike_price_per_hour,
            description: request.description,
        })
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(ParkingSpaceDto::from_space(
        space, None,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-spaces",
    tag = "Parking spaces",
    params(ParkingListQuery),
    responses(
        (status = 200, description = "Parking spaces, nearest first when lat/lng given", body = ApiResponse<Vec<ParkingSpaceDto>>)
    )
)]
pub async fn list_parking_spaces(
    State(state): State<ParkingAppState>,
    Query(query): Query<ParkingListQuery>,
) -> HandlerResult<Vec<ParkingSpaceDto>> {
    let near = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        (None, None) => None,
        _ => return Err(bad_request("lat and lng must be given together")),
    };

    let spaces = match query.owner_id {
        Some(owner_id) => state.service.list_by_owner(&owner_id).await,
        None => state.service.list(near).await,
    }
    .map_err(domain_error)?;

    let dtos = spaces
        .into_iter()
        .map(|s| {
            let distance = near.map(|(lat, lng)| s.distance_km(lat, lng));
            ParkingSpaceDto::from_space(s, distance)
        })
        .collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-spaces/{parking_id}",
    tag = "Parking spaces",
    params(("parking_id" = String, Path, description = "Parking space ID")),
    responses(
        (status = 200, description = "Parking space details", body = ApiResponse<ParkingSpaceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_parking_space(
    State(state): State<ParkingAppState>,
    Path(parking_id): Path<String>,
) -> HandlerResult<ParkingSpaceDto> {
    let space = state.service.get(&parking_id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ParkingSpaceDto::from_space(
        space, None,
    ))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/parking-spaces/{parking_id}",
    tag = "Parking spaces",
    params(("parking_id" = String, Path, description = "Parking space ID")),
    request_body = UpdateParkingSpaceRequest,
    responses(
        (status = 200, description = "Parking space updated", body = ApiResponse<ParkingSpaceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_parking_space(
    State(state): State<ParkingAppState>,
    Path(parking_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateParkingSpaceRequest>,
) -> HandlerResult<ParkingSpaceDto> {
    let space = state
        .service
        .update_space(
            &parking_id,
            UpdateParkingSpace {
                name: request.name,
                address: request.address,
                description: request.description,
                is_open: request.is_open,
            },
        )
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ParkingSpaceDto::from_space(
        space, None,
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parking-spaces/{parking_id}",
    tag = "Parking spaces",
    params(("parking_id" = String, Path, description = "Parking space ID")),
    responses(
        (status = 200, description = "Parking space deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_parking_space(
    State(state): State<ParkingAppState>,
    Path(parking_id): Path<String>,
) -> HandlerResult<EmptyData> {
    state
        .service
        .delete(&parking_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking-spaces/{parking_id}/slots/{slot_id}/close",
    tag = "Parking spaces",
    params(
        ("parking_id" = String, Path, description = "Parking space ID"),
        ("slot_id" = String, Path, description = "Slot ID")
    ),
    responses(
        (status = 200, description = "Slot closed", body = ApiResponse<EmptyData>),
        (status = 404, description = "Unknown space or slot"),
        (status = 409, description = "Slot is occupied by a booking")
    )
)]
pub async fn close_slot(
    State(state): State<ParkingAppState>,
    Path((parking_id, slot_id)): Path<(String, String)>,
) -> HandlerResult<EmptyData> {
    state
        .service
        .close_slot(&parking_id, &slot_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking-spaces/{parking_id}/slots/{slot_id}/open",
    tag = "Parking spaces",
    params(
        ("parking_id" = String, Path, description = "Parking space ID"),
        ("slot_id" = String, Path, description = "Slot ID")
    ),
    responses(
        (status = 200, description = "Slot opened", body = ApiResponse<EmptyData>),
        (status = 404, description = "Unknown space or slot")
    )
)]
pub async fn open_slot(
    State(state): State<ParkingAppState>,
    Path((parking_id, slot_id)): Path<(String, String)>,
) -> HandlerResult<EmptyData> {
    state
        .service
        .open_slot(&parking_id, &slot_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
