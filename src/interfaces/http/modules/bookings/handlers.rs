//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::services::{BookingService, CreateBooking};
use crate::domain::models::PaymentMethod;
use crate::interfaces::http::common::{bad_request, domain_error, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub service: Arc<BookingService>,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created", body = ApiResponse<BookingDto>),
        (status = 404, description = "Unknown parking space, slot or vehicle"),
        (status = 409, description = "Slot is not available"),
        (status = 422, description = "Invalid time range or vehicle type mismatch")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> HandlerResult<BookingDto> {
    let Some(payment_method) = PaymentMethod::parse(&request.payment_method) else {
        return Err(bad_request(format!(
            "Unknown payment method '{}'",
            request.payment_method
        )));
    };

    let booking = state
        .service
        .create(CreateBooking {
            user_id: request.user_id,
            parking_id: request.parking_id,
            slot_id: request.slot_id,
            vehicle_id: request.vehicle_id,
            start_time: request.start_time,
            end_time: request.end_time,
            payment_method,
        })
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/cancel",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already completed or cancelled")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> HandlerResult<BookingDto> {
    let booking = state
        .service
        .cancel(&booking_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/complete",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking completed", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already completed or cancelled")
    )
)]
pub async fn complete_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> HandlerResult<BookingDto> {
    let booking = state
        .service
        .complete(&booking_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(booking_id): Path<String>,
) -> HandlerResult<BookingDto> {
    let booking = state.service.get(&booking_id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(BookingListQuery),
    responses(
        (status = 200, description = "Bookings", body = ApiResponse<Vec<BookingDto>>)
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Query(query): Query<BookingListQuery>,
) -> HandlerResult<Vec<BookingDto>> {
    let bookings = match query.user_id {
        Some(user_id) => state.service.list_for_user(&user_id).await,
        None => state.service.list().await,
    }
    .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}
