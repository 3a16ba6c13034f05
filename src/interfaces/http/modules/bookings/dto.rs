//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::models::Booking;

/// Request to create a new booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    /// Booking user ID
    #[validate(length(min = 1))]
    pub user_id: String,
    /// Parking space ID
    #[validate(length(min = 1))]
    pub parking_id: String,
    /// Slot to reserve
    #[validate(length(min = 1))]
    pub slot_id: String,
    /// Vehicle the booking is for; its type must match the slot's
    #[validate(length(min = 1))]
    pub vehicle_id: String,
    /// Start of the reserved interval (ISO 8601)
    pub start_time: DateTime<Utc>,
    /// End of the reserved interval (ISO 8601)
    pub end_time: DateTime<Utc>,
    /// Payment method: upi | qr | netbanking | cash | card
    #[validate(length(min = 1))]
    pub payment_method: String,
}

/// Booking details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub user_id: String,
    pub parking_id: String,
    pub slot_id: String,
    pub vehicle_id: String,
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_hours: i64,
    pub total_price: f64,
    pub payment_method: String,
    pub status: String,
    pub created_at: String,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            parking_id: b.parking_id,
            slot_id: b.slot_id,
            vehicle_id: b.vehicle_id,
            vehicle_number: b.vehicle_number,
            vehicle_type: b.vehicle_type.as_str().to_string(),
            start_time: b.start_time.to_rfc3339(),
            end_time: b.end_time.to_rfc3339(),
            duration_hours: b.duration_hours,
            total_price: b.total_price,
            payment_method: b.payment_method.as_str().to_string(),
            status: b.status.as_str().to_string(),
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

/// Query for listing bookings
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BookingListQuery {
    /// Restrict to one user's bookings
    pub user_id: Option<String>,
}
