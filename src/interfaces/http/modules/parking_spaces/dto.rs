//! Parking space DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::models::{ParkingSpace, Slot};

/// Request to register a parking space
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterParkingSpaceRequest {
    /// Owning user ID
    #[validate(length(min = 1))]
    pub owner_id: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 240))]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// free | paid | open | underground | covered
    pub parking_type: String,
    /// commercial | free | private
    pub category: String,
    /// Number of car slots to generate
    #[validate(range(max = 10_000))]
    pub car_slots: u32,
    #[validate(range(min = 0.0))]
    pub car_price_per_hour: f64,
    /// Number of bike slots to generate
    #[validate(range(max = 10_000))]
    pub bike_slots: u32,
    #[validate(range(min = 0.0))]
    pub bike_price_per_hour: f64,
    pub description: Option<String>,
}

/// Request to edit a parking space. Omitted fields stay unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateParkingSpaceRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 240))]
    pub address: Option<String>,
    pub description: Option<String>,
    /// Set `false` to stop accepting new bookings
    pub is_open: Option<bool>,
}

/// Slot details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotDto {
    pub id: String,
    pub slot_number: u32,
    pub vehicle_type: String,
    pub status: String,
    pub price_per_hour: f64,
    pub current_booking_id: Option<String>,
    pub booking_end_time: Option<String>,
}

impl From<Slot> for SlotDto {
    fn from(s: Slot) -> Self {
        Self {
            id: s.id,
            slot_number: s.slot_number,
            vehicle_type: s.vehicle_type.as_str().to_string(),
            status: s.status.as_str().to_string(),
            price_per_hour: s.price_per_hour,
            current_booking_id: s.current_booking_id,
            booking_end_time: s.booking_end_time.map(|t| t.to_rfc3339()),
        }
    }
}

/// Parking space details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ParkingSpaceDto {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub parking_type: String,
    pub category: String,
    pub vehicle_types: Vec<String>,
    pub total_slots: u32,
    pub available_slots: u32,
    pub price_per_hour: f64,
    pub rating: f64,
    pub is_open: bool,
    pub slots: Vec<SlotDto>,
    pub description: Option<String>,
    /// Distance from the query point in km, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl ParkingSpaceDto {
    pub fn from_space(space: ParkingSpace, distance_km: Option<f64>) -> Self {
        Self {
            id: space.id,
            owner_id: space.owner_id,
            name: space.name,
            address: space.address,
            latitude: space.coordinates.0,
            longitude: space.coordinates.1,
            parking_type: space.parking_type.as_str().to_string(),
            category: space.category.as_str().to_string(),
            vehicle_types: space
                .vehicle_types
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            total_slots: space.total_slots,
            available_slots: space.available_slots,
            price_per_hour: space.price_per_hour,
            rating: space.rating,
            is_open: space.is_open,
            slots: space.slots.into_iter().map(SlotDto::from).collect(),
            description: space.description,
            distance_km,
        }
    }
}

/// Query for listing parking spaces
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ParkingListQuery {
    /// Latitude of the reference point for distance sorting
    pub lat: Option<f64>,
    /// Longitude of the reference point for distance sorting
    pub lng: Option<f64>,
    /// Restrict to one owner's spaces
    pub owner_id: Option<String>,
}
