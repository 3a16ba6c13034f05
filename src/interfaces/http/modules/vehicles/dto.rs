//! Vehicle DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::models::Vehicle;

/// Request to register a vehicle
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterVehicleRequest {
    /// Owning user ID
    #[validate(length(min = 1))]
    pub user_id: String,
    /// car | bike
    #[validate(length(min = 1))]
    pub vehicle_type: String,
    /// Registration number
    #[validate(length(min = 1, max = 32))]
    pub number: String,
    pub model: Option<String>,
}

/// Vehicle details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleDto {
    pub id: String,
    pub user_id: String,
    pub vehicle_type: String,
    pub number: String,
    pub model: Option<String>,
}

impl From<Vehicle> for VehicleDto {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            vehicle_type: v.vehicle_type.as_str().to_string(),
            number: v.number,
            model: v.model,
        }
    }
}

/// Query for listing vehicles
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct VehicleListQuery {
    /// Owning user ID
    pub user_id: String,
}
