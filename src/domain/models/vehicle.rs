//! Vehicle domain entity

use serde::{Deserialize, Serialize};

use crate::domain::models::VehicleType;

/// A customer's registered vehicle. Bookings are validated against the
/// vehicle's type so a bike cannot take a car slot (and vice versa).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique vehicle ID
    pub id: String,
    /// Owning user
    pub user_id: String,
    pub vehicle_type: VehicleType,
    /// Registration number
    pub number: String,
    pub model: Option<String>,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        vehicle_type: VehicleType,
        number: impl Into<String>,
        model: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            vehicle_type,
            number: number.into(),
            model,
        }
    }
}
