//! Domain errors

use thiserror::Error;

use crate::domain::models::{BookingStatus, VehicleType};

/// Domain-level error types
#[derive(Debug, Error)]
pub enum DomainError {
    /// Slot is not in the `available` state
    #[error("Slot {0} is not available")]
    SlotUnavailable(String),

    /// Attempt to close a slot that holds a booking
    #[error("Slot {0} is occupied by a booking")]
    SlotOccupied(String),

    /// Booking attempted on a space that is not accepting bookings
    #[error("Parking space {0} is closed")]
    SpaceClosed(String),

    /// Vehicle type does not match the slot's vehicle type
    #[error("Vehicle type {vehicle} does not match slot type {slot}")]
    InvalidVehicle {
        vehicle: VehicleType,
        slot: VehicleType,
    },

    /// Unknown entity
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Transition attempted on a booking already in a terminal state
    #[error("Booking {id} is already {status}")]
    AlreadyTerminal { id: String, status: BookingStatus },

    /// End time is not after start time
    #[error("Invalid time range: end time must be after start time")]
    InvalidTimeRange,

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: value.into(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
