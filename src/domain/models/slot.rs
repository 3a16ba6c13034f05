//! Parking slot domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Vehicle type a slot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Bike,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Bike => "bike",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "car" => Some(Self::Car),
            "bike" => Some(Self::Bike),
            _ => None,
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Slot status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Free to book
    Available,
    /// Held by a non-terminal booking
    Booked,
    /// Closed by the owner/admin, not bookable
    Closed,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An individually bookable parking position of a fixed vehicle type.
///
/// Invariant: `current_booking_id` is `Some` if and only if
/// `status == Booked`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Unique slot ID
    pub id: String,
    /// Owning parking space ID
    pub parking_id: String,
    /// Display number (not unique across vehicle types)
    pub slot_number: u32,
    /// Vehicle type this slot accepts
    pub vehicle_type: VehicleType,
    /// Current status
    pub status: SlotStatus,
    /// Price per hour, frozen into bookings at creation time
    pub price_per_hour: f64,
    /// Booking currently occupying this slot
    pub current_booking_id: Option<String>,
    /// Scheduled end of the current booking
    pub booking_end_time: Option<DateTime<Utc>>,
}

impl Slot {
    pub fn new(
        id: impl Into<String>,
        parking_id: impl Into<String>,
        slot_number: u32,
        vehicle_type: VehicleType,
        price_per_hour: f64,
    ) -> Self {
        Self {
            id: id.into(),
            parking_id: parking_id.into(),
            slot_number,
            vehicle_type,
            status: SlotStatus::Available,
            price_per_hour,
            current_booking_id: None,
            booking_end_time: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    /// Transition `available -> booked`, recording the occupying booking.
    pub fn reserve(
        &mut self,
        booking_id: impl Into<String>,
        end_time: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.status != SlotStatus::Available {
            return Err(DomainError::SlotUnavailable(self.id.clone()));
        }
        self.status = SlotStatus::Booked;
        self.current_booking_id = Some(booking_id.into());
        self.booking_end_time = Some(end_time);
        Ok(())
    }

    /// Transition back to `available`, clearing the booking reference.
    ///
    /// Returns `false` (no-op) if the slot was already available, so the
    /// caller knows whether the aggregate count changed.
    pub fn release(&mut self) -> bool {
        if self.status == SlotStatus::Available {
            return false;
        }
        self.status = SlotStatus::Available;
        self.current_booking_id = None;
        self.booking_end_time = None;
        true
    }

    /// Administrative close. Booked slots cannot be closed.
    pub fn close(&mut self) -> DomainResult<()> {
        if self.status == SlotStatus::Booked {
            return Err(DomainError::SlotOccupied(self.id.clone()));
        }
        self.status = SlotStatus::Closed;
        Ok(())
    }

    /// Administrative reopen, `closed -> available` only. A booked slot
    /// cannot be opened; the occupying booking must release it first.
    ///
    /// Returns `false` (no-op) if the slot was already available, so the
    /// caller knows whether the aggregate count changed.
    pub fn open(&mut self) -> DomainResult<bool> {
        match self.status {
            SlotStatus::Available => Ok(false),
            SlotStatus::Booked => Err(DomainError::SlotOccupied(self.id.clone())),
            SlotStatus::Closed => {
                self.status = SlotStatus::Available;
                Ok(true)
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
