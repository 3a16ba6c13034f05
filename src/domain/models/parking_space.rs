//! Parking space aggregate
//!
//! Owns the slots of one parking space and the cached `available_slots`
//! count. Every slot transition goes through a method on this aggregate so
//! the count is adjusted in the same step as the slot status change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{Slot, SlotStatus, VehicleType};
use crate::domain::{DomainError, DomainResult};

/// Physical kind of parking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParkingType {
    Free,
    Paid,
    Open,
    Underground,
    Covered,
}

impl ParkingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Paid => "paid",
            Self::Open => "open",
            Self::Underground => "underground",
            Self::Covered => "covered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "paid" => Some(Self::Paid),
            "open" => Some(Self::Open),
            "underground" => Some(Self::Underground),
            "covered" => Some(Self::Covered),
            _ => None,
        }
    }
}

/// Ownership category of a parking space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParkingCategory {
    Commercial,
    Free,
    Private,
}

impl ParkingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::Free => "free",
            Self::Private => "private",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "commercial" => Some(Self::Commercial),
            "free" => Some(Self::Free),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// A parking space with its slots.
///
/// `available_slots` is denormalized from the per-slot statuses. It must
/// always equal `count(slots where status == available)`; the slot
/// transition methods below keep it in lockstep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSpace {
    /// Unique parking space ID
    pub id: String,
    /// Owning user
    pub owner_id: String,
    pub name: String,
    pub address: String,
    /// (latitude, longitude)
    pub coordinates: (f64, f64),
    pub parking_type: ParkingType,
    pub category: ParkingCategory,
    /// Vehicle types this space serves
    pub vehicle_types: Vec<VehicleType>,
    /// Total number of slots (all statuses)
    pub total_slots: u32,
    /// Cached count of `available` slots
    pub available_slots: u32,
    /// Headline price per hour shown in listings
    pub price_per_hour: f64,
    pub rating: f64,
    /// Whether the space accepts bookings at all
    pub is_open: bool,
    pub slots: Vec<Slot>,
    pub description: Option<String>,
}

impl ParkingSpace {
    pub fn slot(&self, slot_id: &str) -> DomainResult<&Slot> {
        self.slots
            .iter()
            .find(|s| s.id == slot_id)
            .ok_or_else(|| DomainError::not_found("Slot", slot_id))
    }

    fn slot_mut(&mut self, slot_id: &str) -> DomainResult<&mut Slot> {
        self.slots
            .iter_mut()
            .find(|s| s.id == slot_id)
            .ok_or_else(|| DomainError::not_found("Slot", slot_id))
    }

    /// Count of `available` slots computed from per-slot state. The cached
    /// `available_slots` must always match this.
    pub fn computed_available(&self) -> u32 {
        self.slots.iter().filter(|s| s.is_available()).count() as u32
    }

    /// Reserve a slot for a booking, decrementing `available_slots` in the
    /// same step.
    pub fn reserve_slot(
        &mut self,
        slot_id: &str,
        booking_id: &str,
        end_time: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.slot_mut(slot_id)?.reserve(booking_id, end_time)?;
        self.available_slots -= 1;
        Ok(())
    }

    /// Release a slot back to `available`, incrementing `available_slots`.
    /// No-op (count untouched) if the slot is already available.
    pub fn release_slot(&mut self, slot_id: &str) -> DomainResult<()> {
        if self.slot_mut(slot_id)?.release() {
            self.available_slots += 1;
        }
        Ok(())
    }

    /// Close a slot for maintenance. Fails with `SlotOccupied` while a
    /// booking holds it; the owner must wait for release or cancel the
    /// booking first.
    pub fn close_slot(&mut self, slot_id: &str) -> DomainResult<()> {
        let slot = self.slot_mut(slot_id)?;
        let was_available = slot.is_available();
        slot.close()?;
        if was_available {
            self.available_slots -= 1;
        }
        Ok(())
    }

    /// Reopen a closed slot. No-op if the slot is already available;
    /// rejected with `SlotOccupied` while a booking holds it, since open
    /// must never sever a live booking's hold on its slot.
    pub fn open_slot(&mut self, slot_id: &str) -> DomainResult<()> {
        if self.slot_mut(slot_id)?.open()? {
            self.available_slots += 1;
        }
        Ok(())
    }

    /// Great-circle distance to a point in kilometres. Good enough for
    /// sorting listings; not a geodesy library.
    pub fn distance_km(&self, lat: f64, lng: f64) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;
        let (lat1, lng1) = (self.coordinates.0.to_radians(), self.coordinates.1.to_radians());
        let (lat2, lng2) = (lat.to_radians(), lng.to_radians());
        let dlat = lat2 - lat1;
        let dlng = lng2 - lng1;
        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Check the availability invariant. Used by tests and the startup
    /// snapshot load.
    pub fn is_consistent(&self) -> bool {
        self.available_slots == self.computed_available()
            && self.total_slots as usize == self.slots.len()
            && self.slots.iter().all(|s| {
                s.current_booking_id.is_some() == (s.status == SlotStatus::Booked)
            })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_space() -> ParkingSpace {
        let slots = vec![
            Slot::new("slot-1", "parking-1", 1, VehicleType::Car, 10.0),
            Slot::new("slot-2", "parking-1", 2, VehicleType::Car, 10.0),
            Slot::new("slot-3", "parking-1", 1, VehicleType::Bike, 4.0),
        ];
        ParkingSpace {
            id: "parking-1".to_string(),
            owner_id: "owner-1".to_string(),
            name: "Central Plaza".to_string(),
            address: "12 Main St".to_string(),
            coordinates: (12.9716, 77.5946),
            parking_type: ParkingType::Covered,
            category: ParkingCategory::Commercial,
            vehicle_types: vec![VehicleType::Car, VehicleType::Bike],
            total_slots: 3,
            available_slots: 3,
            price_per_hour: 10.0,
            rating: 4.5,
            is_open: true,
            slots,
            description: None,
        }
    }

    #[test]
    fn reserve_decrements_available_count() {
        let mut p = sample_space();
        p.reserve_slot("slot-1", "booking-1", Utc::now() + Duration::hours(1))
            .unwrap();
        assert_eq!(p.available_slots, 2);
        assert!(p.is_consistent());
    }

    #[test]
    fn reserve_then_release_restores_count() {
        let mut p = sample_space();
        let before = p.available_slots;
        p.reserve_slot("slot-1", "booking-1", Utc::now()).unwrap();
        p.release_slot("slot-1").unwrap();
        assert_eq!(p.available_slots, before);
        assert!(p.slot("slot-1").unwrap().is_available());
        assert!(p.is_consistent());
    }

    #[test]
    fn double_release_does_not_double_increment() {
        let mut p = sample_space();
        p.reserve_slot("slot-1", "booking-1", Utc::now()).unwrap();
        p.release_slot("slot-1").unwrap();
        p.release_slot("slot-1").unwrap();
        assert_eq!(p.available_slots, 3);
        assert!(p.is_consistent());
    }

    #[test]
    fn reserve_booked_slot_leaves_state_unchanged() {
        let mut p = sample_space();
        p.reserve_slot("slot-1", "booking-1", Utc::now()).unwrap();
        let err = p
            .reserve_slot("slot-1", "booking-2", Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotUnavailable(_)));
        assert_eq!(p.available_slots, 2);
        assert!(p.is_consistent());
    }

    #[test]
    fn close_available_slot_decrements_count() {
        let mut p = sample_space();
        p.close_slot("slot-2").unwrap();
        assert_eq!(p.available_slots, 2);
        assert_eq!(p.slot("slot-2").unwrap().status, SlotStatus::Closed);
        assert!(p.is_consistent());
    }

    #[test]
    fn close_booked_slot_is_rejected() {
        let mut p = sample_space();
        p.reserve_slot("slot-1", "booking-1", Utc::now()).unwrap();
        let err = p.close_slot("slot-1").unwrap_err();
        assert!(matches!(err, DomainError::SlotOccupied(_)));
        assert!(p.is_consistent());
    }

    #[test]
    fn open_reverses_close() {
        let mut p = sample_space();
        p.close_slot("slot-3").unwrap();
        p.open_slot("slot-3").unwrap();
        assert_eq!(p.available_slots, 3);
        assert!(p.slot("slot-3").unwrap().is_available());
        assert!(p.is_consistent());
    }

    #[test]
    fn open_booked_slot_is_rejected() {
        let mut p = sample_space();
        p.reserve_slot("slot-1", "booking-1", Utc::now()).unwrap();
        let err = p.open_slot("slot-1").unwrap_err();
        assert!(matches!(err, DomainError::SlotOccupied(_)));
        assert_eq!(p.slot("slot-1").unwrap().status, SlotStatus::Booked);
        assert_eq!(p.available_slots, 2);
        assert!(p.is_consistent());
    }

    #[test]
    fn unknown_slot_is_not_found() {
        let mut p = sample_space();
        let err = p
            .reserve_slot("slot-99", "booking-1", Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn distance_is_zero_at_own_coordinates_and_grows() {
        let p = sample_space();
        let at_home = p.distance_km(12.9716, 77.5946);
        assert!(at_home < 0.001);
        let far = p.distance_km(13.0827, 80.2707); // Chennai
        assert!(far > 250.0 && far < 350.0);
    }
}
