//! Parking space management service
//!
//! Owner/admin operations: registering spaces, listing them (optionally
//! sorted by distance), and the administrative slot open/close overrides.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::services::SpaceLocks;
use crate::domain::models::{
    ParkingCategory, ParkingSpace, ParkingType, Slot, VehicleType,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Input for registering a parking space. Slots are generated from the
/// per-vehicle-type counts, numbered from 1 within each type.
#[derive(Debug, Clone)]
pub struct RegisterParkingSpace {
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub parking_type: ParkingType,
    pub category: ParkingCategory,
    pub car_slots: u32,
    pub car_price_per_hour: f64,
    pub bike_slots: u32,
    pub bike_price_per_hour: f64,
    pub description: Option<String>,
}

/// Owner edits to a parking space. `None` fields are left untouched;
/// slots and their prices are not editable through this path.
#[derive(Debug, Clone, Default)]
pub struct UpdateParkingSpace {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub is_open: Option<bool>,
}

/// Service for parking space operations.
pub struct ParkingSpaceService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<SpaceLocks>,
}

impl ParkingSpaceService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: Arc<SpaceLocks>) -> Self {
        Self { repos, locks }
    }

    /// Register a new parking space with generated slots.
    pub async fn register(&self, input: RegisterParkingSpace) -> DomainResult<ParkingSpace> {
        let id = Uuid::new_v4().to_string();

        let mut slots = Vec::new();
        for n in 1..=input.car_slots {
            slots.push(Slot::new(
                format!("{}-car-{}", id, n),
                &id,
                n,
                VehicleType::Car,
                input.car_price_per_hour,
            ));
        }
        for n in 1..=input.bike_slots {
            slots.push(Slot::new(
                format!("{}-bike-{}", id, n),
                &id,
                n,
                VehicleType::Bike,
                input.bike_price_per_hour,
            ));
        }

        let mut vehicle_types = Vec::new();
        if input.car_slots > 0 {
            vehicle_types.push(VehicleType::Car);
        }
        if input.bike_slots > 0 {
            vehicle_types.push(VehicleType::Bike);
        }

        let total = slots.len() as u32;
        let space = ParkingSpace {
            id: id.clone(),
            owner_id: input.owner_id,
            name: input.name,
            address: input.address,
            coordinates: (input.latitude, input.longitude),
            parking_type: input.parking_type,
            category: input.category,
            vehicle_types,
            total_slots: total,
            available_slots: total,
            price_per_hour: input.car_price_per_hour,
            rating: 0.0,
            is_open: true,
            slots,
            description: input.description,
        };

        self.repos.parking_spaces().save(space.clone()).await?;
        info!(parking_id = %id, total_slots = total, "Parking space registered");
        Ok(space)
    }

    pub async fn get(&self, parking_id: &str) -> DomainResult<ParkingSpace> {
        self.repos
            .parking_spaces()
            .find_by_id(parking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", parking_id))
    }

    /// All parking spaces; when a reference point is given the list is
    /// sorted by haversine distance, nearest first.
    pub async fn list(&self, near: Option<(f64, f64)>) -> DomainResult<Vec<ParkingSpace>> {
        let mut spaces = self.repos.parking_spaces().find_all().await?;
        if let Some((lat, lng)) = near {
            spaces.sort_by(|a, b| {
                a.distance_km(lat, lng)
                    .total_cmp(&b.distance_km(lat, lng))
            });
        } else {
            spaces.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(spaces)
    }

    pub async fn list_by_owner(&self, owner_id: &str) -> DomainResult<Vec<ParkingSpace>> {
        self.repos.parking_spaces().find_by_owner(owner_id).await
    }

    /// Edit a parking space's metadata. Closing a space (`is_open = false`)
    /// stops new bookings; existing bookings run to completion and release
    /// their slots as usual.
    pub async fn update_space(
        &self,
        parking_id: &str,
        changes: UpdateParkingSpace,
    ) -> DomainResult<ParkingSpace> {
        let lock = self.locks.lock_for(parking_id);
        let _guard = lock.lock().await;

        let mut space = self
            .repos
            .parking_spaces()
            .find_by_id(parking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", parking_id))?;

        if let Some(name) = changes.name {
            space.name = name;
        }
        if let Some(address) = changes.address {
            space.address = address;
        }
        if let Some(description) = changes.description {
            space.description = Some(description);
        }
        if let Some(is_open) = changes.is_open {
            space.is_open = is_open;
        }

        self.repos.parking_spaces().update(space.clone()).await?;
        info!(parking_id, is_open = space.is_open, "Parking space updated");
        Ok(space)
    }

    /// Remove a parking space and its slots.
    pub async fn delete(&self, parking_id: &str) -> DomainResult<()> {
        let lock = self.locks.lock_for(parking_id);
        let _guard = lock.lock().await;
        self.repos.parking_spaces().delete(parking_id).await?;
        info!(parking_id, "Parking space deleted");
        Ok(())
    }

    /// Close a slot for maintenance. Rejected with `SlotOccupied` while a
    /// booking holds the slot.
    pub async fn close_slot(&self, parking_id: &str, slot_id: &str) -> DomainResult<()> {
        self.with_space(parking_id, |space| space.close_slot(slot_id))
            .await?;
        info!(parking_id, slot_id, "Slot closed");
        Ok(())
    }

    /// Reopen a closed slot.
    pub async fn open_slot(&self, parking_id: &str, slot_id: &str) -> DomainResult<()> {
        self.with_space(parking_id, |space| space.open_slot(slot_id))
            .await?;
        info!(parking_id, slot_id, "Slot opened");
        Ok(())
    }

    /// Run a mutation on a space under its serialization lock.
    async fn with_space<F>(&self, parking_id: &str, f: F) -> DomainResult<()>
    where
        F: FnOnce(&mut ParkingSpace) -> DomainResult<()>,
    {
        let lock = self.locks.lock_for(parking_id);
        let _guard = lock.lock().await;

        let mut space = self
            .repos
            .parking_spaces()
            .find_by_id(parking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", parking_id))?;
        f(&mut space)?;
        self.repos.parking_spaces().update(space).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SlotStatus;
    use crate::infrastructure::storage::InMemoryStore;

    fn register_input(name: &str, lat: f64, lng: f64) -> RegisterParkingSpace {
        RegisterParkingSpace {
            owner_id: "owner-1".to_string(),
            name: name.to_string(),
            address: "12 Main St".to_string(),
            latitude: lat,
            longitude: lng,
            parking_type: ParkingType::Open,
            category: ParkingCategory::Commercial,
            car_slots: 2,
            car_price_per_hour: 10.0,
            bike_slots: 3,
            bike_price_per_hour: 4.0,
            description: None,
        }
    }

    fn service() -> ParkingSpaceService {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryStore::new());
        ParkingSpaceService::new(repos, Arc::new(SpaceLocks::new()))
    }

    #[tokio::test]
    async fn register_generates_numbered_slots_per_type() {
        let service = service();
        let space = service
            .register(register_input("Central", 12.97, 77.59))
            .await
            .unwrap();

        assert_eq!(space.total_slots, 5);
        assert_eq!(space.available_slots, 5);
        assert!(space.is_consistent());

        let car_numbers: Vec<u32> = space
            .slots
            .iter()
            .filter(|s| s.vehicle_type == VehicleType::Car)
            .map(|s| s.slot_number)
            .collect();
        let bike_numbers: Vec<u32> = space
            .slots
            .iter()
            .filter(|s| s.vehicle_type == VehicleType::Bike)
            .map(|s| s.slot_number)
            .collect();
        assert_eq!(car_numbers, vec![1, 2]);
        assert_eq!(bike_numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn list_sorts_by_distance_when_point_given() {
        let service = service();
        service
            .register(register_input("Far", 13.08, 80.27))
            .await
            .unwrap();
        service
            .register(register_input("Near", 12.98, 77.60))
            .await
            .unwrap();

        let listed = service.list(Some((12.97, 77.59))).await.unwrap();
        assert_eq!(listed[0].name, "Near");
        assert_eq!(listed[1].name, "Far");
    }

    #[tokio::test]
    async fn close_and_open_slot_adjust_availability() {
        let service = service();
        let space = service
            .register(register_input("Central", 12.97, 77.59))
            .await
            .unwrap();
        let slot_id = space.slots[0].id.clone();

        service.close_slot(&space.id, &slot_id).await.unwrap();
        let after_close = service.get(&space.id).await.unwrap();
        assert_eq!(after_close.available_slots, 4);
        assert_eq!(after_close.slot(&slot_id).unwrap().status, SlotStatus::Closed);

        service.open_slot(&space.id, &slot_id).await.unwrap();
        let after_open = service.get(&space.id).await.unwrap();
        assert_eq!(after_open.available_slots, 5);
        assert!(after_open.is_consistent());
    }

    #[tokio::test]
    async fn update_edits_metadata_and_toggles_is_open() {
        let service = service();
        let space = service
            .register(register_input("Central", 12.97, 77.59))
            .await
            .unwrap();
        assert!(space.is_open);

        let updated = service
            .update_space(
                &space.id,
                UpdateParkingSpace {
                    name: Some("Central Plaza".to_string()),
                    is_open: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Central Plaza");
        assert!(!updated.is_open);
        // untouched fields survive
        assert_eq!(updated.address, "12 Main St");
        assert_eq!(updated.total_slots, 5);

        let fetched = service.get(&space.id).await.unwrap();
        assert!(!fetched.is_open);
    }

    #[tokio::test]
    async fn delete_removes_space() {
        let service = service();
        let space = service
            .register(register_input("Central", 12.97, 77.59))
            .await
            .unwrap();
        service.delete(&space.id).await.unwrap();
        let err = service.get(&space.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
