//! In-memory repository provider with optional snapshot persistence
//!
//! State lives in `DashMap`s; when a snapshot path is configured, the whole
//! state is rewritten after every mutation and reloaded at startup.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{info, warn};

use crate::domain::models::{Booking, ParkingSpace, User, Vehicle};
use crate::domain::{
    BookingRepository, DomainError, DomainResult, ParkingSpaceRepository, RepositoryProvider,
    UserRepository, VehicleRepository,
};
use crate::infrastructure::storage::snapshot::Snapshot;

/// In-memory store backing all repositories.
pub struct InMemoryStore {
    parking_spaces: DashMap<String, ParkingSpace>,
    bookings: DashMap<String, Booking>,
    vehicles: DashMap<String, Vehicle>,
    users: DashMap<String, User>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            parking_spaces: DashMap::new(),
            bookings: DashMap::new(),
            vehicles: DashMap::new(),
            users: DashMap::new(),
            snapshot_path: None,
        }
    }

    /// Create a store persisted to `path`, loading the existing snapshot
    /// if one is present.
    pub fn with_snapshot(path: PathBuf) -> DomainResult<Self> {
        let snapshot = Snapshot::load(&path)?;
        let store = Self {
            parking_spaces: DashMap::new(),
            bookings: DashMap::new(),
            vehicles: DashMap::new(),
            users: DashMap::new(),
            snapshot_path: Some(path),
        };

        for mut space in snapshot.parking_spaces {
            // Repair a drifted cached count rather than serving stale data.
            if !space.is_consistent() {
                warn!(
                    parking_id = %space.id,
                    cached = space.available_slots,
                    computed = space.computed_available(),
                    "Snapshot availability count drifted; recomputing"
                );
                space.available_slots = space.computed_available();
                space.total_slots = space.slots.len() as u32;
            }
            store.parking_spaces.insert(space.id.clone(), space);
        }
        for booking in snapshot.bookings {
            store.bookings.insert(booking.id.clone(), booking);
        }
        for vehicle in snapshot.vehicles {
            store.vehicles.insert(vehicle.id.clone(), vehicle);
        }
        for user in snapshot.users {
            store.users.insert(user.id.clone(), user);
        }

        info!(
            parking_spaces = store.parking_spaces.len(),
            bookings = store.bookings.len(),
            "Snapshot loaded"
        );
        Ok(store)
    }

    /// Entity counts for health reporting: (spaces, bookings).
    pub fn counts(&self) -> (usize, usize) {
        (self.parking_spaces.len(), self.bookings.len())
    }

    fn persist(&self) -> DomainResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let snapshot = Snapshot {
            parking_spaces: self.parking_spaces.iter().map(|e| e.value().clone()).collect(),
            bookings: self.bookings.iter().map(|e| e.value().clone()).collect(),
            vehicles: self.vehicles.iter().map(|e| e.value().clone()).collect(),
            users: self.users.iter().map(|e| e.value().clone()).collect(),
        };
        snapshot.save(path)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── ParkingSpaceRepository ──────────────────────────────────────

#[async_trait]
impl ParkingSpaceRepository for InMemoryStore {
    async fn save(&self, space: ParkingSpace) -> DomainResult<()> {
        self.parking_spaces.insert(space.id.clone(), space);
        self.persist()
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ParkingSpace>> {
        Ok(self.parking_spaces.get(id).map(|e| e.clone()))
    }

    async fn update(&self, space: ParkingSpace) -> DomainResult<()> {
        if !self.parking_spaces.contains_key(&space.id) {
            return Err(DomainError::not_found("ParkingSpace", space.id));
        }
        self.parking_spaces.insert(space.id.clone(), space);
        self.persist()
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.parking_spaces
            .remove(id)
            .ok_or_else(|| DomainError::not_found("ParkingSpace", id))?;
        self.persist()
    }

    async fn find_all(&self) -> DomainResult<Vec<ParkingSpace>> {
        Ok(self.parking_spaces.iter().map(|e| e.value().clone()).collect())
    }

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<ParkingSpace>> {
        Ok(self
            .parking_spaces
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .map(|e| e.value().clone())
            .collect())
    }
}

// ── BookingRepository ───────────────────────────────────────────

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn save(&self, booking: Booking) -> DomainResult<()> {
        self.bookings.insert(booking.id.clone(), booking);
        self.persist()
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(id).map(|e| e.clone()))
    }

    async fn update(&self, booking: Booking) -> DomainResult<()> {
        if !self.bookings.contains_key(&booking.id) {
            return Err(DomainError::not_found("Booking", booking.id));
        }
        self.bookings.insert(booking.id.clone(), booking);
        self.persist()
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        Ok(self.bookings.iter().map(|e| e.value().clone()).collect())
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn find_elapsed(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.is_elapsed(now))
            .map(|e| e.value().clone())
            .collect())
    }
}

// ── VehicleRepository ───────────────────────────────────────────

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn save(&self, vehicle: Vehicle) -> DomainResult<()> {
        self.vehicles.insert(vehicle.id.clone(), vehicle);
        self.persist()
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>> {
        Ok(self.vehicles.get(id).map(|e| e.clone()))
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Vehicle>> {
        Ok(self
            .vehicles
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.value().clone())
            .collect())
    }
}

// ── UserRepository ──────────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn save(&self, user: User) -> DomainResult<()> {
        self.users.insert(user.id.clone(), user);
        self.persist()
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|e| e.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        Ok(self.users.iter().map(|e| e.value().clone()).collect())
    }
}

// ── RepositoryProvider ──────────────────────────────────────────

impl RepositoryProvider for InMemoryStore {
    fn parking_spaces(&self) -> &dyn ParkingSpaceRepository {
        self
    }

    fn bookings(&self) -> &dyn BookingRepository {
        self
    }

    fn vehicles(&self) -> &dyn VehicleRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        self
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{UserRole, VehicleType};

    #[tokio::test]
    async fn update_unknown_booking_is_not_found() {
        let store = InMemoryStore::new();
        let booking = Booking::new(
            "booking-1",
            "user-1",
            "parking-1",
            "slot-1",
            "vehicle-1",
            "KA-01-1234",
            VehicleType::Car,
            Utc::now(),
            Utc::now() + chrono::Duration::hours(1),
            10.0,
            crate::domain::PaymentMethod::Cash,
        )
        .unwrap();
        let err = BookingRepository::update(&store, booking).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn find_by_user_filters() {
        let store = InMemoryStore::new();
        VehicleRepository::save(
            &store,
            Vehicle::new("vehicle-1", "user-1", VehicleType::Car, "KA-01-1234", None),
        )
        .await
        .unwrap();
        VehicleRepository::save(
            &store,
            Vehicle::new("vehicle-2", "user-2", VehicleType::Bike, "KA-02-9999", None),
        )
        .await
        .unwrap();

        let mine = store.vehicles().find_by_user("user-1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "vehicle-1");
    }

    #[tokio::test]
    async fn snapshot_survives_restart() {
        let path = std::env::temp_dir().join(format!("parkhub-store-{}.json", uuid::Uuid::new_v4()));
        {
            let store = InMemoryStore::with_snapshot(path.clone()).unwrap();
            UserRepository::save(
                &store,
                User::new("user-1", "a@example.com", "555-0100", "Alice", UserRole::Owner),
            )
            .await
            .unwrap();
        }

        let reopened = InMemoryStore::with_snapshot(path.clone()).unwrap();
        let user = reopened.users().find_by_id("user-1").await.unwrap().unwrap();
        assert_eq!(user.name, "Alice");
        std::fs::remove_file(&path).ok();
    }
}
