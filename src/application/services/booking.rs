//! Booking ledger service
//!
//! Owns the booking lifecycle and drives the slot transitions of the
//! parking space aggregate in the same serialized step, keeping the cached
//! `available_slots` count in lockstep with per-slot state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::services::SpaceLocks;
use crate::domain::models::{Booking, PaymentMethod};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Input for creating a booking.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub user_id: String,
    pub parking_id: String,
    pub slot_id: String,
    pub vehicle_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub payment_method: PaymentMethod,
}

/// Service for booking lifecycle operations.
pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<SpaceLocks>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: Arc<SpaceLocks>) -> Self {
        Self { repos, locks }
    }

    /// Create a booking and reserve its slot.
    ///
    /// Validates the time range, the vehicle's type against the slot's
    /// type, and the slot's availability. Runs under the parking space's
    /// mutex so that of two racing creates for the same slot exactly one
    /// succeeds; the other observes `SlotUnavailable`.
    pub async fn create(&self, input: CreateBooking) -> DomainResult<Booking> {
        if input.end_time <= input.start_time {
            return Err(DomainError::InvalidTimeRange);
        }

        let vehicle = self
            .repos
            .vehicles()
            .find_by_id(&input.vehicle_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", &input.vehicle_id))?;

        let lock = self.locks.lock_for(&input.parking_id);
        let _guard = lock.lock().await;

        let mut space = self
            .repos
            .parking_spaces()
            .find_by_id(&input.parking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ParkingSpace", &input.parking_id))?;

        if !space.is_open {
            return Err(DomainError::SpaceClosed(space.id));
        }

        let slot = space.slot(&input.slot_id)?;
        if slot.vehicle_type != vehicle.vehicle_type {
            return Err(DomainError::InvalidVehicle {
                vehicle: vehicle.vehicle_type,
                slot: slot.vehicle_type,
            });
        }
        let price_per_hour = slot.price_per_hour;

        let booking = Booking::new(
            Uuid::new_v4().to_string(),
            &input.user_id,
            &input.parking_id,
            &input.slot_id,
            &vehicle.id,
            &vehicle.number,
            vehicle.vehicle_type,
            input.start_time,
            input.end_time,
            price_per_hour,
            input.payment_method,
        )?;

        // The reserve check-and-set; fails with SlotUnavailable before
        // anything has been written.
        space.reserve_slot(&input.slot_id, &booking.id, booking.end_time)?;

        self.repos.parking_spaces().update(space).await?;
        self.repos.bookings().save(booking.clone()).await?;

        metrics::counter!("bookings_created_total").increment(1);
        info!(
            booking_id = %booking.id,
            parking_id = %booking.parking_id,
            slot_id = %booking.slot_id,
            duration_hours = booking.duration_hours,
            total_price = booking.total_price,
            "Booking created"
        );
        Ok(booking)
    }

    /// Cancel a non-terminal booking, releasing its slot.
    pub async fn cancel(&self, booking_id: &str) -> DomainResult<Booking> {
        let booking = self.finish(booking_id, Transition::Cancel).await?;
        metrics::counter!("bookings_cancelled_total").increment(1);
        info!(booking_id = %booking.id, "Booking cancelled");
        Ok(booking)
    }

    /// Complete a non-terminal booking, releasing its slot. Invoked by the
    /// expiry sweeper or an explicit "end now" action.
    pub async fn complete(&self, booking_id: &str) -> DomainResult<Booking> {
        let booking = self.finish(booking_id, Transition::Complete).await?;
        info!(booking_id = %booking.id, "Booking completed");
        Ok(booking)
    }

    /// Complete every non-terminal booking whose end time has passed.
    ///
    /// Idempotent under races: a booking that was cancelled or completed
    /// between the scan and the transition reports `AlreadyTerminal`,
    /// which is expected and only logged. Returns the number of bookings
    /// actually completed.
    pub async fn sweep_elapsed(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let elapsed = self.repos.bookings().find_elapsed(now).await?;
        if elapsed.is_empty() {
            return Ok(0);
        }

        let mut completed = 0;
        for booking in elapsed {
            match self.complete(&booking.id).await {
                Ok(_) => completed += 1,
                Err(DomainError::AlreadyTerminal { id, status }) => {
                    debug!(booking_id = %id, %status, "Booking already terminal during sweep");
                }
                Err(e) => {
                    warn!(booking_id = %booking.id, error = %e, "Failed to expire booking");
                }
            }
        }

        if completed > 0 {
            metrics::counter!("bookings_expired_total").increment(completed as u64);
            info!(count = completed, "Elapsed bookings completed");
        }
        Ok(completed)
    }

    pub async fn get(&self, booking_id: &str) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))
    }

    pub async fn list(&self) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().find_all().await
    }

    pub async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().find_by_user(user_id).await
    }

    /// Shared tail of `cancel` / `complete`: transition the booking under
    /// the space lock and release its slot.
    async fn finish(&self, booking_id: &str, transition: Transition) -> DomainResult<Booking> {
        // First fetch is only for the parking id; the authoritative read
        // happens under the lock.
        let parking_id = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?
            .parking_id;

        let lock = self.locks.lock_for(&parking_id);
        let _guard = lock.lock().await;

        let mut booking = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;

        match transition {
            Transition::Cancel => booking.cancel()?,
            Transition::Complete => booking.complete()?,
        }

        match self.repos.parking_spaces().find_by_id(&booking.parking_id).await? {
            Some(mut space) => match space.release_slot(&booking.slot_id) {
                Ok(()) => self.repos.parking_spaces().update(space).await?,
                Err(DomainError::NotFound { .. }) => {
                    // Slot was removed by the owner; nothing to release.
                    warn!(
                        booking_id = %booking.id,
                        slot_id = %booking.slot_id,
                        "Slot missing on release"
                    );
                }
                Err(e) => return Err(e),
            },
            None => {
                warn!(
                    booking_id = %booking.id,
                    parking_id = %booking.parking_id,
                    "Parking space missing on release"
                );
            }
        }

        self.repos.bookings().update(booking.clone()).await?;
        Ok(booking)
    }
}

enum Transition {
    Cancel,
    Complete,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::models::{
        BookingStatus, ParkingCategory, ParkingSpace, ParkingType, Slot, SlotStatus, Vehicle,
        VehicleType,
    };
    use crate::domain::VehicleRepository;
    use crate::infrastructure::storage::InMemoryStore;

    fn sample_space() -> ParkingSpace {
        ParkingSpace {
            id: "parking-1".to_string(),
            owner_id: "owner-1".to_string(),
            name: "Central Plaza".to_string(),
            address: "12 Main St".to_string(),
            coordinates: (12.9716, 77.5946),
            parking_type: ParkingType::Covered,
            category: ParkingCategory::Commercial,
            vehicle_types: vec![VehicleType::Car, VehicleType::Bike],
            total_slots: 2,
            available_slots: 2,
            price_per_hour: 10.0,
            rating: 4.5,
            is_open: true,
            slots: vec![
                Slot::new("slot-1", "parking-1", 1, VehicleType::Car, 10.0),
                Slot::new("slot-2", "parking-1", 1, VehicleType::Bike, 4.0),
            ],
            description: None,
        }
    }

    async fn setup() -> (Arc<InMemoryStore>, Arc<BookingService>) {
        let store = Arc::new(InMemoryStore::new());
        let repos: Arc<dyn RepositoryProvider> = store.clone();
        repos.parking_spaces().save(sample_space()).await.unwrap();
        store
            .vehicles()
            .save(Vehicle::new(
                "vehicle-1",
                "user-1",
                VehicleType::Car,
                "KA-01-1234",
                None,
            ))
            .await
            .unwrap();
        store
            .vehicles()
            .save(Vehicle::new(
                "vehicle-2",
                "user-2",
                VehicleType::Bike,
                "KA-02-9999",
                None,
            ))
            .await
            .unwrap();

        let service = Arc::new(BookingService::new(repos, Arc::new(SpaceLocks::new())));
        (store, service)
    }

    fn car_input(start: DateTime<Utc>, end: DateTime<Utc>) -> CreateBooking {
        CreateBooking {
            user_id: "user-1".to_string(),
            parking_id: "parking-1".to_string(),
            slot_id: "slot-1".to_string(),
            vehicle_id: "vehicle-1".to_string(),
            start_time: start,
            end_time: end,
            payment_method: PaymentMethod::Card,
        }
    }

    async fn space(store: &InMemoryStore) -> ParkingSpace {
        store
            .parking_spaces()
            .find_by_id("parking-1")
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn create_books_slot_and_freezes_price() {
        let (store, service) = setup().await;
        let start = Utc::now();

        let booking = service
            .create(car_input(start, start + Duration::hours(2)))
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Upcoming);
        assert_eq!(booking.duration_hours, 2);
        assert_eq!(booking.total_price, 20.0);

        let space = space(&store).await;
        assert_eq!(space.available_slots, 1);
        let slot = space.slot("slot-1").unwrap();
        assert_eq!(slot.status, SlotStatus::Booked);
        assert_eq!(slot.current_booking_id.as_deref(), Some(booking.id.as_str()));
        assert!(space.is_consistent());
    }

    #[tokio::test]
    async fn cancel_restores_slot_and_count() {
        let (store, service) = setup().await;
        let start = Utc::now();
        let booking = service
            .create(car_input(start, start + Duration::hours(2)))
            .await
            .unwrap();

        let cancelled = service.cancel(&booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let space = space(&store).await;
        assert_eq!(space.available_slots, 2);
        assert!(space.slot("slot-1").unwrap().is_available());
        assert!(space.is_consistent());
    }

    #[tokio::test]
    async fn create_on_booked_slot_fails_without_side_effects() {
        let (store, service) = setup().await;
        let start = Utc::now();
        service
            .create(car_input(start, start + Duration::hours(2)))
            .await
            .unwrap();

        let err = service
            .create(car_input(start, start + Duration::hours(3)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotUnavailable(_)));

        let space = space(&store).await;
        assert_eq!(space.available_slots, 1);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn vehicle_type_mismatch_is_rejected() {
        let (store, service) = setup().await;
        let start = Utc::now();

        let mut input = car_input(start, start + Duration::hours(1));
        input.vehicle_id = "vehicle-2".to_string(); // bike into a car slot

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidVehicle {
                vehicle: VehicleType::Bike,
                slot: VehicleType::Car,
            }
        ));
        assert_eq!(space(&store).await.available_slots, 2);
    }

    #[tokio::test]
    async fn invalid_time_range_is_rejected() {
        let (_store, service) = setup().await;
        let start = Utc::now();
        let err = service
            .create(car_input(start, start - Duration::hours(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimeRange));
    }

    #[tokio::test]
    async fn create_on_closed_space_is_rejected() {
        let (store, service) = setup().await;
        let mut closed_space = space(&store).await;
        closed_space.is_open = false;
        store.parking_spaces().update(closed_space).await.unwrap();

        let start = Utc::now();
        let err = service
            .create(car_input(start, start + Duration::hours(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SpaceClosed(_)));
        assert_eq!(space(&store).await.available_slots, 2);
    }

    #[tokio::test]
    async fn unknown_booking_is_not_found() {
        let (_store, service) = setup().await;
        let err = service.cancel("booking-unknown").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn complete_is_idempotent() {
        let (store, service) = setup().await;
        let start = Utc::now();
        let booking = service
            .create(car_input(start, start + Duration::hours(1)))
            .await
            .unwrap();

        service.complete(&booking.id).await.unwrap();
        let count_after_first = space(&store).await.available_slots;

        let err = service.complete(&booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyTerminal { .. }));
        assert_eq!(space(&store).await.available_slots, count_after_first);
    }

    #[tokio::test]
    async fn cancel_after_complete_is_already_terminal() {
        let (_store, service) = setup().await;
        let start = Utc::now();
        let booking = service
            .create(car_input(start, start + Duration::hours(1)))
            .await
            .unwrap();
        service.complete(&booking.id).await.unwrap();

        let err = service.cancel(&booking.id).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::AlreadyTerminal {
                status: BookingStatus::Completed,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn sweep_completes_elapsed_bookings_only() {
        let (store, service) = setup().await;
        let start = Utc::now() - Duration::hours(3);

        let elapsed = service
            .create(car_input(start, start + Duration::hours(1)))
            .await
            .unwrap();
        let mut running = car_input(Utc::now(), Utc::now() + Duration::hours(2));
        running.slot_id = "slot-2".to_string();
        running.vehicle_id = "vehicle-2".to_string();
        running.user_id = "user-2".to_string();
        let running = service.create(running).await.unwrap();

        let completed = service.sweep_elapsed(Utc::now()).await.unwrap();
        assert_eq!(completed, 1);

        assert_eq!(
            service.get(&elapsed.id).await.unwrap().status,
            BookingStatus::Completed
        );
        assert_eq!(
            service.get(&running.id).await.unwrap().status,
            BookingStatus::Upcoming
        );

        let space = space(&store).await;
        assert!(space.slot("slot-1").unwrap().is_available());
        assert_eq!(space.slot("slot-2").unwrap().status, SlotStatus::Booked);
        assert!(space.is_consistent());
    }

    #[tokio::test]
    async fn sweep_twice_changes_state_once() {
        let (store, service) = setup().await;
        let start = Utc::now() - Duration::hours(3);
        service
            .create(car_input(start, start + Duration::hours(1)))
            .await
            .unwrap();

        assert_eq!(service.sweep_elapsed(Utc::now()).await.unwrap(), 1);
        assert_eq!(service.sweep_elapsed(Utc::now()).await.unwrap(), 0);
        assert_eq!(space(&store).await.available_slots, 2);
    }

    #[tokio::test]
    async fn admin_open_cannot_sever_a_live_booking() {
        let (store, service) = setup().await;
        let start = Utc::now();
        let booking = service
            .create(car_input(start, start + Duration::hours(2)))
            .await
            .unwrap();

        let repos: Arc<dyn RepositoryProvider> = store.clone();
        let parking = crate::application::services::ParkingSpaceService::new(
            repos,
            Arc::new(SpaceLocks::new()),
        );
        let err = parking.open_slot("parking-1", "slot-1").await.unwrap_err();
        assert!(matches!(err, DomainError::SlotOccupied(_)));

        // the slot is still held, so a second booking is refused
        let err = service
            .create(car_input(start, start + Duration::hours(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotUnavailable(_)));

        assert_eq!(
            service.get(&booking.id).await.unwrap().status,
            BookingStatus::Upcoming
        );
        let space = space(&store).await;
        assert_eq!(space.available_slots, 1);
        assert!(space.is_consistent());
    }

    #[tokio::test]
    async fn racing_creates_admit_exactly_one() {
        let (store, service) = setup().await;
        let start = Utc::now();

        let a = {
            let service = service.clone();
            let input = car_input(start, start + Duration::hours(2));
            tokio::spawn(async move { service.create(input).await })
        };
        let b = {
            let service = service.clone();
            let input = car_input(start, start + Duration::hours(4));
            tokio::spawn(async move { service.create(input).await })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let failure = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(failure, DomainError::SlotUnavailable(_)));

        let space = space(&store).await;
        assert_eq!(space.available_slots, 1);
        assert!(space.is_consistent());
    }
}
