//! Repository traits for the domain layer
//!
//! Contains:
//! - per-aggregate repository traits (`ParkingSpaceRepository`,
//!   `BookingRepository`, `VehicleRepository`, `UserRepository`)
//! - `RepositoryProvider` for unified access to all of them
//!
//! Persistence is a collaborator of the lifecycle core: implementations
//! must make reads after writes consistent within one process, but need
//! no transactional guarantees beyond that.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{Booking, ParkingSpace, User, Vehicle};
use crate::domain::DomainResult;

#[async_trait]
pub trait ParkingSpaceRepository: Send + Sync {
    /// Save a new parking space
    async fn save(&self, space: ParkingSpace) -> DomainResult<()>;

    /// Find a parking space by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ParkingSpace>>;

    /// Replace an existing parking space
    async fn update(&self, space: ParkingSpace) -> DomainResult<()>;

    /// Remove a parking space and its slots
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// All parking spaces
    async fn find_all(&self) -> DomainResult<Vec<ParkingSpace>>;

    /// Parking spaces registered by one owner
    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<ParkingSpace>>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Save a new booking
    async fn save(&self, booking: Booking) -> DomainResult<()>;

    /// Find a booking by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;

    /// Replace an existing booking
    async fn update(&self, booking: Booking) -> DomainResult<()>;

    /// All bookings (any status)
    async fn find_all(&self) -> DomainResult<Vec<Booking>>;

    /// Bookings made by one user
    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Booking>>;

    /// Non-terminal bookings whose end time has passed
    async fn find_elapsed(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Save a new vehicle
    async fn save(&self, vehicle: Vehicle) -> DomainResult<()>;

    /// Find a vehicle by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>>;

    /// Vehicles registered by one user
    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Vehicle>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Save a new user
    async fn save(&self, user: User) -> DomainResult<()>;

    /// Find a user by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// All users
    async fn find_all(&self) -> DomainResult<Vec<User>>;
}

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let space = repos.parking_spaces().find_by_id("parking-1").await?;
///     let booking = repos.bookings().find_by_id("booking-1").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn parking_spaces(&self) -> &dyn ParkingSpaceRepository;
    fn bookings(&self) -> &dyn BookingRepository;
    fn vehicles(&self) -> &dyn VehicleRepository;
    fn users(&self) -> &dyn UserRepository;
}
