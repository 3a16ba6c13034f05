//! Application services

pub mod booking;
pub mod expiry;
pub mod parking;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

pub use booking::{BookingService, CreateBooking};
pub use expiry::start_expiry_sweeper;
pub use parking::{ParkingSpaceService, RegisterParkingSpace, UpdateParkingSpace};

/// Per-parking-space serialization point.
///
/// Every state transition touching a space's slots (booking create, cancel,
/// complete, slot open/close) runs under that space's mutex, so a reserve
/// check-and-set can never interleave with another writer. Shared between
/// `BookingService` and `ParkingSpaceService`.
#[derive(Default)]
pub struct SpaceLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SpaceLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    pub fn lock_for(&self, parking_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(parking_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
