pub mod error;
pub mod models;
pub mod repositories;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use models::{
    billed_hours, Booking, BookingStatus, ParkingCategory, ParkingSpace, ParkingType,
    PaymentMethod, Slot, SlotStatus, User, UserRole, Vehicle, VehicleType,
};
pub use repositories::{
    BookingRepository, ParkingSpaceRepository, RepositoryProvider, UserRepository,
    VehicleRepository,
};
