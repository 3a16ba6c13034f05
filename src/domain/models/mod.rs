pub mod booking;
pub mod parking_space;
pub mod slot;
pub mod user;
pub mod vehicle;

pub use booking::{billed_hours, Booking, BookingStatus, PaymentMethod};
pub use parking_space::{ParkingCategory, ParkingSpace, ParkingType};
pub use slot::{Slot, SlotStatus, VehicleType};
pub use user::{User, UserRole};
pub use vehicle::Vehicle;
