pub mod bookings;
pub mod health;
pub mod metrics;
pub mod parking_spaces;
pub mod users;
pub mod vehicles;
