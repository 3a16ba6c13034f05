//! Parking space REST module

pub mod dto;
pub mod handlers;

pub use handlers::ParkingAppState;
