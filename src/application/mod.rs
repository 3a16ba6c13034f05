//! Application layer: business logic services

pub mod services;

pub use services::{
    start_expiry_sweeper, BookingService, CreateBooking, ParkingSpaceService,
    RegisterParkingSpace, SpaceLocks, UpdateParkingSpace,
};
