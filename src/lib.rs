//! # Parking Booking Service
//!
//! Slot availability and booking lifecycle for parking spaces: a space
//! advertises car and bike slots, a driver books a slot for a time window,
//! and the booking moves through cancel/complete/expiry while the space's
//! availability counts stay consistent.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, rules and repository traits
//! - **application**: Booking and parking services plus the expiry sweeper
//! - **infrastructure**: In-memory storage with JSON snapshot persistence
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Cross-cutting concerns (graceful shutdown)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export storage for easy access
pub use infrastructure::storage::InMemoryStore;

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};
