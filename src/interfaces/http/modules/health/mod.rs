//! Health REST module

pub mod handlers;

pub use handlers::HealthState;
