//! HTTP interface layer

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, AppState};
