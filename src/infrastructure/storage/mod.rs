//! Storage implementations

pub mod memory;
pub mod snapshot;

pub use memory::InMemoryStore;
pub use snapshot::Snapshot;
