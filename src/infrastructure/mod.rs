//! Infrastructure layer: storage and other external concerns

pub mod storage;

pub use storage::{InMemoryStore, Snapshot};
