//! Whole-state snapshot file
//!
//! The entire state is read once at startup and rewritten after every
//! mutation, as one JSON document of opaque per-entity lists. Consistency
//! is only promised within one process.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::models::{Booking, ParkingSpace, User, Vehicle};
use crate::domain::{DomainError, DomainResult};

/// Serialized service state.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub parking_spaces: Vec<ParkingSpace>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Snapshot {
    /// Read a snapshot from disk. A missing file is an empty snapshot.
    pub fn load(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = std::fs::read(path)
            .map_err(|e| DomainError::Storage(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::Storage(format!("parse {}: {}", path.display(), e)))
    }

    /// Write the snapshot, replacing the previous one atomically via a
    /// temp-file rename so a crash mid-write never truncates state.
    pub fn save(&self, path: &Path) -> DomainResult<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| DomainError::Storage(format!("serialize snapshot: {}", e)))?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| DomainError::Storage(format!("write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| DomainError::Storage(format!("rename {}: {}", path.display(), e)))?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{UserRole, VehicleType};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("parkhub-{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_loads_empty() {
        let snap = Snapshot::load(&temp_path("missing")).unwrap();
        assert!(snap.parking_spaces.is_empty());
        assert!(snap.bookings.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let path = temp_path("roundtrip");
        let snap = Snapshot {
            users: vec![User::new(
                "user-1",
                "a@example.com",
                "555-0100",
                "Alice",
                UserRole::Customer,
            )],
            vehicles: vec![Vehicle::new(
                "vehicle-1",
                "user-1",
                VehicleType::Car,
                "KA-01-1234",
                None,
            )],
            ..Default::default()
        };
        snap.save(&path).unwrap();

        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded.users.len(), 1);
        assert_eq!(loaded.vehicles[0].number, "KA-01-1234");
        std::fs::remove_file(&path).ok();
    }
}
