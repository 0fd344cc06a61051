//! JSON snapshot file store.
//!
//! Reads a single JSON file of the form:
//!
//! ```json
//! {
//!   "plants": [ {...}, ... ],
//!   "locations": [ {...}, ... ],
//!   "containers": [ {...}, ... ],
//!   "contexts": { "<plant_id>": {...} }
//! }
//! ```
//!
//! The file is re-read on every load call, matching the engine's
//! fresh-snapshot-per-request contract. Array order in the file is the
//! loader order the join engine's tie-break relies on. The optional
//! `contexts` map backs `resolve_plant_context`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::records::{ContainerRecord, LocationRecord, PlantRecord};

use super::errors::{StoreError, StoreResult};
use super::SnapshotStore;

/// Snapshot store backed by one JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_root(&self) -> StoreResult<Value> {
        let path = self.path.display().to_string();
        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::io(path.as_str(), e.to_string()))?;
        let root: Value = serde_json::from_str(&content)
            .map_err(|e| StoreError::malformed(path.as_str(), e.to_string()))?;
        if !root.is_object() {
            return Err(StoreError::malformed(
                path.as_str(),
                "root must be a JSON object",
            ));
        }
        Ok(root)
    }

    fn load_table<R: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<R>> {
        let path = self.path.display().to_string();
        let root = self.read_root()?;
        match root.get(key) {
            None => Ok(Vec::new()),
            Some(rows) => serde_json::from_value(rows.clone()).map_err(|e| {
                StoreError::malformed(path.as_str(), format!("table '{}': {}", key, e))
            }),
        }
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load_plants(&self) -> StoreResult<Vec<PlantRecord>> {
        self.load_table("plants")
    }

    fn load_locations(&self) -> StoreResult<Vec<LocationRecord>> {
        self.load_table("locations")
    }

    fn load_containers(&self) -> StoreResult<Vec<ContainerRecord>> {
        self.load_table("containers")
    }

    fn resolve_plant_context(&self, plant_id: &str) -> StoreResult<Option<Value>> {
        let root = self.read_root()?;
        Ok(root
            .get("contexts")
            .and_then(|c| c.get(plant_id))
            .cloned())
    }
}
