//! Snapshot store boundary.
//!
//! The query engine is stateless: every execution loads a fresh snapshot
//! of all three tables through [`SnapshotStore`]. The production backing
//! store is a spreadsheet behind an external client; this crate ships a
//! JSON-file store and an in-memory fixture store. There is no
//! transactional guarantee across the three load calls.

pub mod errors;
pub mod memory;
pub mod snapshot;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use snapshot::JsonSnapshotStore;

use serde_json::Value;

use crate::records::{ContainerRecord, LocationRecord, PlantRecord};

/// Read access to the three table snapshots plus best-effort plant
/// context enrichment.
pub trait SnapshotStore {
    /// Loads the current plants snapshot, in stable source order.
    fn load_plants(&self) -> StoreResult<Vec<PlantRecord>>;

    /// Loads the current locations snapshot.
    fn load_locations(&self) -> StoreResult<Vec<LocationRecord>>;

    /// Loads the current containers snapshot. Order is preserved; the
    /// join engine's first-container tie-break depends on it.
    fn load_containers(&self) -> StoreResult<Vec<ContainerRecord>>;

    /// Resolves an enrichment context block for a plant. Best effort:
    /// `Ok(None)` when no context exists, `Err` when the lookup itself
    /// failed. Failures here are non-fatal to query execution.
    fn resolve_plant_context(&self, plant_id: &str) -> StoreResult<Option<Value>>;
}
