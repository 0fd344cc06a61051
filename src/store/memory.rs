//! In-memory snapshot store for tests and demos.

use std::collections::HashMap;

use serde_json::Value;

use crate::records::{ContainerRecord, LocationRecord, PlantRecord};

use super::errors::{StoreError, StoreResult};
use super::SnapshotStore;

/// Fixture-backed store. Rows are returned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    plants: Vec<PlantRecord>,
    locations: Vec<LocationRecord>,
    containers: Vec<ContainerRecord>,
    contexts: HashMap<String, Value>,
    fail_context: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plants(mut self, plants: Vec<PlantRecord>) -> Self {
        self.plants = plants;
        self
    }

    pub fn with_locations(mut self, locations: Vec<LocationRecord>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_containers(mut self, containers: Vec<ContainerRecord>) -> Self {
        self.containers = containers;
        self
    }

    /// Registers a context block for a plant id.
    pub fn with_context(mut self, plant_id: impl Into<String>, context: Value) -> Self {
        self.contexts.insert(plant_id.into(), context);
        self
    }

    /// Makes every context lookup fail, for exercising the formatter's
    /// swallow-and-log path.
    pub fn with_failing_context(mut self) -> Self {
        self.fail_context = true;
        self
    }
}

impl SnapshotStore for MemoryStore {
    fn load_plants(&self) -> StoreResult<Vec<PlantRecord>> {
        Ok(self.plants.clone())
    }

    fn load_locations(&self) -> StoreResult<Vec<LocationRecord>> {
        Ok(self.locations.clone())
    }

    fn load_containers(&self) -> StoreResult<Vec<ContainerRecord>> {
        Ok(self.containers.clone())
    }

    fn resolve_plant_context(&self, plant_id: &str) -> StoreResult<Option<Value>> {
        if self.fail_context {
            return Err(StoreError::context_lookup(plant_id, "lookup disabled"));
        }
        Ok(self.contexts.get(plant_id).cloned())
    }
}
