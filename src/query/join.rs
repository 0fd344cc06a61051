//! Join engine: correlates filtered plants with their containers and the
//! location implied by the first container.
//!
//! A plant's authoritative location comes from its first container's
//! `location_id`, falling back to the container's denormalized
//! `location_name`. "First" means first in loader order, which both
//! snapshot stores preserve, so the tie-break for plants potted in several
//! locations is deterministic. The plant row's own free-text location
//! string is never consulted here.
//!
//! Filter presence drives join semantics: a table the caller filtered on
//! becomes a required (inner) join, otherwise the relationship is optional
//! and the joined fields may be empty or null.

use std::collections::HashMap;

use crate::records::{ContainerRecord, LocationRecord, PlantRecord};

/// One plant with its correlated containers and resolved location.
#[derive(Debug, Clone)]
pub struct JoinedResult {
    pub plant: PlantRecord,
    pub containers: Vec<ContainerRecord>,
    pub location: Option<LocationRecord>,
    /// Stringified plant id, when the row carried one.
    pub plant_id: Option<String>,
}

impl JoinedResult {
    /// The first container, if any. Loader order.
    pub fn first_container(&self) -> Option<&ContainerRecord> {
        self.containers.first()
    }
}

/// Joins filtered plants against the (possibly filtered) container and
/// location sets.
///
/// `require_containers` / `require_location` are true when the caller
/// filtered on the respective table, turning that arm into an inner join.
pub fn join_tables(
    plants: Vec<PlantRecord>,
    locations: &[LocationRecord],
    containers: &[ContainerRecord],
    require_containers: bool,
    require_location: bool,
) -> Vec<JoinedResult> {
    let locations_by_id: HashMap<String, &LocationRecord> = locations
        .iter()
        .filter_map(|l| l.id_string().map(|id| (id, l)))
        .collect();
    let locations_by_name: HashMap<String, &LocationRecord> = locations
        .iter()
        .filter_map(|l| l.name_string().map(|n| (n.trim().to_lowercase(), l)))
        .collect();

    let mut containers_by_plant: HashMap<String, Vec<&ContainerRecord>> = HashMap::new();
    for container in containers {
        if let Some(pid) = container.plant_id_string() {
            containers_by_plant.entry(pid).or_default().push(container);
        }
    }

    let mut results = Vec::with_capacity(plants.len());
    for plant in plants {
        let plant_id = plant.id_string();
        let matched: Vec<ContainerRecord> = plant_id
            .as_ref()
            .and_then(|pid| containers_by_plant.get(pid))
            .map(|list| list.iter().map(|c| (*c).clone()).collect())
            .unwrap_or_default();

        let location = matched
            .first()
            .and_then(|first| resolve_location(first, &locations_by_id, &locations_by_name))
            .cloned();

        if require_containers && matched.is_empty() {
            continue;
        }
        if require_location && location.is_none() {
            continue;
        }

        results.push(JoinedResult {
            plant,
            containers: matched,
            location,
            plant_id,
        });
    }
    results
}

/// Resolves a container's location: id reference first, then the
/// denormalized name.
fn resolve_location<'a>(
    container: &ContainerRecord,
    by_id: &HashMap<String, &'a LocationRecord>,
    by_name: &HashMap<String, &'a LocationRecord>,
) -> Option<&'a LocationRecord> {
    if let Some(loc) = container
        .location_id_string()
        .and_then(|id| by_id.get(&id).copied())
    {
        return Some(loc);
    }
    container
        .location_name_string()
        .and_then(|name| by_name.get(&name.trim().to_lowercase()).copied())
}
