//! Response formatter: renders joined results into one of four shapes.
//!
//! - `ids_only`: plant ids and a match count.
//! - `minimal`: id, name, location per plant.
//! - `summary`: aggregation maps (by plant type, container descriptor,
//!   location name) plus up to five sample records.
//! - `detailed`: full per-result records, sections selected by `include`,
//!   optionally enriched with a context block from the store.
//!
//! Context lookups are best-effort: a failing lookup is logged and the
//! field is left null. This is the only place in the pipeline where
//! partial degradation is permitted.

use serde_json::{json, Map, Value};

use crate::observability::Logger;
use crate::records::FieldAccess;
use crate::store::SnapshotStore;

use super::join::JoinedResult;
use super::plan::{IncludeSection, QueryPlan, ResponseFormat};

/// Number of full sample records a summary carries.
const SUMMARY_SAMPLE_SIZE: usize = 5;

/// Key used in aggregation maps when a record has no usable name.
const UNKNOWN_KEY: &str = "Unknown";

/// Renders the final (sorted, limited) result set.
pub fn format_results(
    results: &[JoinedResult],
    plan: &QueryPlan,
    store: &impl SnapshotStore,
) -> Value {
    match plan.response_format {
        ResponseFormat::IdsOnly => format_ids_only(results),
        ResponseFormat::Minimal => format_minimal(results),
        ResponseFormat::Summary => format_summary(results),
        ResponseFormat::Detailed => format_detailed(results, plan, store),
    }
}

fn format_ids_only(results: &[JoinedResult]) -> Value {
    let ids: Vec<Value> = results
        .iter()
        .map(|r| Value::String(r.plant_id.clone().unwrap_or_default()))
        .collect();
    json!({
        "plant_ids": ids,
        "total_matches": results.len(),
    })
}

fn format_minimal(results: &[JoinedResult]) -> Value {
    let plants: Vec<Value> = results
        .iter()
        .map(|r| {
            json!({
                "plant_id": r.plant_id.clone().unwrap_or_default(),
                "plant_name": r.plant.name_string().unwrap_or_default(),
                "location": minimal_location(r),
            })
        })
        .collect();
    json!({
        "plants": plants,
        "total_matches": results.len(),
    })
}

/// Location string for minimal output: the joined location is
/// authoritative, the plant row's free text is the fallback.
fn minimal_location(result: &JoinedResult) -> String {
    result
        .location
        .as_ref()
        .and_then(|l| l.name_string())
        .or_else(|| result.plant.location_string())
        .unwrap_or_default()
}

fn format_summary(results: &[JoinedResult]) -> Value {
    let mut by_plant_type: Map<String, Value> = Map::new();
    let mut by_container: Map<String, Value> = Map::new();
    let mut by_location: Map<String, Value> = Map::new();

    for result in results {
        let name = result
            .plant
            .name_string()
            .unwrap_or_else(|| UNKNOWN_KEY.to_string());
        bump(&mut by_plant_type, &name);

        for container in &result.containers {
            let descriptor = container.descriptor();
            if !descriptor.is_empty() {
                bump(&mut by_container, &descriptor);
            }
        }

        let location = result
            .location
            .as_ref()
            .and_then(|l| l.name_string())
            .unwrap_or_else(|| UNKNOWN_KEY.to_string());
        bump(&mut by_location, &location);
    }

    let sample_plants: Vec<Value> = results
        .iter()
        .take(SUMMARY_SAMPLE_SIZE)
        .map(summary_sample)
        .collect();

    json!({
        "total_matches": results.len(),
        "by_plant_type": by_plant_type,
        "by_container": by_container,
        "by_location": by_location,
        "sample_plants": sample_plants,
    })
}

fn bump(map: &mut Map<String, Value>, key: &str) {
    let count = map.get(key).and_then(Value::as_u64).unwrap_or(0);
    map.insert(key.to_string(), json!(count + 1));
}

/// One full sample record with nested container summaries.
fn summary_sample(result: &JoinedResult) -> Value {
    let containers: Vec<Value> = result
        .containers
        .iter()
        .map(|c| {
            json!({
                "container_id": c.container_id.clone().unwrap_or(Value::Null),
                "container_type": c.container_type.clone().unwrap_or(Value::Null),
                "container_size": c.container_size.clone().unwrap_or(Value::Null),
                "container_material": c.container_material.clone().unwrap_or(Value::Null),
            })
        })
        .collect();

    json!({
        "plant_id": result.plant_id.clone().unwrap_or_default(),
        "plant_data": result.plant.to_value(),
        "location_name": result
            .location
            .as_ref()
            .and_then(|l| l.name_string())
            .map(Value::String)
            .unwrap_or(Value::Null),
        "containers": containers,
    })
}

fn format_detailed(
    results: &[JoinedResult],
    plan: &QueryPlan,
    store: &impl SnapshotStore,
) -> Value {
    let plants: Vec<Value> = results
        .iter()
        .map(|result| {
            let mut record = Map::new();
            record.insert(
                "plant_id".to_string(),
                Value::String(result.plant_id.clone().unwrap_or_default()),
            );
            if plan.includes(IncludeSection::Plants) {
                record.insert("plant_data".to_string(), result.plant.to_value());
            }
            if plan.includes(IncludeSection::Locations) {
                let location = result
                    .location
                    .as_ref()
                    .map(|l| l.to_value())
                    .unwrap_or(Value::Null);
                record.insert("location_data".to_string(), location);
            }
            if plan.includes(IncludeSection::Containers) {
                let containers: Vec<Value> =
                    result.containers.iter().map(|c| c.to_value()).collect();
                record.insert("containers".to_string(), Value::Array(containers));
            }
            if plan.includes(IncludeSection::Context) {
                record.insert("context".to_string(), lookup_context(result, store));
            }
            Value::Object(record)
        })
        .collect();

    json!({
        "plants": plants,
        "total_matches": results.len(),
    })
}

/// Best-effort context enrichment. Failures are logged and degrade to
/// null; they never abort the response.
fn lookup_context(result: &JoinedResult, store: &impl SnapshotStore) -> Value {
    let Some(plant_id) = &result.plant_id else {
        return Value::Null;
    };
    match store.resolve_plant_context(plant_id) {
        Ok(Some(context)) => context,
        Ok(None) => Value::Null,
        Err(e) => {
            Logger::warn(
                "CONTEXT_LOOKUP_FAILED",
                &[("plant_id", plant_id.as_str()), ("reason", &e.to_string())],
            );
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ContainerRecord, LocationRecord, PlantRecord};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn joined(
        plant: Value,
        containers: Value,
        location: Option<Value>,
    ) -> JoinedResult {
        let plant: PlantRecord = serde_json::from_value(plant).unwrap();
        let containers: Vec<ContainerRecord> = serde_json::from_value(containers).unwrap();
        let location: Option<LocationRecord> =
            location.map(|l| serde_json::from_value(l).unwrap());
        JoinedResult {
            plant_id: plant.id_string(),
            plant,
            containers,
            location,
        }
    }

    fn fixture() -> Vec<JoinedResult> {
        vec![
            joined(
                json!({"Plant ID": "1", "Plant Name": "Vinca"}),
                json!([{"container_id": "C1", "container_type": "pot",
                        "container_size": "small", "container_material": "plastic"}]),
                Some(json!({"location_id": "L1", "location_name": "Back Patio"})),
            ),
            joined(
                json!({"Plant ID": "2", "Plant Name": "Hostas", "Location": "Shade Bed"}),
                json!([]),
                None,
            ),
        ]
    }

    fn plan_with(format: ResponseFormat) -> QueryPlan {
        QueryPlan {
            response_format: format,
            include: vec![
                IncludeSection::Plants,
                IncludeSection::Locations,
                IncludeSection::Containers,
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_ids_only_shape() {
        let store = MemoryStore::new();
        let out = format_results(&fixture(), &plan_with(ResponseFormat::IdsOnly), &store);
        assert_eq!(out, json!({"plant_ids": ["1", "2"], "total_matches": 2}));
    }

    #[test]
    fn test_minimal_shape_prefers_joined_location() {
        let store = MemoryStore::new();
        let out = format_results(&fixture(), &plan_with(ResponseFormat::Minimal), &store);
        assert_eq!(out["total_matches"], json!(2));
        assert_eq!(out["plants"][0]["location"], json!("Back Patio"));
        // No joined location: the plant row's free text is used.
        assert_eq!(out["plants"][1]["location"], json!("Shade Bed"));
    }

    #[test]
    fn test_summary_aggregations() {
        let store = MemoryStore::new();
        let out = format_results(&fixture(), &plan_with(ResponseFormat::Summary), &store);
        assert_eq!(out["total_matches"], json!(2));
        assert_eq!(out["by_plant_type"]["Vinca"], json!(1));
        assert_eq!(out["by_container"]["small plastic"], json!(1));
        assert_eq!(out["by_location"]["Back Patio"], json!(1));
        assert_eq!(out["by_location"]["Unknown"], json!(1));
        assert_eq!(out["sample_plants"].as_array().unwrap().len(), 2);
        assert_eq!(
            out["sample_plants"][0]["containers"][0]["container_size"],
            json!("small")
        );
    }

    #[test]
    fn test_summary_samples_capped_at_five() {
        let store = MemoryStore::new();
        let results: Vec<JoinedResult> = (0..8)
            .map(|i| {
                joined(
                    json!({"Plant ID": i.to_string(), "Plant Name": "Fern"}),
                    json!([]),
                    None,
                )
            })
            .collect();
        let out = format_results(&results, &plan_with(ResponseFormat::Summary), &store);
        assert_eq!(out["total_matches"], json!(8));
        assert_eq!(out["sample_plants"].as_array().unwrap().len(), 5);
        assert_eq!(out["by_plant_type"]["Fern"], json!(8));
    }

    #[test]
    fn test_detailed_respects_include_sections() {
        let store = MemoryStore::new();
        let mut plan = plan_with(ResponseFormat::Detailed);
        plan.include = vec![IncludeSection::Plants];
        let out = format_results(&fixture(), &plan, &store);
        let first = &out["plants"][0];
        assert!(first.get("plant_data").is_some());
        assert!(first.get("location_data").is_none());
        assert!(first.get("containers").is_none());
        assert!(first.get("context").is_none());
    }

    #[test]
    fn test_detailed_sections_carry_full_records() {
        let store = MemoryStore::new();
        let out = format_results(&fixture(), &plan_with(ResponseFormat::Detailed), &store);
        let first = &out["plants"][0];
        assert_eq!(first["plant_data"]["Plant Name"], json!("Vinca"));
        assert_eq!(first["location_data"]["location_name"], json!("Back Patio"));
        assert_eq!(first["containers"][0]["container_material"], json!("plastic"));
        // No joined location serializes as null, not a missing key.
        assert_eq!(out["plants"][1]["location_data"], Value::Null);
    }

    #[test]
    fn test_summary_sample_carries_full_plant_record() {
        let store = MemoryStore::new();
        let out = format_results(&fixture(), &plan_with(ResponseFormat::Summary), &store);
        assert_eq!(
            out["sample_plants"][0]["plant_data"]["Plant Name"],
            json!("Vinca")
        );
    }

    #[test]
    fn test_detailed_context_enrichment() {
        let store = MemoryStore::new().with_context("1", json!({"sun": "morning only"}));
        let mut plan = plan_with(ResponseFormat::Detailed);
        plan.include.push(IncludeSection::Context);
        let out = format_results(&fixture(), &plan, &store);
        assert_eq!(out["plants"][0]["context"], json!({"sun": "morning only"}));
        assert_eq!(out["plants"][1]["context"], Value::Null);
    }

    #[test]
    fn test_failing_context_lookup_degrades_to_null() {
        let store = MemoryStore::new().with_failing_context();
        let mut plan = plan_with(ResponseFormat::Detailed);
        plan.include.push(IncludeSection::Context);
        let out = format_results(&fixture(), &plan, &store);
        // Still a complete response; the context field is just null.
        assert_eq!(out["total_matches"], json!(2));
        assert_eq!(out["plants"][0]["context"], Value::Null);
    }
}
