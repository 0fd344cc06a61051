//! Multi-key sort and limit stage.
//!
//! Keys are applied by repeatedly re-sorting (stable) from the last
//! requested key to the first, so the first key dominates. Per-key values
//! resolve from the plant record first, then the joined location, then the
//! first container.
//!
//! The comparator is numeric-aware: when both sides parse as f64 they
//! compare numerically, otherwise as lowercased strings. (A purely
//! lexicographic comparison would order "10" before "2" on numeric
//! columns such as sun hours.)
//!
//! Unknown sort fields resolve to no value on every row and therefore
//! compare equal; the parser does not validate sort fields against a
//! table.

use std::cmp::Ordering;

use serde_json::Value;

use crate::records::{value_to_string, FieldAccess};

use super::join::JoinedResult;
use super::plan::{SortDirection, SortKey};

/// Sorts joined results in place by the requested keys.
pub fn sort_results(results: &mut [JoinedResult], keys: &[SortKey]) {
    for key in keys.iter().rev() {
        results.sort_by(|a, b| {
            let ordering = compare_values(resolve_sort_value(a, &key.field), resolve_sort_value(b, &key.field));
            match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

/// Truncates results to the requested limit. Applied after sorting.
pub fn apply_limit(results: &mut Vec<JoinedResult>, limit: usize) {
    results.truncate(limit);
}

/// Resolves a sort value: plant fields first, then location, then the
/// first container.
fn resolve_sort_value(result: &JoinedResult, field: &str) -> Option<Value> {
    if let Some(v) = result.plant.get_field(field) {
        return Some(v);
    }
    if let Some(location) = &result.location {
        if let Some(v) = location.get_field(field) {
            return Some(v);
        }
    }
    result
        .first_container()
        .and_then(|container| container.get_field(field))
}

/// Numeric-aware comparison; falls back to lowercased string ordering.
/// Missing values sort as empty strings (first, ascending).
fn compare_values(a: Option<Value>, b: Option<Value>) -> Ordering {
    let a_str = a.as_ref().map(value_to_string).unwrap_or_default();
    let b_str = b.as_ref().map(value_to_string).unwrap_or_default();

    if let (Ok(a_num), Ok(b_num)) = (a_str.trim().parse::<f64>(), b_str.trim().parse::<f64>()) {
        return a_num.partial_cmp(&b_num).unwrap_or(Ordering::Equal);
    }

    a_str.to_lowercase().cmp(&b_str.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::PlantRecord;
    use serde_json::json;

    fn result(fields: serde_json::Value) -> JoinedResult {
        let plant: PlantRecord = serde_json::from_value(fields).unwrap();
        JoinedResult {
            plant_id: plant.id_string(),
            plant,
            containers: Vec::new(),
            location: None,
        }
    }

    fn names(results: &[JoinedResult]) -> Vec<String> {
        results.iter().filter_map(|r| r.plant.name_string()).collect()
    }

    fn key(field: &str, direction: SortDirection) -> SortKey {
        SortKey {
            field: field.to_string(),
            direction,
        }
    }

    #[test]
    fn test_single_key_ascending_case_insensitive() {
        let mut results = vec![
            result(json!({"Plant Name": "vinca"})),
            result(json!({"Plant Name": "Hostas"})),
            result(json!({"Plant Name": "Astilbe"})),
        ];
        sort_results(&mut results, &[key("Plant Name", SortDirection::Asc)]);
        assert_eq!(names(&results), vec!["Astilbe", "Hostas", "vinca"]);
    }

    #[test]
    fn test_descending_reverses_key() {
        let mut results = vec![
            result(json!({"Plant Name": "Astilbe"})),
            result(json!({"Plant Name": "Vinca"})),
        ];
        sort_results(&mut results, &[key("Plant Name", SortDirection::Desc)]);
        assert_eq!(names(&results), vec!["Vinca", "Astilbe"]);
    }

    #[test]
    fn test_numeric_values_compare_numerically() {
        // "10" must sort after "2", not before it.
        let mut results = vec![
            result(json!({"Plant Name": "a", "Watering Needs": "10"})),
            result(json!({"Plant Name": "b", "Watering Needs": "2"})),
        ];
        sort_results(&mut results, &[key("Watering Needs", SortDirection::Asc)]);
        assert_eq!(names(&results), vec!["b", "a"]);
    }

    #[test]
    fn test_multi_key_first_key_dominates() {
        let mut results = vec![
            result(json!({"Plant Name": "b", "Light Requirements": "Shade"})),
            result(json!({"Plant Name": "a", "Light Requirements": "Sun"})),
            result(json!({"Plant Name": "c", "Light Requirements": "Shade"})),
        ];
        sort_results(
            &mut results,
            &[
                key("Light Requirements", SortDirection::Asc),
                key("Plant Name", SortDirection::Asc),
            ],
        );
        assert_eq!(names(&results), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_unknown_field_sorts_everything_equal() {
        let mut results = vec![
            result(json!({"Plant Name": "b"})),
            result(json!({"Plant Name": "a"})),
        ];
        // Stable sort on an unresolvable key keeps input order.
        sort_results(&mut results, &[key("no_such_field", SortDirection::Asc)]);
        assert_eq!(names(&results), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_value_falls_back_to_location_then_container() {
        let location: crate::records::LocationRecord =
            serde_json::from_value(json!({"location_name": "Patio", "total_sun_hours": 6}))
                .unwrap();
        let mut with_location = result(json!({"Plant Name": "a"}));
        with_location.location = Some(location);
        assert_eq!(
            resolve_sort_value(&with_location, "total_sun_hours"),
            Some(json!(6))
        );

        let container: crate::records::ContainerRecord =
            serde_json::from_value(json!({"container_size": "small"})).unwrap();
        let mut with_container = result(json!({"Plant Name": "a"}));
        with_container.containers = vec![container];
        assert_eq!(
            resolve_sort_value(&with_container, "container_size"),
            Some(json!("small"))
        );
    }

    #[test]
    fn test_limit_truncates_after_sort() {
        let mut results = vec![
            result(json!({"Plant Name": "c"})),
            result(json!({"Plant Name": "a"})),
            result(json!({"Plant Name": "d"})),
            result(json!({"Plant Name": "b"})),
        ];
        sort_results(&mut results, &[key("Plant Name", SortDirection::Asc)]);
        apply_limit(&mut results, 2);
        assert_eq!(names(&results), vec!["a", "b"]);
    }
}
