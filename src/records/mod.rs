//! Typed records for the three tables: plants, locations, containers.
//!
//! Rows arrive from a spreadsheet snapshot, so every field is optional and
//! spelling of column headers is not guaranteed. Each record declares its
//! known fields explicitly and keeps an escape-hatch map for columns the
//! snapshot grew that this build does not know about. Field lookup is
//! static dispatch over normalized names, falling back to a normalized
//! scan of the extra map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalizes a field name for comparison: trimmed, lowercased,
/// spaces and hyphens folded to underscores.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Renders a field value as a plain string for comparison and display.
///
/// Numbers keep their JSON rendering; null and containers render empty
/// (containers never hold scalar cell data in practice).
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Read access to a record's fields by loosely-spelled name.
pub trait FieldAccess {
    /// Looks up a field value. Known fields dispatch on the normalized
    /// name; unknown names fall back to the extra map, first by exact key
    /// and then by normalized comparison against every extra key.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Serializes the record back to a JSON object.
    fn to_value(&self) -> Value;
}

/// Scans an extra map for a key: exact match first, then normalized.
fn extra_lookup(extra: &Map<String, Value>, name: &str) -> Option<Value> {
    if let Some(v) = extra.get(name) {
        return Some(v.clone());
    }
    let wanted = normalize_key(name);
    extra
        .iter()
        .find(|(k, _)| normalize_key(k) == wanted)
        .map(|(_, v)| v.clone())
}

/// A plant row. Canonical column headers are Title Case, matching the
/// sheet; snake_case aliases are accepted on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    #[serde(
        rename = "Plant ID",
        alias = "plant_id",
        alias = "ID",
        alias = "id",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub plant_id: Option<Value>,

    #[serde(
        rename = "Plant Name",
        alias = "plant_name",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub plant_name: Option<Value>,

    #[serde(
        rename = "Description",
        alias = "description",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub description: Option<Value>,

    /// Free-text location string on the plant row itself. The join engine
    /// prefers the location implied by the plant's first container.
    #[serde(
        rename = "Location",
        alias = "location",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub location: Option<Value>,

    #[serde(
        rename = "Light Requirements",
        alias = "light_requirements",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub light_requirements: Option<Value>,

    #[serde(
        rename = "Soil Preferences",
        alias = "soil_preferences",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub soil_preferences: Option<Value>,

    #[serde(
        rename = "Watering Needs",
        alias = "watering_needs",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub watering_needs: Option<Value>,

    #[serde(
        rename = "Fertilizing Schedule",
        alias = "fertilizing_schedule",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub fertilizing_schedule: Option<Value>,

    #[serde(
        rename = "Pruning Instructions",
        alias = "pruning_instructions",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub pruning_instructions: Option<Value>,

    #[serde(
        rename = "Care Notes",
        alias = "care_notes",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub care_notes: Option<Value>,

    #[serde(
        rename = "Photo URL",
        alias = "photo_url",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub photo_url: Option<Value>,

    /// Columns this build does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlantRecord {
    /// Resolves the plant id from whichever key variant the row carried,
    /// rendered as a string for grouping and output.
    pub fn id_string(&self) -> Option<String> {
        self.plant_id
            .as_ref()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                extra_lookup(&self.extra, "plant_id")
                    .map(|v| value_to_string(&v))
                    .filter(|s| !s.is_empty())
            })
    }

    /// Display name, tolerant of key variants.
    pub fn name_string(&self) -> Option<String> {
        self.get_field("Plant Name")
            .map(|v| value_to_string(&v))
            .filter(|s| !s.is_empty())
    }

    /// Free-text location string from the plant row.
    pub fn location_string(&self) -> Option<String> {
        self.get_field("Location")
            .map(|v| value_to_string(&v))
            .filter(|s| !s.is_empty())
    }
}

impl FieldAccess for PlantRecord {
    fn get_field(&self, name: &str) -> Option<Value> {
        let known = match normalize_key(name).as_str() {
            "plant_id" | "id" => self.plant_id.clone(),
            "plant_name" => self.plant_name.clone(),
            "description" => self.description.clone(),
            "location" => self.location.clone(),
            "light_requirements" => self.light_requirements.clone(),
            "soil_preferences" => self.soil_preferences.clone(),
            "watering_needs" => self.watering_needs.clone(),
            "fertilizing_schedule" => self.fertilizing_schedule.clone(),
            "pruning_instructions" => self.pruning_instructions.clone(),
            "care_notes" => self.care_notes.clone(),
            "photo_url" => self.photo_url.clone(),
            _ => None,
        };
        known.or_else(|| extra_lookup(&self.extra, name))
    }

    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A garden location row. Canonical headers are snake_case; Title Case
/// aliases are accepted on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(
        alias = "Location ID",
        alias = "ID",
        alias = "id",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub location_id: Option<Value>,

    #[serde(
        alias = "Location Name",
        alias = "name",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub location_name: Option<Value>,

    #[serde(
        alias = "Morning Sun Hours",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub morning_sun_hours: Option<Value>,

    #[serde(
        alias = "Afternoon Sun Hours",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub afternoon_sun_hours: Option<Value>,

    #[serde(
        alias = "Evening Sun Hours",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub evening_sun_hours: Option<Value>,

    /// Stored total; derived from the three part sums when absent.
    #[serde(
        alias = "Total Sun Hours",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub total_sun_hours: Option<Value>,

    #[serde(
        alias = "Shade Pattern",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub shade_pattern: Option<Value>,

    #[serde(
        alias = "Microclimate Conditions",
        alias = "microclimate",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub microclimate_conditions: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocationRecord {
    /// Location id rendered as a string.
    pub fn id_string(&self) -> Option<String> {
        self.location_id
            .as_ref()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
    }

    /// Location name rendered as a string.
    pub fn name_string(&self) -> Option<String> {
        self.location_name
            .as_ref()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
    }

    fn sun_part(&self, part: &Option<Value>) -> Option<f64> {
        part.as_ref().and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }

    /// Total sun hours: stored value if present, otherwise the sum of the
    /// morning/afternoon/evening parts that parse as numbers.
    pub fn total_sun_hours_value(&self) -> Option<Value> {
        if let Some(v) = &self.total_sun_hours {
            return Some(v.clone());
        }
        let parts = [
            self.sun_part(&self.morning_sun_hours),
            self.sun_part(&self.afternoon_sun_hours),
            self.sun_part(&self.evening_sun_hours),
        ];
        if parts.iter().all(|p| p.is_none()) {
            return None;
        }
        let total: f64 = parts.iter().flatten().sum();
        serde_json::Number::from_f64(total).map(Value::Number)
    }
}

impl FieldAccess for LocationRecord {
    fn get_field(&self, name: &str) -> Option<Value> {
        let known = match normalize_key(name).as_str() {
            "location_id" | "id" => self.location_id.clone(),
            "location_name" | "name" => self.location_name.clone(),
            "morning_sun_hours" => self.morning_sun_hours.clone(),
            "afternoon_sun_hours" => self.afternoon_sun_hours.clone(),
            "evening_sun_hours" => self.evening_sun_hours.clone(),
            "total_sun_hours" => self.total_sun_hours_value(),
            "shade_pattern" => self.shade_pattern.clone(),
            "microclimate_conditions" | "microclimate" => {
                self.microclimate_conditions.clone()
            }
            _ => None,
        };
        known.or_else(|| extra_lookup(&self.extra, name))
    }

    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A container row linking a plant to a location. Both foreign references
/// may be stale or missing; the join engine treats them as hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerRecord {
    #[serde(
        alias = "Container ID",
        alias = "ID",
        alias = "id",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub container_id: Option<Value>,

    #[serde(
        alias = "Plant ID",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub plant_id: Option<Value>,

    #[serde(
        alias = "Location ID",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub location_id: Option<Value>,

    /// Denormalized location name, used as a join fallback when the
    /// location_id reference does not resolve.
    #[serde(
        alias = "Location Name",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub location_name: Option<Value>,

    #[serde(
        alias = "Container Type",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub container_type: Option<Value>,

    #[serde(
        alias = "Container Size",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub container_size: Option<Value>,

    #[serde(
        alias = "Container Material",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub container_material: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContainerRecord {
    /// Referenced plant id rendered as a string.
    pub fn plant_id_string(&self) -> Option<String> {
        self.plant_id
            .as_ref()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
    }

    /// Referenced location id rendered as a string.
    pub fn location_id_string(&self) -> Option<String> {
        self.location_id
            .as_ref()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
    }

    /// Denormalized location name rendered as a string.
    pub fn location_name_string(&self) -> Option<String> {
        self.location_name
            .as_ref()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
    }

    /// Human descriptor like "small plastic", built from size and material.
    pub fn descriptor(&self) -> String {
        let size = self
            .container_size
            .as_ref()
            .map(value_to_string)
            .unwrap_or_default();
        let material = self
            .container_material
            .as_ref()
            .map(value_to_string)
            .unwrap_or_default();
        format!("{} {}", size, material).trim().to_string()
    }
}

impl FieldAccess for ContainerRecord {
    fn get_field(&self, name: &str) -> Option<Value> {
        let known = match normalize_key(name).as_str() {
            "container_id" | "id" => self.container_id.clone(),
            "plant_id" => self.plant_id.clone(),
            "location_id" => self.location_id.clone(),
            "location_name" => self.location_name.clone(),
            "container_type" => self.container_type.clone(),
            "container_size" => self.container_size.clone(),
            "container_material" => self.container_material.clone(),
            _ => None,
        };
        known.or_else(|| extra_lookup(&self.extra, name))
    }

    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Plant Name"), "plant_name");
        assert_eq!(normalize_key("container-size"), "container_size");
        assert_eq!(normalize_key("  Total Sun Hours "), "total_sun_hours");
    }

    #[test]
    fn test_plant_deserializes_title_case_and_snake_case() {
        let a: PlantRecord =
            serde_json::from_value(json!({"Plant ID": "1", "Plant Name": "Vinca"})).unwrap();
        let b: PlantRecord =
            serde_json::from_value(json!({"plant_id": "1", "plant_name": "Vinca"})).unwrap();
        assert_eq!(a.id_string().as_deref(), Some("1"));
        assert_eq!(b.name_string().as_deref(), Some("Vinca"));
    }

    #[test]
    fn test_field_lookup_tolerates_variants() {
        let plant: PlantRecord =
            serde_json::from_value(json!({"Plant Name": "Hostas"})).unwrap();
        assert_eq!(plant.get_field("plant_name"), Some(json!("Hostas")));
        assert_eq!(plant.get_field("Plant Name"), Some(json!("Hostas")));
        assert_eq!(plant.get_field("PLANT-NAME"), Some(json!("Hostas")));
    }

    #[test]
    fn test_unknown_column_lands_in_extra_and_is_reachable() {
        let plant: PlantRecord =
            serde_json::from_value(json!({"Plant Name": "Fern", "Bloom Season": "Spring"}))
                .unwrap();
        assert_eq!(plant.extra.get("Bloom Season"), Some(&json!("Spring")));
        assert_eq!(plant.get_field("bloom_season"), Some(json!("Spring")));
    }

    #[test]
    fn test_numeric_plant_id_stringifies() {
        let plant: PlantRecord = serde_json::from_value(json!({"Plant ID": 7})).unwrap();
        assert_eq!(plant.id_string().as_deref(), Some("7"));
    }

    #[test]
    fn test_total_sun_hours_derived_from_parts() {
        let loc: LocationRecord = serde_json::from_value(json!({
            "location_id": "L1",
            "morning_sun_hours": 2,
            "afternoon_sun_hours": 4,
            "evening_sun_hours": 1.5
        }))
        .unwrap();
        assert_eq!(loc.get_field("total_sun_hours"), Some(json!(7.5)));
    }

    #[test]
    fn test_total_sun_hours_prefers_stored_value() {
        let loc: LocationRecord = serde_json::from_value(json!({
            "morning_sun_hours": 2,
            "total_sun_hours": 9
        }))
        .unwrap();
        assert_eq!(loc.get_field("total_sun_hours"), Some(json!(9)));
    }

    #[test]
    fn test_container_descriptor_trims_missing_parts() {
        let full: ContainerRecord = serde_json::from_value(
            json!({"container_size": "small", "container_material": "plastic"}),
        )
        .unwrap();
        assert_eq!(full.descriptor(), "small plastic");

        let size_only: ContainerRecord =
            serde_json::from_value(json!({"container_size": "large"})).unwrap();
        assert_eq!(size_only.descriptor(), "large");
    }

    #[test]
    fn test_round_trip_preserves_extra() {
        let src = json!({"Plant Name": "Fern", "Bloom Season": "Spring"});
        let plant: PlantRecord = serde_json::from_value(src).unwrap();
        let out = plant.to_value();
        assert_eq!(out["Plant Name"], json!("Fern"));
        assert_eq!(out["Bloom Season"], json!("Spring"));
    }
}
