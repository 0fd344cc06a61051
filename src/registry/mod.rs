//! Field/schema registry for the three tables.
//!
//! The registry owns the mapping from user-facing field spellings to
//! canonical field names. Plants resolve through an alias map (the sheet
//! uses Title Case headers, callers tend to write snake_case shorthands);
//! locations and containers match their canonical field lists by
//! normalized exact comparison. No fuzzy matching: a name either
//! canonicalizes or the query is rejected.
//!
//! The registry is built once at startup and passed by reference into the
//! parser, so tests can construct one with fixture aliases.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::records::normalize_key;

/// One of the three logical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Plants,
    Locations,
    Containers,
}

impl Table {
    /// Parses a table name as used in query filter keys.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "plants" => Some(Table::Plants),
            "locations" => Some(Table::Locations),
            "containers" => Some(Table::Containers),
            _ => None,
        }
    }

    /// The wire name of this table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Plants => "plants",
            Table::Locations => "locations",
            Table::Containers => "containers",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical plant columns as they appear on the sheet.
pub const PLANT_FIELDS: &[&str] = &[
    "Plant ID",
    "Plant Name",
    "Description",
    "Location",
    "Light Requirements",
    "Soil Preferences",
    "Watering Needs",
    "Fertilizing Schedule",
    "Pruning Instructions",
    "Care Notes",
    "Photo URL",
];

/// Canonical location columns.
pub const LOCATION_FIELDS: &[&str] = &[
    "location_id",
    "location_name",
    "morning_sun_hours",
    "afternoon_sun_hours",
    "evening_sun_hours",
    "total_sun_hours",
    "shade_pattern",
    "microclimate_conditions",
];

/// Canonical container columns.
pub const CONTAINER_FIELDS: &[&str] = &[
    "container_id",
    "plant_id",
    "location_id",
    "location_name",
    "container_type",
    "container_size",
    "container_material",
];

/// Field name failed to canonicalize for the given table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown field '{field}' for table '{table}'")]
pub struct UnknownField {
    pub table: Table,
    pub field: String,
}

/// Resolves user-facing field names to canonical column names.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    /// Normalized alias → canonical plant column.
    plant_aliases: HashMap<String, String>,
}

impl FieldRegistry {
    /// Builds a registry from an alias map of user spelling → canonical
    /// plant column. Alias keys are normalized on insert.
    pub fn new(plant_aliases: HashMap<String, String>) -> Self {
        let plant_aliases = plant_aliases
            .into_iter()
            .map(|(k, v)| (normalize_key(&k), v))
            .collect();
        Self { plant_aliases }
    }

    /// The alias map the production sheet uses.
    pub fn with_default_aliases() -> Self {
        let mut aliases = HashMap::new();
        for (alias, canonical) in [
            ("name", "Plant Name"),
            ("plant", "Plant Name"),
            ("id", "Plant ID"),
            ("light", "Light Requirements"),
            ("sun", "Light Requirements"),
            ("soil", "Soil Preferences"),
            ("water", "Watering Needs"),
            ("watering", "Watering Needs"),
            ("fertilizer", "Fertilizing Schedule"),
            ("fertilizing", "Fertilizing Schedule"),
            ("pruning", "Pruning Instructions"),
            ("notes", "Care Notes"),
            ("photo", "Photo URL"),
        ] {
            aliases.insert(alias.to_string(), canonical.to_string());
        }
        Self::new(aliases)
    }

    /// Canonicalizes a field name for a table.
    ///
    /// Plants consult the alias map first, then the canonical column list.
    /// All tables accept any spelling whose normalized form equals a
    /// canonical column's normalized form. Exact normalized match only.
    pub fn canonicalize(&self, table: Table, field: &str) -> Result<String, UnknownField> {
        let wanted = normalize_key(field);

        if table == Table::Plants {
            if let Some(canonical) = self.plant_aliases.get(&wanted) {
                return Ok(canonical.clone());
            }
        }

        let candidates = match table {
            Table::Plants => PLANT_FIELDS,
            Table::Locations => LOCATION_FIELDS,
            Table::Containers => CONTAINER_FIELDS,
        };

        candidates
            .iter()
            .find(|c| normalize_key(c) == wanted)
            .map(|c| c.to_string())
            .ok_or_else(|| UnknownField {
                table,
                field: field.to_string(),
            })
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_default_aliases()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_alias_resolves() {
        let registry = FieldRegistry::with_default_aliases();
        assert_eq!(
            registry.canonicalize(Table::Plants, "name").unwrap(),
            "Plant Name"
        );
        assert_eq!(
            registry.canonicalize(Table::Plants, "light").unwrap(),
            "Light Requirements"
        );
    }

    #[test]
    fn test_plant_canonical_spelling_variants() {
        let registry = FieldRegistry::with_default_aliases();
        for spelling in ["Plant Name", "plant_name", "plant-name", "PLANT NAME"] {
            assert_eq!(
                registry.canonicalize(Table::Plants, spelling).unwrap(),
                "Plant Name",
                "spelling {:?}",
                spelling
            );
        }
    }

    #[test]
    fn test_location_and_container_normalized_match() {
        let registry = FieldRegistry::with_default_aliases();
        assert_eq!(
            registry
                .canonicalize(Table::Locations, "Location Name")
                .unwrap(),
            "location_name"
        );
        assert_eq!(
            registry
                .canonicalize(Table::Containers, "Container-Size")
                .unwrap(),
            "container_size"
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let registry = FieldRegistry::with_default_aliases();
        let err = registry
            .canonicalize(Table::Plants, "NoSuchField")
            .unwrap_err();
        assert_eq!(err.field, "NoSuchField");
        assert_eq!(err.table, Table::Plants);
    }

    #[test]
    fn test_no_partial_matching() {
        let registry = FieldRegistry::with_default_aliases();
        // Prefix of a real column is not good enough.
        assert!(registry.canonicalize(Table::Locations, "location").is_err());
    }

    #[test]
    fn test_table_parse() {
        assert_eq!(Table::parse("plants"), Some(Table::Plants));
        assert_eq!(Table::parse("Plants"), None);
        assert_eq!(Table::parse("weather"), None);
    }
}
