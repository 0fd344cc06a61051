//! Parsed query plan types.
//!
//! A plan is the validated, normalized form of an advanced-query request:
//! per-table condition lists, join mode, included sections, response
//! format, sort keys, and limit. Plans are produced only by the parser;
//! downstream stages can assume every invariant the parser enforced.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::Table;

/// Supported filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Case-insensitive equality
    #[serde(rename = "$eq")]
    Eq,
    /// Case-insensitive inequality
    #[serde(rename = "$ne")]
    Ne,
    /// Membership in an array
    #[serde(rename = "$in")]
    In,
    /// Non-membership in an array
    #[serde(rename = "$nin")]
    Nin,
    /// Numeric greater-than
    #[serde(rename = "$gt")]
    Gt,
    /// Numeric greater-or-equal
    #[serde(rename = "$gte")]
    Gte,
    /// Numeric less-than
    #[serde(rename = "$lt")]
    Lt,
    /// Numeric less-or-equal
    #[serde(rename = "$lte")]
    Lte,
    /// Case-insensitive regex search
    #[serde(rename = "$regex")]
    Regex,
    /// Presence / non-emptiness test
    #[serde(rename = "$exists")]
    Exists,
    /// Case-insensitive substring test
    #[serde(rename = "$contains")]
    Contains,
}

impl FilterOperator {
    /// Parses the wire spelling of an operator.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "$eq" => Some(Self::Eq),
            "$ne" => Some(Self::Ne),
            "$in" => Some(Self::In),
            "$nin" => Some(Self::Nin),
            "$gt" => Some(Self::Gt),
            "$gte" => Some(Self::Gte),
            "$lt" => Some(Self::Lt),
            "$lte" => Some(Self::Lte),
            "$regex" => Some(Self::Regex),
            "$exists" => Some(Self::Exists),
            "$contains" => Some(Self::Contains),
            _ => None,
        }
    }

    /// The wire spelling of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Ne => "$ne",
            Self::In => "$in",
            Self::Nin => "$nin",
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
            Self::Regex => "$regex",
            Self::Exists => "$exists",
            Self::Contains => "$contains",
        }
    }
}

/// How multiple conditions on one table combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    And,
    Or,
}

/// Output shape for the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Summary,
    Detailed,
    Minimal,
    IdsOnly,
}

impl ResponseFormat {
    /// The wire name of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Detailed => "detailed",
            Self::Minimal => "minimal",
            Self::IdsOnly => "ids_only",
        }
    }
}

/// A section that `detailed` output may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IncludeSection {
    Plants,
    Locations,
    Containers,
    /// Context enrichment via the external plant-context lookup.
    Context,
}

impl IncludeSection {
    /// Parses the wire spelling of a section.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "plants" => Some(Self::Plants),
            "locations" => Some(Self::Locations),
            "containers" => Some(Self::Containers),
            "context" => Some(Self::Context),
            _ => None,
        }
    }
}

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One sort key. Field validity against a table is deliberately not
/// checked at parse time; an unknown field sorts every row as equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// One validated field/operator/value condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub table: Table,
    /// Canonical field name, already resolved by the registry.
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

/// A validated, normalized query plan.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    /// Conditions grouped per table. Tables without an entry pass their
    /// full snapshot through unfiltered.
    pub filters: BTreeMap<Table, Vec<Condition>>,
    pub join_type: JoinType,
    pub include: Vec<IncludeSection>,
    pub response_format: ResponseFormat,
    pub limit: usize,
    pub sort: Vec<SortKey>,
}

impl Default for QueryPlan {
    /// The plan an empty `{}` request parses to.
    fn default() -> Self {
        Self {
            filters: BTreeMap::new(),
            join_type: JoinType::And,
            include: vec![
                IncludeSection::Plants,
                IncludeSection::Locations,
                IncludeSection::Containers,
            ],
            response_format: ResponseFormat::Summary,
            limit: super::parser::DEFAULT_LIMIT,
            sort: Vec::new(),
        }
    }
}

impl QueryPlan {
    /// Whether the caller put any conditions on the given table. Drives
    /// inner-vs-left join semantics downstream.
    pub fn has_filters_for(&self, table: Table) -> bool {
        self.filters.get(&table).map_or(false, |c| !c.is_empty())
    }

    /// Whether `detailed` output should carry the given section.
    pub fn includes(&self, section: IncludeSection) -> bool {
        self.include.contains(&section)
    }

    /// The wire names of tables that carried filters, for metadata.
    pub fn tables_queried(&self) -> Vec<&'static str> {
        self.filters.keys().map(|t| t.as_str()).collect()
    }
}
