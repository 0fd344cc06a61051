//! Query engine error types.
//!
//! Two error kinds leave this layer: `QueryParseError` for any structurally
//! or semantically invalid request (client error, never retried) and
//! `QueryExecutionError` wrapping failures during loading, filtering,
//! joining, sorting, or formatting (server error). Context-enrichment
//! lookups during detailed formatting are the one deliberate exception:
//! their failures are logged and the field is omitted.

use thiserror::Error;

use crate::registry::UnknownField;
use crate::store::StoreError;

/// Result type for query parsing.
pub type ParseResult<T> = Result<T, QueryParseError>;

/// Result type for query execution.
pub type ExecResult<T> = Result<T, QueryExecutionError>;

/// A structurally or semantically invalid query request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryParseError {
    /// Query body is not a JSON object.
    #[error("Query must be a JSON object")]
    NotAnObject,

    /// `join` was neither AND nor OR.
    #[error("Invalid join type '{0}': must be AND or OR")]
    InvalidJoin(String),

    /// `response_format` was not one of the four literals.
    #[error("Invalid response_format '{0}': must be one of summary, detailed, minimal, ids_only")]
    InvalidResponseFormat(String),

    /// An `include` entry was not a known section.
    #[error("Invalid include entry '{0}': must be one of plants, locations, containers, context")]
    InvalidInclude(String),

    /// `include` was not an array of strings.
    #[error("include must be an array of strings")]
    MalformedInclude,

    /// `limit` was not an integer in [1, 1000].
    #[error("Invalid limit {0}: must be an integer between 1 and {max}", max = super::parser::MAX_LIMIT)]
    InvalidLimit(String),

    /// A top-level filter key was not a known table.
    #[error("Unknown filter table '{0}': must be one of plants, locations, containers")]
    UnknownTable(String),

    /// A table's filter value was not an object of field → condition.
    #[error("Filters for table '{0}' must be an object")]
    MalformedTableFilters(String),

    /// A field name failed to canonicalize.
    #[error("{0}")]
    UnknownField(#[from] UnknownField),

    /// A condition object had multiple keys (other than $regex/$options).
    #[error("Condition for field '{0}' must be a scalar or a single-operator object")]
    MalformedCondition(String),

    /// Operator not in the supported set.
    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    /// Operator given an invalid value (wrong type, empty array, ...).
    #[error("Invalid value for {operator} on field '{field}': {reason}")]
    InvalidOperatorValue {
        operator: String,
        field: String,
        reason: String,
    },

    /// `$regex` pattern failed to compile.
    #[error("Invalid regex pattern for field '{field}': {reason}")]
    InvalidRegex { field: String, reason: String },

    /// `sort` was not an array of {field, direction} objects.
    #[error("sort must be an array of {{field, direction}} objects")]
    MalformedSort,

    /// A sort entry was missing its field name.
    #[error("Sort entry is missing 'field'")]
    MissingSortField,

    /// A sort direction was neither asc nor desc.
    #[error("Invalid sort direction '{0}': must be asc or desc")]
    InvalidSortDirection(String),
}

/// A failure while executing a parsed query plan.
#[derive(Debug, Error)]
pub enum QueryExecutionError {
    /// Snapshot loading failed.
    #[error("Failed to load table data: {0}")]
    Load(#[from] StoreError),

    /// Result serialization failed.
    #[error("Failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Table;

    #[test]
    fn test_parse_error_messages_carry_detail() {
        let err = QueryParseError::UnknownOperator("$bogus".to_string());
        assert!(err.to_string().contains("$bogus"));

        let err = QueryParseError::UnknownField(UnknownField {
            table: Table::Plants,
            field: "NoSuchField".to_string(),
        });
        assert!(err.to_string().contains("NoSuchField"));
        assert!(err.to_string().contains("plants"));
    }

    #[test]
    fn test_limit_error_names_bound() {
        let err = QueryParseError::InvalidLimit("5000".to_string());
        assert!(err.to_string().contains("1000"));
    }
}
