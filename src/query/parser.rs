//! Advanced query parser.
//!
//! Turns a raw JSON request body into a validated [`QueryPlan`]. Every
//! validation failure is a [`QueryParseError`] carrying the offending
//! detail; there are no partial results. Regex patterns are compile-checked
//! here so execution never sees an invalid pattern.

use std::collections::BTreeMap;

use regex::RegexBuilder;
use serde_json::Value;

use crate::registry::{FieldRegistry, Table};

use super::errors::{ParseResult, QueryParseError};
use super::plan::{
    Condition, FilterOperator, IncludeSection, JoinType, QueryPlan, ResponseFormat, SortDirection,
    SortKey,
};

/// Maximum number of joined results a query may request.
pub const MAX_LIMIT: usize = 1000;

/// Limit applied when the request does not name one.
pub const DEFAULT_LIMIT: usize = 50;

/// Parses and validates a raw advanced-query object.
pub fn parse_advanced_query(raw: &Value, registry: &FieldRegistry) -> ParseResult<QueryPlan> {
    let obj = raw.as_object().ok_or(QueryParseError::NotAnObject)?;

    let mut plan = QueryPlan {
        join_type: parse_join(obj.get("join"))?,
        include: parse_include(obj.get("include"))?,
        response_format: parse_response_format(obj.get("response_format"))?,
        limit: parse_limit(obj.get("limit"))?,
        sort: parse_sort(obj.get("sort"))?,
        filters: BTreeMap::new(),
    };

    if let Some(filters) = obj.get("filters") {
        plan.filters = parse_filters(filters, registry)?;
    }

    Ok(plan)
}

/// Parses the join mode. Case-insensitive, defaults to AND.
fn parse_join(value: Option<&Value>) -> ParseResult<JoinType> {
    let Some(value) = value else {
        return Ok(JoinType::And);
    };
    let s = value
        .as_str()
        .ok_or_else(|| QueryParseError::InvalidJoin(value.to_string()))?;
    match s.to_uppercase().as_str() {
        "AND" => Ok(JoinType::And),
        "OR" => Ok(JoinType::Or),
        _ => Err(QueryParseError::InvalidJoin(s.to_string())),
    }
}

/// Parses the response format. Defaults to summary.
fn parse_response_format(value: Option<&Value>) -> ParseResult<ResponseFormat> {
    let Some(value) = value else {
        return Ok(ResponseFormat::Summary);
    };
    let s = value
        .as_str()
        .ok_or_else(|| QueryParseError::InvalidResponseFormat(value.to_string()))?;
    match s {
        "summary" => Ok(ResponseFormat::Summary),
        "detailed" => Ok(ResponseFormat::Detailed),
        "minimal" => Ok(ResponseFormat::Minimal),
        "ids_only" => Ok(ResponseFormat::IdsOnly),
        _ => Err(QueryParseError::InvalidResponseFormat(s.to_string())),
    }
}

/// Parses the include list. Defaults to the three tables (no context).
fn parse_include(value: Option<&Value>) -> ParseResult<Vec<IncludeSection>> {
    let Some(value) = value else {
        return Ok(vec![
            IncludeSection::Plants,
            IncludeSection::Locations,
            IncludeSection::Containers,
        ]);
    };
    let entries = value.as_array().ok_or(QueryParseError::MalformedInclude)?;
    let mut include = Vec::with_capacity(entries.len());
    for entry in entries {
        let s = entry.as_str().ok_or(QueryParseError::MalformedInclude)?;
        let section = IncludeSection::parse(s)
            .ok_or_else(|| QueryParseError::InvalidInclude(s.to_string()))?;
        if !include.contains(&section) {
            include.push(section);
        }
    }
    Ok(include)
}

/// Parses the limit. Must be an integer in [1, MAX_LIMIT].
fn parse_limit(value: Option<&Value>) -> ParseResult<usize> {
    let Some(value) = value else {
        return Ok(DEFAULT_LIMIT);
    };
    let n = value
        .as_i64()
        .ok_or_else(|| QueryParseError::InvalidLimit(value.to_string()))?;
    if n < 1 || n as usize > MAX_LIMIT {
        return Err(QueryParseError::InvalidLimit(n.to_string()));
    }
    Ok(n as usize)
}

/// Parses the sort list. Direction defaults to asc; field validity against
/// a table is deferred (unknown fields sort as equal at execution time).
fn parse_sort(value: Option<&Value>) -> ParseResult<Vec<SortKey>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let entries = value.as_array().ok_or(QueryParseError::MalformedSort)?;
    let mut keys = Vec::with_capacity(entries.len());
    for entry in entries {
        let obj = entry.as_object().ok_or(QueryParseError::MalformedSort)?;
        let field = obj
            .get("field")
            .and_then(Value::as_str)
            .ok_or(QueryParseError::MissingSortField)?;
        let direction = match obj.get("direction") {
            None => SortDirection::Asc,
            Some(d) => {
                let s = d
                    .as_str()
                    .ok_or_else(|| QueryParseError::InvalidSortDirection(d.to_string()))?;
                match s.to_lowercase().as_str() {
                    "asc" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    _ => return Err(QueryParseError::InvalidSortDirection(s.to_string())),
                }
            }
        };
        keys.push(SortKey {
            field: field.to_string(),
            direction,
        });
    }
    Ok(keys)
}

/// Parses the per-table filter maps.
fn parse_filters(
    value: &Value,
    registry: &FieldRegistry,
) -> ParseResult<BTreeMap<Table, Vec<Condition>>> {
    let tables = value
        .as_object()
        .ok_or_else(|| QueryParseError::MalformedTableFilters("filters".to_string()))?;

    let mut filters = BTreeMap::new();
    for (table_name, field_filters) in tables {
        let table = Table::parse(table_name)
            .ok_or_else(|| QueryParseError::UnknownTable(table_name.clone()))?;
        let fields = field_filters
            .as_object()
            .ok_or_else(|| QueryParseError::MalformedTableFilters(table_name.clone()))?;

        let mut conditions = Vec::with_capacity(fields.len());
        for (field_name, condition_value) in fields {
            let canonical = registry.canonicalize(table, field_name)?;
            conditions.push(parse_condition(table, canonical, condition_value)?);
        }
        filters.insert(table, conditions);
    }
    Ok(filters)
}

/// Parses one condition: a bare scalar is an implicit $eq, an object must
/// be single-key {operator: value}. The one exception is {"$regex", "$options"},
/// which is accepted as a combined condition.
fn parse_condition(table: Table, field: String, value: &Value) -> ParseResult<Condition> {
    let Some(obj) = value.as_object() else {
        return Ok(Condition {
            table,
            field,
            operator: FilterOperator::Eq,
            value: value.clone(),
        });
    };

    let (op_name, op_value) = match obj.len() {
        1 => match obj.iter().next() {
            Some((k, v)) => (k.as_str(), v),
            None => return Err(QueryParseError::MalformedCondition(field)),
        },
        2 if obj.contains_key("$regex") && obj.contains_key("$options") => {
            ("$regex", &obj["$regex"])
        }
        _ => return Err(QueryParseError::MalformedCondition(field)),
    };

    let operator = FilterOperator::parse(op_name)
        .ok_or_else(|| QueryParseError::UnknownOperator(op_name.to_string()))?;

    validate_operator_value(operator, &field, op_value)?;

    Ok(Condition {
        table,
        field,
        operator,
        value: op_value.clone(),
    })
}

/// Operator-specific value validation, per the DSL contract.
fn validate_operator_value(
    operator: FilterOperator,
    field: &str,
    value: &Value,
) -> ParseResult<()> {
    let invalid = |reason: &str| QueryParseError::InvalidOperatorValue {
        operator: operator.as_str().to_string(),
        field: field.to_string(),
        reason: reason.to_string(),
    };

    match operator {
        FilterOperator::In | FilterOperator::Nin => match value.as_array() {
            Some(arr) if !arr.is_empty() => Ok(()),
            Some(_) => Err(invalid("array must not be empty")),
            None => Err(invalid("value must be an array")),
        },
        FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte => {
            let numeric = match value {
                Value::Number(_) => true,
                Value::String(s) => s.trim().parse::<f64>().is_ok(),
                _ => false,
            };
            if numeric {
                Ok(())
            } else {
                Err(invalid("value must be numeric"))
            }
        }
        FilterOperator::Regex => {
            let pattern = value.as_str().ok_or_else(|| invalid("pattern must be a string"))?;
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map(|_| ())
                .map_err(|e| QueryParseError::InvalidRegex {
                    field: field.to_string(),
                    reason: e.to_string(),
                })
        }
        FilterOperator::Exists => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err(invalid("value must be a boolean"))
            }
        }
        FilterOperator::Eq
        | FilterOperator::Ne
        | FilterOperator::Contains => Ok(()),
    }
}
