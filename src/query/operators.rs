//! Condition evaluation against loaded records.
//!
//! All string comparisons are case-insensitive. Live cell values may not
//! match the type the operator wants (the sheet is schemaless), so type
//! mismatches degrade to a non-match rather than an error: the parser
//! validated the query literal, but nothing validated the data.
//!
//! `$regex` is always a case-insensitive substring search. The parser
//! accepts an `$options` key alongside `$regex` for wire compatibility,
//! but its content does not change matching behavior.

use regex::RegexBuilder;
use serde_json::Value;

use crate::records::{value_to_string, FieldAccess};

use super::plan::{Condition, FilterOperator, JoinType};

/// Whether a looked-up value counts as present for filtering purposes.
/// Null, absent, and blank strings are all "empty".
fn is_empty_value(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(_) => false,
    }
}

/// Coerces a JSON value to f64 for ordered comparisons.
fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Lowercased string form of a value, for case-insensitive comparison.
fn lower(value: &Value) -> String {
    value_to_string(value).to_lowercase()
}

/// Evaluates one condition against one record.
pub fn evaluate_condition(record: &impl FieldAccess, condition: &Condition) -> bool {
    let actual = record.get_field(&condition.field);

    // An empty cell can only satisfy $exists: false.
    if is_empty_value(&actual) {
        return condition.operator == FilterOperator::Exists
            && condition.value == Value::Bool(false);
    }
    let Some(actual) = actual else {
        return false;
    };

    match condition.operator {
        FilterOperator::Eq => lower(&actual) == lower(&condition.value),
        FilterOperator::Ne => lower(&actual) != lower(&condition.value),
        FilterOperator::In => membership(&actual, &condition.value),
        FilterOperator::Nin => !membership(&actual, &condition.value),
        FilterOperator::Gt => ordered(&actual, &condition.value, |a, b| a > b),
        FilterOperator::Gte => ordered(&actual, &condition.value, |a, b| a >= b),
        FilterOperator::Lt => ordered(&actual, &condition.value, |a, b| a < b),
        FilterOperator::Lte => ordered(&actual, &condition.value, |a, b| a <= b),
        FilterOperator::Regex => regex_search(&actual, &condition.value),
        FilterOperator::Exists => condition.value == Value::Bool(true),
        FilterOperator::Contains => {
            lower(&actual).contains(&lower(&condition.value))
        }
    }
}

/// Case-insensitive membership test against an array literal.
fn membership(actual: &Value, expected: &Value) -> bool {
    let actual = lower(actual);
    expected
        .as_array()
        .map(|arr| arr.iter().any(|v| lower(v) == actual))
        .unwrap_or(false)
}

/// Ordered comparison with both sides coerced to f64. A live value that
/// does not parse as a number fails the condition, it does not error.
fn ordered(actual: &Value, expected: &Value, cmp: fn(f64, f64) -> bool) -> bool {
    match (to_f64(actual), to_f64(expected)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// Case-insensitive regex search anywhere in the string form of the value.
/// Patterns were compile-checked at parse time; a failure here means the
/// condition simply does not match.
fn regex_search(actual: &Value, pattern: &Value) -> bool {
    let Some(pattern) = pattern.as_str() else {
        return false;
    };
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => re.is_match(&value_to_string(actual)),
        Err(_) => false,
    }
}

/// Filters a table's records. AND requires every condition, OR at least
/// one. An empty condition list leaves the table unrestricted.
pub fn filter_records<R: FieldAccess + Clone>(
    records: &[R],
    conditions: &[Condition],
    join_type: JoinType,
) -> Vec<R> {
    if conditions.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| match join_type {
            JoinType::And => conditions.iter().all(|c| evaluate_condition(*record, c)),
            JoinType::Or => conditions.iter().any(|c| evaluate_condition(*record, c)),
        })
        .cloned()
        .collect()
}
