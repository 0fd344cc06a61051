//! Parser Validation Tests
//!
//! The parser must reject any structurally or semantically invalid request
//! with a QueryParseError carrying the offending detail, and never return
//! partial results:
//! - Unknown operators, fields, and tables
//! - Out-of-range limits
//! - Unknown response formats and include sections
//! - Regex patterns that do not compile
//! - Wrong value types for operators

use floradb::query::{parse_advanced_query, QueryParseError, QueryPlan};
use floradb::registry::FieldRegistry;
use serde_json::{json, Value};

fn parse(raw: Value) -> Result<QueryPlan, QueryParseError> {
    let registry = FieldRegistry::with_default_aliases();
    parse_advanced_query(&raw, &registry)
}

// =============================================================================
// Rejection Cases
// =============================================================================

#[test]
fn test_bogus_operator_rejected() {
    let result = parse(json!({"filters": {"plants": {"Plant Name": {"$bogus": "x"}}}}));
    assert!(matches!(result, Err(QueryParseError::UnknownOperator(op)) if op == "$bogus"));
}

#[test]
fn test_unknown_field_rejected() {
    let result = parse(json!({"filters": {"plants": {"NoSuchField": {"$eq": "x"}}}}));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("NoSuchField"));
}

#[test]
fn test_limit_out_of_range_rejected() {
    assert!(matches!(
        parse(json!({"limit": 5000})),
        Err(QueryParseError::InvalidLimit(_))
    ));
    assert!(matches!(
        parse(json!({"limit": 0})),
        Err(QueryParseError::InvalidLimit(_))
    ));
    assert!(matches!(
        parse(json!({"limit": -3})),
        Err(QueryParseError::InvalidLimit(_))
    ));
}

#[test]
fn test_non_integer_limit_rejected() {
    assert!(matches!(
        parse(json!({"limit": 2.5})),
        Err(QueryParseError::InvalidLimit(_))
    ));
    assert!(matches!(
        parse(json!({"limit": "50"})),
        Err(QueryParseError::InvalidLimit(_))
    ));
}

#[test]
fn test_unknown_response_format_rejected() {
    let result = parse(json!({"response_format": "xml"}));
    assert!(matches!(
        result,
        Err(QueryParseError::InvalidResponseFormat(f)) if f == "xml"
    ));
}

#[test]
fn test_unterminated_regex_rejected() {
    let result = parse(json!({
        "filters": {"plants": {"Plant Name": {"$regex": "[unterminated"}}}
    }));
    assert!(matches!(result, Err(QueryParseError::InvalidRegex { .. })));
}

#[test]
fn test_unknown_table_rejected() {
    let result = parse(json!({"filters": {"weather": {"rainfall": 3}}}));
    assert!(matches!(result, Err(QueryParseError::UnknownTable(t)) if t == "weather"));
}

#[test]
fn test_unknown_include_section_rejected() {
    let result = parse(json!({"include": ["plants", "secrets"]}));
    assert!(matches!(result, Err(QueryParseError::InvalidInclude(s)) if s == "secrets"));
}

#[test]
fn test_invalid_join_rejected() {
    let result = parse(json!({"join": "MAYBE"}));
    assert!(matches!(result, Err(QueryParseError::InvalidJoin(_))));
}

#[test]
fn test_wrong_operator_value_types_rejected() {
    // $in wants a non-empty array
    assert!(parse(json!({"filters": {"plants": {"name": {"$in": []}}}})).is_err());
    // ordered comparisons want numerics
    assert!(parse(json!({"filters": {"plants": {"name": {"$gt": true}}}})).is_err());
    // $exists wants a boolean
    assert!(parse(json!({"filters": {"plants": {"name": {"$exists": 1}}}})).is_err());
}

#[test]
fn test_multi_key_condition_rejected_except_regex_options() {
    assert!(parse(json!({
        "filters": {"plants": {"name": {"$eq": "a", "$contains": "b"}}}
    }))
    .is_err());

    // The one sanctioned two-key shape.
    assert!(parse(json!({
        "filters": {"plants": {"name": {"$regex": "vinca", "$options": "i"}}}
    }))
    .is_ok());
}

// =============================================================================
// Accepted Shapes
// =============================================================================

#[test]
fn test_full_query_parses() {
    let plan = parse(json!({
        "filters": {
            "plants": {"light": {"$in": ["Full Sun", "Partial Shade"]}},
            "locations": {"total_sun_hours": {"$gte": 4}},
            "containers": {"container_size": "small"}
        },
        "join": "AND",
        "include": ["plants", "locations", "containers", "context"],
        "response_format": "detailed",
        "limit": 25,
        "sort": [{"field": "Plant Name", "direction": "desc"}]
    }))
    .unwrap();

    assert_eq!(plan.limit, 25);
    assert_eq!(plan.filters.len(), 3);
    assert_eq!(plan.sort.len(), 1);
}

#[test]
fn test_aliases_normalize_to_canonical_fields() {
    let plan = parse(json!({"filters": {"plants": {"light": "Full Sun"}}})).unwrap();
    let conds = plan.filters.values().next().unwrap();
    assert_eq!(conds[0].field, "Light Requirements");
}
