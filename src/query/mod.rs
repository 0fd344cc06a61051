//! Advanced query engine.
//!
//! A MongoDB-style filter DSL over the plants / locations / containers
//! tables: JSON in, validated plan, in-memory filter + join + sort +
//! limit, one of four output shapes out.

pub mod errors;
pub mod executor;
pub mod formatter;
pub mod join;
pub mod operators;
pub mod parser;
pub mod plan;
pub mod sorter;

pub use errors::{ExecResult, ParseResult, QueryExecutionError, QueryParseError};
pub use executor::{execute_advanced_query, QueryExecutor};
pub use join::JoinedResult;
pub use parser::{parse_advanced_query, DEFAULT_LIMIT, MAX_LIMIT};
pub use plan::{
    Condition, FilterOperator, IncludeSection, JoinType, QueryPlan, ResponseFormat,
    SortDirection, SortKey,
};
