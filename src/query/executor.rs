//! Query executor: orchestrates the load → filter → join → sort → limit →
//! format pipeline and attaches execution metadata.
//!
//! The executor is stateless per call. Every execution loads a fresh
//! snapshot of all three tables; if the backing store changes between the
//! three load calls the result may reflect a slightly inconsistent
//! snapshot; there is no transactional read guarantee at this layer.
//! Errors propagate as [`QueryExecutionError`]; nothing is swallowed here.

use serde_json::{json, Value};

use crate::registry::Table;
use crate::store::SnapshotStore;

use super::errors::ExecResult;
use super::formatter::format_results;
use super::join::join_tables;
use super::operators::filter_records;
use super::plan::{Condition, QueryPlan};
use super::sorter::{apply_limit, sort_results};

/// Executes query plans against a snapshot store.
pub struct QueryExecutor<'a, S: SnapshotStore> {
    store: &'a S,
}

impl<'a, S: SnapshotStore> QueryExecutor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Runs the full pipeline for one plan.
    pub fn execute(&self, plan: &QueryPlan) -> ExecResult<Value> {
        let plants = self.store.load_plants()?;
        let locations = self.store.load_locations()?;
        let containers = self.store.load_containers()?;

        // Tables without declared filters pass through unfiltered; they
        // still participate in correlation and inclusion checks.
        let plants = filter_records(&plants, conditions(plan, Table::Plants), plan.join_type);
        let locations =
            filter_records(&locations, conditions(plan, Table::Locations), plan.join_type);
        let containers = filter_records(
            &containers,
            conditions(plan, Table::Containers),
            plan.join_type,
        );

        let mut results = join_tables(
            plants,
            &locations,
            &containers,
            plan.has_filters_for(Table::Containers),
            plan.has_filters_for(Table::Locations),
        );

        if !plan.sort.is_empty() {
            sort_results(&mut results, &plan.sort);
        }
        apply_limit(&mut results, plan.limit);

        let mut response = format_results(&results, plan, self.store);
        if let Some(obj) = response.as_object_mut() {
            obj.insert(
                "query_metadata".to_string(),
                json!({
                    "total_matches": results.len(),
                    "applied_limit": plan.limit,
                    "response_format": plan.response_format.as_str(),
                    "tables_queried": plan.tables_queried(),
                    "execution_success": true,
                }),
            );
        }
        Ok(response)
    }
}

/// Convenience entry point mirroring `parse_advanced_query`.
pub fn execute_advanced_query(
    plan: &QueryPlan,
    store: &impl SnapshotStore,
) -> ExecResult<Value> {
    QueryExecutor::new(store).execute(plan)
}

fn conditions(plan: &QueryPlan, table: Table) -> &[Condition] {
    plan.filters.get(&table).map(Vec::as_slice).unwrap_or(&[])
}
