//! Query Planner/Executor — evaluates a condition sequence into rows.
//!
//! A state machine over the parsed WHERE steps, carrying a working row-id
//! set:
//!
//! - indexed equality seeds (first step) or unions (after OR) via the
//!   Index Manager, O(1) in table size;
//! - indexed equality after AND degrades to a linear pass over the current
//!   working set — deliberately one seed per query, not an intersection of
//!   seeds;
//! - equality on a non-indexed column is rejected outright with
//!   `NonIndexedEquality` in any position: never silently slow;
//! - comparison operators always scan-filter the current working set,
//!   seeding the full row-id set first if nothing is seeded yet;
//! - every scan-filter pass is bounded by the configured scan ceiling and
//!   aborts the whole query with `ScanLimitExceeded` on overflow.
//!
//! Results come back in ascending row-id order: the order is unspecified
//! to callers but deterministic across repeated calls on identical state.

use crate::engine::TableEngine;
use crate::engine::condition::parse_steps;
use crate::engine::types::{
    ColumnType, Combinator, CompareOp, Condition, ConditionStep, Row, SchemaMetadata,
};
use crate::engine::validate;
use crate::error::{TableError, TableResult};
use crate::storage::{KvStore, keys};
use std::collections::BTreeSet;

impl<S: KvStore> TableEngine<S> {
    /// Evaluate a SELECT: condition tokens (empty for no WHERE clause) to
    /// fully materialized rows.
    pub fn select(&self, full: &str, conditions: &[String]) -> TableResult<Vec<Row>> {
        let schema = self.load_schema(full)?;
        let steps = parse_steps(conditions)?;
        let ids = self.evaluate_conditions(full, &schema, &steps)?;
        ids.into_iter().map(|id| self.fetch_row(full, id)).collect()
    }

    /// Run the planner state machine, returning the final row-id set.
    pub(crate) fn evaluate_conditions(
        &self,
        full: &str,
        schema: &SchemaMetadata,
        steps: &[ConditionStep],
    ) -> TableResult<BTreeSet<u64>> {
        if steps.is_empty() {
            return self.all_row_ids(full);
        }

        let mut working = BTreeSet::new();
        let mut seeded = false;

        for step in steps {
            let cond = &step.condition;
            let indexed = schema
                .column(&cond.column)
                .map(|c| c.indexed)
                .unwrap_or(false);

            if cond.op == CompareOp::Eq {
                if !indexed {
                    return Err(TableError::NonIndexedEquality(cond.column.clone()));
                }
                match step.combinator {
                    None => {
                        tracing::debug!(column = %cond.column, "seeding from index");
                        working = self.index_seed(full, &cond.column, &cond.value)?;
                        seeded = true;
                    }
                    Some(Combinator::And) => {
                        // Degrades to a bounded linear pass over the
                        // current working set.
                        self.scan_filter(full, schema, &mut working, cond)?;
                    }
                    Some(Combinator::Or) => {
                        working.extend(self.index_seed(full, &cond.column, &cond.value)?);
                    }
                }
            } else {
                // Comparison operators filter whatever is seeded so far,
                // regardless of the preceding combinator.
                if !seeded {
                    working = self.all_row_ids(full)?;
                    seeded = true;
                }
                self.scan_filter(full, schema, &mut working, cond)?;
            }
        }

        Ok(working)
    }

    /// Linear filter of the working set by one condition, bounded by the
    /// scan governor. Rows missing the condition's column are dropped.
    fn scan_filter(
        &self,
        full: &str,
        schema: &SchemaMetadata,
        working: &mut BTreeSet<u64>,
        cond: &Condition,
    ) -> TableResult<()> {
        let column_type = schema
            .column(&cond.column)
            .map(|c| c.column_type)
            .unwrap_or(ColumnType::String);
        let limit = self.config.max_scan_rows;

        let mut inspected = 0u64;
        let mut drop_ids = Vec::new();
        for &id in working.iter() {
            inspected += 1;
            if inspected > limit {
                tracing::warn!(
                    table = full,
                    column = %cond.column,
                    limit,
                    "scan limit exceeded during filter pass"
                );
                return Err(TableError::ScanLimitExceeded { limit });
            }
            let keep = match self.store.hash_get(&keys::row_key(full, id), &cond.column)? {
                Some(stored) => validate::compare(column_type, &stored, &cond.value, cond.op),
                None => false,
            };
            if !keep {
                drop_ids.push(id);
            }
        }
        for id in drop_ids {
            working.remove(&id);
        }
        Ok(())
    }

    /// Materialize one row from the row store.
    pub(crate) fn fetch_row(&self, full: &str, id: u64) -> TableResult<Row> {
        let fields = self
            .store
            .hash_get_all(&keys::row_key(full, id))?
            .into_iter()
            .collect();
        Ok(Row { id, fields })
    }
}
