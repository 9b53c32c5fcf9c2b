// Copyright 2025 Winframe Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Window query executor
//!
//! # Architecture
//!
//! ```text
//! rows + WindowQuery
//!   ↓
//! plan_query (validation, name resolution)
//!   ↓
//! validate rows against the schema
//!   ↓
//! per window group: partition_rows
//!   ↓
//! per partition (rayon when large enough):
//!   sort_partition → peer_groups → resolve_frames → WindowFunction::evaluate
//!   ↓
//! scatter outputs back to input positions
//!   ↓
//! derived columns → post-filter → outer ordering → projection
//!   ↓
//! WindowResult
//! ```
//!
//! # Components
//!
//! - [`Executor`] - entry point, owns the [`EngineConfig`]
//! - [`planner`] - validates a query and resolves names
//! - [`partition`] - partitioning, sorting and peer groups
//! - [`frame`] - ROWS/RANGE frame resolution
//! - [`WindowResult`] - materialized output

pub mod config;
pub mod frame;
pub mod parallel;
pub mod partition;
pub mod planner;
pub mod result;

use std::sync::Arc;

use crate::core::{Error, Result, Row, Schema, Value};
use crate::functions::{PartitionView, RowSpan};
use crate::plan::{WindowFrame, WindowQuery};

pub use config::EngineConfig;
pub use frame::{resolve_frames, RangeAxis};
pub use parallel::{map_partitions, ParallelConfig};
pub use partition::{partition_rows, peer_groups, sort_partition, OrderColumn, PartitionKey};
pub use planner::{plan_query, PlannedCall, QueryPlan, WindowGroup};
pub use result::WindowResult;

/// Window function executor
///
/// An executor holds only configuration; every call to
/// [`Executor::execute`] is independent, and the same query over the same
/// rows always yields the same result.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: EngineConfig,
}

/// Outputs of one partition, in sorted order
struct PartitionOutput {
    /// Input positions of the partition's rows, sorted
    sorted: Vec<usize>,
    /// One column per call of the group
    values: Vec<Vec<Value>>,
}

impl Executor {
    /// Create an executor with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a window query over a tuple stream
    ///
    /// The query and then every row are validated before anything is
    /// evaluated; the first problem found is returned as the error.
    pub fn execute<I>(&self, schema: &Schema, rows: I, query: &WindowQuery) -> Result<WindowResult>
    where
        I: IntoIterator<Item = Row>,
    {
        let plan = plan_query(schema, query)?;

        let rows: Vec<Row> = rows.into_iter().collect();
        for (i, row) in rows.iter().enumerate() {
            row.validate(schema, i)?;
        }

        tracing::debug!(
            rows = rows.len(),
            windows = plan.window_count,
            "evaluating window query"
        );

        let mut window_values: Vec<Vec<Value>> = vec![Vec::new(); plan.window_count];
        for group in &plan.groups {
            for (slot, values) in self.evaluate_group(group, &rows)? {
                window_values[slot] = values;
            }
        }

        let output = assemble(&plan, &rows, window_values)?;
        tracing::debug!(rows = output.row_count(), "window query complete");
        Ok(output)
    }

    /// Evaluate every call of one group; returns `(slot, values by input position)`
    fn evaluate_group(&self, group: &WindowGroup, rows: &[Row]) -> Result<Vec<(usize, Vec<Value>)>> {
        let partitions = partition_rows(rows, &group.partition_cols);
        let parallel = self
            .config
            .parallel
            .should_parallelize(partitions.len(), rows.len());

        tracing::debug!(
            partitions = partitions.len(),
            calls = group.calls.len(),
            parallel,
            "evaluating window group"
        );

        let outputs = map_partitions(&partitions, parallel, |indices| {
            evaluate_partition(group, rows, indices)
        })?;

        let mut columns: Vec<Vec<Value>> = group
            .calls
            .iter()
            .map(|_| vec![Value::null_unknown(); rows.len()])
            .collect();
        for output in outputs {
            for (column, values) in columns.iter_mut().zip(output.values) {
                for (&row, value) in output.sorted.iter().zip(values) {
                    column[row] = value;
                }
            }
        }

        Ok(group
            .calls
            .iter()
            .map(|call| call.slot)
            .zip(columns)
            .collect())
    }
}

fn evaluate_partition(group: &WindowGroup, rows: &[Row], indices: &[usize]) -> Result<PartitionOutput> {
    let mut sorted = indices.to_vec();
    sort_partition(rows, &mut sorted, &group.order);
    let peers = peer_groups(rows, &sorted, &group.order);

    // Calls that differ only by function share their frames
    let mut frames: Vec<(WindowFrame, Vec<RowSpan>)> = Vec::new();
    let mut axis: Option<RangeAxis> = None;
    let mut values = Vec::with_capacity(group.calls.len());

    for call in &group.calls {
        let arguments: Vec<Value> = match call.argument {
            Some(col) => sorted.iter().map(|&r| rows[r][col].clone()).collect(),
            None => Vec::new(),
        };

        let frame_idx = if call.uses_frame {
            match frames.iter().position(|(frame, _)| *frame == call.frame) {
                Some(idx) => Some(idx),
                None => {
                    if call.needs_range_axis() && axis.is_none() {
                        let key = group.order.first().ok_or_else(|| {
                            Error::internal("RANGE offsets planned without an ordering key")
                        })?;
                        axis = Some(RangeAxis::new(
                            sorted.iter().map(|&r| &rows[r][key.index]),
                            key.ascending,
                        ));
                    }
                    let spans = resolve_frames(&call.frame, &peers, axis.as_ref())?;
                    frames.push((call.frame, spans));
                    Some(frames.len() - 1)
                }
            }
        } else {
            None
        };

        let view = PartitionView {
            values: &arguments,
            peers: &peers,
            frames: frame_idx.map_or(&[][..], |idx| frames[idx].1.as_slice()),
        };
        let output = call.function.evaluate(&view)?;
        if output.len() != sorted.len() {
            return Err(Error::internal(format!(
                "{} produced {} values for a partition of {} rows",
                call.function.name(),
                output.len(),
                sorted.len()
            )));
        }
        values.push(output);
    }

    tracing::trace!(rows = sorted.len(), "partition evaluated");
    Ok(PartitionOutput { sorted, values })
}

/// Build output rows: wide rows, derived columns, filter, ordering, projection
fn assemble(plan: &QueryPlan, rows: &[Row], window_values: Vec<Vec<Value>>) -> Result<WindowResult> {
    let mut window_columns: Vec<std::vec::IntoIter<Value>> =
        window_values.into_iter().map(Vec::into_iter).collect();
    let width = plan.wide_schema.column_count();

    let mut wide_rows: Vec<Vec<Value>> = Vec::with_capacity(rows.len());
    for row in rows {
        let mut wide = Vec::with_capacity(width);
        wide.extend(row.iter().cloned());
        for column in window_columns.iter_mut() {
            wide.push(column.next().unwrap_or_else(Value::null_unknown));
        }
        for expr in &plan.derived {
            let value = expr.eval(&wide)?;
            wide.push(value);
        }

        if let Some(filter) = &plan.filter {
            if !filter.matches(&wide) {
                continue;
            }
        }
        wide_rows.push(wide);
    }

    if !plan.order.is_empty() {
        wide_rows.sort_by(|a, b| partition::compare_rows(a, b, &plan.order));
    }

    let output: Vec<Row> = wide_rows
        .into_iter()
        .map(|wide| {
            let values: Arc<[Value]> = plan.projection.iter().map(|&idx| wide[idx].clone()).collect();
            Row::from_arc(values)
        })
        .collect();

    Ok(WindowResult::new(plan.output_schema.clone(), output))
}
