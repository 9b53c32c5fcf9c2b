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

//! Query planner
//!
//! Checks a [`WindowQuery`] against the input [`Schema`] and resolves every
//! name to a column position. Planning either fails with the first problem
//! found or returns a [`QueryPlan`] that evaluation can run without further
//! checks, so no row is touched by a query that would later be rejected.
//!
//! Rows are evaluated in a "wide" layout: every input column, then one
//! column per window call, then the derived columns. Filters and the outer
//! ordering are bound against the wide layout; the projection picks the
//! output columns from it.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::core::{DataType, Error, Result, Schema, SchemaColumn};
use crate::functions::{create_window_function, WindowFunction};
use crate::plan::{
    BoundExpr, BoundPredicate, FrameBound, FrameOffset, FrameUnit, SortKey, WindowCall,
    WindowFrame, WindowFunctionKind, WindowQuery,
};

use super::partition::OrderColumn;

/// A window call ready for evaluation
pub struct PlannedCall {
    /// Position of the call's output among the window outputs
    pub slot: usize,
    pub alias: String,
    /// Input column the function reads
    pub argument: Option<usize>,
    /// Frame in effect, defaults applied
    pub frame: WindowFrame,
    pub uses_frame: bool,
    pub function: Box<dyn WindowFunction>,
}

impl PlannedCall {
    /// True when frame resolution needs the ordering key values
    pub fn needs_range_axis(&self) -> bool {
        self.uses_frame && self.frame.unit == FrameUnit::Range && self.frame.has_offsets()
    }
}

impl fmt::Debug for PlannedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannedCall")
            .field("slot", &self.slot)
            .field("alias", &self.alias)
            .field("function", &self.function.name())
            .field("argument", &self.argument)
            .field("frame", &self.frame)
            .finish()
    }
}

/// Calls sharing one partitioning and ordering
#[derive(Debug)]
pub struct WindowGroup {
    pub partition_cols: Vec<usize>,
    pub order: Vec<OrderColumn>,
    pub calls: Vec<PlannedCall>,
}

/// A validated, fully resolved query
#[derive(Debug)]
pub struct QueryPlan {
    /// Input columns, window outputs and derived columns
    pub wide_schema: Schema,
    pub input_width: usize,
    pub window_count: usize,
    pub groups: Vec<WindowGroup>,
    /// Bound in order; each sees the columns before it
    pub derived: Vec<BoundExpr>,
    pub filter: Option<BoundPredicate>,
    pub order: Vec<OrderColumn>,
    /// Wide positions of the output columns
    pub projection: Vec<usize>,
    pub output_schema: Schema,
}

/// Validate a query and resolve it against the input schema
pub fn plan_query(schema: &Schema, query: &WindowQuery) -> Result<QueryPlan> {
    if let Some(name) = schema.first_duplicate() {
        return Err(Error::DuplicateColumn(name.to_string()));
    }
    check_output_names(schema, query)?;

    let input_width = schema.column_count();
    let mut wide_columns = schema.columns.clone();
    let mut groups: Vec<(usize, WindowGroup)> = Vec::new();

    for (slot, call) in query.windows.iter().enumerate() {
        let planned = plan_call(schema, call, slot)?;
        let output_type = call
            .kind
            .result_type(planned.argument.map(|idx| schema.columns[idx].data_type));
        wide_columns.push(SchemaColumn::nullable(call.alias.clone(), output_type));

        // Calls that only differ by frame share one partitioning pass
        match groups
            .iter_mut()
            .find(|(first, _)| query.windows[*first].spec.same_partitioning(&call.spec))
        {
            Some((_, group)) => group.calls.push(planned),
            None => {
                let (partition_cols, order) = resolve_partitioning(schema, call)?;
                groups.push((
                    slot,
                    WindowGroup {
                        partition_cols,
                        order,
                        calls: vec![planned],
                    },
                ));
            }
        }
    }

    let mut derived = Vec::with_capacity(query.derived.len());
    for column in &query.derived {
        let visible = Schema::new(wide_columns.clone());
        let bound = column.expr.bind(&visible)?;
        wide_columns.push(SchemaColumn::nullable(column.name.clone(), bound.data_type()));
        derived.push(bound);
    }

    let wide_schema = Schema::new(wide_columns);
    let filter = query
        .filter
        .as_ref()
        .map(|predicate| predicate.bind(&wide_schema))
        .transpose()?;
    let order = resolve_order(&wide_schema, &query.order_by)?;

    let mut projection: Vec<usize> = match &query.select {
        Some(columns) => columns
            .iter()
            .map(|name| schema.resolve(name).map(|(idx, _)| idx))
            .collect::<Result<_>>()?,
        None => (0..input_width).collect(),
    };
    projection.extend(input_width..wide_schema.column_count());

    let output_schema = Schema::new(
        projection
            .iter()
            .map(|&idx| wide_schema.columns[idx].clone())
            .collect(),
    );

    tracing::debug!(
        windows = query.windows.len(),
        groups = groups.len(),
        derived = derived.len(),
        filtered = filter.is_some(),
        output_columns = output_schema.column_count(),
        "window query planned"
    );

    Ok(QueryPlan {
        wide_schema,
        input_width,
        window_count: query.windows.len(),
        groups: groups.into_iter().map(|(_, group)| group).collect(),
        derived,
        filter,
        order,
        projection,
        output_schema,
    })
}

/// Every name in the wide layout and in the projection must be unique
fn check_output_names(schema: &Schema, query: &WindowQuery) -> Result<()> {
    let mut seen: FxHashSet<String> = schema
        .columns
        .iter()
        .map(|col| col.name.to_lowercase())
        .collect();
    let added = query
        .windows
        .iter()
        .map(|call| call.alias.as_str())
        .chain(query.derived.iter().map(|column| column.name.as_str()));
    for name in added {
        if !seen.insert(name.to_lowercase()) {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
    }

    if let Some(columns) = &query.select {
        let mut selected = FxHashSet::default();
        for name in columns {
            if !selected.insert(name.to_lowercase()) {
                return Err(Error::DuplicateColumn(name.clone()));
            }
        }
    }
    Ok(())
}

fn resolve_partitioning(
    schema: &Schema,
    call: &WindowCall,
) -> Result<(Vec<usize>, Vec<OrderColumn>)> {
    let partition_cols = call
        .spec
        .partition_by
        .iter()
        .map(|name| schema.resolve(name).map(|(idx, _)| idx))
        .collect::<Result<Vec<_>>>()?;
    let order = resolve_order(schema, &call.spec.order_by)?;
    Ok((partition_cols, order))
}

fn resolve_order(schema: &Schema, keys: &[SortKey]) -> Result<Vec<OrderColumn>> {
    keys.iter()
        .map(|key| {
            let (index, col) = schema.resolve(&key.column)?;
            if !col.data_type.is_orderable() {
                return Err(Error::NonOrderableColumn {
                    column: col.name.clone(),
                    data_type: col.data_type.to_string(),
                });
            }
            Ok(OrderColumn {
                index,
                ascending: key.is_ascending(),
                nulls_first: key.nulls_come_first(),
            })
        })
        .collect()
}

fn plan_call(schema: &Schema, call: &WindowCall, slot: usize) -> Result<PlannedCall> {
    // Partition and ordering columns are checked here too, so the first
    // error reported follows the call order
    resolve_partitioning(schema, call)?;

    let argument = match call.kind.argument() {
        Some(name) => Some(schema.resolve(name)?),
        None => None,
    };
    check_function_arguments(&call.kind, argument.map(|(_, col)| col))?;

    let frame = call.spec.effective_frame();
    if call.kind.uses_frame() {
        check_frame(schema, call, &frame)?;
    }

    Ok(PlannedCall {
        slot,
        alias: call.alias.clone(),
        argument: argument.map(|(idx, _)| idx),
        frame,
        uses_frame: call.kind.uses_frame(),
        function: create_window_function(&call.kind),
    })
}

fn check_function_arguments(kind: &WindowFunctionKind, column: Option<&SchemaColumn>) -> Result<()> {
    match (kind, column) {
        (WindowFunctionKind::Ntile(buckets), _) if *buckets <= 0 => Err(Error::invalid_argument(
            format!("NTILE bucket count must be positive, got {}", buckets),
        )),
        (WindowFunctionKind::NthValue(_, n), _) if *n <= 0 => Err(Error::invalid_argument(
            format!("NTH_VALUE position must be positive, got {}", n),
        )),
        (
            WindowFunctionKind::Lag { offset, default, .. }
            | WindowFunctionKind::Lead { offset, default, .. },
            Some(col),
        ) => {
            if *offset < 0 {
                return Err(Error::negative_offset(format!("{} offset", kind.name()), offset));
            }
            if !col.data_type.accepts(default.data_type()) {
                return Err(Error::invalid_argument(format!(
                    "{} default {} does not match column '{}' of type {}",
                    kind.name(),
                    default,
                    col.name,
                    col.data_type
                )));
            }
            Ok(())
        }
        (WindowFunctionKind::Sum(_) | WindowFunctionKind::Avg(_), Some(col))
            if !col.data_type.is_numeric() =>
        {
            Err(Error::non_numeric_argument(kind.name(), &col.name, col.data_type))
        }
        (WindowFunctionKind::Min(_) | WindowFunctionKind::Max(_), Some(col))
            if !col.data_type.is_orderable() =>
        {
            Err(Error::NonOrderableColumn {
                column: col.name.clone(),
                data_type: col.data_type.to_string(),
            })
        }
        _ => Ok(()),
    }
}

fn check_frame(schema: &Schema, call: &WindowCall, frame: &WindowFrame) -> Result<()> {
    if frame.start == FrameBound::UnboundedFollowing {
        return Err(Error::invalid_frame(
            "frame start cannot be UNBOUNDED FOLLOWING",
        ));
    }
    if frame.end == FrameBound::UnboundedPreceding {
        return Err(Error::invalid_frame("frame end cannot be UNBOUNDED PRECEDING"));
    }

    let unit = match frame.unit {
        FrameUnit::Rows => "ROWS",
        FrameUnit::Range => "RANGE",
    };
    let bounds = [("start", &frame.start), ("end", &frame.end)];
    for (which, bound) in bounds {
        if let Some(offset) = bound.offset() {
            if !offset.is_finite() {
                return Err(Error::invalid_frame(format!(
                    "{} frame {} offset must be finite, got {}",
                    unit, which, offset
                )));
            }
            if offset.is_negative() {
                return Err(Error::negative_offset(
                    format!("{} frame {}", unit, which),
                    offset,
                ));
            }
        }
    }

    match frame.unit {
        FrameUnit::Rows => {
            for (which, bound) in bounds {
                if let Some(offset) = bound.offset() {
                    if !matches!(offset, FrameOffset::Integer(_)) {
                        return Err(Error::invalid_frame(format!(
                            "ROWS frame {} offset must be an integer row count, got {}",
                            which, offset
                        )));
                    }
                }
            }
            Ok(())
        }
        FrameUnit::Range if frame.has_offsets() => check_range_offsets(schema, call, &bounds),
        FrameUnit::Range => Ok(()),
    }
}

fn check_range_offsets(
    schema: &Schema,
    call: &WindowCall,
    bounds: &[(&str, &FrameBound)],
) -> Result<()> {
    let [key] = call.spec.order_by.as_slice() else {
        return Err(Error::RangeOrderByCount {
            count: call.spec.order_by.len(),
        });
    };
    let (_, col) = schema.resolve(&key.column)?;
    if !col.data_type.supports_range_offset() {
        return Err(Error::NonOrderableRangeKey {
            column: col.name.clone(),
            data_type: col.data_type.to_string(),
        });
    }

    for (_, bound) in bounds {
        let Some(offset) = bound.offset() else {
            continue;
        };
        let compatible = match offset {
            FrameOffset::Integer(_) | FrameOffset::Float(_) => col.data_type.is_numeric(),
            FrameOffset::Interval(_) => col.data_type == DataType::Timestamp,
        };
        if !compatible {
            return Err(Error::RangeOffsetMismatch {
                column: col.name.clone(),
                data_type: col.data_type.to_string(),
                offset: offset.to_string(),
            });
        }
    }
    Ok(())
}
