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

//! # Winframe - embeddable window-function evaluation engine
//!
//! Winframe evaluates SQL-style window functions over an in-memory tuple
//! stream. Rows arrive already joined and grouped; the engine partitions,
//! sorts and frames them, then evaluates each requested function.
//!
//! ## Key Features
//!
//! - **Ranking** - ROW_NUMBER, RANK, DENSE_RANK
//! - **Distribution** - NTILE, PERCENT_RANK, CUME_DIST
//! - **Navigation** - LAG, LEAD, FIRST_VALUE, LAST_VALUE, NTH_VALUE
//! - **Framed aggregates** - SUM, AVG, MIN, MAX, COUNT over ROWS and RANGE frames
//! - **Derived columns and post-filters** - growth percentages, top-N per partition
//! - **Parallel partitions** - large inputs are evaluated with Rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use winframe::{
//!     row, DataType, Executor, SchemaBuilder, SortKey, Value, WindowFrame, WindowFunctionKind,
//!     WindowQuery, WindowSpec,
//! };
//!
//! let schema = SchemaBuilder::new()
//!     .add("month", DataType::Integer)
//!     .add("sales", DataType::Integer)
//!     .build();
//! let rows = vec![row![1i64, 70000i64], row![2i64, 37000i64], row![3i64, 18000i64]];
//!
//! let by_month = WindowSpec::new().order_by(SortKey::asc("month"));
//! let query = WindowQuery::new()
//!     .call(
//!         WindowFunctionKind::Sum("sales".into()),
//!         by_month.clone().frame(WindowFrame::running_rows()),
//!         "running_total",
//!     )
//!     .call(WindowFunctionKind::Rank, by_month, "month_rank");
//!
//! let result = Executor::default().execute(&schema, rows, &query).unwrap();
//! assert_eq!(result.value(2, "running_total"), Some(&Value::integer(125000)));
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Core types ([`DataType`], [`Value`], [`Row`], [`Schema`], [`Error`])
//! - [`plan`] - Query description ([`WindowSpec`], [`WindowCall`], [`WindowQuery`], [`Expr`])
//! - [`functions`] - Window, aggregate and scalar function evaluators
//! - [`executor`] - Partitioning, frame resolution and result assembly

pub mod core;
pub mod executor;
pub mod functions;
pub mod plan;

// Re-export main types for convenience
pub use core::{
    parse_timestamp, DataType, Error, Operator, Result, Row, Schema, SchemaBuilder, SchemaColumn,
    Value,
};

// Re-export query description types
pub use plan::{
    DerivedColumn, Expr, FrameBound, FrameOffset, FrameUnit, FunctionFamily, NullsOrder,
    Predicate, SortDirection, SortKey, WindowCall, WindowFrame, WindowFunctionKind, WindowQuery,
    WindowSpec,
};

// Re-export function types
pub use functions::{AggregateFunction, PartitionView, RowSpan, ScalarFunction, WindowFunction};

// Re-export executor types
pub use executor::{EngineConfig, Executor, ParallelConfig, WindowResult};
