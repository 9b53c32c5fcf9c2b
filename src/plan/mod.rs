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

//! Query description types
//!
//! - [`WindowSpec`] - partitioning, ordering and frame of an `OVER` clause
//! - [`WindowCall`] - a window function with its specification and alias
//! - [`Expr`] / [`Predicate`] - derived columns and post-filters
//! - [`WindowQuery`] - the full request handed to the executor

pub mod expr;
pub mod function;
pub mod query;
pub mod window;

pub use expr::{BoundExpr, BoundPredicate, Expr, Predicate};
pub use function::{FunctionFamily, WindowCall, WindowFunctionKind};
pub use query::{DerivedColumn, WindowQuery};
pub use window::{
    FrameBound, FrameOffset, FrameUnit, NullsOrder, SortDirection, SortKey, WindowFrame,
    WindowSpec,
};
