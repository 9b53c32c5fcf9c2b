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

//! Aggregate Functions
//!
//! Accumulators for aggregates used as window functions:
//!
//! - [`CountFunction`] - COUNT(*) and COUNT(column)
//! - [`SumFunction`] - SUM(column)
//! - [`AvgFunction`] - AVG(column)
//! - [`MinFunction`] - MIN(column)
//! - [`MaxFunction`] - MAX(column)
//!
//! [`FramedAggregate`] turns any of them into a window function that
//! evaluates the aggregate over each row's frame.

mod avg;
mod count;
mod max;
mod min;
mod sum;

pub use avg::AvgFunction;
pub use count::CountFunction;
pub use max::MaxFunction;
pub use min::MinFunction;
pub use sum::SumFunction;

use crate::core::{Error, Result, Value};
use crate::functions::{AggregateFunction, PartitionView, RowSpan, WindowFunction};

/// An aggregate evaluated over the frame of every row
///
/// When a row's frame starts where the previous one did and ends no
/// earlier, only the new tail is accumulated (running totals are O(n)).
/// Any other frame is recomputed from scratch.
pub struct FramedAggregate<A: AggregateFunction> {
    factory: fn() -> A,
    name: String,
}

impl<A: AggregateFunction> FramedAggregate<A> {
    pub fn new(factory: fn() -> A) -> Self {
        let name = factory().name().to_string();
        Self { factory, name }
    }
}

impl<A: AggregateFunction> WindowFunction for FramedAggregate<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        let n = partition.len();
        if partition.frames.len() != n {
            return Err(Error::internal(format!(
                "{} expects {} frames, got {}",
                self.name,
                n,
                partition.frames.len()
            )));
        }

        // COUNT(*) has no argument column; it sees NULL for every row
        let null = Value::null_unknown();
        let value_at = |pos: usize| partition.values.get(pos).unwrap_or(&null);

        let empty_result = (self.factory)().result();
        let mut acc = (self.factory)();
        let mut accumulated = RowSpan::empty();
        let mut results = Vec::with_capacity(n);

        for frame in partition.frames {
            if frame.is_empty() {
                results.push(empty_result.clone());
                continue;
            }

            if !accumulated.is_empty()
                && frame.start == accumulated.start
                && frame.end >= accumulated.end
            {
                for pos in accumulated.end..frame.end {
                    acc.accumulate(value_at(pos));
                }
            } else {
                acc.reset();
                for pos in frame.positions() {
                    acc.accumulate(value_at(pos));
                }
            }
            accumulated = *frame;
            results.push(acc.result());
        }

        Ok(results)
    }
}
