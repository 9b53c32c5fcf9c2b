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

//! Function evaluators
//!
//! - [`WindowFunction`] - evaluates one function over a sorted partition
//! - [`AggregateFunction`] - accumulator used by framed aggregates
//! - [`ScalarFunction`] - per-row functions used by derived columns
//!
//! Window functions see a partition only through a [`PartitionView`]:
//! argument values in sorted order plus precomputed peer groups and frames.
//! They never see other partitions and hold no state between calls, so
//! partitions can be evaluated on any thread in any order.

pub mod aggregate;
pub mod scalar;
pub mod window;

use crate::core::{Result, Value};
use crate::plan::WindowFunctionKind;

/// A contiguous run of sorted partition positions, `start..end`
///
/// As a frame this is the inclusive interval `[start, end - 1]`; it is
/// empty when `start >= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RowSpan {
    pub start: usize,
    pub end: usize,
}

impl RowSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The empty span
    pub fn empty() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Positions covered, in order
    pub fn positions(&self) -> std::ops::Range<usize> {
        self.start..self.end.max(self.start)
    }
}

/// What a window function sees of one sorted partition
#[derive(Debug, Clone, Copy)]
pub struct PartitionView<'a> {
    /// Argument column values in sorted order; empty for functions without
    /// an argument
    pub values: &'a [Value],
    /// Peer group of every sorted position
    pub peers: &'a [RowSpan],
    /// Frame of every sorted position; empty for functions that ignore frames
    pub frames: &'a [RowSpan],
}

impl PartitionView<'_> {
    /// Number of rows in the partition
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Trait for aggregate functions
pub trait AggregateFunction: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Accumulate a value into the aggregate
    fn accumulate(&mut self, value: &Value);

    /// Get the current result
    fn result(&self) -> Value;

    /// Reset the aggregate state
    fn reset(&mut self);
}

/// Trait for scalar functions
pub trait ScalarFunction: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Evaluate the function with the given arguments
    fn evaluate(&self, args: &[Value]) -> Result<Value>;
}

/// Trait for window functions
pub trait WindowFunction: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Compute one output value per sorted position of the partition
    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>>;
}

/// Build the evaluator for a planned function call
///
/// Arguments have already been validated by the planner.
pub fn create_window_function(kind: &WindowFunctionKind) -> Box<dyn WindowFunction> {
    match kind {
        WindowFunctionKind::RowNumber => Box::new(RowNumberFunction),
        WindowFunctionKind::Rank => Box::new(RankFunction),
        WindowFunctionKind::DenseRank => Box::new(DenseRankFunction),
        WindowFunctionKind::PercentRank => Box::new(PercentRankFunction),
        WindowFunctionKind::CumeDist => Box::new(CumeDistFunction),
        WindowFunctionKind::Ntile(n) => Box::new(NtileFunction::new(*n)),
        WindowFunctionKind::Lag {
            offset, default, ..
        } => Box::new(LagFunction::new(*offset, default.clone())),
        WindowFunctionKind::Lead {
            offset, default, ..
        } => Box::new(LeadFunction::new(*offset, default.clone())),
        WindowFunctionKind::FirstValue(_) => Box::new(FirstValueFunction),
        WindowFunctionKind::LastValue(_) => Box::new(LastValueFunction),
        WindowFunctionKind::NthValue(_, n) => Box::new(NthValueFunction::new(*n)),
        WindowFunctionKind::Sum(_) => Box::new(FramedAggregate::new(SumFunction::default)),
        WindowFunctionKind::Avg(_) => Box::new(FramedAggregate::new(AvgFunction::default)),
        WindowFunctionKind::Min(_) => Box::new(FramedAggregate::new(MinFunction::default)),
        WindowFunctionKind::Max(_) => Box::new(FramedAggregate::new(MaxFunction::default)),
        WindowFunctionKind::Count(None) => Box::new(FramedAggregate::new(CountFunction::rows)),
        WindowFunctionKind::Count(Some(_)) => {
            Box::new(FramedAggregate::new(CountFunction::non_null))
        }
    }
}

// Re-export main types
pub use aggregate::{
    AvgFunction, CountFunction, FramedAggregate, MaxFunction, MinFunction, SumFunction,
};
pub use scalar::{CoalesceFunction, RoundFunction};
pub use window::{
    CumeDistFunction, DenseRankFunction, FirstValueFunction, LagFunction, LastValueFunction,
    LeadFunction, NthValueFunction, NtileFunction, PercentRankFunction, RankFunction,
    RowNumberFunction,
};

#[cfg(test)]
pub(crate) mod test_support {
    use super::RowSpan;

    /// Peer groups for sorted order keys
    pub fn peers_of<T: PartialEq>(keys: &[T]) -> Vec<RowSpan> {
        let mut groups = Vec::with_capacity(keys.len());
        let mut start = 0;
        for i in 1..=keys.len() {
            if i == keys.len() || keys[i] != keys[start] {
                groups.extend(std::iter::repeat(RowSpan::new(start, i)).take(i - start));
                start = i;
            }
        }
        groups
    }

    /// Every row its own peer group
    pub fn distinct_peers(n: usize) -> Vec<RowSpan> {
        (0..n).map(|i| RowSpan::new(i, i + 1)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::peers_of;
    use super::*;

    #[test]
    fn test_row_span() {
        let span = RowSpan::new(2, 5);
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
        assert_eq!(span.positions().collect::<Vec<_>>(), vec![2, 3, 4]);

        let inverted = RowSpan::new(4, 3);
        assert!(inverted.is_empty());
        assert_eq!(inverted.len(), 0);
        assert_eq!(inverted.positions().count(), 0);
    }

    #[test]
    fn test_peers_helper() {
        let peers = peers_of(&[1, 1, 2, 3, 3]);
        assert_eq!(peers[0], RowSpan::new(0, 2));
        assert_eq!(peers[1], RowSpan::new(0, 2));
        assert_eq!(peers[2], RowSpan::new(2, 3));
        assert_eq!(peers[4], RowSpan::new(3, 5));
    }

    #[test]
    fn test_factory_names() {
        let cases = [
            (WindowFunctionKind::RowNumber, "ROW_NUMBER"),
            (WindowFunctionKind::Ntile(3), "NTILE"),
            (WindowFunctionKind::lag("x"), "LAG"),
            (WindowFunctionKind::Sum("x".into()), "SUM"),
            (WindowFunctionKind::Count(None), "COUNT"),
            (WindowFunctionKind::NthValue("x".into(), 2), "NTH_VALUE"),
        ];
        for (kind, name) in cases {
            assert_eq!(create_window_function(&kind).name(), name);
        }
    }
}
