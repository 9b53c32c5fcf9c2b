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

//! Ranking and distribution window functions
//!
//! All four functions are driven by the peer groups of the sorted
//! partition: rows with equal ordering keys share a group, and a group is
//! the span `start..end` of sorted positions.

use crate::core::{Result, Value};
use crate::functions::{PartitionView, WindowFunction};

/// RANK window function
///
/// 1-based rank with gaps: the rank of a row is one more than the number
/// of rows sorted strictly before its peer group.
///
/// Example: If two rows tie for rank 1, the next row gets rank 3 (not 2).
#[derive(Default)]
pub struct RankFunction;

impl WindowFunction for RankFunction {
    fn name(&self) -> &str {
        "RANK"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        Ok(partition
            .peers
            .iter()
            .map(|group| Value::Integer(group.start as i64 + 1))
            .collect())
    }
}

/// DENSE_RANK window function
///
/// Like RANK but without gaps: the rank of a row is the number of distinct
/// peer groups up to and including its own.
#[derive(Default)]
pub struct DenseRankFunction;

impl WindowFunction for DenseRankFunction {
    fn name(&self) -> &str {
        "DENSE_RANK"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        let mut results = Vec::with_capacity(partition.len());
        let mut rank = 0i64;
        for (pos, group) in partition.peers.iter().enumerate() {
            if group.start == pos {
                rank += 1;
            }
            results.push(Value::Integer(rank));
        }
        Ok(results)
    }
}

/// PERCENT_RANK window function
///
/// `(RANK - 1) / (N - 1)`, and 0 for partitions of one row.
#[derive(Default)]
pub struct PercentRankFunction;

impl WindowFunction for PercentRankFunction {
    fn name(&self) -> &str {
        "PERCENT_RANK"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        let n = partition.len();
        Ok(partition
            .peers
            .iter()
            .map(|group| {
                if n <= 1 {
                    Value::Float(0.0)
                } else {
                    Value::Float(group.start as f64 / (n - 1) as f64)
                }
            })
            .collect())
    }
}

/// CUME_DIST window function
///
/// Fraction of partition rows sorted before or level with the current row,
/// peers included: `(end of peer group) / N`.
#[derive(Default)]
pub struct CumeDistFunction;

impl WindowFunction for CumeDistFunction {
    fn name(&self) -> &str {
        "CUME_DIST"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        let n = partition.len() as f64;
        Ok(partition
            .peers
            .iter()
            .map(|group| Value::Float(group.end as f64 / n))
            .collect())
    }
}
