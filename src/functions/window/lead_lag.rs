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

//! LEAD and LAG window functions

use crate::core::{Result, Value};
use crate::functions::{PartitionView, WindowFunction};

/// Convert a validated non-negative offset; offsets past `usize` can never
/// land inside a partition
fn offset_to_usize(offset: i64) -> usize {
    usize::try_from(offset).unwrap_or(usize::MAX)
}

/// LEAD window function
///
/// Returns the value from the row `offset` positions after the current row
/// within the sorted partition, or the default when there is no such row.
pub struct LeadFunction {
    offset: usize,
    default_value: Value,
}

impl LeadFunction {
    /// Create a new LEAD function with the specified offset and default value
    pub fn new(offset: i64, default_value: Value) -> Self {
        Self {
            offset: offset_to_usize(offset),
            default_value,
        }
    }
}

impl WindowFunction for LeadFunction {
    fn name(&self) -> &str {
        "LEAD"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        Ok((0..partition.len())
            .map(|pos| {
                pos.checked_add(self.offset)
                    .and_then(|target| partition.values.get(target))
                    .cloned()
                    .unwrap_or_else(|| self.default_value.clone())
            })
            .collect())
    }
}

/// LAG window function
///
/// Returns the value from the row `offset` positions before the current row
/// within the sorted partition, or the default when there is no such row.
pub struct LagFunction {
    offset: usize,
    default_value: Value,
}

impl LagFunction {
    /// Create a new LAG function with the specified offset and default value
    pub fn new(offset: i64, default_value: Value) -> Self {
        Self {
            offset: offset_to_usize(offset),
            default_value,
        }
    }
}

impl WindowFunction for LagFunction {
    fn name(&self) -> &str {
        "LAG"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        Ok((0..partition.len())
            .map(|pos| {
                pos.checked_sub(self.offset)
                    .and_then(|target| partition.values.get(target))
                    .cloned()
                    .unwrap_or_else(|| self.default_value.clone())
            })
            .collect())
    }
}
