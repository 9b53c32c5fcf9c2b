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

//! FIRST_VALUE, LAST_VALUE and NTH_VALUE window functions
//!
//! All three read the argument column at a position inside each row's
//! frame and return NULL when the frame has no such position.

use crate::core::{Error, Result, Value};
use crate::functions::{PartitionView, RowSpan, WindowFunction};

fn pick(
    name: &str,
    partition: &PartitionView<'_>,
    position: impl Fn(&RowSpan) -> Option<usize>,
) -> Result<Vec<Value>> {
    if partition.frames.len() != partition.len() {
        return Err(Error::internal(format!(
            "{} expects {} frames, got {}",
            name,
            partition.len(),
            partition.frames.len()
        )));
    }
    Ok(partition
        .frames
        .iter()
        .map(|frame| {
            position(frame)
                .and_then(|pos| partition.values.get(pos))
                .cloned()
                .unwrap_or_else(Value::null_unknown)
        })
        .collect())
}

/// FIRST_VALUE window function
#[derive(Default)]
pub struct FirstValueFunction;

impl WindowFunction for FirstValueFunction {
    fn name(&self) -> &str {
        "FIRST_VALUE"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        pick(self.name(), partition, |frame| {
            (!frame.is_empty()).then_some(frame.start)
        })
    }
}

/// LAST_VALUE window function
#[derive(Default)]
pub struct LastValueFunction;

impl WindowFunction for LastValueFunction {
    fn name(&self) -> &str {
        "LAST_VALUE"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        pick(self.name(), partition, |frame| {
            (!frame.is_empty()).then(|| frame.end - 1)
        })
    }
}

/// NTH_VALUE window function, `n` counted from 1 within the frame
pub struct NthValueFunction {
    n: i64,
}

impl NthValueFunction {
    pub fn new(n: i64) -> Self {
        Self { n }
    }
}

impl WindowFunction for NthValueFunction {
    fn name(&self) -> &str {
        "NTH_VALUE"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        if self.n <= 0 {
            return Err(Error::invalid_argument(format!(
                "NTH_VALUE position must be positive, got {}",
                self.n
            )));
        }
        let skip = usize::try_from(self.n - 1).unwrap_or(usize::MAX);
        pick(self.name(), partition, |frame| {
            (skip < frame.len()).then(|| frame.start + skip)
        })
    }
}
