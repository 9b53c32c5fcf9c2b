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

//! ROW_NUMBER window function

use crate::core::{Result, Value};
use crate::functions::{PartitionView, WindowFunction};

/// ROW_NUMBER window function
///
/// Returns the 1-based position of the row in its sorted partition. Ties
/// keep their input order because the partition sort is stable.
#[derive(Default)]
pub struct RowNumberFunction;

impl WindowFunction for RowNumberFunction {
    fn name(&self) -> &str {
        "ROW_NUMBER"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        Ok((1..=partition.len() as i64).map(Value::Integer).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::test_support::peers_of;

    #[test]
    fn test_row_number_ignores_ties() {
        let peers = peers_of(&[1, 1, 2]);
        let view = PartitionView {
            values: &[],
            peers: &peers,
            frames: &[],
        };
        assert_eq!(
            RowNumberFunction.evaluate(&view).unwrap(),
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
    }

    #[test]
    fn test_row_number_empty_partition() {
        let view = PartitionView {
            values: &[],
            peers: &[],
            frames: &[],
        };
        assert!(RowNumberFunction.evaluate(&view).unwrap().is_empty());
    }
}
