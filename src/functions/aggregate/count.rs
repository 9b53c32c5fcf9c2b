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

//! COUNT aggregate function

use crate::core::Value;
use crate::functions::AggregateFunction;

/// COUNT aggregate function
///
/// - COUNT(*) counts every row of the frame, NULLs included
/// - COUNT(column) counts non-NULL values
///
/// An empty frame counts 0, never NULL.
#[derive(Default)]
pub struct CountFunction {
    count: i64,
    count_nulls: bool,
}

impl CountFunction {
    /// COUNT(*)
    pub fn rows() -> Self {
        Self {
            count: 0,
            count_nulls: true,
        }
    }

    /// COUNT(column)
    pub fn non_null() -> Self {
        Self::default()
    }
}

impl AggregateFunction for CountFunction {
    fn name(&self) -> &str {
        "COUNT"
    }

    fn accumulate(&mut self, value: &Value) {
        if self.count_nulls || !value.is_null() {
            self.count += 1;
        }
    }

    fn result(&self) -> Value {
        Value::Integer(self.count)
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_column_skips_nulls() {
        let mut count = CountFunction::non_null();
        count.accumulate(&Value::Integer(1));
        count.accumulate(&Value::null_unknown());
        count.accumulate(&Value::text("x"));
        assert_eq!(count.result(), Value::Integer(2));
    }

    #[test]
    fn test_count_star_counts_nulls() {
        let mut count = CountFunction::rows();
        count.accumulate(&Value::null_unknown());
        count.accumulate(&Value::Integer(1));
        assert_eq!(count.result(), Value::Integer(2));
        count.reset();
        assert_eq!(count.result(), Value::Integer(0));
    }
}
