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

//! AVG aggregate function

use crate::core::Value;
use crate::functions::AggregateFunction;

/// AVG aggregate function
///
/// Returns the average of all non-NULL values in the frame.
/// Always returns a float64; NULL when nothing was accumulated.
#[derive(Default)]
pub struct AvgFunction {
    sum: f64,
    count: i64,
}

impl AggregateFunction for AvgFunction {
    fn name(&self) -> &str {
        "AVG"
    }

    fn accumulate(&mut self, value: &Value) {
        let numeric_value = match value {
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            _ => return,
        };

        self.sum += numeric_value;
        self.count += 1;
    }

    fn result(&self) -> Value {
        if self.count == 0 {
            Value::null_unknown()
        } else {
            Value::Float(self.sum / self.count as f64)
        }
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }
}
