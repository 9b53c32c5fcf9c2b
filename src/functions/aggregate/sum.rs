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

//! SUM aggregate function

use crate::core::Value;
use crate::functions::AggregateFunction;

/// Sum state - tracks whether we have integers or floats
#[derive(Default)]
enum SumState {
    #[default]
    Empty,
    Integer(i64),
    Float(f64),
}

/// SUM aggregate function
///
/// Returns the sum of all non-NULL values in the frame.
/// Returns int64 for integer inputs, float64 once a float is seen or the
/// integer sum overflows.
#[derive(Default)]
pub struct SumFunction {
    state: SumState,
}

impl AggregateFunction for SumFunction {
    fn name(&self) -> &str {
        "SUM"
    }

    fn accumulate(&mut self, value: &Value) {
        match value {
            Value::Integer(i) => match &mut self.state {
                SumState::Empty => self.state = SumState::Integer(*i),
                SumState::Integer(sum) => match sum.checked_add(*i) {
                    Some(next) => *sum = next,
                    None => self.state = SumState::Float(*sum as f64 + *i as f64),
                },
                SumState::Float(sum) => *sum += *i as f64,
            },
            Value::Float(f) => match &mut self.state {
                SumState::Empty => self.state = SumState::Float(*f),
                SumState::Integer(sum) => {
                    self.state = SumState::Float(*sum as f64 + f);
                }
                SumState::Float(sum) => *sum += f,
            },
            // NULLs and non-numeric values are ignored
            _ => {}
        }
    }

    fn result(&self) -> Value {
        match &self.state {
            SumState::Empty => Value::null_unknown(),
            SumState::Integer(sum) => Value::Integer(*sum),
            SumState::Float(sum) => Value::Float(*sum),
        }
    }

    fn reset(&mut self) {
        self.state = SumState::Empty;
    }
}
