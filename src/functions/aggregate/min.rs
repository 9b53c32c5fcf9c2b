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

//! MIN aggregate function

use std::cmp::Ordering;

use crate::core::Value;
use crate::functions::AggregateFunction;

/// MIN aggregate function
///
/// Returns the minimum of all non-NULL values in the frame.
/// Works with any orderable type (numbers, strings, timestamps, booleans).
#[derive(Default)]
pub struct MinFunction {
    min_value: Option<Value>,
}

impl AggregateFunction for MinFunction {
    fn name(&self) -> &str {
        "MIN"
    }

    fn accumulate(&mut self, value: &Value) {
        if value.is_null() {
            return;
        }

        let replace = match &self.min_value {
            None => true,
            Some(current) => value.compare(current) == Ok(Ordering::Less),
        };
        if replace {
            self.min_value = Some(value.clone());
        }
    }

    fn result(&self) -> Value {
        self.min_value.clone().unwrap_or_else(Value::null_unknown)
    }

    fn reset(&mut self) {
        self.min_value = None;
    }
}
