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

//! MAX aggregate function

use std::cmp::Ordering;

use crate::core::Value;
use crate::functions::AggregateFunction;

/// MAX aggregate function
///
/// Returns the maximum of all non-NULL values in the frame.
#[derive(Default)]
pub struct MaxFunction {
    max_value: Option<Value>,
}

impl AggregateFunction for MaxFunction {
    fn name(&self) -> &str {
        "MAX"
    }

    fn accumulate(&mut self, value: &Value) {
        if value.is_null() {
            return;
        }

        let replace = match &self.max_value {
            None => true,
            Some(current) => value.compare(current) == Ok(Ordering::Greater),
        };
        if replace {
            self.max_value = Some(value.clone());
        }
    }

    fn result(&self) -> Value {
        self.max_value.clone().unwrap_or_else(Value::null_unknown)
    }

    fn reset(&mut self) {
        self.max_value = None;
    }
}
