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

//! Row type for Winframe - an immutable tuple of column values

use std::fmt;
use std::ops::{Deref, Index};
use std::sync::Arc;

use super::error::{Error, Result};
use super::schema::Schema;
use super::value::Value;

/// A tuple of column values
///
/// Rows are immutable once handed to the engine. The values live in an
/// `Arc<[Value]>`, so cloning a row into partitions and output is O(1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    values: Arc<[Value]>,
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

impl Row {
    /// Create a new empty row
    #[inline]
    pub fn new() -> Self {
        Self {
            values: Arc::from(Vec::new()),
        }
    }

    /// Create a row from a vector of values
    #[inline]
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            values: Arc::from(values),
        }
    }

    /// Create a row sharing already-allocated values
    #[inline]
    pub fn from_arc(values: Arc<[Value]>) -> Self {
        Self { values }
    }

    /// Get the number of columns in the row
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Iterate over values
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Get the values as a slice
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Check this row against a schema
    ///
    /// `row` is the position of the row in its input stream and is only used
    /// in error messages. Integer and float values are interchangeable; NULL
    /// is accepted only in nullable columns.
    pub fn validate(&self, schema: &Schema, row: usize) -> Result<()> {
        if self.values.len() != schema.columns.len() {
            return Err(Error::ColumnCountMismatch {
                row,
                expected: schema.columns.len(),
                got: self.values.len(),
            });
        }

        for (value, col) in self.values.iter().zip(schema.columns.iter()) {
            if value.is_null() {
                if !col.nullable {
                    return Err(Error::NullValue {
                        row,
                        column: col.name.clone(),
                    });
                }
                continue;
            }

            let value_type = value.data_type();
            if !col.data_type.accepts(value_type) {
                return Err(Error::TypeMismatch {
                    row,
                    column: col.name.clone(),
                    expected: col.data_type.to_string(),
                    got: value_type.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Deref for Row {
    type Target = [Value];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl Index<usize> for Row {
    type Output = Value;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::from_values(values)
    }
}

impl From<Arc<[Value]>> for Row {
    fn from(values: Arc<[Value]>) -> Self {
        Row::from_arc(values)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

/// Macro for creating rows conveniently
#[macro_export]
macro_rules! row {
    () => {
        $crate::core::Row::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::core::Row::from_values(vec![$($crate::core::Value::from($value)),+])
    };
}
