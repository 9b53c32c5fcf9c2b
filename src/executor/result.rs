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

//! Execution result types
//!
//! A [`WindowResult`] is fully materialized: evaluation either produces
//! every output row or fails before producing any.

use std::fmt;

use crate::core::{Error, Result, Row, Schema, Value};

/// Output of one window query
#[derive(Debug, Clone, PartialEq)]
pub struct WindowResult {
    schema: Schema,
    rows: Vec<Row>,
}

impl WindowResult {
    /// Create a result from its output schema and rows
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    /// Output columns: selected input columns, window outputs, derived columns
    ///
    /// Declared numeric types are the family, not the exact variant: an
    /// Integer column may hold a Float where a SUM widened on overflow.
    /// Every value satisfies `column.data_type.accepts(value.data_type())`.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.column_names()
    }

    /// Get the output rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Take the output rows
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Number of output rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, in output order
    pub fn column(&self, name: &str) -> Result<Vec<Value>> {
        let (idx, _) = self.schema.resolve(name)?;
        self.rows
            .iter()
            .map(|row| {
                row.get(idx)
                    .cloned()
                    .ok_or_else(|| Error::internal(format!("output row missing column '{}'", name)))
            })
            .collect()
    }

    /// One cell by row position and column name
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.schema.get_column_index(name)?;
        self.rows.get(row)?.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a WindowResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for WindowResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl fmt::Display for WindowResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.column_names().join(" | "))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", cells.join(" | "))?;
        }
        Ok(())
    }
}
