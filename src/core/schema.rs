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

//! Schema types for Winframe - named, typed columns of a tuple stream

use std::fmt;

use rustc_hash::FxHashMap;

use super::error::{Error, Result};
use super::types::DataType;

/// A column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    /// Column name
    pub name: String,

    /// Data type of the column
    pub data_type: DataType,

    /// Whether the column can contain NULL values
    pub nullable: bool,
}

impl SchemaColumn {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Create a non-nullable column
    pub fn simple(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type, false)
    }

    /// Create a nullable column
    pub fn nullable(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, data_type, true)
    }
}

impl fmt::Display for SchemaColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// Ordered column definitions shared by every row of one evaluation call
///
/// Column lookups are case-insensitive. If two columns share a name, lookups
/// resolve to the first one; the planner rejects such schemas as duplicate
/// output columns.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Column definitions
    pub columns: Vec<SchemaColumn>,

    /// lowercase name -> index
    column_index_map: FxHashMap<String, usize>,
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for Schema {}

impl Schema {
    /// Create a new schema from column definitions
    pub fn new(columns: Vec<SchemaColumn>) -> Self {
        let mut column_index_map =
            FxHashMap::with_capacity_and_hasher(columns.len(), Default::default());
        for (i, col) in columns.iter().enumerate() {
            column_index_map.entry(col.name.to_lowercase()).or_insert(i);
        }
        Self {
            columns,
            column_index_map,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has any columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Find a column by name (case-insensitive)
    /// Returns the column index and reference
    pub fn find_column(&self, name: &str) -> Option<(usize, &SchemaColumn)> {
        let idx = *self.column_index_map.get(&name.to_lowercase())?;
        self.columns.get(idx).map(|col| (idx, col))
    }

    /// Like [`Schema::find_column`], failing with `ColumnNotFound`
    pub fn resolve(&self, name: &str) -> Result<(usize, &SchemaColumn)> {
        self.find_column(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Get the column index by name (case-insensitive)
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.find_column(name).map(|(idx, _)| idx)
    }

    /// Get the data type of a column by name
    pub fn get_column_type(&self, name: &str) -> Option<DataType> {
        self.find_column(name).map(|(_, col)| col.data_type)
    }

    /// Get all column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns the name of the first column that appears twice (case-insensitive)
    pub fn first_duplicate(&self) -> Option<&str> {
        self.columns
            .iter()
            .enumerate()
            .find(|(i, col)| self.column_index_map.get(&col.name.to_lowercase()) != Some(i))
            .map(|(_, col)| col.name.as_str())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", col)?;
        }
        write!(f, ")")
    }
}

/// Builder for creating schemas fluently
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    columns: Vec<SchemaColumn>,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a non-nullable column
    pub fn add(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(SchemaColumn::simple(name, data_type));
        self
    }

    /// Add a nullable column
    pub fn add_nullable(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(SchemaColumn::nullable(name, data_type));
        self
    }

    /// Add a prepared column definition
    pub fn column(mut self, column: SchemaColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Build the schema
    pub fn build(self) -> Schema {
        Schema::new(self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_schema() -> Schema {
        SchemaBuilder::new()
            .add("region", DataType::Text)
            .add("month", DataType::Timestamp)
            .add_nullable("amount", DataType::Integer)
            .build()
    }

    #[test]
    fn test_find_column_case_insensitive() {
        let schema = sales_schema();
        assert_eq!(schema.column_count(), 3);
        assert_eq!(schema.get_column_index("REGION"), Some(0));
        assert_eq!(schema.get_column_type("Amount"), Some(DataType::Integer));
        assert!(schema.find_column("month").is_some());
        assert!(schema.find_column("day").is_none());
    }

    #[test]
    fn test_resolve_unknown_column() {
        let schema = sales_schema();
        assert_eq!(
            schema.resolve("quantity").unwrap_err(),
            Error::ColumnNotFound("quantity".to_string())
        );
        let (idx, col) = schema.resolve("amount").unwrap();
        assert_eq!(idx, 2);
        assert!(col.nullable);
    }

    #[test]
    fn test_first_duplicate() {
        assert_eq!(sales_schema().first_duplicate(), None);

        let schema = SchemaBuilder::new()
            .add("id", DataType::Integer)
            .add("name", DataType::Text)
            .add("ID", DataType::Integer)
            .build();
        assert_eq!(schema.first_duplicate(), Some("ID"));
        assert_eq!(schema.get_column_index("id"), Some(0));
    }

    #[test]
    fn test_display() {
        let schema = sales_schema();
        assert_eq!(
            schema.to_string(),
            "(region TEXT NOT NULL, month TIMESTAMP NOT NULL, amount INTEGER)"
        );
        assert_eq!(schema.column_names(), vec!["region", "month", "amount"]);
    }
}
