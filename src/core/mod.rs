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

//! Core types and definitions for Winframe
//!
//! This module contains the fundamental types used throughout the engine:
//!
//! - [`DataType`] - column data types (INTEGER, TEXT, FLOAT, etc.)
//! - [`Operator`] - comparison operators for post-filters
//! - [`Value`] - runtime values with type information
//! - [`Row`] - an immutable tuple of values
//! - [`Schema`] - ordered, typed column definitions
//! - [`Error`] - every error the engine reports

pub mod error;
pub mod row;
pub mod schema;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use row::Row;
pub use schema::{Schema, SchemaBuilder, SchemaColumn};
pub use types::{DataType, Operator};
pub use value::{parse_timestamp, Value};

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Integration test: build a schema, build rows, validate
    #[test]
    fn test_schema_row_integration() {
        let schema = SchemaBuilder::new()
            .add("month", DataType::Timestamp)
            .add("total", DataType::Integer)
            .add_nullable("note", DataType::Text)
            .build();

        let row = Row::from_values(vec![
            Value::date(2024, 1, 1).unwrap(),
            Value::integer(70000),
            Value::null(DataType::Text),
        ]);
        assert!(row.validate(&schema, 0).is_ok());

        let row = Row::from_values(vec![
            Value::date(2024, 2, 1).unwrap(),
            Value::null(DataType::Integer),
            Value::text("holiday"),
        ]);
        let err = row.validate(&schema, 1).unwrap_err();
        assert!(err.is_input_error());
    }

    /// Integration test: Value comparisons across types
    #[test]
    fn test_value_comparison_integration() {
        use std::cmp::Ordering;

        assert_eq!(
            Value::integer(1).compare(&Value::integer(2)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Value::float(2.5).compare(&Value::integer(2)).unwrap(),
            Ordering::Greater
        );
        assert!(Value::null(DataType::Integer)
            .compare(&Value::integer(0))
            .is_err());
    }

    /// Integration test: Timestamp handling
    #[test]
    fn test_timestamp_integration() {
        let parsed = parse_timestamp("2024-03-01").unwrap();
        let built = Value::date(2024, 3, 1).unwrap();
        assert_eq!(Value::timestamp(parsed), built);
        assert_eq!(
            Value::text("2024-03-01").as_timestamp(),
            built.as_timestamp()
        );
    }
}
