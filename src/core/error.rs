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

//! Error types for Winframe
//!
//! Every failure the engine can report is a variant of [`Error`]. Query
//! problems are detected while planning, before a single row is evaluated,
//! so a caller either gets the complete result or one of these errors.

use thiserror::Error;

/// Result type alias for Winframe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Winframe
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // =========================================================================
    // Column errors
    // =========================================================================
    /// Column referenced by a window, projection, filter or ordering is unknown
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Two output columns (input, window or derived) share a name
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    // =========================================================================
    // Window specification errors
    // =========================================================================
    /// PRECEDING/FOLLOWING offset (or LAG/LEAD offset) below zero
    #[error("negative offset {offset} in {context}")]
    NegativeOffset { context: String, offset: String },

    /// Frame bounds that can never describe a frame
    #[error("invalid window frame: {0}")]
    InvalidFrame(String),

    /// RANGE with value offsets needs exactly one ORDER BY column
    #[error("RANGE with offset PRECEDING/FOLLOWING requires exactly one ORDER BY column, got {count}")]
    RangeOrderByCount { count: usize },

    /// RANGE with value offsets over a key that is neither numeric nor temporal
    #[error("RANGE offset cannot be applied to column '{column}' of type {data_type}")]
    NonOrderableRangeKey { column: String, data_type: String },

    /// RANGE offset kind does not match the ORDER BY column (e.g. interval on a number)
    #[error("RANGE offset {offset} is not compatible with column '{column}' of type {data_type}")]
    RangeOffsetMismatch {
        column: String,
        data_type: String,
        offset: String,
    },

    // =========================================================================
    // Type errors
    // =========================================================================
    /// Aggregate that needs numbers applied to a non-numeric column
    #[error("{function} requires a numeric argument, column '{column}' is {data_type}")]
    NonNumericArgument {
        function: String,
        column: String,
        data_type: String,
    },

    /// Column type cannot be ordered (used by MIN/MAX and ORDER BY)
    #[error("column '{column}' of type {data_type} cannot be ordered")]
    NonOrderableColumn { column: String, data_type: String },

    /// Invalid argument for function
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // Input errors
    // =========================================================================
    /// Row arity differs from the schema
    #[error("row {row} has {got} values, schema expects {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// Row value type differs from the schema column type
    #[error("row {row}: column '{column}' expects {expected}, got {got}")]
    TypeMismatch {
        row: usize,
        column: String,
        expected: String,
        got: String,
    },

    /// NULL in a column declared NOT NULL
    #[error("row {row}: column '{column}' is not nullable")]
    NullValue { row: usize, column: String },

    // =========================================================================
    // Comparison errors
    // =========================================================================
    /// Cannot compare NULL with non-NULL value
    #[error("cannot compare NULL with non-NULL value")]
    NullComparison,

    /// Cannot compare incompatible types
    #[error("cannot compare incompatible types")]
    IncomparableTypes,

    // =========================================================================
    // Other errors
    // =========================================================================
    /// Configuration string could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Parse error (timestamps, data types)
    #[error("parse error: {0}")]
    Parse(String),

    /// Internal error for unexpected conditions
    #[error("{message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new NegativeOffset error
    pub fn negative_offset(context: impl Into<String>, offset: impl ToString) -> Self {
        Error::NegativeOffset {
            context: context.into(),
            offset: offset.to_string(),
        }
    }

    /// Create a new InvalidFrame error
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Error::InvalidFrame(message.into())
    }

    /// Create a new NonNumericArgument error
    pub fn non_numeric_argument(
        function: impl Into<String>,
        column: impl Into<String>,
        data_type: impl ToString,
    ) -> Self {
        Error::NonNumericArgument {
            function: function.into(),
            column: column.into(),
            data_type: data_type.to_string(),
        }
    }

    /// Create a new InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a new Config error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Create a new Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Check if this error rejects the shape of a query (names, frames, arguments)
    pub fn is_specification_error(&self) -> bool {
        matches!(
            self,
            Error::ColumnNotFound(_)
                | Error::DuplicateColumn(_)
                | Error::NegativeOffset { .. }
                | Error::InvalidFrame(_)
                | Error::RangeOrderByCount { .. }
                | Error::InvalidArgument(_)
        )
    }

    /// Check if this error rejects a query because of column types
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Error::NonOrderableRangeKey { .. }
                | Error::RangeOffsetMismatch { .. }
                | Error::NonNumericArgument { .. }
                | Error::NonOrderableColumn { .. }
        )
    }

    /// Check if this error comes from rows that do not match their schema
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::ColumnCountMismatch { .. } | Error::TypeMismatch { .. } | Error::NullValue { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::ColumnNotFound("region".to_string()).to_string(),
            "column 'region' not found"
        );
        assert_eq!(
            Error::DuplicateColumn("rank".to_string()).to_string(),
            "duplicate column 'rank'"
        );
        assert_eq!(
            Error::negative_offset("ROWS frame start", -2).to_string(),
            "negative offset -2 in ROWS frame start"
        );
        assert_eq!(
            Error::RangeOrderByCount { count: 2 }.to_string(),
            "RANGE with offset PRECEDING/FOLLOWING requires exactly one ORDER BY column, got 2"
        );
        assert_eq!(
            Error::non_numeric_argument("SUM", "name", "TEXT").to_string(),
            "SUM requires a numeric argument, column 'name' is TEXT"
        );
        assert_eq!(
            Error::NullComparison.to_string(),
            "cannot compare NULL with non-NULL value"
        );
    }

    #[test]
    fn test_input_error_display() {
        let err = Error::ColumnCountMismatch {
            row: 3,
            expected: 4,
            got: 2,
        };
        assert_eq!(err.to_string(), "row 3 has 2 values, schema expects 4");

        let err = Error::NullValue {
            row: 0,
            column: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "row 0: column 'amount' is not nullable");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::ColumnNotFound("c".to_string()).is_specification_error());
        assert!(Error::negative_offset("LAG", -1).is_specification_error());
        assert!(Error::invalid_frame("x").is_specification_error());
        assert!(!Error::NullComparison.is_specification_error());

        assert!(Error::non_numeric_argument("AVG", "c", "TEXT").is_type_error());
        assert!(Error::NonOrderableRangeKey {
            column: "c".to_string(),
            data_type: "TEXT".to_string()
        }
        .is_type_error());
        assert!(!Error::ColumnNotFound("c".to_string()).is_type_error());

        assert!(Error::NullValue {
            row: 1,
            column: "c".to_string()
        }
        .is_input_error());
        assert!(!Error::config("x").is_input_error());
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            Error::ColumnNotFound("t".to_string()),
            Error::ColumnNotFound("t".to_string())
        );
        assert_ne!(
            Error::ColumnNotFound("t".to_string()),
            Error::DuplicateColumn("t".to_string())
        );
    }
}
