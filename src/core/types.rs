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

//! Core type definitions for Winframe
//!
//! This module defines the fundamental types: DataType and Operator

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::Error;

/// Column data types understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DataType {
    /// NULL data type, used for unknown/unspecified types
    #[default]
    Null = 0,

    /// 64-bit signed integer
    Integer = 1,

    /// 64-bit floating point number
    Float = 2,

    /// UTF-8 text string
    Text = 3,

    /// Boolean true/false
    Boolean = 4,

    /// Timestamp (stored as UTC); dates are midnight timestamps
    Timestamp = 5,
}

impl DataType {
    /// Returns true if this type is numeric (INTEGER or FLOAT)
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Returns true if this type is temporal
    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Timestamp)
    }

    /// Returns true if values of this type can be ordered
    pub fn is_orderable(&self) -> bool {
        !matches!(self, DataType::Null)
    }

    /// Returns true if a RANGE frame may use value offsets over this type
    pub fn supports_range_offset(&self) -> bool {
        self.is_numeric() || self.is_temporal()
    }

    /// Returns true if a value of type `other` may be stored in a column of this type
    pub fn accepts(&self, other: DataType) -> bool {
        *self == other
            || other == DataType::Null
            || (self.is_numeric() && other.is_numeric())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Null => write!(f, "NULL"),
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Text => write!(f, "TEXT"),
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NULL" => Ok(DataType::Null),
            "INTEGER" | "INT" | "BIGINT" | "SMALLINT" => Ok(DataType::Integer),
            "FLOAT" | "DOUBLE" | "REAL" | "DECIMAL" | "NUMERIC" => Ok(DataType::Float),
            "TEXT" | "VARCHAR" | "CHAR" | "STRING" => Ok(DataType::Text),
            "BOOLEAN" | "BOOL" => Ok(DataType::Boolean),
            "TIMESTAMP" | "DATETIME" | "DATE" => Ok(DataType::Timestamp),
            _ => Err(Error::parse(format!("unknown data type: {}", s))),
        }
    }
}

/// Comparison operators for post-filter predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equality (=)
    Eq,

    /// Inequality (!=)
    Ne,

    /// Greater than (>)
    Gt,

    /// Greater than or equal (>=)
    Gte,

    /// Less than (<)
    Lt,

    /// Less than or equal (<=)
    Lte,

    /// IS NULL check
    IsNull,

    /// IS NOT NULL check
    IsNotNull,
}

impl Operator {
    /// Returns true if this operator needs a right-hand value
    pub fn needs_value(&self) -> bool {
        !self.is_null_check()
    }

    /// Returns true if this operator is a null check
    pub fn is_null_check(&self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    /// Apply a comparison operator to the ordering of `left` against `right`
    ///
    /// Null checks never reach this point; they are decided on nullness alone.
    pub fn matches(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
            Operator::IsNull | Operator::IsNotNull => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Eq => write!(f, "="),
            Operator::Ne => write!(f, "!="),
            Operator::Gt => write!(f, ">"),
            Operator::Gte => write!(f, ">="),
            Operator::Lt => write!(f, "<"),
            Operator::Lte => write!(f, "<="),
            Operator::IsNull => write!(f, "IS NULL"),
            Operator::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "=" | "==" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            "IS NULL" | "ISNULL" => Ok(Operator::IsNull),
            "IS NOT NULL" | "ISNOTNULL" => Ok(Operator::IsNotNull),
            _ => Err(Error::parse(format!("unknown operator: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datatype_display() {
        assert_eq!(DataType::Null.to_string(), "NULL");
        assert_eq!(DataType::Integer.to_string(), "INTEGER");
        assert_eq!(DataType::Float.to_string(), "FLOAT");
        assert_eq!(DataType::Text.to_string(), "TEXT");
        assert_eq!(DataType::Boolean.to_string(), "BOOLEAN");
        assert_eq!(DataType::Timestamp.to_string(), "TIMESTAMP");
    }

    #[test]
    fn test_datatype_from_str() {
        assert_eq!("INTEGER".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("bigint".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("numeric".parse::<DataType>().unwrap(), DataType::Float);
        assert_eq!("VARCHAR".parse::<DataType>().unwrap(), DataType::Text);
        assert_eq!("DATE".parse::<DataType>().unwrap(), DataType::Timestamp);
        assert!("JSON".parse::<DataType>().is_err());
    }

    #[test]
    fn test_range_offset_support() {
        assert!(DataType::Integer.supports_range_offset());
        assert!(DataType::Float.supports_range_offset());
        assert!(DataType::Timestamp.supports_range_offset());
        assert!(!DataType::Text.supports_range_offset());
        assert!(!DataType::Boolean.supports_range_offset());
    }

    #[test]
    fn test_datatype_accepts() {
        assert!(DataType::Float.accepts(DataType::Integer));
        assert!(DataType::Integer.accepts(DataType::Float));
        assert!(DataType::Text.accepts(DataType::Null));
        assert!(!DataType::Text.accepts(DataType::Integer));
    }

    #[test]
    fn test_operator_matches() {
        assert!(Operator::Lte.matches(Ordering::Less));
        assert!(Operator::Lte.matches(Ordering::Equal));
        assert!(!Operator::Lte.matches(Ordering::Greater));
        assert!(Operator::Ne.matches(Ordering::Greater));
        assert!(!Operator::IsNull.matches(Ordering::Equal));
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!("<>".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!("is not null".parse::<Operator>().unwrap(), Operator::IsNotNull);
        assert!("LIKE".parse::<Operator>().is_err());
    }
}
