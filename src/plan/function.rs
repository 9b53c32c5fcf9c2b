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

//! Window function calls

use std::fmt;

use crate::core::{DataType, Value};

use super::window::WindowSpec;

/// Function family, as reported by [`WindowFunctionKind::family`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionFamily {
    /// ROW_NUMBER, RANK, DENSE_RANK
    Ranking,
    /// PERCENT_RANK, CUME_DIST, NTILE
    Distribution,
    /// LAG, LEAD, FIRST_VALUE, LAST_VALUE, NTH_VALUE
    Navigation,
    /// SUM, AVG, MIN, MAX, COUNT over a frame
    Aggregate,
}

/// The function part of `f(...) OVER (...)`
#[derive(Debug, Clone, PartialEq)]
pub enum WindowFunctionKind {
    RowNumber,
    Rank,
    DenseRank,
    PercentRank,
    CumeDist,
    /// NTILE(buckets)
    Ntile(i64),
    Lag {
        column: String,
        offset: i64,
        default: Value,
    },
    Lead {
        column: String,
        offset: i64,
        default: Value,
    },
    FirstValue(String),
    LastValue(String),
    /// NTH_VALUE(column, n), n is 1-based
    NthValue(String, i64),
    Sum(String),
    Avg(String),
    Min(String),
    Max(String),
    /// COUNT(column), or COUNT(*) when `None`
    Count(Option<String>),
}

impl WindowFunctionKind {
    /// LAG(column, 1, NULL)
    pub fn lag(column: impl Into<String>) -> Self {
        Self::lag_by(column, 1, Value::null_unknown())
    }

    /// LAG(column, offset, default)
    pub fn lag_by(column: impl Into<String>, offset: i64, default: Value) -> Self {
        WindowFunctionKind::Lag {
            column: column.into(),
            offset,
            default,
        }
    }

    /// LEAD(column, 1, NULL)
    pub fn lead(column: impl Into<String>) -> Self {
        Self::lead_by(column, 1, Value::null_unknown())
    }

    /// LEAD(column, offset, default)
    pub fn lead_by(column: impl Into<String>, offset: i64, default: Value) -> Self {
        WindowFunctionKind::Lead {
            column: column.into(),
            offset,
            default,
        }
    }

    /// SQL name of the function
    pub fn name(&self) -> &'static str {
        match self {
            WindowFunctionKind::RowNumber => "ROW_NUMBER",
            WindowFunctionKind::Rank => "RANK",
            WindowFunctionKind::DenseRank => "DENSE_RANK",
            WindowFunctionKind::PercentRank => "PERCENT_RANK",
            WindowFunctionKind::CumeDist => "CUME_DIST",
            WindowFunctionKind::Ntile(_) => "NTILE",
            WindowFunctionKind::Lag { .. } => "LAG",
            WindowFunctionKind::Lead { .. } => "LEAD",
            WindowFunctionKind::FirstValue(_) => "FIRST_VALUE",
            WindowFunctionKind::LastValue(_) => "LAST_VALUE",
            WindowFunctionKind::NthValue(..) => "NTH_VALUE",
            WindowFunctionKind::Sum(_) => "SUM",
            WindowFunctionKind::Avg(_) => "AVG",
            WindowFunctionKind::Min(_) => "MIN",
            WindowFunctionKind::Max(_) => "MAX",
            WindowFunctionKind::Count(_) => "COUNT",
        }
    }

    pub fn family(&self) -> FunctionFamily {
        match self {
            WindowFunctionKind::RowNumber
            | WindowFunctionKind::Rank
            | WindowFunctionKind::DenseRank => FunctionFamily::Ranking,
            WindowFunctionKind::PercentRank
            | WindowFunctionKind::CumeDist
            | WindowFunctionKind::Ntile(_) => FunctionFamily::Distribution,
            WindowFunctionKind::Lag { .. }
            | WindowFunctionKind::Lead { .. }
            | WindowFunctionKind::FirstValue(_)
            | WindowFunctionKind::LastValue(_)
            | WindowFunctionKind::NthValue(..) => FunctionFamily::Navigation,
            WindowFunctionKind::Sum(_)
            | WindowFunctionKind::Avg(_)
            | WindowFunctionKind::Min(_)
            | WindowFunctionKind::Max(_)
            | WindowFunctionKind::Count(_) => FunctionFamily::Aggregate,
        }
    }

    /// Column the function reads, if any
    pub fn argument(&self) -> Option<&str> {
        match self {
            WindowFunctionKind::Lag { column, .. }
            | WindowFunctionKind::Lead { column, .. }
            | WindowFunctionKind::FirstValue(column)
            | WindowFunctionKind::LastValue(column)
            | WindowFunctionKind::NthValue(column, _)
            | WindowFunctionKind::Sum(column)
            | WindowFunctionKind::Avg(column)
            | WindowFunctionKind::Min(column)
            | WindowFunctionKind::Max(column) => Some(column),
            WindowFunctionKind::Count(column) => column.as_deref(),
            _ => None,
        }
    }

    /// True when the result depends on the frame of each row
    pub fn uses_frame(&self) -> bool {
        matches!(
            self,
            WindowFunctionKind::FirstValue(_)
                | WindowFunctionKind::LastValue(_)
                | WindowFunctionKind::NthValue(..)
        ) || self.family() == FunctionFamily::Aggregate
    }

    /// Output type given the type of the argument column
    ///
    /// SUM over an Integer column is declared Integer even though a sum that
    /// overflows `i64` comes back as a Float. Both belong to the numeric
    /// family that [`DataType::accepts`] treats as interchangeable.
    pub fn result_type(&self, argument: Option<DataType>) -> DataType {
        match self {
            WindowFunctionKind::RowNumber
            | WindowFunctionKind::Rank
            | WindowFunctionKind::DenseRank
            | WindowFunctionKind::Ntile(_)
            | WindowFunctionKind::Count(_) => DataType::Integer,
            WindowFunctionKind::PercentRank
            | WindowFunctionKind::CumeDist
            | WindowFunctionKind::Avg(_) => DataType::Float,
            _ => argument.unwrap_or(DataType::Null),
        }
    }
}

impl fmt::Display for WindowFunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowFunctionKind::Ntile(n) => write!(f, "NTILE({})", n),
            WindowFunctionKind::Lag {
                column,
                offset,
                default,
            }
            | WindowFunctionKind::Lead {
                column,
                offset,
                default,
            } => {
                if default.is_null() {
                    write!(f, "{}({}, {})", self.name(), column, offset)
                } else {
                    write!(f, "{}({}, {}, {})", self.name(), column, offset, default)
                }
            }
            WindowFunctionKind::NthValue(column, n) => write!(f, "NTH_VALUE({}, {})", column, n),
            WindowFunctionKind::Count(None) => write!(f, "COUNT(*)"),
            other => match other.argument() {
                Some(column) => write!(f, "{}({})", other.name(), column),
                None => write!(f, "{}()", other.name()),
            },
        }
    }
}

/// A window function call with its output column name
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCall {
    pub kind: WindowFunctionKind,
    pub spec: WindowSpec,
    pub alias: String,
}

impl WindowCall {
    pub fn new(kind: WindowFunctionKind, spec: WindowSpec, alias: impl Into<String>) -> Self {
        Self {
            kind,
            spec,
            alias: alias.into(),
        }
    }
}

impl fmt::Display for WindowCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} OVER {} AS {}", self.kind, self.spec, self.alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::window::SortKey;

    #[test]
    fn test_families() {
        assert_eq!(WindowFunctionKind::Rank.family(), FunctionFamily::Ranking);
        assert_eq!(
            WindowFunctionKind::Ntile(4).family(),
            FunctionFamily::Distribution
        );
        assert_eq!(
            WindowFunctionKind::lag("total").family(),
            FunctionFamily::Navigation
        );
        assert_eq!(
            WindowFunctionKind::Count(None).family(),
            FunctionFamily::Aggregate
        );
    }

    #[test]
    fn test_argument_and_frame_use() {
        assert_eq!(WindowFunctionKind::RowNumber.argument(), None);
        assert_eq!(WindowFunctionKind::Count(None).argument(), None);
        assert_eq!(
            WindowFunctionKind::lead("amount").argument(),
            Some("amount")
        );
        assert!(WindowFunctionKind::Sum("a".into()).uses_frame());
        assert!(WindowFunctionKind::LastValue("a".into()).uses_frame());
        assert!(!WindowFunctionKind::lag("a").uses_frame());
        assert!(!WindowFunctionKind::Rank.uses_frame());
    }

    #[test]
    fn test_result_types() {
        use WindowFunctionKind as K;
        assert_eq!(K::Rank.result_type(None), DataType::Integer);
        assert_eq!(K::CumeDist.result_type(None), DataType::Float);
        assert_eq!(
            K::Avg("a".into()).result_type(Some(DataType::Integer)),
            DataType::Float
        );
        assert_eq!(
            K::Sum("a".into()).result_type(Some(DataType::Integer)),
            DataType::Integer
        );
        assert_eq!(
            K::Max("a".into()).result_type(Some(DataType::Text)),
            DataType::Text
        );
    }

    #[test]
    fn test_display() {
        let call = WindowCall::new(
            WindowFunctionKind::lag("total"),
            WindowSpec::new().order_by(SortKey::asc("month")),
            "prev_total",
        );
        assert_eq!(
            call.to_string(),
            "LAG(total, 1) OVER (ORDER BY month) AS prev_total"
        );
        assert_eq!(WindowFunctionKind::Count(None).to_string(), "COUNT(*)");
        assert_eq!(WindowFunctionKind::RowNumber.to_string(), "ROW_NUMBER()");
        assert_eq!(
            WindowFunctionKind::lead_by("x", 2, Value::integer(0)).to_string(),
            "LEAD(x, 2, 0)"
        );
    }
}
