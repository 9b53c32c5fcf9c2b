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

//! Derived-column expressions and post-filter predicates
//!
//! Expressions are evaluated once per output row, after every window
//! function has produced its values. They reference columns by name:
//! input columns, window outputs and earlier derived columns.

use std::fmt;

use crate::core::{DataType, Error, Operator, Result, Schema, Value};
use crate::functions::scalar::{arithmetic, ArithmeticOp, CoalesceFunction, RoundFunction};
use crate::functions::ScalarFunction;

/// Expression over one output row
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(String),
    Literal(Value),
    Binary {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// ROUND(expr, digits)
    Round(Box<Expr>, i32),
    /// COALESCE(a, b)
    Coalesce(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn binary(op: ArithmeticOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn add(self, other: Expr) -> Self {
        Self::binary(ArithmeticOp::Add, self, other)
    }

    pub fn sub(self, other: Expr) -> Self {
        Self::binary(ArithmeticOp::Sub, self, other)
    }

    pub fn mul(self, other: Expr) -> Self {
        Self::binary(ArithmeticOp::Mul, self, other)
    }

    pub fn div(self, other: Expr) -> Self {
        Self::binary(ArithmeticOp::Div, self, other)
    }

    pub fn round(self, digits: i32) -> Self {
        Expr::Round(Box::new(self), digits)
    }

    pub fn coalesce(self, fallback: Expr) -> Self {
        Expr::Coalesce(Box::new(self), Box::new(fallback))
    }

    /// `ROUND((current - previous) / previous * 100, 2)`
    ///
    /// NULL when `previous` is NULL or zero.
    pub fn growth_percent(current: impl Into<String>, previous: impl Into<String>) -> Self {
        let previous = previous.into();
        Expr::column(current)
            .sub(Expr::column(previous.clone()))
            .div(Expr::column(previous))
            .mul(Expr::literal(100i64))
            .round(2)
    }

    /// Resolve column names against the row layout the expression will see
    pub fn bind(&self, schema: &Schema) -> Result<BoundExpr> {
        match self {
            Expr::Column(name) => {
                let (idx, col) = schema.resolve(name)?;
                Ok(BoundExpr::Column {
                    index: idx,
                    data_type: col.data_type,
                })
            }
            Expr::Literal(value) => Ok(BoundExpr::Literal(value.clone())),
            Expr::Binary { op, left, right } => {
                let left = left.bind(schema)?;
                let right = right.bind(schema)?;
                for side in [&left, &right] {
                    let dt = side.data_type();
                    if dt != DataType::Null && !dt.is_numeric() {
                        return Err(Error::invalid_argument(format!(
                            "operator {} requires numeric operands, got {}",
                            op, dt
                        )));
                    }
                }
                Ok(BoundExpr::Binary {
                    op: *op,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            Expr::Round(inner, digits) => {
                let inner = inner.bind(schema)?;
                let dt = inner.data_type();
                if dt != DataType::Null && !dt.is_numeric() {
                    return Err(Error::invalid_argument(format!(
                        "ROUND requires a numeric argument, got {}",
                        dt
                    )));
                }
                Ok(BoundExpr::Round(Box::new(inner), *digits))
            }
            Expr::Coalesce(a, b) => {
                let a = a.bind(schema)?;
                let b = b.bind(schema)?;
                let (ta, tb) = (a.data_type(), b.data_type());
                if !ta.accepts(tb) {
                    return Err(Error::invalid_argument(format!(
                        "COALESCE arguments have incompatible types {} and {}",
                        ta, tb
                    )));
                }
                Ok(BoundExpr::Coalesce(Box::new(a), Box::new(b)))
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "{}", name),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Round(inner, digits) => write!(f, "ROUND({}, {})", inner, digits),
            Expr::Coalesce(a, b) => write!(f, "COALESCE({}, {})", a, b),
        }
    }
}

/// Expression with column references resolved to row positions
#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpr {
    Column { index: usize, data_type: DataType },
    Literal(Value),
    Binary {
        op: ArithmeticOp,
        left: Box<BoundExpr>,
        right: Box<BoundExpr>,
    },
    Round(Box<BoundExpr>, i32),
    Coalesce(Box<BoundExpr>, Box<BoundExpr>),
}

impl BoundExpr {
    /// Static result type
    pub fn data_type(&self) -> DataType {
        match self {
            BoundExpr::Column { data_type, .. } => *data_type,
            BoundExpr::Literal(value) => value.data_type(),
            BoundExpr::Binary { op, left, right } => {
                let both_integer = left.data_type() == DataType::Integer
                    && right.data_type() == DataType::Integer;
                if *op != ArithmeticOp::Div && both_integer {
                    DataType::Integer
                } else {
                    DataType::Float
                }
            }
            BoundExpr::Round(..) => DataType::Float,
            BoundExpr::Coalesce(a, b) => match (a.data_type(), b.data_type()) {
                (DataType::Null, dt) | (dt, DataType::Null) => dt,
                (ta, tb) if ta != tb && ta.is_numeric() && tb.is_numeric() => DataType::Float,
                (dt, _) => dt,
            },
        }
    }

    /// Evaluate against one row laid out like the schema used for binding
    pub fn eval(&self, row: &[Value]) -> Result<Value> {
        match self {
            BoundExpr::Column { index, .. } => row
                .get(*index)
                .cloned()
                .ok_or_else(|| Error::internal(format!("column index {} out of range", index))),
            BoundExpr::Literal(value) => Ok(value.clone()),
            BoundExpr::Binary { op, left, right } => {
                Ok(arithmetic(*op, &left.eval(row)?, &right.eval(row)?))
            }
            BoundExpr::Round(inner, digits) => {
                RoundFunction.evaluate(&[inner.eval(row)?, Value::Integer(*digits as i64)])
            }
            BoundExpr::Coalesce(a, b) => CoalesceFunction.evaluate(&[a.eval(row)?, b.eval(row)?]),
        }
    }
}

/// Post-filter predicate over output columns
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: String,
        op: Operator,
        value: Value,
    },
    And(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    /// `column op value`
    pub fn compare(column: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::compare(column, Operator::IsNull, Value::null_unknown())
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::compare(column, Operator::IsNotNull, Value::null_unknown())
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    /// Resolve column names and check literal types
    pub fn bind(&self, schema: &Schema) -> Result<BoundPredicate> {
        match self {
            Predicate::Compare { column, op, value } => {
                let (index, col) = schema.resolve(column)?;
                if op.needs_value() {
                    if value.is_null() {
                        return Err(Error::invalid_argument(format!(
                            "comparison {} {} NULL is never true, use IS NULL",
                            column, op
                        )));
                    }
                    if !col.data_type.accepts(value.data_type()) {
                        return Err(Error::invalid_argument(format!(
                            "cannot compare column '{}' of type {} with {}",
                            column,
                            col.data_type,
                            value.data_type()
                        )));
                    }
                }
                Ok(BoundPredicate::Compare {
                    index,
                    op: *op,
                    value: value.clone(),
                })
            }
            Predicate::And(a, b) => Ok(BoundPredicate::And(
                Box::new(a.bind(schema)?),
                Box::new(b.bind(schema)?),
            )),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { column, op, value } => {
                if op.is_null_check() {
                    write!(f, "{} {}", column, op)
                } else {
                    write!(f, "{} {} {}", column, op, value)
                }
            }
            Predicate::And(a, b) => write!(f, "{} AND {}", a, b),
        }
    }
}

/// Predicate with column references resolved to row positions
#[derive(Debug, Clone, PartialEq)]
pub enum BoundPredicate {
    Compare {
        index: usize,
        op: Operator,
        value: Value,
    },
    And(Box<BoundPredicate>, Box<BoundPredicate>),
}

impl BoundPredicate {
    /// SQL truth of the predicate; NULL comparisons are not true
    pub fn matches(&self, row: &[Value]) -> bool {
        match self {
            BoundPredicate::Compare { index, op, value } => {
                let Some(cell) = row.get(*index) else {
                    return false;
                };
                match op {
                    Operator::IsNull => cell.is_null(),
                    Operator::IsNotNull => !cell.is_null(),
                    _ => cell
                        .compare(value)
                        .map(|ordering| op.matches(ordering))
                        .unwrap_or(false),
                }
            }
            BoundPredicate::And(a, b) => a.matches(row) && b.matches(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SchemaBuilder;

    fn monthly_schema() -> Schema {
        SchemaBuilder::new()
            .add("month", DataType::Timestamp)
            .add("total", DataType::Integer)
            .add_nullable("prev_total", DataType::Integer)
            .add("label", DataType::Text)
            .build()
    }

    fn row(total: i64, prev: Option<i64>) -> Vec<Value> {
        vec![
            Value::date(2024, 2, 1).unwrap(),
            Value::Integer(total),
            Value::from(prev),
            Value::text("feb"),
        ]
    }

    #[test]
    fn test_growth_percent() {
        let expr = Expr::growth_percent("total", "prev_total")
            .bind(&monthly_schema())
            .unwrap();
        assert_eq!(expr.data_type(), DataType::Float);
        assert_eq!(
            expr.eval(&row(37000, Some(70000))).unwrap(),
            Value::Float(-47.14)
        );
        assert_eq!(
            expr.eval(&row(18000, Some(37000))).unwrap(),
            Value::Float(-51.35)
        );
        assert!(expr.eval(&row(18000, None)).unwrap().is_null());
        assert!(expr.eval(&row(18000, Some(0))).unwrap().is_null());
    }

    #[test]
    fn test_bind_errors() {
        let schema = monthly_schema();
        assert_eq!(
            Expr::column("missing").bind(&schema).unwrap_err(),
            Error::ColumnNotFound("missing".to_string())
        );
        assert!(Expr::column("label")
            .add(Expr::literal(1i64))
            .bind(&schema)
            .is_err());
        assert!(Expr::column("label").round(1).bind(&schema).is_err());
    }

    #[test]
    fn test_types_and_coalesce() {
        let schema = monthly_schema();
        let sum = Expr::column("total").add(Expr::column("prev_total"));
        assert_eq!(sum.bind(&schema).unwrap().data_type(), DataType::Integer);

        let filled = Expr::column("prev_total")
            .coalesce(Expr::literal(0i64))
            .bind(&schema)
            .unwrap();
        assert_eq!(filled.eval(&row(1, None)).unwrap(), Value::Integer(0));
        assert_eq!(filled.eval(&row(1, Some(5))).unwrap(), Value::Integer(5));

        // Mixed numeric fallbacks widen the declared type
        let mixed = Expr::column("prev_total")
            .coalesce(Expr::literal(0.5f64))
            .bind(&schema)
            .unwrap();
        assert_eq!(mixed.data_type(), DataType::Float);
        assert_eq!(mixed.eval(&row(1, None)).unwrap(), Value::Float(0.5));

        let untyped = Expr::literal(Value::null_unknown())
            .coalesce(Expr::column("total"))
            .bind(&schema)
            .unwrap();
        assert_eq!(untyped.data_type(), DataType::Integer);

        assert!(matches!(
            Expr::column("total")
                .coalesce(Expr::column("label"))
                .bind(&schema),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_predicates() {
        let schema = monthly_schema();
        let pred = Predicate::compare("total", Operator::Lte, 40000i64)
            .and(Predicate::is_not_null("prev_total"))
            .bind(&schema)
            .unwrap();
        assert!(pred.matches(&row(37000, Some(70000))));
        assert!(!pred.matches(&row(37000, None)));
        assert!(!pred.matches(&row(70000, Some(1))));

        let pred = Predicate::compare("prev_total", Operator::Gt, 10i64)
            .bind(&schema)
            .unwrap();
        assert!(!pred.matches(&row(1, None)));

        let pred = Predicate::is_null("prev_total").bind(&schema).unwrap();
        assert!(pred.matches(&row(1, None)));
    }

    #[test]
    fn test_predicate_bind_errors() {
        let schema = monthly_schema();
        assert!(Predicate::compare("label", Operator::Eq, 1i64)
            .bind(&schema)
            .is_err());
        assert!(Predicate::compare("total", Operator::Eq, Value::null_unknown())
            .bind(&schema)
            .is_err());
        assert!(matches!(
            Predicate::is_null("nope").bind(&schema),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Expr::growth_percent("total", "prev").to_string(),
            "ROUND((((total - prev) / prev) * 100), 2)"
        );
        assert_eq!(
            Predicate::compare("rank", Operator::Lte, 5i64)
                .and(Predicate::is_null("x"))
                .to_string(),
            "rank <= 5 AND x IS NULL"
        );
    }
}
