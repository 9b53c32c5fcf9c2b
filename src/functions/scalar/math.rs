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

//! Math scalar functions

use std::fmt;

use crate::core::{Error, Result, Value};
use crate::functions::ScalarFunction;

use super::{value_to_f64, value_to_i64};

// ============================================================================
// Arithmetic
// ============================================================================

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticOp::Add => write!(f, "+"),
            ArithmeticOp::Sub => write!(f, "-"),
            ArithmeticOp::Mul => write!(f, "*"),
            ArithmeticOp::Div => write!(f, "/"),
        }
    }
}

/// Apply an arithmetic operator with NULL-safe semantics
///
/// - any NULL or non-numeric operand gives NULL
/// - two integers stay integer for `+ - *`; overflow gives NULL
/// - division always produces a float; a zero divisor gives NULL
pub fn arithmetic(op: ArithmeticOp, left: &Value, right: &Value) -> Value {
    if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
        let checked = match op {
            ArithmeticOp::Add => Some(a.checked_add(*b)),
            ArithmeticOp::Sub => Some(a.checked_sub(*b)),
            ArithmeticOp::Mul => Some(a.checked_mul(*b)),
            ArithmeticOp::Div => None,
        };
        if let Some(result) = checked {
            return result.map_or_else(Value::null_unknown, Value::Integer);
        }
    }

    let (a, b) = match (value_to_f64(left), value_to_f64(right)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Value::null_unknown(),
    };

    let result = match op {
        ArithmeticOp::Add => a + b,
        ArithmeticOp::Sub => a - b,
        ArithmeticOp::Mul => a * b,
        ArithmeticOp::Div => {
            if b == 0.0 {
                return Value::null_unknown();
            }
            a / b
        }
    };

    if result.is_finite() {
        Value::Float(result)
    } else {
        Value::null_unknown()
    }
}

// ============================================================================
// ROUND
// ============================================================================

/// ROUND function - rounds a number to a specified number of decimal places
#[derive(Default)]
pub struct RoundFunction;

impl ScalarFunction for RoundFunction {
    fn name(&self) -> &str {
        "ROUND"
    }

    fn evaluate(&self, args: &[Value]) -> Result<Value> {
        if args.is_empty() || args.len() > 2 {
            return Err(Error::invalid_argument(format!(
                "ROUND takes 1 or 2 arguments, got {}",
                args.len()
            )));
        }

        if args[0].is_null() {
            return Ok(Value::null_unknown());
        }

        let num = value_to_f64(&args[0])
            .ok_or_else(|| Error::invalid_argument("ROUND first argument must be a number"))?;

        // Default to 0 decimal places if not specified
        let places = if args.len() == 2 && !args[1].is_null() {
            value_to_i64(&args[1])
                .ok_or_else(|| Error::invalid_argument("ROUND decimal places must be an integer"))?
                .clamp(-15, 15) as i32
        } else {
            0
        };

        let shift = 10_f64.powi(places);
        let rounded = (num * shift).round() / shift;

        Ok(Value::Float(rounded))
    }
}

// ============================================================================
// COALESCE
// ============================================================================

/// COALESCE function - returns the first non-NULL argument
#[derive(Default)]
pub struct CoalesceFunction;

impl ScalarFunction for CoalesceFunction {
    fn name(&self) -> &str {
        "COALESCE"
    }

    fn evaluate(&self, args: &[Value]) -> Result<Value> {
        Ok(args
            .iter()
            .find(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(Value::null_unknown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_arithmetic() {
        let a = Value::Integer(70000);
        let b = Value::Integer(37000);
        assert_eq!(arithmetic(ArithmeticOp::Sub, &b, &a), Value::Integer(-33000));
        assert_eq!(arithmetic(ArithmeticOp::Add, &a, &b), Value::Integer(107000));
        assert_eq!(arithmetic(ArithmeticOp::Mul, &a, &Value::Integer(2)), Value::Integer(140000));
        assert_eq!(
            arithmetic(ArithmeticOp::Div, &Value::Integer(7), &Value::Integer(2)),
            Value::Float(3.5)
        );
    }

    #[test]
    fn test_overflow_is_null() {
        let max = Value::Integer(i64::MAX);
        assert!(arithmetic(ArithmeticOp::Add, &max, &Value::Integer(1)).is_null());
        assert!(arithmetic(ArithmeticOp::Mul, &max, &Value::Integer(2)).is_null());
        assert!(arithmetic(ArithmeticOp::Mul, &Value::Float(f64::MAX), &Value::Float(2.0)).is_null());
    }

    #[test]
    fn test_null_and_zero_divisor() {
        let x = Value::Float(1.0);
        assert!(arithmetic(ArithmeticOp::Div, &x, &Value::Integer(0)).is_null());
        assert!(arithmetic(ArithmeticOp::Div, &x, &Value::Float(0.0)).is_null());
        assert!(arithmetic(ArithmeticOp::Div, &x, &Value::null_unknown()).is_null());
        assert!(arithmetic(ArithmeticOp::Add, &Value::null_unknown(), &x).is_null());
        assert!(arithmetic(ArithmeticOp::Add, &Value::text("a"), &x).is_null());
    }

    #[test]
    fn test_mixed_arithmetic() {
        assert_eq!(
            arithmetic(ArithmeticOp::Add, &Value::Integer(1), &Value::Float(0.5)),
            Value::Float(1.5)
        );
    }

    #[test]
    fn test_round() {
        let f = RoundFunction;
        assert_eq!(
            f.evaluate(&[Value::Float(-47.142857), Value::Integer(2)]).unwrap(),
            Value::Float(-47.14)
        );
        assert_eq!(
            f.evaluate(&[Value::Float(-51.351351), Value::Integer(2)]).unwrap(),
            Value::Float(-51.35)
        );
        assert_eq!(f.evaluate(&[Value::Float(2.5)]).unwrap(), Value::Float(3.0));
        assert!(f.evaluate(&[Value::null_unknown()]).unwrap().is_null());
        assert!(f.evaluate(&[Value::text("x")]).is_err());
        assert!(f.evaluate(&[]).is_err());
    }

    #[test]
    fn test_coalesce() {
        let f = CoalesceFunction;
        assert_eq!(
            f.evaluate(&[Value::null_unknown(), Value::Integer(0)]).unwrap(),
            Value::Integer(0)
        );
        assert!(f
            .evaluate(&[Value::null_unknown(), Value::null_unknown()])
            .unwrap()
            .is_null());
    }
}
