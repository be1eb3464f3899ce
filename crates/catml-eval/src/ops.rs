//! Operator implementations.
//!
//! Binary operators dispatch on the pair of operand kinds: same-kind pairs
//! apply directly, mixed pairs convert the lower-rank operand up to the
//! promoted kind first. Unsupported pairings yield `None`; the only fatal
//! outcome is division/remainder by integral zero.

use catml_ast::{BinaryOp, UnaryOp};
use thiserror::Error;

use crate::numeric::{convert_operand, promote, PromotedKind};
use crate::value::Value;

/// Fatal evaluation error.
///
/// Modeled as the third outcome next to "value" and "no value" so callers
/// cannot accidentally let it escape uncaught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Division or remainder by integral zero.
    #[error("division by zero in constant expression")]
    DivisionByZero,
}

/// Applies a unary operator, yielding `None` when the operator is not
/// defined for the operand's kind.
#[must_use]
pub fn apply_unary(op: UnaryOp, value: &Value) -> Option<Value> {
    match op {
        UnaryOp::Plus => match value {
            Value::Float32(_) | Value::Float64(_) => Some(value.clone()),
            _ => value.raw_i64().map(|_| value.clone()),
        },
        UnaryOp::Minus => match value {
            Value::Float32(v) => Some(Value::Float32(-v)),
            Value::Float64(v) => Some(Value::Float64(-v)),
            _ => {
                let raw = value.raw_i64()?;
                Value::integral(value.kind(), raw.wrapping_neg())
            }
        },
        UnaryOp::Complement => {
            let raw = value.raw_i64()?;
            Value::integral(value.kind(), !raw)
        }
        // No implicit bool conversion: the operand must already be boolean.
        UnaryOp::Not => match value {
            Value::Bool(v) => Some(Value::Bool(!v)),
            _ => None,
        },
    }
}

/// Applies a binary operator, yielding `Ok(None)` when the operator is not
/// defined for the operand kind pair.
///
/// # Errors
///
/// Returns [`EvalError::DivisionByZero`] for `/` or `%` with an integral
/// zero divisor. Float division by zero yields IEEE infinities instead.
pub fn apply_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Option<Value>, EvalError> {
    match op {
        BinaryOp::LogicalAnd | BinaryOp::LogicalOr => Ok(logical(op, left, right)),
        BinaryOp::Eq | BinaryOp::Ne => equality(op, left, right),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            if let Some(result) = textual_cmp(op, left, right) {
                return Ok(Some(result));
            }
            numeric_cmp(op, left, right)
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            numeric_arith(op, left, right)
        }
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => Ok(bitwise(op, left, right)),
        BinaryOp::Shl | BinaryOp::Shr => Ok(shift(op, left, right)),
    }
}

fn logical(op: BinaryOp, left: &Value, right: &Value) -> Option<Value> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => {
            let result = match op {
                BinaryOp::LogicalAnd => *a && *b,
                BinaryOp::LogicalOr => *a || *b,
                _ => return None,
            };
            Some(Value::Bool(result))
        }
        _ => None,
    }
}

fn equality(op: BinaryOp, left: &Value, right: &Value) -> Result<Option<Value>, EvalError> {
    let is_eq = matches!(op, BinaryOp::Eq);
    let matches = match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => *a == *b,
        (Value::String8(a), Value::String8(b)) | (Value::Char8(a), Value::Char8(b)) => a == b,
        (Value::Enum(a), Value::Enum(b)) => a == b,
        _ => {
            let Some(target) = promote(left.kind(), right.kind()) else {
                return Ok(None);
            };
            let (Some(a), Some(b)) = (convert_operand(left, target), convert_operand(right, target))
            else {
                return Ok(None);
            };
            if target.is_float() {
                match (a.as_f64(), b.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => return Ok(None),
                }
            } else {
                a == b
            }
        }
    };
    Ok(Some(Value::Bool(if is_eq { matches } else { !matches })))
}

fn textual_cmp(op: BinaryOp, left: &Value, right: &Value) -> Option<Value> {
    let ordering = match (left, right) {
        (Value::String8(a), Value::String8(b)) | (Value::Char8(a), Value::Char8(b)) => a.cmp(b),
        _ => return None,
    };
    let result = match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::Ge => ordering.is_ge(),
        _ => return None,
    };
    Some(Value::Bool(result))
}

fn numeric_cmp(op: BinaryOp, left: &Value, right: &Value) -> Result<Option<Value>, EvalError> {
    let Some(target) = promote(left.kind(), right.kind()) else {
        return Ok(None);
    };
    let (Some(a), Some(b)) = (convert_operand(left, target), convert_operand(right, target)) else {
        return Ok(None);
    };
    let result = if target.is_float() {
        let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) else {
            return Ok(None);
        };
        match op {
            BinaryOp::Lt => a < b,
            BinaryOp::Le => a <= b,
            BinaryOp::Gt => a > b,
            BinaryOp::Ge => a >= b,
            _ => return Ok(None),
        }
    } else {
        let (Some(a), Some(b)) = (a.exact_i128(), b.exact_i128()) else {
            return Ok(None);
        };
        match op {
            BinaryOp::Lt => a < b,
            BinaryOp::Le => a <= b,
            BinaryOp::Gt => a > b,
            BinaryOp::Ge => a >= b,
            _ => return Ok(None),
        }
    };
    Ok(Some(Value::Bool(result)))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn numeric_arith(op: BinaryOp, left: &Value, right: &Value) -> Result<Option<Value>, EvalError> {
    let Some(target) = promote(left.kind(), right.kind()) else {
        return Ok(None);
    };
    let (Some(a), Some(b)) = (convert_operand(left, target), convert_operand(right, target)) else {
        return Ok(None);
    };

    if target.is_float() {
        if matches!(op, BinaryOp::Rem) {
            return Ok(None);
        }
        let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) else {
            return Ok(None);
        };
        let result = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            _ => return Ok(None),
        };
        return Ok(Value::float(target.primitive(), result));
    }

    let (Some(a), Some(b)) = (a.exact_i128(), b.exact_i128()) else {
        return Ok(None);
    };
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    let result = if target.is_unsigned() {
        // Converted operands are non-negative; wrap modulo 2^64.
        let a = a as u128;
        let b = b as u128;
        let value = match op {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div => a / b,
            BinaryOp::Rem => a % b,
            _ => return Ok(None),
        };
        value as i64
    } else {
        let value = match op {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div => a / b,
            BinaryOp::Rem => a % b,
            _ => return Ok(None),
        };
        value as i64
    };
    Ok(Value::integral(target.primitive(), result))
}

fn bitwise(op: BinaryOp, left: &Value, right: &Value) -> Option<Value> {
    let target = promote(left.kind(), right.kind())?;
    if target.is_float() {
        return None;
    }
    let a = convert_operand(left, target)?.raw_i64()?;
    let b = convert_operand(right, target)?.raw_i64()?;
    let result = match op {
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        _ => return None,
    };
    Value::integral(target.primitive(), result)
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn shift(op: BinaryOp, left: &Value, right: &Value) -> Option<Value> {
    let target = promote(left.kind(), right.kind())?;
    if target.is_float() {
        return None;
    }
    let a = convert_operand(left, target)?.raw_i64()?;
    let b = convert_operand(right, target)?.raw_i64()?;
    // Shift amounts wrap modulo the promoted width.
    let amount = (b as u32) % target.bit_width();
    let result = match (op, target.is_unsigned()) {
        (BinaryOp::Shl, _) => a << amount,
        (BinaryOp::Shr, false) => a >> amount,
        (BinaryOp::Shr, true) => ((a as u64) >> amount) as i64,
        _ => return None,
    };
    Value::integral(target.primitive(), result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_requires_bool() {
        assert_eq!(apply_unary(UnaryOp::Not, &Value::Int32(0)), None);
        assert_eq!(
            apply_unary(UnaryOp::Not, &Value::Bool(true)),
            Some(Value::Bool(false))
        );
    }

    #[test]
    fn test_negate_retruncates() {
        assert_eq!(
            apply_unary(UnaryOp::Minus, &Value::Int8(i8::MIN)),
            Some(Value::Int8(i8::MIN))
        );
    }

    #[test]
    fn test_division_by_zero_is_fatal() {
        let result = apply_binary(BinaryOp::Div, &Value::Int32(5), &Value::Int32(0));
        assert_eq!(result, Err(EvalError::DivisionByZero));
        let result = apply_binary(BinaryOp::Rem, &Value::Int64(5), &Value::Int8(0));
        assert_eq!(result, Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_float_division_by_zero_is_infinite() {
        let result = apply_binary(BinaryOp::Div, &Value::Float64(1.0), &Value::Float64(0.0));
        assert_eq!(result, Ok(Some(Value::Float64(f64::INFINITY))));
    }

    #[test]
    fn test_mixed_promotion_result_kind() {
        // Int8 + Int8 -> Int32
        let result = apply_binary(BinaryOp::Add, &Value::Int8(100), &Value::Int8(100));
        assert_eq!(result, Ok(Some(Value::Int32(200))));
        // Int32 + UInt32 -> UInt32 with modulo conversion
        let result = apply_binary(BinaryOp::Add, &Value::Int32(-1), &Value::UInt32(1));
        assert_eq!(result, Ok(Some(Value::UInt32(0))));
        // Duration + Int32 -> Int64
        let result = apply_binary(BinaryOp::Add, &Value::Duration(10), &Value::Int32(5));
        assert_eq!(result, Ok(Some(Value::Int64(15))));
    }

    #[test]
    fn test_unsupported_pairs_have_no_value() {
        let result = apply_binary(
            BinaryOp::Add,
            &Value::Bool(true),
            &Value::String8("x".into()),
        );
        assert_eq!(result, Ok(None));
        let result = apply_binary(BinaryOp::Rem, &Value::Float64(1.0), &Value::Float64(2.0));
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_string_ordering() {
        let a = Value::String8("abc".into());
        let b = Value::String8("abd".into());
        assert_eq!(apply_binary(BinaryOp::Lt, &a, &b), Ok(Some(Value::Bool(true))));
    }
}
