//! Literal token parsers.
//!
//! Raw literal tokens arrive with their digit-group separators and kind
//! suffixes intact; suffix rules select the implied kind and overflow is
//! detected by comparing the truncated representation against the literal's
//! exact value.

use catml_ast::PrimitiveKind;
use smol_str::SmolStr;
use thiserror::Error;

use crate::value::Value;

/// Errors for integer and float literal parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    /// The literal text encodes a value the implied kind cannot hold.
    #[error("integer literal `{text}` out of range for {kind}")]
    Overflow {
        /// The offending literal text.
        text: SmolStr,
        /// The suffix-implied kind.
        kind: PrimitiveKind,
    },
    /// The literal text is not a valid numeric token.
    #[error("malformed numeric literal `{0}`")]
    Malformed(SmolStr),
}

/// Parses an integer literal token.
///
/// The base kind is `Int32`; a `u`/`U` suffix promotes to unsigned at the
/// same width, `l`/`L` promotes to 64 bits preserving signedness, and the
/// two may combine in either order to reach `UInt64`. Decimal, `0x` hex,
/// `0b` binary and leading-zero octal radixes are accepted; `_` and `'`
/// digit-group separators are stripped.
///
/// # Errors
///
/// [`LiteralError::Overflow`] when the literal's exact value does not
/// survive truncation to the implied kind; [`LiteralError::Malformed`] for
/// unparsable tokens.
pub fn parse_integer(text: &str) -> Result<Value, LiteralError> {
    let cleaned: String = text.chars().filter(|c| *c != '_' && *c != '\'').collect();

    let mut digits = cleaned.as_str();
    let mut unsigned = false;
    let mut long = false;
    for _ in 0..2 {
        if let Some(rest) = digits.strip_suffix(['u', 'U']) {
            if unsigned {
                return Err(LiteralError::Malformed(SmolStr::new(text)));
            }
            unsigned = true;
            digits = rest;
        } else if let Some(rest) = digits.strip_suffix(['l', 'L']) {
            if long {
                return Err(LiteralError::Malformed(SmolStr::new(text)));
            }
            long = true;
            digits = rest;
        }
    }

    let kind = match (unsigned, long) {
        (false, false) => PrimitiveKind::Int32,
        (true, false) => PrimitiveKind::UInt32,
        (false, true) => PrimitiveKind::Int64,
        (true, true) => PrimitiveKind::UInt64,
    };

    let (radix, digits) = if let Some(rest) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, rest)
    } else if let Some(rest) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        (2, rest)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    if digits.is_empty() {
        return Err(LiteralError::Malformed(SmolStr::new(text)));
    }

    let magnitude = match u64::from_str_radix(digits, radix) {
        Ok(value) => value,
        Err(err) => match err.kind() {
            std::num::IntErrorKind::PosOverflow => {
                return Err(LiteralError::Overflow {
                    text: SmolStr::new(text),
                    kind,
                });
            }
            _ => return Err(LiteralError::Malformed(SmolStr::new(text))),
        },
    };

    #[allow(clippy::cast_possible_wrap)]
    let value = Value::integral(kind, magnitude as i64)
        .ok_or_else(|| LiteralError::Malformed(SmolStr::new(text)))?;
    // Overflow iff the exact value does not equal the truncated one.
    if value.exact_i128() != Some(i128::from(magnitude)) {
        return Err(LiteralError::Overflow {
            text: SmolStr::new(text),
            kind,
        });
    }
    Ok(value)
}

/// Parses a floating-point literal token.
///
/// A trailing `f`/`F` selects 32 bits with immediate rounding, otherwise
/// the value is 64-bit. Digit-group separators are stripped.
///
/// # Errors
///
/// [`LiteralError::Malformed`] for unparsable tokens.
pub fn parse_float(text: &str) -> Result<Value, LiteralError> {
    let cleaned: String = text.chars().filter(|c| *c != '_' && *c != '\'').collect();

    let (digits, kind) = match cleaned.strip_suffix(['f', 'F']) {
        Some(rest) => (rest, PrimitiveKind::Float32),
        None => (cleaned.as_str(), PrimitiveKind::Float64),
    };

    let value: f64 = digits
        .parse()
        .map_err(|_| LiteralError::Malformed(SmolStr::new(text)))?;
    Value::float(kind, value).ok_or_else(|| LiteralError::Malformed(SmolStr::new(text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_kinds() {
        assert_eq!(parse_integer("42"), Ok(Value::Int32(42)));
        assert_eq!(parse_integer("42u"), Ok(Value::UInt32(42)));
        assert_eq!(parse_integer("42L"), Ok(Value::Int64(42)));
        assert_eq!(parse_integer("42uL"), Ok(Value::UInt64(42)));
        assert_eq!(parse_integer("42Lu"), Ok(Value::UInt64(42)));
    }

    #[test]
    fn test_overflow_detection() {
        assert_eq!(
            parse_integer("4294967296"),
            Err(LiteralError::Overflow {
                text: "4294967296".into(),
                kind: PrimitiveKind::Int32,
            })
        );
        assert_eq!(parse_integer("4294967295u"), Ok(Value::UInt32(4_294_967_295)));
        assert_eq!(parse_integer("2147483648"), Err(LiteralError::Overflow {
            text: "2147483648".into(),
            kind: PrimitiveKind::Int32,
        }));
        assert_eq!(parse_integer("2147483647"), Ok(Value::Int32(i32::MAX)));
    }

    #[test]
    fn test_radixes_and_separators() {
        assert_eq!(parse_integer("0xFF"), Ok(Value::Int32(255)));
        assert_eq!(parse_integer("0b1010"), Ok(Value::Int32(10)));
        assert_eq!(parse_integer("017"), Ok(Value::Int32(15)));
        assert_eq!(parse_integer("1_000_000"), Ok(Value::Int32(1_000_000)));
        assert_eq!(parse_integer("1'000"), Ok(Value::Int32(1000)));
        assert_eq!(parse_integer("0"), Ok(Value::Int32(0)));
    }

    #[test]
    fn test_malformed_integers() {
        assert!(matches!(parse_integer("0x"), Err(LiteralError::Malformed(_))));
        assert!(matches!(parse_integer("12ab"), Err(LiteralError::Malformed(_))));
        assert!(matches!(parse_integer("42uu"), Err(LiteralError::Malformed(_))));
    }

    #[test]
    fn test_float_suffix_rounds() {
        assert_eq!(parse_float("0.1f"), Ok(Value::Float32(0.1f32)));
        assert_eq!(parse_float("0.1"), Ok(Value::Float64(0.1)));
        assert_eq!(parse_float("1e3"), Ok(Value::Float64(1000.0)));
        assert!(matches!(parse_float("abc"), Err(LiteralError::Malformed(_))));
    }
}
