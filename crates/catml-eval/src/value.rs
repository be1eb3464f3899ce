//! The typed value model.
//!
//! Values are an immutable closed sum over the primitive kinds. The
//! construction invariants of the model hold by representation: an integral
//! variant stores its kind's native width, so wrap-to-kind truncation happens
//! in [`Value::integral`] and can never be bypassed, and [`Value::float`]
//! rounds to single precision immediately for `Float32`.

use std::sync::Arc;

use catml_ast::{EnumLiteral, EnumType, PrimitiveKind};
use smol_str::SmolStr;

use crate::datetime::{format_date_time, format_duration};

/// An enumeration-literal reference value.
#[derive(Debug, Clone)]
pub struct EnumValue {
    /// The owning enumeration.
    pub enumeration: Arc<EnumType>,
    /// Index into the enumeration's literal list.
    pub literal: usize,
}

impl EnumValue {
    /// Returns the referenced literal declaration, if the index is valid.
    #[must_use]
    pub fn decl(&self) -> Option<&EnumLiteral> {
        self.enumeration.literals.get(self.literal)
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.enumeration, &other.enumeration) && self.literal == other.literal
    }
}

/// A computed constant value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean.
    Bool(bool),

    /// 8-bit signed integer.
    Int8(i8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),

    /// 8-bit unsigned integer.
    UInt8(u8),
    /// 16-bit unsigned integer.
    UInt16(u16),
    /// 32-bit unsigned integer.
    UInt32(u32),
    /// 64-bit unsigned integer.
    UInt64(u64),

    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),

    /// Nanosecond duration.
    Duration(i64),
    /// Nanoseconds since epoch.
    DateTime(i64),

    /// Character sequence of a character value.
    ///
    /// Normally a single character; the conversion engine checks the length
    /// when converting to a `Char8` target.
    Char8(SmolStr),
    /// Character string.
    String8(SmolStr),

    /// Enumeration literal reference.
    Enum(EnumValue),
}

impl Value {
    /// Returns the primitive kind of this value.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::Int8(_) => PrimitiveKind::Int8,
            Self::Int16(_) => PrimitiveKind::Int16,
            Self::Int32(_) => PrimitiveKind::Int32,
            Self::Int64(_) => PrimitiveKind::Int64,
            Self::UInt8(_) => PrimitiveKind::UInt8,
            Self::UInt16(_) => PrimitiveKind::UInt16,
            Self::UInt32(_) => PrimitiveKind::UInt32,
            Self::UInt64(_) => PrimitiveKind::UInt64,
            Self::Float32(_) => PrimitiveKind::Float32,
            Self::Float64(_) => PrimitiveKind::Float64,
            Self::Duration(_) => PrimitiveKind::Duration,
            Self::DateTime(_) => PrimitiveKind::DateTime,
            Self::Char8(_) => PrimitiveKind::Char8,
            Self::String8(_) => PrimitiveKind::String8,
            Self::Enum(_) => PrimitiveKind::Enum,
        }
    }

    /// Constructs an integral value of `kind`, truncating `raw` to the
    /// kind's bit width with two's-complement wrap.
    ///
    /// `raw` carries the source's 64-bit representation: sign-extended for
    /// signed sources, zero-extended (bit-cast for `UInt64`) for unsigned
    /// ones. Returns `None` for non-integral kinds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn integral(kind: PrimitiveKind, raw: i64) -> Option<Self> {
        Some(match kind {
            PrimitiveKind::Int8 => Self::Int8(raw as i8),
            PrimitiveKind::Int16 => Self::Int16(raw as i16),
            PrimitiveKind::Int32 => Self::Int32(raw as i32),
            PrimitiveKind::Int64 => Self::Int64(raw),
            PrimitiveKind::UInt8 => Self::UInt8(raw as u8),
            PrimitiveKind::UInt16 => Self::UInt16(raw as u16),
            PrimitiveKind::UInt32 => Self::UInt32(raw as u32),
            PrimitiveKind::UInt64 => Self::UInt64(raw as u64),
            PrimitiveKind::Duration => Self::Duration(raw),
            PrimitiveKind::DateTime => Self::DateTime(raw),
            _ => return None,
        })
    }

    /// Constructs a float value of `kind`, rounding to single precision
    /// immediately for `Float32`. Returns `None` for non-float kinds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn float(kind: PrimitiveKind, value: f64) -> Option<Self> {
        match kind {
            PrimitiveKind::Float32 => Some(Self::Float32(value as f32)),
            PrimitiveKind::Float64 => Some(Self::Float64(value)),
            _ => None,
        }
    }

    /// Returns the zero/default value for a primitive kind, used by
    /// generators for defaulted fields.
    #[must_use]
    pub fn default_for(kind: PrimitiveKind) -> Option<Self> {
        match kind {
            PrimitiveKind::Bool => Some(Self::Bool(false)),
            PrimitiveKind::Char8 => Some(Self::Char8(SmolStr::new_static("\0"))),
            PrimitiveKind::String8 => Some(Self::String8(SmolStr::default())),
            PrimitiveKind::Float32 | PrimitiveKind::Float64 => Self::float(kind, 0.0),
            PrimitiveKind::Enum | PrimitiveKind::None => None,
            _ => Self::integral(kind, 0),
        }
    }

    /// Returns the raw 64-bit representation of an integral value:
    /// sign-extended for signed kinds, zero-extended for unsigned ones
    /// (`UInt64` is bit-cast).
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn raw_i64(&self) -> Option<i64> {
        Some(match self {
            Self::Int8(v) => i64::from(*v),
            Self::Int16(v) => i64::from(*v),
            Self::Int32(v) => i64::from(*v),
            Self::Int64(v) | Self::Duration(v) | Self::DateTime(v) => *v,
            Self::UInt8(v) => i64::from(*v),
            Self::UInt16(v) => i64::from(*v),
            Self::UInt32(v) => i64::from(*v),
            Self::UInt64(v) => *v as i64,
            _ => return None,
        })
    }

    /// Returns the exact numeric value of a bool or integral value.
    #[must_use]
    pub fn exact_i128(&self) -> Option<i128> {
        Some(match self {
            Self::Bool(v) => i128::from(*v),
            Self::Int8(v) => i128::from(*v),
            Self::Int16(v) => i128::from(*v),
            Self::Int32(v) => i128::from(*v),
            Self::Int64(v) | Self::Duration(v) | Self::DateTime(v) => i128::from(*v),
            Self::UInt8(v) => i128::from(*v),
            Self::UInt16(v) => i128::from(*v),
            Self::UInt32(v) => i128::from(*v),
            Self::UInt64(v) => i128::from(*v),
            _ => return None,
        })
    }

    /// Converts to a boolean. Defined for bool, integral and float values
    /// (non-zero is true).
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Float32(v) => Some(*v != 0.0),
            Self::Float64(v) => Some(*v != 0.0),
            _ => self.raw_i64().map(|raw| raw != 0),
        }
    }

    /// Converts to an integral value of `kind`, truncating modulo the
    /// target's bit width (the C conversion rule).
    ///
    /// Floats are truncated toward zero first. Lossiness is not detected
    /// here; the conversion engine compares exact values where it matters.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_integral(&self, kind: PrimitiveKind) -> Option<Self> {
        let raw = match self {
            Self::Bool(v) => i64::from(*v),
            Self::Float32(v) => f64::from(*v).trunc() as i64,
            Self::Float64(v) => v.trunc() as i64,
            _ => self.raw_i64()?,
        };
        Self::integral(kind, raw)
    }

    /// Converts to a float value of `kind`.
    #[must_use]
    pub fn as_float(&self, kind: PrimitiveKind) -> Option<Self> {
        Self::float(kind, self.as_f64()?)
    }

    /// Returns the numeric value as an `f64`, for bool, integral and float
    /// values.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        Some(match self {
            Self::Bool(v) => f64::from(*v),
            Self::Float32(v) => f64::from(*v),
            Self::Float64(v) => *v,
            Self::UInt64(v) => *v as f64,
            _ => self.raw_i64()? as f64,
        })
    }

    /// Converts to a character string. Defined for string and character
    /// values.
    #[must_use]
    pub fn as_string(&self) -> Option<SmolStr> {
        match self {
            Self::String8(v) | Self::Char8(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Converts to a character-sequence value. Defined for character and
    /// string values; the caller checks the sequence length.
    #[must_use]
    pub fn as_char(&self) -> Option<Self> {
        match self {
            Self::Char8(v) | Self::String8(v) => Some(Self::Char8(v.clone())),
            _ => None,
        }
    }

    /// Returns the enumeration-literal reference, if this is one.
    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    /// Renders the value in catalogue literal syntax.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}L"),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}U"),
            Self::UInt64(v) => write!(f, "{v}UL"),
            // Round floats keep a decimal point so the rendered text stays
            // a float literal.
            Self::Float32(v) => {
                if v.is_finite() && v.fract() == 0.0 {
                    write!(f, "{v}.0f")
                } else {
                    write!(f, "{v}f")
                }
            }
            Self::Float64(v) => {
                if v.is_finite() && v.fract() == 0.0 {
                    write!(f, "{v}.0")
                } else {
                    write!(f, "{v}")
                }
            }
            Self::Duration(v) => write!(f, "\"{}\"", format_duration(*v)),
            Self::DateTime(v) => write!(f, "\"{}\"", format_date_time(*v)),
            Self::Char8(v) => write!(f, "'{v}'"),
            Self::String8(v) => write!(f, "\"{v}\""),
            Self::Enum(v) => match v.decl() {
                Some(decl) => write!(f, "{}.{}", v.enumeration.name, decl.name),
                None => write!(f, "{}.<invalid>", v.enumeration.name),
            },
        }
    }
}
