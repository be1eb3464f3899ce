//! The closed set of primitive kinds.

/// A primitive kind in the catalogue type system.
///
/// `DateTime` and `Duration` share the 64-bit signed nanosecond
/// representation but are distinct kinds for conversion purposes. `None` is
/// used where a type is not a recognized primitive (arrays, structures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Boolean.
    Bool,
    /// 8-bit character.
    Char8,
    /// 8-bit character string.
    String8,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// Nanoseconds since epoch, 64-bit signed.
    DateTime,
    /// Nanosecond duration, 64-bit signed.
    Duration,
    /// Enumeration literal.
    Enum,
    /// Not a primitive type.
    None,
}

impl PrimitiveKind {
    /// Returns true if this kind has a 64-bit-bounded integral
    /// representation.
    #[must_use]
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
                | Self::DateTime
                | Self::Duration
        )
    }

    /// Returns true if this is a signed integral kind.
    #[must_use]
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 | Self::DateTime | Self::Duration
        )
    }

    /// Returns true if this is an unsigned integral kind.
    #[must_use]
    pub fn is_unsigned(self) -> bool {
        matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    /// Returns true if this is a floating-point kind.
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Returns the width in bits for integral and float kinds.
    #[must_use]
    pub fn bit_size(self) -> Option<u32> {
        Some(match self {
            Self::Bool => 1,
            Self::Int8 | Self::UInt8 | Self::Char8 => 8,
            Self::Int16 | Self::UInt16 => 16,
            Self::Int32 | Self::UInt32 | Self::Float32 => 32,
            Self::Int64 | Self::UInt64 | Self::Float64 | Self::DateTime | Self::Duration => 64,
            Self::String8 | Self::Enum | Self::None => return None,
        })
    }

    /// Returns the catalogue name of the kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Char8 => "Char8",
            Self::String8 => "String8",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::DateTime => "DateTime",
            Self::Duration => "Duration",
            Self::Enum => "Enum",
            Self::None => "None",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(PrimitiveKind::Duration.is_integral());
        assert!(PrimitiveKind::Duration.is_signed());
        assert!(!PrimitiveKind::UInt64.is_signed());
        assert_eq!(PrimitiveKind::DateTime.bit_size(), Some(64));
        assert_eq!(PrimitiveKind::String8.bit_size(), None);
    }
}
