//! Numeric promotion helpers.

use catml_ast::PrimitiveKind;

use crate::value::Value;

/// The integral kinds a mixed binary operation can resolve to.
///
/// 8/16-bit kinds always decay to `Int32` first; `Duration`, `DateTime` and
/// `Int64` decay to `Int64`; `UInt64` dominates everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PromotedKind {
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl PromotedKind {
    pub(crate) fn primitive(self) -> PrimitiveKind {
        match self {
            Self::Int32 => PrimitiveKind::Int32,
            Self::UInt32 => PrimitiveKind::UInt32,
            Self::Int64 => PrimitiveKind::Int64,
            Self::UInt64 => PrimitiveKind::UInt64,
            Self::Float32 => PrimitiveKind::Float32,
            Self::Float64 => PrimitiveKind::Float64,
        }
    }

    pub(crate) fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    pub(crate) fn is_unsigned(self) -> bool {
        matches!(self, Self::UInt32 | Self::UInt64)
    }

    pub(crate) fn bit_width(self) -> u32 {
        match self {
            Self::Int32 | Self::UInt32 | Self::Float32 => 32,
            Self::Int64 | Self::UInt64 | Self::Float64 => 64,
        }
    }
}

fn decay(kind: PrimitiveKind) -> Option<PromotedKind> {
    match kind {
        // Bool converts up when paired with a numeric operand.
        PrimitiveKind::Bool
        | PrimitiveKind::Int8
        | PrimitiveKind::Int16
        | PrimitiveKind::UInt8
        | PrimitiveKind::UInt16
        | PrimitiveKind::Int32 => Some(PromotedKind::Int32),
        PrimitiveKind::UInt32 => Some(PromotedKind::UInt32),
        PrimitiveKind::Int64 | PrimitiveKind::Duration | PrimitiveKind::DateTime => {
            Some(PromotedKind::Int64)
        }
        PrimitiveKind::UInt64 => Some(PromotedKind::UInt64),
        PrimitiveKind::Float32 => Some(PromotedKind::Float32),
        PrimitiveKind::Float64 => Some(PromotedKind::Float64),
        _ => None,
    }
}

fn rank(kind: PromotedKind) -> u8 {
    match kind {
        PromotedKind::Int32 => 0,
        PromotedKind::UInt32 => 1,
        PromotedKind::Int64 => 2,
        PromotedKind::UInt64 => 3,
        PromotedKind::Float32 => 4,
        PromotedKind::Float64 => 5,
    }
}

/// Computes the result kind of a binary operation on the given operand
/// kinds, per the C-like usual-arithmetic-conversion ladder.
///
/// Commutative: `promote(a, b) == promote(b, a)`. Two booleans have no
/// promoted numeric kind.
pub(crate) fn promote(left: PrimitiveKind, right: PrimitiveKind) -> Option<PromotedKind> {
    if left == PrimitiveKind::Bool && right == PrimitiveKind::Bool {
        return None;
    }
    let left = decay(left)?;
    let right = decay(right)?;
    Some(if rank(left) >= rank(right) { left } else { right })
}

/// Reinterprets an operand as the promoted kind, wrapping modulo the
/// target's width for integral kinds.
pub(crate) fn convert_operand(value: &Value, target: PromotedKind) -> Option<Value> {
    if target.is_float() {
        value.as_float(target.primitive())
    } else {
        value.as_integral(target.primitive())
    }
}
