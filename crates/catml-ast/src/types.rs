//! Type descriptors consumed by the conversion engine.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::expr::Expr;
use crate::kind::PrimitiveKind;

/// Inclusivity of a bounded float type's min/max edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeKind {
    /// Both edges inclusive.
    #[default]
    Inclusive,
    /// Both edges exclusive.
    Exclusive,
    /// Minimum exclusive, maximum inclusive.
    MinExclusive,
    /// Minimum inclusive, maximum exclusive.
    MaxExclusive,
}

impl RangeKind {
    /// Returns true if the minimum edge is exclusive.
    #[must_use]
    pub fn min_exclusive(self) -> bool {
        matches!(self, Self::Exclusive | Self::MinExclusive)
    }

    /// Returns true if the maximum edge is exclusive.
    #[must_use]
    pub fn max_exclusive(self) -> bool {
        matches!(self, Self::Exclusive | Self::MaxExclusive)
    }
}

/// A named enumeration literal with its explicit value expression.
#[derive(Debug)]
pub struct EnumLiteral {
    /// Literal name.
    pub name: SmolStr,
    /// Explicit Int32 value expression.
    pub value: Expr,
}

/// An enumeration type with its ordered literal list.
#[derive(Debug)]
pub struct EnumType {
    /// Enumeration name.
    pub name: SmolStr,
    /// Literals in declaration order.
    pub literals: Vec<EnumLiteral>,
}

/// A declared structure field.
#[derive(Debug)]
pub struct Field {
    /// Field name.
    pub name: SmolStr,
    /// Field type.
    pub ty: Arc<TypeDesc>,
}

/// A target type descriptor.
///
/// Minimum/maximum/length/size are constant expressions of the catalogue
/// language, not plain integers; an absent bound means "no constraint".
#[derive(Debug)]
pub enum TypeDesc {
    /// A bare primitive kind.
    Primitive(PrimitiveKind),
    /// A bounded integer type.
    Integer {
        /// Backing integral kind.
        kind: PrimitiveKind,
        /// Optional minimum, inclusive.
        minimum: Option<Expr>,
        /// Optional maximum, inclusive.
        maximum: Option<Expr>,
    },
    /// A bounded float type.
    Float {
        /// Backing float kind.
        kind: PrimitiveKind,
        /// Optional minimum bound.
        minimum: Option<Expr>,
        /// Optional maximum bound.
        maximum: Option<Expr>,
        /// Edge inclusivity.
        range: RangeKind,
    },
    /// A string type with an optional declared length.
    String {
        /// Maximum length expression, if declared.
        length: Option<Expr>,
    },
    /// An enumeration type.
    Enumeration(Arc<EnumType>),
    /// An array type.
    Array {
        /// Item type.
        item: Arc<TypeDesc>,
        /// Declared size expression.
        size: Expr,
    },
    /// A structure type with ordered fields.
    Structure {
        /// Structure name.
        name: SmolStr,
        /// Fields in declaration order.
        fields: Vec<Field>,
    },
}

impl TypeDesc {
    /// Returns the primitive kind backing this descriptor.
    ///
    /// Arrays and structures report [`PrimitiveKind::None`].
    #[must_use]
    pub fn primitive_kind(&self) -> PrimitiveKind {
        match self {
            Self::Primitive(kind) => *kind,
            Self::Integer { kind, .. } | Self::Float { kind, .. } => *kind,
            Self::String { .. } => PrimitiveKind::String8,
            Self::Enumeration(_) => PrimitiveKind::Enum,
            Self::Array { .. } | Self::Structure { .. } => PrimitiveKind::None,
        }
    }

    /// Returns a display name for diagnostics.
    #[must_use]
    pub fn display_name(&self) -> SmolStr {
        match self {
            Self::Primitive(kind) => SmolStr::new_static(kind.name()),
            Self::Integer { kind, .. } | Self::Float { kind, .. } => {
                SmolStr::new_static(kind.name())
            }
            Self::String { .. } => SmolStr::new_static("String8"),
            Self::Enumeration(e) => e.name.clone(),
            Self::Array { .. } => SmolStr::new_static("array"),
            Self::Structure { name, .. } => name.clone(),
        }
    }
}
