//! `catml-ast` - Expression tree and type descriptors for the CatML catalogue language.
//!
//! This crate defines the read-only contracts consumed by the constant
//! evaluator in `catml-eval`:
//!
//! - **Expression tree**: literals, operators, collection initializers and
//!   pre-resolved references to constants and enumeration literals
//! - **Primitive kinds**: the closed set of scalar types the evaluator
//!   understands
//! - **Type descriptors**: bounded integers/floats, fixed-length strings,
//!   enumerations, arrays and structures
//!
//! The tree is produced by the parser and cross-reference resolver (not part
//! of this workspace) and handed to the evaluator fully resolved. Every node
//! carries a [`text_size::TextRange`] locating it in the catalogue source, so
//! diagnostics can point at the offending sub-expression.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod expr;
pub mod kind;
pub mod types;

pub use expr::{BinaryOp, CollectionElement, ConstantDecl, Expr, ExprKind, UnaryOp};
pub use kind::PrimitiveKind;
pub use types::{EnumLiteral, EnumType, Field, RangeKind, TypeDesc};
