//! `catml-eval` - Constant expression evaluation and type conformance for the
//! CatML catalogue language.
//!
//! This crate takes an expression tree from `catml-ast` and:
//!
//! - **evaluates** it under a strongly-typed primitive model (fixed-width
//!   integer truncation, single/double float rounding, C-like integer
//!   promotion for mixed binary operations)
//! - **converts** the result to a requested target type, enforcing the
//!   target's numeric/length constraints
//! - **reports** precise diagnostics through a caller-supplied sink when a
//!   conversion or operator application is invalid
//!
//! The evaluator is purely functional: every failure yields "no value" except
//! division by zero, which is the single fatal outcome ([`EvalError`]) so it
//! cannot be confused with other failure causes deep inside arithmetic
//! chains.
//!
//! # Example
//!
//! ```ignore
//! use catml_eval::{DiagnosticBuilder, Evaluator};
//!
//! let mut eval = Evaluator::new();
//! let mut sink = DiagnosticBuilder::new();
//! let value = eval.validate(&expr, &target_type, &mut sink);
//! for diagnostic in sink.finish() {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod convert;
pub mod datetime;
pub mod diagnostics;
pub mod eval;
pub mod literals;
mod numeric;
pub mod ops;
pub mod value;

pub use datetime::{format_date_time, format_duration, parse_date_time, parse_duration};
pub use diagnostics::{
    Diagnostic, DiagnosticBuilder, DiagnosticCode, DiagnosticSeverity, RelatedInfo,
};
pub use eval::{EvalCache, Evaluator};
pub use literals::{parse_float, parse_integer, LiteralError};
pub use ops::{apply_binary, apply_unary, EvalError};
pub use value::{EnumValue, Value};
