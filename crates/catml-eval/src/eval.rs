//! The constant-expression evaluator.
//!
//! [`Evaluator::evaluate`] walks an expression tree bottom-up and yields one
//! of three outcomes: a value, no value (the expression is not a supported
//! constant), or the single fatal [`EvalError`]. Diagnostics are only
//! emitted on the validating path ([`Evaluator::validate`]), never during
//! plain evaluation.

use std::f64::consts;

use catml_ast::{Expr, ExprKind};
use rustc_hash::FxHashMap;

use crate::diagnostics::{DiagnosticBuilder, DiagnosticCode};
use crate::literals::{parse_float, parse_integer, LiteralError};
use crate::ops::{apply_binary, apply_unary, EvalError};
use crate::value::{EnumValue, Value};

/// Identity of a literal node, by address.
///
/// Valid only while the expression tree it was taken from is alive; the
/// cache must be cleared when the document is re-analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey(usize);

impl NodeKey {
    fn of(expr: &Expr) -> Self {
        Self(std::ptr::from_ref(expr) as usize)
    }
}

/// Memoization cache for literal nodes, scoped to one analysis pass.
///
/// Owned by the caller and handed to the evaluator per
/// [`Evaluator::with_cache`]; the evaluator itself retains no state across
/// calls.
#[derive(Debug, Default)]
pub struct EvalCache {
    entries: FxHashMap<NodeKey, Option<Value>>,
}

impl EvalCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all entries. Must be called when the underlying document is
    /// re-analyzed, since keys are node addresses.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The expression evaluator.
///
/// Stateless apart from an optional caller-owned literal cache; cheap to
/// construct per call site. Reentrant: constant references evaluate their
/// initializers recursively on the same stack, so the resolver must hand
/// over an acyclic tree.
#[derive(Debug, Default)]
pub struct Evaluator<'a> {
    cache: Option<&'a mut EvalCache>,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator without memoization.
    #[must_use]
    pub fn new() -> Self {
        Self { cache: None }
    }

    /// Creates an evaluator memoizing literal nodes in `cache`.
    #[must_use]
    pub fn with_cache(cache: &'a mut EvalCache) -> Self {
        Self { cache: Some(cache) }
    }

    /// Evaluates an expression to a constant value.
    ///
    /// Yields `Ok(None)` when the expression is not a supported constant
    /// expression. No diagnostics are emitted on this path.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::DivisionByZero`] for division or remainder by
    /// integral zero anywhere in the tree.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Option<Value>, EvalError> {
        tracing::trace!(span = ?expr.span, "evaluate");
        self.eval_inner(expr, None)
    }

    pub(crate) fn eval_inner(
        &mut self,
        expr: &Expr,
        mut sink: Option<&mut DiagnosticBuilder>,
    ) -> Result<Option<Value>, EvalError> {
        match &expr.kind {
            ExprKind::BoolLiteral(value) => Ok(Some(Value::Bool(*value))),
            ExprKind::IntLiteral(_) => Ok(self.literal(expr, sink, |s| parse_integer(s.as_str()))),
            ExprKind::FloatLiteral(_) => Ok(self.literal(expr, sink, |s| parse_float(s.as_str()))),
            ExprKind::StringLiteral(text) => Ok(Some(Value::String8(text.clone()))),
            ExprKind::CharLiteral(text) => Ok(Some(Value::Char8(text.clone()))),
            ExprKind::Unary { op, operand } => {
                let Some(value) = self.eval_inner(operand, sink.as_deref_mut())? else {
                    return Ok(None);
                };
                let result = apply_unary(*op, &value);
                if result.is_none() {
                    if let Some(sink) = sink {
                        sink.error(
                            DiagnosticCode::UnsupportedOperator,
                            expr.span,
                            format!(
                                "operator `{}` is not supported for {}",
                                op.symbol(),
                                value.kind()
                            ),
                        );
                    }
                }
                Ok(result)
            }
            ExprKind::Binary { op, left, right } => {
                let lhs = self.eval_inner(left, sink.as_deref_mut())?;
                let rhs = self.eval_inner(right, sink.as_deref_mut())?;
                let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
                    return Ok(None);
                };
                let result = apply_binary(*op, &lhs, &rhs)?;
                if result.is_none() {
                    if let Some(sink) = sink {
                        sink.error(
                            DiagnosticCode::UnsupportedOperator,
                            expr.span,
                            format!(
                                "operator `{}` is not supported for {} and {}",
                                op.symbol(),
                                lhs.kind(),
                                rhs.kind()
                            ),
                        );
                    }
                }
                Ok(result)
            }
            ExprKind::Paren(inner) => self.eval_inner(inner, sink),
            ExprKind::BuiltinConstant(name) => Ok(builtin_constant(name)),
            ExprKind::BuiltinCall { name, args } => {
                let mut operands = Vec::with_capacity(args.len());
                for arg in args {
                    match self.eval_inner(arg, sink.as_deref_mut())? {
                        Some(value) => operands.push(value),
                        None => return Ok(None),
                    }
                }
                Ok(builtin_call(name, &operands))
            }
            // Collection literals only have meaning against an array or
            // structure target; standalone they are not a value.
            ExprKind::Collection(_) => Ok(None),
            ExprKind::ConstantRef(decl) => self.convert_inner(&decl.value, &decl.ty, None),
            ExprKind::EnumLiteralRef {
                enumeration,
                literal,
            } => Ok(Some(Value::Enum(EnumValue {
                enumeration: enumeration.clone(),
                literal: *literal,
            }))),
        }
    }

    fn literal(
        &mut self,
        expr: &Expr,
        sink: Option<&mut DiagnosticBuilder>,
        parse: impl FnOnce(&smol_str::SmolStr) -> Result<Value, LiteralError>,
    ) -> Option<Value> {
        // A sink means a fresh validation pass; report instead of reusing
        // a memoized outcome.
        if sink.is_none() {
            if let Some(cache) = &self.cache {
                if let Some(cached) = cache.entries.get(&NodeKey::of(expr)) {
                    return cached.clone();
                }
            }
        }

        let text = match &expr.kind {
            ExprKind::IntLiteral(text) | ExprKind::FloatLiteral(text) => text,
            _ => return None,
        };
        let result = match parse(text) {
            Ok(value) => Some(value),
            Err(err) => {
                if let Some(sink) = sink {
                    let code = match err {
                        LiteralError::Overflow { .. } => DiagnosticCode::LiteralOverflow,
                        LiteralError::Malformed(_) => DiagnosticCode::InvalidLiteral,
                    };
                    sink.error(code, expr.span, err.to_string());
                }
                None
            }
        };
        if let Some(cache) = &mut self.cache {
            cache.entries.insert(NodeKey::of(expr), result.clone());
        }
        result
    }
}

fn builtin_constant(name: &str) -> Option<Value> {
    match name {
        "PI" => Some(Value::Float64(consts::PI)),
        "E" => Some(Value::Float64(consts::E)),
        _ => None,
    }
}

fn builtin_call(name: &str, args: &[Value]) -> Option<Value> {
    match args {
        [operand] => {
            let x = operand.as_f64()?;
            let result = match name {
                "cos" => x.cos(),
                "sin" => x.sin(),
                "tan" => x.tan(),
                "acos" => x.acos(),
                "asin" => x.asin(),
                "atan" => x.atan(),
                "cosh" => x.cosh(),
                "sinh" => x.sinh(),
                "tanh" => x.tanh(),
                "exp" => x.exp(),
                "log" => x.ln(),
                "log10" => x.log10(),
                "sqrt" => x.sqrt(),
                "abs" => x.abs(),
                "floor" => x.floor(),
                "ceil" => x.ceil(),
                _ => return None,
            };
            Some(Value::Float64(result))
        }
        [left, right] => {
            let x = left.as_f64()?;
            let y = right.as_f64()?;
            let result = match name {
                "pow" => x.powf(y),
                "atan2" => x.atan2(y),
                _ => return None,
            };
            Some(Value::Float64(result))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use catml_ast::{BinaryOp, UnaryOp};
    use text_size::TextRange;

    use super::*;

    fn expr(kind: ExprKind) -> Expr {
        Expr::new(kind, TextRange::default())
    }

    fn int(text: &str) -> Expr {
        expr(ExprKind::IntLiteral(text.into()))
    }

    #[test]
    fn test_literal_evaluation() {
        let mut eval = Evaluator::new();
        assert_eq!(eval.evaluate(&int("42")), Ok(Some(Value::Int32(42))));
        assert_eq!(
            eval.evaluate(&expr(ExprKind::BoolLiteral(true))),
            Ok(Some(Value::Bool(true)))
        );
    }

    #[test]
    fn test_binary_tree_evaluation() {
        let tree = expr(ExprKind::Binary {
            op: BinaryOp::Mul,
            left: Box::new(int("6")),
            right: Box::new(expr(ExprKind::Paren(Box::new(int("7"))))),
        });
        let mut eval = Evaluator::new();
        assert_eq!(eval.evaluate(&tree), Ok(Some(Value::Int32(42))));
    }

    #[test]
    fn test_division_by_zero_propagates() {
        let tree = expr(ExprKind::Binary {
            op: BinaryOp::Div,
            left: Box::new(int("5")),
            right: Box::new(int("0")),
        });
        let mut eval = Evaluator::new();
        assert_eq!(eval.evaluate(&tree), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_unsupported_unary_has_no_value() {
        let tree = expr(ExprKind::Unary {
            op: UnaryOp::Not,
            operand: Box::new(int("1")),
        });
        let mut eval = Evaluator::new();
        assert_eq!(eval.evaluate(&tree), Ok(None));
    }

    #[test]
    fn test_builtins() {
        let mut eval = Evaluator::new();
        let pi = expr(ExprKind::BuiltinConstant("PI".into()));
        assert_eq!(eval.evaluate(&pi), Ok(Some(Value::Float64(std::f64::consts::PI))));

        let call = expr(ExprKind::BuiltinCall {
            name: "sqrt".into(),
            args: vec![expr(ExprKind::FloatLiteral("9.0".into()))],
        });
        assert_eq!(eval.evaluate(&call), Ok(Some(Value::Float64(3.0))));

        let call = expr(ExprKind::BuiltinCall {
            name: "pow".into(),
            args: vec![int("2"), int("10")],
        });
        assert_eq!(eval.evaluate(&call), Ok(Some(Value::Float64(1024.0))));

        let unknown = expr(ExprKind::BuiltinCall {
            name: "frobnicate".into(),
            args: vec![int("1")],
        });
        assert_eq!(eval.evaluate(&unknown), Ok(None));
    }

    #[test]
    fn test_cache_reuses_literal_results() {
        let mut cache = EvalCache::new();
        let node = int("123");
        {
            let mut eval = Evaluator::with_cache(&mut cache);
            assert_eq!(eval.evaluate(&node), Ok(Some(Value::Int32(123))));
        }
        assert_eq!(cache.entries.len(), 1);
        {
            let mut eval = Evaluator::with_cache(&mut cache);
            assert_eq!(eval.evaluate(&node), Ok(Some(Value::Int32(123))));
        }
        cache.clear();
        assert!(cache.entries.is_empty());
    }
}
