//! The conversion and range-validation engine.
//!
//! [`Evaluator::convert`] computes a value of the target type silently;
//! [`Evaluator::validate`] does the same while checking the target's
//! declared constraints (min/max bounds, lengths, enumeration membership,
//! collection shapes) through a diagnostic sink. Range and shape
//! diagnostics never abort traversal; sibling elements keep being checked
//! after a violation is reported.

use std::sync::Arc;

use catml_ast::{CollectionElement, Expr, ExprKind, Field, PrimitiveKind, TypeDesc};
use smol_str::SmolStr;
use text_size::TextRange;

use crate::datetime::{parse_date_time, parse_duration};
use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use crate::eval::Evaluator;
use crate::ops::EvalError;
use crate::value::{EnumValue, Value};

impl Evaluator<'_> {
    /// Converts an expression to the target type without validation.
    ///
    /// Safe to call purely for value computation; no diagnostics are
    /// emitted. Yields `Ok(None)` when the expression has no value of the
    /// target type.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::DivisionByZero`] for division or remainder by
    /// integral zero anywhere in the tree.
    pub fn convert(&mut self, expr: &Expr, ty: &TypeDesc) -> Result<Option<Value>, EvalError> {
        self.convert_inner(expr, ty, None)
    }

    /// Converts an expression to the target type, reporting every
    /// constraint violation through `sink`.
    ///
    /// Division by zero is caught here and reported against the offending
    /// expression, so this entry point cannot fail.
    pub fn validate(
        &mut self,
        expr: &Expr,
        ty: &TypeDesc,
        sink: &mut DiagnosticBuilder,
    ) -> Option<Value> {
        tracing::trace!(span = ?expr.span, target = %ty.display_name(), "validate");
        match self.convert_inner(expr, ty, Some(sink)) {
            Ok(value) => value,
            Err(err @ EvalError::DivisionByZero) => {
                sink.error(DiagnosticCode::DivisionByZero, expr.span, err.to_string());
                None
            }
        }
    }

    pub(crate) fn convert_inner(
        &mut self,
        expr: &Expr,
        ty: &TypeDesc,
        mut sink: Option<&mut DiagnosticBuilder>,
    ) -> Result<Option<Value>, EvalError> {
        match ty {
            TypeDesc::Array { item, size } => self.convert_array(expr, item, size, sink),
            TypeDesc::Structure { name, fields } => {
                self.convert_structure(expr, name, fields, sink)
            }
            _ => {
                if collection_elements(expr).is_some() {
                    if let Some(sink) = sink {
                        sink.error(
                            DiagnosticCode::ExpectedScalar,
                            expr.span,
                            format!(
                                "expected a scalar value of type {}, got a collection literal",
                                ty.display_name()
                            ),
                        );
                    }
                    return Ok(None);
                }
                let Some(value) = self.eval_inner(expr, sink.as_deref_mut())? else {
                    return Ok(None);
                };
                self.convert_scalar(expr, &value, ty, sink)
            }
        }
    }

    fn convert_scalar(
        &mut self,
        expr: &Expr,
        value: &Value,
        ty: &TypeDesc,
        mut sink: Option<&mut DiagnosticBuilder>,
    ) -> Result<Option<Value>, EvalError> {
        match ty {
            TypeDesc::Primitive(kind) => Ok(convert_primitive(expr, value, *kind, sink)),
            TypeDesc::Integer {
                kind,
                minimum,
                maximum,
            } => {
                let Some(converted) = convert_primitive(expr, value, *kind, sink.as_deref_mut())
                else {
                    return Ok(None);
                };
                if let Some(sink) = sink {
                    let Some(actual) = converted.exact_i128() else {
                        return Ok(Some(converted));
                    };
                    if let Some(bound_expr) = minimum {
                        if let Some(bound) = self.integral_bound(bound_expr)? {
                            if actual < bound {
                                sink.add(
                                    Diagnostic::error(
                                        DiagnosticCode::OutOfRange,
                                        expr.span,
                                        format!(
                                            "value {converted} must be greater than or equal to {bound}"
                                        ),
                                    )
                                    .with_related(bound_expr.span, "minimum declared here"),
                                );
                            }
                        }
                    }
                    if let Some(bound_expr) = maximum {
                        if let Some(bound) = self.integral_bound(bound_expr)? {
                            if actual > bound {
                                sink.add(
                                    Diagnostic::error(
                                        DiagnosticCode::OutOfRange,
                                        expr.span,
                                        format!(
                                            "value {converted} must be less than or equal to {bound}"
                                        ),
                                    )
                                    .with_related(bound_expr.span, "maximum declared here"),
                                );
                            }
                        }
                    }
                }
                Ok(Some(converted))
            }
            TypeDesc::Float {
                kind,
                minimum,
                maximum,
                range,
            } => {
                let Some(converted) = convert_primitive(expr, value, *kind, sink.as_deref_mut())
                else {
                    return Ok(None);
                };
                if let Some(sink) = sink {
                    let Some(actual) = converted.as_f64() else {
                        return Ok(Some(converted));
                    };
                    if let Some(bound_expr) = minimum {
                        if let Some(bound) = self.float_bound(bound_expr)? {
                            // Equality with an exclusive edge is a violation.
                            let (violated, phrase) = if range.min_exclusive() {
                                (actual <= bound, "greater than")
                            } else {
                                (actual < bound, "greater than or equal to")
                            };
                            if violated {
                                sink.add(
                                    Diagnostic::error(
                                        DiagnosticCode::OutOfRange,
                                        expr.span,
                                        format!("value {actual} must be {phrase} {bound}"),
                                    )
                                    .with_related(bound_expr.span, "minimum declared here"),
                                );
                            }
                        }
                    }
                    if let Some(bound_expr) = maximum {
                        if let Some(bound) = self.float_bound(bound_expr)? {
                            let (violated, phrase) = if range.max_exclusive() {
                                (actual >= bound, "less than")
                            } else {
                                (actual > bound, "less than or equal to")
                            };
                            if violated {
                                sink.add(
                                    Diagnostic::error(
                                        DiagnosticCode::OutOfRange,
                                        expr.span,
                                        format!("value {actual} must be {phrase} {bound}"),
                                    )
                                    .with_related(bound_expr.span, "maximum declared here"),
                                );
                            }
                        }
                    }
                }
                Ok(Some(converted))
            }
            TypeDesc::String { length } => {
                let Some(text) = value.as_string() else {
                    report_unconvertible(sink, expr.span, value, "String8");
                    return Ok(None);
                };
                if let Some(sink) = sink {
                    if let Some(length_expr) = length {
                        if let Some(declared) = self.integral_bound(length_expr)? {
                            let actual = text.chars().count() as i128;
                            if actual > declared {
                                sink.add(
                                    Diagnostic::error(
                                        DiagnosticCode::InvalidLength,
                                        expr.span,
                                        format!(
                                            "string of length {actual} exceeds the declared length {declared}"
                                        ),
                                    )
                                    .with_related(length_expr.span, "length declared here"),
                                );
                            }
                        }
                    }
                }
                // The oversized string is still usable; the diagnostic is
                // non-fatal for conversion.
                Ok(Some(Value::String8(text)))
            }
            TypeDesc::Enumeration(enumeration) => {
                self.convert_enum(expr, value, enumeration, sink)
            }
            TypeDesc::Array { .. } | TypeDesc::Structure { .. } => Ok(None),
        }
    }

    fn convert_enum(
        &mut self,
        expr: &Expr,
        value: &Value,
        enumeration: &Arc<catml_ast::EnumType>,
        sink: Option<&mut DiagnosticBuilder>,
    ) -> Result<Option<Value>, EvalError> {
        match value {
            Value::Enum(reference) => {
                if Arc::ptr_eq(&reference.enumeration, enumeration) {
                    Ok(Some(value.clone()))
                } else {
                    if let Some(sink) = sink {
                        sink.error(
                            DiagnosticCode::InvalidEnumLiteral,
                            expr.span,
                            format!(
                                "enumeration literal `{value}` does not belong to `{}`",
                                enumeration.name
                            ),
                        );
                    }
                    Ok(None)
                }
            }
            // Fallback for plain Int32 values: match against the literals'
            // own constant values and recommend the symbolic form.
            Value::Int32(raw) => {
                for (index, literal) in enumeration.literals.iter().enumerate() {
                    let matches = match self.eval_inner(&literal.value, None) {
                        Ok(Some(v)) => v.exact_i128() == Some(i128::from(*raw)),
                        _ => false,
                    };
                    if matches {
                        if let Some(sink) = sink {
                            sink.warning(
                                DiagnosticCode::ImplicitEnumConversion,
                                expr.span,
                                format!(
                                    "implicit conversion from integer, use `{}.{}` instead",
                                    enumeration.name, literal.name
                                ),
                            );
                        }
                        return Ok(Some(Value::Enum(EnumValue {
                            enumeration: enumeration.clone(),
                            literal: index,
                        })));
                    }
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn convert_array(
        &mut self,
        expr: &Expr,
        item: &TypeDesc,
        size: &Expr,
        mut sink: Option<&mut DiagnosticBuilder>,
    ) -> Result<Option<Value>, EvalError> {
        let Some(elements) = collection_elements(expr) else {
            if let Some(sink) = sink {
                sink.error(
                    DiagnosticCode::ExpectedCollection,
                    expr.span,
                    "expected a collection literal for an array value",
                );
            }
            return Ok(None);
        };

        let declared = self
            .integral_bound(size)?
            .and_then(|n| usize::try_from(n).ok());
        let checked = declared.map_or(elements.len(), |d| d.min(elements.len()));
        for element in &elements[..checked] {
            self.convert_element(&element.value, item, sink.as_deref_mut())?;
        }

        if let Some(sink) = sink {
            if let Some(declared) = declared {
                if elements.len() > declared {
                    sink.error(
                        DiagnosticCode::ExcessElements,
                        expr.span,
                        format!("expect {declared} element(s), got {}", elements.len()),
                    );
                } else if elements.len() < declared {
                    sink.warning(
                        DiagnosticCode::PartialInitialization,
                        expr.span,
                        format!(
                            "Partial initialization, expect {declared} element(s), got {}",
                            elements.len()
                        ),
                    );
                }
            }
        }
        Ok(None)
    }

    fn convert_structure(
        &mut self,
        expr: &Expr,
        name: &SmolStr,
        fields: &[Field],
        mut sink: Option<&mut DiagnosticBuilder>,
    ) -> Result<Option<Value>, EvalError> {
        let Some(elements) = collection_elements(expr) else {
            if let Some(sink) = sink {
                sink.error(
                    DiagnosticCode::ExpectedCollection,
                    expr.span,
                    format!("expected a collection literal for structure `{name}`"),
                );
            }
            return Ok(None);
        };

        for (element, field) in elements.iter().zip(fields) {
            // A designated initializer must name the positionally expected
            // field.
            if let Some(designated) = &element.field {
                if *designated != field.name {
                    if let Some(sink) = sink.as_deref_mut() {
                        sink.error(
                            DiagnosticCode::InvalidFieldName,
                            element.value.span,
                            format!("Invalid field name, expecting `{}`", field.name),
                        );
                    }
                    continue;
                }
            }
            self.convert_element(&element.value, &field.ty, sink.as_deref_mut())?;
        }

        if let Some(sink) = sink {
            if elements.len() > fields.len() {
                sink.error(
                    DiagnosticCode::ExcessElements,
                    expr.span,
                    format!("expect {} field(s), got {}", fields.len(), elements.len()),
                );
            } else if elements.len() < fields.len() {
                sink.warning(
                    DiagnosticCode::PartialInitialization,
                    expr.span,
                    format!(
                        "Partial initialization, expect {} field(s), got {}",
                        fields.len(),
                        elements.len()
                    ),
                );
            }
        }
        Ok(None)
    }

    /// Converts one collection element, containing division-by-zero so the
    /// remaining siblings are still traversed on the validating path.
    fn convert_element(
        &mut self,
        expr: &Expr,
        ty: &TypeDesc,
        mut sink: Option<&mut DiagnosticBuilder>,
    ) -> Result<(), EvalError> {
        match self.convert_inner(expr, ty, sink.as_deref_mut()) {
            Ok(_) => Ok(()),
            Err(err @ EvalError::DivisionByZero) => match sink {
                Some(sink) => {
                    sink.error(DiagnosticCode::DivisionByZero, expr.span, err.to_string());
                    Ok(())
                }
                None => Err(err),
            },
        }
    }

    /// Evaluates a declared bound expression to its exact integral value.
    /// An absent or non-constant bound means "no constraint".
    fn integral_bound(&mut self, expr: &Expr) -> Result<Option<i128>, EvalError> {
        Ok(self.eval_inner(expr, None)?.and_then(|v| v.exact_i128()))
    }

    fn float_bound(&mut self, expr: &Expr) -> Result<Option<f64>, EvalError> {
        Ok(self.eval_inner(expr, None)?.and_then(|v| v.as_f64()))
    }
}

fn collection_elements(expr: &Expr) -> Option<&[CollectionElement]> {
    match &expr.kind {
        ExprKind::Collection(elements) => Some(elements),
        ExprKind::Paren(inner) => collection_elements(inner),
        _ => None,
    }
}

fn convert_primitive(
    expr: &Expr,
    value: &Value,
    kind: PrimitiveKind,
    mut sink: Option<&mut DiagnosticBuilder>,
) -> Option<Value> {
    let result = match kind {
        PrimitiveKind::Bool => value.as_bool().map(Value::Bool),
        PrimitiveKind::Char8 => match value.as_char() {
            Some(Value::Char8(sequence)) => {
                if sequence.chars().count() == 1 {
                    Some(Value::Char8(sequence))
                } else {
                    if let Some(sink) = sink {
                        sink.error(
                            DiagnosticCode::InvalidLength,
                            expr.span,
                            format!(
                                "character value `{sequence}` must be exactly one character long"
                            ),
                        );
                    }
                    return None;
                }
            }
            _ => None,
        },
        PrimitiveKind::String8 => value.as_string().map(Value::String8),
        PrimitiveKind::Float32 | PrimitiveKind::Float64 => value.as_float(kind),
        // Unparsable duration/datetime text yields no value silently; the
        // caller reports a context-appropriate message.
        PrimitiveKind::Duration => match value.as_string() {
            Some(text) => return parse_duration(&text).ok().map(Value::Duration),
            None => lossless_integral(value, kind),
        },
        PrimitiveKind::DateTime => match value.as_string() {
            Some(text) => return parse_date_time(&text).map(Value::DateTime),
            None => lossless_integral(value, kind),
        },
        PrimitiveKind::Enum => value.as_enum().map(|_| value.clone()),
        PrimitiveKind::None => None,
        _ => lossless_integral(value, kind),
    };
    if result.is_none() {
        report_unconvertible(sink.as_deref_mut(), expr.span, value, kind.name());
    }
    result
}

/// Converts to an integral kind, rejecting the conversion when the exact
/// numeric value does not survive truncation.
#[allow(clippy::cast_possible_truncation)]
fn lossless_integral(value: &Value, kind: PrimitiveKind) -> Option<Value> {
    let exact: i128 = match value {
        Value::Float32(_) | Value::Float64(_) => {
            let f = value.as_f64()?;
            if !f.is_finite() || f.fract() != 0.0 || f < -9.3e18 || f > 1.9e19 {
                return None;
            }
            f as i128
        }
        _ => value.exact_i128()?,
    };
    let converted = value.as_integral(kind)?;
    (converted.exact_i128() == Some(exact)).then_some(converted)
}

fn report_unconvertible(
    sink: Option<&mut DiagnosticBuilder>,
    span: TextRange,
    value: &Value,
    target: &str,
) {
    if let Some(sink) = sink {
        sink.error(
            DiagnosticCode::InvalidConversion,
            span,
            format!("`{value}` cannot be converted to {target}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use text_size::TextRange;

    use super::*;

    fn expr(kind: ExprKind) -> Expr {
        Expr::new(kind, TextRange::default())
    }

    fn int(text: &str) -> Expr {
        expr(ExprKind::IntLiteral(text.into()))
    }

    #[test]
    fn test_silent_conversion_emits_nothing() {
        let ty = TypeDesc::Integer {
            kind: PrimitiveKind::Int8,
            minimum: Some(int("0")),
            maximum: Some(int("10")),
        };
        let mut eval = Evaluator::new();
        // Out of bounds but silent: the value still converts.
        assert_eq!(eval.convert(&int("11"), &ty), Ok(Some(Value::Int8(11))));
    }

    #[test]
    fn test_lossy_truncation_is_rejected() {
        let ty = TypeDesc::Primitive(PrimitiveKind::Int8);
        let mut eval = Evaluator::new();
        assert_eq!(eval.convert(&int("300"), &ty), Ok(None));
        assert_eq!(eval.convert(&int("127"), &ty), Ok(Some(Value::Int8(127))));
    }

    #[test]
    fn test_float_to_integral_requires_whole_number() {
        let ty = TypeDesc::Primitive(PrimitiveKind::Int32);
        let mut eval = Evaluator::new();
        let whole = expr(ExprKind::FloatLiteral("3.0".into()));
        assert_eq!(eval.convert(&whole, &ty), Ok(Some(Value::Int32(3))));
        let fractional = expr(ExprKind::FloatLiteral("3.5".into()));
        assert_eq!(eval.convert(&fractional, &ty), Ok(None));
    }

    #[test]
    fn test_duration_from_string() {
        let ty = TypeDesc::Primitive(PrimitiveKind::Duration);
        let mut eval = Evaluator::new();
        let ok = expr(ExprKind::StringLiteral("PT1S".into()));
        assert_eq!(eval.convert(&ok, &ty), Ok(Some(Value::Duration(1_000_000_000))));
        // Unparsable text yields no value and no hard failure.
        let bad = expr(ExprKind::StringLiteral("one second".into()));
        assert_eq!(eval.convert(&bad, &ty), Ok(None));
    }

    #[test]
    fn test_scalar_target_rejects_collection() {
        let ty = TypeDesc::Primitive(PrimitiveKind::Int32);
        let literal = expr(ExprKind::Collection(vec![CollectionElement {
            field: None,
            value: int("1"),
        }]));
        let mut eval = Evaluator::new();
        let mut sink = DiagnosticBuilder::new();
        assert_eq!(eval.validate(&literal, &ty, &mut sink), None);
        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(sink.diagnostics()[0].code, DiagnosticCode::ExpectedScalar);
    }
}
