//! Shared helpers for evaluator tests.
#![allow(dead_code)]

use std::sync::Arc;

pub use catml_ast::{
    BinaryOp, CollectionElement, EnumLiteral, EnumType, Expr, ExprKind, Field, PrimitiveKind,
    RangeKind, TypeDesc, UnaryOp,
};
pub use catml_eval::{
    Diagnostic, DiagnosticBuilder, DiagnosticCode, DiagnosticSeverity, EnumValue, EvalError,
    Evaluator, Value,
};
use text_size::TextRange;

pub fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, TextRange::default())
}

/// Builds an expression with an explicit source range, for span assertions.
pub fn at(kind: ExprKind, start: u32, end: u32) -> Expr {
    Expr::new(kind, TextRange::new(start.into(), end.into()))
}

pub fn int(text: &str) -> Expr {
    expr(ExprKind::IntLiteral(text.into()))
}

pub fn float(text: &str) -> Expr {
    expr(ExprKind::FloatLiteral(text.into()))
}

pub fn string(text: &str) -> Expr {
    expr(ExprKind::StringLiteral(text.into()))
}

pub fn chr(text: &str) -> Expr {
    expr(ExprKind::CharLiteral(text.into()))
}

pub fn boolean(value: bool) -> Expr {
    expr(ExprKind::BoolLiteral(value))
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    expr(ExprKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn paren(inner: Expr) -> Expr {
    expr(ExprKind::Paren(Box::new(inner)))
}

/// Positional collection literal `{ a, b, ... }`.
pub fn collection(values: Vec<Expr>) -> Expr {
    expr(ExprKind::Collection(
        values
            .into_iter()
            .map(|value| CollectionElement { field: None, value })
            .collect(),
    ))
}

pub fn designated(field: &str, value: Expr) -> CollectionElement {
    CollectionElement {
        field: Some(field.into()),
        value,
    }
}

pub fn collection_of(elements: Vec<CollectionElement>) -> Expr {
    expr(ExprKind::Collection(elements))
}

pub fn enum_ref(enumeration: &Arc<EnumType>, literal: usize) -> Expr {
    expr(ExprKind::EnumLiteralRef {
        enumeration: enumeration.clone(),
        literal,
    })
}

pub fn enum_type(name: &str, literals: &[(&str, &str)]) -> Arc<EnumType> {
    Arc::new(EnumType {
        name: name.into(),
        literals: literals
            .iter()
            .map(|(literal, value)| EnumLiteral {
                name: (*literal).into(),
                value: int(value),
            })
            .collect(),
    })
}

pub fn bounded_int(kind: PrimitiveKind, minimum: Option<Expr>, maximum: Option<Expr>) -> TypeDesc {
    TypeDesc::Integer {
        kind,
        minimum,
        maximum,
    }
}

pub fn bounded_float(
    kind: PrimitiveKind,
    minimum: Option<Expr>,
    maximum: Option<Expr>,
    range: RangeKind,
) -> TypeDesc {
    TypeDesc::Float {
        kind,
        minimum,
        maximum,
        range,
    }
}

pub fn array_of(item: TypeDesc, size: &str) -> TypeDesc {
    TypeDesc::Array {
        item: Arc::new(item),
        size: int(size),
    }
}

pub fn structure(name: &str, fields: Vec<(&str, TypeDesc)>) -> TypeDesc {
    TypeDesc::Structure {
        name: name.into(),
        fields: fields
            .into_iter()
            .map(|(field, ty)| Field {
                name: field.into(),
                ty: Arc::new(ty),
            })
            .collect(),
    }
}

/// Evaluates without a target type.
pub fn eval(expression: &Expr) -> Result<Option<Value>, EvalError> {
    Evaluator::new().evaluate(expression)
}

/// Converts silently to the target type.
pub fn convert(expression: &Expr, ty: &TypeDesc) -> Result<Option<Value>, EvalError> {
    Evaluator::new().convert(expression, ty)
}

/// Validates against the target type, returning the value and every
/// recorded diagnostic.
pub fn validate(expression: &Expr, ty: &TypeDesc) -> (Option<Value>, Vec<Diagnostic>) {
    let mut evaluator = Evaluator::new();
    let mut sink = DiagnosticBuilder::new();
    let value = evaluator.validate(expression, ty, &mut sink);
    (value, sink.finish())
}

pub fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
    diagnostics.iter().map(|d| d.code).collect()
}

pub fn check_no_diagnostics(expression: &Expr, ty: &TypeDesc) -> Value {
    let (value, diagnostics) = validate(expression, ty);
    assert!(
        diagnostics.is_empty(),
        "Expected no diagnostics, got: {diagnostics:?}"
    );
    value.expect("expected a value")
}

pub fn check_has_code(expression: &Expr, ty: &TypeDesc, expected: DiagnosticCode) {
    let (_, diagnostics) = validate(expression, ty);
    let found = codes(&diagnostics);
    assert!(found.contains(&expected), "Expected {expected:?} in {found:?}");
}
