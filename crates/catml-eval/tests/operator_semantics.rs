//! Operator application and integer promotion through whole expressions.

mod common;
use common::*;

use std::sync::Arc;

use catml_ast::ConstantDecl;

#[test]
fn test_arithmetic_promotes_small_kinds_to_int32() {
    // Int8 operands promote before the add, so no 8-bit wrap occurs.
    let ty = TypeDesc::Primitive(PrimitiveKind::Int8);
    let hundred = convert(&int("100"), &ty).unwrap().unwrap();
    assert_eq!(hundred, Value::Int8(100));

    let sum = binary(BinaryOp::Add, int("100"), int("100"));
    assert_eq!(eval(&sum), Ok(Some(Value::Int32(200))));
}

#[test]
fn test_mixed_signedness_promotion() {
    let sum = binary(BinaryOp::Add, unary(UnaryOp::Minus, int("1")), int("1u"));
    assert_eq!(eval(&sum), Ok(Some(Value::UInt32(0))));

    let wide = binary(BinaryOp::Mul, int("2L"), int("3u"));
    assert_eq!(eval(&wide), Ok(Some(Value::Int64(6))));

    let dominant = binary(BinaryOp::Add, int("1uL"), int("2L"));
    assert_eq!(eval(&dominant), Ok(Some(Value::UInt64(3))));
}

#[test]
fn test_float_contaminates_the_expression() {
    let mixed = binary(BinaryOp::Add, int("1"), float("0.5"));
    assert_eq!(eval(&mixed), Ok(Some(Value::Float64(1.5))));
    let single = binary(BinaryOp::Mul, float("2.0f"), int("3"));
    assert_eq!(eval(&single), Ok(Some(Value::Float32(6.0))));
}

#[test]
fn test_integral_division_by_zero_is_fatal() {
    let division = binary(BinaryOp::Div, int("5"), int("0"));
    assert_eq!(eval(&division), Err(EvalError::DivisionByZero));
    let remainder = binary(BinaryOp::Rem, int("5"), binary(BinaryOp::Sub, int("1"), int("1")));
    assert_eq!(eval(&remainder), Err(EvalError::DivisionByZero));
    // Float division by zero follows IEEE instead.
    let float_div = binary(BinaryOp::Div, float("1.0"), float("0.0"));
    assert_eq!(eval(&float_div), Ok(Some(Value::Float64(f64::INFINITY))));
}

#[test]
fn test_bitwise_and_shift() {
    let masked = binary(BinaryOp::BitAnd, int("0xFF"), int("0x0F"));
    assert_eq!(eval(&masked), Ok(Some(Value::Int32(0x0F))));
    let shifted = binary(BinaryOp::Shl, int("1"), int("10"));
    assert_eq!(eval(&shifted), Ok(Some(Value::Int32(1024))));
    let complement = unary(UnaryOp::Complement, int("0"));
    assert_eq!(eval(&complement), Ok(Some(Value::Int32(-1))));
}

#[test]
fn test_comparisons_and_logic() {
    let cmp = binary(BinaryOp::Lt, int("1"), int("2L"));
    assert_eq!(eval(&cmp), Ok(Some(Value::Bool(true))));
    let eq = binary(BinaryOp::Eq, float("1.0"), int("1"));
    assert_eq!(eval(&eq), Ok(Some(Value::Bool(true))));
    let both = binary(BinaryOp::LogicalAnd, boolean(true), boolean(false));
    assert_eq!(eval(&both), Ok(Some(Value::Bool(false))));
    let strings = binary(BinaryOp::Lt, string("abc"), string("abd"));
    assert_eq!(eval(&strings), Ok(Some(Value::Bool(true))));
}

#[test]
fn test_not_does_not_coerce_its_operand() {
    assert_eq!(eval(&unary(UnaryOp::Not, boolean(false))), Ok(Some(Value::Bool(true))));
    assert_eq!(eval(&unary(UnaryOp::Not, int("1"))), Ok(None));
}

#[test]
fn test_unsupported_operator_diagnostic_names_both_kinds() {
    let ty = TypeDesc::Primitive(PrimitiveKind::Bool);
    let bad = binary(BinaryOp::Add, boolean(true), string("x"));
    let (value, diagnostics) = validate(&bad, &ty);
    assert_eq!(value, None);
    assert_eq!(codes(&diagnostics), vec![DiagnosticCode::UnsupportedOperator]);
    assert_eq!(
        diagnostics[0].message,
        "operator `+` is not supported for Bool and String8"
    );
}

#[test]
fn test_negation_retruncates_per_operand_kind() {
    // -(Int32::MIN) wraps back to Int32::MIN.
    let minimum = unary(
        UnaryOp::Minus,
        binary(BinaryOp::Sub, unary(UnaryOp::Minus, int("2147483647")), int("1")),
    );
    assert_eq!(eval(&minimum), Ok(Some(Value::Int32(i32::MIN))));
}

#[test]
fn test_constant_reference_converts_to_declared_type() {
    let decl = Arc::new(ConstantDecl {
        name: "LIMIT".into(),
        ty: TypeDesc::Primitive(PrimitiveKind::Int16),
        value: int("1000"),
    });
    let reference = expr(ExprKind::ConstantRef(decl));
    assert_eq!(eval(&reference), Ok(Some(Value::Int16(1000))));

    // The referenced constant participates in promotion as Int16.
    let doubled = binary(BinaryOp::Mul, reference, int("2"));
    assert_eq!(eval(&doubled), Ok(Some(Value::Int32(2000))));
}

#[test]
fn test_builtin_constants_and_calls() {
    let area = binary(
        BinaryOp::Mul,
        expr(ExprKind::BuiltinConstant("PI".into())),
        binary(BinaryOp::Mul, int("2"), int("2")),
    );
    assert_eq!(
        eval(&area),
        Ok(Some(Value::Float64(std::f64::consts::PI * 4.0)))
    );
    let hypotenuse = expr(ExprKind::BuiltinCall {
        name: "sqrt".into(),
        args: vec![binary(
            BinaryOp::Add,
            binary(BinaryOp::Mul, int("3"), int("3")),
            binary(BinaryOp::Mul, int("4"), int("4")),
        )],
    });
    assert_eq!(eval(&hypotenuse), Ok(Some(Value::Float64(5.0))));
}
