//! Operator table tests.

#![expect(clippy::unwrap_used, reason = "tests unwrap legal operations")]

use ember_ir::BinaryOp;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{evaluate_binary, evaluate_not, Value};

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn s(text: &str) -> Value {
    Value::string(text)
}

mod arithmetic {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers() {
        assert_eq!(evaluate_binary(&num(2.0), &num(3.0), BinaryOp::Add).unwrap(), num(5.0));
        assert_eq!(evaluate_binary(&num(2.0), &num(3.0), BinaryOp::Sub).unwrap(), num(-1.0));
        assert_eq!(evaluate_binary(&num(2.0), &num(3.0), BinaryOp::Mul).unwrap(), num(6.0));
        assert_eq!(evaluate_binary(&num(3.0), &num(2.0), BinaryOp::Div).unwrap(), num(1.5));
    }

    #[test]
    fn division_by_zero_is_ieee() {
        assert_eq!(
            evaluate_binary(&num(1.0), &num(0.0), BinaryOp::Div).unwrap(),
            num(f64::INFINITY)
        );
        let nan = evaluate_binary(&num(0.0), &num(0.0), BinaryOp::Div).unwrap();
        assert!(nan.as_number().is_some_and(f64::is_nan));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(evaluate_binary(&s("ab"), &s("cd"), BinaryOp::Add).unwrap(), s("abcd"));
        assert_eq!(evaluate_binary(&s("n="), &num(3.0), BinaryOp::Add).unwrap(), s("n=3"));
        assert_eq!(evaluate_binary(&num(1.5), &s("x"), BinaryOp::Add).unwrap(), s("1.5x"));
        assert_eq!(
            evaluate_binary(&s("v:"), &Value::Null, BinaryOp::Add).unwrap(),
            s("v:null")
        );
        assert_eq!(
            evaluate_binary(&Value::Bool(true), &s("!"), BinaryOp::Add).unwrap(),
            s("true!")
        );
    }

    #[test]
    fn mismatches() {
        for (left, right, op) in [
            (s("a"), num(1.0), BinaryOp::Sub),
            (num(1.0), Value::Bool(true), BinaryOp::Add),
            (Value::Null, num(1.0), BinaryOp::Mul),
            (s("a"), Value::array(Vec::new()), BinaryOp::Add),
            (s("a"), s("b"), BinaryOp::Div),
        ] {
            let err = evaluate_binary(&left, &right, op).unwrap_err();
            assert_eq!(err.kind_name(), "TypeMismatch", "{left:?} {op:?} {right:?}");
        }
    }
}

mod comparison {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numeric_ordering() {
        assert_eq!(evaluate_binary(&num(1.0), &num(2.0), BinaryOp::Lt).unwrap(), Value::Bool(true));
        assert_eq!(evaluate_binary(&num(2.0), &num(2.0), BinaryOp::LtEq).unwrap(), Value::Bool(true));
        assert_eq!(evaluate_binary(&num(1.0), &num(2.0), BinaryOp::Gt).unwrap(), Value::Bool(false));
        assert_eq!(evaluate_binary(&num(2.0), &num(3.0), BinaryOp::GtEq).unwrap(), Value::Bool(false));
    }

    #[test]
    fn string_ordering_is_lexicographic() {
        assert_eq!(evaluate_binary(&s("apple"), &s("b"), BinaryOp::Lt).unwrap(), Value::Bool(true));
        assert_eq!(evaluate_binary(&s("b"), &s("b"), BinaryOp::GtEq).unwrap(), Value::Bool(true));
    }

    #[test]
    fn ordering_other_types_fails() {
        let err = evaluate_binary(&num(1.0), &s("2"), BinaryOp::Lt).unwrap_err();
        assert_eq!(err.kind_name(), "TypeMismatch");
        let err = evaluate_binary(&Value::Null, &Value::Null, BinaryOp::Gt).unwrap_err();
        assert_eq!(err.kind_name(), "TypeMismatch");
    }

    #[test]
    fn equality_across_types_is_false() {
        assert_eq!(evaluate_binary(&num(1.0), &s("1"), BinaryOp::Eq).unwrap(), Value::Bool(false));
        assert_eq!(
            evaluate_binary(&Value::Null, &Value::Bool(false), BinaryOp::NotEq).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn containers_compare_by_reference() {
        let a = Value::array(vec![num(1.0)]);
        let b = Value::array(vec![num(1.0)]);
        assert_eq!(evaluate_binary(&a, &b, BinaryOp::Eq).unwrap(), Value::Bool(false));
        assert_eq!(evaluate_binary(&a, &a, BinaryOp::Eq).unwrap(), Value::Bool(true));
    }
}

#[test]
fn not_inverts_truthiness() {
    assert_eq!(evaluate_not(&Value::Null), Value::Bool(true));
    assert_eq!(evaluate_not(&num(0.0)), Value::Bool(true));
    assert_eq!(evaluate_not(&s("x")), Value::Bool(false));
    assert_eq!(evaluate_not(&Value::array(Vec::new())), Value::Bool(false));
}

proptest! {
    #[test]
    fn number_arithmetic_matches_f64(a in -1e9f64..1e9, b in -1e9f64..1e9) {
        prop_assert_eq!(evaluate_binary(&num(a), &num(b), BinaryOp::Add).unwrap(), num(a + b));
        prop_assert_eq!(evaluate_binary(&num(a), &num(b), BinaryOp::Sub).unwrap(), num(a - b));
        prop_assert_eq!(evaluate_binary(&num(a), &num(b), BinaryOp::Mul).unwrap(), num(a * b));
    }

    #[test]
    fn comparisons_agree_with_f64(a in -1e6f64..1e6, b in -1e6f64..1e6) {
        prop_assert_eq!(evaluate_binary(&num(a), &num(b), BinaryOp::Lt).unwrap(), Value::Bool(a < b));
        prop_assert_eq!(evaluate_binary(&num(a), &num(b), BinaryOp::GtEq).unwrap(), Value::Bool(a >= b));
        prop_assert_eq!(evaluate_binary(&num(a), &num(b), BinaryOp::Eq).unwrap(), Value::Bool(a == b));
    }

    #[test]
    fn eq_and_not_eq_are_complements(a in "[a-c]{0,3}", b in "[a-c]{0,3}") {
        let eq = evaluate_binary(&s(&a), &s(&b), BinaryOp::Eq).unwrap();
        let ne = evaluate_binary(&s(&a), &s(&b), BinaryOp::NotEq).unwrap();
        prop_assert_eq!(eq.is_truthy(), !ne.is_truthy());
    }
}
