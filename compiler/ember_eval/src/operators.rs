//! Binary and unary operator implementations.
//!
//! Each operator is an explicit match over the operand variant pair. The
//! legal combinations are:
//!
//! - number `op` number: IEEE arithmetic (`x / 0` is an infinity or NaN, not
//!   an error) and numeric ordering
//! - string `+` string: concatenation; string `<`/`>`/...: lexicographic
//! - string `+` null/boolean/number (either side): concatenation of the
//!   scalar's printed form
//! - any `==`/`!=` any: [`Value::strict_eq`]
//!
//! Everything else is a `TypeMismatch`.

use std::cmp::Ordering;

use ember_ir::BinaryOp;

use crate::errors::binary_type_mismatch;
use crate::{EvalResult, Value};

/// Evaluate a binary operation on two already-evaluated operands.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(left.strict_eq(right))),
        BinaryOp::NotEq => return Ok(Value::Bool(!left.strict_eq(right))),
        _ => {}
    }
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(eval_number_binary(*a, *b, op)),
        (Value::Str(a), Value::Str(b)) => eval_string_binary(a, b, op)
            .ok_or_else(|| binary_type_mismatch(op, left, right)),
        (Value::Str(a), scalar) if op == BinaryOp::Add && scalar.is_scalar() => {
            Ok(Value::string(format!("{a}{scalar}")))
        }
        (scalar, Value::Str(b)) if op == BinaryOp::Add && scalar.is_scalar() => {
            Ok(Value::string(format!("{scalar}{b}")))
        }
        _ => Err(binary_type_mismatch(op, left, right)),
    }
}

fn eval_number_binary(a: f64, b: f64, op: BinaryOp) -> Value {
    match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Sub => Value::Number(a - b),
        BinaryOp::Mul => Value::Number(a * b),
        BinaryOp::Div => Value::Number(a / b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        // Equality is exact; `evaluate_binary` normally answers it first.
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
    }
}

/// `None` for operators strings do not support.
fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> Option<Value> {
    let ordering = a.cmp(b);
    Some(match op {
        BinaryOp::Add => Value::string(format!("{a}{b}")),
        BinaryOp::Lt => Value::Bool(ordering == Ordering::Less),
        BinaryOp::LtEq => Value::Bool(ordering != Ordering::Greater),
        BinaryOp::Gt => Value::Bool(ordering == Ordering::Greater),
        BinaryOp::GtEq => Value::Bool(ordering != Ordering::Less),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => return None,
    })
}

/// Logical negation: boolean coercion, inverted.
pub fn evaluate_not(operand: &Value) -> Value {
    Value::Bool(!operand.is_truthy())
}
