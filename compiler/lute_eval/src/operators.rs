//! Binary and unary operator evaluation.
//!
//! Direct enum dispatch over the (left, right) variant space; the
//! value set is closed, so pattern matching keeps every combination
//! explicit and the compiler keeps it exhaustive. Unsupported
//! combinations fail naming both operand types and the operator.
//!
//! Two handlers are intentionally dead ends: the parser desugars
//! `a - b` to `a + (-b)` and `a != b` to `!(a == b)`, so a `Sub` or
//! `NotEq` reaching evaluation is a parser defect and reports as an
//! internal error, never a user-facing condition. Likewise `&&`/`||`
//! are short-circuited by the evaluator before operand values exist,
//! so they never arrive here.

use std::rc::Rc;

use lute_ir::{BinaryOp, StringInterner, UnaryOp};

use crate::errors::{
    division_by_zero, internal, invalid_operand, invalid_unary_operand, EvalResult,
};
use crate::value::Value;

/// Evaluate a binary operator over two values.
pub fn evaluate_binary(
    op: BinaryOp,
    lhs: Value,
    rhs: Value,
    interner: &StringInterner,
) -> EvalResult {
    match op {
        BinaryOp::Add => eval_add(lhs, rhs, interner),
        BinaryOp::Mul => eval_mul(lhs, rhs, interner),
        BinaryOp::Div => eval_div(lhs, rhs, interner),
        BinaryOp::Mod => eval_mod(lhs, rhs, interner),
        BinaryOp::Eq => Ok(Value::Bool(value_eq(&lhs, &rhs))),
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => {
            eval_comparison(op, lhs, rhs, interner)
        }
        BinaryOp::Sub => Err(internal(
            "subtraction reached the evaluator; the parser must desugar `a - b` to `a + (-b)`",
        )),
        BinaryOp::NotEq => Err(internal(
            "not-equal reached the evaluator; the parser must desugar `a != b` to `!(a == b)`",
        )),
        BinaryOp::And | BinaryOp::Or => Err(internal(
            "short-circuit operators must be evaluated inline, not dispatched by value",
        )),
    }
}

/// Evaluate a unary operator.
pub fn evaluate_unary(op: UnaryOp, operand: Value, interner: &StringInterner) -> EvalResult {
    match (op, operand) {
        (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (op, operand) => Err(invalid_unary_operand(
            op.symbol(),
            operand.describe_type(interner),
        )),
    }
}

/// Addition.
///
/// Same-type cases: Int+Int, Float+Float, String+String (concat),
/// Tuple+Tuple (concat). Bool widens to its integer value (true = 1)
/// when mixed with Int or Float; Int widens to Float when mixed with
/// Float. Bool+Bool is not a defined case. String combines only with
/// String.
fn eval_add(lhs: Value, rhs: Value, interner: &StringInterner) -> EvalResult {
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(int_to_float(*a) + b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + int_to_float(*b))),
        (Value::Bool(a), Value::Int(b)) => Ok(Value::Int(i64::from(*a).wrapping_add(*b))),
        (Value::Int(a), Value::Bool(b)) => Ok(Value::Int(a.wrapping_add(i64::from(*b)))),
        (Value::Bool(a), Value::Float(b)) => Ok(Value::Float(f64::from(*a) + b)),
        (Value::Float(a), Value::Bool(b)) => Ok(Value::Float(a + f64::from(*b))),
        (Value::Str(a), Value::Str(b)) => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Ok(Value::string(s))
        }
        (Value::Tuple(a), Value::Tuple(b)) => {
            let items: Vec<Value> = a.iter().chain(b.iter()).cloned().collect();
            Ok(Value::Tuple(items.into()))
        }
        _ => Err(operand_error("+", &lhs, &rhs, interner)),
    }
}

/// Multiplication.
///
/// Numeric combinations widen like addition. String×Int (either
/// order) is string repetition; a zero or negative count yields the
/// empty string.
fn eval_mul(lhs: Value, rhs: Value, interner: &StringInterner) -> EvalResult {
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(int_to_float(*a) * b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a * int_to_float(*b))),
        (Value::Bool(a), Value::Int(b)) => Ok(Value::Int(i64::from(*a).wrapping_mul(*b))),
        (Value::Int(a), Value::Bool(b)) => Ok(Value::Int(a.wrapping_mul(i64::from(*b)))),
        (Value::Bool(a), Value::Float(b)) => Ok(Value::Float(f64::from(*a) * b)),
        (Value::Float(a), Value::Bool(b)) => Ok(Value::Float(a * f64::from(*b))),
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
            Ok(Value::Str(repeat_str(s, *n)))
        }
        _ => Err(operand_error("*", &lhs, &rhs, interner)),
    }
}

/// Division always produces Float and never truncates. Any numeric or
/// boolean operand combination is accepted; a (float-converted)
/// denominator of exactly zero fails for all of them alike. Strings
/// are never valid.
fn eval_div(lhs: Value, rhs: Value, interner: &StringInterner) -> EvalResult {
    let (Some(a), Some(b)) = (numeric_as_float(&lhs), numeric_as_float(&rhs)) else {
        return Err(operand_error("/", &lhs, &rhs, interner));
    };
    if b == 0.0 {
        return Err(division_by_zero());
    }
    Ok(Value::Float(a / b))
}

/// Modulo is defined only for Int % Int.
fn eval_mod(lhs: Value, rhs: Value, interner: &StringInterner) -> EvalResult {
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => {
            if *b == 0 {
                Err(division_by_zero())
            } else {
                Ok(Value::Int(a.wrapping_rem(*b)))
            }
        }
        _ => Err(operand_error("%", &lhs, &rhs, interner)),
    }
}

/// Ordering comparisons: numeric pairs (Int/Float, widened when
/// mixed) and String/String (lexicographic).
fn eval_comparison(op: BinaryOp, lhs: Value, rhs: Value, interner: &StringInterner) -> EvalResult {
    let ordering = match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => int_to_float(*a).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&int_to_float(*b)),
        (Value::Str(a), Value::Str(b)) => Some(a.as_ref().cmp(b.as_ref())),
        _ => return Err(operand_error(op.symbol(), &lhs, &rhs, interner)),
    };
    // NaN comparisons are simply false, like the host's.
    let result = ordering.is_some_and(|ord| match op {
        BinaryOp::Lt => ord.is_lt(),
        BinaryOp::Gt => ord.is_gt(),
        BinaryOp::LtEq => ord.is_le(),
        BinaryOp::GtEq => ord.is_ge(),
        _ => false,
    });
    Ok(Value::Bool(result))
}

/// The language's `==`.
///
/// Same-variant comparisons are structural. Int/Float and Bool with
/// Int or Float compare by numeric coercion; every other cross-type
/// pairing is `false` rather than an error. Nothing equals only
/// Nothing, and function values are never equal. The asymmetry
/// (Bool==Int coerces, Bool==String is false) is deliberate.
pub fn value_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(a), Value::Float(b)) => int_to_float(*a) == *b,
        (Value::Float(a), Value::Int(b)) => *a == int_to_float(*b),
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Bool(a), Value::Int(b)) => i64::from(*a) == *b,
        (Value::Int(a), Value::Bool(b)) => *a == i64::from(*b),
        (Value::Bool(a), Value::Float(b)) => f64::from(*a) == *b,
        (Value::Float(a), Value::Bool(b)) => *a == f64::from(*b),
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Nothing, Value::Nothing) => true,
        (Value::Array(a), Value::Array(b)) => {
            let xs = a.snapshot();
            let ys = b.snapshot();
            xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| value_eq(x, y))
        }
        (Value::Tuple(a), Value::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| value_eq(x, y))
        }
        (Value::Struct(a), Value::Struct(b)) => {
            if a.name != b.name {
                return false;
            }
            let xs = a.fields();
            let ys = b.fields();
            xs.len() == ys.len()
                && xs.iter().all(|(name, x)| {
                    ys.iter()
                        .find(|(other, _)| other == name)
                        .is_some_and(|(_, y)| value_eq(x, y))
                })
        }
        _ => false,
    }
}

fn operand_error(
    op: &str,
    lhs: &Value,
    rhs: &Value,
    interner: &StringInterner,
) -> crate::errors::EvalError {
    invalid_operand(
        op,
        lhs.describe_type(interner),
        rhs.describe_type(interner),
    )
}

#[allow(clippy::cast_precision_loss)]
fn int_to_float(n: i64) -> f64 {
    n as f64
}

/// Float view of numeric and boolean values; `None` for everything
/// else.
fn numeric_as_float(v: &Value) -> Option<f64> {
    match v {
        Value::Int(n) => Some(int_to_float(*n)),
        Value::Float(x) => Some(*x),
        Value::Bool(b) => Some(f64::from(*b)),
        _ => None,
    }
}

fn repeat_str(s: &Rc<str>, n: i64) -> Rc<str> {
    if n <= 0 {
        return Rc::from("");
    }
    let count = usize::try_from(n).unwrap_or(0);
    Rc::from(s.repeat(count))
}
