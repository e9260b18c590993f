//! Operators on values.
//!
//! Arithmetic on expressions builds new expressions in canonical form, so `x + x` is `2*x` and
//! `1/2 + 1/3` is `5/6`. `==` and `!=` compare structurally and always give a plain boolean, while
//! `<`, `<=`, `>` and `>=` build relations that fold to `True` or `False` only when both sides are
//! numbers. `&`, `|`, `^` and `~` are bitwise on integers and logical on anything else.

use crate::symbolic::{expr::RelOp, SymExpr};
use gamma_parser::parser::token::op::{BinOpKind, UnaryOpKind};
use rug::Integer;
use super::{
    error::{
        invalid,
        BuiltinError,
        DivisionByZero,
        InvalidBinaryOperation,
        InvalidUnaryOperation,
        UndecidableTruth,
    },
    value::Value,
};

/// The longest string or list repetition may produce.
const MAX_REPEAT_LEN: usize = 1 << 20;

/// Returns the source form of the operator, used in error messages.
fn op_symbol(op: BinOpKind) -> &'static str {
    match op {
        BinOpKind::Pow => "**",
        BinOpKind::Mul => "*",
        BinOpKind::Div => "/",
        BinOpKind::FloorDiv => "//",
        BinOpKind::Mod => "%",
        BinOpKind::Add => "+",
        BinOpKind::Sub => "-",
        BinOpKind::BitAnd => "&",
        BinOpKind::BitXor => "^",
        BinOpKind::BitOr => "|",
        BinOpKind::Greater => ">",
        BinOpKind::GreaterEq => ">=",
        BinOpKind::Less => "<",
        BinOpKind::LessEq => "<=",
        BinOpKind::Eq => "==",
        BinOpKind::NotEq => "!=",
        BinOpKind::In => "in",
        BinOpKind::And => "and",
        BinOpKind::Or => "or",
    }
}

/// Decides the truth of a value in a condition.
///
/// Relations and logical formulas that did not fold to `True` or `False` have no truth value, and
/// using one as a condition is an error.
pub fn truthy(value: &Value) -> Result<bool, BuiltinError> {
    Ok(match value {
        Value::Bool(b) => *b,
        Value::None => false,
        Value::Str(s) => !s.is_empty(),
        Value::List(items) => !items.borrow().is_empty(),
        Value::Tuple(items) => !items.is_empty(),
        Value::Dict(entries) => !entries.is_empty(),
        Value::Expr(expr) => match (expr.as_boolean(), expr.as_number()) {
            (Some(b), _) => b,
            (None, Some(n)) => !n.is_zero(),
            (None, None) if expr.is_boolean_valued() => {
                return Err(UndecidableTruth { class: expr.class_name() }.into());
            },
            (None, None) => true,
        },
        Value::Builtin(_) | Value::Function(_) | Value::UndefFunction(_) | Value::BoundMethod(..) => true,
    })
}

/// Repeats a sequence `times` times.
fn repeat<T: Clone>(items: &[T], times: &Value) -> Option<Result<Vec<T>, BuiltinError>> {
    let times = times.as_expr()?.as_i64()?.max(0) as usize;
    if items.len().saturating_mul(times) > MAX_REPEAT_LEN {
        return Some(Err(invalid("the repeated sequence would be too long")));
    }
    Some(Ok(items.iter().cloned().cycle().take(items.len() * times).collect()))
}

/// Integer operands of a bitwise operator.
fn integers<'a>(lhs: &'a Value, rhs: &'a Value) -> Option<(&'a Integer, &'a Integer)> {
    Some((lhs.as_expr()?.as_integer()?, rhs.as_expr()?.as_integer()?))
}

/// Floor division `//` and remainder `%` on numbers.
fn floor_div_mod(op: BinOpKind, lhs: &SymExpr, rhs: &SymExpr) -> Result<SymExpr, BuiltinError> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => {
            let (q, r) = a.div_mod(&b).ok_or(DivisionByZero)?;
            Ok(SymExpr::from_number(if op == BinOpKind::FloorDiv { q } else { r }))
        },
        _ if rhs.is_zero() => Err(DivisionByZero.into()),
        _ if op == BinOpKind::FloorDiv => Ok(SymExpr::call1("floor", lhs.clone() / rhs.clone())),
        _ => Ok(SymExpr::call("Mod", vec![lhs.clone(), rhs.clone()])),
    }
}

/// Applies a binary operator. `and` and `or` short-circuit, so they are evaluated by the caller.
pub fn binary(op: BinOpKind, lhs: Value, rhs: Value) -> Result<Value, BuiltinError> {
    let unsupported = |lhs: &Value, rhs: &Value| -> BuiltinError {
        InvalidBinaryOperation { op: op_symbol(op), left: lhs.typename(), right: rhs.typename() }.into()
    };

    match op {
        BinOpKind::Eq => return Ok(Value::Bool(lhs == rhs)),
        BinOpKind::NotEq => return Ok(Value::Bool(lhs != rhs)),
        BinOpKind::In => {
            return match &rhs {
                Value::Str(haystack) => match &lhs {
                    Value::Str(needle) => Ok(Value::Bool(haystack.contains(needle.as_str()))),
                    _ => Err(unsupported(&lhs, &rhs)),
                },
                Value::Dict(entries) => Ok(Value::Bool(entries.iter().any(|(key, _)| *key == lhs))),
                other => match other.sequence() {
                    Some(items) => Ok(Value::Bool(items.contains(&lhs))),
                    None => Err(unsupported(&lhs, &rhs)),
                },
            };
        },
        _ => {},
    }

    // sequences and strings
    match (op, &lhs, &rhs) {
        (BinOpKind::Add, Value::Str(a), Value::Str(b)) => return Ok(Value::Str(format!("{}{}", a, b))),
        (BinOpKind::Add, Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            return Ok(Value::list(items));
        },
        (BinOpKind::Add, Value::Tuple(a), Value::Tuple(b)) => {
            return Ok(Value::Tuple(a.iter().chain(b).cloned().collect()));
        },
        (BinOpKind::Mul, Value::Str(s), times) | (BinOpKind::Mul, times, Value::Str(s)) => {
            if let Some(chars) = repeat(s.chars().collect::<Vec<_>>().as_slice(), times) {
                return Ok(Value::Str(chars?.into_iter().collect()));
            }
        },
        (BinOpKind::Mul, Value::List(items), times) | (BinOpKind::Mul, times, Value::List(items)) => {
            if let Some(items) = repeat(items.borrow().as_slice(), times) {
                return Ok(Value::list(items?));
            }
        },
        (BinOpKind::Mul, Value::Tuple(items), times) | (BinOpKind::Mul, times, Value::Tuple(items)) => {
            if let Some(items) = repeat(items.as_slice(), times) {
                return Ok(Value::Tuple(items?));
            }
        },
        (BinOpKind::Less | BinOpKind::LessEq | BinOpKind::Greater | BinOpKind::GreaterEq, Value::Str(a), Value::Str(b)) => {
            let ordering = a.cmp(b);
            return Ok(Value::Bool(match op {
                BinOpKind::Less => ordering.is_lt(),
                BinOpKind::LessEq => ordering.is_le(),
                BinOpKind::Greater => ordering.is_gt(),
                _ => ordering.is_ge(),
            }));
        },
        _ => {},
    }

    // bitwise operators on integers and booleans
    if matches!(op, BinOpKind::BitAnd | BinOpKind::BitOr | BinOpKind::BitXor) {
        if let (Value::Bool(a), Value::Bool(b)) = (&lhs, &rhs) {
            return Ok(Value::Bool(match op {
                BinOpKind::BitAnd => a & b,
                BinOpKind::BitOr => a | b,
                _ => a ^ b,
            }));
        }
        if let Some((a, b)) = integers(&lhs, &rhs) {
            let result = match op {
                BinOpKind::BitAnd => Integer::from(a & b),
                BinOpKind::BitOr => Integer::from(a | b),
                _ => Integer::from(a ^ b),
            };
            return Ok(SymExpr::integer(result).into());
        }
    }

    let (Some(a), Some(b)) = (lhs.to_expr(), rhs.to_expr()) else {
        return Err(unsupported(&lhs, &rhs));
    };
    let result = match op {
        BinOpKind::Add => a + b,
        BinOpKind::Sub => a - b,
        BinOpKind::Mul => a * b,
        BinOpKind::Div => a / b,
        BinOpKind::Pow => SymExpr::pow(a, b),
        BinOpKind::FloorDiv | BinOpKind::Mod => floor_div_mod(op, &a, &b)?,
        BinOpKind::Less => SymExpr::relational(RelOp::Lt, a, b),
        BinOpKind::LessEq => SymExpr::relational(RelOp::Le, a, b),
        BinOpKind::Greater => SymExpr::relational(RelOp::Gt, a, b),
        BinOpKind::GreaterEq => SymExpr::relational(RelOp::Ge, a, b),
        BinOpKind::BitAnd => SymExpr::and(vec![a, b]),
        BinOpKind::BitOr => SymExpr::or(vec![a, b]),
        BinOpKind::BitXor => SymExpr::xor(vec![a, b]),
        BinOpKind::Eq | BinOpKind::NotEq | BinOpKind::In | BinOpKind::And | BinOpKind::Or => {
            return Err(unsupported(&lhs, &rhs));
        },
    };
    Ok(result.into())
}

/// Applies a unary operator.
pub fn unary(op: UnaryOpKind, operand: Value) -> Result<Value, BuiltinError> {
    let unsupported = |symbol: &'static str| -> BuiltinError {
        InvalidUnaryOperation { op: symbol, operand: operand.typename() }.into()
    };
    match op {
        UnaryOpKind::Not => Ok(Value::Bool(!truthy(&operand)?)),
        UnaryOpKind::Invert => match &operand {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            Value::Expr(expr) => match expr.as_integer() {
                Some(n) => Ok(SymExpr::integer(Integer::from(!n)).into()),
                None => Ok(SymExpr::not(expr.clone()).into()),
            },
            _ => Err(unsupported("~")),
        },
        UnaryOpKind::Neg => operand.to_expr().map(|expr| (-expr).into()).ok_or_else(|| unsupported("-")),
        UnaryOpKind::Pos => operand.to_expr().map(Value::from).ok_or_else(|| unsupported("+")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn int(n: i64) -> Value {
        SymExpr::integer(n).into()
    }

    fn x() -> Value {
        SymExpr::symbol("x").into()
    }

    #[test]
    fn exact_arithmetic() {
        assert_eq!(binary(BinOpKind::Div, int(1), int(2)).unwrap().to_string(), "1/2");
        assert_eq!(binary(BinOpKind::Add, x(), x()).unwrap().to_string(), "2*x");
        assert_eq!(binary(BinOpKind::Pow, int(2), int(10)).unwrap(), int(1024));
    }

    #[test]
    fn floor_division() {
        assert_eq!(binary(BinOpKind::FloorDiv, int(-7), int(2)).unwrap(), int(-4));
        assert_eq!(binary(BinOpKind::Mod, int(-7), int(2)).unwrap(), int(1));
        assert!(binary(BinOpKind::Mod, int(1), int(0)).is_err());
    }

    #[test]
    fn comparisons() {
        assert_eq!(binary(BinOpKind::Eq, x(), x()).unwrap(), Value::Bool(true));
        assert_eq!(binary(BinOpKind::Less, int(1), int(2)).unwrap(), Value::Bool(true));
        let relation = binary(BinOpKind::Less, x(), int(2)).unwrap();
        assert_eq!(relation.to_string(), "x < 2");
        assert!(truthy(&relation).is_err());
    }

    #[test]
    fn sequences() {
        let list = Value::list(vec![int(1)]);
        assert_eq!(binary(BinOpKind::Mul, list, int(3)).unwrap().to_string(), "[1, 1, 1]");
        assert_eq!(binary(BinOpKind::Add, Value::from("a"), Value::from("b")).unwrap(), Value::from("ab"));
        assert!(binary(BinOpKind::Sub, Value::from("a"), int(1)).is_err());
        assert_eq!(binary(BinOpKind::In, int(1), Value::Tuple(vec![int(1)])).unwrap(), Value::Bool(true));
    }

    #[test]
    fn bitwise_and_logic() {
        assert_eq!(binary(BinOpKind::BitAnd, int(6), int(3)).unwrap(), int(2));
        assert_eq!(binary(BinOpKind::BitXor, int(6), int(3)).unwrap(), int(5));
        let formula = binary(BinOpKind::BitOr, x(), SymExpr::symbol("y").into()).unwrap();
        assert_eq!(formula.typename(), "Or");
        assert_eq!(unary(UnaryOpKind::Invert, int(0)).unwrap(), int(-1));
    }
}
