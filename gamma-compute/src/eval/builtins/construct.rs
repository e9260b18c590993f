//! Constructors of numbers, symbols and undefined functions.

use crate::approx::approximate_rational;
use crate::eval::{
    ctxt::Ctxt,
    error::{invalid, BuiltinError, DivisionByZero},
    value::Value,
};
use crate::primitive::{checked_digits, digits_to_prec, int_from_str, DEFAULT_DIGITS, MAX_DIGITS};
use crate::symbolic::{expr::number::Number, SymExpr};
use rug::{Float, Integer, Rational};
use super::{builtin, Args, Builtin, BuiltinKind};

/// Checks that a symbol name is usable: non-empty, and made of letters, digits and underscores.
fn valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Parses a float literal to the given number of digits.
fn parse_float(text: &str, digits: u32) -> Option<Float> {
    Float::parse(text.trim()).ok().map(|parsed| Float::with_val(digits_to_prec(digits), parsed))
}

/// `Symbol('x')`
fn symbol(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    match args.get(0) {
        Some(Value::Str(name)) if valid_name(name) => Ok(SymExpr::symbol(name.as_str()).into()),
        Some(Value::Str(name)) => Err(invalid(format!("'{}' is not a valid symbol name", name))),
        Some(other) => Err(args.type_error("a string", other)),
        None => Err(args.type_error("a string", &Value::None)),
    }
}

/// `symbols('x y z')` or `symbols('x, y')`
fn symbols(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    let Some(Value::Str(names)) = args.get(0) else {
        return Err(args.type_error("a string", args.get(0).unwrap_or(&Value::None)));
    };
    let names = names
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>();
    if let Some(bad) = names.iter().find(|name| !valid_name(name)) {
        return Err(invalid(format!("'{}' is not a valid symbol name", bad)));
    }
    match names.as_slice() {
        [] => Err(invalid("no symbol names were given")),
        [name] => Ok(SymExpr::symbol(*name).into()),
        names => Ok(Value::Tuple(names.iter().map(|name| SymExpr::symbol(*name).into()).collect())),
    }
}

/// `Integer(n)`: truncates numbers, and parses strings.
pub(super) fn integer(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    let value = &args.positional[0];
    let n = match value {
        Value::Str(s) => int_from_str(s).ok_or_else(|| invalid(format!("invalid literal for Integer(): '{}'", s)))?,
        Value::Bool(b) => Integer::from(*b as u8),
        other => match other.as_expr().and_then(SymExpr::as_number) {
            Some(Number::Integer(n)) => n,
            Some(Number::Rational(r)) => r.trunc().numer().clone(),
            Some(Number::Float(f)) => f
                .trunc()
                .to_integer()
                .ok_or_else(|| invalid(format!("cannot convert {} to Integer", other)))?,
            None => return Err(args.type_error("a number or a string", other)),
        },
    };
    Ok(SymExpr::integer(n).into())
}

/// `Float(x, dps=15)`
pub(super) fn float(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 2)?;
    args.keywords_in(&["dps"])?;
    let digits = match args.get(1).or_else(|| args.keyword("dps")) {
        Some(digits) => digits
            .as_expr()
            .and_then(SymExpr::as_i64)
            .and_then(checked_digits)
            .ok_or_else(|| invalid(format!("the number of digits must be between 1 and {}", MAX_DIGITS)))?,
        None => DEFAULT_DIGITS,
    };

    let value = &args.positional[0];
    let f = match value {
        Value::Str(s) => parse_float(s, digits).ok_or_else(|| invalid(format!("could not convert string to Float: '{}'", s)))?,
        other => {
            let number = other
                .as_expr()
                .and_then(SymExpr::as_number)
                .ok_or_else(|| args.type_error("a number or a string", other))?;
            Float::with_val(digits_to_prec(digits), number.to_float(digits_to_prec(digits)))
        },
    };
    Ok(SymExpr::float(f).into())
}

/// `Rational(p, q)`, `Rational('1/3')`, or `Rational(0.25)`.
fn rational(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 2)?;
    let to_rational = |value: &Value| -> Result<Rational, BuiltinError> {
        match value {
            Value::Str(s) => {
                if let Ok(r) = s.trim().parse::<Rational>() {
                    return Ok(r);
                }
                parse_float(s, DEFAULT_DIGITS)
                    .and_then(|f| approximate_rational(&f, 1e-15, 64))
                    .ok_or_else(|| invalid(format!("invalid literal for Rational(): '{}'", s)))
            },
            other => match other.as_expr().and_then(SymExpr::as_number) {
                Some(Number::Float(f)) => approximate_rational(&f, 1e-15, 64)
                    .ok_or_else(|| invalid(format!("cannot convert {} to Rational", other))),
                Some(number) => number
                    .to_rational()
                    .ok_or_else(|| invalid(format!("cannot convert {} to Rational", other))),
                None => Err(args.type_error("a number or a string", other)),
            },
        }
    };

    let numer = to_rational(&args.positional[0])?;
    let value = match args.get(1) {
        Some(denom) => {
            let denom = to_rational(denom)?;
            if denom.cmp0().is_eq() {
                return Err(DivisionByZero.into());
            }
            numer / denom
        },
        None => numer,
    };
    Ok(SymExpr::from_number(value.into()).into())
}

/// `nsimplify(expr)`: replaces every float in the expression with a nearby simple fraction.
fn nsimplify(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    fn go(expr: &SymExpr) -> SymExpr {
        match expr.as_number() {
            Some(Number::Float(f)) => approximate_rational(&f, 1e-10, 32)
                .map(|r| SymExpr::from_number(r.into()))
                .unwrap_or_else(|| expr.clone()),
            _ => expr.map_children(&mut go),
        }
    }
    args.count(1, 1)?;
    Ok(go(&args.expr(0)?).into())
}

/// `Function('f')`
fn function(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    match args.get(0) {
        Some(Value::Str(name)) if valid_name(name) => Ok(Value::UndefFunction(name.clone())),
        Some(Value::Str(name)) => Err(invalid(format!("'{}' is not a valid function name", name))),
        Some(other) => Err(args.type_error("a string", other)),
        None => Err(args.type_error("a string", &Value::None)),
    }
}

/// `S(x)`: converts a value to an expression.
fn sympify(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    match &args.positional[0] {
        Value::Str(s) => {
            if let Some(n) = int_from_str(s) {
                Ok(SymExpr::integer(n).into())
            } else if let Ok(r) = s.trim().parse::<Rational>() {
                Ok(SymExpr::from_number(r.into()).into())
            } else if let Some(f) = parse_float(s, DEFAULT_DIGITS) {
                Ok(SymExpr::float(f).into())
            } else if valid_name(s.trim()) {
                Ok(SymExpr::symbol(s.trim()).into())
            } else {
                Err(invalid(format!("could not convert '{}' to an expression", s)))
            }
        },
        other => args.expr(0).map(Value::from).map_err(|_| args.type_error("an expression", other)),
    }
}

pub(super) fn all() -> Vec<Builtin> {
    vec![
        builtin("Symbol", BuiltinKind::Class, "Symbol(name)\n\nA symbol, such as x, that stands for an unknown quantity.", symbol),
        builtin("symbols", BuiltinKind::Routine, "symbols(names)\n\nCreates several symbols at once from a string of names separated by spaces or commas.", symbols),
        builtin("Integer", BuiltinKind::Class, "Integer(n)\n\nAn exact integer of any size.", integer),
        builtin("Float", BuiltinKind::Class, "Float(x, dps=15)\n\nA floating-point number with the given number of significant digits.", float),
        builtin("Rational", BuiltinKind::Class, "Rational(p, q=1)\n\nThe exact fraction p/q, reduced to lowest terms.", rational),
        builtin("nsimplify", BuiltinKind::Routine, "nsimplify(expr)\n\nReplaces the floating-point numbers in expr with simple fractions close to them.", nsimplify),
        builtin("Function", BuiltinKind::Class, "Function(name)\n\nAn undefined function, such as f, which can be applied to arguments: f(x).", function),
        builtin("S", BuiltinKind::Routine, "S(x)\n\nConverts x to an expression. Strings are read as numbers or symbol names.", sympify),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn call(f: fn(&mut Ctxt, Args) -> Result<Value, BuiltinError>, positional: Vec<Value>) -> Result<Value, BuiltinError> {
        f(&mut Ctxt::new(), Args { name: "test", positional, keywords: vec![] })
    }

    #[test]
    fn symbols_from_string() {
        let value = call(symbols, vec![Value::from("x y,z")]).unwrap();
        assert_eq!(value.to_string(), "(x, y, z)");
        assert!(call(symbol, vec![Value::from("a b")]).is_err());
    }

    #[test]
    fn numbers() {
        assert_eq!(call(integer, vec![Value::from("-12")]).unwrap(), SymExpr::integer(-12).into());
        assert_eq!(
            call(rational, vec![SymExpr::integer(2).into(), SymExpr::integer(4).into()]).unwrap(),
            SymExpr::rational(1, 2).into(),
        );
        assert!(call(rational, vec![SymExpr::integer(1).into(), SymExpr::zero().into()]).is_err());
        assert_eq!(call(float, vec![Value::from("2e3")]).unwrap().to_string(), "2000.00000000000");
    }

    #[test]
    fn float_digits_are_bounded() {
        let one: Value = SymExpr::integer(1).into();
        for digits in [0, 10_001, 1_000_000_000, 4_294_967_295_i64] {
            assert!(call(float, vec![one.clone(), SymExpr::integer(digits).into()]).is_err(), "{}", digits);
        }
        assert!(call(float, vec![one, SymExpr::integer(20).into()]).is_ok());
    }

    #[test]
    fn simple_fractions() {
        let value = call(rational, vec![Value::from("0.25")]).unwrap();
        assert_eq!(value, SymExpr::rational(1, 4).into());
    }
}
