//! Differentiation, integration, sums and products, evaluated or kept unevaluated.

use crate::eval::{
    ctxt::Ctxt,
    error::{invalid, BuiltinError},
    value::Value,
};
use crate::symbolic::{
    derivative::{diff as differentiate, SymbolicDerivativeError},
    expr::Limit,
    integrate::{integrate_limits, integrate_limits_with, manualintegrate as manual},
    summation::{product_limit, sum_limit},
    SymExpr,
};
use super::{builtin, symbol_name, Args, Builtin, BuiltinKind};

/// The most times a single `diff` call may differentiate.
const MAX_DIFF_ORDER: i64 = 100;

/// Reads the variables of `diff(f, x, y)`, `diff(f, x, 2)` or `diff(f, (x, 2))`. With no
/// variables, the only free symbol of `f` is used.
fn diff_vars(args: &Args, f: &SymExpr) -> Result<Vec<String>, BuiltinError> {
    let mut vars: Vec<String> = Vec::new();
    for value in &args.positional[1..] {
        let repeat = |vars: &mut Vec<String>, var: String, times: i64| -> Result<(), BuiltinError> {
            if !(0..=MAX_DIFF_ORDER).contains(&times) {
                return Err(invalid(format!("cannot differentiate {} times", times)));
            }
            vars.extend(std::iter::repeat(var).take(times as usize));
            Ok(())
        };

        if let Some(name) = symbol_name(value) {
            vars.push(name);
        } else if let Some(times) = value.as_expr().and_then(SymExpr::as_i64) {
            let last = vars.last().cloned().ok_or_else(|| invalid("the order of a derivative must follow a variable"))?;
            let times = times.checked_sub(1).ok_or_else(|| invalid(format!("cannot differentiate {} times", times)))?;
            repeat(&mut vars, last, times)?;
        } else {
            match value.sequence().as_deref() {
                Some([var, times]) => {
                    let var = symbol_name(var).ok_or_else(|| args.type_error("a symbol", var))?;
                    let times = times.as_expr().and_then(SymExpr::as_i64).ok_or_else(|| args.type_error("an integer", times))?;
                    repeat(&mut vars, var, times)?;
                },
                _ => return Err(args.type_error("a symbol", value)),
            }
        }
    }
    if vars.is_empty() && args.len() == 1 {
        vars.push(args.implied_symbol(f)?);
    }
    Ok(vars)
}

/// `diff(f, *vars)`
fn diff(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, usize::MAX)?;
    let f = args.expr(0)?;
    let vars = diff_vars(&args, &f)?;
    match differentiate(&f, &vars) {
        Ok(derivative) => Ok(derivative.into()),
        Err(SymbolicDerivativeError::Undifferentiable(expr)) => {
            Err(invalid(format!("cannot differentiate {}", expr)))
        },
        Err(SymbolicDerivativeError::Unsupported) => {
            Ok(SymExpr::Derivative(Box::new(f), vars).into())
        },
    }
}

/// `Derivative(f, *vars)`
fn derivative(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, usize::MAX)?;
    let f = args.expr(0)?;
    let mut vars = diff_vars(&args, &f)?;
    vars.sort();
    Ok(SymExpr::Derivative(Box::new(f), vars).into())
}

/// The ranges of an integral; with none, the indefinite integral over the only free symbol.
fn integral_limits(args: &Args, f: &SymExpr) -> Result<Vec<Limit>, BuiltinError> {
    if args.len() == 1 {
        return Ok(vec![Limit::indefinite(args.implied_symbol(f)?)]);
    }
    args.limits(1)
}

/// `integrate(f, *limits)`
fn integrate(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, usize::MAX)?;
    let f = args.expr(0)?;
    let limits = integral_limits(&args, &f)?;
    Ok(integrate_limits(&f, &limits).into())
}

/// `manualintegrate(f, x)`
fn manualintegrate(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, usize::MAX)?;
    let f = args.expr(0)?;
    let limits = integral_limits(&args, &f)?;
    Ok(integrate_limits_with(&f, &limits, manual).into())
}

/// `Integral(f, *limits)`
fn integral(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, usize::MAX)?;
    let f = args.expr(0)?;
    let limits = integral_limits(&args, &f)?;
    Ok(SymExpr::Integral(Box::new(f), limits).into())
}

/// The single definite range of a sum or product.
fn definite_limit(args: &Args) -> Result<Limit, BuiltinError> {
    args.count(2, 2)?;
    match args.limits(1)?.pop() {
        Some(limit) if limit.bounds.is_some() => Ok(limit),
        _ => Err(invalid(format!("{}() needs a range of the form (var, lower, upper)", args.name))),
    }
}

/// `Sum(f, (k, a, b))`
fn sum(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    let limit = definite_limit(&args)?;
    Ok(SymExpr::Sum(Box::new(args.expr(0)?), Box::new(limit)).into())
}

/// `summation(f, (k, a, b))`
fn summation(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    let limit = definite_limit(&args)?;
    Ok(sum_limit(&args.expr(0)?, &limit).into())
}

/// `Product(f, (k, a, b))`
fn product_class(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    let limit = definite_limit(&args)?;
    Ok(SymExpr::Product(Box::new(args.expr(0)?), Box::new(limit)).into())
}

/// `product(f, (k, a, b))`
fn product(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    let limit = definite_limit(&args)?;
    Ok(product_limit(&args.expr(0)?, &limit).into())
}

pub(super) fn all() -> Vec<Builtin> {
    vec![
        builtin(
            "diff",
            BuiltinKind::Routine,
            "diff(f, *symbols)\n\nDifferentiates f with respect to each symbol in turn. `diff(f, x, 2)` and `diff(f, (x, 2))` take the second derivative. With no symbols, f must have a single free symbol.",
            diff,
        ),
        builtin(
            "Derivative",
            BuiltinKind::Class,
            "Derivative(f, *symbols)\n\nThe derivative of f, left unevaluated. Call .doit() to evaluate it.",
            derivative,
        ),
        builtin(
            "integrate",
            BuiltinKind::Routine,
            "integrate(f, *limits)\n\nIntegrates f. Each limit is a symbol, for an indefinite integral, or a tuple (x, a, b) for the definite integral from a to b. Integrals that cannot be found are returned unevaluated.",
            integrate,
        ),
        builtin(
            "manualintegrate",
            BuiltinKind::Routine,
            "manualintegrate(f, x)\n\nIntegrates f using only the rules a person would apply by hand, such as substitution and integration by parts.",
            manualintegrate,
        ),
        builtin(
            "Integral",
            BuiltinKind::Class,
            "Integral(f, *limits)\n\nThe integral of f, left unevaluated. Call .doit() to evaluate it.",
            integral,
        ),
        builtin(
            "Sum",
            BuiltinKind::Class,
            "Sum(f, (k, a, b))\n\nThe sum of f for k from a to b, left unevaluated. Call .doit() to evaluate it.",
            sum,
        ),
        builtin(
            "summation",
            BuiltinKind::Routine,
            "summation(f, (k, a, b))\n\nThe sum of f for k from a to b, in closed form where possible.",
            summation,
        ),
        builtin(
            "Product",
            BuiltinKind::Class,
            "Product(f, (k, a, b))\n\nThe product of f for k from a to b, left unevaluated. Call .doit() to evaluate it.",
            product_class,
        ),
        builtin(
            "product",
            BuiltinKind::Routine,
            "product(f, (k, a, b))\n\nThe product of f for k from a to b, in closed form where possible.",
            product,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Value {
        SymExpr::symbol("x").into()
    }

    fn args(positional: Vec<Value>) -> Args {
        Args { name: "diff", positional, keywords: vec![] }
    }

    #[test]
    fn derivative_orders() {
        let f = SymExpr::symbol("x");
        let vars = diff_vars(&args(vec![x(), x(), SymExpr::integer(3).into()]), &f).unwrap();
        assert_eq!(vars, vec!["x", "x", "x"]);
        let vars = diff_vars(&args(vec![x(), Value::Tuple(vec![x(), SymExpr::integer(2).into()])]), &f).unwrap();
        assert_eq!(vars, vec!["x", "x"]);
        let vars = diff_vars(&args(vec![x()]), &f).unwrap();
        assert_eq!(vars, vec!["x"]);
        assert!(diff_vars(&args(vec![x(), SymExpr::integer(2).into()]), &f).is_err());
        assert!(diff_vars(&args(vec![x(), x(), SymExpr::integer(i64::MIN).into()]), &f).is_err());
    }

    #[test]
    fn second_derivative() {
        let cube: Value = SymExpr::pow(SymExpr::symbol("x"), SymExpr::integer(3)).into();
        let result = diff(&mut Ctxt::new(), args(vec![cube, x(), SymExpr::integer(2).into()])).unwrap();
        assert_eq!(result.to_string(), "6*x");
    }

    #[test]
    fn sums_need_a_definite_range() {
        let result = summation(&mut Ctxt::new(), Args { name: "summation", positional: vec![x(), x()], keywords: vec![] });
        assert!(result.is_err());
    }
}
