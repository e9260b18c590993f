//! Derivatives of the known functions, combined with the chain rule.

use crate::symbolic::expr::SymExpr;
use super::{derivative, SymbolicDerivativeError};

fn n(value: i64) -> SymExpr {
    SymExpr::integer(value)
}

fn square(expr: &SymExpr) -> SymExpr {
    SymExpr::pow(expr.clone(), n(2))
}

/// Returns the derivative of `name(u)` with respect to `u`, or [`None`] if the function has no
/// derivative in closed form.
pub(crate) fn outer_derivative(name: &str, u: &SymExpr) -> Option<SymExpr> {
    let call = |name: &str| SymExpr::call1(name, u.clone());
    let derivative = match name {
        "sin" => call("cos"),
        "cos" => -call("sin"),
        "tan" => n(1) + square(&call("tan")),
        "cot" => -(n(1) + square(&call("cot"))),
        "sec" => call("sec") * call("tan"),
        "csc" => -(call("csc") * call("cot")),
        "asin" => SymExpr::recip(SymExpr::sqrt(n(1) - square(u))),
        "acos" => -SymExpr::recip(SymExpr::sqrt(n(1) - square(u))),
        "atan" => SymExpr::recip(square(u) + n(1)),
        "acot" => -SymExpr::recip(square(u) + n(1)),
        "sinh" => call("cosh"),
        "cosh" => call("sinh"),
        "tanh" => n(1) - square(&call("tanh")),
        "coth" => SymExpr::recip(-square(&call("sinh"))),
        "asinh" => SymExpr::recip(SymExpr::sqrt(square(u) + n(1))),
        "acosh" => SymExpr::recip(SymExpr::sqrt(square(u) - n(1))),
        "atanh" => SymExpr::recip(n(1) - square(u)),
        "exp" => call("exp"),
        "log" => SymExpr::recip(u.clone()),
        "Abs" => call("sign"),
        "erf" => n(2) * call_exp(-square(u)) / SymExpr::sqrt(SymExpr::pi()),
        "Heaviside" => call("DiracDelta"),
        "sign" | "floor" | "ceiling" => n(0),
        _ => return None,
    };
    Some(derivative)
}

fn call_exp(arg: SymExpr) -> SymExpr {
    SymExpr::call1("exp", arg)
}

/// Computes the derivative of a function call and performs the chain rule.
pub(super) fn function_derivative(func: &str, args: &[SymExpr], with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let call = SymExpr::call(func, args.to_vec());
    let [u] = args else {
        return Err(SymbolicDerivativeError::Unsupported);
    };

    match outer_derivative(func, u) {
        Some(outer) => Ok(outer * derivative(u, with)?),
        // f(x) stays as Derivative(f(x), x); f(g(x)) cannot be written without a dummy variable
        None if u.as_symbol() == Some(with) => Ok(SymExpr::Derivative(Box::new(call), vec![with.to_string()])),
        None => Err(SymbolicDerivativeError::Unsupported),
    }
}
