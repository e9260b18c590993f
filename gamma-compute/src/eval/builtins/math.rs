//! Elementary and special functions. Applying one builds a [`SymExpr`] call, which reduces on its
//! own to a simpler form where possible, so `sin(pi/6)` is `1/2` and `sin(x)` stays `sin(x)`.

use crate::symbolic::{expr::call::KNOWN_FUNCTIONS, SymExpr};
use super::{builtin, Args, Builtin, BuiltinKind};
use crate::eval::{ctxt::Ctxt, error::BuiltinError, value::Value};

/// Documentation of the mathematical functions.
const DOCS: &[(&str, &str)] = &[
    ("exp", "exp(x)\n\nThe exponential function, E**x."),
    ("log", "log(x, base=E)\n\nThe logarithm of x. With one argument, the natural logarithm; `ln` is the same function."),
    ("sin", "sin(x)\n\nThe sine of x, in radians."),
    ("cos", "cos(x)\n\nThe cosine of x, in radians."),
    ("tan", "tan(x)\n\nThe tangent of x, in radians."),
    ("cot", "cot(x)\n\nThe cotangent of x, in radians."),
    ("sec", "sec(x)\n\nThe secant of x, in radians."),
    ("csc", "csc(x)\n\nThe cosecant of x, in radians."),
    ("asin", "asin(x)\n\nThe inverse sine of x."),
    ("acos", "acos(x)\n\nThe inverse cosine of x."),
    ("atan", "atan(x)\n\nThe inverse tangent of x."),
    ("acot", "acot(x)\n\nThe inverse cotangent of x."),
    ("sinh", "sinh(x)\n\nThe hyperbolic sine of x."),
    ("cosh", "cosh(x)\n\nThe hyperbolic cosine of x."),
    ("tanh", "tanh(x)\n\nThe hyperbolic tangent of x."),
    ("coth", "coth(x)\n\nThe hyperbolic cotangent of x."),
    ("asinh", "asinh(x)\n\nThe inverse hyperbolic sine of x."),
    ("acosh", "acosh(x)\n\nThe inverse hyperbolic cosine of x."),
    ("atanh", "atanh(x)\n\nThe inverse hyperbolic tangent of x."),
    ("Abs", "Abs(x)\n\nThe absolute value of x."),
    ("sign", "sign(x)\n\nThe sign of x: 1, 0 or -1 for real numbers."),
    ("floor", "floor(x)\n\nThe largest integer not greater than x."),
    ("ceiling", "ceiling(x)\n\nThe smallest integer not less than x."),
    ("factorial", "factorial(n)\n\nThe product of the positive integers up to n, written n!."),
    ("factorial2", "factorial2(n)\n\nThe double factorial n!!, the product of every other integer down from n."),
    ("binomial", "binomial(n, k)\n\nThe number of ways to choose k items out of n."),
    ("gamma", "gamma(x)\n\nThe gamma function, which extends the factorial: gamma(n) = (n - 1)!."),
    ("re", "re(z)\n\nThe real part of z."),
    ("im", "im(z)\n\nThe imaginary part of z."),
    ("arg", "arg(z)\n\nThe argument of the complex number z."),
    ("conjugate", "conjugate(z)\n\nThe complex conjugate of z."),
    ("Max", "Max(*args)\n\nThe largest of the arguments, where it can be determined."),
    ("Min", "Min(*args)\n\nThe smallest of the arguments, where it can be determined."),
    ("erf", "erf(x)\n\nThe Gauss error function."),
    ("Heaviside", "Heaviside(x)\n\nThe Heaviside step function: 0 for negative x, 1 for positive x."),
    ("DiracDelta", "DiracDelta(x)\n\nThe Dirac delta function, zero everywhere except at x = 0."),
];

/// The number of arguments a mathematical function takes.
fn arity(name: &str) -> (usize, usize) {
    match name {
        "log" => (1, 2),
        "binomial" => (2, 2),
        "Max" | "Min" => (1, usize::MAX),
        _ => (1, 1),
    }
}

/// Applies the mathematical function the builtin was called as.
fn apply(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    let (min, max) = arity(args.name);
    args.count(min, max)?;
    args.keywords_in(&[])?;
    Ok(SymExpr::call(args.name, args.exprs()?).into())
}

/// `sqrt(x)`
fn sqrt(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    Ok(SymExpr::sqrt(args.expr(0)?).into())
}

/// `cbrt(x)`
fn cbrt(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    Ok(SymExpr::pow_rational(args.expr(0)?, 1, 3).into())
}

/// `root(x, n)`
fn root(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(2, 2)?;
    Ok(SymExpr::call("root", vec![args.expr(0)?, args.expr(1)?]).into())
}

pub(super) fn all() -> Vec<Builtin> {
    let mut builtins = KNOWN_FUNCTIONS
        .iter()
        .map(|&name| {
            let doc = DOCS.iter().find(|(n, _)| *n == name).map_or("", |(_, doc)| doc);
            builtin(name, BuiltinKind::MathFunction, doc, apply)
        })
        .collect::<Vec<_>>();
    builtins.extend([
        builtin("sqrt", BuiltinKind::Routine, "sqrt(x)\n\nThe principal square root of x, x**(1/2).", sqrt),
        builtin("cbrt", BuiltinKind::Routine, "cbrt(x)\n\nThe principal cube root of x, x**(1/3).", cbrt),
        builtin("root", BuiltinKind::Routine, "root(x, n)\n\nThe principal n-th root of x, x**(1/n).", root),
    ]);
    builtins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_function_is_documented() {
        for name in KNOWN_FUNCTIONS {
            assert!(DOCS.iter().any(|(n, _)| n == name), "{} has no documentation", name);
        }
    }
}
