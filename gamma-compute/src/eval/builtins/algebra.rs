//! Simplification, equation solving and number theory.

use crate::eval::{
    ctxt::Ctxt,
    error::{invalid, not_implemented, BuiltinError},
    value::Value,
};
use crate::primitive::{checked_digits, DEFAULT_DIGITS, MAX_DIGITS};
use crate::symbolic::{
    evalf::evalf,
    minpoly::minpoly as minimal_polynomial,
    ntheory,
    poly,
    simplify::{fraction, simplify as simplify_expr},
    solve::{rsolve as solve_recurrence, solve as solve_equation, SolveError},
    SymExpr,
};
use super::{builtin, symbol_name, Args, Builtin, BuiltinKind};

/// Defines a builtin that applies a function of one expression.
macro_rules! unary {
    ($name:ident, $f:expr) => {
        fn $name(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
            args.count(1, 1)?;
            Ok($f(&args.expr(0)?).into())
        }
    };
}

unary!(simplify, simplify_expr);
unary!(expand, poly::expand);
unary!(factor, poly::factor);
unary!(cancel, fraction::cancel);
unary!(together, fraction::together);

/// `apart(f, x)`
fn apart(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 2)?;
    let f = args.expr(0)?;
    let var = if args.len() == 2 { args.symbol(1)? } else { args.implied_symbol(&f)? };
    fraction::apart(&f, &var)
        .map(Value::from)
        .ok_or_else(|| not_implemented(format!("cannot decompose {} into partial fractions", f)))
}

/// `N(expr, n=15)`
fn numeric(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 2)?;
    let digits = if args.len() == 2 {
        checked_digits(args.int(1)?)
            .ok_or_else(|| invalid(format!("the number of digits must be between 1 and {}", MAX_DIGITS)))?
    } else {
        DEFAULT_DIGITS
    };
    Ok(evalf(&args.expr(0)?, digits).into())
}

/// `solve(equation, x)`: the list of solutions.
fn solve(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 2)?;
    let equation = args.expr(0)?;
    let var = if args.len() == 2 { args.symbol(1)? } else { args.implied_symbol(&equation)? };
    match solve_equation(&equation, &var) {
        Ok(solutions) => Ok(Value::list(solutions.into_iter().map(Value::from).collect())),
        Err(SolveError::Unsupported) => Err(not_implemented(format!("could not solve {} for {}", equation, var))),
        Err(SolveError::NotAnEquation(expr)) => Err(invalid(format!("{} is not an equation", expr))),
    }
}

/// Reads the function call `y(n)` a recurrence is solved for.
fn recurrence_function(args: &Args) -> Result<(String, String), BuiltinError> {
    let value = &args.positional[1];
    value
        .as_expr()
        .and_then(SymExpr::as_call)
        .and_then(|(name, call_args)| match call_args {
            [arg] => Some((name.to_string(), arg.as_symbol()?.to_string())),
            _ => None,
        })
        .ok_or_else(|| args.type_error("a function applied to a symbol, such as y(n)", value))
}

/// `rsolve(recurrence, y(n), {y(0): a, y(1): b})`. Recurrences it cannot solve give `None`.
fn rsolve(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(2, 3)?;
    let recurrence = args.expr(0)?;
    let (function, var) = recurrence_function(&args)?;

    let initial = match args.get(2) {
        Some(Value::Dict(entries)) => entries
            .iter()
            .map(|(key, value)| {
                let index = key
                    .as_expr()
                    .and_then(|key| key.call_arg(&function))
                    .and_then(SymExpr::as_i64)
                    .ok_or_else(|| invalid(format!("{} is not an initial value of {}", key, function)))?;
                let value = value.to_expr().ok_or_else(|| args.type_error("an expression", value))?;
                Ok((index, value))
            })
            .collect::<Result<Vec<_>, BuiltinError>>()?,
        Some(other) => return Err(args.type_error("a dict of initial values", other)),
        None => Vec::new(),
    };

    match solve_recurrence(&recurrence, &function, &var, &initial) {
        Ok(solution) => Ok(solution.into()),
        Err(SolveError::Unsupported) => Ok(Value::None),
        Err(SolveError::NotAnEquation(expr)) => Err(invalid(format!("{} is not a recurrence", expr))),
    }
}

/// `factorint(n)`: the prime factorization as a dict of primes to exponents.
fn factorint(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    let value = &args.positional[0];
    let n = value
        .as_expr()
        .and_then(SymExpr::as_integer)
        .ok_or_else(|| args.type_error("an integer", value))?;
    let factors = ntheory::factorint(n)
        .into_iter()
        .map(|(prime, exp)| (SymExpr::integer(prime).into(), SymExpr::integer(exp).into()))
        .collect();
    Ok(Value::Dict(factors))
}

/// `isprime(n)`
fn isprime(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    let value = &args.positional[0];
    let n = value
        .as_expr()
        .and_then(SymExpr::as_integer)
        .ok_or_else(|| args.type_error("an integer", value))?;
    Ok(ntheory::isprime(n).into())
}

/// `gcd(a, b)` and `lcm(a, b)`.
fn gcd_or_lcm(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(2, 2)?;
    let (a, b) = (args.expr(0)?, args.expr(1)?);
    let result = if args.name == "gcd" { ntheory::gcd(&a, &b) } else { ntheory::lcm(&a, &b) };
    result
        .map(Value::from)
        .ok_or_else(|| not_implemented(format!("{}() of {} and {} is not supported", args.name, a, b)))
}

/// `minpoly(alpha, x)`
fn minpoly(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 2)?;
    let alpha = args.expr(0)?;
    let var = if args.len() == 2 { args.symbol(1)? } else { "x".to_string() };
    if alpha.has_symbol(&var) {
        return Err(invalid(format!("{} must not contain the variable {}", alpha, var)));
    }
    minimal_polynomial(&alpha, &var)
        .map(Value::from)
        .ok_or_else(|| not_implemented(format!("cannot find the minimal polynomial of {}", alpha)))
}

/// `rewrite(expr, target)`, the function form of `expr.rewrite(target)`.
fn rewrite(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(2, 2)?;
    let target = match &args.positional[1] {
        Value::Str(name) => name.clone(),
        other => symbol_name(other)
            .or_else(|| match other {
                Value::Builtin(builtin) => Some(builtin.name.to_string()),
                _ => None,
            })
            .ok_or_else(|| args.type_error("a function", other))?,
    };
    Ok(crate::symbolic::rewrite::rewrite(&args.expr(0)?, &target).into())
}

pub(super) fn all() -> Vec<Builtin> {
    vec![
        builtin("simplify", BuiltinKind::Routine, "simplify(expr)\n\nRewrites expr in the simplest form that can be found.", simplify),
        builtin("expand", BuiltinKind::Routine, "expand(expr)\n\nMultiplies out products and integer powers of sums.", expand),
        builtin("factor", BuiltinKind::Routine, "factor(expr)\n\nFactors a polynomial into irreducible factors over the rationals.", factor),
        builtin("cancel", BuiltinKind::Routine, "cancel(expr)\n\nWrites a rational function as p/q with the common factors of p and q cancelled.", cancel),
        builtin("together", BuiltinKind::Routine, "together(expr)\n\nCombines a sum of fractions into a single fraction.", together),
        builtin("apart", BuiltinKind::Routine, "apart(expr, x)\n\nThe partial fraction decomposition of a rational function of x.", apart),
        builtin("N", BuiltinKind::Routine, "N(expr, n=15)\n\nEvaluates expr numerically to n significant digits.", numeric),
        builtin("solve", BuiltinKind::Routine, "solve(equation, x)\n\nThe list of solutions of the equation for x. An expression that is not an equation is equated to zero.", solve),
        builtin(
            "rsolve",
            BuiltinKind::Routine,
            "rsolve(recurrence, y(n), {y(0): a, y(1): b})\n\nSolves a linear recurrence with constant coefficients, using the optional initial values. Returns None if the recurrence cannot be solved.",
            rsolve,
        ),
        builtin("factorint", BuiltinKind::Routine, "factorint(n)\n\nThe prime factorization of n, as a dict of primes to their exponents.", factorint),
        builtin("isprime", BuiltinKind::Routine, "isprime(n)\n\nTrue if n is a prime number.", isprime),
        builtin("gcd", BuiltinKind::Routine, "gcd(a, b)\n\nThe greatest common divisor of two numbers or polynomials.", gcd_or_lcm),
        builtin("lcm", BuiltinKind::Routine, "lcm(a, b)\n\nThe least common multiple of two numbers or polynomials.", gcd_or_lcm),
        builtin("minpoly", BuiltinKind::Routine, "minpoly(alpha, x)\n\nThe minimal polynomial of the algebraic number alpha, in the variable x.", minpoly),
        builtin("rewrite", BuiltinKind::Routine, "rewrite(expr, f)\n\nRewrites the trigonometric functions in expr in terms of f, which is one of sin, cos, tan or exp.", rewrite),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn call(f: fn(&mut Ctxt, Args) -> Result<Value, BuiltinError>, name: &'static str, positional: Vec<Value>) -> Result<Value, BuiltinError> {
        f(&mut Ctxt::new(), Args { name, positional, keywords: vec![] })
    }

    #[test]
    fn factorization() {
        let result = call(factorint, "factorint", vec![SymExpr::integer(360).into()]).unwrap();
        assert_eq!(result.to_string(), "{2: 3, 3: 2, 5: 1}");
        assert!(call(factorint, "factorint", vec![SymExpr::symbol("x").into()]).is_err());
    }

    #[test]
    fn numeric_digits_are_bounded() {
        let two: Value = SymExpr::integer(2).into();
        assert!(call(numeric, "N", vec![two.clone(), SymExpr::integer(0).into()]).is_err());
        assert!(call(numeric, "N", vec![two.clone(), SymExpr::integer(4_294_967_301_i64).into()]).is_err());
        assert!(call(numeric, "N", vec![two, SymExpr::integer(5).into()]).is_ok());
    }

    #[test]
    fn solve_quadratic() {
        let x = SymExpr::symbol("x");
        let equation = SymExpr::pow(x.clone(), SymExpr::integer(2)) - SymExpr::integer(4);
        let result = call(solve, "solve", vec![equation.into(), x.into()]).unwrap();
        assert_eq!(result.to_string(), "[-2, 2]");
    }

    #[test]
    fn gcd_and_lcm() {
        let (a, b): (Value, Value) = (SymExpr::integer(12).into(), SymExpr::integer(18).into());
        assert_eq!(call(gcd_or_lcm, "gcd", vec![a.clone(), b.clone()]).unwrap(), SymExpr::integer(6).into());
        assert_eq!(call(gcd_or_lcm, "lcm", vec![a, b]).unwrap(), SymExpr::integer(36).into());
    }
}
