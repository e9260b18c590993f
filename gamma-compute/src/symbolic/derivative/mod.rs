//! Symbolic differentiation.
//!
//! [`derivative`] differentiates an expression once, with respect to a single variable, using the
//! sum, product and power rules, the chain rule for function calls, and the logarithmic rule for
//! variable exponents. The canonical constructors tidy the result as it is built, so `0*f` terms
//! and `1*f` factors never appear.
//!
//! Expressions that have a derivative that cannot be written in closed form, such as the
//! derivative of an undefined function `f(x)`, are returned as unevaluated [`SymExpr::Derivative`]s.

mod function;
pub mod rule;

use super::expr::{Limit, Primary, SymExpr};

pub use rule::{diff_rule, DiffRule};

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicDerivativeError {
    /// The expression may be differentiable, but its derivative cannot be written out; the caller
    /// should keep it as an unevaluated derivative.
    Unsupported,

    /// The provided sub-expression is not differentiable, such as a relation or a logical
    /// connective.
    Undifferentiable(SymExpr),
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[SymExpr], with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    terms
        .iter()
        .map(|term| derivative(term, with))
        .collect::<Result<Vec<_>, _>>()
        .map(SymExpr::add)
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(factors: &[SymExpr], with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let mut terms = Vec::with_capacity(factors.len());
    for (i, factor) in factors.iter().enumerate() {
        if !factor.has_symbol(with) {
            continue;
        }
        let rest = factors
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, other)| other.clone());
        terms.push(SymExpr::mul(rest.chain(std::iter::once(derivative(factor, with)?))));
    }
    Ok(SymExpr::add(terms))
}

/// `(f^g)' = f^g * (g' * log(f) + g * f' / f)`, which reduces to the power rule when `g` is
/// constant and to the exponential rule when `f` is.
fn power_rule(base: &SymExpr, exp: &SymExpr, with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    let base_varies = base.has_symbol(with);
    let exp_varies = exp.has_symbol(with);
    match (base_varies, exp_varies) {
        (false, false) => Ok(SymExpr::zero()),
        (true, false) => {
            let reduced = SymExpr::pow(base.clone(), exp.clone() - SymExpr::one());
            Ok(SymExpr::mul([exp.clone(), reduced, derivative(base, with)?]))
        },
        (false, true) => {
            let power = SymExpr::pow(base.clone(), exp.clone());
            Ok(SymExpr::mul([power, SymExpr::call1("log", base.clone()), derivative(exp, with)?]))
        },
        (true, true) => {
            let power = SymExpr::pow(base.clone(), exp.clone());
            let inner = derivative(exp, with)? * SymExpr::call1("log", base.clone())
                + exp.clone() * derivative(base, with)? / base.clone();
            Ok(power * inner)
        },
    }
}

/// Differentiates an unevaluated derivative once more.
fn repeated(inner: &SymExpr, vars: &[String], with: &str) -> SymExpr {
    if !inner.has_symbol(with) {
        return SymExpr::zero();
    }
    let mut vars = vars.to_vec();
    vars.push(with.to_string());
    vars.sort();
    SymExpr::Derivative(Box::new(inner.clone()), vars)
}

/// Computes the derivative of the given expression with respect to `with`. Returns [`Err`] if the
/// derivative could not be symbolically computed.
pub fn derivative(f: &SymExpr, with: &str) -> Result<SymExpr, SymbolicDerivativeError> {
    if !f.has_symbol(with) {
        if f.is_boolean_valued() && !f.is_atom() {
            return Err(SymbolicDerivativeError::Undifferentiable(f.clone()));
        }
        return Ok(SymExpr::zero());
    }

    match f {
        SymExpr::Primary(Primary::Symbol(_)) => Ok(SymExpr::one()),
        SymExpr::Primary(Primary::Call(name, args)) => function::function_derivative(name, args, with),
        SymExpr::Primary(_) => Ok(SymExpr::zero()),
        SymExpr::Add(terms) => sum_rule(terms, with),
        SymExpr::Mul(factors) => product_rule(factors, with),
        SymExpr::Exp(base, exp) => power_rule(base, exp, with),
        SymExpr::Derivative(inner, vars) => Ok(repeated(inner, vars, with)),
        SymExpr::Integral(integrand, limits) => match limits.as_slice() {
            // the fundamental theorem of calculus
            [Limit { var, bounds: None }] if var == with => Ok((**integrand).clone()),
            _ => Err(SymbolicDerivativeError::Unsupported),
        },
        SymExpr::Sum(..) | SymExpr::Product(..) => Err(SymbolicDerivativeError::Unsupported),
        SymExpr::Relational(..) | SymExpr::And(_) | SymExpr::Or(_) | SymExpr::Not(_) | SymExpr::Xor(_) => {
            Err(SymbolicDerivativeError::Undifferentiable(f.clone()))
        },
    }
}

/// Differentiates the expression with respect to each variable in turn. Derivatives that cannot
/// be written out are kept unevaluated.
pub fn diff(f: &SymExpr, vars: &[String]) -> Result<SymExpr, SymbolicDerivativeError> {
    let mut current = f.clone();
    for var in vars {
        current = match derivative(&current, var) {
            Ok(next) => next,
            Err(SymbolicDerivativeError::Unsupported) => repeated(&current, &[], var),
            Err(err) => return Err(err),
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn n(value: i64) -> SymExpr {
        SymExpr::integer(value)
    }

    fn eval_x(expr: &SymExpr, x: f64) -> f64 {
        let point = SymExpr::float(crate::primitive::float(x));
        expr.subs_symbol("x", &point).to_f64().unwrap()
    }

    /// Compares the symbolic derivative against a central finite difference.
    fn test_for_function(function: SymExpr, points: impl IntoIterator<Item = f64>) {
        const DX: f64 = 0.00001;
        let symbolic = derivative(&function, "x").unwrap();
        for point in points {
            let numeric = (eval_x(&function, point + DX) - eval_x(&function, point - DX)) / (2.0 * DX);
            assert_float_absolute_eq!(eval_x(&symbolic, point), numeric, 0.0001);
        }
    }

    #[test]
    fn power_rule() {
        test_for_function(SymExpr::pow(x(), n(2)) + x() + n(1), [0., 1., 2., 5., 8.]);
        let d = derivative(&SymExpr::pow(x(), n(3)), "x").unwrap();
        assert_eq!(d.to_string(), "3*x**2");
    }

    #[test]
    fn chain_rule() {
        let f = SymExpr::pow(SymExpr::call1("cos", x()), n(7));
        let d = derivative(&f, "x").unwrap();
        assert_eq!(d.to_string(), "-7*sin(x)*cos(x)**6");
        test_for_function(f, [0.3, 1.2, 2.5]);
    }

    #[test]
    fn elementary_functions() {
        for name in ["sin", "tan", "exp", "log", "atan", "asin", "sinh", "cosh", "sec"] {
            test_for_function(SymExpr::call1(name, x() / n(2)), [0.3, 0.7]);
        }
        test_for_function(SymExpr::pow(x(), x()), [0.5, 1.5, 2.0]);
        test_for_function(SymExpr::pow(n(2), x()), [0.0, 1.5]);
    }

    #[test]
    fn reciprocal() {
        let d = derivative(&SymExpr::recip(SymExpr::symbol("z")), "z").unwrap();
        assert_eq!(d.to_string(), "-1/z**2");
    }

    #[test]
    fn undefined_function() {
        let f = SymExpr::call1("f", x());
        let d = diff(&f, &["x".to_string(), "x".to_string()]).unwrap();
        assert_eq!(d.to_string(), "Derivative(f(x), (x, 2))");
        assert_eq!(derivative(&f, "y").unwrap(), n(0));
    }

    #[test]
    fn relations_are_undifferentiable() {
        let relation = SymExpr::relational(crate::symbolic::expr::RelOp::Lt, x(), n(1));
        assert!(matches!(
            derivative(&relation, "x"),
            Err(SymbolicDerivativeError::Undifferentiable(_)),
        ));
    }
}
