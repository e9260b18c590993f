//! Symbolic integration.
//!
//! Polynomials are integrated term by term; everything else goes through the [rules](rule) used
//! to integrate by hand, so the plain antiderivative and the step-by-step explanation always
//! agree. Definite integrals are evaluated at their bounds.

pub mod rule;

use super::{
    expr::{Limit, SymExpr},
    poly::collect_coeffs,
};

pub use rule::{integral_steps, IntRule, IntRuleKind};

/// Integrates a polynomial in `var` term by term. Coefficients may contain other symbols.
fn integrate_polynomial(expr: &SymExpr, var: &str) -> Option<SymExpr> {
    let coeffs = collect_coeffs(expr, var)?;
    let x = SymExpr::symbol(var);
    Some(SymExpr::add(coeffs.into_iter().enumerate().map(|(i, coeff)| {
        let degree = SymExpr::integer(i as i64 + 1);
        coeff * SymExpr::pow(x.clone(), degree.clone()) / degree
    })))
}

/// Computes an antiderivative of `expr` with respect to `var`, without a constant of integration.
/// Returns [`None`] if no antiderivative was found.
pub fn integrate(expr: &SymExpr, var: &str) -> Option<SymExpr> {
    integrate_polynomial(expr, var).or_else(|| manualintegrate(expr, var))
}

/// Computes an antiderivative using only the rules that can be explained step by step.
pub fn manualintegrate(expr: &SymExpr, var: &str) -> Option<SymExpr> {
    integral_steps(expr, var).eval()
}

/// Evaluates a definite integral from `lower` to `upper`. Returns [`None`] if no antiderivative
/// was found, or if a bound is infinite.
pub fn integrate_definite(expr: &SymExpr, var: &str, lower: &SymExpr, upper: &SymExpr) -> Option<SymExpr> {
    let infinite = |bound: &SymExpr| bound.as_constant().map_or(false, |c| c.is_infinite());
    if infinite(lower) || infinite(upper) {
        return None;
    }
    let antiderivative = integrate(expr, var)?;
    Some(antiderivative.subs_symbol(var, upper) - antiderivative.subs_symbol(var, lower))
}

/// Integrates over each range in turn, innermost first. Whatever cannot be integrated is kept as
/// an unevaluated [`SymExpr::Integral`].
pub fn integrate_limits(expr: &SymExpr, limits: &[Limit]) -> SymExpr {
    integrate_limits_with(expr, limits, integrate)
}

/// Like [`integrate_limits`], with the given method for antiderivatives.
pub fn integrate_limits_with(
    expr: &SymExpr,
    limits: &[Limit],
    method: fn(&SymExpr, &str) -> Option<SymExpr>,
) -> SymExpr {
    let mut current = expr.clone();
    for (i, limit) in limits.iter().enumerate() {
        let next = match &limit.bounds {
            None => method(&current, &limit.var),
            Some((lower, upper)) => {
                let infinite = |bound: &SymExpr| bound.as_constant().map_or(false, |c| c.is_infinite());
                if infinite(lower) || infinite(upper) {
                    None
                } else {
                    method(&current, &limit.var).map(|antiderivative| {
                        antiderivative.subs_symbol(&limit.var, upper) - antiderivative.subs_symbol(&limit.var, lower)
                    })
                }
            },
        };
        match next {
            Some(next) => current = next,
            None => {
                tracing::debug!(limit = %limit.var, "integral left unevaluated");
                return SymExpr::Integral(Box::new(current), limits[i..].to_vec());
            },
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn n(value: i64) -> SymExpr {
        SymExpr::integer(value)
    }

    #[test]
    fn polynomial() {
        let expr = SymExpr::pow(x(), n(2)) + n(2) * x() + n(1);
        assert_eq!(integrate(&expr, "x").unwrap().to_string(), "x**3/3 + x**2 + x");
    }

    #[test]
    fn reciprocal() {
        let z = SymExpr::symbol("z");
        assert_eq!(integrate(&SymExpr::recip(z), "z").unwrap().to_string(), "log(z)");
    }

    #[test]
    fn definite() {
        let result = integrate_definite(&x(), "x", &n(0), &n(1)).unwrap();
        assert_eq!(result, SymExpr::rational(1, 2));
        assert!(integrate_definite(&x(), "x", &n(0), &SymExpr::constant(crate::symbolic::expr::Constant::Infinity)).is_none());
    }

    #[test]
    fn unevaluated() {
        let f = SymExpr::call1("f", x());
        let result = integrate_limits(&f, &[Limit::indefinite("x")]);
        assert_eq!(result.to_string(), "Integral(f(x), x)");
    }

    #[test]
    fn double_integral() {
        let y = SymExpr::symbol("y");
        let limits = [Limit::definite("x", n(0), n(1)), Limit::definite("y", n(0), n(2))];
        assert_eq!(integrate_limits(&(x() * y), &limits), n(1));
    }
}
