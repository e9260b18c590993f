//! Minimal polynomials of algebraic numbers.

use rug::{ops::Pow, Rational};
use super::{
    expr::{Constant, SymExpr},
    poly::{expand, primitive_expr, Poly},
};

/// Reads a term as `c * d**(p/q)` with rational `c` and `d`; the imaginary unit counts as
/// `(-1)**(1/2)`.
fn surd_term(term: &SymExpr) -> Option<(Rational, Rational, Rational)> {
    let (coeff, rest) = term.as_coeff_mul();
    let coeff = coeff.to_rational()?;
    if rest.as_constant() == Some(Constant::I) {
        return Some((coeff, Rational::from(-1), Rational::from((1, 2))));
    }
    match &rest {
        SymExpr::Exp(base, exp) => Some((coeff, base.as_rational()?, exp.as_rational()?)),
        _ => None,
    }
}

/// The highest degree of minimal polynomial computed.
const MAX_DEGREE: u32 = 64;

fn poly_of(coeffs: Vec<Rational>) -> Poly {
    Poly::new(coeffs)
}

/// Computes the minimal polynomial in `var` of a rational number, a root `c*d**(p/q)`, or a
/// quadratic surd `a + b*sqrt(d)`. The polynomial has integer coefficients and a positive leading
/// coefficient. Returns [`None`] for other numbers.
pub fn minpoly(expr: &SymExpr, var: &str) -> Option<SymExpr> {
    if let Some(r) = expr.as_rational() {
        // q*x - p
        return Some(primitive_expr(&poly_of(vec![-r, Rational::from(1)]), var));
    }

    let expanded = expand(expr);
    let mut constant = Rational::new();
    let mut surds = Vec::new();
    for term in expanded.terms() {
        match term.as_rational() {
            Some(r) => constant += r,
            None => surds.push(surd_term(&term)?),
        }
    }

    let poly = match surds.as_slice() {
        [(c, d, exp)] if constant == 0 => {
            // (c*d**(p/q))**q = c**q * d**p
            let (p, q) = exp.clone().into_numer_denom();
            let q = q.to_u32().filter(|&q| q <= MAX_DEGREE)?;
            let p = p.to_i32().filter(|p| p.unsigned_abs() <= MAX_DEGREE)?;
            let value = Rational::from(c.pow(q as i32)) * Rational::from(d.pow(p));
            let mut coeffs = vec![Rational::new(); q as usize + 1];
            coeffs[0] = -value;
            coeffs[q as usize] = Rational::from(1);
            poly_of(coeffs)
        },
        [first, rest @ ..] => {
            // a + b*sqrt(d), with every surd over the same radicand
            let half = Rational::from((1, 2));
            if rest.iter().chain(std::iter::once(first)).any(|(_, d, exp)| *exp != half || *d != first.1) {
                return None;
            }
            let b = surds.iter().fold(Rational::new(), |acc, (c, _, _)| acc + c);
            let d = first.1.clone();
            // (x - a)**2 - b**2*d
            let c0 = Rational::from(&constant * &constant) - Rational::from(&b * &b) * d;
            poly_of(vec![c0, -Rational::from(2) * constant, Rational::from(1)])
        },
        [] => return None,
    };
    Some(primitive_expr(&poly, var))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn minimal(expr: SymExpr) -> String {
        minpoly(&expr, "x").unwrap().to_string()
    }

    #[test]
    fn rationals_and_roots() {
        assert_eq!(minimal(SymExpr::rational(1, 2)), "2*x - 1");
        assert_eq!(minimal(SymExpr::sqrt(SymExpr::integer(2))), "x**2 - 2");
        assert_eq!(minimal(SymExpr::pow_rational(SymExpr::integer(2), 1, 3)), "x**3 - 2");
        assert_eq!(minimal(SymExpr::i()), "x**2 + 1");
    }

    #[test]
    fn quadratic_surds() {
        let golden = (SymExpr::one() + SymExpr::sqrt(SymExpr::integer(5))) / SymExpr::integer(2);
        assert_eq!(minimal(golden), "x**2 - x - 1");
        assert!(minpoly(&SymExpr::pi(), "x").is_none());
    }

    #[test]
    fn high_degree_roots_are_skipped() {
        let root = SymExpr::pow_rational(SymExpr::integer(2), 1, 1_000_000_000);
        assert!(minpoly(&root, "x").is_none());
    }
}
