//! Rational functions: splitting an expression into numerator and denominator, combining sums of
//! fractions, cancelling common factors, and partial fraction decomposition.

use crate::symbolic::{
    expr::{number::Number, Primary, SymExpr},
    poly::{factor_list, primitive_expr, solve_linear, Poly},
};
use rug::Rational;

/// Splits an expression into a numerator and a denominator.
///
/// Sums are put over a common denominator, products split factor by factor, and factors raised to
/// a negative power move to the denominator.
pub fn as_numer_denom(expr: &SymExpr) -> (SymExpr, SymExpr) {
    match expr {
        SymExpr::Primary(Primary::Rational(r)) => (
            SymExpr::Primary(Primary::Integer(r.numer().clone())),
            SymExpr::Primary(Primary::Integer(r.denom().clone())),
        ),
        SymExpr::Add(terms) => {
            let mut numer = SymExpr::zero();
            let mut denom = SymExpr::one();
            for term in terms {
                let (n, d) = as_numer_denom(term);
                if d == denom {
                    numer = numer + n;
                } else {
                    numer = numer * d.clone() + n * denom.clone();
                    denom = denom * d;
                }
            }
            (numer, denom)
        },
        SymExpr::Mul(factors) => {
            let (numers, denoms): (Vec<_>, Vec<_>) = factors.iter().map(as_numer_denom).unzip();
            (SymExpr::mul(numers), SymExpr::mul(denoms))
        },
        SymExpr::Exp(base, exp) => {
            if exp.could_extract_minus_sign() {
                let positive = -(**exp).clone();
                if positive.is_integer() {
                    let (n, d) = as_numer_denom(base);
                    return (SymExpr::pow(d, positive.clone()), SymExpr::pow(n, positive));
                }
                return (SymExpr::one(), SymExpr::pow((**base).clone(), positive));
            }
            if exp.is_integer() {
                let (n, d) = as_numer_denom(base);
                return (SymExpr::pow(n, (**exp).clone()), SymExpr::pow(d, (**exp).clone()));
            }
            (expr.clone(), SymExpr::one())
        },
        other => match other.call_arg("exp") {
            Some(arg) if arg.could_extract_minus_sign() => {
                (SymExpr::one(), SymExpr::call1("exp", -arg.clone()))
            },
            _ => (other.clone(), SymExpr::one()),
        },
    }
}

/// Puts a sum of fractions over a common denominator: `1/x + 1/y` becomes `(x + y)/(x*y)`.
pub fn together(expr: &SymExpr) -> SymExpr {
    let (numer, denom) = as_numer_denom(expr);
    if denom.is_one() {
        numer
    } else {
        SymExpr::mul([numer, SymExpr::recip(denom)])
    }
}

/// Cancels the common factors of the numerator and denominator of a rational function of one
/// variable. The result is written as a coefficient times a quotient of primitive polynomials:
/// `(x**2 - 1)/(x - 1)` becomes `x + 1`.
///
/// Expressions in more than one variable are only put over a common denominator.
pub fn cancel(expr: &SymExpr) -> SymExpr {
    let symbols = expr.free_symbols();
    let var = match symbols.iter().next() {
        Some(var) if symbols.len() == 1 => var,
        _ => return together(expr),
    };

    let (numer, denom) = as_numer_denom(expr);
    let (numer, denom) = match (Poly::from_expr(&numer, var), Poly::from_expr(&denom, var)) {
        (Some(numer), Some(denom)) => (numer, denom),
        _ => return together(expr),
    };
    if denom.is_zero() {
        return SymExpr::zoo();
    }
    if numer.is_zero() {
        return SymExpr::zero();
    }

    let gcd = numer.gcd(&denom);
    let (numer, denom) = match (numer.div_rem(&gcd), denom.div_rem(&gcd)) {
        (Some((numer, _)), Some((denom, _))) => (numer, denom),
        _ => return together(expr),
    };

    let (numer_content, _) = numer.primitive();
    let (denom_content, _) = denom.primitive();
    let coeff = Number::from(numer_content / denom_content).normalize();
    let numer = primitive_expr(&numer, var);
    if denom.degree() == 0 {
        return SymExpr::scale(&coeff, numer);
    }
    SymExpr::mul([SymExpr::from_number(coeff), numer, SymExpr::recip(primitive_expr(&denom, var))])
}

/// Decomposes a rational function of `var` into partial fractions.
///
/// The denominator is factored over the rationals; each factor `f` of multiplicity `m`
/// contributes the terms `p_k/f**k` for `k` in `1..=m`, with `deg(p_k) < deg(f)`. The unknown
/// numerators are found by comparing coefficients. Returns [`None`] if the expression is not a
/// rational function of `var`.
pub fn apart(expr: &SymExpr, var: &str) -> Option<SymExpr> {
    let (numer, denom) = as_numer_denom(expr);
    let numer = Poly::from_expr(&numer, var)?;
    let denom = Poly::from_expr(&denom, var)?;
    let (quotient, remainder) = numer.div_rem(&denom)?;

    let mut terms = vec![quotient.to_expr(var)];
    if remainder.is_zero() {
        return Some(SymExpr::add(terms));
    }

    let (content, factors) = factor_list(&denom);
    let product = factors
        .iter()
        .fold(Poly::constant(Rational::from(1)), |acc, (factor, multiplicity)| {
            acc.mul(&factor.pow(*multiplicity))
        });

    // one unknown per coefficient of each partial numerator
    let mut columns = Vec::new();
    for (factor, multiplicity) in &factors {
        for k in 1..=*multiplicity {
            let (cofactor, _) = product.div_rem(&factor.pow(k))?;
            for j in 0..factor.degree() {
                columns.push(cofactor.mul(&Poly::monomial(Rational::from(1), j)));
            }
        }
    }

    let size = columns.len();
    let matrix = (0..size)
        .map(|row| columns.iter().map(|column| column.coeff(row)).collect())
        .collect();
    let target = remainder.scale(&content.recip());
    let rhs = (0..size).map(|row| target.coeff(row)).collect();
    let solution = solve_linear(matrix, rhs)?;

    let mut unknowns = solution.into_iter();
    for (factor, multiplicity) in &factors {
        let factor_expr = factor.to_expr(var);
        for k in 1..=*multiplicity {
            let coeffs = unknowns.by_ref().take(factor.degree()).collect::<Vec<_>>();
            let numer = Poly::new(coeffs);
            if numer.is_zero() {
                continue;
            }
            terms.push(SymExpr::mul([
                numer.to_expr(var),
                SymExpr::pow(factor_expr.clone(), SymExpr::integer(-(k as i64))),
            ]));
        }
    }

    Some(SymExpr::add(terms))
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
    fn numerator_and_denominator() {
        let expr = SymExpr::recip(x()) + SymExpr::recip(SymExpr::symbol("y"));
        let (numer, denom) = as_numer_denom(&expr);
        assert_eq!(numer.to_string(), "x + y");
        assert_eq!(denom.to_string(), "x*y");

        let (numer, denom) = as_numer_denom(&SymExpr::rational(3, 4));
        assert_eq!((numer, denom), (n(3), n(4)));
    }

    #[test]
    fn cancel_common_factor() {
        let expr = (SymExpr::pow(x(), n(2)) - n(1)) / (x() - n(1));
        assert_eq!(cancel(&expr).to_string(), "x + 1");

        let doubled = (n(2) * SymExpr::pow(x(), n(2)) - n(2)) / (x() - n(1));
        assert_eq!(cancel(&doubled).to_string(), "2*x + 2");
    }

    #[test]
    fn partial_fractions() {
        let expr = SymExpr::recip(SymExpr::pow(x(), n(2)) - n(1));
        let parts = apart(&expr, "x").unwrap();
        assert_eq!(parts.terms().len(), 2);
        let at_three = parts.subs_symbol("x", &n(3));
        assert_eq!(at_three, SymExpr::rational(1, 8));
    }

    #[test]
    fn partial_fractions_with_polynomial_part() {
        let expr = SymExpr::pow(x(), n(2)) / (x() + n(1));
        let parts = apart(&expr, "x").unwrap();
        assert_eq!(parts.subs_symbol("x", &n(1)), SymExpr::rational(1, 2));
        assert!(parts.terms().contains(&x()));
    }
}
