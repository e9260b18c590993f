//! Solving equations in one unknown, and linear recurrences.

use super::{
    expr::{number::Number, RelOp, SymExpr},
    poly::{collect_coeffs, Poly},
    simplify::{fraction::as_numer_denom, simplify},
};
use rug::Rational;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The equation is not one of the supported forms.
    Unsupported,

    /// The expression is not an equation or an expression equated to zero.
    NotAnEquation(SymExpr),
}

/// Turns `Eq(lhs, rhs)` into `lhs - rhs`; any other expression is already equated to zero.
fn as_expression(equation: &SymExpr) -> Result<SymExpr, SolveError> {
    match equation {
        SymExpr::Relational(RelOp::Eq, lhs, rhs) => Ok((**lhs).clone() - (**rhs).clone()),
        SymExpr::Relational(..) | SymExpr::And(_) | SymExpr::Or(_) | SymExpr::Not(_) | SymExpr::Xor(_) => {
            Err(SolveError::NotAnEquation(equation.clone()))
        },
        other => Ok(other.clone()),
    }
}

fn number(r: Rational) -> SymExpr {
    SymExpr::from_number(Number::from(r))
}

/// The roots of `a*x**2 + b*x + c`.
fn quadratic_roots(a: &SymExpr, b: &SymExpr, c: &SymExpr) -> Vec<SymExpr> {
    let discriminant = SymExpr::pow(b.clone(), SymExpr::integer(2)) - SymExpr::integer(4) * a.clone() * c.clone();
    let two_a = SymExpr::integer(2) * a.clone();
    if discriminant.is_zero() {
        return vec![-b.clone() / two_a];
    }
    let root = SymExpr::sqrt(discriminant);
    vec![
        (-b.clone() - root.clone()) / two_a.clone(),
        (-b.clone() + root) / two_a,
    ]
}

/// The roots of a polynomial with symbolic coefficients, lowest degree first.
fn roots_of(coeffs: &[SymExpr]) -> Result<Vec<SymExpr>, SolveError> {
    match coeffs {
        [] | [_] => Ok(Vec::new()),
        [c, b] => Ok(vec![-c.clone() / b.clone()]),
        [c, b, a] => Ok(quadratic_roots(a, b, c)),
        _ => Err(SolveError::Unsupported),
    }
}

/// The roots of a polynomial with rational coefficients: all rational roots, plus the roots of a
/// remaining linear or quadratic factor.
fn rational_poly_roots(poly: &Poly) -> Result<Vec<SymExpr>, SolveError> {
    let (found, rest) = poly.split_rational_roots();
    let mut roots = found.into_iter().map(|(root, _)| number(root)).collect::<Vec<_>>();
    let rest_coeffs = rest.coeffs().iter().cloned().map(number).collect::<Vec<_>>();
    roots.extend(roots_of(&rest_coeffs)?);
    Ok(roots)
}

/// Orders real roots by value, before the complex ones.
fn sort_roots(roots: &mut [SymExpr]) {
    roots.sort_by(|a, b| match (a.to_f64(), b.to_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Solves `equation` for `var`, where the equation is `Eq(lhs, rhs)` or an expression equated to
/// zero. Values that make a denominator vanish are not solutions.
pub fn solve(equation: &SymExpr, var: &str) -> Result<Vec<SymExpr>, SolveError> {
    let expr = as_expression(equation)?;
    let (numer, denom) = as_numer_denom(&expr);
    if !numer.has_symbol(var) {
        return Ok(Vec::new());
    }

    let mut roots = match Poly::from_expr(&numer, var) {
        Some(poly) => rational_poly_roots(&poly)?,
        None => {
            let coeffs = collect_coeffs(&numer, var).ok_or(SolveError::Unsupported)?;
            roots_of(&coeffs)?.iter().map(simplify).collect()
        },
    };
    roots.retain(|root| !denom.subs_symbol(var, root).is_zero());
    roots.dedup();
    sort_roots(&mut roots);
    tracing::debug!(%equation, var, count = roots.len(), "solved equation");
    Ok(roots)
}

/// The highest order of recurrence [`rsolve`] handles.
const MAX_RECURRENCE_ORDER: i64 = 2;

/// Reads the recurrence `sum(c_s * y(n + s))` as its coefficients by shift, lowest shift first.
fn recurrence_coeffs(expr: &SymExpr, function: &str, var: &str) -> Option<(i64, Vec<SymExpr>)> {
    let mut by_shift: Vec<(i64, SymExpr)> = Vec::new();
    for term in super::poly::expand(expr).terms() {
        let mut shift = None;
        let mut coeff = Vec::new();
        for factor in term.factors() {
            match factor.as_call() {
                Some((name, [arg])) if name == function => {
                    if shift.is_some() {
                        return None;
                    }
                    let offset = arg.clone() - SymExpr::symbol(var);
                    shift = Some(offset.as_i64()?);
                },
                _ if factor.has_symbol(var) => return None,
                _ => coeff.push(factor),
            }
        }
        let shift = shift?;
        let coeff = SymExpr::mul(coeff);
        match by_shift.iter_mut().find(|(s, _)| *s == shift) {
            Some((_, existing)) => *existing = existing.clone() + coeff,
            None => by_shift.push((shift, coeff)),
        }
    }
    let low = by_shift.iter().map(|(s, _)| *s).min()?;
    let high = by_shift.iter().map(|(s, _)| *s).max()?;
    let span = high.checked_sub(low).filter(|&span| span <= MAX_RECURRENCE_ORDER)?;
    let mut coeffs = vec![SymExpr::zero(); span as usize + 1];
    for (shift, coeff) in by_shift {
        coeffs[(shift - low) as usize] = coeff;
    }
    Some((low, coeffs))
}

/// Solves a homogeneous linear recurrence with constant coefficients of order one or two in
/// `function(var)`, such as `y(n + 2) - y(n + 1) - y(n)`. Initial conditions are pairs of an index
/// and the value of the sequence there; constants they do not fix are named `C0` and `C1`.
pub fn rsolve(
    recurrence: &SymExpr,
    function: &str,
    var: &str,
    initial: &[(i64, SymExpr)],
) -> Result<SymExpr, SolveError> {
    let expr = as_expression(recurrence)?;
    let (_, coeffs) = recurrence_coeffs(&expr, function, var).ok_or(SolveError::Unsupported)?;
    let n = SymExpr::symbol(var);
    let constants = [SymExpr::symbol("C0"), SymExpr::symbol("C1")];

    // the characteristic polynomial has the recurrence's coefficients
    let roots = roots_of(&coeffs)?;
    let basis: Vec<SymExpr> = match roots.as_slice() {
        [root] => vec![SymExpr::pow(root.clone(), n.clone())],
        [first, second] => {
            let (first, second) = (simplify(first), simplify(second));
            if first == second {
                let power = SymExpr::pow(first, n.clone());
                vec![power.clone(), n.clone() * power]
            } else {
                vec![SymExpr::pow(first, n.clone()), SymExpr::pow(second, n.clone())]
            }
        },
        _ => return Err(SolveError::Unsupported),
    };

    let general = SymExpr::add(constants.iter().zip(&basis).map(|(c, b)| c.clone() * b.clone()));
    if initial.is_empty() {
        return Ok(general);
    }

    let at = |index: i64, b: &SymExpr| b.subs_symbol(var, &SymExpr::integer(index));
    let values = match (basis.as_slice(), initial) {
        ([b0], [(k, v), ..]) => vec![v.clone() / at(*k, b0)],
        ([b0, b1], [(k0, v0), (k1, v1), ..]) => {
            // Cramer's rule
            let det = at(*k0, b0) * at(*k1, b1) - at(*k0, b1) * at(*k1, b0);
            if simplify(&det).is_zero() {
                return Err(SolveError::Unsupported);
            }
            let c0 = (v0.clone() * at(*k1, b1) - v1.clone() * at(*k0, b1)) / det.clone();
            let c1 = (at(*k0, b0) * v1.clone() - at(*k1, b0) * v0.clone()) / det;
            vec![simplify(&c0), simplify(&c1)]
        },
        _ => return Ok(general),
    };

    let mut solution = general;
    for (constant, value) in constants.iter().zip(values) {
        solution = solution.subs(constant, &value);
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn int(value: i64) -> SymExpr {
        SymExpr::integer(value)
    }

    fn strings(roots: &[SymExpr]) -> Vec<String> {
        roots.iter().map(SymExpr::to_string).collect()
    }

    #[test]
    fn polynomial_equations() {
        let equation = SymExpr::pow(x(), int(2)) - int(4);
        assert_eq!(strings(&solve(&equation, "x").unwrap()), ["-2", "2"]);

        let equation = SymExpr::relational(RelOp::Eq, int(2) * x(), int(3));
        assert_eq!(strings(&solve(&equation, "x").unwrap()), ["3/2"]);

        let equation = SymExpr::pow(x(), int(2)) + int(1);
        assert_eq!(strings(&solve(&equation, "x").unwrap()), ["-I", "I"]);
    }

    #[test]
    fn irrational_roots() {
        let equation = SymExpr::pow(x(), int(2)) - int(2);
        let roots = solve(&equation, "x").unwrap();
        assert_eq!(strings(&roots), ["-sqrt(2)", "sqrt(2)"]);
    }

    #[test]
    fn excluded_poles() {
        let equation = (SymExpr::pow(x(), int(2)) - x()) / x();
        assert_eq!(strings(&solve(&equation, "x").unwrap()), ["1"]);
    }

    #[test]
    fn first_order_recurrence() {
        let y = |arg: SymExpr| SymExpr::call1("y", arg);
        let n = SymExpr::symbol("n");
        let recurrence = y(n.clone() + int(1)) - int(2) * y(n.clone());
        let general = rsolve(&recurrence, "y", "n", &[]).unwrap();
        let at_three = general.subs_symbol("n", &int(3)).subs_symbol("C0", &int(1));
        assert_eq!(at_three, int(8));
        let fixed = rsolve(&recurrence, "y", "n", &[(0, int(3))]).unwrap();
        assert_eq!(fixed.subs_symbol("n", &int(2)), int(12));
    }

    #[test]
    fn fibonacci() {
        let y = |arg: SymExpr| SymExpr::call1("y", arg);
        let n = SymExpr::symbol("n");
        let recurrence = y(n.clone() + int(2)) - y(n.clone() + int(1)) - y(n.clone());
        let solution = rsolve(&recurrence, "y", "n", &[(0, int(0)), (1, int(1))]).unwrap();
        let tenth = solution.subs_symbol("n", &int(10)).to_f64().unwrap();
        assert!((tenth - 55.0).abs() < 1e-9);
    }

    #[test]
    fn wide_recurrences_are_unsupported() {
        let y = |arg: SymExpr| SymExpr::call1("y", arg);
        let n = SymExpr::symbol("n");
        let recurrence = y(n.clone() + int(1_000_000_000_000_000)) - y(n.clone());
        assert!(rsolve(&recurrence, "y", "n", &[]).is_err());

        let recurrence = y(n.clone() + int(1 << 62)) - y(n.clone() - int(1 << 62));
        assert!(rsolve(&recurrence, "y", "n", &[]).is_err());
    }
}
