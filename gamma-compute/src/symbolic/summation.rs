//! Closed forms of sums and products over an integer range.
//!
//! Short ranges with integer bounds are added or multiplied out term by term. Longer or symbolic
//! ranges use the sums of powers up to cubes, geometric series, and `factorial` for products of
//! the index. Anything else is left for the caller to keep unevaluated.

use super::{
    expr::{Limit, SymExpr},
    poly::{self, collect_coeffs},
};

/// The longest integer range that is summed or multiplied term by term.
const MAX_TERMS: i64 = 1000;

fn is_infinite(expr: &SymExpr) -> bool {
    expr.as_constant().map_or(false, |c| c.is_infinite())
}

/// The number of terms in `lower..=upper`, if both bounds are integers and the range is short.
fn term_count(lower: &SymExpr, upper: &SymExpr) -> Option<i64> {
    let count = upper.as_i64()?.checked_sub(lower.as_i64()?)?.checked_add(1)?;
    (count <= MAX_TERMS).then_some(count.max(0))
}

/// `sum(k**p, (k, 1, n))` for `p` up to 3.
fn power_sum(power: usize, n: &SymExpr) -> Option<SymExpr> {
    let one = SymExpr::one();
    let n1 = n.clone() + one.clone();
    let result = match power {
        0 => n.clone(),
        1 => n.clone() * n1 / SymExpr::integer(2),
        2 => n.clone() * n1 * (SymExpr::integer(2) * n.clone() + one) / SymExpr::integer(6),
        3 => SymExpr::pow(n.clone() * n1 / SymExpr::integer(2), SymExpr::integer(2)),
        _ => return None,
    };
    Some(result)
}

/// A term `c * b**(a*k + d)` with `b`, `c`, `a`, `d` free of `k`, split into the first term of
/// the series and its ratio.
fn geometric(term: &SymExpr, var: &str, lower: &SymExpr) -> Option<(SymExpr, SymExpr)> {
    let mut constant = Vec::new();
    let mut power = None;
    for factor in term.factors() {
        if !factor.has_symbol(var) {
            constant.push(factor);
        } else if power.is_none() {
            power = Some(factor);
        } else {
            return None;
        }
    }
    let (base, exp) = power?.as_base_exp();
    if base.has_symbol(var) {
        return None;
    }
    let coeffs = collect_coeffs(&exp, var)?;
    let slope = match coeffs.as_slice() {
        [_, slope] => slope.clone(),
        _ => return None,
    };
    let first = SymExpr::mul(constant) * SymExpr::pow(base.clone(), exp.subs_symbol(var, lower));
    let ratio = SymExpr::pow(base, slope);
    Some((first, ratio))
}

/// Computes `sum(term, (var, lower, upper))` in closed form.
pub fn summation(term: &SymExpr, var: &str, lower: &SymExpr, upper: &SymExpr) -> Option<SymExpr> {
    if let Some(count) = term_count(lower, upper) {
        let start = lower.as_i64()?;
        return Some(SymExpr::add((start..start + count).map(|k| {
            term.subs_symbol(var, &SymExpr::integer(k))
        })));
    }

    if let SymExpr::Add(terms) = term {
        let sums = terms
            .iter()
            .map(|term| summation(term, var, lower, upper))
            .collect::<Option<Vec<_>>>()?;
        return Some(SymExpr::add(sums));
    }

    if !is_infinite(upper) && !is_infinite(lower) {
        if let Some(coeffs) = collect_coeffs(term, var) {
            let before = lower.clone() - SymExpr::one();
            let mut sums = Vec::with_capacity(coeffs.len());
            for (power, coeff) in coeffs.iter().enumerate() {
                let range = power_sum(power, upper)? - power_sum(power, &before)?;
                sums.push(coeff.clone() * range);
            }
            return Some(poly::expand(&SymExpr::add(sums)));
        }
    }

    let (first, ratio) = geometric(term, var, lower)?;
    if ratio.is_one() {
        return None;
    }
    if is_infinite(upper) {
        // converges only for a ratio strictly inside the unit interval
        let value = ratio.to_f64()?;
        if value.abs() >= 1.0 {
            return None;
        }
        return Some(first / (SymExpr::one() - ratio));
    }
    let count = upper.clone() - lower.clone() + SymExpr::one();
    Some(first * (SymExpr::one() - SymExpr::pow(ratio.clone(), count)) / (SymExpr::one() - ratio))
}

/// Computes `product(term, (var, lower, upper))` in closed form.
pub fn product(term: &SymExpr, var: &str, lower: &SymExpr, upper: &SymExpr) -> Option<SymExpr> {
    if is_infinite(upper) || is_infinite(lower) {
        return None;
    }
    if let Some(count) = term_count(lower, upper) {
        let start = lower.as_i64()?;
        return Some(SymExpr::mul((start..start + count).map(|k| {
            term.subs_symbol(var, &SymExpr::integer(k))
        })));
    }
    if !term.has_symbol(var) {
        return Some(SymExpr::pow(term.clone(), upper.clone() - lower.clone() + SymExpr::one()));
    }

    match term {
        SymExpr::Mul(factors) => {
            let products = factors
                .iter()
                .map(|factor| product(factor, var, lower, upper))
                .collect::<Option<Vec<_>>>()?;
            Some(SymExpr::mul(products))
        },
        SymExpr::Exp(base, exp) if !exp.has_symbol(var) => {
            Some(SymExpr::pow(product(base, var, lower, upper)?, (**exp).clone()))
        },
        _ if term.as_symbol() == Some(var) => {
            let start = lower.as_i64().filter(|start| *start >= 1)?;
            let top = SymExpr::call1("factorial", upper.clone());
            Some(top / SymExpr::call1("factorial", SymExpr::integer(start - 1)))
        },
        _ => None,
    }
}

/// Evaluates an unevaluated sum, keeping it if it has no closed form.
pub fn sum_limit(term: &SymExpr, limit: &Limit) -> SymExpr {
    let closed = limit
        .bounds
        .as_ref()
        .and_then(|(lower, upper)| summation(term, &limit.var, lower, upper));
    closed.unwrap_or_else(|| SymExpr::Sum(Box::new(term.clone()), Box::new(limit.clone())))
}

/// Evaluates an unevaluated product, keeping it if it has no closed form.
pub fn product_limit(term: &SymExpr, limit: &Limit) -> SymExpr {
    let closed = limit
        .bounds
        .as_ref()
        .and_then(|(lower, upper)| product(term, &limit.var, lower, upper));
    closed.unwrap_or_else(|| SymExpr::Product(Box::new(term.clone()), Box::new(limit.clone())))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn k() -> SymExpr {
        SymExpr::symbol("k")
    }

    fn n() -> SymExpr {
        SymExpr::symbol("n")
    }

    fn int(value: i64) -> SymExpr {
        SymExpr::integer(value)
    }

    #[test]
    fn finite_range() {
        let squares = SymExpr::pow(k(), int(2));
        assert_eq!(summation(&squares, "k", &int(1), &int(10)), Some(int(385)));
        assert_eq!(product(&k(), "k", &int(1), &int(5)), Some(int(120)));
    }

    #[test]
    fn huge_ranges_are_not_short() {
        assert_eq!(term_count(&int(-(1 << 62)), &int(1 << 62)), None);
        assert_eq!(term_count(&int(i64::MIN), &int(i64::MAX)), None);
        assert_eq!(term_count(&int(5), &int(1)), Some(0));
    }

    #[test]
    fn sums_of_powers() {
        let sum = summation(&k(), "k", &int(1), &n()).unwrap();
        assert_eq!(sum.to_string(), "n**2/2 + n/2");
        let cubes = summation(&SymExpr::pow(k(), int(3)), "k", &int(1), &n()).unwrap();
        assert_eq!(cubes.subs_symbol("n", &int(4)), int(100));
    }

    #[test]
    fn geometric_series() {
        let term = SymExpr::pow(int(2), -k());
        let infinite = SymExpr::constant(crate::symbolic::expr::Constant::Infinity);
        assert_eq!(summation(&term, "k", &int(0), &infinite), Some(int(2)));
        let finite = summation(&SymExpr::pow(int(2), k()), "k", &int(0), &n()).unwrap();
        assert_eq!(finite.subs_symbol("n", &int(3)), int(15));
    }

    #[test]
    fn factorial_product() {
        let result = product(&k(), "k", &int(1), &n()).unwrap();
        assert_eq!(result.to_string(), "factorial(n)");
    }

    #[test]
    fn no_closed_form() {
        let term = SymExpr::call1("f", k());
        let limit = Limit::definite("k", int(1), n());
        assert!(matches!(sum_limit(&term, &limit), SymExpr::Sum(..)));
    }
}
