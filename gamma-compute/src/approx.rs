//! Rational approximation of floats, used by `nsimplify` and `Rational(<float>)`.

use rug::{Float, Integer, Rational};
use super::primitive::float;

/// Folds the terms of a continued fraction back into a [`Rational`].
fn rational_from_continued_fraction(terms: &[Integer]) -> Rational {
    let mut iter = terms.iter().rev();
    let Some(last) = iter.next() else {
        return Rational::new();
    };

    let mut rational = Rational::from(last.clone());
    for term in iter {
        if rational.cmp0().is_eq() {
            rational = Rational::from(term.clone());
        } else {
            rational = rational.recip() + term;
        }
    }
    rational
}

/// Approximates the given float as a rational fraction.
///
/// This applies the continued fraction algorithm until the approximation is within `tolerance`
/// of `n` (relative to its magnitude), or until `max_terms` terms have been used. Smaller
/// tolerances find fractions with larger denominators.
///
/// [`Float::to_rational`] gives the exact binary value instead, which is rarely what a user
/// means by `0.1`.
pub fn approximate_rational(n: &Float, tolerance: f64, max_terms: usize) -> Option<Rational> {
    if !n.is_finite() {
        return None;
    }

    let scale = float(n).abs().max(&float(1));
    let mut terms = Vec::new();
    let mut rest = n.clone();
    loop {
        let (integer, fractional) = rest.trunc_fract(float(0));
        terms.push(integer.to_integer()?);

        let rational = rational_from_continued_fraction(&terms);
        let error = (float(n) - float(&rational)).abs() / &scale;

        if fractional.is_zero() || error < tolerance || terms.len() >= max_terms {
            return Some(rational);
        }

        rest = fractional.recip();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::primitive::{float_from_str, rational};
    use super::*;

    fn approx(s: &str) -> Rational {
        approximate_rational(&float_from_str(s).unwrap(), 1e-12, 64).unwrap()
    }

    #[test]
    fn simple_fractions() {
        assert_eq!(approx("0.5"), rational(1, 2));
        assert_eq!(approx("0.1"), rational(1, 10));
        assert_eq!(approx("-2.25"), rational(-9, 4));
        assert_eq!(approx("0.3333333333333333333333"), rational(1, 3));
    }

    #[test]
    fn integers() {
        assert_eq!(approx("7"), rational(7, 1));
    }
}
