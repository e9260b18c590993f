//! Functions to construct [`Integer`]s, [`Rational`]s, [`Float`]s, and [`Complex`] numbers from
//! various types.

use rug::{Assign, Complex, Float, Integer, Rational};

/// The number of bits of precision to use when computing values.
pub const PRECISION: u32 = 1 << 9;

/// The number of significant decimal digits a float has unless asked otherwise.
pub const DEFAULT_DIGITS: u32 = 15;

/// The most significant decimal digits a float can be asked for.
pub const MAX_DIGITS: u32 = 10_000;

/// Checks a requested number of significant digits against `1..=MAX_DIGITS`.
pub fn checked_digits(digits: i64) -> Option<u32> {
    u32::try_from(digits).ok().filter(|d| (1..=MAX_DIGITS).contains(d))
}

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a string slice of decimal digits, with an optional sign.
pub fn int_from_str(s: &str) -> Option<Integer> {
    Integer::from_str_radix(s.trim(), 10).ok()
}

/// Creates a [`Rational`] from a numerator and a denominator. The denominator must be non-zero.
pub fn rational<N, D>(numer: N, denom: D) -> Rational
where
    Integer: From<N> + From<D>,
{
    Rational::from((Integer::from(numer), Integer::from(denom)))
}

/// Creates a [`Float`] with the given value, at the working precision.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Parses a [`Float`] from a string slice at the working precision.
pub fn float_from_str(s: &str) -> Option<Float> {
    Float::parse(s.trim()).ok().map(|parsed| Float::with_val(PRECISION, parsed))
}

/// Creates a [`Complex`] with the given value.
pub fn complex<T>(n: T) -> Complex
where
    Complex: Assign<T>,
{
    Complex::with_val(PRECISION, n)
}

/// Returns the number of bits needed to hold the given number of significant decimal digits.
pub fn digits_to_prec(digits: u32) -> u32 {
    ((digits.saturating_add(1) as f64) * std::f64::consts::LOG2_10).round().max(1.0) as u32
}

/// Returns the number of significant decimal digits a float with the given precision holds.
pub fn prec_to_digits(prec: u32) -> u32 {
    ((prec as f64 / std::f64::consts::LOG2_10).round() as i64 - 1).max(1) as u32
}

/// Creates a [`Float`] that displays with the given number of significant digits.
pub fn float_with_digits<T>(n: T, digits: u32) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(digits_to_prec(digits), n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_and_precision() {
        assert_eq!(digits_to_prec(15), 53);
        assert_eq!(prec_to_digits(53), 15);
        assert_eq!(prec_to_digits(digits_to_prec(30)), 30);
    }

    #[test]
    fn digit_requests() {
        assert_eq!(checked_digits(15), Some(15));
        assert_eq!(checked_digits(MAX_DIGITS as i64), Some(MAX_DIGITS));
        assert_eq!(checked_digits(0), None);
        assert_eq!(checked_digits(MAX_DIGITS as i64 + 1), None);
        assert_eq!(checked_digits(u32::MAX as i64 + 5), None);
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(int_from_str("-42"), Some(int(-42)));
        assert_eq!(int_from_str("4x"), None);
        assert_eq!(rational(2, 4), rational(1, 2));
        assert!(float_from_str("1.5").is_some());
        assert!(float_from_str("abc").is_none());
    }
}
