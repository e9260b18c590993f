//! Exact and approximate numbers, and the arithmetic between them.

use crate::primitive::{int, PRECISION};
use rug::{ops::Pow, Float, Integer, Rational};
use std::cmp::Ordering;

/// The largest exponent an exact power is computed for. Larger powers are left unevaluated.
const MAX_EXACT_EXPONENT: u32 = 1 << 14;

/// The largest exact power computed, in bits of the numerator or denominator.
const MAX_EXACT_BITS: u64 = 1 << 22;

/// A number that can appear as the coefficient of a term.
///
/// Rationals with a denominator of one are always stored as [`Number::Integer`]; see
/// [`Number::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(Integer),
    Rational(Rational),
    Float(Float),
}

impl Number {
    /// Converts rationals with a denominator of one into integers.
    pub fn normalize(self) -> Self {
        match self {
            Self::Rational(r) if *r.denom() == 1 => Self::Integer(r.into_numer_denom().0),
            other => other,
        }
    }

    pub fn zero() -> Self {
        Self::Integer(int(0))
    }

    pub fn one() -> Self {
        Self::Integer(int(1))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(n) => n.cmp0() == Ordering::Equal,
            Self::Rational(r) => r.cmp0() == Ordering::Equal,
            Self::Float(f) => f.is_zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Self::Integer(n) => *n == 1,
            Self::Rational(_) => false,
            Self::Float(_) => false,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.sign() == Ordering::Less
    }

    pub fn is_positive(&self) -> bool {
        self.sign() == Ordering::Greater
    }

    /// Returns the sign of the number, comparing it to zero. NaN compares equal.
    pub fn sign(&self) -> Ordering {
        match self {
            Self::Integer(n) => n.cmp0(),
            Self::Rational(r) => r.cmp0(),
            Self::Float(f) => f.cmp0().unwrap_or(Ordering::Equal),
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Returns the exact value of the number, if it is not a float.
    pub fn to_rational(&self) -> Option<Rational> {
        match self {
            Self::Integer(n) => Some(Rational::from(n.clone())),
            Self::Rational(r) => Some(r.clone()),
            Self::Float(_) => None,
        }
    }

    /// Returns the value as a float with the given precision, in bits.
    pub fn to_float(&self, prec: u32) -> Float {
        match self {
            Self::Integer(n) => Float::with_val(prec, n),
            Self::Rational(r) => Float::with_val(prec, r),
            Self::Float(f) => Float::with_val(prec, f),
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Integer(n) => n.to_f64(),
            Self::Rational(r) => r.to_f64(),
            Self::Float(f) => f.to_f64(),
        }
    }

    /// The precision a result involving this number should have: the precision of the float, or
    /// [`None`] for exact numbers.
    fn float_prec(&self) -> Option<u32> {
        match self {
            Self::Float(f) => Some(f.prec()),
            _ => None,
        }
    }

    /// The precision of a result involving both numbers, if either is a float.
    fn joint_prec(&self, other: &Self) -> Option<u32> {
        match (self.float_prec(), other.float_prec()) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        if let Some(prec) = self.joint_prec(other) {
            return Self::Float(Float::with_val(prec, self.to_float(prec) + other.to_float(prec)));
        }
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Self::Integer(a.clone() + b),
            _ => Self::Rational(self.exact() + other.exact()).normalize(),
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        if let Some(prec) = self.joint_prec(other) {
            return Self::Float(Float::with_val(prec, self.to_float(prec) * other.to_float(prec)));
        }
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Self::Integer(a.clone() * b),
            _ => Self::Rational(self.exact() * other.exact()).normalize(),
        }
    }

    pub fn neg(&self) -> Self {
        match self {
            Self::Integer(n) => Self::Integer(-n.clone()),
            Self::Rational(r) => Self::Rational(-r.clone()),
            Self::Float(f) => Self::Float(-f.clone()),
        }
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// Returns `1 / self`, or [`None`] if the number is zero.
    pub fn recip(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(match self {
            Self::Integer(n) => Self::Rational(Rational::from((int(1), n.clone()))).normalize(),
            Self::Rational(r) => Self::Rational(r.clone().recip()).normalize(),
            Self::Float(f) => Self::Float(Float::with_val(f.prec(), f.clone().recip())),
        })
    }

    /// Exact value of a non-float number. Floats are never passed here.
    fn exact(&self) -> Rational {
        match self {
            Self::Integer(n) => Rational::from(n.clone()),
            Self::Rational(r) => r.clone(),
            Self::Float(f) => f.to_rational().unwrap_or_default(),
        }
    }

    /// Raises the number to an integer power. Returns [`None`] for `0**-n` and for powers too
    /// large to compute exactly.
    pub fn pow_integer(&self, exp: &Integer) -> Option<Self> {
        if let Self::Float(f) = self {
            if f.is_zero() && exp.cmp0() == Ordering::Less {
                return None;
            }
            return Some(Self::Float(Float::with_val(f.prec(), f.pow(exp))));
        }

        let magnitude = exp.clone().abs().to_u32().filter(|&e| e <= MAX_EXACT_EXPONENT)?;
        let base = self.exact();
        let (numer, denom) = base.into_numer_denom();
        let bits = u64::from(numer.significant_bits().max(denom.significant_bits()));
        if bits.saturating_mul(u64::from(magnitude)) > MAX_EXACT_BITS {
            return None;
        }
        let (numer, denom) = (numer.pow(magnitude), denom.pow(magnitude));
        if exp.cmp0() == Ordering::Less {
            if numer.cmp0() == Ordering::Equal {
                return None;
            }
            Some(Self::Rational(Rational::from((denom, numer))).normalize())
        } else {
            Some(Self::Rational(Rational::from((numer, denom))).normalize())
        }
    }

    /// Raises the number to a float power, or another power when either number is a float.
    /// Returns [`None`] if the result is not real.
    pub fn pow_float(&self, exp: &Self) -> Option<Self> {
        let prec = self.joint_prec(exp).unwrap_or(PRECISION);
        let base = self.to_float(prec);
        if base.is_sign_negative() && !base.is_zero() {
            return None;
        }
        let result = Float::with_val(prec, base.pow(exp.to_float(prec)));
        result.is_finite().then_some(Self::Float(result))
    }

    /// Compares two numbers by value. NaN compares as equal to everything.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self.float_prec(), other.float_prec()) {
            (None, None) => self.exact().cmp(&other.exact()),
            _ => {
                let a = self.to_float(PRECISION);
                let b = other.to_float(PRECISION);
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            },
        }
    }

    /// Floor division and remainder, where the remainder has the sign of the divisor.
    /// Returns [`None`] when dividing by zero.
    pub fn div_mod(&self, other: &Self) -> Option<(Self, Self)> {
        if other.is_zero() {
            return None;
        }
        if let (Self::Integer(a), Self::Integer(b)) = (self, other) {
            let (q, r) = a.clone().div_rem_floor(b.clone());
            return Some((Self::Integer(q), Self::Integer(r)));
        }
        if self.is_float() || other.is_float() {
            let prec = self.joint_prec(other).unwrap_or(PRECISION);
            let a = self.to_float(prec);
            let b = other.to_float(prec);
            let q = Float::with_val(prec, &a / &b).floor();
            let r = Float::with_val(prec, &a - Float::with_val(prec, &q * &b));
            return Some((Self::Float(q), Self::Float(r)));
        }
        let quotient = self.exact() / other.exact();
        let q = quotient.floor();
        let r = self.exact() - q.clone() * other.exact();
        Some((Self::Rational(q).normalize(), Self::Rational(r).normalize()))
    }

    /// Returns the integer value, if the number is an integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Integer(n) => Some(n),
            _ => None,
        }
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self::Integer(n)
    }
}

impl From<Rational> for Number {
    fn from(r: Rational) -> Self {
        Self::Rational(r).normalize()
    }
}

impl From<Float> for Number {
    fn from(f: Float) -> Self {
        Self::Float(f)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::Integer(int(n))
    }
}

/// Returns the largest `k` such that `k**degree` divides `n`, along with `n / k**degree`. Only
/// prime factors below a fixed bound are searched, so huge numbers may keep some perfect powers.
pub fn extract_perfect_power(n: &Integer, degree: u32) -> (Integer, Integer) {
    let mut outside = int(1);
    let mut inside = n.clone();

    if let Some(root) = exact_root(&inside, degree) {
        return (root, int(1));
    }

    // 2**degree already exceeds n
    if u64::from(degree) >= u64::from(inside.significant_bits()) {
        return (outside, inside);
    }

    let mut p = int(2);
    while p < 100_000 && Integer::from(p.clone().pow(degree)) <= inside {
        let power = Integer::from(p.clone().pow(degree));
        while inside.is_divisible(&power) {
            inside /= &power;
            outside *= &p;
        }
        p = if p == 2 { int(3) } else { p + 2 };
    }
    (outside, inside)
}

/// Returns the exact `degree`-th root of a non-negative integer, if it exists.
pub fn exact_root(n: &Integer, degree: u32) -> Option<Integer> {
    if n.cmp0() == Ordering::Less || degree == 0 {
        return None;
    }
    let root = n.clone().root(degree);
    (Integer::from(root.clone().pow(degree)) == *n).then_some(root)
}

/// Formats a float the way the symbolic printers do: `digits` significant digits, keeping
/// trailing zeros, switching to scientific notation for very large or small magnitudes.
pub fn format_float(f: &Float, digits: u32) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f.is_sign_negative() { "-oo".to_string() } else { "oo".to_string() };
    }
    if f.is_zero() {
        return "0".to_string();
    }

    let digits = digits.max(1) as usize;
    let (negative, mantissa, exponent) =
        f.to_sign_string_exp_round(10, Some(digits), rug::float::Round::Nearest);
    let sign = if negative { "-" } else { "" };
    // the value is 0.<mantissa> * 10^exponent
    let exponent = exponent.unwrap_or(0);

    if exponent > -5 && exponent <= digits as i32 {
        let text = if exponent <= 0 {
            format!("0.{}{}", "0".repeat((-exponent) as usize), mantissa)
        } else {
            let split = exponent as usize;
            let (int_part, frac_part) = mantissa.split_at(split.min(mantissa.len()));
            format!("{}.{}", int_part, frac_part)
        };
        format!("{}{}", sign, text)
    } else {
        let (first, rest) = mantissa.split_at(1);
        let rest = rest.trim_end_matches('0');
        let rest = if rest.is_empty() { "0" } else { rest };
        let exp = exponent - 1;
        format!("{}{}.{}e{}{}", sign, first, rest, if exp < 0 { "-" } else { "+" }, exp.abs())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::primitive::{float, float_with_digits, rational};
    use super::*;

    #[test]
    fn exact_arithmetic() {
        let half = Number::from(rational(1, 2));
        assert_eq!(half.add(&half), Number::Integer(int(1)));
        assert_eq!(half.mul(&Number::from(4)), Number::Integer(int(2)));
        assert_eq!(Number::from(3).recip(), Some(Number::Rational(rational(1, 3))));
        assert_eq!(Number::zero().recip(), None);
    }

    #[test]
    fn integer_powers() {
        assert_eq!(Number::from(2).pow_integer(&int(10)), Some(Number::from(1024)));
        assert_eq!(Number::from(2).pow_integer(&int(-2)), Some(Number::from(rational(1, 4))));
        assert_eq!(Number::zero().pow_integer(&int(-1)), None);
    }

    #[test]
    fn huge_powers_stay_unevaluated() {
        let big = Number::from(2).pow_integer(&int(16384)).unwrap();
        assert_eq!(big.pow_integer(&int(16384)), None);
        assert_eq!(big.recip().unwrap().pow_integer(&int(-16384)), None);
        assert!(Number::from(10).pow_integer(&int(16384)).is_some());
    }

    #[test]
    fn floor_division() {
        let (q, r) = Number::from(-7).div_mod(&Number::from(2)).unwrap();
        assert_eq!(q, Number::from(-4));
        assert_eq!(r, Number::from(1));
    }

    #[test]
    fn perfect_powers() {
        assert_eq!(extract_perfect_power(&int(8), 2), (int(2), int(2)));
        assert_eq!(extract_perfect_power(&int(72), 2), (int(6), int(2)));
        assert_eq!(extract_perfect_power(&int(27), 3), (int(3), int(1)));
        assert_eq!(exact_root(&int(49), 2), Some(int(7)));
        assert_eq!(exact_root(&int(50), 2), None);
        assert_eq!(extract_perfect_power(&int(72), 1_000_000_000), (int(1), int(72)));
    }

    #[test]
    fn float_formatting() {
        assert_eq!(format_float(&float_with_digits(2, 15).sqrt(), 15), "1.41421356237310");
        assert_eq!(format_float(&float(1.5), 15), "1.50000000000000");
        assert_eq!(format_float(&float(-0.25), 3), "-0.250");
        assert_eq!(format_float(&float(1e20), 15), "1.0e+20");
    }
}
