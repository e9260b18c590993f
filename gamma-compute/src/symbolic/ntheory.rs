//! Number theory on integers, and greatest common divisors of polynomials.

use crate::primitive::int;
use rug::{integer::IsPrime, Integer, Rational};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use super::{
    expr::SymExpr,
    poly::{primitive_expr, Poly},
};

/// The trial divisors tried before switching to Pollard's rho method.
const TRIAL_LIMIT: u32 = 10_000;

/// The rounds of Miller-Rabin testing used to call a number prime.
const PRIME_REPS: u32 = 30;

/// Returns true if `n` is prime.
pub fn isprime(n: &Integer) -> bool {
    n.is_probably_prime(PRIME_REPS) != IsPrime::No
}

/// Finds a non-trivial factor of an odd composite with Pollard's rho method.
fn pollard_rho(n: &Integer) -> Option<Integer> {
    for c in 1u32..20 {
        let step = |x: &Integer| -> Integer { (Integer::from(x * x) + c) % n };
        let mut x = int(2);
        let mut y = int(2);
        loop {
            x = step(&x);
            y = step(&step(&y));
            let d = Integer::from(&x - &y).abs().gcd(n);
            if d == *n {
                break;
            }
            if d != 1 {
                return Some(d);
            }
        }
    }
    None
}

fn factor_into(n: Integer, factors: &mut BTreeMap<Integer, u32>) {
    if n == 1 {
        return;
    }
    if isprime(&n) {
        *factors.entry(n).or_insert(0) += 1;
        return;
    }
    match pollard_rho(&n) {
        Some(d) => {
            let rest = Integer::from(&n / &d);
            factor_into(d, factors);
            factor_into(rest, factors);
        },
        // out of luck: keep the composite as a factor
        None => *factors.entry(n).or_insert(0) += 1,
    }
}

/// Factors an integer into primes with their multiplicities. A negative number has the factor
/// `-1`, zero factors as `{0: 1}`, and one has no factors.
pub fn factorint(n: &Integer) -> BTreeMap<Integer, u32> {
    let mut factors = BTreeMap::new();
    match n.cmp0() {
        Ordering::Equal => {
            factors.insert(int(0), 1);
            return factors;
        },
        Ordering::Less => {
            factors.insert(int(-1), 1);
        },
        Ordering::Greater => {},
    }

    let mut rest = n.clone().abs();
    for p in 2..TRIAL_LIMIT {
        if rest == 1 {
            break;
        }
        if Integer::from(p) * p > rest {
            break;
        }
        let mut count = 0;
        while rest.is_divisible_u(p) {
            rest /= p;
            count += 1;
        }
        if count > 0 {
            factors.insert(int(p), count);
        }
    }
    factor_into(rest, &mut factors);
    factors
}

/// The greatest common divisor of two expressions: of integers and rationals numerically, of
/// univariate polynomials as a primitive polynomial. Returns [`None`] for anything else.
pub fn gcd(a: &SymExpr, b: &SymExpr) -> Option<SymExpr> {
    if let (Some(a), Some(b)) = (a.as_rational(), b.as_rational()) {
        return Some(rational_gcd(&a, &b));
    }
    let (a_poly, b_poly, var) = polys(a, b)?;
    let gcd = a_poly.gcd(&b_poly);
    Some(primitive_expr(&gcd, &var))
}

/// The least common multiple of two expressions, in the same domains as [`gcd`].
pub fn lcm(a: &SymExpr, b: &SymExpr) -> Option<SymExpr> {
    if let (Some(a), Some(b)) = (a.as_rational(), b.as_rational()) {
        let gcd = rational_gcd(&a, &b);
        if gcd.is_zero() {
            return Some(SymExpr::zero());
        }
        let product = SymExpr::from_number(Rational::from(&a * &b).abs().into());
        return Some(product / gcd);
    }
    let (a_poly, b_poly, var) = polys(a, b)?;
    let gcd = a_poly.gcd(&b_poly);
    let (quotient, _) = a_poly.mul(&b_poly).div_rem(&gcd)?;
    Some(primitive_expr(&quotient, &var))
}

fn rational_gcd(a: &Rational, b: &Rational) -> SymExpr {
    // gcd(p/q, r/s) = gcd(p, r) / lcm(q, s)
    let numer = a.numer().clone().gcd(b.numer());
    let denom = a.denom().clone().lcm(b.denom());
    SymExpr::rational(numer, denom)
}

/// Reads both expressions as polynomials in their single shared variable.
fn polys(a: &SymExpr, b: &SymExpr) -> Option<(Poly, Poly, String)> {
    let mut symbols = a.free_symbols();
    symbols.extend(b.free_symbols());
    if symbols.len() != 1 {
        return None;
    }
    let var = symbols.into_iter().next()?;
    Some((Poly::from_expr(a, &var)?, Poly::from_expr(b, &var)?, var))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn factoring_integers() {
        let factors = factorint(&int(360));
        assert_eq!(factors, BTreeMap::from([(int(2), 3), (int(3), 2), (int(5), 1)]));

        let large = int(1_000_000_007u64) * int(998_244_353u64);
        let factors = factorint(&large);
        assert_eq!(factors, BTreeMap::from([(int(998_244_353u64), 1), (int(1_000_000_007u64), 1)]));

        assert_eq!(factorint(&int(-12)), BTreeMap::from([(int(-1), 1), (int(2), 2), (int(3), 1)]));
    }

    #[test]
    fn primes() {
        assert!(isprime(&int(2)));
        assert!(isprime(&int(1_000_000_007u64)));
        assert!(!isprime(&int(1)));
        assert!(!isprime(&int(561)));
    }

    #[test]
    fn divisors() {
        assert_eq!(gcd(&SymExpr::integer(12), &SymExpr::integer(18)), Some(SymExpr::integer(6)));
        assert_eq!(lcm(&SymExpr::integer(4), &SymExpr::integer(6)), Some(SymExpr::integer(12)));

        let x = SymExpr::symbol("x");
        let a = SymExpr::pow(x.clone(), SymExpr::integer(2)) - SymExpr::integer(1);
        let b = x.clone() - SymExpr::integer(1);
        assert_eq!(gcd(&a, &b).unwrap().to_string(), "x - 1");
        assert_eq!(lcm(&a, &b).unwrap().to_string(), "x**2 - 1");
    }
}
