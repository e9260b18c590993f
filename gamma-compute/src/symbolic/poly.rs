//! Univariate polynomials with rational coefficients, and the algebra built on them: expansion,
//! coefficient collection, division, greatest common divisors, rational roots and factoring.

use crate::primitive::{int, rational};
use rug::{ops::Pow, Integer, Rational};
use std::cmp::Ordering;
use super::expr::{number::Number, order::ordered_factors, SymExpr};

/// The largest absolute value of a coefficient whose divisors are enumerated when searching for
/// rational roots.
const MAX_ROOT_SEARCH: u64 = 1_000_000_000_000;

/// The largest power of a sum that [`expand`] multiplies out.
const MAX_EXPAND_POWER: i64 = 64;

/// A polynomial in one variable with rational coefficients.
///
/// Coefficients are stored lowest degree first, with no trailing zeros; the zero polynomial has
/// no coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<Rational>,
}

impl Poly {
    /// Creates a polynomial from its coefficients, lowest degree first.
    pub fn new(mut coeffs: Vec<Rational>) -> Self {
        while coeffs.last().map_or(false, |c| c.cmp0() == Ordering::Equal) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub fn constant(value: Rational) -> Self {
        Self::new(vec![value])
    }

    /// The polynomial `x - root`.
    pub fn linear(root: Rational) -> Self {
        Self::new(vec![-root, Rational::from(1)])
    }

    /// The monomial `coeff * x^degree`.
    pub fn monomial(coeff: Rational, degree: usize) -> Self {
        let mut coeffs = vec![Rational::new(); degree];
        coeffs.push(coeff);
        Self::new(coeffs)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// The degree of the polynomial. The zero polynomial has degree zero.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn coeffs(&self) -> &[Rational] {
        &self.coeffs
    }

    /// The coefficient of `x^i`.
    pub fn coeff(&self, i: usize) -> Rational {
        self.coeffs.get(i).cloned().unwrap_or_default()
    }

    /// The coefficient of the highest power of `x`.
    pub fn leading(&self) -> Rational {
        self.coeffs.last().cloned().unwrap_or_default()
    }

    pub fn add(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        Self::new((0..len).map(|i| self.coeff(i) + other.coeff(i)).collect())
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.scale(&Rational::from(-1)))
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut coeffs = vec![Rational::new(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += Rational::from(a * b);
            }
        }
        Self::new(coeffs)
    }

    pub fn scale(&self, factor: &Rational) -> Self {
        Self::new(self.coeffs.iter().map(|c| Rational::from(c * factor)).collect())
    }

    pub fn pow(&self, exp: u32) -> Self {
        (0..exp).fold(Self::constant(Rational::from(1)), |acc, _| acc.mul(self))
    }

    /// Divides this polynomial by another, returning the quotient and remainder. Returns [`None`]
    /// when dividing by zero.
    pub fn div_rem(&self, divisor: &Self) -> Option<(Self, Self)> {
        if divisor.is_zero() {
            return None;
        }
        let mut remainder = self.clone();
        let mut quotient = vec![Rational::new(); self.coeffs.len().max(1)];
        let lead = divisor.leading();
        while !remainder.is_zero() && remainder.degree() >= divisor.degree() {
            let shift = remainder.degree() - divisor.degree();
            let factor = Rational::from(&remainder.leading() / &lead);
            quotient[shift] += &factor;
            remainder = remainder.sub(&divisor.mul(&Self::monomial(factor, shift)));
        }
        Some((Self::new(quotient), remainder))
    }

    /// Makes the leading coefficient one.
    pub fn monic(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let lead = self.leading();
        self.scale(&Rational::from(lead.recip_ref()))
    }

    /// The monic greatest common divisor of two polynomials.
    pub fn gcd(&self, other: &Self) -> Self {
        let (mut a, mut b) = (self.clone(), other.clone());
        while !b.is_zero() {
            let rem = match a.div_rem(&b) {
                Some((_, rem)) => rem,
                None => break,
            };
            a = b;
            b = rem;
        }
        a.monic()
    }

    pub fn derivative(&self) -> Self {
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| Rational::from(c * Integer::from(i)))
                .collect(),
        )
    }

    /// Evaluates the polynomial at a point.
    pub fn eval(&self, x: &Rational) -> Rational {
        self.coeffs.iter().rev().fold(Rational::new(), |acc, c| acc * x + c)
    }

    /// Splits the polynomial into a rational content and a primitive polynomial with integer
    /// coefficients, whose leading coefficient is positive.
    pub fn primitive(&self) -> (Rational, Vec<Integer>) {
        if self.is_zero() {
            return (Rational::new(), Vec::new());
        }
        let denom_lcm = self.coeffs.iter().fold(int(1), |acc, c| acc.lcm(c.denom()));
        let scaled = self
            .coeffs
            .iter()
            .map(|c| Integer::from(c.numer() * Integer::from(&denom_lcm / c.denom())))
            .collect::<Vec<_>>();
        let mut gcd = scaled.iter().fold(int(0), |acc, c| acc.gcd(c));
        if scaled.last().map_or(false, |c| c.cmp0() == Ordering::Less) {
            gcd = -gcd;
        }
        let primitive = scaled.into_iter().map(|c| c / &gcd).collect();
        (Rational::from((gcd, denom_lcm)), primitive)
    }

    /// Finds the rational roots of the polynomial, each listed once, in increasing order.
    pub fn rational_roots(&self) -> Vec<Rational> {
        if self.degree() == 0 {
            return Vec::new();
        }
        let (_, ints) = self.primitive();
        let mut roots = Vec::new();
        if ints[0].cmp0() == Ordering::Equal {
            roots.push(Rational::new());
        }

        // the lowest non-zero coefficient bounds the numerators once zero roots are divided out
        let low = match ints.iter().find(|c| c.cmp0() != Ordering::Equal) {
            Some(low) => low.clone().abs(),
            None => return roots,
        };
        let high = ints.last().cloned().unwrap_or_else(|| int(1)).abs();
        let (numers, denoms) = match (divisors(&low), divisors(&high)) {
            (Some(numers), Some(denoms)) => (numers, denoms),
            _ => return roots,
        };

        for p in &numers {
            for q in &denoms {
                for sign in [1, -1] {
                    let candidate = Rational::from((Integer::from(p * sign), q.clone()));
                    if !roots.contains(&candidate) && self.eval(&candidate).cmp0() == Ordering::Equal {
                        roots.push(candidate);
                    }
                }
            }
        }
        roots.sort();
        roots
    }

    /// Splits the polynomial into its rational roots with their multiplicities, and the remaining
    /// factor with no rational roots.
    pub fn split_rational_roots(&self) -> (Vec<(Rational, u32)>, Poly) {
        let mut rest = self.clone();
        let mut found = Vec::new();
        for root in self.rational_roots() {
            let linear = Self::linear(root.clone());
            let mut multiplicity = 0;
            while let Some((quotient, remainder)) = rest.div_rem(&linear) {
                if !remainder.is_zero() {
                    break;
                }
                rest = quotient;
                multiplicity += 1;
            }
            found.push((root, multiplicity));
        }
        (found, rest)
    }

    /// Reads an expression as a polynomial in `var`. Returns [`None`] if it is not a polynomial
    /// in `var` with rational coefficients.
    pub fn from_expr(expr: &SymExpr, var: &str) -> Option<Self> {
        let coeffs = collect_coeffs(expr, var)?;
        coeffs
            .iter()
            .map(|c| c.as_rational())
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    /// Converts the polynomial back to an expression in `var`.
    pub fn to_expr(&self, var: &str) -> SymExpr {
        let x = SymExpr::symbol(var);
        SymExpr::add(self.coeffs.iter().enumerate().map(|(i, c)| {
            SymExpr::mul([SymExpr::from_number(Number::from(c.clone()).normalize()), power(&x, i)])
        }))
    }
}

fn power(x: &SymExpr, degree: usize) -> SymExpr {
    SymExpr::pow(x.clone(), SymExpr::integer(degree as i64))
}

/// Lists the positive divisors of an integer, or [`None`] if it is too large to factor.
fn divisors(n: &Integer) -> Option<Vec<Integer>> {
    let n = n.to_u64().filter(|n| *n <= MAX_ROOT_SEARCH)?;
    if n == 0 {
        return Some(vec![int(1)]);
    }
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1u64;
    while d * d <= n {
        if n % d == 0 {
            small.push(int(d));
            if d * d != n {
                large.push(int(n / d));
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    Some(small)
}

/// Multiplies out products and integer powers of sums.
///
/// `(x + 1)**2` expands to `x**2 + 2*x + 1`, and `x*(y + z)` to `x*y + x*z`. Sums in a
/// denominator are expanded, but not distributed over.
pub fn expand(expr: &SymExpr) -> SymExpr {
    let expr = expr.map_children(&mut expand);
    match &expr {
        SymExpr::Mul(factors) => distribute(factors),
        SymExpr::Exp(base, exp) => match (&**base, exp.as_i64()) {
            (SymExpr::Add(_), Some(n)) if (2..=MAX_EXPAND_POWER).contains(&n) => {
                let copies = vec![(**base).clone(); n as usize];
                distribute(&copies)
            },
            (SymExpr::Add(_), Some(n)) if (-MAX_EXPAND_POWER..=-2).contains(&n) => {
                let copies = vec![(**base).clone(); (-n) as usize];
                SymExpr::recip(distribute(&copies))
            },
            _ => expr.clone(),
        },
        _ => expr,
    }
}

/// Multiplies the factors, distributing over every sum among them.
fn distribute(factors: &[SymExpr]) -> SymExpr {
    let mut terms = vec![SymExpr::one()];
    for factor in factors {
        let factor_terms = factor.terms();
        let mut next = Vec::with_capacity(terms.len() * factor_terms.len());
        for term in &terms {
            for factor_term in &factor_terms {
                next.push(SymExpr::mul([term.clone(), factor_term.clone()]));
            }
        }
        terms = next;
    }
    SymExpr::add(terms)
}

/// Splits a term into the power of `var` it contains and the remaining coefficient. Returns
/// [`None`] if `var` appears in any other way.
fn split_term(term: &SymExpr, var: &str) -> Option<(usize, SymExpr)> {
    let mut degree = 0;
    let mut rest = Vec::new();
    for factor in term.factors() {
        if factor.as_symbol() == Some(var) {
            degree += 1;
            continue;
        }
        if let SymExpr::Exp(base, exp) = &factor {
            if base.as_symbol() == Some(var) {
                let n = exp.as_i64().filter(|n| *n > 0)?;
                degree += n as usize;
                continue;
            }
        }
        if factor.has_symbol(var) {
            return None;
        }
        rest.push(factor);
    }
    Some((degree, SymExpr::mul(rest)))
}

/// Expands the expression and collects its coefficients by powers of `var`, lowest degree
/// first. Coefficients may contain other symbols. Returns [`None`] if the expression is not a
/// polynomial in `var`.
pub fn collect_coeffs(expr: &SymExpr, var: &str) -> Option<Vec<SymExpr>> {
    let expanded = expand(expr);
    let mut by_degree: Vec<Vec<SymExpr>> = Vec::new();
    for term in expanded.terms() {
        let (degree, coeff) = split_term(&term, var)?;
        if by_degree.len() <= degree {
            by_degree.resize(degree + 1, Vec::new());
        }
        by_degree[degree].push(coeff);
    }
    let mut coeffs = by_degree.into_iter().map(SymExpr::add).collect::<Vec<_>>();
    while coeffs.last().map_or(false, SymExpr::is_zero) {
        coeffs.pop();
    }
    Some(coeffs)
}

/// Returns the degree of the expression as a polynomial in `var`.
pub fn degree(expr: &SymExpr, var: &str) -> Option<usize> {
    collect_coeffs(expr, var).map(|coeffs| coeffs.len().saturating_sub(1))
}

/// Builds a product from a coefficient and factors without distributing the coefficient, the
/// way a factored form is displayed: `2*(x + 1)`.
pub fn product_raw(coeff: Number, factors: Vec<SymExpr>) -> SymExpr {
    let mut factors = ordered_factors(&factors);
    if factors.is_empty() {
        return SymExpr::from_number(coeff);
    }
    if !coeff.is_one() {
        factors.insert(0, SymExpr::from_number(coeff));
    }
    SymExpr::mul_raw(factors)
}

/// Converts a primitive polynomial with integer coefficients to an expression.
fn integer_poly_expr(coeffs: &[Integer], var: &str) -> SymExpr {
    Poly::new(coeffs.iter().map(|c| Rational::from(c.clone())).collect()).to_expr(var)
}

/// Factors a polynomial over the rationals into its content and its factors with their
/// multiplicities. Each factor has integer coefficients and a positive leading coefficient.
pub fn factor_list(poly: &Poly) -> (Rational, Vec<(Poly, u32)>) {
    let (content, ints) = poly.primitive();
    let primitive = Poly::new(ints.iter().map(|c| Rational::from(c.clone())).collect());
    let (roots, rest) = primitive.split_rational_roots();

    let mut factors = Vec::new();
    let mut scale = Rational::from(1);
    for (root, multiplicity) in roots {
        // (x - p/q) becomes (q*x - p)
        let q = root.denom().clone();
        let linear = Poly::linear(root).scale(&Rational::from(q.clone()));
        scale /= Rational::from(q.pow(multiplicity));
        factors.push((linear, multiplicity));
    }
    if rest.degree() > 0 {
        let (rest_content, rest_ints) = rest.primitive();
        scale *= rest_content;
        factors.push((Poly::new(rest_ints.into_iter().map(Rational::from).collect()), 1));
    } else {
        scale *= rest.leading();
    }
    factors.sort_by_key(|(factor, _)| factor.degree());
    (content * scale, factors)
}

/// Factors an expression.
///
/// Univariate polynomials and quotients of them are factored over the rationals into linear
/// factors and a remaining factor with no rational roots. Other sums have their common factors
/// pulled out: `x*y + x` is `x*(y + 1)`.
pub fn factor(expr: &SymExpr) -> SymExpr {
    let symbols = expr.free_symbols();
    if symbols.len() == 1 {
        if let Some(var) = symbols.iter().next() {
            let (numer, denom) = crate::symbolic::simplify::fraction::as_numer_denom(expr);
            if let (Some(numer), Some(denom)) = (Poly::from_expr(&numer, var), Poly::from_expr(&denom, var)) {
                return factor_quotient(&numer, &denom, var);
            }
        }
    }

    match expr {
        SymExpr::Add(terms) => factor_common(terms),
        other => other.map_children(&mut factor),
    }
}

fn factor_quotient(numer: &Poly, denom: &Poly, var: &str) -> SymExpr {
    let gcd = numer.gcd(denom);
    let (numer, denom) = match (numer.div_rem(&gcd), denom.div_rem(&gcd)) {
        (Some((n, _)), Some((d, _))) => (n, d),
        _ => (numer.clone(), denom.clone()),
    };
    let (numer_content, numer_factors) = factor_list(&numer);
    let (denom_content, denom_factors) = factor_list(&denom);

    let mut factors = Vec::new();
    for (factor, multiplicity) in numer_factors {
        factors.push(SymExpr::pow(factor.to_expr(var), SymExpr::integer(multiplicity as i64)));
    }
    for (factor, multiplicity) in denom_factors {
        factors.push(SymExpr::pow(factor.to_expr(var), SymExpr::integer(-(multiplicity as i64))));
    }
    if denom_content.cmp0() == Ordering::Equal {
        return SymExpr::zoo();
    }
    let coeff = Number::from(numer_content / denom_content).normalize();
    if coeff.is_zero() {
        return SymExpr::zero();
    }
    product_raw(coeff, factors)
}

/// Pulls the factors every term shares out of a sum.
fn factor_common(terms: &[SymExpr]) -> SymExpr {
    // the numeric content: gcd of numerators over lcm of denominators
    let coeffs = terms.iter().map(|term| term.as_coeff_factors().0).collect::<Vec<_>>();
    let content = coeffs
        .iter()
        .map(Number::to_rational)
        .collect::<Option<Vec<_>>>()
        .map(|rationals| {
            let numer = rationals.iter().fold(int(0), |acc, r| acc.gcd(r.numer()));
            let denom = rationals.iter().fold(int(1), |acc, r| acc.lcm(r.denom()));
            let mut content = Rational::from((numer, denom));
            if rationals.first().map_or(false, |r| r.cmp0() == Ordering::Less) {
                content = -content;
            }
            content
        })
        .filter(|content| content.cmp0() != Ordering::Equal)
        .unwrap_or_else(|| rational(1, 1));

    // shared bases, with the smallest numeric exponent
    let mut shared: Vec<(SymExpr, SymExpr)> = Vec::new();
    if let Some(first) = terms.first() {
        for factor in first.as_coeff_factors().1 {
            let (base, exp) = factor.as_base_exp();
            if !exp.is_number() {
                continue;
            }
            let mut min = exp.clone();
            let everywhere = terms[1..].iter().all(|term| {
                term.as_coeff_factors().1.iter().any(|other| {
                    let (other_base, other_exp) = other.as_base_exp();
                    if other_base != base || !other_exp.is_number() {
                        return false;
                    }
                    if other_exp.to_f64() < min.to_f64() {
                        min = other_exp;
                    }
                    true
                })
            });
            if everywhere {
                shared.push((base, min));
            }
        }
    }

    if content == 1 && shared.is_empty() {
        return SymExpr::Add(terms.to_vec());
    }

    let common = shared
        .iter()
        .map(|(base, exp)| SymExpr::pow(base.clone(), exp.clone()))
        .collect::<Vec<_>>();
    let divisor = SymExpr::mul(
        common
            .iter()
            .cloned()
            .chain(std::iter::once(SymExpr::from_number(Number::from(content.clone()).normalize()))),
    );
    let inner = SymExpr::add(terms.iter().map(|term| SymExpr::mul([term.clone(), SymExpr::recip(divisor.clone())])));

    let mut factors = common;
    factors.push(inner);
    product_raw(Number::from(content).normalize(), factors)
}

/// Solves a square linear system over the rationals with Gaussian elimination. Returns [`None`]
/// if the system is singular.
pub fn solve_linear(mut matrix: Vec<Vec<Rational>>, mut rhs: Vec<Rational>) -> Option<Vec<Rational>> {
    let n = rhs.len();
    for col in 0..n {
        let pivot = (col..n).find(|&row| matrix[row][col].cmp0() != Ordering::Equal)?;
        matrix.swap(col, pivot);
        rhs.swap(col, pivot);
        for row in 0..n {
            if row == col || matrix[row][col].cmp0() == Ordering::Equal {
                continue;
            }
            let factor = Rational::from(&matrix[row][col] / &matrix[col][col]);
            for k in col..n {
                let delta = Rational::from(&factor * &matrix[col][k]);
                matrix[row][k] -= delta;
            }
            let delta = Rational::from(&factor * &rhs[col]);
            rhs[row] -= delta;
        }
    }
    Some((0..n).map(|i| Rational::from(&rhs[i] / &matrix[i][i])).collect())
}

/// Converts a primitive integer polynomial to an expression, for callers outside this module.
pub fn primitive_expr(poly: &Poly, var: &str) -> SymExpr {
    let (_, ints) = poly.primitive();
    integer_poly_expr(&ints, var)
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

    fn poly(coeffs: &[i64]) -> Poly {
        Poly::new(coeffs.iter().map(|c| Rational::from(*c)).collect())
    }

    #[test]
    fn arithmetic() {
        let a = poly(&[-1, 0, 1]);
        let b = poly(&[-1, 1]);
        let (q, r) = a.div_rem(&b).unwrap();
        assert_eq!(q, poly(&[1, 1]));
        assert!(r.is_zero());
        assert_eq!(a.gcd(&poly(&[1, 2, 1])), poly(&[1, 1]));
        assert_eq!(a.derivative(), poly(&[0, 2]));
    }

    #[test]
    fn roots() {
        assert_eq!(poly(&[-1, 0, 1]).rational_roots(), vec![Rational::from(-1), Rational::from(1)]);
        assert_eq!(poly(&[-1, 2]).rational_roots(), vec![rational(1, 2)]);
        assert!(poly(&[1, 0, 1]).rational_roots().is_empty());
        let (roots, rest) = poly(&[0, 0, 1, 1]).split_rational_roots();
        assert_eq!(roots, vec![(Rational::from(-1), 1), (Rational::new(), 2)]);
        assert_eq!(rest.degree(), 0);
    }

    #[test]
    fn expansion() {
        let square = SymExpr::pow(x() + n(1), n(2));
        assert_eq!(expand(&square).to_string(), "x**2 + 2*x + 1");
        let y = SymExpr::symbol("y");
        assert_eq!(expand(&(x() * (y.clone() + n(1)))).to_string(), "x*y + x");
        let coeffs = collect_coeffs(&(SymExpr::pow(x(), n(2)) * y.clone() + x() + y), "x").unwrap();
        assert_eq!(coeffs.iter().map(SymExpr::to_string).collect::<Vec<_>>(), vec!["y", "1", "y"]);
    }

    #[test]
    fn factoring() {
        let square = SymExpr::pow(x(), n(2)) - n(1);
        assert_eq!(factor(&square).to_string(), "(x - 1)*(x + 1)");
        let scaled = n(2) * SymExpr::pow(x(), n(2)) - n(2);
        assert_eq!(factor(&scaled).to_string(), "2*(x - 1)*(x + 1)");
        let y = SymExpr::symbol("y");
        assert_eq!(factor(&(x() * y + x())).to_string(), "x*(y + 1)");
    }

    #[test]
    fn linear_system() {
        let matrix = vec![
            vec![Rational::from(1), Rational::from(1)],
            vec![Rational::from(1), Rational::from(-1)],
        ];
        let solution = solve_linear(matrix, vec![Rational::from(3), Rational::from(1)]).unwrap();
        assert_eq!(solution, vec![Rational::from(2), Rational::from(1)]);
    }
}
