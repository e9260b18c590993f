//! Canonical constructors for sums, products, powers, relations and logical connectives, along
//! with the arithmetic operators built on them.
//!
//! Every constructor returns an expression in canonical form, applying only the rewrites that are
//! always valid: numbers are folded, like terms and factors are combined, integer powers are
//! computed exactly, and perfect powers are pulled out of roots. Anything that needs a choice
//! (expanding products, factoring, trigonometric identities) is left to [`crate::symbolic::simplify`].

use crate::primitive::{int, rational};
use rug::{Integer, Rational};
use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};
use super::{
    number::{exact_root, extract_perfect_power, Number},
    order::{cmp_exprs, ordered_factors, ordered_terms},
    Constant,
    Primary,
    RelOp,
    SymExpr,
};

/// Tracks the infinities seen while building a sum or product.
#[derive(Default)]
struct Infinities {
    positive: bool,
    negative: bool,
    complex: bool,
}

impl Infinities {
    /// Records the constant if it is an infinity, returning true if it was.
    fn record(&mut self, c: Constant) -> bool {
        match c {
            Constant::Infinity => self.positive = true,
            Constant::NegativeInfinity => self.negative = true,
            Constant::ComplexInfinity => self.complex = true,
            _ => return false,
        }
        true
    }

    fn any(&self) -> bool {
        self.positive || self.negative || self.complex
    }
}

impl SymExpr {
    /// Builds a product without canonicalizing it: no factors is one, a single factor is itself.
    pub fn mul_raw(mut factors: Vec<SymExpr>) -> SymExpr {
        match factors.len() {
            0 => SymExpr::one(),
            1 => factors.remove(0),
            _ => SymExpr::Mul(factors),
        }
    }

    /// Builds a sum without canonicalizing it: no terms is zero, a single term is itself.
    pub fn add_raw(mut terms: Vec<SymExpr>) -> SymExpr {
        match terms.len() {
            0 => SymExpr::zero(),
            1 => terms.remove(0),
            _ => SymExpr::Add(terms),
        }
    }

    /// Multiplies an expression by a number, distributing the number over a sum.
    pub fn scale(coeff: &Number, expr: SymExpr) -> SymExpr {
        if coeff.is_one() {
            return expr;
        }
        if coeff.is_zero() {
            return SymExpr::from_number(Number::zero());
        }
        match expr {
            SymExpr::Add(terms) => SymExpr::add(terms.into_iter().map(|term| SymExpr::scale(coeff, term))),
            other => {
                let (inner, mut factors) = other.as_coeff_factors();
                let coeff = coeff.mul(&inner);
                if factors.is_empty() {
                    return SymExpr::from_number(coeff);
                }
                if coeff.is_zero() {
                    return SymExpr::from_number(coeff);
                }
                if !coeff.is_one() {
                    factors.insert(0, SymExpr::from_number(coeff));
                }
                SymExpr::mul_raw(factors)
            },
        }
    }

    /// Adds the given terms, returning the canonical sum.
    pub fn add(terms: impl IntoIterator<Item = SymExpr>) -> SymExpr {
        let mut flat = Vec::new();
        for term in terms {
            match term {
                SymExpr::Add(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        let mut constant = Number::zero();
        let mut infinities = Infinities::default();
        let mut collected: Vec<(SymExpr, Number)> = Vec::new();

        for term in flat {
            if let Some(n) = term.as_number() {
                constant = constant.add(&n);
                continue;
            }
            match term.as_constant() {
                Some(Constant::NaN) => return SymExpr::nan(),
                Some(c) if infinities.record(c) => continue,
                _ => {},
            }

            let (coeff, rest) = term.as_coeff_mul();
            match collected.iter_mut().find(|(existing, _)| *existing == rest) {
                Some((_, existing)) => *existing = existing.add(&coeff),
                None => collected.push((rest, coeff)),
            }
        }

        if infinities.any() {
            let infinity = match (infinities.positive, infinities.negative, infinities.complex) {
                (true, true, _) | (true, _, true) | (_, true, true) => return SymExpr::nan(),
                (true, false, false) => Constant::Infinity,
                (false, true, false) => Constant::NegativeInfinity,
                _ => Constant::ComplexInfinity,
            };
            constant = Number::zero();
            collected.push((SymExpr::constant(infinity), Number::one()));
        }

        let mut out = collected
            .into_iter()
            .filter(|(_, coeff)| !coeff.is_zero())
            .map(|(rest, coeff)| SymExpr::scale(&coeff, rest))
            .collect::<Vec<_>>();

        // a term can become a sum again when a coefficient distributes over it
        if out.iter().any(|term| matches!(term, SymExpr::Add(_))) {
            out.push(SymExpr::from_number(constant));
            return SymExpr::add(out);
        }

        if out.is_empty() {
            return SymExpr::from_number(constant);
        }
        if !constant.is_zero() {
            out.push(SymExpr::from_number(constant));
        }

        match out.len() {
            1 => out.remove(0),
            _ => SymExpr::Add(ordered_terms(&out)),
        }
    }

    /// Multiplies the given factors, returning the canonical product.
    pub fn mul(factors: impl IntoIterator<Item = SymExpr>) -> SymExpr {
        let mut flat = Vec::new();
        for factor in factors {
            match factor {
                SymExpr::Mul(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        let mut coeff = Number::one();
        let mut infinities = Infinities::default();
        let mut powers: Vec<(SymExpr, SymExpr)> = Vec::new();

        for factor in flat {
            if let Some(n) = factor.as_number() {
                coeff = coeff.mul(&n);
                continue;
            }
            match factor.as_constant() {
                Some(Constant::NaN) => return SymExpr::nan(),
                Some(c) if infinities.record(c) => continue,
                _ => {},
            }

            let (base, exp) = factor.as_base_exp();
            match powers.iter_mut().find(|(existing, _)| *existing == base) {
                Some((_, existing)) => *existing = SymExpr::add([existing.clone(), exp]),
                None => powers.push((base, exp)),
            }
        }

        combine_rational_powers(&mut powers);

        let mut rest = Vec::new();
        let mut again = false;
        for (base, exp) in powers {
            let power = SymExpr::pow(base, exp);
            if let Some(n) = power.as_number() {
                coeff = coeff.mul(&n);
            } else if power.as_constant().map_or(false, |c| c == Constant::NaN) {
                return SymExpr::nan();
            } else if let Some(c) = power.as_constant().filter(Constant::is_infinite) {
                infinities.record(c);
            } else {
                again |= matches!(power, SymExpr::Mul(_));
                rest.push(power);
            }
        }

        if infinities.any() {
            if coeff.is_zero() {
                return SymExpr::nan();
            }
            let infinity = if infinities.complex || infinities.positive && infinities.negative {
                Constant::ComplexInfinity
            } else if infinities.negative != coeff.is_negative() {
                Constant::NegativeInfinity
            } else {
                Constant::Infinity
            };
            rest.push(SymExpr::constant(infinity));
            if rest.len() == 1 {
                return rest.remove(0);
            }
            return SymExpr::Mul(ordered_factors(&rest));
        }

        if coeff.is_zero() {
            return SymExpr::from_number(coeff);
        }

        if again {
            rest.insert(0, SymExpr::from_number(coeff));
            return SymExpr::mul(rest);
        }

        match rest.len() {
            0 => SymExpr::from_number(coeff),
            1 => SymExpr::scale(&coeff, rest.remove(0)),
            _ => {
                let mut factors = ordered_factors(&rest);
                if !coeff.is_one() {
                    factors.insert(0, SymExpr::from_number(coeff));
                }
                SymExpr::Mul(factors)
            },
        }
    }

    /// Raises `base` to the power of `exp`, returning the canonical power.
    pub fn pow(base: SymExpr, exp: SymExpr) -> SymExpr {
        if exp.is_zero() && !exp.is_float() {
            return SymExpr::one();
        }
        if exp.is_one() {
            return base;
        }
        if base.as_constant() == Some(Constant::NaN) || exp.as_constant() == Some(Constant::NaN) {
            return SymExpr::nan();
        }
        if base.is_one() {
            return SymExpr::one();
        }

        if base.is_zero() {
            if let Some(e) = exp.as_number() {
                return match e.sign() {
                    Ordering::Greater => base,
                    _ => SymExpr::zoo(),
                };
            }
        }

        if let (Some(b), Some(e)) = (base.as_number(), exp.as_number()) {
            if let Some(power) = pow_numbers(&b, &e) {
                return power;
            }
            return SymExpr::Exp(Box::new(base), Box::new(exp));
        }

        match base.as_constant() {
            Some(Constant::E) => return SymExpr::call("exp", vec![exp]),
            Some(Constant::I) => {
                if let Some(n) = exp.as_integer() {
                    let cycle = n.mod_u(4);
                    return match cycle {
                        0 => SymExpr::one(),
                        1 => SymExpr::i(),
                        2 => SymExpr::integer(-1),
                        _ => SymExpr::mul([SymExpr::integer(-1), SymExpr::i()]),
                    };
                }
            },
            Some(Constant::Infinity) => {
                if let Some(e) = exp.as_number() {
                    return if e.is_positive() { base } else { SymExpr::zero() };
                }
            },
            Some(Constant::ComplexInfinity) => {
                if let Some(e) = exp.as_number() {
                    return if e.is_positive() { base } else { SymExpr::zero() };
                }
            },
            _ => {},
        }

        match base {
            SymExpr::Exp(inner_base, inner_exp) if exp.is_integer() => {
                SymExpr::pow(*inner_base, SymExpr::mul([*inner_exp, exp]))
            },
            SymExpr::Primary(Primary::Call(ref name, ref args)) if name == "exp" && exp.is_integer() && args.len() == 1 => {
                SymExpr::call("exp", vec![SymExpr::mul([args[0].clone(), exp])])
            },
            SymExpr::Mul(factors) => {
                if exp.is_integer() {
                    return SymExpr::mul(factors.into_iter().map(|factor| SymExpr::pow(factor, exp.clone())));
                }

                // pull a numeric coefficient out of a root: sqrt(4*x) = 2*sqrt(x)
                let coeff = factors.first().and_then(SymExpr::as_number).filter(|c| !c.is_float());
                match coeff {
                    Some(c) if exp.as_rational().is_some() && !(c.is_negative() && c.abs().is_one()) => {
                        let rest = SymExpr::mul_raw(factors[1..].to_vec());
                        let (c, rest) = if c.is_negative() {
                            (c.neg(), SymExpr::scale(&Number::from(-1), rest))
                        } else {
                            (c, rest)
                        };
                        SymExpr::mul([
                            SymExpr::pow(SymExpr::from_number(c), exp.clone()),
                            SymExpr::pow(rest, exp),
                        ])
                    },
                    _ => SymExpr::Exp(Box::new(SymExpr::Mul(factors)), Box::new(exp)),
                }
            },
            other => SymExpr::Exp(Box::new(other), Box::new(exp)),
        }
    }

    /// Builds `base**(numer/denom)`.
    pub fn pow_rational(base: SymExpr, numer: i64, denom: i64) -> SymExpr {
        SymExpr::pow(base, SymExpr::rational(numer, denom))
    }

    /// Builds `expr**(1/2)`.
    pub fn sqrt(expr: SymExpr) -> SymExpr {
        SymExpr::pow_rational(expr, 1, 2)
    }

    /// Builds `1/expr`.
    pub fn recip(expr: SymExpr) -> SymExpr {
        SymExpr::pow(expr, SymExpr::integer(-1))
    }

    /// Builds a relation between two expressions, deciding it when both sides are numbers.
    pub fn relational(op: RelOp, lhs: SymExpr, rhs: SymExpr) -> SymExpr {
        if matches!(op, RelOp::Eq | RelOp::Ne) && lhs == rhs && !lhs.as_constant().map_or(false, |c| c == Constant::NaN) {
            return SymExpr::boolean(op == RelOp::Eq);
        }

        if let (Some(a), Some(b)) = (lhs.as_boolean(), rhs.as_boolean()) {
            if matches!(op, RelOp::Eq | RelOp::Ne) {
                return SymExpr::boolean((a == b) == (op == RelOp::Eq));
            }
        }

        if let Some(ordering) = compare_constants(&lhs, &rhs) {
            return SymExpr::boolean(op.holds(ordering));
        }

        SymExpr::Relational(op, Box::new(lhs), Box::new(rhs))
    }

    /// Builds the conjunction of the given expressions.
    pub fn and(items: Vec<SymExpr>) -> SymExpr {
        let mut out: Vec<SymExpr> = Vec::new();
        for item in items.into_iter().flat_map(|item| match item {
            SymExpr::And(inner) => inner,
            other => vec![other],
        }) {
            match item.as_boolean() {
                Some(false) => return SymExpr::boolean(false),
                Some(true) => {},
                None => {
                    if out.iter().any(|existing| is_negation_of(existing, &item)) {
                        return SymExpr::boolean(false);
                    }
                    if !out.contains(&item) {
                        out.push(item);
                    }
                },
            }
        }
        match out.len() {
            0 => SymExpr::boolean(true),
            1 => out.remove(0),
            _ => SymExpr::And(ordered_logic(out)),
        }
    }

    /// Builds the disjunction of the given expressions.
    pub fn or(items: Vec<SymExpr>) -> SymExpr {
        let mut out: Vec<SymExpr> = Vec::new();
        for item in items.into_iter().flat_map(|item| match item {
            SymExpr::Or(inner) => inner,
            other => vec![other],
        }) {
            match item.as_boolean() {
                Some(true) => return SymExpr::boolean(true),
                Some(false) => {},
                None => {
                    if out.iter().any(|existing| is_negation_of(existing, &item)) {
                        return SymExpr::boolean(true);
                    }
                    if !out.contains(&item) {
                        out.push(item);
                    }
                },
            }
        }
        match out.len() {
            0 => SymExpr::boolean(false),
            1 => out.remove(0),
            _ => SymExpr::Or(ordered_logic(out)),
        }
    }

    /// Builds the negation of the given expression.
    pub fn not(item: SymExpr) -> SymExpr {
        match item {
            SymExpr::Primary(Primary::Boolean(b)) => SymExpr::boolean(!b),
            SymExpr::Not(inner) => *inner,
            SymExpr::Relational(op, lhs, rhs) => {
                let negated = match op {
                    RelOp::Eq => RelOp::Ne,
                    RelOp::Ne => RelOp::Eq,
                    RelOp::Lt => RelOp::Ge,
                    RelOp::Le => RelOp::Gt,
                    RelOp::Gt => RelOp::Le,
                    RelOp::Ge => RelOp::Lt,
                };
                SymExpr::Relational(negated, lhs, rhs)
            },
            other => SymExpr::Not(Box::new(other)),
        }
    }

    /// Builds the exclusive or of the given expressions.
    pub fn xor(items: Vec<SymExpr>) -> SymExpr {
        let mut out: Vec<SymExpr> = Vec::new();
        let mut negate = false;
        for item in items.into_iter().flat_map(|item| match item {
            SymExpr::Xor(inner) => inner,
            other => vec![other],
        }) {
            match item.as_boolean() {
                Some(true) => negate = !negate,
                Some(false) => {},
                None => match out.iter().position(|existing| *existing == item) {
                    // a ^ a is false
                    Some(i) => {
                        out.remove(i);
                    },
                    None => out.push(item),
                },
            }
        }
        let result = match out.len() {
            0 => SymExpr::boolean(false),
            1 => out.remove(0),
            _ => SymExpr::Xor(ordered_logic(out)),
        };
        if negate {
            SymExpr::not(result)
        } else {
            result
        }
    }

    /// Builds `a => b`, which is `~a | b`.
    pub fn implies(a: SymExpr, b: SymExpr) -> SymExpr {
        SymExpr::or(vec![SymExpr::not(a), b])
    }
}

fn ordered_logic(mut items: Vec<SymExpr>) -> Vec<SymExpr> {
    items.sort_by(cmp_exprs);
    items
}

fn is_negation_of(a: &SymExpr, b: &SymExpr) -> bool {
    matches!(a, SymExpr::Not(inner) if **inner == *b) || matches!(b, SymExpr::Not(inner) if **inner == *a)
}

/// Compares two expressions that both have a real numeric value.
fn compare_constants(lhs: &SymExpr, rhs: &SymExpr) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return Some(a.cmp_value(&b));
    }
    let infinity_rank = |expr: &SymExpr| match expr.as_constant() {
        Some(Constant::Infinity) => Some(1),
        Some(Constant::NegativeInfinity) => Some(-1),
        _ => None,
    };
    match (infinity_rank(lhs), infinity_rank(rhs)) {
        (Some(a), Some(b)) => return Some(a.cmp(&b)),
        (Some(a), None) if super::order::is_number_like(rhs) => return Some(a.cmp(&0)),
        (None, Some(b)) if super::order::is_number_like(lhs) => return Some(0.cmp(&b)),
        _ => {},
    }

    if !super::order::is_number_like(lhs) || !super::order::is_number_like(rhs) {
        return None;
    }
    let a = crate::symbolic::evalf::complex_value(lhs)?;
    let b = crate::symbolic::evalf::complex_value(rhs)?;
    if !a.imag().is_zero() || !b.imag().is_zero() {
        return None;
    }
    a.real().partial_cmp(b.real())
}

/// Combines integer bases raised to the same fractional power: `sqrt(2)*sqrt(3) = sqrt(6)`.
fn combine_rational_powers(powers: &mut Vec<(SymExpr, SymExpr)>) {
    let mut i = 0;
    while i < powers.len() {
        let combinable = |(base, exp): &(SymExpr, SymExpr)| {
            base.as_integer().map_or(false, |n| n.cmp0() == Ordering::Greater)
                && exp.as_rational().map_or(false, |r| *r.denom() != 1)
        };
        if !combinable(&powers[i]) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < powers.len() {
            if combinable(&powers[j]) && powers[j].1 == powers[i].1 {
                let (other, _) = powers.remove(j);
                let product = powers[i].0.as_integer().cloned().unwrap_or_default()
                    * other.as_integer().cloned().unwrap_or_default();
                powers[i].0 = SymExpr::Primary(Primary::Integer(product));
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

/// Raises a number to a numeric power. Returns [`None`] if the power should stay unevaluated.
fn pow_numbers(base: &Number, exp: &Number) -> Option<SymExpr> {
    if base.is_float() || exp.is_float() {
        return base.pow_float(exp).map(SymExpr::from_number);
    }

    if let Some(n) = exp.as_integer() {
        return base.pow_integer(n).map(SymExpr::from_number);
    }

    let exp = exp.to_rational()?;
    match base {
        Number::Integer(n) => pow_integer_rational(n, &exp),
        Number::Rational(r) => {
            // (n/d)**e = n**e * d**-e
            let (numer, denom) = r.clone().into_numer_denom();
            let top = pow_integer_rational(&numer, &exp)
                .unwrap_or_else(|| raw_pow(numer, exp.clone()));
            let bottom = pow_integer_rational(&denom, &(-exp.clone()))
                .unwrap_or_else(|| raw_pow(denom, -exp));
            Some(SymExpr::mul([top, bottom]))
        },
        Number::Float(_) => None,
    }
}

fn raw_pow(base: Integer, exp: Rational) -> SymExpr {
    SymExpr::Exp(
        Box::new(SymExpr::Primary(Primary::Integer(base))),
        Box::new(SymExpr::from_number(Number::from(exp))),
    )
}

/// Computes `n**(p/q)` for a non-integer exponent, extracting the integer part of the exponent
/// and any perfect powers from under the root. Returns [`None`] if nothing can be done.
fn pow_integer_rational(n: &Integer, exp: &Rational) -> Option<SymExpr> {
    let (p, q) = exp.clone().into_numer_denom();
    if q == 1 {
        return Number::Integer(n.clone()).pow_integer(&p).map(SymExpr::from_number);
    }

    // p/q = whole + r/q with 0 < r < q
    let (whole, r) = p.clone().div_rem_floor(q.clone());
    let q_small = q.to_u32()?;
    let r_small = r.to_u32()?;

    let magnitude = n.clone().abs();
    let mut factors = Vec::new();

    let whole_power = Number::Integer(n.clone()).pow_integer(&whole)?;
    factors.push(SymExpr::from_number(whole_power));

    if n.cmp0() == Ordering::Less {
        if q_small == 2 {
            factors.push(SymExpr::i());
        } else {
            factors.push(raw_pow(int(-1), rational(r.clone(), q.clone())));
        }
    }

    let (outside, inside) = extract_perfect_power(&magnitude, q_small);
    if outside != 1 {
        let outside_power = Number::Integer(outside).pow_integer(&r)?;
        factors.push(SymExpr::from_number(outside_power));
    }
    if inside != 1 {
        // reduce the root when the rest is a perfect power of a divisor of the degree
        let mut radical = raw_pow(inside.clone(), rational(r.clone(), q.clone()));
        for k in (2..q_small).rev() {
            if q_small % k != 0 {
                continue;
            }
            if let Some(root) = exact_root(&inside, k) {
                let reduced = Rational::from((int(r_small) * k, int(q_small)));
                radical = match pow_integer_rational(&root, &reduced) {
                    Some(expr) => expr,
                    None => raw_pow(root, reduced),
                };
                break;
            }
        }
        factors.push(radical);
    }

    let is_unchanged = factors.len() == 2
        && factors[0].is_one()
        && matches!(&factors[1], SymExpr::Exp(b, e) if b.as_integer() == Some(n) && e.as_rational().as_ref() == Some(exp));
    if is_unchanged {
        return Some(factors.remove(1));
    }
    Some(SymExpr::mul(factors))
}

impl Add for SymExpr {
    type Output = SymExpr;

    fn add(self, rhs: SymExpr) -> SymExpr {
        SymExpr::add([self, rhs])
    }
}

impl Sub for SymExpr {
    type Output = SymExpr;

    fn sub(self, rhs: SymExpr) -> SymExpr {
        SymExpr::add([self, -rhs])
    }
}

impl Mul for SymExpr {
    type Output = SymExpr;

    fn mul(self, rhs: SymExpr) -> SymExpr {
        SymExpr::mul([self, rhs])
    }
}

impl Div for SymExpr {
    type Output = SymExpr;

    fn div(self, rhs: SymExpr) -> SymExpr {
        SymExpr::mul([self, SymExpr::recip(rhs)])
    }
}

impl Neg for SymExpr {
    type Output = SymExpr;

    fn neg(self) -> SymExpr {
        SymExpr::scale(&Number::from(-1), self)
    }
}

macro_rules! ref_ops {
    ($($trait:ident $method:ident),*) => {
        $(
            impl $trait<&SymExpr> for &SymExpr {
                type Output = SymExpr;

                fn $method(self, rhs: &SymExpr) -> SymExpr {
                    $trait::$method(self.clone(), rhs.clone())
                }
            }
        )*
    };
}

ref_ops!(Add add, Sub sub, Mul mul, Div div);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::symbolic::print::text::to_string;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn y() -> SymExpr {
        SymExpr::symbol("y")
    }

    fn n(value: i64) -> SymExpr {
        SymExpr::integer(value)
    }

    #[test]
    fn like_terms() {
        assert_eq!(x() + x() + x(), n(3) * x());
        assert_eq!(x() - x(), n(0));
        assert_eq!(to_string(&(n(2) * x() + y() + x())), "3*x + y");
    }

    #[test]
    fn like_factors() {
        assert_eq!(x() * x(), SymExpr::pow(x(), n(2)));
        assert_eq!(x() / x(), n(1));
        assert_eq!(to_string(&(x() * y() * n(2) * x())), "2*x**2*y");
    }

    #[test]
    fn coefficient_distributes() {
        assert_eq!(to_string(&(n(2) * (x() + n(1)))), "2*x + 2");
        assert_eq!(to_string(&-(x() + n(1))), "-x - 1");
        assert_eq!(to_string(&(x() * (x() + n(1)))), "x*(x + 1)");
    }

    #[test]
    fn roots() {
        assert_eq!(to_string(&SymExpr::sqrt(n(8))), "2*sqrt(2)");
        assert_eq!(to_string(&SymExpr::sqrt(n(16))), "4");
        assert_eq!(to_string(&SymExpr::sqrt(n(-4))), "2*I");
        assert_eq!(to_string(&SymExpr::pow_rational(n(4), 1, 4)), "sqrt(2)");
        assert_eq!(to_string(&SymExpr::pow_rational(n(2), 3, 2)), "2*sqrt(2)");
        assert_eq!(to_string(&SymExpr::sqrt(SymExpr::rational(1, 2))), "sqrt(2)/2");
        assert_eq!(to_string(&(SymExpr::sqrt(n(2)) * SymExpr::sqrt(n(3)))), "sqrt(6)");
        assert_eq!(SymExpr::sqrt(n(2)) * SymExpr::sqrt(n(2)), n(2));
    }

    #[test]
    fn powers() {
        assert_eq!(SymExpr::pow(SymExpr::i(), n(2)), n(-1));
        assert_eq!(SymExpr::pow(n(0), n(-1)), SymExpr::zoo());
        assert_eq!(SymExpr::pow(SymExpr::pow(x(), n(2)), n(3)), SymExpr::pow(x(), n(6)));
        assert_eq!(to_string(&SymExpr::pow(n(2) * x(), n(2))), "4*x**2");
        assert_eq!(to_string(&SymExpr::sqrt(n(4) * x())), "2*sqrt(x)");
        assert_eq!(SymExpr::pow(SymExpr::e(), x()), SymExpr::call("exp", vec![x()]));
    }

    #[test]
    fn infinities() {
        let oo = SymExpr::constant(Constant::Infinity);
        assert_eq!(oo.clone() + n(1), oo.clone());
        assert_eq!(oo.clone() - oo.clone(), SymExpr::nan());
        assert_eq!(n(-2) * oo, SymExpr::constant(Constant::NegativeInfinity));
    }

    #[test]
    fn relations_and_logic() {
        assert_eq!(SymExpr::relational(RelOp::Lt, n(1), n(2)), SymExpr::boolean(true));
        assert_eq!(SymExpr::relational(RelOp::Gt, SymExpr::pi(), n(3)), SymExpr::boolean(true));
        assert!(matches!(SymExpr::relational(RelOp::Eq, x(), n(0)), SymExpr::Relational(..)));

        let a = SymExpr::symbol("a");
        assert_eq!(SymExpr::and(vec![a.clone(), SymExpr::boolean(true)]), a.clone());
        assert_eq!(SymExpr::and(vec![a.clone(), SymExpr::not(a.clone())]), SymExpr::boolean(false));
        assert_eq!(SymExpr::xor(vec![a.clone(), a.clone()]), SymExpr::boolean(false));
        assert_eq!(SymExpr::not(SymExpr::not(a.clone())), a);
    }
}
