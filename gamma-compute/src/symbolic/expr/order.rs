//! The canonical ordering of terms and factors.
//!
//! Factors of a product are ordered by [`sort_key`]: numbers first, then atoms such as symbols and
//! constants, then sums and powers, then function calls, then everything else. Terms of a sum are
//! ordered like a polynomial in lexicographic order: terms with higher powers of the leading
//! generators come first, and terms that only differ by a numeric factor are ordered by the value
//! of that factor. This is the order the printers show, so `x**2 + x + 1` and `1 + sqrt(2)` read
//! the way a person would write them.

use crate::primitive::int;
use crate::symbolic::evalf::complex_value;
use rug::{Integer, Rational};
use super::{call::is_known_function, number::Number, Primary, SymExpr};
use std::cmp::Ordering;

/// Rank of the known functions among the function calls. Functions with no entry rank after
/// these, except undefined functions, which rank before them.
fn function_rank(name: &str) -> u32 {
    match name {
        "exp" => 10,
        "log" => 11,
        "sin" => 20,
        "cos" => 21,
        "tan" => 22,
        "cot" => 23,
        "sinh" => 30,
        "cosh" => 31,
        "tanh" => 32,
        "coth" => 33,
        "conjugate" => 40,
        "re" => 41,
        "im" => 42,
        "arg" => 43,
        _ if is_known_function(name) => 10_000,
        _ => 0,
    }
}

/// A number wrapper with a total order, compared by value.
#[derive(Debug, Clone)]
pub struct OrdNumber(pub Number);

impl PartialEq for OrdNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrdNumber {}

impl PartialOrd for OrdNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_value(&other.0)
    }
}

/// An argument inside a [`SortKey`]: atoms are keyed by their name, anything else by its own key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyArg {
    Name(String),
    Key(SortKey),
}

/// The key an expression is sorted by among the factors of a product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    /// The kind of expression: a class number, a rank within the class, and the class name.
    class: (u8, u32, String),

    /// The number of arguments, then the arguments.
    args: (usize, Vec<KeyArg>),

    /// The exponent, if the expression is a power. Numbers have no exponent, which sorts first.
    exp: Option<Box<SortKey>>,

    /// The numeric coefficient.
    coeff: OrdNumber,
}

fn class_key(expr: &SymExpr) -> (u8, u32, String) {
    match expr {
        SymExpr::Primary(Primary::Integer(_) | Primary::Rational(_) | Primary::Float(_)) => {
            (1, 0, "Number".to_string())
        },
        SymExpr::Primary(Primary::Call(name, _)) => (4, function_rank(name), name.clone()),
        SymExpr::Primary(_) => (2, 0, expr.class_name()),
        SymExpr::Mul(_) => (3, 0, "Mul".to_string()),
        SymExpr::Add(_) => (3, 1, "Add".to_string()),
        SymExpr::Exp(..) => (3, 2, "Pow".to_string()),
        other => (5, 0, other.class_name()),
    }
}

fn one_key() -> SortKey {
    SortKey {
        class: (1, 0, "Number".to_string()),
        args: (0, Vec::new()),
        exp: None,
        coeff: OrdNumber(Number::one()),
    }
}

/// Returns the key of the expression for ordering factors.
pub fn sort_key(expr: &SymExpr) -> SortKey {
    if let Some(n) = expr.as_number() {
        return SortKey {
            class: class_key(expr),
            args: (0, Vec::new()),
            exp: None,
            coeff: OrdNumber(n),
        };
    }

    let (coeff, rest) = expr.as_coeff_mul();
    let (base, exp) = match rest {
        SymExpr::Exp(base, exp) => (*base, Some(Box::new(sort_key(&exp)))),
        other => (other, Some(Box::new(one_key()))),
    };

    let args = if base.is_atom() {
        vec![KeyArg::Name(crate::symbolic::print::text::to_string(&base))]
    } else {
        let children = match &base {
            SymExpr::Add(terms) => ordered_terms(terms),
            SymExpr::Mul(factors) => ordered_factors(factors),
            other => other.children().into_iter().cloned().collect(),
        };
        children.iter().map(|child| KeyArg::Key(sort_key(child))).collect()
    };

    SortKey {
        class: class_key(&base),
        args: (args.len(), args),
        exp,
        coeff: OrdNumber(coeff),
    }
}

/// Compares two expressions by their [`sort_key`].
pub fn cmp_exprs(a: &SymExpr, b: &SymExpr) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Returns the factors sorted by [`sort_key`].
pub fn ordered_factors(factors: &[SymExpr]) -> Vec<SymExpr> {
    let mut keyed = factors.iter().map(|factor| (sort_key(factor), factor.clone())).collect::<Vec<_>>();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, factor)| factor).collect()
}

/// Returns true if the expression has a numeric value: no free symbols, no undefined functions,
/// and nothing unevaluated.
pub fn is_number_like(expr: &SymExpr) -> bool {
    expr.is_constant()
        && !expr.contains(&|sub| match sub {
            SymExpr::Primary(Primary::Call(name, _)) => !is_known_function(name),
            SymExpr::Primary(Primary::Boolean(_)) => true,
            SymExpr::Derivative(..) | SymExpr::Integral(..) | SymExpr::Sum(..) | SymExpr::Product(..) => true,
            other => other.is_boolean_valued(),
        })
}

/// Splits a power into a base and an integer exponent, so that `x**(3/2)` is `sqrt(x)` cubed and
/// `exp(2*x)` is `exp(x)` squared.
pub fn decompose_power(expr: &SymExpr) -> (SymExpr, Integer) {
    let (base, exp) = expr.as_base_exp();
    if let Some(n) = exp.as_integer() {
        return (base, n.clone());
    }
    if let Some(r) = exp.as_rational() {
        let (p, q) = r.into_numer_denom();
        return (SymExpr::pow(base, SymExpr::from_number(Number::from(Rational::from((int(1), q))))), p);
    }
    if exp.is_number() {
        return (expr.clone(), int(1));
    }

    let (coeff, tail) = exp.as_coeff_mul();
    match coeff.to_rational() {
        Some(r) if r == -1 => (SymExpr::pow(base, tail), int(-1)),
        Some(r) if r != 1 => {
            let (p, q) = r.into_numer_denom();
            let tail = SymExpr::mul([SymExpr::from_number(Number::from(Rational::from((int(1), q)))), tail]);
            (SymExpr::pow(base, tail), p)
        },
        _ => (expr.clone(), int(1)),
    }
}

/// The per-term data used to order the terms of a sum.
struct TermKey {
    /// Exponent of each generator, in generator order.
    monom: Vec<Integer>,

    /// Real and imaginary part of the numeric coefficient.
    coeff: (f64, f64),
}

/// Returns the terms sorted into polynomial (lexicographic) order.
pub fn ordered_terms(terms: &[SymExpr]) -> Vec<SymExpr> {
    let mut gens: Vec<SymExpr> = Vec::new();
    let mut parts: Vec<(Vec<(SymExpr, Integer)>, (f64, f64))> = Vec::with_capacity(terms.len());

    for term in terms {
        let (coeff, factors) = term.as_coeff_factors();
        let mut re = coeff.to_f64();
        let mut im = 0.0;
        let mut powers = Vec::new();
        for factor in factors {
            if is_number_like(&factor) {
                if let Some(value) = complex_value(&factor) {
                    let (vr, vi) = (value.real().to_f64(), value.imag().to_f64());
                    let (r, i) = (re * vr - im * vi, re * vi + im * vr);
                    re = r;
                    im = i;
                    continue;
                }
            }
            let (base, exp) = decompose_power(&factor);
            if !gens.contains(&base) {
                gens.push(base.clone());
            }
            powers.push((base, exp));
        }
        parts.push((powers, (re, im)));
    }

    let gens = ordered_factors(&gens);
    let keys = parts
        .into_iter()
        .map(|(powers, coeff)| TermKey {
            monom: gens
                .iter()
                .map(|gen| {
                    powers
                        .iter()
                        .filter(|(base, _)| base == gen)
                        .fold(int(0), |acc, (_, exp)| acc + exp)
                })
                .collect(),
            coeff,
        })
        .collect::<Vec<_>>();

    let mut indices = (0..terms.len()).collect::<Vec<_>>();
    indices.sort_by(|&a, &b| {
        let (ka, kb) = (&keys[a], &keys[b]);
        // higher exponents of earlier generators first
        kb.monom.cmp(&ka.monom)
            .then_with(|| (ka.coeff.1 != 0.0).cmp(&(kb.coeff.1 != 0.0)))
            .then_with(|| ka.coeff.1.total_cmp(&kb.coeff.1))
            .then_with(|| ka.coeff.0.total_cmp(&kb.coeff.0))
            .then_with(|| cmp_exprs(&terms[a], &terms[b]))
    });
    indices.into_iter().map(|i| terms[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn names(exprs: &[SymExpr]) -> Vec<String> {
        exprs.iter().map(crate::symbolic::print::text::to_string).collect()
    }

    #[test]
    fn factors_numbers_atoms_functions() {
        let sin = SymExpr::call("sin", vec![x()]);
        let cos = SymExpr::call("cos", vec![x()]);
        let factors = vec![cos.clone(), x(), SymExpr::pi(), sin.clone()];
        assert_eq!(names(&ordered_factors(&factors)), vec!["pi", "x", "sin(x)", "cos(x)"]);
    }

    #[test]
    fn polynomial_terms() {
        let terms = vec![SymExpr::one(), x(), SymExpr::pow(x(), SymExpr::integer(2))];
        assert_eq!(names(&ordered_terms(&terms)), vec!["x**2", "x", "1"]);

        let terms = vec![SymExpr::pi(), SymExpr::one()];
        assert_eq!(names(&ordered_terms(&terms)), vec!["1", "pi"]);

        let recip = SymExpr::pow(x(), SymExpr::integer(-1));
        assert_eq!(names(&ordered_terms(&[recip, x()])), vec!["x", "1/x"]);
    }

    #[test]
    fn trig_terms() {
        let terms = vec![SymExpr::call("cos", vec![x()]), SymExpr::call("sin", vec![x()])];
        assert_eq!(names(&ordered_terms(&terms)), vec!["sin(x)", "cos(x)"]);
    }
}
