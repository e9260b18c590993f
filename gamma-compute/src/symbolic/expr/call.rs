//! Function application, with the special values every elementary function reduces to
//! automatically: `sin(pi/6) = 1/2`, `exp(log(x)) = x`, `factorial(5) = 120`, and so on.
//!
//! Functions that are not known here are "undefined functions" such as `f(x)`, which never
//! reduce.

use crate::primitive::int;
use rug::{Float, Integer, Rational};
use std::cmp::Ordering;
use super::{number::Number, Constant, Primary, SymExpr};

/// The functions that have a mathematical definition. Calls to any other name are applied
/// undefined functions.
pub const KNOWN_FUNCTIONS: &[&str] = &[
    "exp", "log", "sin", "cos", "tan", "cot", "sec", "csc", "asin", "acos", "atan", "acot",
    "sinh", "cosh", "tanh", "coth", "asinh", "acosh", "atanh", "Abs", "sign", "floor", "ceiling",
    "factorial", "factorial2", "binomial", "gamma", "re", "im", "arg", "conjugate", "Max", "Min",
    "erf", "Heaviside", "DiracDelta",
];

/// Returns true if the function has a mathematical definition.
pub fn is_known_function(name: &str) -> bool {
    KNOWN_FUNCTIONS.contains(&name)
}

/// Returns true for the trigonometric and hyperbolic functions and their inverses.
pub fn is_trig_function(name: &str) -> bool {
    matches!(
        name,
        "sin" | "cos" | "tan" | "cot" | "sec" | "csc" | "asin" | "acos" | "atan" | "acot"
            | "sinh" | "cosh" | "tanh" | "coth" | "asinh" | "acosh" | "atanh"
    )
}

/// Functions with `f(-x) = -f(x)`.
fn is_odd(name: &str) -> bool {
    matches!(
        name,
        "sin" | "tan" | "cot" | "csc" | "asin" | "atan" | "acot" | "sinh" | "tanh" | "coth"
            | "asinh" | "atanh" | "sign" | "erf"
    )
}

/// Functions with `f(-x) = f(x)`.
fn is_even(name: &str) -> bool {
    matches!(name, "cos" | "sec" | "cosh" | "Abs")
}

/// Largest argument `factorial` and friends are computed exactly for.
const MAX_EXACT_FACTORIAL: u32 = 10_000;

impl SymExpr {
    /// Applies the named function to the arguments, reducing the call to a simpler form when
    /// possible.
    pub fn call(name: impl Into<String>, args: Vec<SymExpr>) -> SymExpr {
        let name = name.into();
        match evaluate(&name, &args) {
            Some(reduced) => reduced,
            None => SymExpr::Primary(Primary::Call(name, args)),
        }
    }

    /// Applies a function of one argument.
    pub fn call1(name: &str, arg: SymExpr) -> SymExpr {
        SymExpr::call(name, vec![arg])
    }
}

fn evaluate(name: &str, args: &[SymExpr]) -> Option<SymExpr> {
    match (name, args) {
        ("sqrt", [arg]) => return Some(SymExpr::sqrt(arg.clone())),
        ("cbrt", [arg]) => return Some(SymExpr::pow_rational(arg.clone(), 1, 3)),
        ("root", [arg, degree]) => return Some(SymExpr::pow(arg.clone(), SymExpr::recip(degree.clone()))),
        ("log", [arg, base]) => return Some(log_base(arg, base)),
        ("binomial", [n, k]) => return binomial(n, k),
        ("Max", args) if !args.is_empty() => return extremum(args, Ordering::Greater),
        ("Min", args) if !args.is_empty() => return extremum(args, Ordering::Less),
        _ => {},
    }

    let [arg] = args else {
        return None;
    };
    if !is_known_function(name) {
        return None;
    }

    if let SymExpr::Primary(Primary::Float(f)) = arg {
        if let Some(value) = eval_float(name, f) {
            return Some(value);
        }
    }

    if arg.could_extract_minus_sign() {
        let negated = -arg.clone();
        if is_odd(name) {
            return Some(-SymExpr::call(name, vec![negated]));
        }
        if is_even(name) {
            return Some(SymExpr::call(name, vec![negated]));
        }
    }

    match name {
        "exp" => exp(arg),
        "log" => log(arg),
        "sin" => pi_multiple(arg).and_then(|r| sin_pi(&r)),
        "cos" => pi_multiple(arg).and_then(|r| cos_pi(&r)),
        "tan" => pi_multiple(arg).and_then(|r| {
            let (sin, cos) = (sin_pi(&r)?, cos_pi(&r)?);
            Some(if cos.is_zero() { SymExpr::zoo() } else { sin / cos })
        }),
        "cot" => pi_multiple(arg).and_then(|r| {
            let (sin, cos) = (sin_pi(&r)?, cos_pi(&r)?);
            Some(if sin.is_zero() { SymExpr::zoo() } else { cos / sin })
        }),
        "sec" => pi_multiple(arg).and_then(|r| cos_pi(&r)).map(SymExpr::recip),
        "csc" => pi_multiple(arg).and_then(|r| sin_pi(&r)).map(SymExpr::recip),
        "asin" => inverse_sin(arg),
        "acos" => inverse_sin(arg).map(|asin| SymExpr::pi() / SymExpr::integer(2) - asin),
        "atan" => inverse_tan(arg),
        "acot" => {
            if arg.is_zero() {
                Some(SymExpr::pi() / SymExpr::integer(2))
            } else {
                inverse_tan(&SymExpr::recip(arg.clone()))
            }
        },
        "sinh" | "tanh" | "asinh" | "atanh" => arg.is_zero().then(SymExpr::zero),
        "cosh" => arg.is_zero().then(SymExpr::one),
        "acosh" => arg.is_one().then(SymExpr::zero),
        "Abs" => abs(arg),
        "sign" => arg.as_number().map(|n| SymExpr::integer(match n.sign() {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        })),
        "floor" | "ceiling" => rounded(name, arg),
        "factorial" => factorial(arg),
        "factorial2" => factorial2(arg),
        "gamma" => gamma(arg),
        "re" => arg.as_number().map(SymExpr::from_number).or_else(|| {
            (arg.as_constant() == Some(Constant::I)).then(SymExpr::zero)
        }),
        "im" => arg.as_number().map(|_| SymExpr::zero()).or_else(|| {
            (arg.as_constant() == Some(Constant::I)).then(SymExpr::one)
        }),
        "conjugate" => arg.as_number().map(SymExpr::from_number),
        "erf" => arg.is_zero().then(SymExpr::zero),
        _ => None,
    }
}

/// Evaluates a function at a float argument, at the argument's precision.
fn eval_float(name: &str, f: &Float) -> Option<SymExpr> {
    let prec = f.prec();
    let value = match name {
        "exp" => f.clone().exp(),
        "log" if f.is_sign_positive() && !f.is_zero() => f.clone().ln(),
        "sin" => f.clone().sin(),
        "cos" => f.clone().cos(),
        "tan" => f.clone().tan(),
        "cot" => f.clone().cot(),
        "sec" => f.clone().sec(),
        "csc" => f.clone().csc(),
        "asin" if f.clone().abs() <= 1 => f.clone().asin(),
        "acos" if f.clone().abs() <= 1 => f.clone().acos(),
        "atan" => f.clone().atan(),
        "sinh" => f.clone().sinh(),
        "cosh" => f.clone().cosh(),
        "tanh" => f.clone().tanh(),
        "asinh" => f.clone().asinh(),
        "acosh" if *f >= 1 => f.clone().acosh(),
        "atanh" if f.clone().abs() < 1 => f.clone().atanh(),
        "Abs" => f.clone().abs(),
        "gamma" => f.clone().gamma(),
        "erf" => f.clone().erf(),
        "floor" => return f.clone().floor().to_integer().map(|n| SymExpr::Primary(Primary::Integer(n))),
        "ceiling" => return f.clone().ceil().to_integer().map(|n| SymExpr::Primary(Primary::Integer(n))),
        _ => return None,
    };
    value.is_finite().then(|| SymExpr::float(Float::with_val(prec, value)))
}

fn exp(arg: &SymExpr) -> Option<SymExpr> {
    if arg.is_zero() {
        return Some(SymExpr::one());
    }
    if arg.is_one() {
        return Some(SymExpr::e());
    }
    if let Some(inner) = arg.call_arg("log") {
        return Some(inner.clone());
    }
    match arg.as_constant() {
        Some(Constant::Infinity) => return Some(SymExpr::constant(Constant::Infinity)),
        Some(Constant::NegativeInfinity) => return Some(SymExpr::zero()),
        _ => {},
    }

    // exp(k*I*pi) for integer and half-integer k
    let (coeff, rest) = arg.as_coeff_mul();
    if rest == SymExpr::i() * SymExpr::pi() {
        let twice = coeff.mul(&Number::from(2));
        if let Some(n) = twice.as_integer() {
            return Some(match n.mod_u(4) {
                0 => SymExpr::one(),
                1 => SymExpr::i(),
                2 => SymExpr::integer(-1),
                _ => -SymExpr::i(),
            });
        }
    }

    // exp(n*log(x)) = x**n
    if let Some(inner) = rest.call_arg("log") {
        if coeff.to_rational().is_some() {
            return Some(SymExpr::pow(inner.clone(), SymExpr::from_number(coeff)));
        }
    }
    None
}

fn log(arg: &SymExpr) -> Option<SymExpr> {
    if arg.is_one() {
        return Some(SymExpr::zero());
    }
    if arg.is_zero() {
        return Some(SymExpr::zoo());
    }
    match arg.as_constant() {
        Some(Constant::E) => return Some(SymExpr::one()),
        Some(Constant::Infinity) => return Some(SymExpr::constant(Constant::Infinity)),
        Some(Constant::I) => return Some(SymExpr::i() * SymExpr::pi() / SymExpr::integer(2)),
        _ => {},
    }
    if arg.as_integer().map_or(false, |n| *n == -1) {
        return Some(SymExpr::i() * SymExpr::pi());
    }
    if let Some(inner) = arg.call_arg("exp") {
        if inner.as_number().is_some() {
            return Some(inner.clone());
        }
    }
    if let Some(r) = arg.as_rational().filter(|r| *r.numer() == 1 && r.cmp0() == Ordering::Greater) {
        // log(1/n) = -log(n)
        let denom = SymExpr::Primary(Primary::Integer(r.into_numer_denom().1));
        return Some(-SymExpr::call("log", vec![denom]));
    }
    None
}

/// `log(x, b)`: exact when `x` is an integer power of the integer `b`, `log(x)/log(b)` otherwise.
fn log_base(arg: &SymExpr, base: &SymExpr) -> SymExpr {
    if let (Some(x), Some(b)) = (arg.as_integer(), base.as_integer()) {
        if *b > 1 && *x > 0 {
            let mut power = int(1);
            let mut exponent = 0i64;
            while power < *x {
                power *= b;
                exponent += 1;
            }
            if power == *x {
                return SymExpr::integer(exponent);
            }
        }
    }
    SymExpr::call("log", vec![arg.clone()]) / SymExpr::call("log", vec![base.clone()])
}

/// Returns `r` if the expression is `r*pi` for a rational `r`.
fn pi_multiple(arg: &SymExpr) -> Option<Rational> {
    if arg.is_zero() {
        return Some(Rational::new());
    }
    let (coeff, rest) = arg.as_coeff_mul();
    if rest != SymExpr::pi() {
        return None;
    }
    coeff.to_rational()
}

/// `cos(r*pi)` for the rational multiples with a known closed form.
fn cos_pi(r: &Rational) -> Option<SymExpr> {
    // reduce into [0, 2)
    let two = Rational::from(2);
    let mut r = r.clone() - Rational::from(two.clone() * (r.clone() / &two).floor());

    if r > 1 {
        r = two - r;
    }
    let mut sign = 1;
    if r > Rational::from((1, 2)) {
        r = Rational::from(1) - r;
        sign = -1;
    }

    let value = if r == 0 {
        SymExpr::one()
    } else if r == Rational::from((1, 6)) {
        SymExpr::sqrt(SymExpr::integer(3)) / SymExpr::integer(2)
    } else if r == Rational::from((1, 4)) {
        SymExpr::sqrt(SymExpr::integer(2)) / SymExpr::integer(2)
    } else if r == Rational::from((1, 3)) {
        SymExpr::half()
    } else if r == Rational::from((1, 2)) {
        SymExpr::zero()
    } else {
        return None;
    };
    Some(if sign < 0 { -value } else { value })
}

/// `sin(r*pi) = cos((1/2 - r)*pi)`.
fn sin_pi(r: &Rational) -> Option<SymExpr> {
    cos_pi(&(Rational::from((1, 2)) - r.clone()))
}

/// Known values of `asin`, as multiples of pi.
fn inverse_sin(arg: &SymExpr) -> Option<SymExpr> {
    let half = SymExpr::half();
    let sqrt2_2 = SymExpr::sqrt(SymExpr::integer(2)) / SymExpr::integer(2);
    let sqrt3_2 = SymExpr::sqrt(SymExpr::integer(3)) / SymExpr::integer(2);
    let multiple = if arg.is_zero() {
        Rational::new()
    } else if arg.is_one() {
        Rational::from((1, 2))
    } else if *arg == half {
        Rational::from((1, 6))
    } else if *arg == sqrt2_2 {
        Rational::from((1, 4))
    } else if *arg == sqrt3_2 {
        Rational::from((1, 3))
    } else {
        return None;
    };
    Some(SymExpr::from_number(Number::from(multiple)) * SymExpr::pi())
}

/// Known values of `atan`, as multiples of pi.
fn inverse_tan(arg: &SymExpr) -> Option<SymExpr> {
    let sqrt3 = SymExpr::sqrt(SymExpr::integer(3));
    let multiple = if arg.is_zero() {
        Rational::new()
    } else if arg.is_one() {
        Rational::from((1, 4))
    } else if *arg == sqrt3 {
        Rational::from((1, 3))
    } else if *arg == sqrt3.clone() / SymExpr::integer(3) {
        Rational::from((1, 6))
    } else if arg.as_constant() == Some(Constant::Infinity) {
        Rational::from((1, 2))
    } else {
        return None;
    };
    Some(SymExpr::from_number(Number::from(multiple)) * SymExpr::pi())
}

fn abs(arg: &SymExpr) -> Option<SymExpr> {
    if let Some(n) = arg.as_number() {
        return Some(SymExpr::from_number(n.abs()));
    }
    match arg.as_constant() {
        Some(Constant::Pi | Constant::E) => return Some(arg.clone()),
        Some(Constant::I) => return Some(SymExpr::one()),
        Some(Constant::Infinity | Constant::NegativeInfinity | Constant::ComplexInfinity) => {
            return Some(SymExpr::constant(Constant::Infinity));
        },
        _ => {},
    }
    if let Some(inner) = arg.call_arg("Abs") {
        return Some(SymExpr::call("Abs", vec![inner.clone()]));
    }
    // pull a positive coefficient out: Abs(2*x) = 2*Abs(x)
    let (coeff, rest) = arg.as_coeff_mul();
    if !coeff.is_one() && coeff.is_positive() {
        return Some(SymExpr::from_number(coeff) * SymExpr::call("Abs", vec![rest]));
    }
    None
}

fn rounded(name: &str, arg: &SymExpr) -> Option<SymExpr> {
    let n = arg.as_number()?;
    let r = n.to_rational()?;
    let value = if name == "floor" { r.floor() } else { r.ceil() };
    Some(SymExpr::from_number(Number::from(value)))
}

fn factorial(arg: &SymExpr) -> Option<SymExpr> {
    let n = arg.as_integer()?;
    if n.cmp0() == Ordering::Less {
        return Some(SymExpr::zoo());
    }
    let small = n.to_u32().filter(|&n| n <= MAX_EXACT_FACTORIAL)?;
    Some(SymExpr::Primary(Primary::Integer(Integer::from(Integer::factorial(small)))))
}

fn factorial2(arg: &SymExpr) -> Option<SymExpr> {
    let n = arg.as_integer()?;
    if *n == -1 {
        return Some(SymExpr::one());
    }
    let small = n.to_u32().filter(|&n| n <= MAX_EXACT_FACTORIAL)?;
    Some(SymExpr::Primary(Primary::Integer(Integer::from(Integer::factorial_2(small)))))
}

fn binomial(n: &SymExpr, k: &SymExpr) -> Option<SymExpr> {
    if k.is_zero() {
        return Some(SymExpr::one());
    }
    if k.is_one() {
        return Some(n.clone());
    }
    let (n, k) = (n.as_integer()?, k.as_integer()?);
    if k.cmp0() == Ordering::Less {
        return Some(SymExpr::zero());
    }
    let k = k.to_u32().filter(|&k| k <= MAX_EXACT_FACTORIAL)?;
    Some(SymExpr::Primary(Primary::Integer(n.clone().binomial(k))))
}

fn gamma(arg: &SymExpr) -> Option<SymExpr> {
    if let Some(n) = arg.as_integer() {
        if n.cmp0() != Ordering::Greater {
            return Some(SymExpr::zoo());
        }
        return factorial(&SymExpr::Primary(Primary::Integer(n.clone() - 1)));
    }
    if *arg == SymExpr::half() {
        return Some(SymExpr::sqrt(SymExpr::pi()));
    }
    None
}

fn extremum(args: &[SymExpr], wanted: Ordering) -> Option<SymExpr> {
    let numbers = args.iter().map(SymExpr::as_number).collect::<Option<Vec<_>>>()?;
    let best = numbers
        .into_iter()
        .reduce(|best, n| if n.cmp_value(&best) == wanted { n } else { best })?;
    Some(SymExpr::from_number(best))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::symbolic::print::text::to_string;

    fn call(name: &str, arg: SymExpr) -> String {
        to_string(&SymExpr::call(name, vec![arg]))
    }

    fn pi_times(numer: i64, denom: i64) -> SymExpr {
        SymExpr::rational(numer, denom) * SymExpr::pi()
    }

    #[test]
    fn trig_values() {
        assert_eq!(call("sin", pi_times(1, 6)), "1/2");
        assert_eq!(call("cos", pi_times(1, 4)), "sqrt(2)/2");
        assert_eq!(call("cos", SymExpr::pi()), "-1");
        assert_eq!(call("sin", pi_times(7, 6)), "-1/2");
        assert_eq!(call("tan", pi_times(1, 2)), "zoo");
        assert_eq!(call("tan", pi_times(1, 3)), "sqrt(3)");
        assert_eq!(call("sin", SymExpr::pi() / SymExpr::integer(5)), "sin(pi/5)");
    }

    #[test]
    fn symmetry() {
        let x = SymExpr::symbol("x");
        assert_eq!(call("sin", -x.clone()), "-sin(x)");
        assert_eq!(call("cos", -x.clone()), "cos(x)");
        assert_eq!(call("Abs", -x), "Abs(x)");
    }

    #[test]
    fn exp_and_log() {
        let x = SymExpr::symbol("x");
        assert_eq!(call("exp", SymExpr::call("log", vec![x.clone()])), "x");
        assert_eq!(call("log", SymExpr::e()), "1");
        assert_eq!(call("exp", SymExpr::i() * SymExpr::pi()), "-1");
        assert_eq!(to_string(&SymExpr::call("log", vec![SymExpr::integer(8), SymExpr::integer(2)])), "3");
        assert_eq!(call("log", SymExpr::rational(1, 3)), "-log(3)");
    }

    #[test]
    fn integer_functions() {
        assert_eq!(call("factorial", SymExpr::integer(5)), "120");
        assert_eq!(call("factorial2", SymExpr::integer(7)), "105");
        assert_eq!(call("gamma", SymExpr::integer(5)), "24");
        assert_eq!(call("floor", SymExpr::rational(7, 2)), "3");
        assert_eq!(
            to_string(&SymExpr::call("binomial", vec![SymExpr::integer(5), SymExpr::integer(2)])),
            "10",
        );
    }

    #[test]
    fn undefined_functions_stay() {
        assert_eq!(call("f", SymExpr::integer(0)), "f(0)");
    }
}
