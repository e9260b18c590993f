//! Numeric approximation of symbolic expressions, for `N(expr, digits)` and `expr.evalf()`.
//!
//! Values are computed with complex arithmetic at the working precision, then rounded to the
//! requested number of significant digits. Sub-expressions that have no numeric value (free
//! symbols, undefined functions) are kept, so `N(pi*x)` is `3.14159265358979*x`.

use crate::consts::{e, pi};
use crate::primitive::{complex, digits_to_prec, PRECISION};
use rug::{Complex, Float};
use super::expr::{order::is_number_like, Constant, Primary, SymExpr};

/// Computes the numeric value of an expression with no free symbols at the working precision.
/// Returns [`None`] if the expression has no finite numeric value.
pub fn complex_value(expr: &SymExpr) -> Option<Complex> {
    let value = match expr {
        SymExpr::Primary(primary) => match primary {
            Primary::Integer(n) => complex(n),
            Primary::Rational(r) => complex(r),
            Primary::Float(f) => complex(f),
            Primary::Constant(Constant::E) => complex(e(PRECISION)),
            Primary::Constant(Constant::Pi) => complex(pi(PRECISION)),
            Primary::Constant(Constant::I) => complex((0, 1)),
            Primary::Call(name, args) => call_value(name, args)?,
            _ => return None,
        },
        SymExpr::Add(terms) => {
            let mut sum = complex(0);
            for term in terms {
                sum += complex_value(term)?;
            }
            sum
        },
        SymExpr::Mul(factors) => {
            let mut product = complex(1);
            for factor in factors {
                product *= complex_value(factor)?;
            }
            product
        },
        SymExpr::Exp(base, exp) => {
            let base = complex_value(base)?;
            let exp = complex_value(exp)?;
            if base.real().is_zero() && base.imag().is_zero() {
                if exp.real().is_sign_positive() && !exp.real().is_zero() {
                    return Some(complex(0));
                }
                return None;
            }
            complex(rug::ops::Pow::pow(base, exp))
        },
        _ => return None,
    };

    let finite = value.real().is_finite() && value.imag().is_finite();
    finite.then(|| clean(value))
}

/// Rounds imaginary parts that are pure rounding noise down to zero.
fn clean(value: Complex) -> Complex {
    let (re, im) = value.into_real_imag();
    let scale = Float::with_val(PRECISION, re.clone().abs().max(&Float::with_val(PRECISION, 1)));
    let noise = Float::with_val(PRECISION, Float::i_exp(1, -(PRECISION as i32) + 16)) * scale;
    let im = if im.clone().abs() < noise { Float::new(PRECISION) } else { im };
    Complex::with_val(PRECISION, (re, im))
}

/// The value of a known function at a numeric argument.
fn call_value(name: &str, args: &[SymExpr]) -> Option<Complex> {
    if let [arg] = args {
        let z = complex_value(arg)?;
        let is_real = z.imag().is_zero();
        let real = z.real().clone();
        return Some(match name {
            "exp" => z.exp(),
            "log" => {
                if z.real().is_zero() && z.imag().is_zero() {
                    return None;
                }
                z.ln()
            },
            "sin" => z.sin(),
            "cos" => z.cos(),
            "tan" => z.tan(),
            "cot" => complex(1) / z.tan(),
            "sec" => complex(1) / z.cos(),
            "csc" => complex(1) / z.sin(),
            "asin" => z.asin(),
            "acos" => z.acos(),
            "atan" => z.atan(),
            "acot" => (complex(1) / z).atan(),
            "sinh" => z.sinh(),
            "cosh" => z.cosh(),
            "tanh" => z.tanh(),
            "coth" => complex(1) / z.tanh(),
            "asinh" => z.asinh(),
            "acosh" => z.acosh(),
            "atanh" => z.atanh(),
            "Abs" => complex(z.abs().real().clone()),
            "arg" => complex(z.arg().real().clone()),
            "re" => complex(real),
            "im" => complex(z.imag().clone()),
            "conjugate" => z.conj(),
            "sign" if is_real => complex(real.signum()),
            "floor" if is_real => complex(real.floor()),
            "ceiling" if is_real => complex(real.ceil()),
            "gamma" if is_real => complex(real.gamma()),
            "factorial" if is_real => complex((real + 1u32).gamma()),
            "erf" if is_real => complex(real.erf()),
            _ => return None,
        });
    }

    match (name, args) {
        ("binomial", [n, k]) => {
            let n = complex_value(n)?;
            let k = complex_value(k)?;
            if !n.imag().is_zero() || !k.imag().is_zero() {
                return None;
            }
            let (n, k) = (n.real().clone(), k.real().clone());
            let top = Float::with_val(PRECISION, &n + 1u32).gamma();
            let left = Float::with_val(PRECISION, &k + 1u32).gamma();
            let right = Float::with_val(PRECISION, n - k + 1u32).gamma();
            Some(complex(top / (left * right)))
        },
        _ => None,
    }
}

/// Approximates every numeric part of the expression to the given number of significant digits.
pub fn evalf(expr: &SymExpr, digits: u32) -> SymExpr {
    let prec = digits_to_prec(digits);
    if is_number_like(expr) {
        if let Some(value) = complex_value(expr) {
            let (re, im) = value.into_real_imag();
            let re = SymExpr::float(Float::with_val(prec, re));
            if im.is_zero() {
                return re;
            }
            let im = SymExpr::float(Float::with_val(prec, im));
            return SymExpr::add([re, SymExpr::mul([im, SymExpr::i()])]);
        }
    }

    match expr {
        // integer exponents stay exact: N(x**2) is x**2
        SymExpr::Exp(base, exp) if exp.is_integer() => SymExpr::pow(evalf(base, digits), (**exp).clone()),
        SymExpr::Primary(Primary::Float(f)) => SymExpr::float(Float::with_val(prec, f)),
        other => other.map_children(&mut |child| evalf(child, digits)),
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use super::*;
    use crate::symbolic::print::text::to_string;

    #[test]
    fn constants() {
        let value = complex_value(&SymExpr::pi()).unwrap();
        assert_float_absolute_eq!(value.real().to_f64(), std::f64::consts::PI, 1e-15);

        let root = complex_value(&SymExpr::sqrt(SymExpr::integer(2))).unwrap();
        assert_float_absolute_eq!(root.real().to_f64(), std::f64::consts::SQRT_2, 1e-15);
        assert!(root.imag().is_zero());
    }

    #[test]
    fn functions() {
        let sin = SymExpr::call("sin", vec![SymExpr::integer(1)]);
        let value = complex_value(&sin).unwrap();
        assert_float_absolute_eq!(value.real().to_f64(), 1f64.sin(), 1e-15);
        assert!(complex_value(&SymExpr::call("f", vec![SymExpr::integer(1)])).is_none());
    }

    #[test]
    fn approximation() {
        assert_eq!(to_string(&evalf(&SymExpr::pi(), 15)), "3.14159265358979");
        assert_eq!(to_string(&evalf(&SymExpr::sqrt(SymExpr::integer(2)), 5)), "1.4142");
        let x = SymExpr::symbol("x");
        assert_eq!(to_string(&evalf(&(SymExpr::pi() * x.clone()), 15)), "3.14159265358979*x");
        assert_eq!(to_string(&evalf(&SymExpr::pow(x, SymExpr::integer(2)), 15)), "x**2");
    }
}
