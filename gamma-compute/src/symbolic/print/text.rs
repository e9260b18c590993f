//! The plain text printer, producing the same text a user would type to build the expression:
//! `x**2 + 2*x + 1`, `sqrt(2)/2`, `Eq(x, 0)`.

use crate::primitive::prec_to_digits;
use crate::symbolic::expr::{number::format_float, order::ordered_terms, Limit, Primary, RelOp, SymExpr};
use std::fmt;
use super::{
    fraction,
    precedence,
    strip_zeros,
    PREC_ADD,
    PREC_BIT_AND,
    PREC_BIT_OR,
    PREC_BIT_XOR,
    PREC_MUL,
    PREC_NOT,
    PREC_POW,
    PREC_RELATIONAL,
};

/// Prints the expression as text.
pub fn to_string(expr: &SymExpr) -> String {
    Printer { depth: 0 }.print(expr)
}

struct Printer {
    /// How deeply nested the expression being printed is. Floats at the top level keep their
    /// trailing zeros; nested floats drop them.
    depth: usize,
}

impl Printer {
    fn print(&mut self, expr: &SymExpr) -> String {
        self.depth += 1;
        let out = self.print_inner(expr);
        self.depth -= 1;
        out
    }

    fn parenthesize(&mut self, expr: &SymExpr, level: u32) -> String {
        let printed = self.print(expr);
        if precedence(expr) <= level {
            format!("({})", printed)
        } else {
            printed
        }
    }

    fn join(&mut self, items: &[SymExpr], sep: &str, level: u32) -> String {
        items.iter().map(|item| self.parenthesize(item, level)).collect::<Vec<_>>().join(sep)
    }

    fn print_inner(&mut self, expr: &SymExpr) -> String {
        match expr {
            SymExpr::Primary(primary) => self.print_primary(primary),
            SymExpr::Add(terms) => self.print_add(terms),
            SymExpr::Mul(_) => self.print_mul(expr),
            SymExpr::Exp(base, exp) => self.print_pow(base, exp),
            SymExpr::Derivative(inner, vars) => {
                let mut out = format!("Derivative({}", self.print(inner));
                let mut i = 0;
                while i < vars.len() {
                    let count = vars[i..].iter().take_while(|v| **v == vars[i]).count();
                    if count == 1 {
                        out.push_str(&format!(", {}", vars[i]));
                    } else {
                        out.push_str(&format!(", ({}, {})", vars[i], count));
                    }
                    i += count;
                }
                out.push(')');
                out
            },
            SymExpr::Integral(inner, limits) => {
                let limits = limits.iter().map(|limit| self.print_limit(limit)).collect::<Vec<_>>();
                format!("Integral({}, {})", self.print(inner), limits.join(", "))
            },
            SymExpr::Sum(inner, limit) => format!("Sum({}, {})", self.print(inner), self.print_limit(limit)),
            SymExpr::Product(inner, limit) => {
                format!("Product({}, {})", self.print(inner), self.print_limit(limit))
            },
            SymExpr::Relational(op, lhs, rhs) => match op {
                RelOp::Eq => format!("Eq({}, {})", self.print(lhs), self.print(rhs)),
                RelOp::Ne => format!("Ne({}, {})", self.print(lhs), self.print(rhs)),
                _ => format!(
                    "{} {} {}",
                    self.parenthesize(lhs, PREC_RELATIONAL),
                    op.symbol(),
                    self.parenthesize(rhs, PREC_RELATIONAL),
                ),
            },
            SymExpr::And(items) => self.join(items, " & ", PREC_BIT_AND),
            SymExpr::Or(items) => self.join(items, " | ", PREC_BIT_OR),
            SymExpr::Xor(items) => self.join(items, " ^ ", PREC_BIT_XOR),
            SymExpr::Not(inner) => format!("~{}", self.parenthesize(inner, PREC_NOT)),
        }
    }

    fn print_limit(&mut self, limit: &Limit) -> String {
        match &limit.bounds {
            Some((lower, upper)) => format!("({}, {}, {})", limit.var, self.print(lower), self.print(upper)),
            None => limit.var.clone(),
        }
    }

    fn print_primary(&mut self, primary: &Primary) -> String {
        match primary {
            Primary::Integer(n) => n.to_string(),
            Primary::Rational(r) => format!("{}/{}", r.numer(), r.denom()),
            Primary::Float(f) => {
                let text = format_float(f, prec_to_digits(f.prec()));
                if self.depth > 1 {
                    strip_zeros(&text)
                } else {
                    text
                }
            },
            Primary::Symbol(name) => name.clone(),
            Primary::Constant(c) => c.name().to_string(),
            Primary::Boolean(true) => "True".to_string(),
            Primary::Boolean(false) => "False".to_string(),
            Primary::Call(name, args) => {
                let args = args.iter().map(|arg| self.print(arg)).collect::<Vec<_>>();
                format!("{}({})", name, args.join(", "))
            },
        }
    }

    fn print_add(&mut self, terms: &[SymExpr]) -> String {
        let mut out = String::new();
        for (i, term) in ordered_terms(terms).iter().enumerate() {
            let printed = self.print(term);
            let (sign, body) = match printed.strip_prefix('-') {
                Some(rest) => ("-", rest.to_string()),
                None => ("+", printed.clone()),
            };
            let body = if precedence(term) < PREC_ADD {
                format!("({})", body)
            } else {
                body
            };
            if i == 0 {
                if sign == "-" {
                    out.push('-');
                }
            } else {
                out.push_str(&format!(" {} ", sign));
            }
            out.push_str(&body);
        }
        out
    }

    fn print_mul(&mut self, expr: &SymExpr) -> String {
        let prec = precedence(expr);
        let (coeff, rest) = expr.as_coeff_mul();
        let (sign, expr) = if coeff.is_negative() {
            ("-", SymExpr::scale(&coeff.neg(), rest))
        } else {
            ("", expr.clone())
        };

        let (numer, denom) = fraction(&expr);
        let numer = if numer.is_empty() { vec![SymExpr::one()] } else { numer };

        let numer_str = if numer.len() == 1 && sign == "-" {
            // unary minus binds between products and powers
            let printed = self.print(&numer[0]);
            if precedence(&numer[0]) < (PREC_MUL + PREC_POW) / 2 {
                vec![format!("({})", printed)]
            } else {
                vec![printed]
            }
        } else {
            numer.iter().map(|factor| self.parenthesize(factor, prec)).collect()
        };
        let denom_str = denom
            .iter()
            .map(|factor| {
                let printed = self.parenthesize(factor, prec);
                // (x*y)**-1 prints as 1/(x*y)
                if matches!(factor, SymExpr::Mul(_)) && !printed.starts_with('(') {
                    format!("({})", printed)
                } else {
                    printed
                }
            })
            .collect::<Vec<_>>();

        match denom_str.len() {
            0 => format!("{}{}", sign, numer_str.join("*")),
            1 => format!("{}{}/{}", sign, numer_str.join("*"), denom_str[0]),
            _ => format!("{}{}/({})", sign, numer_str.join("*"), denom_str.join("*")),
        }
    }

    fn print_pow(&mut self, base: &SymExpr, exp: &SymExpr) -> String {
        if *exp == SymExpr::half() {
            return format!("sqrt({})", self.print(base));
        }
        if *exp == SymExpr::rational(-1, 2) {
            return format!("1/sqrt({})", self.print(base));
        }
        if exp.as_i64() == Some(-1) {
            return format!("1/{}", self.parenthesize(base, PREC_POW));
        }
        format!("{}**{}", self.parenthesize(base, PREC_POW), self.parenthesize(exp, PREC_POW))
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::primitive::float_with_digits;

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
    fn products_and_fractions() {
        let cos = SymExpr::call("cos", vec![x()]);
        let sin = SymExpr::call("sin", vec![x()]);
        let derivative = n(-7) * sin * SymExpr::pow(cos, n(6));
        assert_eq!(to_string(&derivative), "-7*sin(x)*cos(x)**6");
        assert_eq!(to_string(&(x() / n(2))), "x/2");
        assert_eq!(to_string(&(n(1) / x())), "1/x");
        assert_eq!(to_string(&(x() / (y() * SymExpr::symbol("z")))), "x/(y*z)");
        assert_eq!(to_string(&(n(-1) / x())), "-1/x");
    }

    #[test]
    fn powers() {
        assert_eq!(to_string(&SymExpr::pow(x(), n(-2))), "x**(-2)");
        assert_eq!(to_string(&SymExpr::pow_rational(x(), 1, 3)), "x**(1/3)");
        assert_eq!(to_string(&SymExpr::pow_rational(x(), -1, 2)), "1/sqrt(x)");
        assert_eq!(to_string(&SymExpr::pow(x() + n(1), n(2))), "(x + 1)**2");
    }

    #[test]
    fn sums() {
        assert_eq!(to_string(&(x() - n(1))), "x - 1");
        assert_eq!(to_string(&(n(1) - x())), "1 - x");
        assert_eq!(to_string(&(SymExpr::pow(x(), n(2)) + n(2) * x() + n(1))), "x**2 + 2*x + 1");
    }

    #[test]
    fn floats() {
        assert_eq!(to_string(&SymExpr::float(float_with_digits(1.5, 15))), "1.50000000000000");
        assert_eq!(to_string(&(SymExpr::float(float_with_digits(2.5, 15)) * x())), "2.5*x");
    }

    #[test]
    fn calculus_and_logic() {
        let f = SymExpr::call("f", vec![x()]);
        let derivative = SymExpr::Derivative(Box::new(f.clone()), vec!["x".to_string(), "x".to_string()]);
        assert_eq!(to_string(&derivative), "Derivative(f(x), (x, 2))");

        let integral = SymExpr::Integral(Box::new(x()), vec![Limit::definite("x", n(0), n(1))]);
        assert_eq!(to_string(&integral), "Integral(x, (x, 0, 1))");

        assert_eq!(to_string(&SymExpr::relational(RelOp::Eq, x(), n(0))), "Eq(x, 0)");
        assert_eq!(to_string(&SymExpr::relational(RelOp::Lt, x(), n(1))), "x < 1");
        assert_eq!(to_string(&SymExpr::and(vec![x(), y()])), "x & y");
        assert_eq!(to_string(&SymExpr::not(x())), "~x");
    }
}
