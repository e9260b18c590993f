//! Text and LaTeX printers for [`SymExpr`].
//!
//! Both printers share the same precedence table: an operand is wrapped in parentheses when its
//! precedence is not higher than the precedence of the operator it appears in.

pub mod latex;
pub mod text;

use super::expr::{Constant, Primary, SymExpr};

pub use latex::latex;
pub use text::to_string;

pub const PREC_XOR: u32 = 10;
pub const PREC_OR: u32 = 20;
pub const PREC_AND: u32 = 30;
pub const PREC_RELATIONAL: u32 = 35;
pub const PREC_BIT_OR: u32 = 36;
pub const PREC_BIT_XOR: u32 = 37;
pub const PREC_BIT_AND: u32 = 38;
pub const PREC_ADD: u32 = 40;
pub const PREC_MUL: u32 = 50;
pub const PREC_POW: u32 = 60;
pub const PREC_FUNC: u32 = 70;
pub const PREC_NOT: u32 = 100;
pub const PREC_ATOM: u32 = 1000;

/// Returns the precedence of the expression when printed as text.
pub fn precedence(expr: &SymExpr) -> u32 {
    match expr {
        SymExpr::Primary(primary) => match primary {
            Primary::Integer(_) | Primary::Float(_) if expr.is_negative_number() => PREC_ADD,
            Primary::Rational(_) if expr.is_negative_number() => PREC_ADD,
            Primary::Rational(_) => PREC_MUL,
            Primary::Constant(Constant::NegativeInfinity) => PREC_ADD,
            Primary::Call(..) => PREC_FUNC,
            _ => PREC_ATOM,
        },
        SymExpr::Add(_) => PREC_ADD,
        SymExpr::Mul(_) => {
            if expr.could_extract_minus_sign() {
                PREC_ADD
            } else {
                PREC_MUL
            }
        },
        SymExpr::Exp(..) => PREC_POW,
        SymExpr::Relational(..) => PREC_RELATIONAL,
        SymExpr::And(_) => PREC_AND,
        SymExpr::Or(_) => PREC_OR,
        SymExpr::Xor(_) => PREC_XOR,
        SymExpr::Not(_) => PREC_NOT,
        SymExpr::Derivative(..) | SymExpr::Integral(..) | SymExpr::Sum(..) | SymExpr::Product(..) => PREC_ATOM,
    }
}

/// The precedence used by the LaTeX printer, where calculus operators bind like products.
pub fn precedence_traditional(expr: &SymExpr) -> u32 {
    match expr {
        SymExpr::Derivative(..) | SymExpr::Integral(..) | SymExpr::Sum(..) | SymExpr::Product(..) => PREC_MUL,
        other => precedence(other),
    }
}

/// Splits a product into the factors printed above and below a fraction bar. Factors with a
/// negative numeric exponent go in the denominator with the exponent negated; a rational
/// coefficient is split into its numerator and denominator.
pub fn fraction(expr: &SymExpr) -> (Vec<SymExpr>, Vec<SymExpr>) {
    let mut numer = Vec::new();
    let mut denom = Vec::new();
    for factor in expr.factors() {
        match &factor {
            SymExpr::Exp(base, exp) if exp.is_negative_number() => {
                let positive = -(**exp).clone();
                if positive.is_one() {
                    denom.push((**base).clone());
                } else {
                    denom.push(SymExpr::Exp(base.clone(), Box::new(positive)));
                }
            },
            SymExpr::Primary(Primary::Rational(r)) => {
                let (p, q) = r.clone().into_numer_denom();
                if p != 1 {
                    numer.push(SymExpr::Primary(Primary::Integer(p)));
                }
                denom.push(SymExpr::Primary(Primary::Integer(q)));
            },
            _ => numer.push(factor),
        }
    }
    (numer, denom)
}

/// Removes trailing zeros from the mantissa of a formatted float, keeping one digit after the
/// point.
pub(crate) fn strip_zeros(text: &str) -> String {
    let (mantissa, exponent) = match text.find('e') {
        Some(i) => (&text[..i], &text[i..]),
        None => (text, ""),
    };
    if !mantissa.contains('.') {
        return text.to_string();
    }
    let trimmed = mantissa.trim_end_matches('0');
    let trimmed = if trimmed.ends_with('.') { format!("{}0", trimmed) } else { trimmed.to_string() };
    format!("{}{}", trimmed, exponent)
}
