//! Integration by rules, the way it is done by hand.
//!
//! [`integral_steps`] searches for a tree of integration rules (linearity, the power rule, a table
//! of standard integrals, u-substitution, integration by parts, partial fractions, and rewriting)
//! that integrates the expression. The tree is both evaluated to get the antiderivative and
//! printed to explain it.

use crate::symbolic::{
    derivative::derivative,
    expr::{number::Number, Primary, SymExpr},
    poly::{self, Poly},
    simplify::fraction::{apart, as_numer_denom},
};
use rug::Rational;

/// How deeply rules may nest before the search gives up.
const MAX_DEPTH: usize = 8;

/// An integration rule applied to [`IntRule::context`], with the rules for its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct IntRule {
    /// The integrand.
    pub context: SymExpr,

    /// The variable of integration.
    pub symbol: String,

    /// The rule used.
    pub kind: IntRuleKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntRuleKind {
    /// `∫ c dx = c*x`
    Constant {
        constant: SymExpr,
    },

    /// `∫ c*f dx = c * ∫ f dx`
    ConstantTimes {
        constant: SymExpr,
        other: SymExpr,
        substep: Box<IntRule>,
    },

    /// `∫ x^n dx = x^(n + 1)/(n + 1)`
    Power {
        base: SymExpr,
        exp: SymExpr,
    },

    /// `∫ 1/x dx = log(x)`
    Reciprocal {
        base: SymExpr,
    },

    /// `∫ b^x dx = b^x/log(b)`, including `exp(x)`.
    Exp {
        base: SymExpr,
        exp: SymExpr,
    },

    /// `∫ (f + g) dx = ∫ f dx + ∫ g dx`
    Add {
        substeps: Vec<IntRule>,
    },

    /// Substitutes `u_var = u_func`; `substep` integrates with respect to `u_var`.
    URule {
        u_var: String,
        u_func: SymExpr,
        substep: Box<IntRule>,
    },

    /// `∫ u dv = u*v - ∫ v du`
    Parts {
        u: SymExpr,
        dv: SymExpr,
        v_step: Box<IntRule>,
        second_step: Box<IntRule>,
    },

    /// A standard trigonometric integral: `sin`, `cos`, `sec**2`, `csc**2`, `sec*tan`, or
    /// `csc*cot`.
    Trig {
        func: String,
        arg: SymExpr,
    },

    /// `∫ 1/((x + shift)^2 + scale^2) dx = atan((x + shift)/scale)/scale`
    Arctan {
        shift: SymExpr,
        scale: SymExpr,
    },

    /// The integrand is rewritten into a form that is easier to integrate.
    Rewrite {
        rewritten: SymExpr,
        substep: Box<IntRule>,
    },

    /// No rule applies.
    DontKnow,
}

impl IntRule {
    /// Returns true if any part of the rule tree could not be integrated.
    pub fn contains_dont_know(&self) -> bool {
        match &self.kind {
            IntRuleKind::DontKnow => true,
            IntRuleKind::ConstantTimes { substep, .. }
                | IntRuleKind::URule { substep, .. }
                | IntRuleKind::Rewrite { substep, .. } => substep.contains_dont_know(),
            IntRuleKind::Add { substeps } => substeps.iter().any(IntRule::contains_dont_know),
            IntRuleKind::Parts { v_step, second_step, .. } => {
                v_step.contains_dont_know() || second_step.contains_dont_know()
            },
            _ => false,
        }
    }

    /// Evaluates the rule tree to the antiderivative, without a constant of integration. Returns
    /// [`None`] if part of the tree could not be integrated.
    pub fn eval(&self) -> Option<SymExpr> {
        let x = SymExpr::symbol(self.symbol.as_str());
        let result = match &self.kind {
            IntRuleKind::Constant { constant } => constant.clone() * x,
            IntRuleKind::ConstantTimes { constant, substep, .. } => constant.clone() * substep.eval()?,
            IntRuleKind::Power { base, exp } => {
                let raised = exp.clone() + SymExpr::one();
                SymExpr::pow(base.clone(), raised.clone()) / raised
            },
            IntRuleKind::Reciprocal { base } => SymExpr::call1("log", base.clone()),
            IntRuleKind::Exp { base, exp } => {
                if base.as_constant() == Some(crate::symbolic::expr::Constant::E) {
                    SymExpr::call1("exp", exp.clone())
                } else {
                    SymExpr::pow(base.clone(), exp.clone()) / SymExpr::call1("log", base.clone())
                }
            },
            IntRuleKind::Add { substeps } => {
                SymExpr::add(substeps.iter().map(IntRule::eval).collect::<Option<Vec<_>>>()?)
            },
            IntRuleKind::URule { u_var, u_func, substep } => {
                substep.eval()?.subs_symbol(u_var, u_func)
            },
            IntRuleKind::Parts { u, v_step, second_step, .. } => {
                u.clone() * v_step.eval()? - second_step.eval()?
            },
            IntRuleKind::Trig { func, arg } => {
                let call = |name: &str| SymExpr::call1(name, arg.clone());
                match func.as_str() {
                    "sin" => -call("cos"),
                    "cos" => call("sin"),
                    "sec**2" => call("tan"),
                    "csc**2" => -call("cot"),
                    "sec*tan" => call("sec"),
                    "csc*cot" => -call("csc"),
                    _ => return None,
                }
            },
            IntRuleKind::Arctan { shift, scale } => {
                SymExpr::call1("atan", (x + shift.clone()) / scale.clone()) / scale.clone()
            },
            IntRuleKind::Rewrite { substep, .. } => substep.eval()?,
            IntRuleKind::DontKnow => return None,
        };
        Some(result)
    }
}

fn rule(context: &SymExpr, symbol: &str, kind: IntRuleKind) -> IntRule {
    IntRule { context: context.clone(), symbol: symbol.to_string(), kind }
}

/// Builds a rewrite rule, integrating the rewritten form.
fn rewrite(context: &SymExpr, symbol: &str, rewritten: SymExpr, depth: usize) -> Option<IntRule> {
    if rewritten == *context {
        return None;
    }
    let substep = steps(&rewritten, symbol, depth + 1);
    Some(rule(context, symbol, IntRuleKind::Rewrite { rewritten, substep: Box::new(substep) }))
}

/// The entries of the table of standard integrals, whose variable must be the integration
/// variable itself.
fn table_rule(expr: &SymExpr, symbol: &str, _: usize) -> Option<IntRule> {
    let is_var = |expr: &SymExpr| expr.as_symbol() == Some(symbol);
    let kind = match expr {
        SymExpr::Primary(Primary::Symbol(_)) => IntRuleKind::Power { base: expr.clone(), exp: SymExpr::one() },
        SymExpr::Exp(base, exp) if is_var(base) && !exp.has_symbol(symbol) => {
            if exp.as_i64() == Some(-1) {
                IntRuleKind::Reciprocal { base: (**base).clone() }
            } else {
                IntRuleKind::Power { base: (**base).clone(), exp: (**exp).clone() }
            }
        },
        SymExpr::Exp(base, exp) if is_var(exp) && !base.has_symbol(symbol) => {
            IntRuleKind::Exp { base: (**base).clone(), exp: (**exp).clone() }
        },
        SymExpr::Exp(base, exp) if exp.as_i64() == Some(2) => match base.as_call() {
            Some((name @ ("sec" | "csc"), [arg])) if is_var(arg) => IntRuleKind::Trig {
                func: format!("{}**2", name),
                arg: arg.clone(),
            },
            _ => return None,
        },
        SymExpr::Primary(Primary::Call(name, args)) => match (name.as_str(), args.as_slice()) {
            ("exp", [arg]) if is_var(arg) => IntRuleKind::Exp { base: SymExpr::e(), exp: arg.clone() },
            (name @ ("sin" | "cos"), [arg]) if is_var(arg) => IntRuleKind::Trig {
                func: name.to_string(),
                arg: arg.clone(),
            },
            _ => return None,
        },
        SymExpr::Mul(factors) if factors.len() == 2 => {
            let names = factors.iter().map(|factor| factor.as_call()).collect::<Option<Vec<_>>>()?;
            let arg = names[0].1.first().filter(|arg| is_var(arg))?;
            if names.iter().any(|(_, args)| args.len() != 1 || args[0] != *arg) {
                return None;
            }
            let mut pair = [names[0].0, names[1].0];
            pair.sort();
            let func = match pair {
                ["sec", "tan"] => "sec*tan",
                ["cot", "csc"] => "csc*cot",
                _ => return None,
            };
            IntRuleKind::Trig { func: func.to_string(), arg: arg.clone() }
        },
        _ => return None,
    };
    Some(rule(expr, symbol, kind))
}

fn add_rule(expr: &SymExpr, symbol: &str, depth: usize) -> Option<IntRule> {
    let SymExpr::Add(terms) = expr else {
        return None;
    };
    let substeps = terms.iter().map(|term| steps(term, symbol, depth + 1)).collect();
    Some(rule(expr, symbol, IntRuleKind::Add { substeps }))
}

fn constant_times_rule(expr: &SymExpr, symbol: &str, depth: usize) -> Option<IntRule> {
    let SymExpr::Mul(_) = expr else {
        return None;
    };
    let (coeff, rest) = expr.as_coeff_factors();
    let (constants, varying): (Vec<_>, Vec<_>) = rest.into_iter().partition(|factor| !factor.has_symbol(symbol));
    if coeff.is_one() && constants.is_empty() {
        return None;
    }
    let constant = SymExpr::mul(std::iter::once(SymExpr::from_number(coeff)).chain(constants));
    let other = SymExpr::mul(varying);
    let substep = steps(&other, symbol, depth + 1);
    Some(rule(expr, symbol, IntRuleKind::ConstantTimes { constant, other, substep: Box::new(substep) }))
}

/// `tan`, `cot` and the powers of `sin`, `cos` and `tan`, rewritten into integrable forms.
fn trig_rewrite_rule(expr: &SymExpr, symbol: &str, depth: usize) -> Option<IntRule> {
    let n = |value: i64| SymExpr::integer(value);
    let (base, exp) = expr.as_base_exp();
    let (name, arg) = match base.as_call() {
        Some((name, [arg])) if arg.has_symbol(symbol) => (name, arg.clone()),
        _ => return None,
    };
    let power = exp.as_i64().filter(|power| *power >= 1)?;
    let call = |name: &str| SymExpr::call1(name, arg.clone());
    let double = SymExpr::call1("cos", n(2) * arg.clone());

    let rewritten = match (name, power) {
        ("tan", 1) => call("sin") / call("cos"),
        ("cot", 1) => call("cos") / call("sin"),
        ("tan", 2) => SymExpr::pow(call("sec"), n(2)) - n(1),
        ("cot", 2) => SymExpr::pow(call("csc"), n(2)) - n(1),
        ("sin" | "cos", 1) => return None,
        // an odd power keeps one factor for the substitution
        ("sin", p) if p % 2 == 1 => {
            let rest = SymExpr::pow(n(1) - SymExpr::pow(call("cos"), n(2)), n((p - 1) / 2));
            poly::expand(&(call("sin") * rest))
        },
        ("cos", p) if p % 2 == 1 => {
            let rest = SymExpr::pow(n(1) - SymExpr::pow(call("sin"), n(2)), n((p - 1) / 2));
            poly::expand(&(call("cos") * rest))
        },
        // an even power is reduced with the half angle formulas
        ("sin", p) => poly::expand(&SymExpr::pow((n(1) - double) / n(2), n(p / 2))),
        ("cos", p) => poly::expand(&SymExpr::pow((n(1) + double) / n(2), n(p / 2))),
        _ => return None,
    };
    rewrite(expr, symbol, rewritten, depth)
}

/// Lists the sub-expressions worth trying as `u` in a substitution, largest first.
fn substitution_candidates(expr: &SymExpr, symbol: &str) -> Vec<SymExpr> {
    let mut candidates: Vec<SymExpr> = Vec::new();
    for sub in expr.post_order_iter() {
        if sub == expr || !sub.has_symbol(symbol) || sub.as_symbol() == Some(symbol) || candidates.contains(sub) {
            continue;
        }
        if matches!(sub, SymExpr::Add(_) | SymExpr::Exp(..) | SymExpr::Primary(Primary::Call(..)) | SymExpr::Mul(_)) {
            candidates.push(sub.clone());
        }
    }
    candidates.reverse();
    candidates
}

fn u_substitution_rule(expr: &SymExpr, symbol: &str, depth: usize) -> Option<IntRule> {
    let u_var = expr.fresh_symbol("u");
    let u = SymExpr::symbol(u_var.as_str());
    for u_func in substitution_candidates(expr, symbol) {
        let du = match derivative(&u_func, symbol) {
            Ok(du) if !du.is_zero() => du,
            _ => continue,
        };
        let substituted = (expr.clone() / du).subs(&u_func, &u);
        if substituted.has_symbol(symbol) {
            continue;
        }
        let substep = steps(&substituted, &u_var, depth + 1);
        if substep.contains_dont_know() {
            continue;
        }
        return Some(rule(expr, symbol, IntRuleKind::URule { u_var, u_func, substep: Box::new(substep) }));
    }
    None
}

/// Rational functions: partial fractions, then `(p*x + q)/(x**2 + b*x + c)` with no real roots
/// split into a logarithm and an arctangent.
fn rational_rule(expr: &SymExpr, symbol: &str, depth: usize) -> Option<IntRule> {
    let (numer, denom) = as_numer_denom(expr);
    let numer_poly = Poly::from_expr(&numer, symbol)?;
    let denom_poly = Poly::from_expr(&denom, symbol)?;
    if denom_poly.degree() == 0 {
        return None;
    }

    let parts = apart(expr, symbol)?;
    if matches!(parts, SymExpr::Add(_)) && parts != *expr {
        return rewrite(expr, symbol, parts, depth);
    }

    if denom_poly.degree() != 2 || numer_poly.degree() > 1 || !denom_poly.rational_roots().is_empty() {
        return None;
    }

    let x = SymExpr::symbol(symbol);
    let number = |r: Rational| SymExpr::from_number(Number::from(r).normalize());
    let a = denom_poly.coeff(2);
    let b = Rational::from(&denom_poly.coeff(1) / &a);
    let c = Rational::from(&denom_poly.coeff(0) / &a);
    let p = Rational::from(&numer_poly.coeff(1) / &a);
    let q = Rational::from(&numer_poly.coeff(0) / &a);

    let monic = SymExpr::pow(x.clone(), SymExpr::integer(2)) + number(b.clone()) * x.clone() + number(c.clone());
    let half_b = Rational::from(&b / 2);
    let remainder = q - Rational::from(&p * &half_b);
    let scale_squared = c - Rational::from(&half_b * &half_b);

    let mut terms = Vec::new();
    let mut substeps = Vec::new();
    if p != 0 {
        // the numerator is a multiple of the derivative of the denominator
        let derivative_part = (SymExpr::integer(2) * x.clone() + number(b.clone())) / monic.clone();
        let term = number(Rational::from(&p / 2)) * derivative_part;
        substeps.push(steps(&term, symbol, depth + 1));
        terms.push(term);
    }
    if remainder != 0 {
        let other = SymExpr::recip(monic.clone());
        let arctan = rule(&other, symbol, IntRuleKind::Arctan {
            shift: number(half_b),
            scale: SymExpr::sqrt(number(scale_squared)),
        });
        let constant = number(remainder);
        let term = constant.clone() * other.clone();
        substeps.push(rule(&term, symbol, IntRuleKind::ConstantTimes {
            constant,
            other,
            substep: Box::new(arctan),
        }));
        terms.push(term);
    }

    let rewritten = SymExpr::add(terms.clone());
    let substep = if substeps.len() == 1 {
        substeps.remove(0)
    } else {
        rule(&rewritten, symbol, IntRuleKind::Add { substeps })
    };
    Some(rule(expr, symbol, IntRuleKind::Rewrite { rewritten, substep: Box::new(substep) }))
}

/// Ranks a factor for the choice of `u` in integration by parts: logarithms, inverse
/// trigonometric functions, algebraic factors, trigonometric functions, exponentials.
fn liate_rank(factor: &SymExpr, symbol: &str) -> Option<u8> {
    match factor.as_call() {
        Some(("log", _)) => return Some(0),
        Some(("asin" | "acos" | "atan" | "acot" | "asinh" | "acosh" | "atanh", _)) => return Some(1),
        Some(("sin" | "cos" | "tan" | "sec" | "csc" | "cot" | "sinh" | "cosh", _)) => return Some(3),
        Some(("exp", _)) => return Some(4),
        _ => {},
    }
    let (_, exp) = factor.as_base_exp();
    if Poly::from_expr(factor, symbol).is_some() && exp.as_i64().map_or(true, |n| n > 0) {
        return Some(2);
    }
    None
}

fn parts_rule(expr: &SymExpr, symbol: &str, depth: usize) -> Option<IntRule> {
    let factors = expr.factors();
    let ranked = factors
        .iter()
        .enumerate()
        .filter_map(|(i, factor)| liate_rank(factor, symbol).map(|rank| (rank, i)))
        .min()?;
    let (rank, index) = ranked;
    // a lone algebraic factor or exponential is integrated directly
    if factors.len() == 1 && rank > 1 {
        return None;
    }

    let u = factors[index].clone();
    let dv = SymExpr::mul(factors.iter().enumerate().filter(|(i, _)| *i != index).map(|(_, f)| f.clone()));
    let v_step = steps(&dv, symbol, depth + 1);
    let v = v_step.eval()?;
    let du = derivative(&u, symbol).ok()?;
    let second_step = steps(&(v * du), symbol, depth + 1);
    Some(rule(expr, symbol, IntRuleKind::Parts {
        u,
        dv,
        v_step: Box::new(v_step),
        second_step: Box::new(second_step),
    }))
}

fn expand_rule(expr: &SymExpr, symbol: &str, depth: usize) -> Option<IntRule> {
    rewrite(expr, symbol, poly::expand(expr), depth)
}

type Strategy = fn(&SymExpr, &str, usize) -> Option<IntRule>;

/// The strategies, in the order they are tried.
const STRATEGIES: &[Strategy] = &[
    table_rule,
    constant_times_rule,
    add_rule,
    trig_rewrite_rule,
    u_substitution_rule,
    rational_rule,
    parts_rule,
    expand_rule,
];

fn steps(expr: &SymExpr, symbol: &str, depth: usize) -> IntRule {
    if !expr.has_symbol(symbol) {
        return rule(expr, symbol, IntRuleKind::Constant { constant: expr.clone() });
    }
    if depth > MAX_DEPTH {
        return rule(expr, symbol, IntRuleKind::DontKnow);
    }

    STRATEGIES
        .iter()
        .filter_map(|strategy| strategy(expr, symbol, depth))
        .find(|found| !found.contains_dont_know())
        .unwrap_or_else(|| rule(expr, symbol, IntRuleKind::DontKnow))
}

/// Finds the rules that integrate `expr` with respect to `symbol`. The result contains
/// [`IntRuleKind::DontKnow`] if no way to integrate the expression was found.
pub fn integral_steps(expr: &SymExpr, symbol: &str) -> IntRule {
    steps(expr, symbol, 0)
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

    fn integral(expr: &SymExpr) -> String {
        integral_steps(expr, "x").eval().unwrap().to_string()
    }

    #[test]
    fn table() {
        assert_eq!(integral(&SymExpr::recip(x())), "log(x)");
        assert_eq!(integral(&SymExpr::call1("cos", x())), "sin(x)");
        assert_eq!(integral(&SymExpr::call1("exp", x())), "exp(x)");
        assert_eq!(integral(&SymExpr::pow(x(), n(2))), "x**3/3");
    }

    #[test]
    fn substitution() {
        let expr = n(2) * x() * SymExpr::call1("cos", SymExpr::pow(x(), n(2)));
        let rule = integral_steps(&expr, "x");
        assert!(!rule.contains_dont_know());
        assert_eq!(rule.eval().unwrap().to_string(), "sin(x**2)");
    }

    #[test]
    fn parts() {
        let expr = x() * SymExpr::call1("exp", x());
        let rule = integral_steps(&expr, "x");
        assert!(matches!(rule.kind, IntRuleKind::Parts { .. }));
        let antiderivative = rule.eval().unwrap();
        let check = derivative(&antiderivative, "x").unwrap();
        assert_eq!(poly::expand(&(check - expr)), n(0));
    }

    #[test]
    fn logarithm_by_parts() {
        assert_eq!(integral(&SymExpr::call1("log", x())), "x*log(x) - x");
    }

    #[test]
    fn partial_fractions() {
        let expr = SymExpr::recip(SymExpr::pow(x(), n(2)) - n(1));
        let result = integral_steps(&expr, "x").eval().unwrap();
        assert!(result.has_function("log"));
        assert_eq!(result.terms().len(), 2);
    }

    #[test]
    fn arctangent() {
        let expr = SymExpr::recip(SymExpr::pow(x(), n(2)) + n(1));
        assert_eq!(integral(&expr), "atan(x)");
    }

    #[test]
    fn unknown() {
        let expr = SymExpr::call1("f", x());
        assert!(integral_steps(&expr, "x").contains_dont_know());
    }
}
