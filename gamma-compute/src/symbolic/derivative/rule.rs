//! The tree of differentiation rules that derives an expression, used to explain a derivative
//! step by step.

use crate::symbolic::{
    expr::{Primary, SymExpr},
    simplify::fraction::as_numer_denom,
};
use super::function::outer_derivative;

/// A differentiation rule applied to [`DiffRule::context`], with the rules for its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRule {
    /// The expression being differentiated.
    pub context: SymExpr,

    /// The variable of differentiation.
    pub symbol: String,

    /// The rule used.
    pub kind: DiffRuleKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiffRuleKind {
    /// `d/dx c = 0`
    Constant,

    /// `d/dx c*f = c * d/dx f`
    ConstantTimes {
        constant: SymExpr,
        other: SymExpr,
        substep: Box<DiffRule>,
    },

    /// `d/dx x^n = n*x^(n - 1)`
    Power {
        base: SymExpr,
        exp: SymExpr,
    },

    /// `d/dx (f + g) = d/dx f + d/dx g`
    Add {
        substeps: Vec<DiffRule>,
    },

    /// The product rule, one substep per factor.
    Mul {
        terms: Vec<SymExpr>,
        substeps: Vec<DiffRule>,
    },

    /// The quotient rule.
    Div {
        numerator: SymExpr,
        denominator: SymExpr,
        numer_step: Box<DiffRule>,
        denom_step: Box<DiffRule>,
    },

    /// The chain rule: the outer function differentiated with respect to `u_var`, and the inner
    /// expression `u`.
    Chain {
        substep: Box<DiffRule>,
        inner: SymExpr,
        u_var: String,
        inner_step: Box<DiffRule>,
    },

    /// `sin` and `cos`.
    Trig {
        func: String,
    },

    /// `d/dx b^x = b^x * log(b)`, including `exp`.
    Exp {
        base: SymExpr,
    },

    /// `d/dx log(x) = 1/x`
    Log,

    /// Any other function with a known derivative.
    Function {
        func: String,
        result: SymExpr,
    },

    /// An undefined function, whose derivative is left unevaluated.
    Undefined,

    /// The expression is rewritten into a form that is easier to differentiate.
    Rewrite {
        rewritten: SymExpr,
        substep: Box<DiffRule>,
    },

    /// No rule applies.
    DontKnow,
}

/// Builds the rule for `outer(arg)`, applying the chain rule if `arg` is not the variable itself.
fn chain(
    context: &SymExpr,
    arg: &SymExpr,
    symbol: &str,
    direct: impl Fn(&SymExpr, &str) -> DiffRule,
) -> DiffRule {
    if arg.as_symbol() == Some(symbol) {
        return direct(context, symbol);
    }
    let u_var = context.fresh_symbol("u");
    let u = SymExpr::symbol(u_var.as_str());
    let outer = context.subs(arg, &u);
    DiffRule {
        context: context.clone(),
        symbol: symbol.to_string(),
        kind: DiffRuleKind::Chain {
            substep: Box::new(direct(&outer, &u_var)),
            inner: arg.clone(),
            u_var,
            inner_step: Box::new(diff_rule(arg, symbol)),
        },
    }
}

fn rule(context: &SymExpr, symbol: &str, kind: DiffRuleKind) -> DiffRule {
    DiffRule { context: context.clone(), symbol: symbol.to_string(), kind }
}

fn power_rule(expr: &SymExpr, base: &SymExpr, exp: &SymExpr, symbol: &str) -> DiffRule {
    let base_varies = base.has_symbol(symbol);
    let exp_varies = exp.has_symbol(symbol);
    if base_varies && !exp_varies {
        chain(expr, base, symbol, |context, symbol| {
            let (base, exp) = context.as_base_exp();
            rule(context, symbol, DiffRuleKind::Power { base, exp })
        })
    } else if !base_varies && exp_varies {
        chain(expr, exp, symbol, |context, symbol| {
            let (base, _) = context.as_base_exp();
            rule(context, symbol, DiffRuleKind::Exp { base })
        })
    } else {
        rule(expr, symbol, DiffRuleKind::DontKnow)
    }
}

fn mul_rule(expr: &SymExpr, symbol: &str) -> DiffRule {
    let (coeff, rest) = expr.as_coeff_factors();
    let (constants, varying): (Vec<_>, Vec<_>) = rest.into_iter().partition(|factor| !factor.has_symbol(symbol));
    if !coeff.is_one() || !constants.is_empty() {
        let constant = SymExpr::mul(std::iter::once(SymExpr::from_number(coeff)).chain(constants));
        let other = SymExpr::mul(varying);
        return rule(expr, symbol, DiffRuleKind::ConstantTimes {
            constant,
            substep: Box::new(diff_rule(&other, symbol)),
            other,
        });
    }

    let (numerator, denominator) = as_numer_denom(expr);
    if denominator.has_symbol(symbol) {
        return rule(expr, symbol, DiffRuleKind::Div {
            numer_step: Box::new(diff_rule(&numerator, symbol)),
            denom_step: Box::new(diff_rule(&denominator, symbol)),
            numerator,
            denominator,
        });
    }

    let substeps = varying.iter().map(|factor| diff_rule(factor, symbol)).collect();
    rule(expr, symbol, DiffRuleKind::Mul { terms: varying, substeps })
}

fn function_rule(expr: &SymExpr, name: &str, args: &[SymExpr], symbol: &str) -> DiffRule {
    let [arg] = args else {
        return rule(expr, symbol, DiffRuleKind::DontKnow);
    };

    match name {
        "sin" | "cos" => chain(expr, arg, symbol, |context, symbol| {
            rule(context, symbol, DiffRuleKind::Trig { func: name.to_string() })
        }),
        // the other trigonometric functions are explained through sine and cosine
        "tan" => rewrite_rule(expr, arg, symbol, Some("sin"), "cos"),
        "cot" => rewrite_rule(expr, arg, symbol, Some("cos"), "sin"),
        "sec" => rewrite_rule(expr, arg, symbol, None, "cos"),
        "csc" => rewrite_rule(expr, arg, symbol, None, "sin"),
        "exp" => chain(expr, arg, symbol, |context, symbol| {
            rule(context, symbol, DiffRuleKind::Exp { base: SymExpr::e() })
        }),
        "log" => chain(expr, arg, symbol, |context, symbol| rule(context, symbol, DiffRuleKind::Log)),
        _ => {
            if outer_derivative(name, arg).is_some() {
                chain(expr, arg, symbol, |context, symbol| {
                    let u = SymExpr::symbol(symbol);
                    let result = outer_derivative(name, &u).unwrap_or_else(SymExpr::zero);
                    rule(context, symbol, DiffRuleKind::Function { func: name.to_string(), result })
                })
            } else if arg.as_symbol() == Some(symbol) {
                rule(expr, symbol, DiffRuleKind::Undefined)
            } else {
                rule(expr, symbol, DiffRuleKind::DontKnow)
            }
        },
    }
}

/// Rewrites a trigonometric function as a quotient of sines and cosines, `numer(u)/denom(u)`.
fn rewrite_rule(expr: &SymExpr, u: &SymExpr, symbol: &str, numer: Option<&str>, denom: &str) -> DiffRule {
    let numer = match numer {
        Some(name) => SymExpr::call1(name, u.clone()),
        None => SymExpr::one(),
    };
    let rewritten = numer / SymExpr::call1(denom, u.clone());
    rule(expr, symbol, DiffRuleKind::Rewrite {
        substep: Box::new(diff_rule(&rewritten, symbol)),
        rewritten,
    })
}

/// Builds the rule tree that differentiates `expr` with respect to `symbol`.
pub fn diff_rule(expr: &SymExpr, symbol: &str) -> DiffRule {
    if !expr.has_symbol(symbol) {
        return rule(expr, symbol, DiffRuleKind::Constant);
    }

    match expr {
        SymExpr::Primary(Primary::Symbol(_)) => rule(expr, symbol, DiffRuleKind::Power {
            base: expr.clone(),
            exp: SymExpr::one(),
        }),
        SymExpr::Primary(Primary::Call(name, args)) => function_rule(expr, name, args, symbol),
        SymExpr::Add(terms) => rule(expr, symbol, DiffRuleKind::Add {
            substeps: terms.iter().map(|term| diff_rule(term, symbol)).collect(),
        }),
        SymExpr::Mul(_) => mul_rule(expr, symbol),
        SymExpr::Exp(base, exp) => power_rule(expr, base, exp, symbol),
        _ => rule(expr, symbol, DiffRuleKind::DontKnow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    #[test]
    fn chain_of_power_and_trig() {
        let f = SymExpr::pow(SymExpr::call1("cos", x()), SymExpr::integer(7));
        let rule = diff_rule(&f, "x");
        let DiffRuleKind::Chain { substep, inner, u_var, inner_step } = rule.kind else {
            panic!("expected the chain rule");
        };
        assert_eq!(u_var, "u");
        assert_eq!(inner, SymExpr::call1("cos", x()));
        assert!(matches!(substep.kind, DiffRuleKind::Power { .. }));
        assert!(matches!(inner_step.kind, DiffRuleKind::Trig { ref func } if func == "cos"));
    }

    #[test]
    fn constant_times() {
        let f = SymExpr::integer(3) * SymExpr::call1("exp", x());
        let rule = diff_rule(&f, "x");
        assert!(matches!(rule.kind, DiffRuleKind::ConstantTimes { .. }));
    }

    #[test]
    fn quotient() {
        let f = SymExpr::call1("sin", x()) / (x() + SymExpr::one());
        assert!(matches!(diff_rule(&f, "x").kind, DiffRuleKind::Div { .. }));
    }

    #[test]
    fn tangent_is_rewritten() {
        let f = SymExpr::call1("tan", x());
        let DiffRuleKind::Rewrite { rewritten, .. } = diff_rule(&f, "x").kind else {
            panic!("expected a rewrite");
        };
        assert_eq!(rewritten, SymExpr::call1("sin", x()) / SymExpr::call1("cos", x()));
    }
}
