//! Simplification rules for quotients.

use crate::symbolic::{
    expr::SymExpr,
    simplify::{fraction, rules::{do_add, if_simpler}, step::Step},
    step_collector::StepCollector,
};

/// Returns true if any term of the sum has a denominator.
fn has_denominator(terms: &[SymExpr]) -> bool {
    terms.iter().any(|term| !fraction::as_numer_denom(term).1.is_one())
}

/// `(x**2 - 1)/(x - 1) = x + 1`
pub fn cancel(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    if !matches!(expr, SymExpr::Mul(_) | SymExpr::Add(_) | SymExpr::Exp(..)) || expr.is_constant() {
        return None;
    }
    let opt = if_simpler(expr, fraction::cancel(expr))?;

    step_collector.push(Step::Cancel);
    Some(opt)
}

/// `x/(x + 1) + 1/(x + 1) = 1`
pub fn combine(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        if !has_denominator(terms) {
            return None;
        }
        if_simpler(expr, fraction::together(expr))
    })?;

    step_collector.push(Step::CombineFractions);
    Some(opt)
}

/// Applies all quotient rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    cancel(expr, step_collector)
        .or_else(|| combine(expr, step_collector))
}
