//! Simplification rules related to the distributive property.

use crate::symbolic::{
    expr::SymExpr,
    poly,
    simplify::{rules::{do_add, if_simpler}, step::Step},
    step_collector::StepCollector,
};

/// `x*(x + 1) - x = x**2`
pub fn expand(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    if !matches!(expr, SymExpr::Add(_) | SymExpr::Mul(_) | SymExpr::Exp(..)) {
        return None;
    }
    let opt = if_simpler(expr, poly::expand(expr))?;

    step_collector.push(Step::Expand);
    Some(opt)
}

/// `x**2 + 2*x + 1 = (x + 1)**2`
pub fn factor(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |_| if_simpler(expr, poly::factor(expr)))?;

    step_collector.push(Step::Factor);
    Some(opt)
}

/// Applies all distribution rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    expand(expr, step_collector)
        .or_else(|| factor(expr, step_collector))
}
