//! Implementation of the simplification rules.
//!
//! Each rule in this module is a function that takes the expression to simplify as an argument,
//! and returns `Some(expr)` with the simplified expression if the rule applies, or `None` if the
//! rule does not apply. Every rule strictly lowers the [complexity](SymExpr::complexity) of the
//! expression it rewrites, so applying rules until none applies always terminates.

pub mod distribute;
pub mod fraction;
pub mod trigonometry;

use crate::symbolic::step_collector::StepCollector;
use super::{step::Step, Primary, SymExpr};

/// If the expression is a function call with the given function name, calls the given
/// transformation function with the arguments.
pub(crate) fn do_call(
    expr: &SymExpr,
    name: &str,
    f: impl Copy + Fn(&[SymExpr]) -> Option<SymExpr>,
) -> Option<SymExpr> {
    if let SymExpr::Primary(Primary::Call(target_name, args)) = expr {
        if target_name == name {
            return f(args);
        }
    }

    None
}

/// If the expression is an add expression, calls the given transformation function with the terms.
pub(crate) fn do_add(expr: &SymExpr, f: impl Copy + Fn(&[SymExpr]) -> Option<SymExpr>) -> Option<SymExpr> {
    if let SymExpr::Add(terms) = expr {
        f(terms)
    } else {
        None
    }
}

/// If the expression is a multiplication expression, calls the given transformation function with
/// the factors.
pub(crate) fn do_multiply(expr: &SymExpr, f: impl Copy + Fn(&[SymExpr]) -> Option<SymExpr>) -> Option<SymExpr> {
    if let SymExpr::Mul(factors) = expr {
        f(factors)
    } else {
        None
    }
}

/// Returns the candidate if it is strictly less complex than the original expression.
pub(crate) fn if_simpler(original: &SymExpr, candidate: SymExpr) -> Option<SymExpr> {
    (candidate.complexity() < original.complexity()).then_some(candidate)
}

/// Applies the first rule that applies.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    trigonometry::all(expr, step_collector)
        .or_else(|| fraction::all(expr, step_collector))
        .or_else(|| distribute::all(expr, step_collector))
}
