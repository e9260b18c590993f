//! Rule-based simplification of symbolic expressions.
//!
//! Simplification works bottom-up: the children of an expression are simplified first, then the
//! [rules](rules) are applied to the expression itself until none of them applies. Each rule only
//! fires when it lowers the [complexity](SymExpr::complexity) of the expression, so the process
//! always terminates, and the whole pass is repeated until the expression stops changing.
//!
//! The algebraic building blocks the rules use are also exposed on their own, for callers that
//! want a specific form instead of the simplest one: [`fraction::cancel`], [`fraction::together`],
//! [`fraction::apart`], and [`crate::symbolic::poly::expand`] / [`crate::symbolic::poly::factor`].
//!
//! ```
//! use gamma_compute::symbolic::{expr::SymExpr, simplify};
//!
//! let x = SymExpr::symbol("x");
//! let expr = SymExpr::pow(SymExpr::call1("sin", x.clone()), SymExpr::integer(2))
//!     + SymExpr::pow(SymExpr::call1("cos", x), SymExpr::integer(2));
//! assert_eq!(simplify(&expr), SymExpr::one());
//! ```

pub mod fraction;
pub mod rules;
pub mod step;

use super::expr::{Primary, SymExpr};
use super::step_collector::StepCollector;
use step::Step;

/// The number of full passes made before giving up on reaching a fixed point.
const MAX_PASSES: usize = 16;

/// Simplifies the expression.
pub fn simplify(expr: &SymExpr) -> SymExpr {
    simplify_with(expr, &mut ())
}

/// Simplifies the expression, returning the steps that were taken.
pub fn simplify_with_steps(expr: &SymExpr) -> (SymExpr, Vec<Step>) {
    let mut steps = Vec::new();
    let simplified = simplify_with(expr, &mut steps);
    (simplified, steps)
}

/// Simplifies the expression, reporting each step taken to the given collector.
pub fn simplify_with(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> SymExpr {
    let mut current = expr.clone();
    for _ in 0..MAX_PASSES {
        let next = simplify_pass(&current, step_collector);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn simplify_pass(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> SymExpr {
    let mut expr = expr.map_children(&mut |child| simplify_pass(child, step_collector));
    while let Some(next) = rules::all(&expr, step_collector) {
        expr = next;
    }
    expr
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

    fn sin(arg: SymExpr) -> SymExpr {
        SymExpr::call1("sin", arg)
    }

    fn cos(arg: SymExpr) -> SymExpr {
        SymExpr::call1("cos", arg)
    }

    #[test]
    fn cancel_quotient() {
        let expr = (SymExpr::pow(x(), n(2)) - n(1)) / (x() - n(1));
        let (simplified, steps) = simplify_with_steps(&expr);
        assert_eq!(simplified.to_string(), "x + 1");
        assert_eq!(steps, vec![Step::Cancel]);
    }

    #[test]
    fn pythagorean_identity() {
        let expr = SymExpr::pow(sin(x()), n(2)) + SymExpr::pow(cos(x()), n(2));
        assert_eq!(simplify(&expr), n(1));

        let expr = n(1) - SymExpr::pow(sin(x()), n(2));
        assert_eq!(simplify(&expr).to_string(), "cos(x)**2");
    }

    #[test]
    fn tangent_identity() {
        assert_eq!(simplify(&(sin(x()) / cos(x()))).to_string(), "tan(x)");
    }

    #[test]
    fn expand_when_shorter() {
        let expr = x() * (x() + n(1)) - x();
        assert_eq!(simplify(&expr).to_string(), "x**2");
    }

    #[test]
    fn factor_when_shorter() {
        let expr = SymExpr::pow(x(), n(2)) + n(2) * x() + n(1);
        assert_eq!(simplify(&expr).to_string(), "(x + 1)**2");
    }

    #[test]
    fn already_simple() {
        let expr = x() + n(1);
        let (simplified, steps) = simplify_with_steps(&expr);
        assert_eq!(simplified, expr);
        assert!(steps.is_empty());
    }
}
