//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Algebraic expressions in this module are represented as a tree of [`SymExpr`] nodes. Unlike the
//! syntax tree produced by [`gamma_parser`], [`SymExpr`] nodes **flatten** out the tree structure
//! and are kept in canonical form as they are built.
//!
//! For example, the expression `x + (y + z)` is represented as a single [`SymExpr::Add`] node with
//! _three_ children, `x`, `y`, and `z`, and `x + x` is built directly as `2*x`. Combining like
//! terms is much easier when the terms in question are all at the same level in the tree.
//!
//! ```
//! use gamma_compute::symbolic::SymExpr;
//!
//! let (x, y, z) = (SymExpr::symbol("x"), SymExpr::symbol("y"), SymExpr::symbol("z"));
//! let expr = x.clone() + (y + z) + x;
//! assert_eq!(expr.to_string(), "2*x + y + z");
//! ```
//!
//! # Simplification
//!
//! Canonical form only covers what can be done cheaply while building. The [`simplify()`]
//! function goes further: it applies the rules in [`simplify::rules`] until none of them lowers
//! the _complexity_ of the expression, roughly the number of nodes in its tree.
//!
//! # Calculus and friends
//!
//! [`derivative`], [`integrate`], [`summation`] and [`solve`] each come with their own module.
//! The unevaluated forms [`SymExpr::Derivative`], [`SymExpr::Integral`], [`SymExpr::Sum`] and
//! [`SymExpr::Product`] are evaluated by [`doit`]. The [`steps`] module explains derivatives and
//! integrals as HTML.

pub mod derivative;
pub mod evalf;
pub mod expr;
pub mod integrate;
pub mod logic;
pub mod minpoly;
pub mod ntheory;
pub mod poly;
pub mod print;
pub mod rewrite;
pub mod simplify;
pub mod solve;
pub mod step_collector;
pub mod steps;
pub mod summation;

pub use expr::SymExpr;
pub use simplify::{simplify, simplify_with, simplify_with_steps};
pub use step_collector::StepCollector;

/// Evaluates every unevaluated derivative, integral, sum and product in the expression, innermost
/// first. Whatever has no closed form is kept unevaluated.
pub fn doit(expr: &SymExpr) -> SymExpr {
    let rebuilt = expr.map_children(&mut |child| doit(child));
    let evaluated = match &rebuilt {
        SymExpr::Derivative(f, vars) => derivative::diff(f, vars).ok(),
        SymExpr::Integral(f, limits) => Some(integrate::integrate_limits(f, limits)),
        SymExpr::Sum(term, limit) => Some(summation::sum_limit(term, limit)),
        SymExpr::Product(term, limit) => Some(summation::product_limit(term, limit)),
        _ => None,
    };
    evaluated.unwrap_or(rebuilt)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use expr::Limit;

    #[test]
    fn doit_nested() {
        let x = SymExpr::symbol("x");
        let integral = SymExpr::Integral(
            Box::new(SymExpr::pow(x.clone(), SymExpr::integer(2))),
            vec![Limit::definite("x", SymExpr::zero(), SymExpr::integer(3))],
        );
        assert_eq!(doit(&integral), SymExpr::integer(9));

        let derivative = SymExpr::Derivative(
            Box::new(SymExpr::call1("sin", x.clone())),
            vec!["x".to_string()],
        );
        assert_eq!(doit(&derivative), SymExpr::call1("cos", x));
    }

    #[test]
    fn doit_keeps_undefined() {
        let f = SymExpr::call1("f", SymExpr::symbol("x"));
        let derivative = SymExpr::Derivative(Box::new(f), vec!["x".to_string()]);
        assert_eq!(doit(&derivative), derivative);
    }
}
