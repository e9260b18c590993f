//! Simplification rules for trigonometric functions. Special values such as `sin(pi/6)` are
//! computed when the call is built, so these rules only deal with identities.

use crate::symbolic::{
    expr::SymExpr,
    poly,
    simplify::{rules::{do_add, do_multiply, if_simpler}, step::Step},
    step_collector::StepCollector,
};

/// If the factor is `sin(u)**2` or `cos(u)**2`, returns the function name and `u`.
fn trig_square(factor: &SymExpr) -> Option<(&'static str, SymExpr)> {
    let SymExpr::Exp(base, exp) = factor else {
        return None;
    };
    if exp.as_i64() != Some(2) {
        return None;
    }
    if let Some(arg) = base.call_arg("sin") {
        return Some(("sin", arg.clone()));
    }
    base.call_arg("cos").map(|arg| ("cos", arg.clone()))
}

/// `sin(x)**2 + cos(x)**2 = 1`, `1 - sin(x)**2 = cos(x)**2`
pub fn pythagorean(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let squares = terms
            .iter()
            .flat_map(SymExpr::factors)
            .filter_map(|factor| trig_square(&factor))
            .collect::<Vec<_>>();
        for (name, arg) in squares {
            let other = if name == "sin" { "cos" } else { "sin" };
            let square = SymExpr::pow(SymExpr::call1(name, arg.clone()), SymExpr::integer(2));
            let replacement = SymExpr::one() - SymExpr::pow(SymExpr::call1(other, arg), SymExpr::integer(2));
            let candidate = poly::expand(&expr.subs(&square, &replacement));
            if let Some(simpler) = if_simpler(expr, candidate) {
                return Some(simpler);
            }
        }
        None
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::PythagoreanIdentity);
    Some(opt)
}

/// `sin(x)/cos(x) = tan(x)`
pub fn tangent(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        for factor in factors {
            let (base, exp) = factor.as_base_exp();
            let Some(arg) = base.call_arg("sin") else {
                continue;
            };
            let cos_power = SymExpr::pow(SymExpr::call1("cos", arg.clone()), -exp.clone());
            if !factors.contains(&cos_power) {
                continue;
            }
            let rest = factors
                .iter()
                .filter(|other| *other != factor && **other != cos_power)
                .cloned();
            let tan_power = SymExpr::pow(SymExpr::call1("tan", arg.clone()), exp);
            return Some(SymExpr::mul(rest.chain(std::iter::once(tan_power))));
        }
        None
    })?;

    step_collector.push(Step::TangentIdentity);
    Some(opt)
}

/// `2*sin(x)*cos(x) = sin(2*x)`
pub fn double_angle(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let arg = factors.iter().find_map(|factor| factor.call_arg("sin"))?;
        let sin = SymExpr::call1("sin", arg.clone());
        let cos = SymExpr::call1("cos", arg.clone());
        if !factors.contains(&cos) {
            return None;
        }
        let rest = factors.iter().filter(|factor| **factor != sin && **factor != cos).cloned();
        let double = SymExpr::call1("sin", SymExpr::integer(2) * arg.clone());
        if_simpler(expr, SymExpr::mul(rest.chain([SymExpr::half(), double])))
    })?;

    step_collector.push(Step::DoubleAngle);
    Some(opt)
}

/// Applies all trigonometric rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    pythagorean(expr, step_collector)
        .or_else(|| tangent(expr, step_collector))
        .or_else(|| double_angle(expr, step_collector))
}
