//! Explains an antiderivative step by step.

use crate::symbolic::{
    derivative::derivative,
    expr::{Limit, SymExpr},
    integrate::{integral_steps, integrate, IntRule, IntRuleKind},
    simplify::simplify,
};
use super::HtmlPrinter;

fn integral(expr: &SymExpr, symbol: &str) -> SymExpr {
    SymExpr::Integral(Box::new(expr.clone()), vec![Limit::indefinite(symbol)])
}

/// The antiderivative a rule produces, or the unevaluated integral if the rule could not finish.
fn answer(rule: &IntRule) -> SymExpr {
    rule.eval().unwrap_or_else(|| integral(&rule.context, &rule.symbol))
}

/// The rule's integral, equated to its result.
fn statement(printer: &HtmlPrinter, rule: &IntRule) -> String {
    printer.format_equation_display(&integral(&rule.context, &rule.symbol), &answer(rule))
}

fn print_rule(printer: &mut HtmlPrinter, rule: &IntRule) {
    let x = SymExpr::symbol(rule.symbol.as_str());
    match &rule.kind {
        IntRuleKind::Constant { .. } => printer.new_step(|printer| {
            printer.append("The integral of a constant is the constant times the variable of integration:");
            let display = statement(printer, rule);
            printer.append(&display);
        }),
        IntRuleKind::ConstantTimes { substep, .. } => printer.new_step(|printer| {
            printer.append("The integral of a constant times a function is the constant times the integral of the function:");
            let display = statement(printer, rule);
            printer.append(&display);
            printer.new_level(|printer| print_rule(printer, substep));
            let text = format!("So, the result is: {}", printer.format_math(&answer(rule)));
            printer.append(&text);
        }),
        IntRuleKind::Power { .. } => printer.new_step(|printer| {
            let n = SymExpr::symbol("n");
            let text = format!(
                "The integral of {} is {} when {}:",
                printer.format_math(&SymExpr::pow(x.clone(), n.clone())),
                printer.format_math(&(SymExpr::pow(x.clone(), n.clone() + SymExpr::one()) / (n.clone() + SymExpr::one()))),
                printer.format_math(&SymExpr::Relational(
                    crate::symbolic::expr::RelOp::Ne,
                    Box::new(n),
                    Box::new(SymExpr::integer(-1)),
                )),
            );
            printer.append(&text);
            let display = statement(printer, rule);
            printer.append(&display);
        }),
        IntRuleKind::Reciprocal { .. } => printer.new_step(|printer| {
            let text = format!(
                "The integral of {} is {}.",
                printer.format_math(&SymExpr::recip(x.clone())),
                printer.format_math(&SymExpr::call1("log", x.clone())),
            );
            printer.append(&text);
            let display = statement(printer, rule);
            printer.append(&display);
        }),
        IntRuleKind::Exp { base, .. } => printer.new_step(|printer| {
            if *base == SymExpr::e() {
                printer.append("The integral of the exponential function is itself.");
            } else {
                printer.append(
                    "The integral of an exponential function is itself divided by the natural logarithm of the base.",
                );
            }
            let display = statement(printer, rule);
            printer.append(&display);
        }),
        IntRuleKind::Add { substeps } => printer.new_step(|printer| {
            printer.append("Integrate term-by-term:");
            printer.new_level(|printer| {
                for substep in substeps {
                    print_rule(printer, substep);
                }
            });
            let text = format!("The result is: {}", printer.format_math(&answer(rule)));
            printer.append(&text);
        }),
        IntRuleKind::URule { u_var, u_func, substep } => printer.new_step(|printer| {
            let u = SymExpr::symbol(u_var.as_str());
            let du = SymExpr::symbol(format!("d{}", u_var));
            let dx = SymExpr::symbol(format!("d{}", rule.symbol));
            let du_dx = derivative(u_func, &rule.symbol).unwrap_or_else(|_| SymExpr::zero());

            let text = format!("Let {}.", printer.format_equation(&u, u_func));
            printer.append(&text);
            let text = format!("Then let {} and substitute:", printer.format_equation(&du, &(du_dx * dx)));
            printer.append(&text);
            let display = printer.format_math_display(&integral(&substep.context, u_var));
            printer.append(&display);
            printer.new_level(|printer| print_rule(printer, substep));
            let text = format!("Now substitute {} back in:", printer.format_equation(&u, u_func));
            printer.append(&text);
            let display = printer.format_math_display(&answer(rule));
            printer.append(&display);
        }),
        IntRuleKind::Parts { u, dv, v_step, second_step } => printer.new_step(|printer| {
            let function = |name: &str| SymExpr::call(name, vec![x.clone()]);
            printer.append("Use integration by parts:");
            let display = printer.format_latex_display(
                r"\int \operatorname{u} \operatorname{dv} = \operatorname{u}\operatorname{v} - \int \operatorname{v} \operatorname{du}",
            );
            printer.append(&display);
            let text = format!(
                "Let {} and let {}.",
                printer.format_equation(&function("u"), u),
                printer.format_equation(&function("dv"), dv),
            );
            printer.append(&text);
            let du = derivative(u, &rule.symbol).unwrap_or_else(|_| SymExpr::zero());
            let text = format!("Then {}.", printer.format_equation(&function("du"), &du));
            printer.append(&text);
            let text = format!("To find {}:", printer.format_math(&function("v")));
            printer.append(&text);
            printer.new_level(|printer| print_rule(printer, v_step));
            printer.append("Now evaluate the sub-integral.");
            print_rule(printer, second_step);
        }),
        IntRuleKind::Trig { func, .. } => printer.new_step(|printer| {
            let text = match func.as_str() {
                "sin" => "The integral of sine is negative cosine:",
                "cos" => "The integral of cosine is sine:",
                "sec**2" => "The integral of secant squared is tangent:",
                "csc**2" => "The integral of cosecant squared is negative cotangent:",
                "sec*tan" => "The integral of secant times tangent is secant:",
                _ => "The integral of cosecant times cotangent is negative cosecant:",
            };
            printer.append(text);
            let display = statement(printer, rule);
            printer.append(&display);
        }),
        IntRuleKind::Arctan { .. } => printer.new_step(|printer| {
            let text = format!(
                "The integral of {} is {}.",
                printer.format_math(&SymExpr::recip(SymExpr::pow(x.clone(), SymExpr::integer(2)) + SymExpr::one())),
                printer.format_math(&SymExpr::call1("atan", x.clone())),
            );
            printer.append(&text);
            let display = statement(printer, rule);
            printer.append(&display);
        }),
        IntRuleKind::Rewrite { rewritten, substep } => printer.new_step(|printer| {
            printer.append("Rewrite the integrand:");
            let display = printer.format_equation_display(&rule.context, rewritten);
            printer.append(&display);
            print_rule(printer, substep);
        }),
        IntRuleKind::DontKnow => printer.new_step(|printer| {
            printer.append("Don't know the steps in finding this integral.");
            if let Some(result) = integrate(&rule.context, &rule.symbol) {
                printer.append("But the integral is");
                let display = printer.format_math_display(&result);
                printer.append(&display);
            }
        }),
    }
}

/// Explains how to integrate `integrand` with respect to `symbol`, as an HTML fragment that ends
/// with the antiderivative plus a constant of integration.
pub fn print_html_steps(integrand: &SymExpr, symbol: &str) -> String {
    let rule = integral_steps(integrand, symbol);
    let mut printer = HtmlPrinter::new();
    print_rule(&mut printer, &rule);

    let constant = SymExpr::symbol("constant");
    let mut result = answer(&rule);
    if rule.eval().is_some() {
        let simplified = simplify(&result);
        if simplified != result {
            result = simplified;
            printer.new_step(|printer| {
                printer.append("Now simplify:");
                let display = printer.format_math_display(&result);
                printer.append(&display);
            });
        }
        printer.new_step(|printer| {
            printer.append("Add the constant of integration:");
            let display = printer.format_math_display(&(result.clone() + constant.clone()));
            printer.append(&display);
        });
        result = result + constant;
    }
    tracing::debug!(%integrand, symbol, "printed integral steps");
    printer.finish(&result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    #[test]
    fn parts_steps() {
        let html = print_html_steps(&(x() * SymExpr::call1("exp", x())), "x");
        assert!(html.contains("Use integration by parts:"));
        assert!(html.contains("Now evaluate the sub-integral."));
        assert!(html.contains("Add the constant of integration:"));
        assert!(html.ends_with("</script></p>"));
    }

    #[test]
    fn substitution_steps() {
        let expr = SymExpr::integer(2) * x() * SymExpr::call1("cos", SymExpr::pow(x(), SymExpr::integer(2)));
        let html = print_html_steps(&expr, "x");
        assert!(html.contains("Let "));
        assert!(html.contains("back in:"));
    }

    #[test]
    fn unknown_steps() {
        let html = print_html_steps(&SymExpr::call1("f", x()), "x");
        assert!(html.contains("Don't know the steps in finding this integral."));
        assert!(!html.contains("constant of integration"));
    }
}
