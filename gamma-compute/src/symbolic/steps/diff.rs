//! Explains a derivative step by step.

use crate::symbolic::{
    derivative::{diff, diff_rule, rule::DiffRuleKind, DiffRule},
    expr::SymExpr,
    simplify::simplify,
};
use super::{function_names, HtmlPrinter};

/// The derivative a rule produces. Derivatives that cannot be written out stay unevaluated.
fn answer(rule: &DiffRule) -> SymExpr {
    diff(&rule.context, std::slice::from_ref(&rule.symbol))
        .unwrap_or_else(|_| unevaluated(&rule.context, &rule.symbol))
}

fn unevaluated(expr: &SymExpr, symbol: &str) -> SymExpr {
    SymExpr::Derivative(Box::new(expr.clone()), vec![symbol.to_string()])
}

fn print_rule(printer: &mut HtmlPrinter, rule: &DiffRule) {
    let symbol = SymExpr::symbol(rule.symbol.as_str());
    match &rule.kind {
        DiffRuleKind::Constant => printer.new_step(|printer| {
            let text = format!("The derivative of the constant {} is zero.", printer.format_math(&rule.context));
            printer.append(&text);
        }),
        DiffRuleKind::ConstantTimes { substep, .. } => printer.new_step(|printer| {
            printer.append(
                "The derivative of a constant times a function is the constant times the derivative of the function.",
            );
            printer.new_level(|printer| print_rule(printer, substep));
            let text = format!("So, the result is: {}", printer.format_math(&answer(rule)));
            printer.append(&text);
        }),
        DiffRuleKind::Power { .. } => printer.new_step(|printer| {
            let text = format!(
                "Apply the power rule: {} goes to {}",
                printer.format_math(&rule.context),
                printer.format_math(&answer(rule)),
            );
            printer.append(&text);
        }),
        DiffRuleKind::Add { substeps } => printer.new_step(|printer| {
            let text = format!("Differentiate {} term by term:", printer.format_math(&rule.context));
            printer.append(&text);
            printer.new_level(|printer| {
                for substep in substeps {
                    print_rule(printer, substep);
                }
            });
            let text = format!("The result is: {}", printer.format_math(&answer(rule)));
            printer.append(&text);
        }),
        DiffRuleKind::Mul { terms, substeps } => printer.new_step(|printer| {
            printer.append("Apply the product rule:");
            let names = function_names(terms.len())
                .into_iter()
                .map(|name| SymExpr::call(name, vec![symbol.clone()]))
                .collect::<Vec<_>>();
            let derivatives = names.iter().map(|f| unevaluated(f, &rule.symbol)).collect::<Vec<_>>();
            let rule_form = (0..names.len()).map(|i| {
                SymExpr::mul(names.iter().enumerate().map(|(j, f)| {
                    if i == j { derivatives[j].clone() } else { f.clone() }
                }))
            });
            let lhs = unevaluated(&SymExpr::mul(names.iter().cloned()), &rule.symbol);
            let display = printer.format_equation_display(&lhs, &SymExpr::add(rule_form));
            printer.append(&display);

            for ((name, derivative), (term, substep)) in names.iter().zip(&derivatives).zip(terms.iter().zip(substeps)) {
                let text = format!(
                    "{}; to find {}:",
                    printer.format_equation(name, term),
                    printer.format_math(derivative),
                );
                printer.append(&text);
                printer.new_level(|printer| print_rule(printer, substep));
            }
            let text = format!("The result is: {}", printer.format_math(&answer(rule)));
            printer.append(&text);
        }),
        DiffRuleKind::Div { numerator, denominator, numer_step, denom_step } => printer.new_step(|printer| {
            let f = SymExpr::call("f", vec![symbol.clone()]);
            let g = SymExpr::call("g", vec![symbol.clone()]);
            let (df, dg) = (unevaluated(&f, &rule.symbol), unevaluated(&g, &rule.symbol));
            let quotient = (g.clone() * df.clone() - f.clone() * dg.clone()) / SymExpr::pow(g.clone(), SymExpr::integer(2));

            printer.append("Apply the quotient rule, which is:");
            let display = printer.format_equation_display(&unevaluated(&(f.clone() / g.clone()), &rule.symbol), &quotient);
            printer.append(&display);
            let text = format!(
                "{} and {}.",
                printer.format_equation(&f, numerator),
                printer.format_equation(&g, denominator),
            );
            printer.append(&text);

            let text = format!("To find {}:", printer.format_math(&df));
            printer.append(&text);
            printer.new_level(|printer| print_rule(printer, numer_step));
            let text = format!("To find {}:", printer.format_math(&dg));
            printer.append(&text);
            printer.new_level(|printer| print_rule(printer, denom_step));

            printer.append("Now plug in to the quotient rule:");
            let display = printer.format_math_display(&answer(rule));
            printer.append(&display);
        }),
        DiffRuleKind::Chain { substep, inner, u_var, inner_step } => {
            printer.new_step(|printer| {
                let u = SymExpr::symbol(u_var.as_str());
                let text = format!("Let {}.", printer.format_equation(&u, inner));
                printer.append(&text);
                print_rule(printer, substep);
            });
            printer.new_step(|printer| {
                let text = format!(
                    "Then, apply the chain rule. Multiply by {}:",
                    printer.format_math(&unevaluated(inner, &rule.symbol)),
                );
                printer.append(&text);
                printer.new_level(|printer| print_rule(printer, inner_step));
                printer.append("The result of the chain rule is:");
                let display = printer.format_math_display(&answer(rule));
                printer.append(&display);
            });
        },
        DiffRuleKind::Trig { func } => printer.new_step(|printer| {
            let text = match func.as_str() {
                "sin" => "The derivative of sine is cosine:",
                _ => "The derivative of cosine is negative sine:",
            };
            printer.append(text);
            let display = printer.format_equation_display(&unevaluated(&rule.context, &rule.symbol), &answer(rule));
            printer.append(&display);
        }),
        DiffRuleKind::Exp { base } => printer.new_step(|printer| {
            if *base == SymExpr::e() {
                let text = format!("The derivative of {} is itself.", printer.format_math(&SymExpr::call1("exp", symbol.clone())));
                printer.append(&text);
            } else {
                let text = format!(
                    "The derivative of an exponential function {} is {}.",
                    printer.format_math(&rule.context),
                    printer.format_math(&answer(rule)),
                );
                printer.append(&text);
            }
        }),
        DiffRuleKind::Log => printer.new_step(|printer| {
            let text = format!(
                "The derivative of {} is {}.",
                printer.format_math(&rule.context),
                printer.format_math(&answer(rule)),
            );
            printer.append(&text);
        }),
        DiffRuleKind::Function { result, .. } => printer.new_step(|printer| {
            let text = format!(
                "The derivative of {} is {}.",
                printer.format_math(&rule.context),
                printer.format_math(result),
            );
            printer.append(&text);
        }),
        DiffRuleKind::Undefined => printer.new_step(|printer| {
            let text = format!(
                "{} is an undefined function, so its derivative is left as {}.",
                printer.format_math(&rule.context),
                printer.format_math(&unevaluated(&rule.context, &rule.symbol)),
            );
            printer.append(&text);
        }),
        DiffRuleKind::Rewrite { rewritten, substep } => printer.new_step(|printer| {
            printer.append("Rewrite the function to be differentiated:");
            let display = printer.format_equation_display(&rule.context, rewritten);
            printer.append(&display);
            print_rule(printer, substep);
        }),
        DiffRuleKind::DontKnow => printer.new_step(|printer| {
            printer.append("Don't know the steps in finding this derivative.");
            printer.append("But the derivative is");
            let display = printer.format_math_display(&answer(rule));
            printer.append(&display);
        }),
    }
}

/// Explains how to differentiate `function` with respect to `symbol`, as an HTML fragment that
/// ends with the simplified answer.
pub fn print_html_steps(function: &SymExpr, symbol: &str) -> String {
    let rule = diff_rule(function, symbol);
    let mut printer = HtmlPrinter::new();
    print_rule(&mut printer, &rule);

    let mut result = answer(&rule);
    let simplified = simplify(&result);
    if simplified != result {
        result = simplified;
        printer.new_step(|printer| {
            printer.append("Now simplify:");
            let display = printer.format_math_display(&result);
            printer.append(&display);
        });
    }
    tracing::debug!(%function, symbol, "printed derivative steps");
    printer.finish(&result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_rule_steps() {
        let x = SymExpr::symbol("x");
        let f = SymExpr::pow(SymExpr::call1("cos", x), SymExpr::integer(7));
        let html = print_html_steps(&f, "x");
        assert!(html.starts_with(r#"<ol id="changedisplaytonone">"#));
        assert!(html.contains("Let "));
        assert!(html.contains("Apply the power rule"));
        assert!(html.contains("The derivative of cosine is negative sine:"));
        assert!(html.contains("Then, apply the chain rule."));
        assert!(html.contains("The answer is:"));
        assert_eq!(html.matches("<li>").count(), html.matches("</li>").count());
    }

    #[test]
    fn constant_steps() {
        let html = print_html_steps(&SymExpr::integer(3), "x");
        assert!(html.contains("The derivative of the constant"));
    }
}
