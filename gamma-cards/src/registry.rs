//! Every result card, by id.

use crate::{
    card::{call_builtin, Card, Parameters, PreOutput},
    classify::Components,
    error::CardError,
    format::{
        escape_html,
        format_function_docs_input,
        format_integral,
        format_long_integer,
        format_nothing,
        format_satisfiable,
        format_steps,
        format_truth_table,
    },
};
use gamma_compute::{
    eval::{Evaluator, Value},
    symbolic::{minpoly::minpoly, steps, SymExpr},
};

/// The subject of a card as an expression.
fn subject(value: &Value) -> Result<SymExpr, CardError> {
    value
        .to_expr()
        .ok_or_else(|| CardError::value(format!("expected an expression, got '{}'", value.typename())))
}

/// The name of the main variable.
fn variable(components: &Components) -> Result<&str, CardError> {
    components
        .variable_name()
        .ok_or_else(|| CardError::value("no variable to work with"))
}

/// `integrate(integrand, *limits)`.
fn eval_integral(evaluator: &mut Evaluator, evaluated: &Value, components: &Components, _: &Parameters) -> Result<Value, CardError> {
    let integrand = components.integrand.clone().unwrap_or_else(|| evaluated.clone());
    let limits = match &components.limits {
        Some(limits) => limits.clone(),
        None => vec![Value::Expr(SymExpr::symbol(variable(components)?))],
    };
    call_builtin(evaluator, "integrate", std::iter::once(integrand).chain(limits).collect())
}

/// `manualintegrate(integrand, variable)`.
fn eval_integral_manual(evaluator: &mut Evaluator, evaluated: &Value, components: &Components, _: &Parameters) -> Result<Value, CardError> {
    let integrand = components.integrand.clone().unwrap_or_else(|| evaluated.clone());
    let variable = Value::Expr(SymExpr::symbol(variable(components)?));
    call_builtin(evaluator, "manualintegrate", vec![integrand, variable])
}

fn eval_diffsteps(_: &mut Evaluator, evaluated: &Value, components: &Components, _: &Parameters) -> Result<Value, CardError> {
    let function = subject(components.function.as_ref().unwrap_or(evaluated))?;
    Ok(Value::Str(steps::diff_steps(&function, variable(components)?)))
}

fn eval_intsteps(_: &mut Evaluator, evaluated: &Value, components: &Components, _: &Parameters) -> Result<Value, CardError> {
    let integrand = subject(components.integrand.as_ref().unwrap_or(evaluated))?;
    Ok(Value::Str(steps::int_steps(&integrand, variable(components)?)))
}

/// The variables of the expression with its truth table.
fn eval_truth_table(evaluator: &mut Evaluator, evaluated: &Value, _: &Components, _: &Parameters) -> Result<Value, CardError> {
    let expr = subject(evaluated)?;
    let variables = expr
        .free_symbols()
        .into_iter()
        .map(|name| Value::Expr(SymExpr::symbol(name)))
        .collect::<Vec<_>>();
    let rows = call_builtin(evaluator, "truth_table", vec![evaluated.clone(), Value::list(variables.clone())])?;
    Ok(Value::Tuple(vec![Value::list(variables), rows]))
}

/// The documentation of a function, as HTML paragraphs.
fn eval_function_docs(_: &mut Evaluator, evaluated: &Value, _: &Components, _: &Parameters) -> Result<Value, CardError> {
    let doc = evaluated.doc().unwrap_or_default();
    let paragraphs = doc
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| format!("<p>{}</p>", escape_html(paragraph)))
        .collect::<Vec<_>>();
    Ok(Value::Str(format!("<div class=\"document\">\n{}\n</div>", paragraphs.join("\n"))))
}

/// The minimal polynomial of the constant, in `x`.
fn eval_root_to_polynomial(_: &mut Evaluator, evaluated: &Value, _: &Components, _: &Parameters) -> Result<Value, CardError> {
    let expr = subject(evaluated)?;
    minpoly(&expr, "x")
        .map(Value::Expr)
        .ok_or_else(|| CardError::value(format!("no minimal polynomial is known for {}", expr)))
}

/// Names the kind of unevaluated expression being evaluated.
fn format_doit_title(title: &str, evaluated: &Value) -> String {
    match evaluated {
        Value::Expr(SymExpr::Sum(..)) => "Evaluated sum".to_string(),
        Value::Expr(SymExpr::Product(..)) => "Evaluated product".to_string(),
        _ => title.to_string(),
    }
}

const INTEGRAL: Card = Card {
    pre_output: PreOutput::Integral,
    ..Card::template("integral", "Integral", "integrate(%s, {_var})")
};

const INTEGRAL_FAKE: Card = Card {
    pre_output: PreOutput::Integral,
    format_input: Some(format_integral),
    ..Card::synthetic("integral_fake", "Integral", "integrate(%s, {_var})", eval_integral)
};

const INTEGRAL_MANUAL: Card = Card {
    pre_output: PreOutput::Integral,
    ..Card::template("integral_manual", "Integral", "manualintegrate(%s, {_var})")
};

const INTEGRAL_MANUAL_FAKE: Card = Card {
    pre_output: PreOutput::Integral,
    format_input: Some(format_integral),
    ..Card::synthetic("integral_manual_fake", "Integral", "manualintegrate(%s, {_var})", eval_integral_manual)
};

const DIFF: Card = Card {
    pre_output: PreOutput::Derivative,
    ..Card::template("diff", "Derivative", "diff(%s, {_var})")
};

const DIFFSTEPS: Card = Card {
    format_output: Some(format_steps),
    ..Card::synthetic("diffsteps", "Derivative Steps", "diff(%s, {_var})", eval_diffsteps)
};

const INTSTEPS: Card = Card {
    format_output: Some(format_steps),
    format_input: Some(format_integral),
    ..Card::synthetic("intsteps", "Integral Steps", "integrate(%s, {_var})", eval_intsteps)
};

const SATISFIABLE: Card = Card {
    multivariate: false,
    format_output: Some(format_satisfiable),
    ..Card::template("satisfiable", "Satisfiability", "satisfiable(%s)")
};

const TRUTH_TABLE: Card = Card {
    multivariate: false,
    format_output: Some(format_truth_table),
    ..Card::synthetic("truth_table", "Truth table", "%s", eval_truth_table)
};

const DOIT: Card = Card {
    format_title: Some(format_doit_title),
    ..Card::template("doit", "Evaluated", "(%s).doit()")
};

const FUNCTION_DOCS: Card = Card {
    multivariate: false,
    format_input: Some(format_function_docs_input),
    format_output: Some(format_nothing),
    ..Card::synthetic("function_docs", "Documentation", "help(%s)", eval_function_docs)
};

const ROOT_TO_POLYNOMIAL: Card = Card {
    multivariate: false,
    ..Card::synthetic("root_to_polynomial", "Polynomial with this root", "minpoly(%s, x)", eval_root_to_polynomial)
};

const APPROXIMATOR: Card = Card {
    multivariate: false,
    parameters: &[("digits", "15")],
    ..Card::template("approximator", "Approximation", "%s.evalf({digits})")
};

const DIGITS: Card = Card {
    multivariate: false,
    format_input: Some(format_long_integer),
    ..Card::template("digits", "Digits in base-10 expansion of number", "len(str(%s))")
};

const REWRITE_SIN: Card = Card::template("rewrite_sin", "Alternate form", "(%s).rewrite(sin)");
const REWRITE_COS: Card = Card::template("rewrite_cos", "Alternate form", "(%s).rewrite(cos)");
const REWRITE_TAN: Card = Card::template("rewrite_tan", "Alternate form", "(%s).rewrite(tan)");

const TRIG_ALTERNATE: Card = Card::composite(
    "trig_alternate",
    "Alternate forms",
    &[REWRITE_SIN, REWRITE_COS, REWRITE_TAN],
    false,
);

const INTEGRAL_ALTERNATE: Card = Card::composite(
    "integral_alternate",
    "Antiderivative forms",
    &[INTEGRAL, INTEGRAL_MANUAL],
    true,
);

const INTEGRAL_ALTERNATE_FAKE: Card = Card::composite(
    "integral_alternate_fake",
    "I don't know the steps but here is the answer",
    &[INTEGRAL_FAKE],
    true,
);

/// Every card that can be requested by id.
pub static CARDS: &[Card] = &[
    INTEGRAL,
    INTEGRAL_FAKE,
    INTEGRAL_MANUAL,
    INTEGRAL_MANUAL_FAKE,
    DIFF,
    DIFFSTEPS,
    INTSTEPS,
    SATISFIABLE,
    TRUTH_TABLE,
    DOIT,
    FUNCTION_DOCS,
    ROOT_TO_POLYNOMIAL,
    APPROXIMATOR,
    DIGITS,
    TRIG_ALTERNATE,
    INTEGRAL_ALTERNATE,
    INTEGRAL_ALTERNATE_FAKE,
];

/// Returns the card with the given id.
pub fn get(id: &str) -> Option<&'static Card> {
    CARDS.iter().find(|card| card.id == id)
}

#[cfg(test)]
mod tests {
    use crate::{card::CardResult, classify::RULES};
    use pretty_assertions::assert_eq;
    use super::*;

    fn eval(source: &str) -> Value {
        Evaluator::new().eval_value(source).unwrap().0.unwrap()
    }

    fn run(id: &str, evaluated: &Value, components: &Components) -> CardResult {
        let mut evaluator = Evaluator::new();
        evaluator.set("x", SymExpr::symbol("x"));
        get(id).unwrap().eval(&mut evaluator, evaluated, components, &Parameters::new()).unwrap()
    }

    fn in_x() -> Components {
        Components {
            variable: Some(SymExpr::symbol("x")),
            variables: vec![SymExpr::symbol("x")],
            ..Default::default()
        }
    }

    #[test]
    fn every_rule_card_exists() {
        for rule in RULES {
            for id in rule.cards.unwrap_or_default() {
                assert!(get(id).is_some(), "missing card {}", id);
            }
        }
        assert!(get("nope").is_none());
    }

    #[test]
    fn ids_are_unique() {
        for (i, card) in CARDS.iter().enumerate() {
            assert!(CARDS[i + 1..].iter().all(|other| other.id != card.id), "{}", card.id);
        }
    }

    #[test]
    fn derivative() {
        let result = run("diff", &eval("Symbol('x')**3"), &in_x());
        assert_eq!(result.to_string(), "3*x**2");
    }

    #[test]
    fn derivative_steps() {
        let result = run("diffsteps", &eval("Symbol('x')**3"), &in_x());
        let html = get("diffsteps").unwrap().format_output(&result, &|value: &Value| value.to_string());
        assert!(html.starts_with("<div class=\"steps\">"), "{}", html);
        assert!(html.len() > "<div class=\"steps\"></div>".len());
    }

    #[test]
    fn approximation() {
        let mut evaluator = Evaluator::new();
        let mut parameters = Parameters::new();
        parameters.insert("digits".to_string(), "5".to_string());
        let card = get("approximator").unwrap();
        let result = card.eval(&mut evaluator, &eval("pi"), &Components::default(), &parameters).unwrap();
        assert_eq!(result.to_string(), "3.1416");
        assert_eq!(card.format_input("pi", &Components::default(), &Parameters::new()).unwrap().as_deref(), Some("pi.evalf(15)"));
    }

    #[test]
    fn minimal_polynomial() {
        let result = run("root_to_polynomial", &eval("sqrt(2)"), &Components::default());
        assert_eq!(result.to_string(), "x**2 - 2");
    }

    #[test]
    fn sums() {
        let sum = eval("Sum(Symbol('k'), (Symbol('k'), Integer(1), Integer(10)))");
        assert_eq!(run("doit", &sum, &Components::default()).to_string(), "55");
        assert_eq!(get("doit").unwrap().format_title(&sum), "Evaluated sum");
    }

    #[test]
    fn documentation() {
        let factorint = eval("factorint");
        let components = Components { input_evaluated: Some(factorint.clone()), ..Default::default() };
        let card = get("function_docs").unwrap();
        let input = card.format_input("<function factorint>", &components, &Parameters::new()).unwrap();
        assert_eq!(input.as_deref(), Some("help(factorint)"));

        let result = run("function_docs", &factorint, &components);
        let html = card.format_output(&result, &|value: &Value| value.to_string());
        assert!(html.starts_with("<div class=\"document\">\n<p>factorint"), "{}", html);
    }

    #[test]
    fn truth_table() {
        let result = run("truth_table", &eval("Symbol('x') & Symbol('y')"), &Components::default());
        let html = get("truth_table").unwrap().format_output(&result, &|value: &Value| value.to_string());
        assert!(html.contains("<th>x</th>\n<th>y</th>\n<th>Value</th>"), "{}", html);
        assert_eq!(html.lines().filter(|line| *line == "<tr>").count(), 4);
    }

    #[test]
    fn trig_rewrites() {
        let result = run("trig_alternate", &eval("tan(Symbol('x'))"), &in_x());
        let values = result.values();
        assert!(!values.is_empty());
        for (i, value) in values.iter().enumerate() {
            assert!(values[i + 1..].iter().all(|other| other != value));
        }
    }

    #[test]
    fn integral_input() {
        let components = Components {
            variable: Some(SymExpr::symbol("z")),
            variables: vec![SymExpr::symbol("z")],
            integrand: Some(eval("1/Symbol('z')")),
            limits: Some(vec![eval("Symbol('z')")]),
            ..Default::default()
        };
        let input = get("intsteps").unwrap().format_input("1/z", &components, &Parameters::new()).unwrap();
        assert_eq!(input.as_deref(), Some("integrate(1/z, z)"));
    }
}
