//! Deciding which cards an input gets.
//!
//! The decision is a scan over a fixed table of [`Rule`]s. A rule matches either by the name of
//! the top-level function (only when that function was applied to arguments) or by a test on the
//! evaluated input. Matching rules contribute their card ids in order, skipping ids already
//! collected, until a rule with no card list stops the scan.

use crate::{arguments::Arguments, error::CardError};
use gamma_compute::{
    eval::{BuiltinKind, Evaluator, Value},
    symbolic::{expr::Constant, SymExpr},
};
use std::collections::BTreeSet;
use tracing::debug;

/// Lowercase builtins that are still treated like mathematical functions rather than commands.
pub const OTHER_FUNCTIONS: &[&str] = &["sqrt"];

/// The pieces of the input that cards are built from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Components {
    /// The main variable, if there is one.
    pub variable: Option<SymExpr>,

    /// Every variable, the main one first.
    pub variables: Vec<SymExpr>,

    /// The integrand of an `integrate` call.
    pub integrand: Option<Value>,

    /// The limits of an `integrate` call, as given.
    pub limits: Option<Vec<Value>>,

    /// The function of a `diff` call.
    pub function: Option<Value>,

    /// Replaces the evaluated input for everything after classification.
    pub input_evaluated: Option<Value>,
}

impl Components {
    /// The representation of the main variable, `None` if there is none.
    pub fn variable_repr(&self) -> String {
        self.variable
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "None".to_string())
    }

    /// The name of the main variable.
    pub fn variable_name(&self) -> Option<&str> {
        self.variable.as_ref().and_then(SymExpr::as_symbol)
    }

    /// The components as named template values.
    pub fn to_parameters(&self) -> Vec<(&'static str, String)> {
        let list = |items: &[String]| format!("[{}]", items.join(", "));
        let mut out = vec![
            ("variable", self.variable_repr()),
            ("variables", list(&self.variables.iter().map(ToString::to_string).collect::<Vec<_>>())),
        ];
        if let Some(integrand) = &self.integrand {
            out.push(("integrand", integrand.to_string()));
        }
        if let Some(limits) = &self.limits {
            out.push(("limits", list(&limits.iter().map(ToString::to_string).collect::<Vec<_>>())));
        }
        if let Some(function) = &self.function {
            out.push(("function", function.to_string()));
        }
        if let Some(input_evaluated) = &self.input_evaluated {
            out.push(("input_evaluated", input_evaluated.to_string()));
        }
        out
    }
}

/// Turns the arguments and evaluated input into [`Components`].
pub type Extractor = fn(&Arguments, &Value) -> Result<Components, CardError>;

/// Every symbol in the expression, including those bound by derivatives, integrals, sums and
/// products, sorted by name.
pub fn atoms(expr: &SymExpr) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for node in expr.post_order_iter() {
        match node {
            SymExpr::Derivative(_, vars) => out.extend(vars.iter().cloned()),
            SymExpr::Integral(_, limits) => out.extend(limits.iter().map(|limit| limit.var.clone())),
            SymExpr::Sum(_, limit) | SymExpr::Product(_, limit) => {
                out.insert(limit.var.clone());
            },
            _ => {
                if let Some(name) = node.as_symbol() {
                    out.insert(name.to_string());
                }
            },
        }
    }
    out
}

/// The symbols of a value; nothing if it is not an expression.
fn value_atoms(value: &Value) -> Vec<SymExpr> {
    value
        .as_expr()
        .map(|expr| atoms(expr).into_iter().map(SymExpr::symbol).collect())
        .unwrap_or_default()
}

/// Every symbol of the evaluated input, the first one being the main variable.
pub fn default_variable(_: &Arguments, evaluated: &Value) -> Result<Components, CardError> {
    let variables = value_atoms(evaluated);
    Ok(Components {
        variable: variables.first().cloned(),
        variables,
        input_evaluated: Some(evaluated.clone()),
        ..Default::default()
    })
}

/// Like [`default_variable`], but the subject is the first argument instead of the result.
pub fn extract_first(arguments: &Arguments, evaluated: &Value) -> Result<Components, CardError> {
    let mut components = default_variable(arguments, evaluated)?;
    components.input_evaluated = arguments.positional().first().cloned();
    Ok(components)
}

/// The integrand and limits of `integrate(f, ...)`. Without limits, the integrand's first symbol
/// is the variable.
pub fn extract_integral(arguments: &Arguments, _: &Value) -> Result<Components, CardError> {
    let (integrand, limits) = arguments
        .positional()
        .split_first()
        .ok_or_else(|| CardError::value("integrate() needs an expression to integrate"))?;

    let (variables, limits) = if limits.is_empty() {
        let first = value_atoms(integrand)
            .into_iter()
            .next()
            .ok_or_else(|| CardError::value(format!("cannot tell which variable to integrate {} by", integrand)))?;
        (vec![first.clone()], vec![Value::Expr(first)])
    } else {
        let variables = limits
            .iter()
            .map(|limit| {
                let var = match limit {
                    Value::Tuple(items) => items.first(),
                    other => Some(other),
                };
                var.and_then(Value::to_expr)
                    .ok_or_else(|| CardError::value(format!("invalid limits: {}", limit)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        (variables, limits.to_vec())
    };

    Ok(Components {
        variable: variables.first().cloned(),
        variables,
        integrand: Some(integrand.clone()),
        limits: Some(limits),
        input_evaluated: Some(integrand.clone()),
        ..Default::default()
    })
}

/// The function and variables of `diff(f, ...)`. The variable given first, if any, is the main
/// one.
pub fn extract_derivative(arguments: &Arguments, _: &Value) -> Result<Components, CardError> {
    let (function, rest) = arguments
        .positional()
        .split_first()
        .ok_or_else(|| CardError::value("diff() needs an expression to differentiate"))?;

    let mut variables = value_atoms(function);
    if let Some(variable) = rest.first().and_then(Value::to_expr) {
        variables.retain(|var| var != &variable);
        variables.insert(0, variable);
    }

    Ok(Components {
        variable: variables.first().cloned(),
        variables,
        function: Some(function.clone()),
        input_evaluated: Some(function.clone()),
        ..Default::default()
    })
}

/// Returns true for expressions with no free symbols.
pub fn is_constant(value: &Value) -> bool {
    value.as_expr().map_or(false, SymExpr::is_constant)
}

/// Returns true for integers.
pub fn is_integer(value: &Value) -> bool {
    value.as_expr().map_or(false, SymExpr::is_integer)
}

/// Constants worth approximating: no free symbols, not already a plain number, finite, and not a
/// truth value.
pub fn is_approximatable_constant(value: &Value) -> bool {
    let Some(expr) = value.as_expr() else {
        return false;
    };
    let undefined = expr.contains(&|node| {
        matches!(node.as_constant(), Some(c) if c.is_infinite() || c == Constant::NaN)
    });
    expr.is_constant()
        && !expr.is_integer()
        && !expr.is_float()
        && !undefined
        && !expr.is_boolean_valued()
}

/// Returns true for expressions containing a trigonometric function.
pub fn is_trig(value: &Value) -> bool {
    const TRIG: &[&str] = &["sin", "cos", "tan", "csc", "sec", "cot"];
    value.as_expr().map_or(false, |expr| TRIG.iter().any(|name| expr.has_function(name)))
}

/// Returns true for functions that were named but not called.
pub fn is_uncalled_function(value: &Value) -> bool {
    value.is_callable()
}

/// Returns true for `And`, `Or`, `Not` and `Xor`.
pub fn is_logic(value: &Value) -> bool {
    value.as_expr().map_or(false, SymExpr::is_logic)
}

pub fn is_sum(value: &Value) -> bool {
    matches!(value, Value::Expr(SymExpr::Sum(..)))
}

pub fn is_product(value: &Value) -> bool {
    matches!(value, Value::Expr(SymExpr::Product(..)))
}

/// Returns true for expressions with free symbols that are not logic.
pub fn is_not_constant_basic(value: &Value) -> bool {
    matches!(value, Value::Expr(expr) if !expr.is_constant() && !expr.is_logic())
}

/// What a [`Rule`] matches.
#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// The top-level function, when it was applied.
    Name(&'static str),

    /// A test on the evaluated input.
    Test(fn(&Value) -> bool),

    /// A test on the evaluated input, skipped once a [`Predicate::Name`] rule has matched. The
    /// value of a call such as `diff` is not the subject of its cards.
    TestUnlessNamed(fn(&Value) -> bool),
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub predicate: Predicate,

    /// Replaces [`default_variable`] when the rule matches.
    pub extract: Option<Extractor>,

    /// The cards the rule adds. [`None`] stops the scan.
    pub cards: Option<&'static [&'static str]>,
}

const fn name(name: &'static str, extract: Option<Extractor>, cards: Option<&'static [&'static str]>) -> Rule {
    Rule { predicate: Predicate::Name(name), extract, cards }
}

const fn test(test: fn(&Value) -> bool, cards: Option<&'static [&'static str]>) -> Rule {
    Rule { predicate: Predicate::Test(test), extract: None, cards }
}

const fn test_unless_named(test: fn(&Value) -> bool, cards: Option<&'static [&'static str]>) -> Rule {
    Rule { predicate: Predicate::TestUnlessNamed(test), extract: None, cards }
}

/// The rule table, scanned in order.
pub static RULES: &[Rule] = &[
    name("integrate", Some(extract_integral), Some(&["integral_alternate_fake", "intsteps"])),
    name("diff", Some(extract_derivative), Some(&["diff", "diffsteps"])),
    name("help", Some(extract_first), Some(&["function_docs"])),
    name("rsolve", None, None),
    name("product", None, Some(&[])),
    test_unless_named(is_integer, Some(&["digits"])),
    test(is_approximatable_constant, Some(&["root_to_polynomial", "approximator"])),
    test(is_uncalled_function, Some(&["function_docs"])),
    test(is_trig, Some(&["trig_alternate"])),
    test(is_logic, Some(&["satisfiable", "truth_table"])),
    test(is_sum, Some(&["doit"])),
    test(is_product, Some(&["doit"])),
    test(is_sum, None),
    test(is_product, None),
    test(is_not_constant_basic, Some(&["diff", "integral_alternate"])),
];

/// Returns true if some rule gives cards for calls to the named function, so its result does not
/// need a card of its own.
pub fn is_function_handled(function: &str) -> bool {
    function == "simplify"
        || RULES.iter().any(|rule| {
            matches!(rule.predicate, Predicate::Name(name) if name == function) && rule.cards.is_some()
        })
}

/// Scans the rule table. `function` is the top-level function if it was applied. Returns the
/// extractor to use and the card ids, in order and without repeats.
pub fn find_result_set(function: Option<&str>, evaluated: &Value) -> (Extractor, Vec<&'static str>) {
    let mut extract: Extractor = default_variable;
    let mut cards = Vec::new();
    let mut named = false;

    for rule in RULES {
        let matched = match rule.predicate {
            Predicate::Name(name) => function == Some(name),
            Predicate::Test(test) => test(evaluated),
            Predicate::TestUnlessNamed(test) => !named && test(evaluated),
        };
        if !matched {
            continue;
        }
        named |= matches!(rule.predicate, Predicate::Name(_));
        if let Some(rule_extract) = rule.extract {
            extract = rule_extract;
        }
        let Some(rule_cards) = rule.cards else {
            break;
        };
        for card in rule_cards {
            if !cards.contains(card) {
                cards.push(*card);
            }
        }
    }
    (extract, cards)
}

/// The outcome of classifying an input.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub components: Components,

    /// The ids of the cards to show.
    pub cards: Vec<&'static str>,

    /// The subject of the cards: the evaluated input, or what the extractor replaced it with.
    pub evaluated: Value,

    /// True if the input is a command-like function applied to arguments, such as
    /// `factorint(12)`, rather than a mathematical expression.
    pub is_function: bool,
}

/// Returns true if the name is bound to a command-like function: a routine, class or user
/// function whose name starts with a lowercase letter.
pub fn is_function(name: &str, evaluator: &Evaluator) -> bool {
    let callable = match evaluator.get(name) {
        Some(Value::Builtin(builtin)) => builtin.kind != BuiltinKind::MathFunction,
        Some(Value::Function(_)) => true,
        _ => false,
    };
    callable
        && name.chars().next().map_or(false, char::is_lowercase)
        && !OTHER_FUNCTIONS.contains(&name)
}

/// Classifies the input.
pub fn classify(arguments: &Arguments, evaluator: &Evaluator, evaluated: Value) -> Result<Classification, CardError> {
    let applied = arguments.is_applied();
    let is_function = arguments.function().map_or(false, |name| is_function(name, evaluator));

    let (extract, cards) = find_result_set(arguments.function().filter(|_| applied), &evaluated);
    let components = extract(arguments, &evaluated)?;
    let evaluated = components.input_evaluated.clone().unwrap_or(evaluated);

    debug!(
        function = arguments.function(),
        applied,
        is_function,
        cards = ?cards,
        variable = %components.variable_repr(),
        "classified input",
    );
    Ok(Classification { components, cards, evaluated, is_function: is_function && applied })
}

#[cfg(test)]
mod tests {
    use gamma_compute::eval::builtins;
    use pretty_assertions::assert_eq;
    use super::*;

    fn eval(source: &str) -> Value {
        Evaluator::new().eval_value(source).unwrap().0.unwrap()
    }

    fn cards(function: Option<&str>, source: &str) -> Vec<&'static str> {
        find_result_set(function, &eval(source)).1
    }

    #[test]
    fn predicates() {
        assert!(is_approximatable_constant(&eval("pi")));
        assert!(is_approximatable_constant(&eval("sqrt(2)")));
        assert!(!is_approximatable_constant(&eval("Integer(2)")));
        assert!(!is_approximatable_constant(&eval("oo")));
        assert!(!is_approximatable_constant(&eval("Symbol('x')")));
        assert!(is_trig(&eval("sin(Symbol('x')) + 1")));
        assert!(is_logic(&eval("Symbol('x') & Symbol('y')")));
        assert!(is_uncalled_function(&eval("factorint")));
        assert!(is_not_constant_basic(&eval("Symbol('x')**2")));
        assert!(!is_not_constant_basic(&eval("Symbol('x') | Symbol('y')")));
    }

    #[test]
    fn card_lists() {
        assert_eq!(cards(Some("diff"), "Symbol('x')"), vec!["diff", "diffsteps", "integral_alternate"]);
        assert_eq!(cards(None, "sin(Symbol('x'))"), vec!["trig_alternate", "diff", "integral_alternate"]);
        assert_eq!(cards(None, "pi"), vec!["root_to_polynomial", "approximator"]);
        assert_eq!(cards(None, "Symbol('x') & Symbol('y')"), vec!["satisfiable", "truth_table"]);
        assert_eq!(cards(None, "Integer(12)"), vec!["digits"]);
    }

    #[test]
    fn integer_derivatives_have_no_digits_card() {
        assert_eq!(cards(Some("diff"), "Integer(2)"), vec!["diff", "diffsteps"]);
        assert_eq!(cards(Some("integrate"), "Integer(2)"), vec!["integral_alternate_fake", "intsteps"]);
        assert_eq!(cards(Some("factorial"), "Integer(6)"), vec!["digits"]);
    }

    #[test]
    fn null_card_list_stops_the_scan() {
        assert_eq!(cards(Some("rsolve"), "Symbol('x')"), Vec::<&str>::new());
        let sum = "Sum(Symbol('k'), (Symbol('k'), Integer(1), Symbol('n')))";
        assert_eq!(cards(None, sum), vec!["doit"]);
    }

    #[test]
    fn deterministic() {
        let value = eval("cos(Symbol('x'))**7");
        let (first_extract, first) = find_result_set(Some("diff"), &value);
        let (second_extract, second) = find_result_set(Some("diff"), &value);
        assert_eq!(first, second);
        assert_eq!(first_extract as usize, second_extract as usize);
    }

    #[test]
    fn handled_functions() {
        assert!(is_function_handled("integrate"));
        assert!(is_function_handled("product"));
        assert!(is_function_handled("simplify"));
        assert!(!is_function_handled("rsolve"));
        assert!(!is_function_handled("factorint"));
    }

    #[test]
    fn command_like_functions() {
        let evaluator = Evaluator::new();
        assert!(is_function("factorint", &evaluator));
        assert!(is_function("diff", &evaluator));
        assert!(!is_function("sin", &evaluator));
        assert!(!is_function("sqrt", &evaluator));
        assert!(!is_function("Symbol", &evaluator));
        assert!(!is_function("nothing", &evaluator));
        assert!(builtins::get("factorint").is_some());
    }

    #[test]
    fn derivative_components() {
        let arguments = Arguments {
            function: Some("diff".to_string()),
            args: Some(vec![eval("Symbol('y')*Symbol('x')"), eval("Symbol('y')")]),
            kwargs: None,
        };
        let components = extract_derivative(&arguments, &Value::None).unwrap();
        let names = components.variables.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(names, vec!["y", "x"]);
        assert_eq!(components.variable_name(), Some("y"));
    }

    #[test]
    fn integral_components() {
        let limit = Value::Tuple(vec![eval("Symbol('t')"), eval("Integer(0)"), eval("Integer(1)")]);
        let arguments = Arguments {
            function: Some("integrate".to_string()),
            args: Some(vec![eval("Symbol('t')**2"), limit.clone()]),
            kwargs: None,
        };
        let components = extract_integral(&arguments, &Value::None).unwrap();
        assert_eq!(components.variable_name(), Some("t"));
        assert_eq!(components.limits, Some(vec![limit]));

        let arguments = Arguments {
            function: Some("integrate".to_string()),
            args: Some(vec![eval("Integer(3)")]),
            kwargs: None,
        };
        assert!(matches!(extract_integral(&arguments, &Value::None), Err(CardError::Value(_))));
    }
}
