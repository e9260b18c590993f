//! Result cards and how they are evaluated.

use crate::{
    classify::Components,
    error::CardError,
    format::{Formatter, InputFormatter, OutputFormatter},
};
use gamma_compute::{
    eval::{builtins, EvalOutput, Evaluator, Value},
    symbolic::SymExpr,
};
use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter as FmtFormatter},
};
use tracing::trace;

/// Parameters of a card, by name.
pub type Parameters = BTreeMap<String, String>;

/// Evaluates a card without going through its statement. Receives the evaluated input, its
/// components and the card's parameters.
pub type EvalFn = fn(&mut Evaluator, &Value, &Components, &Parameters) -> Result<Value, CardError>;

/// Formats the title of a card given the evaluated input.
pub type TitleFormatter = fn(&str, &Value) -> String;

/// The expression a card shows before it is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreOutput {
    /// Nothing.
    Nothing,

    /// The unevaluated integral of the input.
    Integral,

    /// The unevaluated derivative of the input.
    Derivative,
}

/// How a card computes its result.
#[derive(Debug, Clone, Copy)]
pub enum CardKind {
    /// Evaluate the statement, with the input and parameters filled in.
    Template,

    /// Call a function instead.
    Synthetic(EvalFn),

    /// Evaluate every card in the list and keep the distinct results.
    Composite {
        cards: &'static [Card],

        /// Add a "with constant = C" note after each result.
        constant_note: bool,
    },
}

/// A result card.
#[derive(Debug, Clone, Copy)]
pub struct Card {
    /// The id the card is registered under.
    pub id: &'static str,

    pub title: &'static str,

    /// The statement evaluated for the result. `%s` stands for the input and `{name}` for a
    /// parameter, a component, or `_var`, the main variable.
    pub statement: &'static str,

    pub pre_output: PreOutput,
    pub kind: CardKind,

    /// The names and default values of the parameters the user can set.
    pub parameters: &'static [(&'static str, &'static str)],

    pub format_input: Option<InputFormatter>,
    pub format_output: Option<OutputFormatter>,
    pub format_title: Option<TitleFormatter>,

    /// Whether the result depends on which variable is picked.
    pub multivariate: bool,
}

impl Card {
    /// A template card with no overrides.
    pub const fn template(id: &'static str, title: &'static str, statement: &'static str) -> Self {
        Self {
            id,
            title,
            statement,
            pre_output: PreOutput::Nothing,
            kind: CardKind::Template,
            parameters: &[],
            format_input: None,
            format_output: None,
            format_title: None,
            multivariate: true,
        }
    }

    /// A synthetic card. The statement is only shown, never evaluated.
    pub const fn synthetic(id: &'static str, title: &'static str, statement: &'static str, eval: EvalFn) -> Self {
        Self { kind: CardKind::Synthetic(eval), ..Self::template(id, title, statement) }
    }

    /// A composite card over the given cards.
    pub const fn composite(id: &'static str, title: &'static str, cards: &'static [Card], constant_note: bool) -> Self {
        Self { kind: CardKind::Composite { cards, constant_note }, ..Self::template(id, title, "") }
    }

    /// The names of the card's parameters.
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.iter().map(|(name, _)| name.to_string()).collect()
    }

    pub fn is_multivariate(&self) -> bool {
        self.multivariate
    }

    /// Merges the defaults, the given parameters and the components, later ones winning.
    fn merged_parameters(&self, components: &Components, parameters: &Parameters) -> Parameters {
        let mut merged = self.parameters
            .iter()
            .map(|(name, default)| (name.to_string(), default.to_string()))
            .collect::<Parameters>();
        merged.extend(parameters.iter().map(|(name, value)| (name.clone(), value.clone())));
        merged.extend(components.to_parameters().into_iter().map(|(name, value)| (name.to_string(), value)));
        merged.insert("_var".to_string(), components.variable_repr());
        merged
    }

    /// Fills the `{name}` slots of the statement.
    fn fill(&self, parameters: &Parameters) -> Result<String, CardError> {
        let mut out = String::with_capacity(self.statement.len());
        let mut rest = self.statement;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let end = rest[start..]
                .find('}')
                .map(|end| start + end)
                .ok_or_else(|| CardError::value(format!("unclosed slot in '{}'", self.statement)))?;
            let name = &rest[start + 1..end];
            let value = parameters
                .get(name)
                .ok_or_else(|| CardError::value(format!("card '{}' needs the parameter '{}'", self.id, name)))?;
            out.push_str(value);
            rest = &rest[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// The statement with everything filled in, with `%s` replaced by `input`.
    fn statement_for(&self, input: &str, components: &Components, parameters: &Parameters) -> Result<String, CardError> {
        let filled = self.fill(&self.merged_parameters(components, parameters))?;
        Ok(filled.replace("%s", input))
    }

    /// Computes the result of the card for the evaluated input.
    ///
    /// Template cards evaluate their statement with the input bound to `input_evaluated`. Any
    /// error during that evaluation gives [`Value::None`] rather than an error.
    pub fn eval(
        &self,
        evaluator: &mut Evaluator,
        evaluated: &Value,
        components: &Components,
        parameters: &Parameters,
    ) -> Result<CardResult, CardError> {
        match self.kind {
            CardKind::Template => {
                let line = self.statement_for("input_evaluated", components, parameters)?;
                trace!(card = self.id, line = %line, "evaluating card");
                evaluator.set("input_evaluated", evaluated.clone());
                let value = match evaluator.eval(&line, true, false) {
                    Some(EvalOutput::Value(value)) => value,
                    _ => Value::None,
                };
                Ok(CardResult::Value(value))
            },
            CardKind::Synthetic(eval) => eval(evaluator, evaluated, components, parameters).map(CardResult::Value),
            CardKind::Composite { cards, .. } => {
                let mut results: Vec<(&'static Card, Value)> = Vec::new();
                for card in cards {
                    let value = match card.eval(evaluator, evaluated, components, parameters) {
                        Ok(CardResult::Value(value)) => value,
                        Ok(_) => continue,
                        Err(CardError::Value(reason)) => {
                            trace!(card = card.id, reason = %reason, "skipping card");
                            continue;
                        },
                        Err(err) => return Err(err),
                    };
                    if value != Value::None && !results.iter().any(|(_, seen)| seen == &value) {
                        results.push((card, value));
                    }
                }
                if results.is_empty() {
                    return Ok(CardResult::Nothing);
                }
                Ok(CardResult::Many {
                    results,
                    input_repr: evaluated.to_string(),
                    components: components.clone(),
                })
            },
        }
    }

    /// The statement shown as the card's input. Composite cards show none.
    pub fn format_input(&self, input_repr: &str, components: &Components, parameters: &Parameters) -> Result<Option<String>, CardError> {
        if let CardKind::Composite { .. } = self.kind {
            return Ok(None);
        }
        if let Some(format) = self.format_input {
            return Ok(Some(format(self.statement, input_repr, components)));
        }
        self.statement_for(input_repr, components, parameters).map(Some)
    }

    /// Formats the result of the card.
    pub fn format_output(&self, result: &CardResult, formatter: Formatter<'_>) -> String {
        match result {
            CardResult::Value(value) => match self.format_output {
                Some(format) => format(value, formatter),
                None => formatter(value),
            },
            CardResult::Many { results, input_repr, components } => {
                let constant_note = matches!(self.kind, CardKind::Composite { constant_note: true, .. });
                let mut html = vec!["<ul>".to_string()];
                for (card, value) in results {
                    html.push("<li id=\"changedisplaytonone2\">".to_string());
                    html.push("<div class=\"cell_input\">".to_string());
                    let input = card
                        .format_input(input_repr, components, &Parameters::new())
                        .ok()
                        .flatten()
                        .unwrap_or_default();
                    html.push(input);
                    html.push("</div>".to_string());
                    html.push(card.format_output(&CardResult::Value(value.clone()), formatter));
                    if constant_note {
                        html.push("<script type=\"math/tex; mode=display\"> \\mathrm{with\\;constant = C}</script>".to_string());
                    }
                    html.push("</li>".to_string());
                }
                html.push("</ul>".to_string());
                html.join(" ")
            },
            CardResult::Nothing => "None".to_string(),
        }
    }

    /// The title of the card for the evaluated input.
    pub fn format_title(&self, evaluated: &Value) -> String {
        match self.format_title {
            Some(format) => format(self.title, evaluated),
            None => self.title.to_string(),
        }
    }

    /// The LaTeX of the expression shown before the card is evaluated.
    pub fn pre_output(&self, evaluator: &mut Evaluator, evaluated: &Value, variable: Option<&SymExpr>) -> Result<String, CardError> {
        let class = match self.pre_output {
            PreOutput::Nothing => return Ok(String::new()),
            PreOutput::Integral => "Integral",
            PreOutput::Derivative => "Derivative",
        };
        let variable = variable
            .cloned()
            .ok_or_else(|| CardError::value(format!("{} needs a variable", class)))?;
        let value = call_builtin(evaluator, class, vec![evaluated.clone(), Value::Expr(variable)])?;
        Ok(value.latex())
    }
}

/// Calls a builtin by name, turning its errors into value errors.
pub fn call_builtin(evaluator: &mut Evaluator, name: &str, positional: Vec<Value>) -> Result<Value, CardError> {
    let builtin = builtins::get(name)
        .ok_or_else(|| CardError::value(format!("{}() is not available", name)))?;
    builtin
        .call(evaluator.ctxt_mut(), positional, Vec::new())
        .map_err(|err| CardError::Value(err.into_error(0..0).message()))
}

/// The result of evaluating a card.
#[derive(Debug, Clone)]
pub enum CardResult {
    /// A single value.
    Value(Value),

    /// The distinct results of the cards of a composite card, with what is needed to show the
    /// input of each.
    Many {
        results: Vec<(&'static Card, Value)>,
        input_repr: String,
        components: Components,
    },

    /// A composite card none of whose cards produced anything.
    Nothing,
}

impl CardResult {
    /// The values of the result.
    pub fn values(&self) -> Vec<&Value> {
        match self {
            CardResult::Value(value) => vec![value],
            CardResult::Many { results, .. } => results.iter().map(|(_, value)| value).collect(),
            CardResult::Nothing => Vec::new(),
        }
    }
}

/// Formats the result the way its representation is reported to callers.
impl Display for CardResult {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> fmt::Result {
        match self {
            CardResult::Value(value) => write!(f, "{}", value),
            CardResult::Many { results, .. } => {
                let items = results
                    .iter()
                    .map(|(card, value)| format!("(<ResultCard '{}'>, {})", card.title, value))
                    .collect::<Vec<_>>();
                write!(f, "[{}]", items.join(", "))
            },
            CardResult::Nothing => f.write_str("'None'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    static SQUARE: Card = Card::template("square", "Square", "(%s)**{power}");
    const TWICE: Card = Card::template("twice", "Twice", "%s + %s");
    const DOUBLED: Card = Card::template("doubled", "Doubled", "2*%s");
    const FAILS: Card = Card::synthetic("fails", "Fails", "", |_, _, _, _| Err(CardError::value("no")));
    static BOTH: Card = Card::composite("both", "Both", &[TWICE, FAILS, DOUBLED], false);

    fn x() -> Value {
        Value::Expr(SymExpr::symbol("x"))
    }

    fn components() -> Components {
        Components {
            variable: Some(SymExpr::symbol("x")),
            variables: vec![SymExpr::symbol("x")],
            ..Default::default()
        }
    }

    #[test]
    fn template_substitution() {
        let mut parameters = Parameters::new();
        parameters.insert("power".to_string(), "3".to_string());
        let input = SQUARE.format_input("x", &components(), &parameters).unwrap();
        assert_eq!(input.as_deref(), Some("(x)**3"));

        let result = SQUARE.eval(&mut Evaluator::new(), &x(), &components(), &parameters).unwrap();
        assert_eq!(result.to_string(), "x**3");
    }

    #[test]
    fn missing_parameter() {
        let err = SQUARE.eval(&mut Evaluator::new(), &x(), &components(), &Parameters::new()).unwrap_err();
        assert!(matches!(err, CardError::Value(_)));
    }

    #[test]
    fn failing_statement_gives_none() {
        static BROKEN: Card = Card::template("broken", "Broken", "undefined_thing(%s)");
        let result = BROKEN.eval(&mut Evaluator::new(), &x(), &components(), &Parameters::new()).unwrap();
        assert_eq!(result.values(), vec![&Value::None]);
    }

    #[test]
    fn composite_keeps_distinct_results() {
        let result = BOTH.eval(&mut Evaluator::new(), &x(), &components(), &Parameters::new()).unwrap();
        assert_eq!(result.to_string(), "[(<ResultCard 'Twice'>, 2*x)]");
        assert_eq!(BOTH.format_input("x", &components(), &Parameters::new()).unwrap(), None);

        let html = BOTH.format_output(&result, &|value: &Value| value.to_string());
        assert_eq!(
            html,
            "<ul> <li id=\"changedisplaytonone2\"> <div class=\"cell_input\"> x + x </div> 2*x </li> </ul>",
        );
    }

    #[test]
    fn composite_without_results() {
        static NOTHING: Card = Card::composite("nothing", "Nothing", &[FAILS], true);
        let result = NOTHING.eval(&mut Evaluator::new(), &x(), &components(), &Parameters::new()).unwrap();
        assert!(matches!(result, CardResult::Nothing));
        assert_eq!(NOTHING.format_output(&result, &|value: &Value| value.to_string()), "None");
    }

    #[test]
    fn pre_output() {
        static INTEGRAL: Card = Card { pre_output: PreOutput::Integral, ..Card::template("i", "I", "") };
        let x_squared = Value::Expr(SymExpr::symbol("x") * SymExpr::symbol("x"));
        let latex = INTEGRAL.pre_output(&mut Evaluator::new(), &x_squared, Some(&SymExpr::symbol("x"))).unwrap();
        assert_eq!(latex, "\\int x^{2}\\, dx");
        assert!(INTEGRAL.pre_output(&mut Evaluator::new(), &x_squared, None).is_err());
    }
}
