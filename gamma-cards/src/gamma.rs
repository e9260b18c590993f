use crate::{
    arguments::Arguments,
    card::{Card, Parameters},
    classify::{classify, is_function_handled, Classification},
    config::Config,
    error::CardError,
    format::{format_by_type, make_latex_readable},
    latex::latexify,
    record::{CardInfo, CardOutput, CardRecord},
    registry,
};
use gamma_compute::{
    eval::{Evaluator, Value},
    symbolic::SymExpr,
};
use gamma_error::{Category, Error};
use gamma_parser::{
    parser::{ast::Expr, error::SyntaxErrorInfo, parse_expr},
    transform::{remove_constructors, stringify},
};
use tracing::{debug, warn};

/// An evaluated input, with its own evaluator.
struct Request {
    evaluator: Evaluator,

    /// The canonical source the input was transformed into.
    parsed: String,

    expr: Expr,
    arguments: Arguments,
    evaluated: Value,
}

/// Turns user input into result cards.
///
/// Each call works with a fresh evaluator, so a `Gamma` can serve any number of requests.
#[derive(Debug, Clone, Default)]
pub struct Gamma {
    config: Config,
}

impl Gamma {
    /// Creates a `Gamma` with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration of this `Gamma`.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Renders values for display, with the configured number of digits in approximations.
    fn formatter(&self) -> impl Fn(&Value) -> String {
        let digits = self.config.digits;
        move |value: &Value| make_latex_readable(value, digits)
    }

    /// Transforms, parses and evaluates the input.
    fn evaluate_input(&self, input: &str) -> Result<Request, CardError> {
        let mut evaluator = Evaluator::with_limits(self.config.limits);
        let parsed = stringify(input, &evaluator).map_err(|err| {
            debug!(error = %err.message(), "input could not be transformed");
            CardError::Token
        })?;
        debug!(parsed = %parsed, "transformed input");

        let expr = parse_expr(&parsed)
            .map_err(|err| CardError::Syntax(SyntaxErrorInfo::new(&err, &parsed)))?;
        let evaluated = evaluator
            .eval_node(&expr)
            .map_err(|err| input_error(&err, &parsed))?;
        let arguments = Arguments::extract(&expr, &mut evaluator)
            .map_err(|err| CardError::internal(&err, self.config.trace_cap))?
            .ok_or_else(|| CardError::value("Can't handle the input."))?;

        Ok(Request { evaluator, parsed, expr, arguments, evaluated })
    }

    /// Evaluates the input and classifies it.
    fn classify(&self, input: &str) -> Result<(Request, Classification), CardError> {
        let request = self.evaluate_input(input)?;
        let classification = classify(&request.arguments, &request.evaluator, request.evaluated.clone())?;
        Ok((request, classification))
    }

    /// Describes a card for the classified input.
    fn describe(
        card: &Card,
        evaluator: &mut Evaluator,
        classification: &Classification,
    ) -> Result<CardInfo, CardError> {
        let Classification { components, evaluated, .. } = classification;
        Ok(CardInfo {
            var: components.variable_repr(),
            title: card.format_title(evaluated),
            input: card.format_input(&evaluated.to_string(), components, &Parameters::new())?,
            pre_output: card.pre_output(evaluator, evaluated, components.variable.as_ref())?,
        })
    }

    /// Builds the records for an input that evaluated successfully.
    fn prepare_cards(&self, mut request: Request, classification: Classification) -> Result<Vec<CardRecord>, CardError> {
        let formatter = self.formatter();
        let function = request.arguments.function();
        let input = remove_constructors(&request.parsed);

        let output = if classification.is_function {
            format!(
                "<script type=\"math/tex; mode=display\">{}</script>",
                latexify(&request.expr, &request.parsed, &mut request.evaluator)?,
            )
        } else {
            formatter(&classification.evaluated)
        };
        let mut records = vec![CardRecord::Output {
            title: "Input".to_string(),
            input: input.clone(),
            output: Some(output),
        }];

        if classification.cards.is_empty()
            && classification.components.variable.is_none()
            && classification.is_function
        {
            records.push(CardRecord::Output {
                title: "Result".to_string(),
                input,
                output: Some(format_by_type(&classification.evaluated, function, &formatter)),
            });
            return Ok(records);
        }

        if classification.is_function && !function.map_or(false, is_function_handled) {
            records.push(CardRecord::Output {
                title: "Result".to_string(),
                input: String::new(),
                output: Some(format_by_type(&classification.evaluated, function, &formatter)),
            });
        }

        for &id in &classification.cards {
            let Some(card) = registry::get(id) else {
                debug!(card = id, "no such card");
                continue;
            };
            match Self::describe(card, &mut request.evaluator, &classification) {
                Ok(info) => records.push(CardRecord::Card {
                    card: id.to_string(),
                    var: info.var,
                    title: info.title,
                    input: info.input,
                    pre_output: info.pre_output,
                    parameters: card.parameter_names(),
                }),
                Err(err) => debug!(card = id, error = %err, "skipping card"),
            }
        }
        Ok(records)
    }

    /// The records shown when the request fails.
    fn error_cards(&self, input: &str, err: CardError) -> Vec<CardRecord> {
        let input_record = CardRecord::Output {
            title: "Input".to_string(),
            input: input.to_string(),
            output: None,
        };
        let error_record = match err.capped(self.config.trace_cap) {
            CardError::Syntax(exception_info) => CardRecord::SyntaxError {
                title: "Error".to_string(),
                input: input.to_string(),
                exception_info,
            },
            other => {
                if let CardError::Internal { message, .. } = &other {
                    warn!(input, message = %message, "unexpected error");
                }
                CardRecord::Error {
                    title: "Error".to_string(),
                    input: input.to_string(),
                    error: other.card_text(),
                }
            },
        };
        vec![input_record, error_record]
    }

    /// Evaluates the input and returns the records describing it: the input itself, the result of
    /// a command if there is one, and the cards that apply to it.
    ///
    /// Errors never escape; they are reported as an input record followed by an error record.
    /// Empty input gives no records at all.
    pub fn classify_and_evaluate(&self, input: &str) -> Vec<CardRecord> {
        let input = input.trim();
        if input.is_empty() {
            return Vec::new();
        }
        self.classify(input)
            .and_then(|(request, classification)| self.prepare_cards(request, classification))
            .unwrap_or_else(|err| self.error_cards(input, err))
    }

    /// Describes a single card for the expression, with `variable` as its variable.
    pub fn get_card_info(&self, card_id: &str, expression: &str, variable: &str) -> Result<CardInfo, CardError> {
        let card = registry::get(card_id).ok_or_else(|| CardError::NotFound(card_id.to_string()))?;
        let (mut request, mut classification) = self.classify(expression.trim())?;
        classification.components.variable = Some(SymExpr::symbol(variable));
        Self::describe(card, &mut request.evaluator, &classification)
    }

    /// Evaluates a single card for the expression, with `variable` as its variable.
    pub fn evaluate_card(
        &self,
        card_id: &str,
        expression: &str,
        variable: &str,
        parameters: &Parameters,
    ) -> Result<CardOutput, CardError> {
        let card = registry::get(card_id).ok_or_else(|| CardError::NotFound(card_id.to_string()))?;
        let (mut request, mut classification) = self.classify(expression.trim())?;
        let symbol = SymExpr::symbol(variable);
        classification.components.variable = Some(symbol.clone());
        request.evaluator.set(variable, symbol);

        let result = card.eval(
            &mut request.evaluator,
            &classification.evaluated,
            &classification.components,
            parameters,
        )?;
        debug!(card = card_id, result = %result, "evaluated card");
        Ok(CardOutput {
            value: result.to_string(),
            output: card.format_output(&result, &self.formatter()),
        })
    }
}

/// Errors raised while evaluating the input itself are shown with their message, unless they are
/// syntax errors.
fn input_error(err: &Error, source: &str) -> CardError {
    match err.category() {
        Category::Syntax => CardError::Syntax(SyntaxErrorInfo::new(err, source)),
        _ => CardError::Value(err.message()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn titles(records: &[CardRecord]) -> Vec<&str> {
        records.iter().map(CardRecord::title).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(Gamma::default().classify_and_evaluate("   "), vec![]);
    }

    #[test]
    fn invalid_input() {
        let records = Gamma::default().classify_and_evaluate("^^^");
        assert_eq!(records, vec![
            CardRecord::Output { title: "Input".to_string(), input: "^^^".to_string(), output: None },
            CardRecord::Error {
                title: "Error".to_string(),
                input: "^^^".to_string(),
                error: "Invalid input".to_string(),
            },
        ]);
    }

    #[test]
    fn evaluation_errors_show_their_message() {
        let records = Gamma::default().classify_and_evaluate("7 // 0");
        assert_eq!(titles(&records), vec!["Input", "Error"]);
        match &records[1] {
            CardRecord::Error { error, .. } => assert!(!error.starts_with("There was an error"), "{}", error),
            other => panic!("expected an error record, got {:?}", other),
        }
    }

    #[test]
    fn internal_errors_show_a_capped_trace() {
        let gamma = Gamma::new(Config::builder().trace_cap(3).build());
        let err = CardError::Internal {
            message: "boom".to_string(),
            trace: (0..10).map(|i| format!("frame {}", i)).collect(),
        };
        let records = gamma.error_cards("x", err);
        assert_eq!(titles(&records), vec!["Input", "Error"]);
        assert_eq!(records[0], CardRecord::Output { title: "Input".to_string(), input: "x".to_string(), output: None });
        let CardRecord::Error { input, error, .. } = &records[1] else {
            panic!("expected an error record, got {:?}", records[1]);
        };
        assert_eq!(input, "x");
        assert!(error.starts_with("There was an error in Gamma."), "{}", error);
        assert!(error.ends_with("frame 2"), "{}", error);
        assert!(!error.contains("frame 3"), "{}", error);
    }

    #[test]
    fn commands_get_a_result() {
        let records = Gamma::default().classify_and_evaluate("factorint(12)");
        assert_eq!(titles(&records), vec!["Input", "Result"]);
        let CardRecord::Output { output: Some(input), .. } = &records[0] else {
            panic!("expected the input record, got {:?}", records[0]);
        };
        assert_eq!(input, "<script type=\"math/tex; mode=display\">\\mathrm{factorint}(12)</script>");
        let CardRecord::Output { output: Some(result), .. } = &records[1] else {
            panic!("expected the result record, got {:?}", records[1]);
        };
        assert!(result.contains("<th>Factor</th><th>Times</th>"), "{}", result);
    }

    #[test]
    fn expressions_get_cards() {
        let records = Gamma::default().classify_and_evaluate("x**2 + 1");
        assert_eq!(records[0].title(), "Input");
        let ids = records.iter().filter_map(CardRecord::card_id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["diff", "integral_alternate"]);
        match &records[1] {
            CardRecord::Card { var, pre_output, .. } => {
                assert_eq!(var, "x");
                assert!(pre_output.starts_with("\\frac{d}{d x}"), "{}", pre_output);
            },
            other => panic!("expected a card record, got {:?}", other),
        }
    }

    #[test]
    fn unknown_cards() {
        let gamma = Gamma::default();
        assert_eq!(
            gamma.get_card_info("nope", "x", "x"),
            Err(CardError::NotFound("nope".to_string())),
        );
        assert_eq!(
            gamma.evaluate_card("nope", "x", "x", &Parameters::new()),
            Err(CardError::NotFound("nope".to_string())),
        );
    }

    #[test]
    fn card_info_uses_the_given_variable() {
        let info = Gamma::default().get_card_info("diff", "x*y", "y").unwrap();
        assert_eq!(info.var, "y");
        assert!(info.pre_output.contains("\\partial y"), "{}", info.pre_output);
    }
}
