//! The sandboxed evaluator.
//!
//! Programs are evaluated by a small tree-walking interpreter over the AST produced by
//! [`gamma_parser`]. The interpreter can only reach the operations in the [`builtins`] registry and
//! the methods in [`methods`], and every request runs under the [`Limits`] of its [`Ctxt`], so even
//! hostile input cannot do more than burn through its step budget.

pub mod builtins;
pub mod ctxt;
pub mod error;
pub mod exec;
pub mod expr;
pub mod limits;
pub mod methods;
pub mod ops;
pub mod value;

pub use builtins::{Builtin, BuiltinKind};
pub use ctxt::Ctxt;
pub use limits::{Limits, LimitsBuilder};
pub use value::{UserFunc, Value};

use gamma_error::{Category, Error};
use gamma_parser::{
    parser::{ast::Expr, parse_expr, parse_program},
    transform::{Binding, Resolve},
};
use std::fmt::{self, Display, Formatter};
use tracing::{debug, warn};

/// Any type that can be evaluated to produce a value.
pub trait Eval {
    /// Evaluate the expression to produce a value, using the default namespace.
    fn eval(&self) -> Result<Value, Error> {
        self.eval_with(&mut Ctxt::default())
    }

    /// Evaluate the expression to produce a value, using the given context.
    fn eval_with(&self, ctxt: &mut Ctxt) -> Result<Value, Error>;
}

/// The result of [`Evaluator::eval`].
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutput {
    /// The printed output followed by the representation of the last expression.
    Repr(String),

    /// The value of the last expression. A program whose last line is not an expression gives
    /// [`Value::None`].
    Value(Value),

    /// The formatted trace of an error.
    Trace(String),
}

impl EvalOutput {
    /// Returns the value, if the evaluation produced one.
    pub fn into_value(self) -> Option<Value> {
        match self {
            EvalOutput::Value(value) => Some(value),
            EvalOutput::Repr(_) | EvalOutput::Trace(_) => None,
        }
    }

    /// Returns true if this is the trace of an error.
    pub fn is_trace(&self) -> bool {
        matches!(self, EvalOutput::Trace(_))
    }
}

impl Display for EvalOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EvalOutput::Repr(text) | EvalOutput::Trace(text) => f.write_str(text),
            EvalOutput::Value(value) => write!(f, "{}", value),
        }
    }
}

/// Formats an error the way an interactive interpreter reports an uncaught exception.
pub fn format_trace(error: &Error, line: usize) -> String {
    format!(
        "Traceback (most recent call last):\n  File \"<string>\", line {}, in <module>\n{}: {}",
        line,
        error.category(),
        error.message(),
    )
}

/// The 1-based line of the source containing the given byte offset.
fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())].matches('\n').count() + 1
}

/// Pairs an error with the line it was raised on, given the source it was parsed from and the line
/// that source starts on.
fn locate(err: Error, source: &str, first_line: usize) -> (Error, usize) {
    let line = first_line + line_of(source, err.offset().unwrap_or(0)) - 1;
    (err, line)
}

/// Splits input into the statements to execute and the final expression to evaluate, if the last
/// line is one.
fn split_program(text: &str) -> (&str, Option<(&str, Expr)>) {
    let (head, last) = match text.rfind('\n') {
        Some(i) => (&text[..i], &text[i + 1..]),
        None => ("", text),
    };
    if last.starts_with([' ', '\t']) || last.trim().is_empty() {
        return (text, None);
    }
    match parse_expr(last) {
        Ok(expr) => (head, Some((last, expr))),
        Err(_) => (text, None),
    }
}

/// Evaluates user programs against a private namespace.
///
/// The namespace persists across calls, so names assigned by one call are visible to the next. Each
/// call gets a fresh step budget.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    ctxt: Ctxt,
}

impl Evaluator {
    /// Creates an evaluator with the default namespace and limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an evaluator with the default namespace and the given limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self { ctxt: Ctxt::with_limits(limits) }
    }

    /// The namespace of this evaluator.
    pub fn ctxt(&self) -> &Ctxt {
        &self.ctxt
    }

    /// The namespace of this evaluator, mutably.
    pub fn ctxt_mut(&mut self) -> &mut Ctxt {
        &mut self.ctxt
    }

    /// Looks up a name in the namespace.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.ctxt.get_var(name)
    }

    /// Binds a name in the namespace.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.ctxt.add_global(name, value.into());
    }

    /// Evaluates a single expression node.
    pub fn eval_node(&mut self, node: &Expr) -> Result<Value, Error> {
        self.ctxt.begin_request();
        node.eval_with(&mut self.ctxt)
    }

    /// Runs the program in `text`.
    ///
    /// All lines but the last are executed as statements. The last line is evaluated as an
    /// expression if it is one, and otherwise executed along with the rest. Returns the value of
    /// that expression, if there is one, along with whatever was printed. Errors come with the line
    /// they were raised on.
    pub fn eval_value(&mut self, text: &str) -> Result<(Option<Value>, String), (Error, usize)> {
        self.ctxt.begin_request();
        let text = text.trim().replace('\r', "");
        let (program, last) = split_program(&text);
        debug!(lines = text.lines().count(), has_expr = last.is_some(), "evaluating");

        let stmts = parse_program(program).map_err(|err| locate(err, program, 1))?.stmts;
        exec::check_returns(&stmts).map_err(|err| locate(err, program, 1))?;
        exec::exec_all(&stmts, &mut self.ctxt).map_err(|err| locate(err, program, 1))?;

        let value = match last {
            Some((source, expr)) => {
                let line = text.lines().count();
                Some(expr.eval_with(&mut self.ctxt).map_err(|err| locate(err, source, line))?)
            },
            None => None,
        };
        Ok((value, self.ctxt.take_output()))
    }

    /// Runs the program in `text`. See [`Evaluator::eval_value`] for how the text is split.
    ///
    /// With `want_repr`, the result is the printed output followed by the representation of the
    /// final expression; a program with no final expression gives just its output. Otherwise it is
    /// the value itself, or [`Value::None`] without a final expression.
    ///
    /// Errors never escape: with `suppress_errors` they give [`None`], and otherwise the formatted
    /// trace.
    pub fn eval(&mut self, text: &str, suppress_errors: bool, want_repr: bool) -> Option<EvalOutput> {
        match self.eval_value(text) {
            Ok((value, output)) if want_repr => {
                let repr = value.map(|value| value.to_string()).unwrap_or_default();
                Some(EvalOutput::Repr(output + &repr))
            },
            Ok((value, _)) => Some(EvalOutput::Value(value.unwrap_or(Value::None))),
            Err((err, line)) => {
                if matches!(err.category(), Category::Timeout | Category::Recursion) {
                    warn!(category = %err.category(), "evaluation stopped by its limits");
                }
                if suppress_errors {
                    None
                } else {
                    Some(EvalOutput::Trace(format_trace(&err, line)))
                }
            },
        }
    }

    /// Runs the program in `text` and returns what an interactive session would show.
    pub fn eval_repr(&mut self, text: &str) -> String {
        self.eval(text, false, true).map(|output| output.to_string()).unwrap_or_default()
    }
}

/// Lets the input transformations see which names the namespace defines.
impl Resolve for Evaluator {
    fn resolve(&self, name: &str) -> Option<Binding> {
        self.ctxt.get_var(name).map(|value| match value {
            Value::Builtin(_) | Value::Function(_) | Value::UndefFunction(_) => Binding::Callable,
            _ => Binding::Value,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn single_expression() {
        assert_eq!(Evaluator::new().eval_repr("1+1"), "2");
        assert_eq!(Evaluator::new().eval_repr("1/2 + 1/3"), "5/6");
    }

    #[test]
    fn assignment_has_no_output() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.eval_repr("a=1+1"), "");
        assert_eq!(Evaluator::new().eval_repr("a=1+1\na"), "2");
    }

    #[test]
    fn namespace_persists() {
        let mut evaluator = Evaluator::new();
        evaluator.eval_repr("a = 3");
        assert_eq!(evaluator.eval_repr("a**2"), "9");
    }

    #[test]
    fn function_definition() {
        assert_eq!(Evaluator::new().eval_repr("def f(x):\n\treturn x**2\nf(3)"), "9");
    }

    #[test]
    fn printed_output_comes_first() {
        assert_eq!(Evaluator::new().eval_repr("print('hi')\n7"), "hi\n7");
        assert_eq!(Evaluator::new().eval_repr("print(1, 2)"), "1 2\nNone");
    }

    #[test]
    fn traces() {
        let trace = Evaluator::new().eval_repr("xxxx");
        assert!(trace.starts_with("Traceback"));
        assert!(trace.ends_with("NameError: name 'xxxx' is not defined"));

        let trace = Evaluator::new().eval_repr("a = 1\nb = 1/0 + c");
        assert!(trace.contains("line 2"), "{}", trace);
    }

    #[test]
    fn suppressed_errors() {
        assert_eq!(Evaluator::new().eval("xxxx", true, true), None);
        assert_eq!(
            Evaluator::new().eval("1 +* 2\nx", true, false),
            None,
        );
    }

    #[test]
    fn values() {
        let mut evaluator = Evaluator::new();
        let output = evaluator.eval("Symbol('x') + 1", false, false).unwrap();
        assert_eq!(output.into_value().unwrap().to_string(), "x + 1");
        let output = evaluator.eval("y = 2", false, false).unwrap();
        assert_eq!(output, EvalOutput::Value(Value::None));
        assert_eq!(evaluator.get("y").unwrap().to_string(), "2");
    }

    #[test]
    fn step_budget() {
        let mut evaluator = Evaluator::with_limits(Limits::builder().max_steps(50).build());
        let trace = evaluator.eval_repr("t = 0\nfor i in range(1000):\n    t = t + i\nt");
        assert!(trace.ends_with("evaluation took more than 50 steps"), "{}", trace);

        // the budget is per call
        assert_eq!(evaluator.eval_repr("1 + 2"), "3");
    }

    #[test]
    fn resolves_names() {
        let mut evaluator = Evaluator::new();
        evaluator.set("k", Value::Bool(true));
        assert_eq!(evaluator.resolve("sin"), Some(Binding::Callable));
        assert_eq!(evaluator.resolve("pi"), Some(Binding::Value));
        assert_eq!(evaluator.resolve("k"), Some(Binding::Value));
        assert_eq!(evaluator.resolve("nope"), None);
    }
}
