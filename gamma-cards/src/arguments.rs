//! Extraction of the top-level call of the input.
//!
//! The classifier looks at the syntax of what the user typed as well as at its value: `diff(f, x)`
//! and the derivative it evaluates to get different cards. [`Arguments`] records that syntax.

use gamma_compute::eval::{Evaluator, Value};
use gamma_error::Error;
use gamma_parser::parser::ast::{Call, Expr, Ident};

/// The node that decides the function name of the input.
#[derive(Debug, Clone, Copy)]
pub enum TopCall<'a> {
    Call(&'a Call),
    Name(&'a Ident),
}

/// Walks the expression in source order without entering calls. The last call seen wins; a name
/// only counts if no call has been seen before it.
fn visit<'a>(expr: &'a Expr, top: &mut Option<TopCall<'a>>) {
    match expr {
        Expr::Call(call) => *top = Some(TopCall::Call(call)),
        Expr::Name(name) => {
            if top.is_none() {
                *top = Some(TopCall::Name(name));
            }
        },
        Expr::Literal(_) => (),
        Expr::Paren(paren) => visit(&paren.expr, top),
        Expr::Tuple(tuple) => tuple.items.iter().for_each(|item| visit(item, top)),
        Expr::List(list) => list.items.iter().for_each(|item| visit(item, top)),
        Expr::Dict(dict) => dict.entries.iter().for_each(|(key, value)| {
            visit(key, top);
            visit(value, top);
        }),
        Expr::Attribute(attribute) => visit(&attribute.value, top),
        Expr::Index(index) => {
            visit(&index.target, top);
            visit(&index.index, top);
        },
        Expr::Unary(unary) => visit(&unary.operand, top),
        Expr::Binary(binary) => {
            visit(&binary.lhs, top);
            visit(&binary.rhs, top);
        },
    }
}

/// Finds the call (or, failing that, the name) at the top level of the expression.
pub fn top_call(expr: &Expr) -> Option<TopCall<'_>> {
    let mut top = None;
    visit(expr, &mut top);
    top
}

/// The function name and evaluated arguments of the top-level call of the input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    /// The name of the called function. [`None`] if the callee is not a plain name, as in
    /// `x.diff(y)`.
    pub function: Option<String>,

    /// The evaluated positional arguments, or [`None`] if there are none.
    pub args: Option<Vec<Value>>,

    /// The evaluated keyword arguments, or [`None`] if there are none.
    pub kwargs: Option<Vec<(String, Value)>>,
}

impl Arguments {
    /// Extracts the top-level call of `expr`, evaluating its arguments. A bare name gives empty
    /// arguments. Returns [`None`] if the expression has neither a call nor a name at its top
    /// level.
    pub fn extract(expr: &Expr, evaluator: &mut Evaluator) -> Result<Option<Self>, Error> {
        let Some(top) = top_call(expr) else {
            return Ok(None);
        };
        match top {
            TopCall::Call(call) => {
                let function = match &*call.func {
                    Expr::Name(name) => Some(name.name.clone()),
                    _ => None,
                };
                let args = call.args
                    .iter()
                    .map(|arg| evaluator.eval_node(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let kwargs = call.kwargs
                    .iter()
                    .map(|kwarg| Ok((kwarg.name.name.clone(), evaluator.eval_node(&kwarg.value)?)))
                    .collect::<Result<Vec<_>, Error>>()?;
                Ok(Some(Self {
                    function,
                    args: (!args.is_empty()).then_some(args),
                    kwargs: (!kwargs.is_empty()).then_some(kwargs),
                }))
            },
            TopCall::Name(name) => Ok(Some(Self {
                function: Some(name.name.clone()),
                args: Some(Vec::new()),
                kwargs: Some(Vec::new()),
            })),
        }
    }

    /// Returns true if the function was called with at least one argument.
    pub fn is_applied(&self) -> bool {
        self.args.as_ref().map_or(false, |args| !args.is_empty())
            || self.kwargs.as_ref().map_or(false, |kwargs| !kwargs.is_empty())
    }

    /// The positional arguments, empty if there are none.
    pub fn positional(&self) -> &[Value] {
        self.args.as_deref().unwrap_or_default()
    }

    /// The name of the function, if any.
    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use gamma_parser::parser::parse_expr;
    use pretty_assertions::assert_eq;
    use super::*;

    fn extract(source: &str) -> Option<Arguments> {
        let expr = parse_expr(source).unwrap();
        Arguments::extract(&expr, &mut Evaluator::new()).unwrap()
    }

    #[test]
    fn top_level_call() {
        let args = extract("diff(cos(Symbol('x'))**Integer(7), Symbol('x'))").unwrap();
        assert_eq!(args.function(), Some("diff"));
        let values = args.positional().iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(values, vec!["cos(x)**7", "x"]);
        assert_eq!(args.kwargs, None);
        assert!(args.is_applied());
    }

    #[test]
    fn last_call_wins() {
        let args = extract("Symbol('x') + sin(Symbol('x'))").unwrap();
        assert_eq!(args.function(), Some("sin"));

        let args = extract("pi + Integer(2)").unwrap();
        assert_eq!(args.function(), Some("Integer"));
    }

    #[test]
    fn bare_name() {
        let args = extract("pi").unwrap();
        assert_eq!(args, Arguments {
            function: Some("pi".to_string()),
            args: Some(vec![]),
            kwargs: Some(vec![]),
        });
        assert!(!args.is_applied());
    }

    #[test]
    fn keywords_only() {
        let args = extract("print(sep='x')").unwrap();
        assert_eq!(args.args, None);
        assert_eq!(args.kwargs, Some(vec![("sep".to_string(), Value::Str("x".to_string()))]));
        assert!(args.is_applied());
    }

    #[test]
    fn no_call() {
        assert_eq!(extract("1 + 2"), None);
        assert_eq!(extract("Symbol('x').diff(Symbol('x'))").unwrap().function, None);
    }
}
