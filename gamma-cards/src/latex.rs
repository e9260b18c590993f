//! Rendering command-like input, such as `factorint(12)`, as LaTeX for the input card.
//!
//! Calculus commands are shown as the operator they compute, a few commands have their own
//! wording, and the remaining lowercase commands are written as `\mathrm{name}(args)`.

use crate::{
    arguments::{top_call, TopCall},
    classify::OTHER_FUNCTIONS,
    error::CardError,
};
use gamma_compute::{
    eval::{builtins, expr::call_value, Evaluator, Value},
    symbolic::SymExpr,
};
use gamma_parser::parser::ast::{Call, Expr};

/// Renders a call whose function has a wording of its own.
type CallFormatter = fn(&mut Renderer<'_>, &Call) -> Result<String, CardError>;

/// The commands shown as the unevaluated operator they compute.
fn operator_class(name: &str) -> Option<&'static str> {
    match name {
        "diff" => Some("Derivative"),
        "integrate" => Some("Integral"),
        _ => None,
    }
}

fn formatter(name: &str) -> Option<CallFormatter> {
    match name {
        "rsolve" => Some(format_rsolve),
        "summation" | "product" => Some(format_big_operator),
        "help" => Some(format_help),
        _ => None,
    }
}

/// The name of the function called, if the callee is a plain name.
fn callee_name(call: &Call) -> Option<&str> {
    match &*call.func {
        Expr::Name(name) => Some(name.name.as_str()),
        _ => None,
    }
}

/// Starts with a lowercase letter, or with something that is not a letter at all.
fn is_lowercase_name(name: &str) -> bool {
    name.chars().next().map_or(false, |c| !c.is_uppercase())
}

struct Renderer<'a> {
    evaluator: &'a mut Evaluator,
    source: &'a str,
}

impl Renderer<'_> {
    fn eval(&mut self, node: &Expr) -> Result<Value, CardError> {
        self.evaluator
            .eval_node(node)
            .map_err(|err| CardError::from_eval(&err, self.source))
    }

    fn latex(&mut self, node: &Expr) -> Result<String, CardError> {
        Ok(self.eval(node)?.latex())
    }

    fn eval_args(&mut self, call: &Call) -> Result<Vec<Value>, CardError> {
        call.args.iter().map(|arg| self.eval(arg)).collect()
    }

    /// Calls `func` with the evaluated arguments of `call`.
    fn apply(&mut self, call: &Call, func: &Value) -> Result<Value, CardError> {
        let positional = self.eval_args(call)?;
        let keywords = call.kwargs
            .iter()
            .map(|keyword| Ok((keyword.name.name.clone(), self.eval(&keyword.value)?)))
            .collect::<Result<Vec<_>, CardError>>()?;
        call_value(self.evaluator.ctxt_mut(), func, positional, keywords, call.span.clone())
            .map_err(|err| CardError::from_eval(&err, self.source))
    }

    /// Calls the builtin `name` with already evaluated arguments.
    fn builtin(&mut self, name: &str, positional: Vec<Value>) -> Result<Value, CardError> {
        let builtin = builtins::get(name)
            .ok_or_else(|| CardError::value(format!("{}() is not available", name)))?;
        call_value(self.evaluator.ctxt_mut(), &Value::Builtin(builtin), positional, Vec::new(), 0..0)
            .map_err(|err| CardError::from_eval(&err, self.source))
    }

    fn visit_call(&mut self, call: &Call, name: &str) -> Result<String, CardError> {
        if let Some(class) = operator_class(name) {
            let class = builtins::get(class)
                .ok_or_else(|| CardError::value(format!("{}() is not available", class)))?;
            return Ok(self.apply(call, &Value::Builtin(class))?.latex());
        }
        if let Some(format) = formatter(name) {
            return format(self, call);
        }
        if is_lowercase_name(name) && !OTHER_FUNCTIONS.contains(&name) {
            let args = call.args
                .iter()
                .map(|arg| match arg {
                    Expr::Call(inner) => match callee_name(inner) {
                        Some(inner_name) if is_lowercase_name(inner_name) => self.visit_call(inner, inner_name),
                        _ => self.latex(arg),
                    },
                    _ => self.latex(arg),
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(format!("\\mathrm{{{}}}({})", name.replace('_', "\\_"), args.join(", ")));
        }

        let func = self.eval(&call.func)?;
        Ok(self.apply(call, &func)?.latex())
    }

    /// The LaTeX of `lhs = rhs`.
    fn equation(&mut self, lhs: Value, rhs: Value) -> Result<String, CardError> {
        Ok(self.builtin("Eq", vec![lhs, rhs])?.latex())
    }
}

fn format_rsolve(renderer: &mut Renderer<'_>, call: &Call) -> Result<String, CardError> {
    let Some(first) = call.args.first() else {
        return Err(CardError::value("rsolve() needs a recurrence to solve"));
    };
    let recurrence = renderer.eval(first)?;
    let recurrence = renderer.equation(recurrence, SymExpr::integer(0).into())?;

    let Some(conditions) = call.args.get(2).filter(|_| call.args.len() == 3) else {
        return Ok(format!("\\mathrm{{Solve~the~recurrence~}}{}", recurrence));
    };
    let Value::Dict(conditions) = renderer.eval(conditions)? else {
        return Err(CardError::value("the initial conditions of rsolve() must be a dict"));
    };
    let conditions = conditions
        .into_iter()
        .map(|(term, value)| Ok(format!("&{}", renderer.equation(term, value)?)))
        .collect::<Result<Vec<_>, CardError>>()?;
    Ok(format!(
        "\\begin{{align}}&\\mathrm{{Solve~the~recurrence~}}{}\\\\&\\mathrm{{with~initial~conditions}}\\\\{}\\end{{align}}",
        recurrence,
        conditions.join("\\\\\n"),
    ))
}

/// `summation` and `product` are shown unevaluated.
fn format_big_operator(renderer: &mut Renderer<'_>, call: &Call) -> Result<String, CardError> {
    let class = match callee_name(call) {
        Some("summation") => "Sum",
        _ => "Product",
    };
    let args = renderer.eval_args(call)?;
    Ok(renderer.builtin(class, args)?.latex())
}

fn format_help(renderer: &mut Renderer<'_>, call: &Call) -> Result<String, CardError> {
    let Some(arg) = call.args.first() else {
        return Ok("\\mathrm{Show~documentation~(requires~1~argument)}".to_string());
    };
    let name = match renderer.eval(arg)? {
        Value::Builtin(builtin) => builtin.name.to_string(),
        Value::Function(func) => func.name.clone(),
        Value::UndefFunction(name) => name,
        other => other.to_string(),
    };
    Ok(format!("\\mathrm{{Show~documentation~for~}}{}", name))
}

/// Renders the top-level call of `expr` as LaTeX. `source` is the text `expr` was parsed from.
///
/// Input without a call by name is rendered as the LaTeX of its value.
pub fn latexify(expr: &Expr, source: &str, evaluator: &mut Evaluator) -> Result<String, CardError> {
    let mut renderer = Renderer { evaluator, source };
    match top_call(expr) {
        Some(TopCall::Call(call)) => match callee_name(call) {
            Some(name) => renderer.visit_call(call, name),
            None => renderer.latex(expr),
        },
        _ => renderer.latex(expr),
    }
}

#[cfg(test)]
mod tests {
    use gamma_parser::parser::parse_expr;
    use pretty_assertions::assert_eq;
    use super::*;

    fn render(source: &str) -> String {
        let expr = parse_expr(source).unwrap();
        latexify(&expr, source, &mut Evaluator::new()).unwrap()
    }

    #[test]
    fn commands() {
        assert_eq!(render("factorint(Integer(12))"), "\\mathrm{factorint}(12)");
        assert_eq!(
            render("factorint(gcd(Integer(12), Integer(18)))"),
            "\\mathrm{factorint}(\\mathrm{gcd}(12, 18))",
        );
        assert!(render("truth_table(Symbol('x') & Symbol('y'), [Symbol('x'), Symbol('y')])")
            .starts_with("\\mathrm{truth\\_table}(x \\wedge y, "));
    }

    #[test]
    fn calculus_operators() {
        assert_eq!(
            render("diff(Function('f')(Symbol('x')), Symbol('x'))"),
            "\\frac{d}{d x} f{\\left(x \\right)}",
        );
        assert_eq!(render("integrate(Integer(1)/Symbol('z'), Symbol('z'))"), "\\int \\frac{1}{z}\\, dz");
    }

    #[test]
    fn documentation() {
        assert_eq!(render("help(sin)"), "\\mathrm{Show~documentation~for~}sin");
        assert_eq!(render("help()"), "\\mathrm{Show~documentation~(requires~1~argument)}");
    }

    #[test]
    fn recurrences() {
        let tex = render("rsolve(Function('y')(Symbol('n') + Integer(1)) - Integer(2)*Function('y')(Symbol('n')), Function('y')(Symbol('n')))");
        assert!(tex.starts_with("\\mathrm{Solve~the~recurrence~}"), "{}", tex);
        assert!(tex.ends_with(" = 0"), "{}", tex);

        let tex = render("rsolve(Function('y')(Symbol('n') + Integer(1)) - Integer(2)*Function('y')(Symbol('n')), Function('y')(Symbol('n')), {Function('y')(Integer(0)): Integer(1)})");
        assert!(tex.starts_with("\\begin{align}&\\mathrm{Solve~the~recurrence~}"), "{}", tex);
        assert!(tex.contains("\\\\&\\mathrm{with~initial~conditions}\\\\&"), "{}", tex);
        assert!(tex.ends_with("\\end{align}"), "{}", tex);
    }

    #[test]
    fn excluded_functions_are_evaluated() {
        assert_eq!(render("Symbol('x') + sqrt(Integer(4))"), "2");
    }
}
