//! Turning values into the HTML fragments shown on cards.
//!
//! Most output goes through [`make_latex_readable`], which wraps LaTeX in a MathJax script tag.
//! The other formatters build lists and tables around it.

use crate::{
    classify::{is_approximatable_constant, Components},
    registry,
};
use gamma_compute::{eval::Value, symbolic::evalf::evalf};
use std::cmp::Ordering;

/// Formats a single value.
pub type Formatter<'a> = &'a dyn Fn(&Value) -> String;

/// Formats the output of a card, given the formatter for single values.
pub type OutputFormatter = fn(&Value, Formatter<'_>) -> String;

/// Formats the input of a card: receives the card's statement, the representation of the
/// evaluated input, and the components.
pub type InputFormatter = fn(&str, &str, &Components) -> String;

/// Escapes text for use inside HTML, including attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Renders a value as display math. Exact constants such as `sqrt(2)` also carry their
/// representation and a numeric approximation to `digits` significant digits.
pub fn make_latex_readable(value: &Value, digits: u32) -> String {
    let tag = match value {
        Value::Expr(expr) if is_approximatable_constant(value) => format!(
            "<script type=\"math/tex; mode=display\" data-numeric=\"true\" data-output-repr=\"{}\" data-approximation=\"{}\">",
            escape_html(&value.to_string()),
            escape_html(&Value::Expr(evalf(expr, digits)).latex()),
        ),
        _ => "<script type=\"math/tex; mode=display\">".to_string(),
    };
    format!("{}{}</script>", tag, value.latex())
}

/// Passes the output through untouched.
pub fn format_nothing(value: &Value, _: Formatter<'_>) -> String {
    value.to_str()
}

/// Wraps step-by-step HTML.
pub fn format_steps(value: &Value, _: Formatter<'_>) -> String {
    format!("<div class=\"steps\">{}</div>", value.to_str())
}

/// Shortens integers of more than 100 digits to their first 20 and last 21 digits.
pub fn format_long_integer(statement: &str, input_repr: &str, _: &Components) -> String {
    let digits = input_repr.chars().count();
    if digits > 100 {
        let head = input_repr.chars().take(20).collect::<String>();
        let tail = input_repr.chars().skip(digits - 21).collect::<String>();
        return format!("{}...{}", head, tail);
    }
    statement.replace("%s", input_repr)
}

/// Shows an integral with its limits, or its variables if it has none.
pub fn format_integral(statement: &str, input_repr: &str, components: &Components) -> String {
    let limits = match &components.limits {
        Some(limits) if !limits.is_empty() => limits.iter().map(ToString::to_string).collect::<Vec<_>>(),
        _ => components.variables.iter().map(ToString::to_string).collect(),
    };
    let integrand = components
        .integrand
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| input_repr.to_string());
    statement.replace("{_var}", &limits.join(", ")).replace("%s", &integrand)
}

/// Shows the name of the function whose documentation is shown.
pub fn format_function_docs_input(statement: &str, input_repr: &str, components: &Components) -> String {
    let name = match &components.input_evaluated {
        Some(Value::Builtin(builtin)) => builtin.name.to_string(),
        Some(Value::Function(func)) => func.name.clone(),
        Some(Value::UndefFunction(name)) => name.clone(),
        _ => input_repr.to_string(),
    };
    statement.replace("%s", &name)
}

/// Orders dictionary keys: numbers by value, everything else by representation.
fn compare_keys(a: &Value, b: &Value) -> Ordering {
    let number = |value: &Value| value.as_expr().and_then(|expr| expr.as_rational());
    match (number(a), number(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Renders a dictionary as a two-column table. Keys are sorted unless some key is a symbol.
fn format_dict_title(value: &Value, formatter: Formatter<'_>, titles: (&str, &str)) -> String {
    let Value::Dict(entries) = value else {
        return formatter(value);
    };
    let mut entries = entries.iter().collect::<Vec<_>>();
    let has_symbol_key = entries
        .iter()
        .any(|(key, _)| key.as_expr().map_or(false, |expr| expr.is_symbol()));
    if !has_symbol_key {
        entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
    }

    let mut html = vec![
        "<table>".to_string(),
        format!("<thead><tr><th>{}</th><th>{}</th></tr></thead>", titles.0, titles.1),
        "<tbody>".to_string(),
    ];
    for (key, value) in entries {
        html.push(format!("<tr><td>{}</td><td>{}</td></tr>", key, value));
    }
    html.push("</tbody></table>".to_string());
    html.join("\n")
}

/// The model found by `satisfiable`.
pub fn format_satisfiable(value: &Value, formatter: Formatter<'_>) -> String {
    format_dict_title(value, formatter, ("Variable", "Possible Value"))
}

/// The prime factorization found by `factorint`.
pub fn format_factorint(value: &Value, formatter: Formatter<'_>) -> String {
    format_dict_title(value, formatter, ("Factor", "Times"))
}

/// Renders a list or tuple as an HTML list.
pub fn format_list(value: &Value, formatter: Formatter<'_>) -> String {
    let Some(items) = value.sequence() else {
        return formatter(value);
    };
    if items.is_empty() {
        return "<p>No result</p>".to_string();
    }
    let mut html = vec!["<ul>".to_string()];
    html.extend(items.iter().map(|item| format!("<li>{}</li>", formatter(item))));
    html.push("</ul>".to_string());
    html.join("\n")
}

/// Renders `(variables, rows)` as a table with a column per variable and one for the value.
pub fn format_truth_table(value: &Value, formatter: Formatter<'_>) -> String {
    let (variables, rows) = match value.sequence().as_deref() {
        Some([variables, rows]) => match (variables.sequence(), rows.sequence()) {
            (Some(variables), Some(rows)) => (variables, rows),
            _ => return formatter(value),
        },
        _ => return formatter(value),
    };
    if rows.is_empty() {
        return "<p>No result</p>".to_string();
    }

    let mut html = vec!["<table>".to_string(), "<thead><tr>".to_string()];
    for variable in &variables {
        html.push(format!("<th>{}</th>", variable));
    }
    html.push("<th>Value</th>".to_string());
    html.push("</tr></thead>".to_string());
    html.push("<tbody>".to_string());
    for row in rows {
        let (inputs, output) = match row.sequence().as_deref() {
            Some([inputs, output]) => (inputs.sequence().unwrap_or_default(), output.clone()),
            _ => continue,
        };
        html.push("<tr>".to_string());
        for input in inputs.iter().chain(std::iter::once(&output)) {
            html.push(format!("<td>{}</td>", truth_cell(input)));
        }
        html.push("</tr>".to_string());
    }
    html.push("</tbody></table>".to_string());
    html.join("\n")
}

/// Shows `0`/`1` inputs and boolean outputs as `False`/`True`.
fn truth_cell(value: &Value) -> &'static str {
    let truth = match value {
        Value::Bool(b) => *b,
        other => other
            .as_expr()
            .map_or(false, |expr| expr.is_one() || expr.as_boolean() == Some(true)),
    };
    if truth {
        "True"
    } else {
        "False"
    }
}

/// Formatters chosen by the name of the top-level function.
fn function_formatter(function: &str) -> Option<OutputFormatter> {
    match function {
        "factorint" => Some(format_factorint),
        _ => None,
    }
}

/// Formats the result of the input, choosing by the top-level function first and by the shape of
/// the value second.
pub fn format_by_type(value: &Value, function: Option<&str>, formatter: Formatter<'_>) -> String {
    if let Some(format) = function.and_then(function_formatter) {
        return format(value, formatter);
    }
    if let Some(format) = function.and_then(registry::get).and_then(|card| card.format_output) {
        return format(value, formatter);
    }
    if value.sequence().is_some() {
        return format_list(value, formatter);
    }
    formatter(value)
}

#[cfg(test)]
mod tests {
    use gamma_compute::{eval::Evaluator, symbolic::SymExpr};
    use pretty_assertions::assert_eq;
    use super::*;

    fn eval(source: &str) -> Value {
        Evaluator::new().eval_value(source).unwrap().0.unwrap()
    }

    fn plain(value: &Value) -> String {
        value.to_string()
    }

    #[test]
    fn display_math() {
        let x = Value::Expr(SymExpr::symbol("x"));
        assert_eq!(make_latex_readable(&x, 15), "<script type=\"math/tex; mode=display\">x</script>");

        let html = make_latex_readable(&eval("sqrt(2)"), 15);
        assert!(html.contains("data-numeric=\"true\""), "{}", html);
        assert!(html.contains("data-output-repr=\"sqrt(2)\""), "{}", html);
        assert!(html.contains("data-approximation=\"1.414213562373"), "{}", html);
        assert!(html.ends_with("\\sqrt{2}</script>"), "{}", html);

        let html = make_latex_readable(&eval("Integer(4)"), 15);
        assert!(!html.contains("data-numeric"));
    }

    #[test]
    fn long_integers() {
        let components = Components::default();
        assert_eq!(format_long_integer("len(str(%s))", "12345", &components), "len(str(12345))");

        let long = "1234567890".repeat(11);
        let short = format_long_integer("len(str(%s))", &long, &components);
        assert_eq!(short, format!("{}...{}", &long[..20], &long[long.len() - 21..]));
    }

    #[test]
    fn factor_table() {
        let html = format_by_type(&eval("factorint(Integer(12))"), Some("factorint"), &plain);
        assert_eq!(html, [
            "<table>",
            "<thead><tr><th>Factor</th><th>Times</th></tr></thead>",
            "<tbody>",
            "<tr><td>2</td><td>2</td></tr>",
            "<tr><td>3</td><td>1</td></tr>",
            "</tbody></table>",
        ].join("\n"));
    }

    #[test]
    fn lists() {
        assert_eq!(format_by_type(&Value::list(vec![]), None, &plain), "<p>No result</p>");
        let html = format_by_type(&eval("[Integer(1), Integer(2)]"), Some("solve"), &plain);
        assert_eq!(html, "<ul>\n<li>1</li>\n<li>2</li>\n</ul>");
        assert_eq!(format_by_type(&eval("Integer(7)"), None, &plain), "7");
    }

    #[test]
    fn truth_tables() {
        let value = Value::Tuple(vec![
            eval("[Symbol('x')]"),
            eval("[([Integer(0)], False), ([Integer(1)], True)]"),
        ]);
        let html = format_truth_table(&value, &plain);
        assert!(html.contains("<th>x</th>\n<th>Value</th>"), "{}", html);
        assert!(html.contains("<td>False</td>\n<td>False</td>"), "{}", html);
        assert!(html.contains("<td>True</td>\n<td>True</td>"), "{}", html);
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
