//! Attributes and methods of values, such as `expr.args` and `expr.subs(x, 1)`.

use crate::symbolic::{doit, simplify::fraction::as_numer_denom, SymExpr};
use super::{
    builtins::{self, Args},
    ctxt::Ctxt,
    error::{invalid, BuiltinError, MissingKey, NoAttribute},
    value::Value,
};

/// Methods of expressions that forward to the builtin of the same name, with the expression as the
/// first argument.
const FORWARDED: &[&str] = &[
    "diff", "integrate", "expand", "simplify", "factor", "together", "cancel", "apart", "rewrite",
];

/// Methods of expressions implemented here.
const EXPR_METHODS: &[&str] = &["doit", "subs", "evalf", "n", "as_numer_denom"];

const LIST_METHODS: &[&str] = &["append", "extend"];

const DICT_METHODS: &[&str] = &["keys", "values", "items", "get"];

/// Returns true if the value has a method with the given name.
fn has_method(value: &Value, name: &str) -> bool {
    match value {
        Value::Expr(_) => FORWARDED.contains(&name) || EXPR_METHODS.contains(&name),
        Value::List(_) => LIST_METHODS.contains(&name),
        Value::Dict(_) => DICT_METHODS.contains(&name),
        _ => false,
    }
}

/// Looks up an attribute of a value. Methods come back bound to the value.
pub fn get_attr(value: &Value, attr: &str) -> Result<Value, BuiltinError> {
    if has_method(value, attr) {
        return Ok(Value::BoundMethod(Box::new(value.clone()), attr.to_string()));
    }

    let missing = || -> BuiltinError { NoAttribute { typename: value.typename(), attr: attr.to_string() }.into() };
    let Value::Expr(expr) = value else {
        return Err(missing());
    };
    match (attr, expr) {
        ("args", _) => Ok(Value::Tuple(expr.children().into_iter().cloned().map(Value::from).collect())),
        ("free_symbols", _) => Ok(Value::Tuple(
            expr.free_symbols().into_iter().map(|name| SymExpr::symbol(name).into()).collect(),
        )),
        ("lhs", SymExpr::Relational(_, lhs, _)) => Ok((**lhs).clone().into()),
        ("rhs", SymExpr::Relational(_, _, rhs)) => Ok((**rhs).clone().into()),
        ("is_number", _) => Ok(Value::Bool(expr.is_number())),
        ("is_Symbol", _) => Ok(Value::Bool(expr.is_symbol())),
        _ => Err(missing()),
    }
}

/// Reads the substitutions of `subs(old, new)`, `subs({old: new})` or `subs([(old, new)])`.
fn substitutions(args: &Args) -> Result<Vec<(SymExpr, SymExpr)>, BuiltinError> {
    let pair = |old: &Value, new: &Value| -> Result<(SymExpr, SymExpr), BuiltinError> {
        let old = old.to_expr().ok_or_else(|| args.type_error("an expression", old))?;
        let new = new.to_expr().ok_or_else(|| args.type_error("an expression", new))?;
        Ok((old, new))
    };
    match args.positional.as_slice() {
        [old, new] => Ok(vec![pair(old, new)?]),
        [Value::Dict(entries)] => entries.iter().map(|(old, new)| pair(old, new)).collect(),
        [pairs] => pairs
            .sequence()
            .ok_or_else(|| args.type_error("a dict or a list of pairs", pairs))?
            .iter()
            .map(|item| match item.sequence().as_deref() {
                Some([old, new]) => pair(old, new),
                _ => Err(args.type_error("a pair", item)),
            })
            .collect(),
        _ => Err(invalid("subs() takes either (old, new), a dict, or a list of pairs")),
    }
}

/// Calls a method on a value.
pub fn call_method(
    ctxt: &mut Ctxt,
    receiver: &Value,
    name: &str,
    mut positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
) -> Result<Value, BuiltinError> {
    match receiver {
        Value::Expr(expr) => {
            if FORWARDED.contains(&name) {
                if let Some(builtin) = builtins::get(name) {
                    positional.insert(0, receiver.clone());
                    return builtin.call(ctxt, positional, keywords);
                }
            }
            let args = Args { name: "method", positional, keywords };
            match name {
                "doit" => {
                    args.count(0, 0)?;
                    Ok(doit(expr).into())
                },
                "subs" => {
                    let result = substitutions(&args)?
                        .into_iter()
                        .fold(expr.clone(), |acc, (old, new)| acc.subs(&old, &new));
                    Ok(result.into())
                },
                "evalf" | "n" => {
                    let mut positional = args.positional;
                    positional.insert(0, receiver.clone());
                    match builtins::get("N") {
                        Some(n) => n.call(ctxt, positional, args.keywords),
                        None => Err(invalid("numeric evaluation is unavailable")),
                    }
                },
                "as_numer_denom" => {
                    args.count(0, 0)?;
                    let (numer, denom) = as_numer_denom(expr);
                    Ok(Value::Tuple(vec![numer.into(), denom.into()]))
                },
                _ => Err(NoAttribute { typename: receiver.typename(), attr: name.to_string() }.into()),
            }
        },
        Value::List(items) => {
            let args = Args { name: "method", positional, keywords };
            match name {
                "append" => {
                    args.count(1, 1)?;
                    items.borrow_mut().push(args.positional[0].clone());
                    Ok(Value::None)
                },
                "extend" => {
                    args.count(1, 1)?;
                    let value = &args.positional[0];
                    let more = value.sequence().ok_or_else(|| args.type_error("a sequence", value))?;
                    items.borrow_mut().extend(more);
                    Ok(Value::None)
                },
                _ => Err(NoAttribute { typename: receiver.typename(), attr: name.to_string() }.into()),
            }
        },
        Value::Dict(entries) => {
            let args = Args { name: "method", positional, keywords };
            match name {
                "keys" => Ok(Value::list(entries.iter().map(|(key, _)| key.clone()).collect())),
                "values" => Ok(Value::list(entries.iter().map(|(_, value)| value.clone()).collect())),
                "items" => Ok(Value::list(
                    entries
                        .iter()
                        .map(|(key, value)| Value::Tuple(vec![key.clone(), value.clone()]))
                        .collect(),
                )),
                "get" => {
                    args.count(1, 2)?;
                    let key = &args.positional[0];
                    let found = entries.iter().find(|(k, _)| k == key).map(|(_, value)| value.clone());
                    Ok(found.or_else(|| args.get(1).cloned()).unwrap_or(Value::None))
                },
                _ => Err(NoAttribute { typename: receiver.typename(), attr: name.to_string() }.into()),
            }
        },
        _ => Err(NoAttribute { typename: receiver.typename(), attr: name.to_string() }.into()),
    }
}

/// Looks up a key in a dict.
pub fn dict_get(entries: &[(Value, Value)], key: &Value) -> Result<Value, BuiltinError> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, value)| value.clone())
        .ok_or_else(|| MissingKey { key: key.to_string() }.into())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    #[test]
    fn substitution_forms() {
        let mut ctxt = Ctxt::default();
        let expr: Value = (x() + SymExpr::symbol("y")).into();
        let two: Value = SymExpr::integer(2).into();

        let pair = call_method(&mut ctxt, &expr, "subs", vec![x().into(), two.clone()], vec![]).unwrap();
        assert_eq!(pair.to_string(), "y + 2");

        let dict = Value::Dict(vec![(x().into(), two.clone()), (SymExpr::symbol("y").into(), two)]);
        let all = call_method(&mut ctxt, &expr, "subs", vec![dict], vec![]).unwrap();
        assert_eq!(all, SymExpr::integer(4).into());
    }

    #[test]
    fn forwarded_methods() {
        let mut ctxt = Ctxt::default();
        let square: Value = SymExpr::pow(x(), SymExpr::integer(2)).into();
        let derivative = call_method(&mut ctxt, &square, "diff", vec![x().into()], vec![]).unwrap();
        assert_eq!(derivative.to_string(), "2*x");
    }

    #[test]
    fn attributes() {
        let relation: Value = SymExpr::relational(crate::symbolic::expr::RelOp::Lt, x(), SymExpr::one()).into();
        assert_eq!(get_attr(&relation, "rhs").unwrap(), SymExpr::one().into());
        assert!(matches!(get_attr(&relation, "subs").unwrap(), Value::BoundMethod(..)));
        assert!(get_attr(&Value::None, "args").is_err());
    }

    #[test]
    fn list_append() {
        let list = Value::list(vec![]);
        let alias = list.clone();
        call_method(&mut Ctxt::default(), &list, "append", vec![Value::Bool(true)], vec![]).unwrap();
        assert_eq!(alias.to_string(), "[True]");
    }
}
