//! General-purpose builtins: printing, documentation, sequences and conversions.

use crate::eval::{
    ctxt::Ctxt,
    error::{invalid, BuiltinError, LoopLimit},
    value::Value,
};
use crate::symbolic::{expr::order::cmp_exprs, SymExpr};
use std::cmp::Ordering;
use super::{builtin, construct, Args, Builtin, BuiltinKind};

/// `print(*args)`
fn print(ctxt: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.keywords_in(&[])?;
    let line = args.positional.iter().map(Value::to_str).collect::<Vec<_>>().join(" ");
    ctxt.write_line(&line);
    Ok(Value::None)
}

/// `help(obj)`
fn help(ctxt: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    let value = &args.positional[0];
    match value.doc() {
        Some(doc) => ctxt.write_line(doc),
        None => ctxt.write_line(&format!("No documentation is available for {}.", value)),
    }
    Ok(Value::None)
}

/// `len(seq)`
fn len(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    let len = match &args.positional[0] {
        Value::Str(s) => s.chars().count(),
        Value::Dict(entries) => entries.len(),
        other => other.sequence().ok_or_else(|| args.type_error("a sequence", other))?.len(),
    };
    Ok(SymExpr::integer(len as u64).into())
}

/// `range(stop)`, `range(start, stop)` or `range(start, stop, step)`.
fn range(ctxt: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 3)?;
    let (start, stop, step) = match args.len() {
        1 => (0, args.int(0)?, 1),
        2 => (args.int(0)?, args.int(1)?, 1),
        _ => (args.int(0)?, args.int(1)?, args.int(2)?),
    };
    if step == 0 {
        return Err(invalid("range() step must not be zero"));
    }

    let (start, stop, step) = (start as i128, stop as i128, step as i128);
    let len = if step > 0 {
        (stop - start + step - 1).max(0) / step
    } else {
        (start - stop - step - 1).max(0) / -step
    };
    let max = ctxt.limits.max_loop_iterations;
    if len > max as i128 {
        return Err(LoopLimit { max_iterations: max }.into());
    }
    let items = (0..len).map(|i| SymExpr::integer((start + i * step) as i64).into()).collect();
    Ok(Value::list(items))
}

/// Collects the items of an iterable: a list, tuple, dict (its keys) or string.
pub(crate) fn iterate(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Str(s) => Some(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        Value::Dict(entries) => Some(entries.iter().map(|(key, _)| key.clone()).collect()),
        other => other.sequence(),
    }
}

/// `list(iterable)` and `tuple(iterable)`.
fn sequence(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(0, 1)?;
    let items = match args.get(0) {
        Some(value) => iterate(value).ok_or_else(|| args.type_error("an iterable", value))?,
        None => Vec::new(),
    };
    Ok(if args.name == "list" { Value::list(items) } else { Value::Tuple(items) })
}

/// `str(x)`
fn to_str(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    Ok(Value::Str(args.positional[0].to_str()))
}

/// `repr(x)`
fn repr(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    Ok(Value::Str(args.positional[0].to_string()))
}

/// `latex(x)`
fn latex(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    Ok(Value::Str(args.positional[0].latex()))
}

/// Orders two values: numbers by value, strings alphabetically, other expressions canonically.
fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        (a, b) => match (a.to_expr(), b.to_expr()) {
            (Some(a), Some(b)) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x.cmp_value(&y),
                _ => cmp_exprs(&a, &b),
            },
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}

/// `sorted(iterable)`
fn sorted(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    args.keywords_in(&["reverse"])?;
    let value = &args.positional[0];
    let mut items = iterate(value).ok_or_else(|| args.type_error("an iterable", value))?;
    items.sort_by(cmp_values);
    if matches!(args.keyword("reverse"), Some(Value::Bool(true))) {
        items.reverse();
    }
    Ok(Value::list(items))
}

/// `abs(x)`
fn abs(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    Ok(SymExpr::call1("Abs", args.expr(0)?).into())
}

/// `min(*args)` and `max(*args)`, or of a single list.
fn extremum(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, usize::MAX)?;
    let items = match args.positional.as_slice() {
        [single] if single.sequence().is_some() => single.sequence().unwrap_or_default(),
        items => items.to_vec(),
    };
    if items.is_empty() {
        return Err(invalid(format!("{}() of an empty sequence", args.name)));
    }
    let exprs = items
        .iter()
        .map(|item| item.to_expr().ok_or_else(|| args.type_error("an expression", item)))
        .collect::<Result<Vec<_>, _>>()?;
    let name = if args.name == "min" { "Min" } else { "Max" };
    Ok(SymExpr::call(name, exprs).into())
}

pub(super) fn all() -> Vec<Builtin> {
    vec![
        builtin("print", BuiltinKind::Routine, "print(*values)\n\nWrites the values to the output, separated by spaces.", print),
        builtin("help", BuiltinKind::Routine, "help(obj)\n\nWrites the documentation of a function or class to the output.", help),
        builtin("len", BuiltinKind::Routine, "len(seq)\n\nThe number of items in a list, tuple, dict or string.", len),
        builtin("range", BuiltinKind::Routine, "range(start=0, stop, step=1)\n\nThe list of integers from start up to, but not including, stop.", range),
        builtin("list", BuiltinKind::Class, "list(iterable)\n\nA list of the items of iterable.", sequence),
        builtin("tuple", BuiltinKind::Class, "tuple(iterable)\n\nA tuple of the items of iterable.", sequence),
        builtin("str", BuiltinKind::Class, "str(x)\n\nThe text form of x.", to_str),
        builtin("repr", BuiltinKind::Routine, "repr(x)\n\nThe representation of x, which reads back as the same value.", repr),
        builtin("latex", BuiltinKind::Routine, "latex(x)\n\nThe LaTeX form of x.", latex),
        builtin("sorted", BuiltinKind::Routine, "sorted(iterable, reverse=False)\n\nA sorted list of the items of iterable.", sorted),
        builtin("abs", BuiltinKind::Routine, "abs(x)\n\nThe absolute value of x.", abs),
        builtin("int", BuiltinKind::Class, "int(x)\n\nConverts x to an integer, rounding towards zero.", construct::integer),
        builtin("float", BuiltinKind::Class, "float(x)\n\nConverts x to a floating-point number.", construct::float),
        builtin("min", BuiltinKind::Routine, "min(*args)\n\nThe smallest of the arguments.", extremum),
        builtin("max", BuiltinKind::Routine, "max(*args)\n\nThe largest of the arguments.", extremum),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn call(f: fn(&mut Ctxt, Args) -> Result<Value, BuiltinError>, name: &'static str, positional: Vec<Value>) -> Result<Value, BuiltinError> {
        f(&mut Ctxt::new(), Args { name, positional, keywords: vec![] })
    }

    fn int(n: i64) -> Value {
        SymExpr::integer(n).into()
    }

    #[test]
    fn ranges() {
        assert_eq!(call(range, "range", vec![int(3)]).unwrap().to_string(), "[0, 1, 2]");
        assert_eq!(call(range, "range", vec![int(5), int(0), int(-2)]).unwrap().to_string(), "[5, 3, 1]");
        assert_eq!(call(range, "range", vec![int(2), int(1)]).unwrap().to_string(), "[]");
        assert!(call(range, "range", vec![int(0), int(1), int(0)]).is_err());
        assert!(call(range, "range", vec![int(1_000_000_000)]).is_err());
    }

    #[test]
    fn sorting() {
        let list = Value::list(vec![int(3), SymExpr::rational(1, 2).into(), int(-1)]);
        assert_eq!(call(sorted, "sorted", vec![list]).unwrap().to_string(), "[-1, 1/2, 3]");
    }

    #[test]
    fn printing() {
        let mut ctxt = Ctxt::new();
        print(&mut ctxt, Args { name: "print", positional: vec![Value::from("a"), int(1)], keywords: vec![] }).unwrap();
        assert_eq!(ctxt.take_output(), "a 1\n");
    }

    #[test]
    fn extremes() {
        assert_eq!(call(extremum, "max", vec![int(2), int(7), int(-3)]).unwrap(), int(7));
        assert_eq!(call(extremum, "min", vec![Value::list(vec![int(2), int(7)])]).unwrap(), int(2));
    }
}
