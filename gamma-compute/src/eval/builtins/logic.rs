//! Relations and Boolean logic.

use crate::eval::{
    ctxt::Ctxt,
    error::{invalid, BuiltinError},
    value::Value,
};
use crate::symbolic::{
    expr::RelOp,
    logic::{satisfiable as find_model, truth_table as table},
    SymExpr,
};
use super::{builtin, symbol_name, Args, Builtin, BuiltinKind};

/// The most variables a truth table may have.
const MAX_TABLE_VARIABLES: usize = 10;

/// `Eq(a, b)`, `Lt(a, b)`, and the other relations. `Eq(a)` is `Eq(a, 0)`.
fn relation(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    let op = match args.name {
        "Eq" => RelOp::Eq,
        "Ne" => RelOp::Ne,
        "Lt" => RelOp::Lt,
        "Le" => RelOp::Le,
        "Gt" => RelOp::Gt,
        _ => RelOp::Ge,
    };
    if op == RelOp::Eq {
        args.count(1, 2)?;
    } else {
        args.count(2, 2)?;
    }
    let rhs = if args.len() == 2 { args.expr(1)? } else { SymExpr::zero() };
    Ok(SymExpr::relational(op, args.expr(0)?, rhs).into())
}

/// `And(*args)`, `Or(*args)` and `Xor(*args)`.
fn connective(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    let items = args.exprs()?;
    Ok(match args.name {
        "And" => SymExpr::and(items),
        "Or" => SymExpr::or(items),
        _ => SymExpr::xor(items),
    }
    .into())
}

/// `Not(a)`
fn not(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    Ok(SymExpr::not(args.expr(0)?).into())
}

/// `Implies(a, b)`
fn implies(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(2, 2)?;
    Ok(SymExpr::implies(args.expr(0)?, args.expr(1)?).into())
}

/// `satisfiable(expr)`: a satisfying assignment as a dict, or `False`.
fn satisfiable(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 1)?;
    let expr = args.expr(0)?;
    Ok(match find_model(&expr) {
        Some(model) => Value::Dict(
            model
                .into_iter()
                .map(|(name, value)| (SymExpr::symbol(name).into(), Value::Bool(value)))
                .collect(),
        ),
        None => Value::Bool(false),
    })
}

/// `truth_table(expr, variables)`: a list of `([inputs], output)` tuples, inputs written as `0`
/// and `1`.
fn truth_table(_: &mut Ctxt, args: Args) -> Result<Value, BuiltinError> {
    args.count(1, 2)?;
    let expr = args.expr(0)?;
    let variables = match args.get(1) {
        Some(value) => value
            .sequence()
            .ok_or_else(|| args.type_error("a list of symbols", value))?
            .iter()
            .map(|var| symbol_name(var).ok_or_else(|| args.type_error("a symbol", var)))
            .collect::<Result<Vec<_>, _>>()?,
        None => expr.free_symbols().into_iter().collect(),
    };
    if variables.len() > MAX_TABLE_VARIABLES {
        return Err(invalid(format!("a truth table can have at most {} variables", MAX_TABLE_VARIABLES)));
    }

    let rows = table(&expr, &variables)
        .into_iter()
        .map(|row| {
            let inputs = row.inputs
                .into_iter()
                .map(|input| SymExpr::integer(input as i64).into())
                .collect();
            Value::Tuple(vec![Value::list(inputs), row.output.into()])
        })
        .collect();
    Ok(Value::list(rows))
}

pub(super) fn all() -> Vec<Builtin> {
    vec![
        builtin("Eq", BuiltinKind::Class, "Eq(a, b=0)\n\nThe equation a = b.", relation),
        builtin("Ne", BuiltinKind::Class, "Ne(a, b)\n\nThe relation a != b.", relation),
        builtin("Lt", BuiltinKind::Class, "Lt(a, b)\n\nThe relation a < b.", relation),
        builtin("Le", BuiltinKind::Class, "Le(a, b)\n\nThe relation a <= b.", relation),
        builtin("Gt", BuiltinKind::Class, "Gt(a, b)\n\nThe relation a > b.", relation),
        builtin("Ge", BuiltinKind::Class, "Ge(a, b)\n\nThe relation a >= b.", relation),
        builtin("And", BuiltinKind::Class, "And(*args)\n\nLogical conjunction: true when every argument is true.", connective),
        builtin("Or", BuiltinKind::Class, "Or(*args)\n\nLogical disjunction: true when any argument is true.", connective),
        builtin("Xor", BuiltinKind::Class, "Xor(*args)\n\nExclusive or: true when an odd number of the arguments are true.", connective),
        builtin("Not", BuiltinKind::Class, "Not(a)\n\nLogical negation.", not),
        builtin("Implies", BuiltinKind::Class, "Implies(a, b)\n\nLogical implication: false only when a is true and b is false.", implies),
        builtin(
            "satisfiable",
            BuiltinKind::Routine,
            "satisfiable(expr)\n\nAn assignment of truth values to the symbols of expr that makes it true, or False if there is none.",
            satisfiable,
        ),
        builtin(
            "truth_table",
            BuiltinKind::Routine,
            "truth_table(expr, variables)\n\nThe value of expr for every combination of values of the variables.",
            truth_table,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn call(f: fn(&mut Ctxt, Args) -> Result<Value, BuiltinError>, name: &'static str, positional: Vec<Value>) -> Value {
        f(&mut Ctxt::new(), Args { name, positional, keywords: vec![] }).unwrap()
    }

    #[test]
    fn models() {
        let (x, y) = (SymExpr::symbol("x"), SymExpr::symbol("y"));
        let formula = SymExpr::and(vec![x.clone(), SymExpr::not(y.clone())]);
        assert_eq!(call(satisfiable, "satisfiable", vec![formula.into()]).to_string(), "{x: True, y: False}");
        let contradiction = SymExpr::and(vec![x.clone(), SymExpr::not(x)]);
        assert_eq!(call(satisfiable, "satisfiable", vec![contradiction.into()]), Value::Bool(false));
    }

    #[test]
    fn table_rows() {
        let formula = SymExpr::or(vec![SymExpr::symbol("p"), SymExpr::symbol("q")]);
        let rows = call(truth_table, "truth_table", vec![formula.into()]);
        assert_eq!(
            rows.to_string(),
            "[([0, 0], False), ([0, 1], True), ([1, 0], True), ([1, 1], True)]",
        );
    }

    #[test]
    fn equation_default_side() {
        let eq = call(relation, "Eq", vec![SymExpr::symbol("x").into()]);
        assert_eq!(eq.to_string(), "Eq(x, 0)");
    }
}
