//! Satisfiability and truth tables of propositional formulas.
//!
//! The propositional variables of a formula are its free symbols. Assigning a truth value to a
//! variable substitutes it and lets the canonical constructors fold the formula, so a partial
//! assignment can already decide it.

use super::expr::SymExpr;
use std::collections::BTreeMap;

/// Substitutes the truth values for their variables.
fn assign(expr: &SymExpr, model: &BTreeMap<String, bool>) -> SymExpr {
    model
        .iter()
        .fold(expr.clone(), |acc, (name, value)| acc.subs_symbol(name, &SymExpr::boolean(*value)))
}

fn search(expr: &SymExpr, variables: &[String], model: &mut BTreeMap<String, bool>) -> bool {
    match expr.as_boolean() {
        Some(value) => return value,
        None if variables.is_empty() => return false,
        None => {},
    }
    let (name, rest) = (&variables[0], &variables[1..]);
    for value in [true, false] {
        model.insert(name.clone(), value);
        let reduced = expr.subs_symbol(name, &SymExpr::boolean(value));
        if search(&reduced, rest, model) {
            return true;
        }
    }
    model.remove(name);
    false
}

/// Finds an assignment of truth values that makes the formula true, trying `True` before `False`
/// for each variable in alphabetical order. Variables the formula does not need are left out of
/// the model. Returns [`None`] if the formula is unsatisfiable.
pub fn satisfiable(expr: &SymExpr) -> Option<BTreeMap<String, bool>> {
    let variables = expr.free_symbols().into_iter().collect::<Vec<_>>();
    let mut model = BTreeMap::new();
    search(expr, &variables, &mut model).then_some(model)
}

/// One row of a truth table: the values of the variables, and the value of the formula.
#[derive(Debug, Clone, PartialEq)]
pub struct TruthRow {
    pub inputs: Vec<bool>,
    pub output: SymExpr,
}

/// Evaluates the formula for every assignment of the variables, starting with all of them
/// `False` and counting up in binary with the first variable as the most significant bit.
pub fn truth_table(expr: &SymExpr, variables: &[String]) -> Vec<TruthRow> {
    let count = variables.len();
    (0..1usize << count)
        .map(|row| {
            let inputs = (0..count).map(|i| row >> (count - 1 - i) & 1 == 1).collect::<Vec<_>>();
            let model = variables.iter().cloned().zip(inputs.iter().copied()).collect();
            TruthRow { output: assign(expr, &model), inputs }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    #[test]
    fn satisfying_models() {
        let both = SymExpr::and(vec![var("x"), var("y")]);
        let model = satisfiable(&both).unwrap();
        assert_eq!(model, BTreeMap::from([("x".to_string(), true), ("y".to_string(), true)]));

        let either = SymExpr::or(vec![var("x"), var("y")]);
        assert_eq!(satisfiable(&either).unwrap(), BTreeMap::from([("x".to_string(), true)]));

        let only_y = SymExpr::and(vec![SymExpr::not(var("x")), var("y")]);
        assert_eq!(
            satisfiable(&only_y).unwrap(),
            BTreeMap::from([("x".to_string(), false), ("y".to_string(), true)]),
        );
    }

    #[test]
    fn contradiction() {
        let contradiction = SymExpr::and(vec![SymExpr::xor(vec![var("x"), var("y")]), SymExpr::implies(var("x"), var("y")), var("x")]);
        assert_eq!(satisfiable(&contradiction), None);
    }

    #[test]
    fn table() {
        let formula = SymExpr::implies(var("p"), var("q"));
        let rows = truth_table(&formula, &["p".to_string(), "q".to_string()]);
        let outputs = rows.iter().map(|row| row.output.as_boolean()).collect::<Vec<_>>();
        assert_eq!(outputs, [Some(true), Some(true), Some(false), Some(true)]);
        assert_eq!(rows[2].inputs, [true, false]);
    }
}
