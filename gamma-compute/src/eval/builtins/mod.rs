//! The functions, classes and constants a fresh namespace starts with.
//!
//! Every builtin is a plain [`Builtin`] record in one registry, keyed by name. The evaluator only
//! ever calls builtins from that registry, so the registry is the complete list of what a program
//! can do besides arithmetic.

mod algebra;
mod calculus;
mod construct;
pub(crate) mod general;
mod logic;
mod math;

use crate::symbolic::{expr::Limit, SymExpr};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use super::{
    ctxt::Ctxt,
    error::{invalid, ArgumentType, BuiltinError, UnexpectedKeyword, WrongArgumentCount},
    value::Value,
};

/// What kind of callable a builtin is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    /// A mathematical function such as `sin`, which builds an expression when applied.
    MathFunction,

    /// A class such as `Symbol` or `Integral`, which constructs a value.
    Class,

    /// A plain routine such as `diff` or `factorint`.
    Routine,
}

/// The signature of the Rust function implementing a builtin.
pub type BuiltinFn = fn(&mut Ctxt, Args) -> Result<Value, BuiltinError>;

/// A builtin function.
#[derive(Debug)]
pub struct Builtin {
    /// The name the builtin is bound to.
    pub name: &'static str,

    /// What kind of callable it is.
    pub kind: BuiltinKind,

    /// The documentation shown by `help` and the documentation card.
    pub doc: &'static str,

    /// The implementation.
    pub func: BuiltinFn,
}

impl Builtin {
    /// Calls the builtin.
    pub fn call(&'static self, ctxt: &mut Ctxt, positional: Vec<Value>, keywords: Vec<(String, Value)>) -> Result<Value, BuiltinError> {
        (self.func)(ctxt, Args { name: self.name, positional, keywords })
    }
}

/// The arguments a builtin was called with.
#[derive(Debug, Clone)]
pub struct Args {
    /// The name the builtin was called as.
    pub name: &'static str,
    pub positional: Vec<Value>,
    pub keywords: Vec<(String, Value)>,
}

impl Args {
    /// The number of positional arguments.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    /// Checks that between `min` and `max` positional arguments were given.
    pub fn count(&self, min: usize, max: usize) -> Result<(), BuiltinError> {
        let given = self.len();
        if (min..=max).contains(&given) {
            return Ok(());
        }
        let expected = if min == max {
            min.to_string()
        } else if max == usize::MAX {
            format!("at least {}", min)
        } else {
            format!("{} to {}", min, max)
        };
        Err(WrongArgumentCount { name: self.name.to_string(), expected, given }.into())
    }

    /// Checks that no keyword arguments other than the given ones were passed.
    pub fn keywords_in(&self, allowed: &[&str]) -> Result<(), BuiltinError> {
        match self.keywords.iter().find(|(name, _)| !allowed.contains(&name.as_str())) {
            Some((name, _)) => Err(UnexpectedKeyword { name: self.name.to_string(), keyword: name.clone() }.into()),
            None => Ok(()),
        }
    }

    /// Returns the keyword argument with the given name.
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Returns the positional argument at the given index.
    pub fn get(&self, i: usize) -> Option<&Value> {
        self.positional.get(i)
    }

    /// Returns the positional argument at the given index as an expression.
    pub fn expr(&self, i: usize) -> Result<SymExpr, BuiltinError> {
        let value = self.positional.get(i).unwrap_or(&Value::None);
        value.to_expr().ok_or_else(|| self.type_error("an expression", value))
    }

    /// Returns all positional arguments as expressions.
    pub fn exprs(&self) -> Result<Vec<SymExpr>, BuiltinError> {
        (0..self.len()).map(|i| self.expr(i)).collect()
    }

    /// Returns the positional argument at the given index as the name of a symbol.
    pub fn symbol(&self, i: usize) -> Result<String, BuiltinError> {
        let value = self.positional.get(i).unwrap_or(&Value::None);
        symbol_name(value).ok_or_else(|| self.type_error("a symbol", value))
    }

    /// Returns the positional argument at the given index as a machine integer.
    pub fn int(&self, i: usize) -> Result<i64, BuiltinError> {
        let value = self.positional.get(i).unwrap_or(&Value::None);
        value
            .as_expr()
            .and_then(SymExpr::as_i64)
            .ok_or_else(|| self.type_error("an integer", value))
    }

    /// The error for an argument of the wrong type.
    pub fn type_error(&self, expected: &'static str, found: &Value) -> BuiltinError {
        ArgumentType { name: self.name.to_string(), expected, found: found.typename() }.into()
    }

    /// The variable an operation on `expr` works with when none was given: its only free symbol.
    pub fn implied_symbol(&self, expr: &SymExpr) -> Result<String, BuiltinError> {
        let symbols = expr.free_symbols();
        match symbols.len() {
            0 => Ok("x".to_string()),
            1 => Ok(symbols.into_iter().next().unwrap_or_default()),
            _ => Err(invalid(format!(
                "{}() needs the variable to be given, since {} has the free symbols {}",
                self.name,
                expr,
                symbols.into_iter().collect::<Vec<_>>().join(", "),
            ))),
        }
    }

    /// Reads the ranges passed after the expression in `integrate(f, x, (y, 0, 1))` or
    /// `Sum(f, (k, 1, n))`. A bare symbol is an indefinite range.
    pub fn limits(&self, start: usize) -> Result<Vec<Limit>, BuiltinError> {
        self.positional[start.min(self.len())..]
            .iter()
            .map(|value| limit_of(value).ok_or_else(|| self.type_error("a symbol or a (symbol, lower, upper) tuple", value)))
            .collect()
    }
}

/// Returns the name of a symbol value.
pub fn symbol_name(value: &Value) -> Option<String> {
    value.as_expr().and_then(SymExpr::as_symbol).map(str::to_string)
}

/// Reads one integration or summation range.
fn limit_of(value: &Value) -> Option<Limit> {
    if let Some(name) = symbol_name(value) {
        return Some(Limit::indefinite(name));
    }
    match value.sequence()?.as_slice() {
        [var] => Some(Limit::indefinite(symbol_name(var)?)),
        [var, lower, upper] => Some(Limit::definite(symbol_name(var)?, lower.to_expr()?, upper.to_expr()?)),
        _ => None,
    }
}

/// Builds a registry entry.
fn builtin(name: &'static str, kind: BuiltinKind, doc: &'static str, func: BuiltinFn) -> Builtin {
    Builtin { name, kind, doc, func }
}

/// All builtins, keyed by name.
static BUILTINS: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    math::all()
        .into_iter()
        .chain(construct::all())
        .chain(calculus::all())
        .chain(algebra::all())
        .chain(logic::all())
        .chain(general::all())
        .map(|builtin| (builtin.name, builtin))
        .collect()
});

/// Returns the builtin with the given name.
pub fn get(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

/// Returns every builtin.
pub fn all() -> impl Iterator<Item = &'static Builtin> {
    BUILTINS.values()
}

/// The constants a fresh namespace starts with.
pub fn constants() -> Vec<(&'static str, SymExpr)> {
    use crate::symbolic::expr::Constant;
    vec![
        ("pi", SymExpr::pi()),
        ("E", SymExpr::e()),
        ("I", SymExpr::i()),
        ("oo", SymExpr::constant(Constant::Infinity)),
        ("zoo", SymExpr::zoo()),
        ("nan", SymExpr::nan()),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn registry() {
        assert_eq!(get("sin").map(|b| b.kind), Some(BuiltinKind::MathFunction));
        assert_eq!(get("Symbol").map(|b| b.kind), Some(BuiltinKind::Class));
        assert_eq!(get("diff").map(|b| b.kind), Some(BuiltinKind::Routine));
        assert!(get("import").is_none());
        assert!(all().all(|b| !b.doc.is_empty()));
    }

    #[test]
    fn limits() {
        let args = Args {
            name: "integrate",
            positional: vec![
                Value::Expr(SymExpr::symbol("x")),
                Value::Expr(SymExpr::symbol("x")),
                Value::Tuple(vec![
                    Value::Expr(SymExpr::symbol("y")),
                    Value::Expr(SymExpr::zero()),
                    Value::Expr(SymExpr::one()),
                ]),
            ],
            keywords: vec![],
        };
        let limits = args.limits(1).unwrap();
        assert_eq!(limits, vec![
            Limit::indefinite("x"),
            Limit::definite("y", SymExpr::zero(), SymExpr::one()),
        ]);
        assert!(args.limits(0).is_ok());
        assert!(args.int(0).is_err());
    }
}
