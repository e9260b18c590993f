use crate::symbolic::{print::latex, SymExpr};
use gamma_parser::parser::ast::Block;
use std::{cell::RefCell, fmt::{self, Display, Formatter}, rc::Rc};
use super::builtins::{Builtin, BuiltinKind};

/// A function defined with `def`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunc {
    /// The name of the function.
    pub name: String,

    /// The parameters, with the default values evaluated when the function was defined.
    pub params: Vec<(String, Option<Value>)>,

    /// The body of the function.
    pub body: Rc<Block>,
}

/// Represents any value a program can produce.
#[derive(Debug, Clone)]
pub enum Value {
    /// A symbolic expression. Numbers, symbols, relations and logic all live here.
    Expr(SymExpr),

    /// A plain boolean, such as the result of `x == y`.
    Bool(bool),

    /// A string.
    Str(String),

    /// `None`.
    None,

    /// A list of values.
    ///
    /// Lists are references to a vector of values, so `b = a` followed by `b.append(1)` changes
    /// `a` too.
    List(Rc<RefCell<Vec<Value>>>),

    /// An immutable sequence of values.
    Tuple(Vec<Value>),

    /// A mapping, kept in insertion order.
    Dict(Vec<(Value, Value)>),

    /// A builtin function or class.
    Builtin(&'static Builtin),

    /// A function defined with `def`.
    Function(Rc<UserFunc>),

    /// An undefined function such as `Function('f')`. Calling it builds the applied function
    /// `f(x)`.
    UndefFunction(String),

    /// A method of a value, such as `expr.subs`.
    BoundMethod(Box<Value>, String),
}

impl Value {
    /// Creates a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// Returns the typename of this value.
    pub fn typename(&self) -> String {
        match self {
            Value::Expr(expr) => expr.class_name(),
            Value::Bool(_) => "bool".to_string(),
            Value::Str(_) => "str".to_string(),
            Value::None => "NoneType".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Tuple(_) => "tuple".to_string(),
            Value::Dict(_) => "dict".to_string(),
            Value::Builtin(builtin) => match builtin.kind {
                BuiltinKind::Routine => "function".to_string(),
                BuiltinKind::MathFunction | BuiltinKind::Class => "type".to_string(),
            },
            Value::Function(_) => "function".to_string(),
            Value::UndefFunction(_) => "UndefinedFunction".to_string(),
            Value::BoundMethod(..) => "method".to_string(),
        }
    }

    /// Converts the value to a symbolic expression, if it is one. Booleans become `True` and
    /// `False`.
    pub fn to_expr(&self) -> Option<SymExpr> {
        match self {
            Value::Expr(expr) => Some(expr.clone()),
            Value::Bool(b) => Some(SymExpr::boolean(*b)),
            _ => None,
        }
    }

    /// Returns the expression if the value is one, without conversion.
    pub fn as_expr(&self) -> Option<&SymExpr> {
        match self {
            Value::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Returns the items of a list or tuple.
    pub fn sequence(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.borrow().clone()),
            Value::Tuple(items) => Some(items.clone()),
            _ => None,
        }
    }

    /// Returns true if calling the value makes sense.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Builtin(_) | Value::Function(_) | Value::UndefFunction(_) | Value::BoundMethod(..)
        )
    }

    /// The documentation of the value: for builtins their own, for expressions the documentation
    /// of the function or class they are an instance of.
    pub fn doc(&self) -> Option<&'static str> {
        match self {
            Value::Builtin(builtin) => Some(builtin.doc),
            Value::Expr(expr) => super::builtins::get(&expr.class_name()).map(|builtin| builtin.doc),
            _ => None,
        }
    }

    /// Renders the value as LaTeX.
    pub fn latex(&self) -> String {
        match self {
            Value::Expr(expr) => latex(expr),
            Value::Bool(b) => format!("\\text{{{}}}", if *b { "True" } else { "False" }),
            Value::Str(s) => format!("\\mathtt{{\\text{{{}}}}}", s),
            Value::None => "\\text{None}".to_string(),
            Value::List(items) => format!("\\left[ {}\\right]", latex_items(&items.borrow())),
            Value::Tuple(items) => format!("\\left( {}\\right)", latex_items(items)),
            Value::Dict(entries) => {
                let entries = entries
                    .iter()
                    .map(|(key, value)| format!("{} : {}", key.latex(), value.latex()))
                    .collect::<Vec<_>>();
                format!("\\left\\{{ {}\\right\\}}", entries.join(", "))
            },
            Value::Builtin(builtin) => format!("\\operatorname{{{}}}", builtin.name),
            Value::Function(func) => format!("\\operatorname{{{}}}", func.name),
            Value::UndefFunction(name) => name.clone(),
            Value::BoundMethod(_, name) => format!("\\operatorname{{{}}}", name),
        }
    }

    /// The text `str()` produces: like the representation, but strings are not quoted.
    pub fn to_str(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

fn latex_items(items: &[Value]) -> String {
    items.iter().map(Value::latex).collect::<Vec<_>>().join(", ")
}

fn join(items: &[Value]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Formats the value the way `repr()` does.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Expr(expr) => write!(f, "{}", expr),
            Value::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
            Value::Str(s) => {
                if s.contains('\'') {
                    write!(f, "\"{}\"", s)
                } else {
                    write!(f, "'{}'", s)
                }
            },
            Value::None => f.write_str("None"),
            Value::List(items) => write!(f, "[{}]", join(&items.borrow())),
            Value::Tuple(items) => match items.as_slice() {
                [single] => write!(f, "({},)", single),
                items => write!(f, "({})", join(items)),
            },
            Value::Dict(entries) => {
                let entries = entries
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<_>>();
                write!(f, "{{{}}}", entries.join(", "))
            },
            Value::Builtin(builtin) => match builtin.kind {
                BuiltinKind::Routine => write!(f, "<function {}>", builtin.name),
                BuiltinKind::MathFunction | BuiltinKind::Class => f.write_str(builtin.name),
            },
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::UndefFunction(name) => f.write_str(name),
            Value::BoundMethod(receiver, name) => write!(f, "<bound method {}.{}>", receiver, name),
        }
    }
}

/// Structural equality, as used by `==` and to tell results apart.
///
/// A boolean equals the corresponding symbolic `True` or `False`, and lists equal tuples with the
/// same items only if both are lists or both are tuples.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Expr(a), Value::Expr(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Bool(a), Value::Expr(b)) | (Value::Expr(b), Value::Bool(a)) => {
                b.as_boolean() == Some(*a)
            },
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::List(a), Value::List(b)) => *a.borrow() == *b.borrow(),
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len() && a.iter().all(|entry| b.contains(entry))
            },
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::UndefFunction(a), Value::UndefFunction(b)) => a == b,
            (Value::BoundMethod(a, m), Value::BoundMethod(b, n)) => a == b && m == n,
            _ => false,
        }
    }
}

impl From<SymExpr> for Value {
    fn from(expr: SymExpr) -> Self {
        Value::Expr(expr)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn representations() {
        let x = Value::Expr(SymExpr::symbol("x"));
        assert_eq!(x.to_string(), "x");
        assert_eq!(Value::Str("x".to_string()).to_string(), "'x'");
        assert_eq!(Value::Str("x".to_string()).to_str(), "x");
        assert_eq!(Value::Tuple(vec![x.clone()]).to_string(), "(x,)");
        assert_eq!(Value::list(vec![x.clone(), Value::Bool(true)]).to_string(), "[x, True]");
        let dict = Value::Dict(vec![(x, Value::Expr(SymExpr::integer(2)))]);
        assert_eq!(dict.to_string(), "{x: 2}");
    }

    #[test]
    fn structural_equality() {
        assert_eq!(Value::Bool(true), Value::Expr(SymExpr::boolean(true)));
        assert_ne!(Value::list(vec![]), Value::Tuple(vec![]));
        let a = Value::Dict(vec![(Value::from("a"), Value::Bool(true)), (Value::from("b"), Value::None)]);
        let b = Value::Dict(vec![(Value::from("b"), Value::None), (Value::from("a"), Value::Bool(true))]);
        assert_eq!(a, b);
    }
}
