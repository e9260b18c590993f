//! Errors raised while evaluating a program.

use ariadne::Fmt;
use gamma_attrs::ErrorKind;
use gamma_error::{Error, ErrorKind, EXPR};
use std::ops::Range;

/// The name is not bound in the namespace.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("name '{}' is not defined", self.name),
    labels = ["this name"],
    help = if self.suggestions.is_empty() {
        format!("to define it, type: {} = {}", (&self.name).fg(EXPR), "<expression>".fg(EXPR))
    } else {
        format!(
            "did you mean: {}",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    },
    category = Name,
)]
pub struct UndefinedName {
    /// The name that was looked up.
    pub name: String,

    /// Similarly spelled names that are defined.
    pub suggestions: Vec<String>,
}

/// An operator was applied to operands it does not support.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unsupported operand type(s) for {}: '{}' and '{}'", self.op, self.left, self.right),
    labels = ["this expression"],
    category = Type,
)]
pub struct InvalidBinaryOperation {
    pub op: &'static str,
    pub left: String,
    pub right: String,
}

/// A unary operator was applied to an operand it does not support.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("bad operand type for unary {}: '{}'", self.op, self.operand),
    labels = ["this expression"],
    category = Type,
)]
pub struct InvalidUnaryOperation {
    pub op: &'static str,
    pub operand: String,
}

/// A value that cannot be called was called.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("'{}' object is not callable", self.typename),
    labels = ["this call"],
    category = Type,
)]
pub struct NotCallable {
    pub typename: String,
}

/// The value has no attribute with that name.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("'{}' object has no attribute '{}'", self.typename, self.attr),
    labels = ["this attribute"],
    category = Type,
)]
pub struct NoAttribute {
    pub typename: String,
    pub attr: String,
}

/// A function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("{}() takes {} argument(s) ({} given)", self.name, self.expected, self.given),
    labels = ["this call"],
    category = Type,
)]
pub struct WrongArgumentCount {
    pub name: String,

    /// The accepted number of arguments, such as `1` or `1 to 3`.
    pub expected: String,

    pub given: usize,
}

/// A function was called with a keyword argument it does not take.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("{}() got an unexpected keyword argument '{}'", self.name, self.keyword),
    labels = ["this call"],
    category = Type,
)]
pub struct UnexpectedKeyword {
    pub name: String,
    pub keyword: String,
}

/// A parameter received both a positional and a keyword argument.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("{}() got multiple values for argument '{}'", self.name, self.param),
    labels = ["this call"],
    category = Type,
)]
pub struct DuplicateArgument {
    pub name: String,
    pub param: String,
}

/// An argument has the wrong type.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("{}() expected {}, got '{}'", self.name, self.expected, self.found),
    labels = ["this call"],
    category = Type,
)]
pub struct ArgumentType {
    pub name: String,
    pub expected: &'static str,
    pub found: String,
}

/// An argument has the right type but a value the operation cannot use.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = self.reason.clone(),
    labels = ["this call"],
    category = Value,
)]
pub struct InvalidValue {
    pub reason: String,
}

/// The operation is not implemented for its arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = self.reason.clone(),
    labels = ["this call"],
    category = NotImplemented,
)]
pub struct NotImplemented {
    pub reason: String,
}

/// Integer division or modulo by zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "integer division or modulo by zero",
    labels = ["this expression"],
    category = ZeroDivision,
)]
pub struct DivisionByZero;

/// The truth value of an expression that is neither true nor false was needed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot determine truth value of {}", self.class),
    labels = ["this condition"],
    category = Type,
)]
pub struct UndecidableTruth {
    pub class: String,
}

/// The value cannot be iterated over.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("'{}' object is not iterable", self.typename),
    labels = ["this value"],
    category = Type,
)]
pub struct NotIterable {
    pub typename: String,
}

/// Unpacking into names got the wrong number of values.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot unpack {} value(s) into {} name(s)", self.given, self.expected),
    labels = ["this assignment"],
    category = Value,
)]
pub struct UnpackMismatch {
    pub expected: usize,
    pub given: usize,
}

/// A key is missing from a dictionary.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = self.key.clone(), labels = ["this key"], category = Key)]
pub struct MissingKey {
    /// The representation of the key.
    pub key: String,
}

/// A sequence index is out of range.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("index {} is out of range for a sequence of length {}", self.index, self.len),
    labels = ["this index"],
    category = Index,
)]
pub struct IndexOutOfRange {
    pub index: i64,
    pub len: usize,
}

/// The value cannot be indexed with `[]`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("'{}' object is not subscriptable", self.typename),
    labels = ["this value"],
    category = Type,
)]
pub struct NotSubscriptable {
    pub typename: String,
}

/// `return` appeared outside of a function body.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "'return' outside function", labels = ["this statement"], category = Syntax)]
pub struct ReturnOutsideFunction;

/// User functions called each other too deeply.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "maximum recursion depth exceeded",
    labels = ["this function call"],
    help = format!("the maximum depth is {}", self.max_depth),
    category = Recursion,
)]
pub struct RecursionLimit {
    pub max_depth: usize,
}

/// The evaluation used up its step budget.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("evaluation took more than {} steps", self.max_steps),
    labels = ["while evaluating this"],
    category = Timeout,
)]
pub struct StepLimit {
    pub max_steps: usize,
}

/// A loop ran for too many iterations.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("loop ran for more than {} iterations", self.max_iterations),
    labels = ["this loop"],
    category = Timeout,
)]
pub struct LoopLimit {
    pub max_iterations: usize,
}

/// An error raised inside a builtin function, before the location of the call is known.
#[derive(Debug)]
pub struct BuiltinError {
    kind: Box<dyn ErrorKind>,
}

impl BuiltinError {
    /// Attaches the span of the call that raised the error.
    pub fn into_error(self, span: Range<usize>) -> Error {
        Error { spans: vec![span], kind: self.kind }
    }
}

impl<K: ErrorKind + 'static> From<K> for BuiltinError {
    fn from(kind: K) -> Self {
        Self { kind: Box::new(kind) }
    }
}

/// Shorthand for a [`ValueError`](gamma_error::Category::Value) raised by a builtin.
pub fn invalid(reason: impl Into<String>) -> BuiltinError {
    InvalidValue { reason: reason.into() }.into()
}

/// Shorthand for a [`NotImplementedError`](gamma_error::Category::NotImplemented) raised by a
/// builtin.
pub fn not_implemented(reason: impl Into<String>) -> BuiltinError {
    NotImplemented { reason: reason.into() }.into()
}
