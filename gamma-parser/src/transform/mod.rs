//! Turns loosely written math into canonical expression source.
//!
//! The pipeline works on a flat stream of [`Tok`]s and never builds a syntax tree. Each pass takes
//! the stream produced by the previous one, so the order of [`PIPELINE`] matters: synonyms must be
//! replaced before unknown names are turned into symbols, and `^` must become `**` before the
//! implicit passes look for exponents.
//!
//! ```
//! use gamma_parser::transform::{remove_constructors, stringify, Binding};
//!
//! let names = |name: &str| match name {
//!     "diff" | "cos" | "Symbol" | "Integer" => Some(Binding::Callable),
//!     _ => None,
//! };
//! let canonical = stringify("derivative(cos(x)^7, x)", &names).unwrap();
//! assert_eq!(canonical, "diff(cos(Symbol('x'))**Integer(7), Symbol('x'))");
//! assert_eq!(remove_constructors(&canonical), "diff(cos(x)**7, x)");
//! ```

pub mod error;
pub mod implicit;
pub mod output;
pub mod standard;

use crate::{
    parser::error::Error,
    tokenizer::{tokenize_complete, TokenKind},
};
use error::TokenError;
use tracing::trace;

pub use output::{remove_constructors, untokenize};

/// What a name refers to in the namespace the transformed source will be evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Something that can be called, such as `sin` or `Symbol`. Symbols themselves never count as
    /// callable here, even though calling one creates an undefined function.
    Callable,

    /// Any other value, such as `pi` or `E`.
    Value,
}

/// Looks up names while transforming.
pub trait Resolve {
    /// Returns what the name is bound to, or [`None`] if it is not defined.
    fn resolve(&self, name: &str) -> Option<Binding>;

    /// Returns true if the name is bound to something callable.
    fn is_callable(&self, name: &str) -> bool {
        self.resolve(name) == Some(Binding::Callable)
    }
}

impl<F> Resolve for F
where
    F: Fn(&str) -> Option<Binding>,
{
    fn resolve(&self, name: &str) -> Option<Binding> {
        self(name)
    }
}

/// The category of a [`Tok`], in the coarse sense the passes care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A name or keyword. The quoted name produced for a new symbol is also a `Name`, which is how
    /// [`implicit::split_symbols`] tells it apart from a string the user typed.
    Name,

    /// An integer or decimal number.
    Number,

    /// A string literal.
    Str,

    /// Any operator or bracket.
    Op,

    /// A line break.
    NewLine,

    /// The end of the stream. Always the last token.
    End,
}

/// An owned token that the transform passes can freely rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tok {
    /// The category of the token.
    pub kind: Kind,

    /// The source text of the token.
    pub text: String,
}

impl Tok {
    pub fn new(kind: Kind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn name(text: impl Into<String>) -> Self {
        Self::new(Kind::Name, text)
    }

    pub fn op(text: impl Into<String>) -> Self {
        Self::new(Kind::Op, text)
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self::new(Kind::Number, text)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(Kind::Str, text)
    }

    pub fn end() -> Self {
        Self::new(Kind::End, "")
    }

    /// Returns true if this is the given operator.
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == Kind::Op && self.text == op
    }

    /// Returns true if this is a name that is not a keyword.
    pub fn is_word(&self) -> bool {
        self.kind == Kind::Name && !crate::tokenizer::is_keyword(&self.text)
    }
}

/// Returns the tokens of a constructor call with a single argument, such as `Symbol('x')`.
pub(crate) fn constructor(name: &str, arg: Tok) -> [Tok; 4] {
    [Tok::name(name), Tok::op("("), arg, Tok::op(")")]
}

/// A single pass of the pipeline.
pub type Pass = fn(Vec<Tok>, &dyn Resolve) -> Result<Vec<Tok>, Error>;

/// The passes run by [`stringify`], in order.
pub const PIPELINE: &[(&str, Pass)] = &[
    ("synonyms", standard::synonyms),
    ("auto_symbol", standard::auto_symbol),
    ("auto_number", standard::auto_number),
    ("factorial_notation", standard::factorial_notation),
    ("convert_xor", standard::convert_xor),
    ("split_symbols", implicit::split_symbols),
    ("implicit_multiplication", implicit::implicit_multiplication),
    ("implicit_application", implicit::implicit_application),
    ("function_exponentiation", implicit::function_exponentiation),
];

/// Splits the input into owned tokens, dropping whitespace and comments and appending
/// [`Kind::End`]. Characters that do not start any token are token errors.
pub fn lex(input: &str) -> Result<Vec<Tok>, Error> {
    let tokens = match tokenize_complete(input) {
        Ok(tokens) => tokens,
        Err(err) => {
            let reason = err.message();
            return Err(Error::new(err.spans, TokenError::new(reason)));
        },
    };

    let mut out = tokens
        .iter()
        .filter_map(|token| {
            let kind = match token.kind {
                TokenKind::Whitespace | TokenKind::Comment => return None,
                TokenKind::Name => Kind::Name,
                TokenKind::Int | TokenKind::Float => Kind::Number,
                TokenKind::Str => Kind::Str,
                TokenKind::NewLine => Kind::NewLine,
                _ => Kind::Op,
            };
            Some(Tok::new(kind, token.lexeme))
        })
        .collect::<Vec<_>>();
    out.push(Tok::end());
    Ok(out)
}

/// Runs the whole pipeline over the input and returns the canonical source text.
///
/// Any error returned by this function is a token error: the input is not something an
/// expression can be built from. Errors in the canonical text itself are only found when it is
/// parsed.
pub fn stringify(input: &str, names: &dyn Resolve) -> Result<String, Error> {
    let mut tokens = lex(input.trim())?;
    for (name, pass) in PIPELINE {
        tokens = pass(tokens, names)?;
        trace!(pass = name, tokens = tokens.len(), "transform pass");
    }
    output::validate(&tokens)?;
    Ok(untokenize(&tokens))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn names(name: &str) -> Option<Binding> {
        match name {
            "sin" | "cos" | "tan" | "diff" | "integrate" | "solve" | "factorial" | "sqrt"
                | "Symbol" | "Integer" | "Float" | "Rational" | "Function" => Some(Binding::Callable),
            "pi" | "E" | "I" => Some(Binding::Value),
            _ => None,
        }
    }

    fn canonical(input: &str) -> String {
        stringify(input, &names).unwrap()
    }

    #[test]
    fn power_and_symbols() {
        assert_eq!(canonical("diff(cos(x)^7, x)"), "diff(cos(Symbol('x'))**Integer(7), Symbol('x'))");
    }

    #[test]
    fn synonyms_become_canonical_names() {
        assert_eq!(canonical("derivative(x^2, x)"), "diff(Symbol('x')**Integer(2), Symbol('x'))");
        assert_eq!(canonical("integral(1/z, z)"), "integrate(Integer(1)/Symbol('z'), Symbol('z'))");
        assert_eq!(canonical("antiderivative(z, z)"), "integrate(Symbol('z'), Symbol('z'))");
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(canonical("2x"), "Integer(2)*Symbol('x')");
        assert_eq!(canonical("2 pi"), "Integer(2)*pi");
        assert_eq!(
            canonical("(x+1)(x-1)"),
            "(Symbol('x') + Integer(1))*(Symbol('x') - Integer(1))",
        );
        assert_eq!(canonical("sin(x)cos(x)"), "sin(Symbol('x'))*cos(Symbol('x'))");
    }

    #[test]
    fn single_letter_symbol_followed_by_paren_is_not_multiplied() {
        assert_eq!(canonical("x(x+1)"), "Symbol('x')(Symbol('x') + Integer(1))");
    }

    #[test]
    fn implicit_application() {
        assert_eq!(canonical("sin x"), "sin(Symbol('x'))");
        assert_eq!(canonical("2sin x"), "Integer(2)*sin(Symbol('x'))");
    }

    #[test]
    fn function_exponentiation() {
        assert_eq!(canonical("sin**2 x"), "sin(Symbol('x'))**Integer(2)");
        assert_eq!(canonical("sin^2(x)"), "sin(Symbol('x'))**Integer(2)");
    }

    #[test]
    fn split_symbols() {
        assert_eq!(canonical("xyz"), "Symbol('x')*Symbol('y')*Symbol('z')");
        assert_eq!(canonical("theta"), "Symbol('theta')");
        assert_eq!(canonical("x_1"), "Symbol('x_1')");
        assert_eq!(canonical("x2"), "Symbol('x2')");
    }

    #[test]
    fn factorial() {
        assert_eq!(canonical("3!"), "factorial(Integer(3))");
        assert_eq!(canonical("x!"), "factorial(Symbol('x'))");
        assert!(stringify("!x", &names).is_err());
    }

    #[test]
    fn keyword_arguments_and_keywords() {
        assert_eq!(canonical("solve(x, dict=True)"), "solve(Symbol('x'), dict=True)");
        assert_eq!(canonical("x and y"), "Symbol('x') and Symbol('y')");
    }

    #[test]
    fn floats() {
        assert_eq!(canonical("1.5x"), "Float('1.5')*Symbol('x')");
    }

    #[test]
    fn invalid_input() {
        assert!(stringify("^^^", &names).is_err());
        assert!(stringify("(x", &names).is_err());
        assert!(stringify("x)", &names).is_err());
        assert!(stringify("[x", &names).is_err());
        assert!(stringify("'abc", &names).is_err());
        assert!(stringify("x $ y", &names).is_err());
    }

    #[test]
    fn idempotent() {
        for input in [
            "diff(cos(x)^7, x)",
            "integrate(1/z, z)",
            "2x + 3xyz",
            "sin**2 x",
            "x(x+1)",
            "3!",
            "1.5x - 2",
            "solve(x**2 - 1, x, dict=True)",
            "Rational(1, 2) + x",
        ] {
            let once = canonical(input);
            let twice = canonical(&once);
            assert_eq!(once, twice, "input: {}", input);
        }
    }

    #[test]
    fn constructors_are_removed_for_display() {
        assert_eq!(remove_constructors(&canonical("2x + 1.5")), "2*x + 1.5");
        assert_eq!(remove_constructors("Rational(1, 2)"), "Rational(1, 2)");
        assert_eq!(remove_constructors("Rational(3)"), "3");
    }
}
