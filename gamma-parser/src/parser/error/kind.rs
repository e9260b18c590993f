use ariadne::Fmt;
use gamma_attrs::ErrorKind;
use gamma_error::EXPR;
use crate::tokenizer::TokenKind;

/// A character that does not start any token.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid character `{}`", self.lexeme),
    labels = ["this character"],
    category = Syntax,
)]
pub struct InvalidCharacter {
    /// The offending text.
    pub lexeme: String,
}

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = ["you might need to add another expression here"],
    category = Syntax,
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining input here")],
    category = Syntax,
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid syntax",
    labels = ["this token"],
    help = format!(
        "expected one of: {}",
        self.expected
            .iter()
            .map(|t| format!("{:?}", t))
            .collect::<Vec<_>>()
            .join(", ")
    ),
    category = Syntax,
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A bracket was opened but never closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed bracket",
    labels = ["this bracket is never closed"],
    help = format!("add a closing `{}` somewhere after this", self.closing.fg(EXPR)),
    category = Syntax,
)]
pub struct UnclosedBracket {
    /// The bracket that should close it.
    pub closing: &'static str,
}

/// A closing bracket with no matching opening bracket.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unmatched closing bracket",
    labels = ["this bracket"],
    category = Syntax,
)]
pub struct UnmatchedBracket;

/// A line is indented deeper than the block it belongs to.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected indent",
    labels = ["this line"],
    category = Syntax,
)]
pub struct UnexpectedIndent;

/// A line is dedented to a level that no enclosing block uses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unindent does not match any outer indentation level",
    labels = ["this line"],
    category = Syntax,
)]
pub struct InconsistentDedent;

/// A block header (`def`, `if`, `for`) is not followed by an indented block.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected an indented block",
    labels = ["after this line"],
    category = Syntax,
)]
pub struct ExpectedIndent;

/// The left side of an assignment is not a name or a tuple of names.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot assign to expression",
    labels = ["this expression"],
    help = format!("only names can be assigned to, such as `{}`", "a = 1".fg(EXPR)),
    category = Syntax,
)]
pub struct InvalidAssignTarget;

/// A positional argument was given after a keyword argument.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "positional argument follows keyword argument",
    labels = ["this argument"],
    category = Syntax,
)]
pub struct PositionalAfterKeyword;

/// A keyword was used where a name or expression was expected.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected keyword `{}`", self.keyword),
    labels = ["this keyword"],
    category = Syntax,
)]
pub struct UnexpectedKeyword {
    /// The keyword that was found.
    pub keyword: String,
}
