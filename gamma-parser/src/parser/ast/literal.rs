use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer literal, represented as a [`String`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The value of the integer literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl fmt::Display for LitInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A floating-point literal, represented as a [`String`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitFloat {
    /// The value of the floating-point literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl fmt::Display for LitFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A string literal, without its quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitStr {
    /// The contents of the string.
    pub value: String,

    /// The region of the source code that this literal was parsed from, including the quotes.
    pub span: Range<usize>,
}

impl fmt::Display for LitStr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.value.contains('\'') {
            write!(f, "\"{}\"", self.value)
        } else {
            write!(f, "'{}'", self.value)
        }
    }
}

/// A boolean literal, `True` or `False`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitBool {
    /// The value of the boolean literal.
    pub value: bool,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl fmt::Display for LitBool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(if self.value { "True" } else { "False" })
    }
}

/// The `None` literal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitNone {
    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// A name, such as `x` or `integrate`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ident {
    /// The name itself.
    pub name: String,

    /// The region of the source code that this name was parsed from.
    pub span: Range<usize>,
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Represents a literal value in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    Int(LitInt),
    Float(LitFloat),
    Str(LitStr),
    Bool(LitBool),
    None(LitNone),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Int(int) => int.span.clone(),
            Literal::Float(float) => float.span.clone(),
            Literal::Str(s) => s.span.clone(),
            Literal::Bool(b) => b.span.clone(),
            Literal::None(none) => none.span.clone(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Int(int) => int.fmt(f),
            Literal::Float(float) => float.fmt(f),
            Literal::Str(s) => s.fmt(f),
            Literal::Bool(b) => b.fmt(f),
            Literal::None(_) => f.write_str("None"),
        }
    }
}
