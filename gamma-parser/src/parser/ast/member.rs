use crate::{
    parser::{
        ast::{expr::Expr, literal::Ident},
        error::Error,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An attribute access, such as `expr.doit`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    /// The expression whose attribute is accessed.
    pub value: Box<Expr>,

    /// The attribute name.
    pub attr: Ident,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

impl Attribute {
    pub(crate) fn parse_attr(input: &mut Parser, value: Expr) -> Result<Self, Error> {
        input.expect(&[TokenKind::Dot])?;
        let name = input.expect(&[TokenKind::Name])?;
        Ok(Self {
            span: value.span().start..name.span.end,
            value: Box::new(value),
            attr: Ident { name: name.lexeme.to_string(), span: name.span },
        })
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.value, self.attr)
    }
}

/// A subscript, such as `a[0]` or `d[x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Index {
    /// The expression being indexed.
    pub target: Box<Expr>,

    /// The index expression.
    pub index: Box<Expr>,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

impl Index {
    pub(crate) fn parse_subscript(input: &mut Parser, target: Expr) -> Result<Self, Error> {
        input.expect(&[TokenKind::OpenSquare])?;
        let index = input.try_parse_with_fn(Expr::parse_list)?;
        let close = input.expect(&[TokenKind::CloseSquare])?;
        Ok(Self {
            span: target.span().start..close.span.end,
            target: Box::new(target),
            index: Box::new(index),
        })
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{}]", self.target, self.index)
    }
}
