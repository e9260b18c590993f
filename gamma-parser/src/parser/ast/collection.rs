//! Bracketed expressions: parentheses, tuples, lists, and dictionaries.

use crate::{
    parser::{ast::expr::Expr, error::Error, Parse, Parser},
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parenthesized expression, such as `(1 + 2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The region of the source code that this expression was parsed from, including the
    /// parentheses.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the innermost expression, removing every layer of parentheses.
    pub fn innermost(&self) -> &Expr {
        let mut inner = &*self.expr;
        while let Expr::Paren(paren) = inner {
            inner = &*paren.expr;
        }
        inner
    }

    /// Parses `(expr)`, `()`, or a tuple such as `(x, 0, 1)` or `(x,)`.
    pub(crate) fn parse_or_tuple(input: &mut Parser) -> Result<Expr, Error> {
        let open = input.expect(&[TokenKind::OpenParen])?;
        if let Some(close) = eat_close(input, TokenKind::CloseParen) {
            return Ok(Expr::Tuple(Tuple { items: Vec::new(), span: open.span.start..close }));
        }

        let first = input.try_parse::<Expr>()?;
        if !input.at(TokenKind::Comma) {
            let close = input.expect(&[TokenKind::CloseParen])?;
            return Ok(Expr::Paren(Paren {
                expr: Box::new(first),
                span: open.span.start..close.span.end,
            }));
        }

        let mut items = vec![first];
        items.extend(parse_items(input, TokenKind::CloseParen)?);
        let close = input.expect(&[TokenKind::CloseParen])?;
        Ok(Expr::Tuple(Tuple { items, span: open.span.start..close.span.end }))
    }
}

impl fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.expr)
    }
}

/// A tuple, such as `(x, 0, 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tuple {
    /// The items of the tuple.
    pub items: Vec<Expr>,

    /// The region of the source code that this tuple was parsed from.
    pub span: Range<usize>,
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.items.as_slice() {
            [single] => write!(f, "({},)", single),
            items => write!(f, "({})", join(items)),
        }
    }
}

/// A list, such as `[1, 2, 3]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct List {
    /// The items of the list.
    pub items: Vec<Expr>,

    /// The region of the source code that this list was parsed from.
    pub span: Range<usize>,
}

impl Parse for List {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.expect(&[TokenKind::OpenSquare])?;
        let items = parse_items(input, TokenKind::CloseSquare)?;
        let close = input.expect(&[TokenKind::CloseSquare])?;
        Ok(Self { items, span: open.span.start..close.span.end })
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", join(&self.items))
    }
}

/// A dictionary, such as `{x: 1, y: 2}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dict {
    /// The key-value pairs of the dictionary, in source order.
    pub entries: Vec<(Expr, Expr)>,

    /// The region of the source code that this dictionary was parsed from.
    pub span: Range<usize>,
}

impl Parse for Dict {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.expect(&[TokenKind::OpenCurly])?;
        let mut entries = Vec::new();
        while !input.at(TokenKind::CloseCurly) {
            let key = input.try_parse::<Expr>()?;
            input.expect(&[TokenKind::Colon])?;
            let value = input.try_parse::<Expr>()?;
            entries.push((key, value));
            if !input.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = input.expect(&[TokenKind::CloseCurly])?;
        Ok(Self { entries, span: open.span.start..close.span.end })
    }
}

impl fmt::Display for Dict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let entries = self.entries
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

/// Consumes the given closing bracket if it is the current token, returning the end of its span.
fn eat_close(input: &mut Parser, close: TokenKind) -> Option<usize> {
    if input.at(close) {
        let end = input.span().end;
        input.eat(close);
        Some(end)
    } else {
        None
    }
}

/// Parses comma-separated items up to (but not including) the given closing bracket. A leading
/// comma is consumed if present, so this can continue a list whose first item was already parsed.
fn parse_items(input: &mut Parser, close: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut items = Vec::new();
    let continuing = input.eat(TokenKind::Comma);
    if continuing && input.at(close) {
        return Ok(items);
    }

    while !input.at(close) {
        items.push(input.try_parse::<Expr>()?);
        if !input.eat(TokenKind::Comma) {
            break;
        }
    }
    Ok(items)
}

fn join(items: &[Expr]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
