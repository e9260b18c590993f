use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            collection::{Dict, List, Paren, Tuple},
            literal::{Ident, LitBool, LitFloat, LitInt, LitNone, LitStr, Literal},
            member::{Attribute, Index},
            unary::Unary,
        },
        error::{kind, Error},
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::{is_keyword, TokenKind},
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents any kind of expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A name, such as `x` or `diff`.
    Name(Ident),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A tuple, such as `(x, 0, 1)`.
    Tuple(Tuple),

    /// A list, such as `[1, 2]`.
    List(List),

    /// A dictionary, such as `{x: 1}`.
    Dict(Dict),

    /// A function call, such as `f(x, y=2)`.
    Call(Call),

    /// An attribute access, such as `expr.doit`.
    Attribute(Attribute),

    /// An index into a sequence or mapping, such as `a[0]`.
    Index(Index),

    /// A unary operation, such as `-1` or `not x`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Name(name) => name.span.clone(),
            Expr::Paren(paren) => paren.span.clone(),
            Expr::Tuple(tuple) => tuple.span.clone(),
            Expr::List(list) => list.span.clone(),
            Expr::Dict(dict) => dict.span.clone(),
            Expr::Call(call) => call.span.clone(),
            Expr::Attribute(attribute) => attribute.span.clone(),
            Expr::Index(index) => index.span.clone(),
            Expr::Unary(unary) => unary.span.clone(),
            Expr::Binary(binary) => binary.span.clone(),
        }
    }

    /// Returns true if the expression is an operation that should be parenthesized when printed
    /// as the operand of another operation.
    pub(crate) fn is_operation(&self) -> bool {
        matches!(self, Expr::Unary(_) | Expr::Binary(_))
    }

    /// Parses a comma-separated list of expressions. A single expression without a trailing comma
    /// is returned as-is; anything else becomes a [`Tuple`].
    pub fn parse_list(input: &mut Parser) -> Result<Self, Error> {
        let first = input.try_parse::<Expr>()?;
        if !input.at(TokenKind::Comma) {
            return Ok(first);
        }

        let start = first.span().start;
        let mut items = vec![first];
        while input.eat(TokenKind::Comma) {
            if ends_list(input) {
                break;
            }
            items.push(input.try_parse::<Expr>()?);
        }

        Ok(Expr::Tuple(Tuple { items, span: start..input.prev_end() }))
    }

    /// Parses an atom: a literal, a name, or a bracketed expression.
    fn parse_atom(input: &mut Parser) -> Result<Self, Error> {
        let Some(token) = input.current_token().cloned() else {
            return Err(input.error(kind::UnexpectedEof));
        };

        match token.kind {
            TokenKind::Name => {
                input.next_token()?;
                let span = token.span.clone();
                match token.lexeme {
                    "True" => Ok(Expr::Literal(Literal::Bool(LitBool { value: true, span }))),
                    "False" => Ok(Expr::Literal(Literal::Bool(LitBool { value: false, span }))),
                    "None" => Ok(Expr::Literal(Literal::None(LitNone { span }))),
                    name if is_keyword(name) => Err(Error::new(vec![span], kind::UnexpectedKeyword {
                        keyword: name.to_string(),
                    })),
                    name => Ok(Expr::Name(Ident { name: name.to_string(), span })),
                }
            },
            TokenKind::Int => {
                input.next_token()?;
                Ok(Expr::Literal(Literal::Int(LitInt { value: token.lexeme.to_string(), span: token.span })))
            },
            TokenKind::Float => {
                input.next_token()?;
                Ok(Expr::Literal(Literal::Float(LitFloat { value: token.lexeme.to_string(), span: token.span })))
            },
            TokenKind::Str => {
                input.next_token()?;
                let value = &token.lexeme[1..token.lexeme.len() - 1];
                Ok(Expr::Literal(Literal::Str(LitStr { value: value.to_string(), span: token.span })))
            },
            TokenKind::OpenParen => Paren::parse_or_tuple(input),
            TokenKind::OpenSquare => input.try_parse::<List>().map(Expr::List),
            TokenKind::OpenCurly => input.try_parse::<Dict>().map(Expr::Dict),
            found => Err(Error::new(vec![token.span.clone()], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Name,
                    TokenKind::Int,
                    TokenKind::Float,
                    TokenKind::Str,
                    TokenKind::OpenParen,
                    TokenKind::OpenSquare,
                    TokenKind::OpenCurly,
                ],
                found,
            })),
        }
    }

    /// Parses an atom followed by any number of calls, subscripts, and attribute accesses.
    pub(crate) fn parse_postfix(input: &mut Parser) -> Result<Self, Error> {
        let mut expr = Self::parse_atom(input)?;

        loop {
            if input.at(TokenKind::OpenParen) {
                expr = Expr::Call(Call::parse_args(input, expr)?);
            } else if input.at(TokenKind::OpenSquare) {
                expr = Expr::Index(Index::parse_subscript(input, expr)?);
            } else if input.at(TokenKind::Dot) {
                expr = Expr::Attribute(Attribute::parse_attr(input, expr)?);
            } else {
                break;
            }
        }

        Ok(expr)
    }
}

/// Returns true if the current token cannot start another item of a comma-separated list.
pub(crate) fn ends_list(input: &Parser) -> bool {
    match input.current_token() {
        None => true,
        Some(token) => matches!(
            token.kind,
            TokenKind::NewLine | TokenKind::Assign | TokenKind::Semicolon | TokenKind::Colon
                | TokenKind::CloseParen | TokenKind::CloseSquare | TokenKind::CloseCurly
        ),
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        Binary::parse_expr(input, Precedence::Any)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Name(name) => name.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Tuple(tuple) => tuple.fmt(f),
            Expr::List(list) => list.fmt(f),
            Expr::Dict(dict) => dict.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Attribute(attribute) => attribute.fmt(f),
            Expr::Index(index) => index.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}
