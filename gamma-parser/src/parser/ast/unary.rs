use crate::parser::{
    ast::{binary::{fmt_operand, Binary}, expr::Expr},
    error::Error,
    token::op::{UnaryOp, UnaryOpKind},
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary operation, such as `-x`, `~p`, or `not q`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary operation.
    pub operand: Box<Expr>,

    /// The operator of the unary operation.
    pub op: UnaryOp,

    /// The region of the source code that this unary operation was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary operation.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a unary operation if the current token is a prefix operator. Otherwise, parses a
    /// postfix expression (an atom followed by calls, subscripts, and attribute accesses).
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        let Some(op) = input.current_token().and_then(|token| {
            UnaryOpKind::from_token(token).map(|kind| UnaryOp { kind, span: token.span.clone() })
        }) else {
            return Expr::parse_postfix(input);
        };
        input.next_token()?;

        // `-x**2` is `-(x**2)`, and `not a == b` is `not (a == b)`
        let operand = Binary::parse_expr(input, op.kind.precedence())?;
        let span = op.span.start..operand.span().end;
        Ok(Expr::Unary(Unary { operand: Box::new(operand), op, span }))
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.op.kind)?;
        fmt_operand(&self.operand, f)
    }
}
