use crate::parser::{
    ast::{expr::Expr, unary::Unary},
    error::Error,
    token::op::{BinOp, BinOpKind},
    Associativity,
    Parser,
    Precedence,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses an expression whose binary operators all have at least the given precedence.
    ///
    /// This is precedence climbing: the loop consumes every operator at or above `min`, and the
    /// right-hand side of each operator is parsed recursively with a minimum one step above the
    /// operator's precedence (or equal to it, for right-associative operators). In `1 + 2 * 3`,
    /// the right-hand side of `+` is parsed with a minimum of [`Precedence::Factor`], which
    /// swallows `2 * 3` before returning to build the `+` node.
    ///
    /// Comparisons chain: `a < b <= c` becomes `(a < b) and (b <= c)`, with the middle operand
    /// duplicated.
    pub fn parse_expr(input: &mut Parser, min: Precedence) -> Result<Expr, Error> {
        let mut lhs = Unary::parse_or_lower(input)?;

        loop {
            let Some(op) = input.current_token().and_then(|token| {
                BinOpKind::from_token(token).map(|kind| BinOp { kind, span: token.span.clone() })
            }) else {
                break;
            };

            if op.precedence() < min {
                break;
            }
            input.next_token()?;

            let rhs_min = match op.associativity() {
                Associativity::Right => op.precedence(),
                Associativity::Left => op.precedence().next(),
            };
            let rhs = Self::parse_expr(input, rhs_min)?;
            lhs = Self::combine(lhs, op, rhs);
        }

        Ok(lhs)
    }

    /// Builds the node `lhs op rhs`, chaining comparisons.
    fn combine(lhs: Expr, op: BinOp, rhs: Expr) -> Expr {
        if op.kind.is_comparison() {
            // the middle operand of a chain is the right-hand side of the last comparison
            let middle = match &lhs {
                Expr::Binary(prev) if prev.op.kind.is_comparison() => Some((*prev.rhs).clone()),
                Expr::Binary(Binary { op: BinOp { kind: BinOpKind::And, .. }, rhs, .. }) => match &**rhs {
                    Expr::Binary(prev) if prev.op.kind.is_comparison() => Some((*prev.rhs).clone()),
                    _ => None,
                },
                _ => None,
            };

            if let Some(middle) = middle {
                let span = lhs.span().start..rhs.span().end;
                let link = BinOp { kind: BinOpKind::And, span: op.span.clone() };
                let compare = Expr::Binary(Binary {
                    span: middle.span().start..rhs.span().end,
                    lhs: Box::new(middle),
                    op,
                    rhs: Box::new(rhs),
                });
                return Expr::Binary(Binary {
                    lhs: Box::new(lhs),
                    op: link,
                    rhs: Box::new(compare),
                    span,
                });
            }
        }

        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary { lhs: Box::new(lhs), op, rhs: Box::new(rhs), span })
    }
}

/// Writes an operand, parenthesizing it if it is itself an operation.
pub(crate) fn fmt_operand(expr: &Expr, f: &mut fmt::Formatter) -> fmt::Result {
    if expr.is_operation() {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_operand(&self.lhs, f)?;
        match self.op.kind {
            BinOpKind::Pow | BinOpKind::Mul | BinOpKind::Div | BinOpKind::FloorDiv | BinOpKind::Mod => {
                write!(f, "{}", self.op.kind)?
            },
            kind => write!(f, " {} ", kind)?,
        }
        fmt_operand(&self.rhs, f)
    }
}
