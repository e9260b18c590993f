use crate::{
    parser::{
        ast::{block::Block, expr::Expr, literal::Ident},
        error::Error,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `for` loop over an iterable, such as `for i in range(5):`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct For {
    /// The loop variables. More than one name unpacks each item.
    pub targets: Vec<Ident>,

    /// The expression producing the items.
    pub iter: Expr,

    /// The body of the loop.
    pub body: Block,

    /// The region of the source code that this loop was parsed from.
    pub span: Range<usize>,
}

impl Parse for For {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let start = input.expect_keyword("for")?.span.start;

        let mut targets = Vec::new();
        loop {
            let name = input.expect(&[TokenKind::Name])?;
            targets.push(Ident { name: name.lexeme.to_string(), span: name.span });
            if !input.eat(TokenKind::Comma) {
                break;
            }
        }

        input.expect_keyword("in")?;
        let iter = input.try_parse_with_fn(Expr::parse_list)?;
        let body = input.try_parse::<Block>()?;
        Ok(Self { targets, iter, span: start..body.span.end, body })
    }
}
