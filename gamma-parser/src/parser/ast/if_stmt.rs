use crate::parser::{
    ast::{block::Block, expr::Expr},
    error::Error,
    Parse,
    Parser,
};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An `if` statement. The first branch is the `if` itself, followed by each `elif`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct If {
    /// The conditions and their blocks, tried in order.
    pub branches: Vec<(Expr, Block)>,

    /// The block run when no condition holds.
    pub else_block: Option<Block>,

    /// The region of the source code that this statement was parsed from.
    pub span: Range<usize>,
}

impl Parse for If {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let start = input.expect_keyword("if")?.span.start;
        let condition = input.try_parse::<Expr>()?;
        let block = input.try_parse::<Block>()?;
        let mut branches = vec![(condition, block)];

        while input.eat_keyword("elif") {
            let condition = input.try_parse::<Expr>()?;
            let block = input.try_parse::<Block>()?;
            branches.push((condition, block));
        }

        let else_block = if input.eat_keyword("else") {
            Some(input.try_parse::<Block>()?)
        } else {
            None
        };

        Ok(Self { branches, else_block, span: start..input.prev_end() })
    }
}
