use crate::{
    parser::{
        ast::stmt::Stmt,
        error::{kind, Error},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The body of a compound statement: either the simple statements after the colon on the same
/// line, or an indented run of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Block {
    /// The statements in the block.
    pub stmts: Vec<Stmt>,

    /// The region of the source code that this block was parsed from, starting at the colon.
    pub span: Range<usize>,
}

impl Parse for Block {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let colon = input.expect(&[TokenKind::Colon])?;

        if !input.eat(TokenKind::NewLine) {
            // `if x: y = 1` on a single line
            let stmts = Stmt::parse_simple_line(input)?;
            return Ok(Block { span: colon.span.start..input.prev_end(), stmts });
        }

        if !input.eat(TokenKind::Indent) {
            return Err(Error::new(vec![colon.span], kind::ExpectedIndent));
        }

        let mut stmts = Vec::new();
        while !input.eat(TokenKind::Dedent) && !input.at_end() {
            if input.at(TokenKind::Indent) {
                return Err(input.error(kind::UnexpectedIndent));
            }
            stmts.extend(Stmt::parse_line(input)?);
        }

        Ok(Block { span: colon.span.start..input.prev_end(), stmts })
    }
}
