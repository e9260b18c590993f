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

/// A parameter of a function definition, with an optional default value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    /// The name of the parameter.
    pub name: Ident,

    /// The default value, evaluated when the function is defined.
    pub default: Option<Expr>,
}

/// A function definition, such as:
///
/// ```text
/// def f(x, n=2):
///     return x**n
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FuncDef {
    /// The name of the function.
    pub name: Ident,

    /// The parameters of the function.
    pub params: Vec<Param>,

    /// The body of the function.
    pub body: Block,

    /// The region of the source code that this definition was parsed from.
    pub span: Range<usize>,
}

impl Parse for FuncDef {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let def = input.expect_keyword("def")?;
        let name = input.expect(&[TokenKind::Name])?;
        input.expect(&[TokenKind::OpenParen])?;

        let mut params = Vec::new();
        while !input.at(TokenKind::CloseParen) {
            let param = input.expect(&[TokenKind::Name])?;
            let default = if input.eat(TokenKind::Assign) {
                Some(input.try_parse::<Expr>()?)
            } else {
                None
            };
            params.push(Param {
                name: Ident { name: param.lexeme.to_string(), span: param.span },
                default,
            });
            if !input.eat(TokenKind::Comma) {
                break;
            }
        }
        input.expect(&[TokenKind::CloseParen])?;

        let body = input.try_parse::<Block>()?;
        Ok(Self {
            name: Ident { name: name.lexeme.to_string(), span: name.span },
            params,
            span: def.span.start..body.span.end,
            body,
        })
    }
}
