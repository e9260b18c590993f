use crate::{
    parser::{
        ast::{expr::Expr, literal::Ident},
        error::{kind, Error},
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A keyword argument, such as the `y=2` in `f(x, y=2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keyword {
    /// The name of the parameter.
    pub name: Ident,

    /// The value given to the parameter.
    pub value: Expr,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A function call, such as `integrate(1/z, z)` or `solve(eq, x, dict=True)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The expression being called, usually a name.
    pub func: Box<Expr>,

    /// The positional arguments.
    pub args: Vec<Expr>,

    /// The keyword arguments, which always follow the positional arguments.
    pub kwargs: Vec<Keyword>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the name of the function being called, if the callee is a plain name.
    pub fn name(&self) -> Option<&str> {
        match &*self.func {
            Expr::Name(ident) => Some(&ident.name),
            _ => None,
        }
    }

    /// Parses the parenthesized argument list that follows `func`.
    pub(crate) fn parse_args(input: &mut Parser, func: Expr) -> Result<Self, Error> {
        let open = input.expect(&[TokenKind::OpenParen])?;
        let mut args = Vec::new();
        let mut kwargs = Vec::new();

        while !input.at(TokenKind::CloseParen) {
            let is_keyword = input.at(TokenKind::Name)
                && input.peek_second().map_or(false, |token| token.kind == TokenKind::Assign);

            if is_keyword {
                let token = input.next_token()?;
                input.next_token()?;
                let value = input.try_parse::<Expr>()?;
                kwargs.push(Keyword {
                    name: Ident { name: token.lexeme.to_string(), span: token.span },
                    value,
                });
            } else {
                let value = input.try_parse::<Expr>()?;
                if !kwargs.is_empty() {
                    return Err(Error::new(vec![value.span()], kind::PositionalAfterKeyword));
                }
                args.push(value);
            }

            if !input.eat(TokenKind::Comma) {
                break;
            }
        }

        let close = input.expect(&[TokenKind::CloseParen])?;

        Ok(Self {
            span: func.span().start..close.span.end,
            paren_span: open.span.start..close.span.end,
            func: Box::new(func),
            args,
            kwargs,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.func)?;
        let args = self.args.iter().map(ToString::to_string);
        let kwargs = self.kwargs.iter().map(ToString::to_string);
        let all = args.chain(kwargs).collect::<Vec<_>>();
        write!(f, "{})", all.join(", "))
    }
}
