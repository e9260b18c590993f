use crate::{
    parser::{
        ast::{
            expr::{ends_list, Expr},
            for_stmt::For,
            func_def::FuncDef,
            if_stmt::If,
            literal::Ident,
        },
        error::{kind, Error},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AssignTarget {
    /// A single name, such as `x = 1`.
    Name(Ident),

    /// Tuple unpacking, such as `a, b = 1, 2`.
    Unpack(Vec<Ident>),
}

impl AssignTarget {
    /// Converts the parsed left-hand side of an assignment into a target.
    fn from_expr(expr: Expr) -> Result<Self, Error> {
        let span = expr.span();
        match expr {
            Expr::Name(ident) => Ok(Self::Name(ident)),
            Expr::Paren(paren) => Self::from_expr(*paren.expr),
            Expr::Tuple(tuple) => tuple.items
                .into_iter()
                .map(|item| match item {
                    Expr::Name(ident) => Ok(ident),
                    other => Err(Error::new(vec![other.span()], kind::InvalidAssignTarget)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Unpack),
            _ => Err(Error::new(vec![span], kind::InvalidAssignTarget)),
        }
    }

    /// Returns the names bound by this target, in order.
    pub fn names(&self) -> Vec<&Ident> {
        match self {
            Self::Name(ident) => vec![ident],
            Self::Unpack(idents) => idents.iter().collect(),
        }
    }
}

/// An assignment statement, such as `x = 2` or `a, b = 1, 2`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assign {
    /// Where the value is stored.
    pub target: AssignTarget,

    /// The value being assigned.
    pub value: Expr,

    /// The region of the source code that this statement was parsed from.
    pub span: Range<usize>,
}

/// A `return` statement, with an optional value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Return {
    /// The value to return, if any.
    pub value: Option<Expr>,

    /// The region of the source code that this statement was parsed from.
    pub span: Range<usize>,
}

/// A single statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stmt {
    /// An expression evaluated for its value, such as `diff(x**2, x)`.
    Expr(Expr),

    /// An assignment.
    Assign(Assign),

    /// A function definition.
    FuncDef(FuncDef),

    /// A `return` statement.
    Return(Return),

    /// An `if` statement with optional `elif` and `else` branches.
    If(If),

    /// A `for` loop.
    For(For),

    /// The `pass` statement, which does nothing.
    Pass(Range<usize>),
}

impl Stmt {
    /// Returns the span of the statement.
    pub fn span(&self) -> Range<usize> {
        match self {
            Stmt::Expr(expr) => expr.span(),
            Stmt::Assign(assign) => assign.span.clone(),
            Stmt::FuncDef(def) => def.span.clone(),
            Stmt::Return(ret) => ret.span.clone(),
            Stmt::If(if_stmt) => if_stmt.span.clone(),
            Stmt::For(for_stmt) => for_stmt.span.clone(),
            Stmt::Pass(span) => span.clone(),
        }
    }

    /// Parses one logical line. Compound statements (`def`, `if`, `for`) take up the line along
    /// with their blocks; simple statements may be separated by semicolons.
    pub(crate) fn parse_line(input: &mut Parser) -> Result<Vec<Self>, Error> {
        if input.at_keyword("def") {
            return Ok(vec![Stmt::FuncDef(input.try_parse()?)]);
        }
        if input.at_keyword("if") {
            return Ok(vec![Stmt::If(input.try_parse()?)]);
        }
        if input.at_keyword("for") {
            return Ok(vec![Stmt::For(input.try_parse()?)]);
        }
        Self::parse_simple_line(input)
    }

    /// Parses simple statements separated by semicolons, up to and including the newline.
    pub(crate) fn parse_simple_line(input: &mut Parser) -> Result<Vec<Self>, Error> {
        let mut stmts = vec![Self::parse_simple(input)?];
        while input.eat(TokenKind::Semicolon) {
            if input.at(TokenKind::NewLine) || input.at_end() {
                break;
            }
            stmts.push(Self::parse_simple(input)?);
        }

        if !input.at_end() {
            input.expect(&[TokenKind::NewLine])?;
        }
        Ok(stmts)
    }

    /// Parses a single simple statement: `pass`, `return`, an assignment, or an expression.
    fn parse_simple(input: &mut Parser) -> Result<Self, Error> {
        let start = input.span().start;

        if input.eat_keyword("pass") {
            return Ok(Stmt::Pass(start..input.prev_end()));
        }

        if input.eat_keyword("return") {
            let value = if ends_list(input) {
                None
            } else {
                Some(input.try_parse_with_fn(Expr::parse_list)?)
            };
            return Ok(Stmt::Return(Return { value, span: start..input.prev_end() }));
        }

        if let Some(token) = input.current_token() {
            if token.kind == TokenKind::Name && matches!(token.lexeme, "elif" | "else") {
                return Err(input.error(kind::UnexpectedKeyword { keyword: token.lexeme.to_string() }));
            }
        }

        let expr = input.try_parse_with_fn(Expr::parse_list)?;
        if !input.eat(TokenKind::Assign) {
            return Ok(Stmt::Expr(expr));
        }

        let target = AssignTarget::from_expr(expr)?;
        let value = input.try_parse_with_fn(Expr::parse_list)?;
        Ok(Stmt::Assign(Assign { target, value, span: start..input.prev_end() }))
    }
}

/// A whole program: a sequence of statements.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Program {
    /// The statements of the program, in order.
    pub stmts: Vec<Stmt>,
}

impl Parse for Program {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let mut stmts = Vec::new();
        while !input.at_end() {
            if input.eat(TokenKind::NewLine) {
                continue;
            }
            if input.at(TokenKind::Indent) {
                return Err(input.error(kind::UnexpectedIndent));
            }
            stmts.extend(Stmt::parse_line(input)?);
        }
        Ok(Self { stmts })
    }
}
