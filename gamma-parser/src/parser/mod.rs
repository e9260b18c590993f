pub mod ast;
pub mod error;
pub mod layout;
pub mod token;

use ast::{expr::Expr, stmt::Program};
use error::{kind, Error};
use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// A high-level parser for the language. This is the type to use to parse an arbitrary piece of
/// code into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing. Whitespace and comments have already been
    /// removed; statement mode streams also carry `NewLine`, `Indent` and `Dedent` tokens.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Creates a parser for a program: a sequence of statements separated by newlines, with blocks
    /// delimited by indentation.
    pub fn program(source: &'source str) -> Result<Self, Error> {
        let tokens = tokenize_complete(source)?;
        Ok(Self {
            tokens: layout::layout(&tokens)?.into_boxed_slice(),
            cursor: 0,
        })
    }

    /// Creates a parser for a single expression. Newlines are only allowed inside brackets or at
    /// the very start and end of the source.
    pub fn expression(source: &'source str) -> Result<Self, Error> {
        let tokens = tokenize_complete(source)?;
        Ok(Self {
            tokens: layout::strip(&tokens).into_boxed_slice(),
            cursor: 0,
        })
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl gamma_error::ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the end of the span of the previous token, or zero at the start of the stream.
    pub fn prev_end(&self) -> usize {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |token| token.span.end)
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the token after the current one without moving the cursor.
    pub fn peek_second(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor + 1)
    }

    /// Returns true if the current token has the given kind.
    pub fn at(&self, kind: TokenKind) -> bool {
        self.current_token().map_or(false, |token| token.kind == kind)
    }

    /// Returns true if the current token is the given keyword.
    pub fn at_keyword(&self, keyword: &str) -> bool {
        self.current_token().map_or(false, |token| token.is_keyword(keyword))
    }

    /// Returns true if all tokens have been consumed.
    pub fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Returns the next token to be parsed, then advances the cursor.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                // cloning is cheap: only Range<_> is cloned
                Ok(token.clone())
            },
            None => Err(self.error(kind::UnexpectedEof)),
        }
    }

    /// Consumes the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is the given keyword.
    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind, or returns an error describing what was found instead.
    pub fn expect(&mut self, expected: &'static [TokenKind]) -> Result<Token<'source>, Error> {
        let token = self.next_token()?;
        if expected.contains(&token.kind) {
            Ok(token)
        } else {
            Err(Error::new(vec![token.span.clone()], kind::UnexpectedToken {
                expected,
                found: token.kind,
            }))
        }
    }

    /// Consumes the given keyword, or returns an error.
    pub fn expect_keyword(&mut self, keyword: &'static str) -> Result<Token<'source>, Error> {
        let token = self.next_token()?;
        if token.is_keyword(keyword) {
            Ok(token)
        } else {
            Err(Error::new(vec![token.span.clone()], kind::UnexpectedToken {
                expected: &[TokenKind::Name],
                found: token.kind,
            }))
        }
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value. This function can be used in the [`Parse::parse`]
    /// implementation of a type with the given [`Parser`], as it will automatically backtrack the
    /// cursor position if parsing fails.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        if self.at_end() {
            Ok(value)
        } else {
            Err(self.error(kind::ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// Parses a program made of statements.
pub fn parse_program(source: &str) -> Result<Program, Error> {
    Parser::program(source)?.try_parse_full::<Program>()
}

/// Parses a single expression, the way an `eval` of the source would.
pub fn parse_expr(source: &str) -> Result<Expr, Error> {
    Parser::expression(source)?.try_parse_full::<Expr>()
}

/// The associativity of a binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// `a op b op c` is evaluated as `a op (b op c)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of logical or (`or`).
    Or,

    /// Precedence of logical and (`and`).
    And,

    /// Precedence of comparisons (`>`, `>=`, `<`, `<=`, `==`, `!=`, `in`).
    Compare,

    /// Precedence of bitwise or (`|`).
    BitOr,

    /// Precedence of bitwise xor (`^`).
    BitXor,

    /// Precedence of bitwise and (`&`).
    BitAnd,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`), division (`/`, `//`), and modulo (`%`), which separate
    /// factors.
    Factor,

    /// Precedence of exponentiation (`**`), which binds tighter than unary minus on its left.
    Exp,
}

impl Precedence {
    /// Returns the next-higher precedence. Used to parse the right-hand side of left-associative
    /// operators.
    pub fn next(self) -> Self {
        match self {
            Self::Any => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::Compare,
            Self::Compare => Self::BitOr,
            Self::BitOr => Self::BitXor,
            Self::BitXor => Self::BitAnd,
            Self::BitAnd => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor | Self::Exp => Self::Exp,
        }
    }
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        binary::Binary,
        call::{Call, Keyword},
        literal::{Ident, LitInt, Literal},
        stmt::Stmt,
    };
    use token::op::{BinOp, BinOpKind};

    fn name(name: &str, span: Range<usize>) -> Expr {
        Expr::Name(Ident { name: name.to_string(), span })
    }

    #[test]
    fn literal_int() {
        let expr = parse_expr("16").unwrap();
        assert_eq!(expr, Expr::Literal(Literal::Int(LitInt {
            value: "16".to_string(),
            span: 0..2,
        })));
    }

    #[test]
    fn binary_precedence() {
        let expr = parse_expr("a + b * c").unwrap();
        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(name("a", 0..1)),
            op: BinOp { kind: BinOpKind::Add, span: 2..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(name("b", 4..5)),
                op: BinOp { kind: BinOpKind::Mul, span: 6..7 },
                rhs: Box::new(name("c", 8..9)),
                span: 4..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn power_is_right_associative() {
        let expr = parse_expr("a ** b ** c").unwrap();
        assert_eq!(expr.to_string(), "a**(b**c)");
    }

    #[test]
    fn negation_binds_looser_than_power() {
        assert_eq!(parse_expr("-x**2").unwrap().to_string(), "-(x**2)");
        assert_eq!(parse_expr("2**-1").unwrap().to_string(), "2**(-1)");
    }

    #[test]
    fn call_with_keywords() {
        let expr = parse_expr("f(x, y=2)").unwrap();
        assert_eq!(expr, Expr::Call(Call {
            func: Box::new(name("f", 0..1)),
            args: vec![name("x", 2..3)],
            kwargs: vec![Keyword {
                name: Ident { name: "y".to_string(), span: 5..6 },
                value: Expr::Literal(Literal::Int(LitInt { value: "2".to_string(), span: 7..8 })),
            }],
            span: 0..9,
            paren_span: 1..9,
        }));
    }

    #[test]
    fn chained_comparison() {
        let expr = parse_expr("1 < x <= 2").unwrap();
        assert_eq!(expr.to_string(), "(1 < x) and (x <= 2)");
    }

    #[test]
    fn unclosed_paren_is_error() {
        assert!(parse_expr("f(x").is_err());
        assert!(parse_expr("x +").is_err());
    }

    #[test]
    fn program_with_function() {
        let program = parse_program("def f(x):\n\treturn x**2\nf(3)").unwrap();
        assert_eq!(program.stmts.len(), 2);
        assert!(matches!(program.stmts[0], Stmt::FuncDef(_)));
        assert!(matches!(program.stmts[1], Stmt::Expr(_)));
    }

    #[test]
    fn program_with_if_else() {
        let source = "a = 1\nif a == 1:\n    b = 2\nelif a == 2:\n    b = 3\nelse:\n    b = 4\nb";
        let program = parse_program(source).unwrap();
        assert_eq!(program.stmts.len(), 3);
        match &program.stmts[1] {
            Stmt::If(if_stmt) => {
                assert_eq!(if_stmt.branches.len(), 2);
                assert!(if_stmt.else_block.is_some());
            },
            other => panic!("expected if statement, found {:?}", other),
        }
    }

    #[test]
    fn unexpected_indent() {
        assert!(parse_program("  x = 1").is_err());
        assert!(parse_program("def f(x):\n        return x\n    f(1)").is_err());
    }

    #[test]
    fn expression_mode_rejects_statements() {
        assert!(parse_expr("a = 1").is_err());
        assert!(parse_expr("a\nb").is_err());
    }
}
