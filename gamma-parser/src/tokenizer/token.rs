use logos::Logos;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Names that are reserved by the statement language and never treated as symbols.
pub const KEYWORDS: &[&str] = &[
    "and", "def", "elif", "else", "for", "if", "in", "is", "lambda", "not", "or", "pass", "return",
    "True", "False", "None",
];

/// Returns true if the given name is a reserved keyword.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    #[regex(r"\r?\n")]
    NewLine,

    #[regex(r"[ \t\f]+")]
    Whitespace,

    #[regex(r"#[^\r\n]*")]
    Comment,

    #[token("==")]
    Eq,

    #[token("!=")]
    NotEq,

    #[token("<=")]
    LessEq,

    #[token(">=")]
    GreaterEq,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("=")]
    Assign,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("**")]
    Pow,

    #[token("*")]
    Mul,

    #[token("//")]
    FloorDiv,

    #[token("/")]
    Div,

    #[token("%")]
    Mod,

    #[token("^")]
    Caret,

    #[token("&")]
    BitAnd,

    #[token("|")]
    BitOr,

    #[token("~")]
    Tilde,

    #[token("!")]
    Bang,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("[")]
    OpenSquare,

    #[token("]")]
    CloseSquare,

    #[token("{")]
    OpenCurly,

    #[token("}")]
    CloseCurly,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[regex(r#""[^"\r\n]*""#)]
    #[regex(r"'[^'\r\n]*'")]
    Str,

    /// Increase of indentation at the start of a logical line. Never produced by the lexer, only
    /// by the layout pass of the parser.
    Indent,

    /// Decrease of indentation at the start of a logical line. Never produced by the lexer.
    Dedent,
}

impl TokenKind {
    /// Returns true if the token kind represents whitespace that has no meaning to the parser.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Returns true if the token kind is an opening bracket of any shape.
    pub fn is_opening(self) -> bool {
        matches!(self, TokenKind::OpenParen | TokenKind::OpenSquare | TokenKind::OpenCurly)
    }

    /// Returns true if the token kind is a closing bracket of any shape.
    pub fn is_closing(self) -> bool {
        matches!(self, TokenKind::CloseParen | TokenKind::CloseSquare | TokenKind::CloseCurly)
    }

    /// Returns the closing bracket matching this opening bracket.
    pub fn closing(self) -> Option<TokenKind> {
        match self {
            TokenKind::OpenParen => Some(TokenKind::CloseParen),
            TokenKind::OpenSquare => Some(TokenKind::CloseSquare),
            TokenKind::OpenCurly => Some(TokenKind::CloseCurly),
            _ => None,
        }
    }

    /// Returns true if the token kind can end an operand, e.g. the `x` in `x + 1`.
    pub fn ends_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Name | TokenKind::Int | TokenKind::Float | TokenKind::Str
                | TokenKind::CloseParen | TokenKind::CloseSquare | TokenKind::CloseCurly
        )
    }

    /// Returns true if the token kind is an operator that needs an operand on both sides.
    pub fn is_binary_only(self) -> bool {
        matches!(
            self,
            TokenKind::Eq | TokenKind::NotEq | TokenKind::LessEq | TokenKind::GreaterEq
                | TokenKind::Less | TokenKind::Greater | TokenKind::Assign
                | TokenKind::Pow | TokenKind::Mul | TokenKind::FloorDiv | TokenKind::Div
                | TokenKind::Mod | TokenKind::Caret | TokenKind::BitAnd | TokenKind::BitOr
        )
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}

impl Token<'_> {
    /// Returns true if the token represents whitespace that has no meaning to the parser.
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    /// Returns true if the token is the given keyword.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Name && self.lexeme == keyword
    }
}
