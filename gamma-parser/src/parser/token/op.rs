//! Structs to help parse binary and unary operators.

use crate::{
    parser::{Associativity, Precedence},
    tokenizer::{Token, TokenKind},
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The unary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpKind {
    /// Logical not (`not x`).
    Not,

    /// Bitwise / logical inversion (`~x`).
    Invert,

    /// Negation (`-x`).
    Neg,

    /// Unary plus (`+x`).
    Pos,
}

impl UnaryOpKind {
    /// Returns the precedence of the unary operation. The operand of the operator is parsed with
    /// this precedence as its minimum.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Not => Precedence::Compare,
            Self::Invert | Self::Neg | Self::Pos => Precedence::Exp,
        }
    }

    /// Returns the unary operator the token represents, if any.
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Sub => Some(Self::Neg),
            TokenKind::Add => Some(Self::Pos),
            TokenKind::Tilde => Some(Self::Invert),
            TokenKind::Name if token.lexeme == "not" => Some(Self::Not),
            _ => None,
        }
    }
}

impl fmt::Display for UnaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not => write!(f, "not "),
            Self::Invert => write!(f, "~"),
            Self::Neg => write!(f, "-"),
            Self::Pos => write!(f, "+"),
        }
    }
}

/// A unary operator that takes one operand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryOp {
    /// The kind of unary operator.
    pub kind: UnaryOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

/// The binary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Pow,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Add,
    Sub,
    BitAnd,
    BitXor,
    BitOr,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Eq,
    NotEq,
    In,
    And,
    Or,
}

impl BinOpKind {
    /// Returns the precedence of the binary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Pow => Precedence::Exp,
            Self::Mul | Self::Div | Self::FloorDiv | Self::Mod => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
            Self::BitAnd => Precedence::BitAnd,
            Self::BitXor => Precedence::BitXor,
            Self::BitOr => Precedence::BitOr,
            Self::Greater | Self::GreaterEq | Self::Less | Self::LessEq
                | Self::Eq | Self::NotEq | Self::In => Precedence::Compare,
            Self::And => Precedence::And,
            Self::Or => Precedence::Or,
        }
    }

    /// Returns the associativity of the binary operation.
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Pow => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Returns true if the operation is a comparison, which chain in `a < b < c`.
    pub fn is_comparison(&self) -> bool {
        self.precedence() == Precedence::Compare
    }

    /// Returns the binary operator the token represents, if any.
    pub fn from_token(token: &Token) -> Option<Self> {
        Some(match token.kind {
            TokenKind::Pow => Self::Pow,
            TokenKind::Mul => Self::Mul,
            TokenKind::Div => Self::Div,
            TokenKind::FloorDiv => Self::FloorDiv,
            TokenKind::Mod => Self::Mod,
            TokenKind::Add => Self::Add,
            TokenKind::Sub => Self::Sub,
            TokenKind::BitAnd => Self::BitAnd,
            TokenKind::Caret => Self::BitXor,
            TokenKind::BitOr => Self::BitOr,
            TokenKind::Greater => Self::Greater,
            TokenKind::GreaterEq => Self::GreaterEq,
            TokenKind::Less => Self::Less,
            TokenKind::LessEq => Self::LessEq,
            TokenKind::Eq => Self::Eq,
            TokenKind::NotEq => Self::NotEq,
            TokenKind::Name => match token.lexeme {
                "and" => Self::And,
                "or" => Self::Or,
                "in" => Self::In,
                _ => return None,
            },
            _ => return None,
        })
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pow => "**",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::In => "in",
            Self::And => "and",
            Self::Or => "or",
        };
        f.write_str(s)
    }
}

/// A binary operator that takes two operands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    /// The kind of binary operator.
    pub kind: BinOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl BinOp {
    /// Returns the precedence of the binary operator.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    /// Returns the associativity of the binary operator.
    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}
