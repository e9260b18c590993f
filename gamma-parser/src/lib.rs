//! Tokenizer, input transformations and parser for the expression language Gamma evaluates.
//!
//! User input first goes through [`transform::stringify`], which turns relaxed math notation such as
//! `2x sin^2 x` into canonical source. The canonical source (or a program typed by the user) is
//! then parsed with [`parser::parse_expr`] or [`parser::parse_program`].

pub mod parser;
pub mod tokenizer;
pub mod transform;
