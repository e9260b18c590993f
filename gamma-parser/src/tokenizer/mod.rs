pub mod token;

use crate::parser::error::{kind, Error};
use logos::{Lexer, Logos};
pub use token::{is_keyword, Token, TokenKind, KEYWORDS};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Characters that do not start any token, such as `$`, produce an error pointing at them.
pub fn tokenize_complete(input: &str) -> Result<Box<[Token]>, Error> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(Token {
                span: lexer.span(),
                kind,
                lexeme: lexer.slice(),
            }),
            Err(()) => return Err(Error::new(
                vec![lexer.span()],
                kind::InvalidCharacter { lexeme: lexer.slice().to_string() },
            )),
        }
    }

    Ok(tokens.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2",
            [
                (TokenKind::Int, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn caret_and_power() {
        compare_tokens(
            "x^2**3",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Caret, "^"),
                (TokenKind::Int, "2"),
                (TokenKind::Pow, "**"),
                (TokenKind::Int, "3"),
            ],
        );
    }

    #[test]
    fn juxtaposed_number_and_name() {
        compare_tokens(
            "2x + 1.5e3",
            [
                (TokenKind::Int, "2"),
                (TokenKind::Name, "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, "1.5e3"),
            ],
        );
    }

    #[test]
    fn statement_tokens() {
        compare_tokens(
            "def f(x):\n\treturn 'a' # done",
            [
                (TokenKind::Name, "def"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "f"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "x"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Colon, ":"),
                (TokenKind::NewLine, "\n"),
                (TokenKind::Whitespace, "\t"),
                (TokenKind::Name, "return"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Str, "'a'"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Comment, "# done"),
            ],
        );
    }

    #[test]
    fn invalid_character() {
        let err = tokenize_complete("1 + $").unwrap_err();
        assert_eq!(err.spans, vec![4..5]);
    }
}
