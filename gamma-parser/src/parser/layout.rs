//! Turns the raw token stream into the stream the parser consumes.
//!
//! In statement mode, leading whitespace of each logical line is converted into `Indent` and
//! `Dedent` tokens, blank lines are dropped, and newlines inside brackets are ignored. In
//! expression mode, all whitespace is dropped and only newlines at bracket depth zero survive.

use super::error::{kind, Error};
use crate::tokenizer::{Token, TokenKind};

/// The number of columns a tab advances to.
const TAB_WIDTH: usize = 8;

/// Computes the column width of a run of indentation whitespace.
fn indent_width(whitespace: &str) -> usize {
    whitespace.chars().fold(0, |width, c| match c {
        '\t' => (width / TAB_WIDTH + 1) * TAB_WIDTH,
        _ => width + 1,
    })
}

/// Creates a synthetic token at the given position.
fn synthetic(kind: TokenKind, at: usize) -> Token<'static> {
    Token { span: at..at, kind, lexeme: "" }
}

/// Converts the tokens of a program into a stream with explicit indentation tokens.
pub fn layout<'source>(tokens: &[Token<'source>]) -> Result<Vec<Token<'source>>, Error> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut levels = vec![0usize];
    let mut i = 0;

    while i < tokens.len() {
        // start of a physical line
        let mut width = 0;
        if tokens[i].kind == TokenKind::Whitespace {
            width = indent_width(tokens[i].lexeme);
            i += 1;
        }
        if i < tokens.len() && tokens[i].kind == TokenKind::Comment {
            i += 1;
        }
        let Some(first) = tokens.get(i) else {
            break;
        };
        if first.kind == TokenKind::NewLine {
            // blank line
            i += 1;
            continue;
        }

        let line_start = first.span.start;
        let current = levels.last().copied().unwrap_or(0);
        if width > current {
            // the parser rejects an indent that does not follow a block header
            levels.push(width);
            out.push(synthetic(TokenKind::Indent, line_start));
        } else if width < current {
            while levels.last().map_or(false, |&level| width < level) {
                levels.pop();
                out.push(synthetic(TokenKind::Dedent, line_start));
            }
            if levels.last().copied().unwrap_or(0) != width {
                return Err(Error::new(vec![line_start..line_start + 1], kind::InconsistentDedent));
            }
        }

        // copy the logical line, which may span several physical lines inside brackets
        let mut brackets: Vec<(TokenKind, usize)> = Vec::new();
        while i < tokens.len() {
            let token = &tokens[i];
            i += 1;

            if token.kind.is_opening() {
                brackets.push((token.kind, token.span.start));
            } else if token.kind.is_closing() {
                match brackets.pop() {
                    Some((open, _)) if open.closing() == Some(token.kind) => (),
                    _ => return Err(Error::new(vec![token.span.clone()], kind::UnmatchedBracket)),
                }
            }

            match token.kind {
                TokenKind::NewLine if brackets.is_empty() => {
                    out.push(token.clone());
                    break;
                },
                TokenKind::NewLine => (),
                _ if token.is_whitespace() => (),
                _ => out.push(token.clone()),
            }
        }

        if let Some((open, start)) = brackets.last() {
            return Err(unclosed(*open, *start));
        }
    }

    let end = tokens.last().map_or(0, |token| token.span.end);
    if !matches!(out.last(), None | Some(Token { kind: TokenKind::NewLine, .. })) {
        out.push(synthetic(TokenKind::NewLine, end));
    }
    while levels.len() > 1 {
        levels.pop();
        out.push(synthetic(TokenKind::Dedent, end));
    }

    Ok(out)
}

/// Converts the tokens of a single expression into a stream without whitespace. Newlines are kept
/// only at bracket depth zero, and leading / trailing newlines are dropped.
pub fn strip<'source>(tokens: &[Token<'source>]) -> Vec<Token<'source>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut depth = 0usize;

    for token in tokens {
        if token.kind.is_opening() {
            depth += 1;
        } else if token.kind.is_closing() {
            depth = depth.saturating_sub(1);
        }

        match token.kind {
            TokenKind::NewLine if depth > 0 || out.is_empty() => (),
            _ if token.is_whitespace() => (),
            _ => out.push(token.clone()),
        }
    }

    while matches!(out.last(), Some(Token { kind: TokenKind::NewLine, .. })) {
        out.pop();
    }

    out
}

/// Builds the error for a bracket that is never closed.
fn unclosed(open: TokenKind, start: usize) -> Error {
    let closing = match open {
        TokenKind::OpenSquare => "]",
        TokenKind::OpenCurly => "}",
        _ => ")",
    };
    Error::new(vec![start..start + 1], kind::UnclosedBracket { closing })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::tokenizer::tokenize_complete;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let tokens = tokenize_complete(source).unwrap();
        layout(&tokens).unwrap().into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn indent_and_dedent() {
        assert_eq!(kinds("if x:\n\ty\nz"), vec![
            TokenKind::Name,
            TokenKind::Name,
            TokenKind::Colon,
            TokenKind::NewLine,
            TokenKind::Indent,
            TokenKind::Name,
            TokenKind::NewLine,
            TokenKind::Dedent,
            TokenKind::Name,
            TokenKind::NewLine,
        ]);
    }

    #[test]
    fn newlines_inside_brackets_are_ignored() {
        assert_eq!(kinds("f(1,\n  2)"), vec![
            TokenKind::Name,
            TokenKind::OpenParen,
            TokenKind::Int,
            TokenKind::Comma,
            TokenKind::Int,
            TokenKind::CloseParen,
            TokenKind::NewLine,
        ]);
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        assert_eq!(kinds("a\n\n   # note\nb"), vec![
            TokenKind::Name,
            TokenKind::NewLine,
            TokenKind::Name,
            TokenKind::NewLine,
        ]);
    }

    #[test]
    fn unclosed_bracket() {
        let tokens = tokenize_complete("f(1, 2").unwrap();
        assert!(layout(&tokens).is_err());
    }

    #[test]
    fn tab_width() {
        assert_eq!(indent_width("\t"), 8);
        assert_eq!(indent_width("  \t"), 8);
        assert_eq!(indent_width("    "), 4);
    }
}
