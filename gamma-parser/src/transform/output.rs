//! Checks the final token stream and joins it back into source text.

use crate::{parser::error::Error, tokenizer::is_keyword};
use super::{error::TokenError, Kind, Tok};

/// Operators that need an operand on both sides.
const BINARY_ONLY: &[&str] = &[
    "**", "*", "/", "//", "%", "^", "&", "|", "==", "!=", "<", "<=", ">", ">=", "=",
];

/// Comparison operators, which are always surrounded by spaces.
const COMPARISONS: &[&str] = &["==", "!=", "<", "<=", ">", ">="];

fn closing_for(open: &str) -> Option<&'static str> {
    match open {
        "(" => Some(")"),
        "[" => Some("]"),
        "{" => Some("}"),
        _ => None,
    }
}

fn is_opening(tok: &Tok) -> bool {
    tok.kind == Kind::Op && closing_for(&tok.text).is_some()
}

fn is_closing(tok: &Tok) -> bool {
    tok.kind == Kind::Op && matches!(tok.text.as_str(), ")" | "]" | "}")
}

/// Returns true if the token can end an operand, so that a binary operator may follow it.
fn ends_operand(tok: &Tok) -> bool {
    match tok.kind {
        Kind::Number | Kind::Str => true,
        Kind::Name => !is_keyword(&tok.text) || matches!(tok.text.as_str(), "True" | "False" | "None"),
        Kind::Op => is_closing(tok),
        Kind::NewLine | Kind::End => false,
    }
}

/// Rejects streams that no expression can be built from: unbalanced brackets, and binary
/// operators with no left operand.
pub fn validate(tokens: &[Tok]) -> Result<(), Error> {
    let mut brackets: Vec<&'static str> = Vec::new();
    let mut prev: Option<&Tok> = None;

    for tok in tokens {
        if tok.kind == Kind::Op {
            if let Some(close) = closing_for(&tok.text) {
                brackets.push(close);
            } else if is_closing(tok) {
                if brackets.pop() != Some(tok.text.as_str()) {
                    return Err(Error::new(vec![], TokenError::new(format!("unmatched `{}`", tok.text))));
                }
            } else if BINARY_ONLY.contains(&tok.text.as_str())
                && !prev.map_or(false, ends_operand)
            {
                return Err(Error::new(
                    vec![],
                    TokenError::new(format!("`{}` is missing its left operand", tok.text)),
                ));
            }
        }

        if tok.kind != Kind::NewLine {
            prev = Some(tok);
        }
    }

    match brackets.pop() {
        Some(close) => Err(Error::new(vec![], TokenError::new(format!("missing `{}`", close)))),
        None => Ok(()),
    }
}

/// Joins tokens back into source text.
///
/// Commas are followed by a space, binary `+`/`-`, comparisons, keywords and top-level `=` are
/// surrounded by spaces, and adjacent words are separated by a space. Everything else is joined
/// directly, so the output of the pipeline reads like `diff(cos(Symbol('x'))**Integer(7), x)`.
pub fn untokenize(tokens: &[Tok]) -> String {
    let mut out = String::new();
    let mut brackets: Vec<&str> = Vec::new();
    let mut prev: Option<&Tok> = None;
    let mut space_after = false;

    for tok in tokens {
        match tok.kind {
            Kind::End => break,
            Kind::NewLine => {
                out.push('\n');
                prev = None;
                space_after = false;
                continue;
            },
            _ => {},
        }

        let text = tok.text.as_str();
        let top_level = brackets.is_empty();
        let is_keyword_tok = tok.kind == Kind::Name && is_keyword(text);
        let binary = prev.map_or(false, ends_operand);

        let mut space_before = false;
        let mut space_after_this = false;
        if tok.kind == Kind::Op {
            match text {
                "+" | "-" if binary => {
                    space_before = true;
                    space_after_this = true;
                },
                "=" if top_level => {
                    space_before = true;
                    space_after_this = true;
                },
                "," => space_after_this = true,
                ":" => space_after_this = brackets.last() != Some(&"["),
                _ if COMPARISONS.contains(&text) => {
                    space_before = true;
                    space_after_this = true;
                },
                _ => {},
            }
        } else if is_keyword_tok && !matches!(text, "True" | "False" | "None") {
            space_before = true;
            space_after_this = true;
        } else if prev.map_or(false, |prev| matches!(prev.kind, Kind::Name | Kind::Number | Kind::Str)) {
            space_before = true;
        }

        let joined = match prev {
            None => false,
            Some(prev) => is_opening(prev) || is_closing(tok) || tok.is_op(","),
        };
        if !joined && prev.is_some() && (space_before || space_after) {
            out.push(' ');
        }
        out.push_str(text);

        if is_opening(tok) {
            brackets.push(text);
        } else if is_closing(tok) {
            brackets.pop();
        }
        prev = Some(tok);
        space_after = space_after_this;
    }

    out
}

/// Matches `Integer(`, `Symbol(`, `Float(` or `Rational(` starting at `i`, if the name is not part
/// of a longer identifier.
fn constructor_at(text: &str, i: usize) -> Option<usize> {
    const CONSTRUCTORS: &[&str] = &["Integer", "Symbol", "Float", "Rational"];
    let preceded_by_ident = text[..i]
        .chars()
        .next_back()
        .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_');
    if preceded_by_ident {
        return None;
    }
    CONSTRUCTORS
        .iter()
        .find(|name| text[i..].starts_with(*name))
        .map(|name| i + name.len())
}

/// Parses `\s*\(['"]?([a-zA-Z0-9.]+)['"]?\s*\)` at the start of `rest`, returning the argument and
/// the length of the match.
fn single_argument(rest: &str) -> Option<(&str, usize)> {
    let trimmed = rest.trim_start();
    let mut pos = rest.len() - trimmed.len();
    pos += rest[pos..].strip_prefix('(').map(|_| 1)?;
    if rest[pos..].starts_with(|c: char| c == '\'' || c == '"') {
        pos += 1;
    }

    let arg_len = rest[pos..]
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.'))
        .unwrap_or(rest.len() - pos);
    if arg_len == 0 {
        return None;
    }
    let arg = &rest[pos..pos + arg_len];
    pos += arg_len;

    if rest[pos..].starts_with(|c: char| c == '\'' || c == '"') {
        pos += 1;
    }
    let after = &rest[pos..];
    pos += after.len() - after.trim_start().len();
    rest[pos..].strip_prefix(')')?;
    Some((arg, pos + 1))
}

/// Strips the constructors the pipeline adds, for display: `Integer(7)` becomes `7` and
/// `Symbol('x')` becomes `x`. Only constructors with a single alphanumeric argument are removed, so
/// `Rational(1, 2)` is left alone.
pub fn remove_constructors(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < text.len() {
        if let Some(after_name) = constructor_at(text, i) {
            if let Some((arg, len)) = single_argument(&text[after_name..]) {
                out.push_str(arg);
                i = after_name + len;
                continue;
            }
        }

        // the constructors and their arguments are ascii, so stepping by whole chars is enough
        let Some(c) = text[i..].chars().next() else { break };
        out.push(c);
        i += c.len_utf8();
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::transform::lex;

    fn join(input: &str) -> String {
        untokenize(&lex(input).unwrap())
    }

    #[test]
    fn spacing() {
        assert_eq!(join("f( a,b )"), "f(a, b)");
        assert_eq!(join("x+-y"), "x + -y");
        assert_eq!(join("-x**-2"), "-x**-2");
        assert_eq!(join("a==b"), "a == b");
        assert_eq!(join("x=f(a,k=1)"), "x = f(a, k=1)");
        assert_eq!(join("{a:1}"), "{a: 1}");
        assert_eq!(join("not x and(y or z)"), "not x and (y or z)");
        assert_eq!(join("(a,)"), "(a,)");
    }

    #[test]
    fn operator_sequences() {
        assert!(validate(&lex("** x").unwrap()).is_err());
        assert!(validate(&lex("f(, x)").unwrap()).is_ok());
        assert!(validate(&lex("f(* x)").unwrap()).is_err());
        assert!(validate(&lex("x * * y").unwrap()).is_err());
        assert!(validate(&lex("x * -y").unwrap()).is_ok());
        assert!(validate(&lex("x == not y").unwrap()).is_ok());
    }

    #[test]
    fn brackets() {
        assert!(validate(&lex("f([x)]").unwrap()).is_err());
        assert!(validate(&lex("{[()]}").unwrap()).is_ok());
        assert!(validate(&lex("(").unwrap()).is_err());
    }

    #[test]
    fn constructors() {
        assert_eq!(remove_constructors("Symbol('x')**Integer(2)"), "x**2");
        assert_eq!(remove_constructors("Float(\"2.5\")"), "2.5");
        assert_eq!(remove_constructors("MySymbol('x')"), "MySymbol('x')");
        assert_eq!(remove_constructors("Symbol('x_1')"), "Symbol('x_1')");
        assert_eq!(remove_constructors("Integer (7 )"), "7");
    }
}
