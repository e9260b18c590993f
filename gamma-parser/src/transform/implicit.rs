//! The relaxed-syntax passes: symbol splitting, implicit multiplication, implicit application and
//! function exponentiation.
//!
//! Multiplication and application need to know which names are applied to a parenthesized group.
//! Both group the top-level parentheses into [`Node::Group`]s (recursing into each group with the
//! same pass), turn a callable name followed by a group into a [`Node::Applied`], scan adjacent
//! pairs, then flatten everything back into tokens.

use crate::parser::error::Error;
use super::{constructor, error::TokenError, Kind, Resolve, Tok};

/// Greek letter names, which are never split into single-letter symbols.
const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa", "lamda",
    "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega",
];

/// A token, a parenthesized group, or a callable name applied to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Tok(Tok),

    /// The tokens of a group, including its parentheses.
    Group(Vec<Tok>),

    /// A callable name and the group it is applied to.
    Applied { function: Tok, args: Vec<Tok> },
}

impl Node {
    fn is_op(&self, op: &str) -> bool {
        matches!(self, Node::Tok(tok) if tok.is_op(op))
    }

    fn is_word(&self) -> bool {
        matches!(self, Node::Tok(tok) if tok.is_word())
    }

    fn is_applied(&self) -> bool {
        matches!(self, Node::Applied { .. })
    }

    /// Returns true if this is an operator, a line break or the end of the stream.
    fn is_op_like(&self) -> bool {
        matches!(self, Node::Tok(tok) if matches!(tok.kind, Kind::Op | Kind::NewLine | Kind::End))
    }

    /// Returns true if this is a word bound to something callable.
    fn is_callable(&self, names: &dyn Resolve) -> bool {
        matches!(self, Node::Tok(tok) if tok.kind == Kind::Name && names.is_callable(&tok.text))
    }
}

fn mismatched() -> Error {
    Error::new(vec![], TokenError::new("mismatched parentheses"))
}

/// Groups the top-level parentheses of the stream. The contents of each group are first run
/// through `recursor`.
fn group_parentheses(
    tokens: Vec<Tok>,
    names: &dyn Resolve,
    recursor: fn(Vec<Tok>, &dyn Resolve) -> Result<Vec<Tok>, Error>,
) -> Result<Vec<Node>, Error> {
    let mut result = Vec::new();
    let mut stacks: Vec<Vec<Tok>> = Vec::new();

    for tok in tokens {
        if tok.is_op("(") {
            stacks.push(Vec::new());
        } else if tok.is_op(")") {
            let mut stack = stacks.pop().ok_or_else(mismatched)?;
            stack.push(tok);
            match stacks.last_mut() {
                // the enclosing group is processed as a whole later
                Some(parent) => parent.extend(stack),
                None => {
                    let close = stack.pop().ok_or_else(mismatched)?;
                    let mut inner = stack.into_iter();
                    let open = inner.next().ok_or_else(mismatched)?;
                    let mut group = vec![open];
                    group.extend(recursor(inner.collect(), names)?);
                    group.push(close);
                    result.push(Node::Group(group));
                },
            }
            continue;
        }

        match stacks.last_mut() {
            Some(stack) => stack.push(tok),
            None => result.push(Node::Tok(tok)),
        }
    }

    if stacks.is_empty() {
        Ok(result)
    } else {
        Err(mismatched())
    }
}

/// Turns a callable name followed by a group into a [`Node::Applied`]. Other groups are flattened
/// back into tokens.
fn apply_functions(nodes: Vec<Node>, names: &dyn Resolve) -> Vec<Node> {
    let mut result: Vec<Node> = Vec::with_capacity(nodes.len());
    let mut symbol: Option<Tok> = None;

    for node in nodes {
        match node {
            Node::Group(group) => match symbol.take() {
                Some(function) if names.is_callable(&function.text) => {
                    result.pop();
                    result.push(Node::Applied { function, args: group });
                },
                _ => result.extend(group.into_iter().map(Node::Tok)),
            },
            Node::Tok(tok) if tok.kind == Kind::Name => {
                symbol = Some(tok.clone());
                result.push(Node::Tok(tok));
            },
            other => {
                symbol = None;
                result.push(other);
            },
        }
    }

    result
}

/// Expands every node back into plain tokens.
fn flatten(nodes: Vec<Node>) -> Vec<Tok> {
    let mut result = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Tok(tok) => result.push(tok),
            Node::Group(group) => result.extend(group),
            Node::Applied { function, args } => {
                result.push(function);
                result.extend(args);
            },
        }
    }
    result
}

/// Appends closing parentheses to the result, keeping [`Kind::End`] last.
fn close_parens<T>(result: &mut Vec<T>, count: usize, close: impl Fn() -> T, is_end: impl Fn(&T) -> bool) {
    if count == 0 {
        return;
    }
    let end = match result.last() {
        Some(last) if is_end(last) => result.pop(),
        _ => None,
    };
    result.extend(std::iter::repeat_with(close).take(count));
    result.extend(end);
}

/// Returns true if a quoted symbol name should be split into single-letter symbols.
fn splittable(name: &str) -> bool {
    if name.contains('_') || name.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    if GREEK.iter().any(|greek| greek.eq_ignore_ascii_case(name)) {
        return false;
    }
    name.chars().count() > 1
}

/// Splits symbols created by [`super::standard::auto_symbol`] into one symbol per letter, so that
/// `xyz` becomes `x*y*z` once multiplication is made implicit. Letters that are defined in the
/// namespace stay bare names.
pub fn split_symbols(tokens: Vec<Tok>, names: &dyn Resolve) -> Result<Vec<Tok>, Error> {
    let mut result: Vec<Tok> = Vec::with_capacity(tokens.len());
    let mut split = false;
    let mut skip_close = false;

    for tok in tokens {
        if skip_close {
            // the closing parenthesis of the symbol that was split
            skip_close = false;
            continue;
        }

        if tok.kind == Kind::Name && (tok.text == "Symbol" || tok.text == "Function") {
            split = true;
        } else if split && tok.kind == Kind::Name {
            split = false;
            let quoted = tok.text.strip_prefix('\'').and_then(|text| text.strip_suffix('\''));
            if let Some(symbol) = quoted.filter(|symbol| splittable(symbol)) {
                // drop `Symbol(`
                result.truncate(result.len().saturating_sub(2));
                for c in symbol.chars() {
                    let letter = c.to_string();
                    if names.resolve(&letter).is_some() {
                        result.push(Tok::name(letter));
                    } else {
                        result.extend(constructor("Symbol", Tok::name(format!("'{}'", c))));
                    }
                }
                skip_close = true;
                continue;
            }
        }

        result.push(tok);
    }

    Ok(result)
}

/// Inserts `*` wherever juxtaposition implies multiplication.
fn insert_multiplication(nodes: Vec<Node>, names: &dyn Resolve) -> Vec<Node> {
    let mut result = Vec::with_capacity(nodes.len());
    let star = || Node::Tok(Tok::op("*"));

    for pair in nodes.windows(2) {
        let (tok, next) = (&pair[0], &pair[1]);
        result.push(tok.clone());

        let not_callable = tok.is_word() && !tok.is_callable(names);
        let multiply = match tok {
            Node::Applied { .. } if next.is_applied() => true,
            Node::Applied { function, args } if next.is_op("(") => {
                // `f(x)` with a single-letter symbol `f` creates an undefined function instead
                let single_letter_symbol = function.text == "Symbol"
                    && args.get(1).map_or(false, |arg| arg.text.chars().count() == 3);
                !single_letter_symbol
            },
            Node::Tok(close) if close.is_op(")") => {
                next.is_applied() || next.is_word() || next.is_op("(")
            },
            Node::Applied { .. } => next.is_word(),
            _ if not_callable && next.is_op("(") => true,
            _ if not_callable && next.is_word() && !next.is_callable(names) => true,
            _ => not_callable && (next.is_applied() || next.is_word()),
        };

        if multiply {
            result.push(star());
        }
    }

    result.extend(nodes.last().cloned());
    result
}

/// Makes the multiplication operator optional: `2x`, `x y`, `(x+1)(x-1)`, `sin(x)cos(x)`.
pub fn implicit_multiplication(tokens: Vec<Tok>, names: &dyn Resolve) -> Result<Vec<Tok>, Error> {
    let nodes = group_parentheses(tokens, names, implicit_multiplication)?;
    let nodes = apply_functions(nodes, names);
    Ok(flatten(insert_multiplication(nodes, names)))
}

/// Adds the parentheses of calls written without them, such as `sin x`.
fn insert_application(nodes: Vec<Node>, names: &dyn Resolve) -> Vec<Node> {
    let mut result = Vec::with_capacity(nodes.len());
    let open = || Node::Tok(Tok::op("("));
    let mut append_paren = 0usize;
    let mut skip = 0usize;
    let mut exponent_skip = false;

    for pair in nodes.windows(2) {
        let (tok, next) = (&pair[0], &pair[1]);
        result.push(tok.clone());

        if tok.is_word() && !next.is_op_like() {
            if tok.is_callable(names) {
                result.push(open());
                append_paren += 1;
            }
        } else if tok.is_word() && next.is_op("**") {
            // function exponentiation, as in `sin**2 x`
            if tok.is_callable(names) {
                exponent_skip = true;
            }
        } else if exponent_skip {
            // wait for the exponent (or the `*` implicit multiplication put after it)
            if (tok.is_applied() || tok.is_op("*")) && !next.is_op("*") {
                if !next.is_op("(") {
                    result.push(open());
                    append_paren += 1;
                }
                exponent_skip = false;
            }
        } else if append_paren > 0 {
            if next.is_op("^") || next.is_op("**") || next.is_op("*") {
                skip = 1;
                continue;
            }
            if skip > 0 {
                skip -= 1;
                continue;
            }
            result.push(Node::Tok(Tok::op(")")));
            append_paren -= 1;
        }
    }

    result.extend(nodes.last().cloned());
    close_parens(
        &mut result,
        append_paren,
        || Node::Tok(Tok::op(")")),
        |node| matches!(node, Node::Tok(tok) if tok.kind == Kind::End),
    );
    result
}

/// Makes parentheses optional for single-argument calls: `sin x`, `sin cos x`.
pub fn implicit_application(tokens: Vec<Tok>, names: &dyn Resolve) -> Result<Vec<Tok>, Error> {
    let nodes = group_parentheses(tokens, names, implicit_application)?;
    let nodes = apply_functions(nodes, names);
    Ok(flatten(insert_application(nodes, names)))
}

/// Moves the exponent of an exponentiated function after its call: `sin**2(x)` becomes
/// `sin(x)**2`.
pub fn function_exponentiation(tokens: Vec<Tok>, names: &dyn Resolve) -> Result<Vec<Tok>, Error> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut exponent: Vec<Tok> = Vec::new();
    let mut consuming = false;
    let mut level = 0i32;

    for pair in tokens.windows(2) {
        let (tok, next) = (&pair[0], &pair[1]);

        if tok.is_word() && next.is_op("**") {
            if names.is_callable(&tok.text) {
                consuming = true;
            }
        } else if consuming {
            let tok = if tok.kind == Kind::Name && tok.text == "Function" {
                Tok::name("Symbol")
            } else {
                tok.clone()
            };

            // stop after the `)` of the exponent, or drop the `*` implicit multiplication added
            let close_open = tok.is_op(")") && next.is_op("(");
            let star_open = tok.is_op("*") && next.is_op("(");
            exponent.push(tok);
            if close_open {
                consuming = false;
            }
            if star_open {
                consuming = false;
                exponent.pop();
            }
            continue;
        } else if !exponent.is_empty() {
            if tok.is_op("(") {
                level += 1;
            } else if tok.is_op(")") {
                level -= 1;
            }
            if level == 0 {
                result.push(tok.clone());
                result.append(&mut exponent);
                continue;
            }
        }

        result.push(tok.clone());
    }

    result.extend(tokens.last().cloned());
    if !exponent.is_empty() {
        let end = match result.last() {
            Some(last) if last.kind == Kind::End => result.pop(),
            _ => None,
        };
        result.append(&mut exponent);
        result.extend(end);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::transform::{lex, untokenize, Binding};

    fn names(name: &str) -> Option<Binding> {
        match name {
            "sin" | "cos" | "Symbol" | "Integer" => Some(Binding::Callable),
            "E" => Some(Binding::Value),
            _ => None,
        }
    }

    #[test]
    fn split_keeps_defined_letters() {
        let tokens = vec![
            Tok::name("Symbol"),
            Tok::op("("),
            Tok::name("'xE'"),
            Tok::op(")"),
            Tok::end(),
        ];
        let split = split_symbols(tokens, &names).unwrap();
        assert_eq!(untokenize(&split), "Symbol('x')E");
    }

    #[test]
    fn user_strings_are_not_split() {
        let split = split_symbols(lex("Symbol('xy')").unwrap(), &names).unwrap();
        assert_eq!(untokenize(&split), "Symbol('xy')");
    }

    #[test]
    fn groups_must_balance() {
        assert!(implicit_multiplication(lex("(x))").unwrap(), &names).is_err());
        assert!(implicit_application(lex("((x)").unwrap(), &names).is_err());
    }

    #[test]
    fn nested_application() {
        let tokens = lex("sin cos E").unwrap();
        let applied = implicit_application(tokens, &names).unwrap();
        assert_eq!(untokenize(&applied), "sin(cos(E))");
    }

    #[test]
    fn greek_names_are_not_split() {
        assert!(!splittable("theta"));
        assert!(!splittable("Omega"));
        assert!(splittable("xy"));
        assert!(!splittable("x"));
    }
}
