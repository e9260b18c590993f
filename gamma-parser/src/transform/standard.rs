//! Normalization passes that run before the implicit passes.

use crate::{parser::error::Error, tokenizer::is_keyword};
use super::{constructor, error::TokenError, Kind, Resolve, Tok};

/// Names that are rewritten to a canonical name, so that the displayed input shows the canonical
/// function.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("derivative", "diff"),
    ("derive", "diff"),
    ("integral", "integrate"),
    ("antiderivative", "integrate"),
];

/// Constructors whose numeric arguments are left alone by [`auto_number`].
const NUMERIC_CONSTRUCTORS: &[&str] = &["Integer", "Float", "Rational"];

/// Replaces whole-word synonyms with their canonical name. Must run before [`auto_symbol`], or the
/// synonyms would become symbols.
pub fn synonyms(tokens: Vec<Tok>, _: &dyn Resolve) -> Result<Vec<Tok>, Error> {
    Ok(tokens
        .into_iter()
        .map(|tok| match tok.kind {
            Kind::Name => SYNONYMS
                .iter()
                .find(|(alias, _)| *alias == tok.text)
                .map_or(tok, |(_, canonical)| Tok::name(*canonical)),
            _ => tok,
        })
        .collect())
}

/// Wraps names that are not defined in the namespace in `Symbol('name')`.
///
/// Keywords, attribute names (`expr.doit`) and keyword argument names (`f(x, dict=True)`) are
/// left alone. The quoted name is emitted as a [`Kind::Name`] token so that
/// [`super::implicit::split_symbols`] can recognize symbols created here.
pub fn auto_symbol(tokens: Vec<Tok>, names: &dyn Resolve) -> Result<Vec<Tok>, Error> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut prev: Option<Tok> = None;

    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind != Kind::Name {
            result.push(tok.clone());
            prev = Some(tok.clone());
            continue;
        }

        let next = tokens.get(i + 1);
        let after_dot = prev.as_ref().map_or(false, |prev| prev.is_op("."));
        let is_kwarg = prev.as_ref().map_or(false, |prev| prev.is_op("(") || prev.is_op(","))
            && next.map_or(false, |next| next.is_op("="));

        if is_keyword(&tok.text) || after_dot || is_kwarg || names.resolve(&tok.text).is_some() {
            // a kept name does not become the previous token
            result.push(tok.clone());
            continue;
        }

        result.extend(constructor("Symbol", Tok::name(format!("'{}'", tok.text))));
        prev = Some(tok.clone());
    }

    Ok(result)
}

/// Returns true if the end of `result` is inside the argument list of a numeric constructor,
/// such as `Integer(` or `Rational(1, `.
fn inside_numeric_constructor(result: &[Tok]) -> bool {
    let mut rest = result;
    while let [init @ .., last] = rest {
        if last.kind == Kind::Number || last.is_op(",") || last.is_op("-") {
            rest = init;
        } else {
            break;
        }
    }

    matches!(
        rest,
        [.., ctor, open] if open.is_op("(")
            && ctor.kind == Kind::Name
            && NUMERIC_CONSTRUCTORS.contains(&ctor.text.as_str())
    )
}

/// Wraps integer literals in `Integer(n)` and decimal literals in `Float('n')`, so that arithmetic
/// on them is exact.
///
/// Numbers already inside a numeric constructor are left alone, which makes the pipeline
/// idempotent on its own output.
pub fn auto_number(tokens: Vec<Tok>, _: &dyn Resolve) -> Result<Vec<Tok>, Error> {
    let mut result: Vec<Tok> = Vec::with_capacity(tokens.len());

    for tok in tokens {
        if tok.kind != Kind::Number || inside_numeric_constructor(&result) {
            result.push(tok);
            continue;
        }

        let is_float = tok.text.contains(|c: char| matches!(c, '.' | 'e' | 'E'));
        if is_float {
            result.extend(constructor("Float", Tok::string(format!("'{}'", tok.text))));
        } else {
            result.extend(constructor("Integer", tok));
        }
    }

    Ok(result)
}

/// Wraps the operand before a run of `!` in `factorial(..)` (one `!`) or `factorial2(..)` (two).
fn add_factorial(name: &str, result: Vec<Tok>) -> Result<Vec<Tok>, Error> {
    if result.last().map_or(true, |tok| tok.is_op("(")) {
        return Err(Error::new(vec![], TokenError::new("`!` must follow an operand")));
    }

    let mut depth = 0i32;
    for i in (0..result.len()).rev() {
        if result[i].is_op(")") {
            depth += 1;
        } else if result[i].is_op("(") {
            depth -= 1;
        }

        if depth == 0 {
            let start = if i >= 1 && result[i - 1].kind == Kind::Name { i - 1 } else { i };
            let mut out = Vec::with_capacity(result.len() + 3);
            out.extend_from_slice(&result[..start]);
            out.push(Tok::name(name));
            out.push(Tok::op("("));
            out.extend_from_slice(&result[start..]);
            out.push(Tok::op(")"));
            return Ok(out);
        }
    }

    Ok(result)
}

/// Converts postfix factorial notation: `n!` to `factorial(n)`, `n!!` to `factorial2(n)`.
pub fn factorial_notation(tokens: Vec<Tok>, _: &dyn Resolve) -> Result<Vec<Tok>, Error> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut count = 0;

    for tok in tokens {
        if tok.is_op("!") {
            count += 1;
            continue;
        }

        result = match count {
            0 => result,
            1 => add_factorial("factorial", result)?,
            2 => add_factorial("factorial2", result)?,
            _ => return Err(Error::new(vec![], TokenError::new("too many `!`"))),
        };
        count = 0;
        result.push(tok);
    }

    Ok(result)
}

/// Treats `^` as exponentiation.
pub fn convert_xor(tokens: Vec<Tok>, _: &dyn Resolve) -> Result<Vec<Tok>, Error> {
    Ok(tokens
        .into_iter()
        .map(|tok| if tok.is_op("^") { Tok::op("**") } else { tok })
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::transform::{lex, untokenize, Binding};

    fn nothing(_: &str) -> Option<Binding> {
        None
    }

    fn run(pass: fn(Vec<Tok>, &dyn Resolve) -> Result<Vec<Tok>, Error>, input: &str) -> String {
        untokenize(&pass(lex(input).unwrap(), &nothing).unwrap())
    }

    #[test]
    fn synonyms_are_whole_words() {
        assert_eq!(run(synonyms, "derive(f) + derived"), "diff(f) + derived");
    }

    #[test]
    fn attribute_names_are_not_symbols() {
        assert_eq!(run(auto_symbol, "a.doit()"), "Symbol('a').doit()");
    }

    #[test]
    fn numbers_in_constructors_are_kept() {
        assert_eq!(run(auto_number, "Rational(1, 2) + 3"), "Rational(1, 2) + Integer(3)");
        assert_eq!(run(auto_number, "Integer(-4)"), "Integer(-4)");
        assert_eq!(run(auto_number, "2e3"), "Float('2e3')");
    }

    #[test]
    fn double_factorial() {
        assert_eq!(run(factorial_notation, "n!!"), "factorial2(n)");
        assert_eq!(run(factorial_notation, "(n + 1)!"), "factorial((n + 1))");
        assert!(factorial_notation(lex("n!!!").unwrap(), &nothing).is_err());
    }
}
