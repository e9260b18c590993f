//! The LaTeX printer, used for the rendered output of every card.

use crate::primitive::prec_to_digits;
use crate::symbolic::expr::{number::format_float, order::ordered_terms, Constant, Limit, Primary, RelOp, SymExpr};
use super::{fraction, precedence_traditional, strip_zeros, PREC_ATOM, PREC_FUNC, PREC_MUL, PREC_POW};

/// Functions that have their own LaTeX command, printed as `\name`.
const ACCEPTED_FUNCTIONS: &[&str] = &[
    "arcsin", "arccos", "arctan", "sin", "cos", "tan", "sinh", "cosh", "tanh", "sqrt", "ln",
    "log", "sec", "csc", "cot", "coth", "re", "im", "frac", "root", "arg",
];

/// Greek letters, spelled the way they can be typed as a symbol name.
const GREEK_LETTERS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega",
];

/// Named symbols other than Greek letters that have their own LaTeX command.
const OTHER_SYMBOLS: &[&str] = &[
    "aleph", "beth", "daleth", "gimel", "ell", "eth", "hbar", "hslash", "mho", "wp", "nabla",
];

/// Converts an expression to LaTeX.
pub fn latex(expr: &SymExpr) -> String {
    print(expr)
}

fn add_parens(tex: &str) -> String {
    format!(r"\left({}\right)", tex)
}

/// Prints the item, wrapped in parentheses if it binds less tightly than `level`. In strict mode,
/// items that bind exactly as tightly are left alone.
fn parenthesize(item: &SymExpr, level: u32, strict: bool) -> String {
    let prec = precedence_traditional(item);
    if prec < level || (!strict && prec <= level) {
        add_parens(&print(item))
    } else {
        print(item)
    }
}

/// Wraps LaTeX that already carries a superscript in braces, so another superscript can follow.
fn parenthesize_super(tex: String) -> String {
    if tex.contains('^') {
        format!("{{{}}}", tex)
    } else {
        tex
    }
}

fn print(expr: &SymExpr) -> String {
    match expr {
        SymExpr::Primary(primary) => print_primary(primary, expr),
        SymExpr::Add(terms) => print_add(terms),
        SymExpr::Mul(_) => print_mul(expr),
        SymExpr::Exp(base, exp) => print_pow(expr, base, exp),
        SymExpr::Derivative(inner, vars) => print_derivative(inner, vars),
        SymExpr::Integral(inner, limits) => print_integral(inner, limits),
        SymExpr::Sum(inner, limit) => print_big_operator(r"\sum", inner, limit),
        SymExpr::Product(inner, limit) => print_big_operator(r"\prod", inner, limit),
        SymExpr::Relational(op, lhs, rhs) => {
            let symbol = match op {
                RelOp::Eq => "=",
                RelOp::Ne => r"\neq",
                RelOp::Lt => "<",
                RelOp::Le => r"\leq",
                RelOp::Gt => ">",
                RelOp::Ge => r"\geq",
            };
            format!("{} {} {}", print(lhs), symbol, print(rhs))
        },
        SymExpr::And(items) => print_logic_op(items, r"\wedge"),
        SymExpr::Or(items) => print_logic_op(items, r"\vee"),
        SymExpr::Xor(items) => print_logic_op(items, r"\veebar"),
        SymExpr::Not(inner) => {
            if is_boolean(inner) {
                format!(r"\neg {}", add_parens(&print(inner)))
            } else {
                format!(r"\neg {}", print(inner))
            }
        },
    }
}

fn print_primary(primary: &Primary, expr: &SymExpr) -> String {
    match primary {
        Primary::Integer(n) => n.to_string(),
        Primary::Rational(r) => {
            let (numer, denom) = (r.numer(), r.denom());
            if expr.is_negative_number() {
                format!(r"- \frac{{{}}}{{{}}}", numer.clone().abs(), denom)
            } else {
                format!(r"\frac{{{}}}{{{}}}", numer, denom)
            }
        },
        Primary::Float(f) => {
            let text = strip_zeros(&format_float(f, prec_to_digits(f.prec())));
            match text.split_once('e') {
                Some((mantissa, exponent)) => {
                    let exponent = exponent.trim_start_matches('+');
                    format!(r"{} \cdot 10^{{{}}}", mantissa, exponent)
                },
                None => text,
            }
        },
        Primary::Symbol(name) => symbol_latex(name),
        Primary::Constant(c) => match c {
            Constant::E => "e",
            Constant::I => "i",
            Constant::Pi => r"\pi",
            Constant::Infinity => r"\infty",
            Constant::NegativeInfinity => r"- \infty",
            Constant::ComplexInfinity => r"\tilde{\infty}",
            Constant::NaN => r"\text{NaN}",
        }.to_string(),
        Primary::Boolean(true) => r"\text{True}".to_string(),
        Primary::Boolean(false) => r"\text{False}".to_string(),
        Primary::Call(name, args) => print_function(name, args, None),
    }
}

fn print_add(terms: &[SymExpr]) -> String {
    let mut tex = String::new();
    for (i, term) in ordered_terms(terms).into_iter().enumerate() {
        let term = if i == 0 {
            term
        } else if term.could_extract_minus_sign() {
            tex.push_str(" - ");
            -term
        } else {
            tex.push_str(" + ");
            term
        };
        let term_tex = print(&term);
        if matches!(term, SymExpr::Add(_) | SymExpr::Relational(..)) {
            tex.push_str(&add_parens(&term_tex));
        } else {
            tex.push_str(&term_tex);
        }
    }
    tex
}

/// Returns true if a factor of a product must be wrapped in parentheses.
fn needs_mul_brackets(factor: &SymExpr, first: bool, last: bool) -> bool {
    if let SymExpr::Mul(_) = factor {
        if !first && factor.could_extract_minus_sign() {
            return true;
        }
    } else if precedence_traditional(factor) < PREC_MUL
        || matches!(factor, SymExpr::Relational(..))
    {
        return true;
    }

    !last && factor.contains(&|e| matches!(e, SymExpr::Integral(..) | SymExpr::Sum(..) | SymExpr::Product(..)))
}

/// Returns true if `tex` ends with a digit, possibly followed by closing braces or spaces.
fn ends_with_number(tex: &str) -> bool {
    tex.trim_end_matches(|c| c == '}' || c == ' ')
        .chars()
        .last()
        .map_or(false, |c| c.is_ascii_digit())
}

/// Prints the factors of a product separated by spaces, or by `\cdot` between two numbers.
fn print_factors(factors: &[SymExpr]) -> String {
    let mut tex = String::new();
    let mut last_tex = String::new();
    for (i, factor) in factors.iter().enumerate() {
        let mut term_tex = print(factor);
        if needs_mul_brackets(factor, i == 0, i + 1 == factors.len()) {
            term_tex = add_parens(&term_tex);
        }
        let starts_with_digit = super::to_string(factor).starts_with(|c: char| c.is_ascii_digit());
        if ends_with_number(&last_tex) && starts_with_digit {
            tex.push_str(r" \cdot ");
        } else if !tex.is_empty() {
            tex.push(' ');
        }
        tex.push_str(&term_tex);
        last_tex = term_tex;
    }
    tex
}

/// Prints one side of a fraction. A lone factor is printed as is.
fn convert(factors: &[SymExpr]) -> String {
    match factors {
        [single] => print(single),
        _ => print_factors(factors),
    }
}

fn print_mul(expr: &SymExpr) -> String {
    let (mut tex, expr, close) = if expr.could_extract_minus_sign() {
        let negated = -expr.clone();
        if matches!(negated, SymExpr::Add(_)) {
            ("- (".to_string(), negated, true)
        } else {
            ("- ".to_string(), negated, false)
        }
    } else {
        (String::new(), expr.clone(), false)
    };

    let (numer, denom) = fraction(&expr);
    if denom.is_empty() {
        tex.push_str(&convert(&expr.factors()));
    } else {
        let numer = if numer.is_empty() { vec![SymExpr::one()] } else { numer };
        tex.push_str(&format!(r"\frac{{{}}}{{{}}}", convert(&numer), convert(&denom)));
    }

    if close {
        tex.push(')');
    }
    tex
}

fn print_pow(expr: &SymExpr, base: &SymExpr, exp: &SymExpr) -> String {
    if let Some(r) = exp.as_rational() {
        let (p, q) = (r.numer(), r.denom());
        if p.clone().abs() == 1 && *q != 1 {
            let root = if *q == 2 {
                format!(r"\sqrt{{{}}}", print(base))
            } else {
                format!(r"\sqrt[{}]{{{}}}", q, print(base))
            };
            return if *p < 0 {
                format!(r"\frac{{1}}{{{}}}", root)
            } else {
                root
            };
        }
        if *p < 0 {
            if base.is_one() {
                return format!("1^{{{}}}", print(exp));
            }
            return print_mul(expr);
        }
    }

    if let Some((name, args)) = base.as_call() {
        return print_function(name, args, Some(print(exp)));
    }

    let base_tex = parenthesize(base, PREC_POW, false);
    let base_tex = if base.is_symbol() { parenthesize_super(base_tex) } else { base_tex };
    format!("{}^{{{}}}", base_tex, print(exp))
}

/// Applies an exponent to LaTeX that cannot carry one directly.
fn do_exponent(tex: String, exp: Option<String>) -> String {
    match exp {
        Some(exp) => format!(r"\left({}\right)^{{{}}}", tex, exp),
        None => tex,
    }
}

/// Appends `^{exp}` to the LaTeX if there is an exponent.
fn with_exponent(tex: String, exp: Option<String>) -> String {
    match exp {
        Some(exp) => format!("{}^{{{}}}", tex, exp),
        None => tex,
    }
}

fn function_name(name: &str) -> String {
    if ACCEPTED_FUNCTIONS.contains(&name) {
        format!(r"\{}", name)
    } else if name.chars().count() == 1 || name.starts_with('\\') {
        name.to_string()
    } else {
        format!(r"\operatorname{{{}}}", name)
    }
}

/// Prints a function call, raised to `exp` if given.
fn print_function(name: &str, args: &[SymExpr], exp: Option<String>) -> String {
    match (name, args) {
        ("exp", [arg]) => return do_exponent(format!("e^{{{}}}", print(arg)), exp),
        ("log", [arg]) => return with_exponent(format!(r"\log{{\left({} \right)}}", print(arg)), exp),
        ("Abs", [arg]) => return with_exponent(format!(r"\left|{{{}}}\right|", print(arg)), exp),
        ("factorial", [arg]) => {
            let tex = format!("{}!", parenthesize_super(parenthesize(arg, PREC_FUNC, false)));
            return do_exponent(tex, exp);
        },
        ("factorial2", [arg]) => {
            let tex = format!("{}!!", parenthesize_super(parenthesize(arg, PREC_FUNC, false)));
            return do_exponent(tex, exp);
        },
        ("floor", [arg]) => {
            return with_exponent(format!(r"\left\lfloor{{{}}}\right\rfloor", print(arg)), exp);
        },
        ("ceiling", [arg]) => {
            return with_exponent(format!(r"\left\lceil{{{}}}\right\rceil", print(arg)), exp);
        },
        ("binomial", [n, k]) => {
            return with_exponent(format!(r"{{\binom{{{}}}{{{}}}}}", print(n), print(k)), exp);
        },
        ("gamma", [arg]) => {
            let name = with_exponent(r"\Gamma".to_string(), exp);
            return format!(r"{}\left({}\right)", name, print(arg));
        },
        ("re" | "im", [arg]) => {
            let tex = format!(r"\operatorname{{{}}}{{{}}}", name, parenthesize(arg, PREC_ATOM, false));
            return with_exponent(tex, exp);
        },
        ("conjugate", [arg]) => return with_exponent(format!(r"\overline{{{}}}", print(arg)), exp),
        ("Max" | "Min", _) => {
            let args = args.iter().map(print).collect::<Vec<_>>();
            let tex = format!(r"\{}\left({}\right)", name.to_lowercase(), args.join(", "));
            return with_exponent(tex, exp);
        },
        _ => {},
    }

    let args = args.iter().map(print).collect::<Vec<_>>();
    let name = match exp {
        Some(exp) => format!("{}^{{{}}}", parenthesize_super(function_name(name)), exp),
        None => function_name(name),
    };
    format!(r"{}{{\left({} \right)}}", name, args.join(","))
}

fn print_derivative(inner: &SymExpr, vars: &[String]) -> String {
    let diff = if inner.free_symbols().len() > 1 { r"\partial" } else { "d" };

    // consecutive repeats of a variable are one term: d x^{2}
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for var in vars {
        match counts.last_mut() {
            Some((last, count)) if *last == var.as_str() => *count += 1,
            _ => counts.push((var.as_str(), 1)),
        }
    }

    let mut tex = String::new();
    for (var, count) in counts.iter().rev() {
        if *count == 1 {
            tex.push_str(&format!("{} {}", diff, symbol_latex(var)));
        } else {
            tex.push_str(&format!("{} {}^{{{}}}", diff, parenthesize_super(symbol_latex(var)), count));
        }
    }

    let tex = if vars.len() == 1 {
        format!(r"\frac{{{}}}{{{}}}", diff, tex)
    } else {
        format!(r"\frac{{{}^{{{}}}}}{{{}}}", diff, vars.len(), tex)
    };
    format!("{} {}", tex, parenthesize_operand(inner))
}

/// Prints the operand of a calculus operator, which is bracketed if it is not a product or
/// tighter, or if it looks negative.
fn parenthesize_operand(inner: &SymExpr) -> String {
    if inner.could_extract_minus_sign() {
        add_parens(&print(inner))
    } else {
        parenthesize(inner, PREC_MUL, true)
    }
}

fn print_integral(inner: &SymExpr, limits: &[Limit]) -> String {
    let mut tex = String::new();
    let mut symbols = Vec::new();
    if limits.len() <= 4 && limits.iter().all(|limit| limit.bounds.is_none()) {
        tex.push_str(&format!(r"\i{}nt", "i".repeat(limits.len().saturating_sub(1))));
        for limit in limits {
            symbols.push(format!(r"\, d{}", symbol_latex(&limit.var)));
        }
    } else {
        for limit in limits.iter().rev() {
            tex.push_str(r"\int");
            if let Some((lower, upper)) = &limit.bounds {
                tex.push_str(&format!(r"\limits_{{{}}}^{{{}}}", print(lower), print(upper)));
            }
            symbols.insert(0, format!(r"\, d{}", symbol_latex(&limit.var)));
        }
    }
    format!("{} {}{}", tex, parenthesize_operand(inner), symbols.concat())
}

fn print_big_operator(command: &str, inner: &SymExpr, limit: &Limit) -> String {
    let mut tex = match &limit.bounds {
        Some((lower, upper)) => {
            format!("{}_{{{}={}}}^{{{}}} ", command, symbol_latex(&limit.var), print(lower), print(upper))
        },
        None => format!("{}_{{{}}} ", command, symbol_latex(&limit.var)),
    };
    if let SymExpr::Add(_) = inner {
        tex.push_str(&add_parens(&print(inner)));
    } else {
        tex.push_str(&print(inner));
    }
    tex
}

fn is_boolean(expr: &SymExpr) -> bool {
    expr.is_logic() || expr.as_boolean().is_some()
}

fn print_logic_op(items: &[SymExpr], op: &str) -> String {
    items
        .iter()
        .map(|item| {
            if is_boolean(item) && !matches!(item, SymExpr::Not(_)) {
                add_parens(&print(item))
            } else {
                print(item)
            }
        })
        .collect::<Vec<_>>()
        .join(&format!(" {} ", op))
}

/// Splits a symbol name into its base name, superscripts and subscripts. `x_1`, `x1` and `x__a`
/// are `x` with subscript `1`, `x` with subscript `1`, and `x` with superscript `a`.
fn split_super_sub(text: &str) -> (String, Vec<String>, Vec<String>) {
    if text.is_empty() {
        return (String::new(), Vec::new(), Vec::new());
    }

    let mut name = None;
    let mut supers = Vec::new();
    let mut subs = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let start = if text[pos..].starts_with("__") { pos + 2 } else { pos + 1 };
        let next = text[start..]
            .find(|c| c == '^' || c == '_')
            .map_or(text.len(), |i| i + start);
        let part = &text[pos..next];
        pos = next;
        if name.is_none() {
            name = Some(part.to_string());
        } else if let Some(sup) = part.strip_prefix("__").or_else(|| part.strip_prefix('^')) {
            supers.push(sup.to_string());
        } else if let Some(sub) = part.strip_prefix('_') {
            subs.push(sub.to_string());
        }
    }

    let mut name = name.unwrap_or_default();
    // trailing digits are a subscript
    let split = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if split > 0 && split < name.len() && name[..split].chars().all(|c| c.is_ascii_alphabetic()) {
        subs.insert(0, name[split..].to_string());
        name.truncate(split);
    }
    (name, supers, subs)
}

/// Modifiers that can end a symbol name, applied to the rest of the name. Longer modifiers come
/// first so `xddot` is not read as `xd` with a `dot`.
const MODIFIERS: &[(&str, &str)] = &[
    ("mathring", r"\mathring{%}"),
    ("ddddot", r"\ddddot{%}"),
    ("dddot", r"\dddot{%}"),
    ("breve", r"\breve{%}"),
    ("check", r"\check{%}"),
    ("acute", r"\acute{%}"),
    ("grave", r"\grave{%}"),
    ("tilde", r"\tilde{%}"),
    ("prime", r"{%}'"),
    ("bold", r"\boldsymbol{%}"),
    ("ddot", r"\ddot{%}"),
    ("frak", r"\mathfrak{%}"),
    ("norm", r"\left\|{%}\right\|"),
    ("hat", r"\hat{%}"),
    ("bar", r"\bar{%}"),
    ("dot", r"\dot{%}"),
    ("vec", r"\vec{%}"),
    ("prm", r"{%}'"),
    ("cal", r"\mathcal{%}"),
    ("scr", r"\mathscr{%}"),
    ("abs", r"\left|{%}\right|"),
    ("avg", r"\overline{%}"),
    ("mag", r"\left|{%}\right|"),
    ("bm", r"\boldsymbol{%}"),
];

/// Translates a name part: Greek letters and other named symbols become commands, and trailing
/// modifiers apply to the rest of the name.
fn translate(text: &str) -> String {
    match text {
        "Gamma" | "Delta" | "Theta" | "Lambda" | "Xi" | "Pi" | "Sigma" | "Upsilon" | "Phi"
            | "Psi" | "Omega" => return format!(r"\{}", text),
        "Alpha" => return "A".to_string(),
        "Beta" => return "B".to_string(),
        "Epsilon" => return "E".to_string(),
        "Zeta" => return "Z".to_string(),
        "Eta" => return "H".to_string(),
        "Iota" => return "I".to_string(),
        "Kappa" => return "K".to_string(),
        "Mu" => return "M".to_string(),
        "Nu" => return "N".to_string(),
        "Omicron" => return "O".to_string(),
        "omicron" => return "o".to_string(),
        "Rho" => return "P".to_string(),
        "Tau" => return "T".to_string(),
        "Chi" | "Khi" => return "X".to_string(),
        "lamda" => return r"\lambda".to_string(),
        "Lamda" => return r"\Lambda".to_string(),
        "khi" => return r"\chi".to_string(),
        "varepsilon" | "varkappa" | "varphi" | "varpi" | "varrho" | "varsigma" | "vartheta" => {
            return format!(r"\{}", text);
        },
        _ => {},
    }

    let lower = text.to_lowercase();
    if GREEK_LETTERS.contains(&lower.as_str()) {
        return format!(r"\{}", lower);
    }
    if OTHER_SYMBOLS.contains(&text) {
        return format!(r"\{}", text);
    }
    for (modifier, template) in MODIFIERS {
        if lower.ends_with(modifier) && text.len() > modifier.len() {
            let inner = translate(&text[..text.len() - modifier.len()]);
            return template.replace('%', &inner);
        }
    }
    text.to_string()
}

/// Converts a symbol name to LaTeX: `x1` is `x_{1}`, `alpha` is `\alpha`, `xhat` is `\hat{x}`.
pub fn symbol_latex(name: &str) -> String {
    if name.contains('{') {
        return name.to_string();
    }
    let (base, supers, subs) = split_super_sub(name);
    let mut tex = translate(&base);
    if !supers.is_empty() {
        let supers = supers.iter().map(|s| translate(s)).collect::<Vec<_>>();
        tex.push_str(&format!("^{{{}}}", supers.join(" ")));
    }
    if !subs.is_empty() {
        let subs = subs.iter().map(|s| translate(s)).collect::<Vec<_>>();
        tex.push_str(&format!("_{{{}}}", subs.join(" ")));
    }
    tex
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn n(value: i64) -> SymExpr {
        SymExpr::integer(value)
    }

    #[test]
    fn products() {
        let cos = SymExpr::call("cos", vec![x()]);
        let sin = SymExpr::call("sin", vec![x()]);
        let derivative = n(-7) * sin * SymExpr::pow(cos, n(6));
        assert_eq!(latex(&derivative), r"- 7 \sin{\left(x \right)} \cos^{6}{\left(x \right)}");
        assert_eq!(latex(&(n(2) * SymExpr::sqrt(n(2)))), r"2 \sqrt{2}");
        assert_eq!(latex(&(n(2) * x() * (x() + n(1)))), r"2 x \left(x + 1\right)");
    }

    #[test]
    fn fractions_and_powers() {
        assert_eq!(latex(&SymExpr::recip(SymExpr::symbol("z"))), r"\frac{1}{z}");
        assert_eq!(latex(&(x() / n(2))), r"\frac{x}{2}");
        assert_eq!(latex(&SymExpr::rational(-3, 4)), r"- \frac{3}{4}");
        assert_eq!(latex(&SymExpr::sqrt(n(2))), r"\sqrt{2}");
        assert_eq!(latex(&SymExpr::pow_rational(x(), 1, 3)), r"\sqrt[3]{x}");
        assert_eq!(latex(&SymExpr::pow(x(), n(2))), "x^{2}");
        assert_eq!(latex(&SymExpr::pow(x() + n(1), n(2))), r"\left(x + 1\right)^{2}");
        assert_eq!(latex(&SymExpr::call1("exp", x())), "e^{x}");
    }

    #[test]
    fn sums() {
        let expr = SymExpr::pow(x(), n(2)) - n(2) * x() + n(1);
        assert_eq!(latex(&expr), "x^{2} - 2 x + 1");
    }

    #[test]
    fn symbols() {
        assert_eq!(symbol_latex("x1"), "x_{1}");
        assert_eq!(symbol_latex("alpha"), r"\alpha");
        assert_eq!(symbol_latex("Gamma"), r"\Gamma");
        assert_eq!(symbol_latex("xhat"), r"\hat{x}");
        assert_eq!(symbol_latex("x_a^b"), "x^{b}_{a}");
    }

    #[test]
    fn calculus() {
        let z = SymExpr::symbol("z");
        let integral = SymExpr::Integral(Box::new(SymExpr::recip(z)), vec![Limit::indefinite("z")]);
        assert_eq!(latex(&integral), r"\int \frac{1}{z}\, dz");

        let definite = SymExpr::Integral(Box::new(x()), vec![Limit::definite("x", n(0), n(1))]);
        assert_eq!(latex(&definite), r"\int\limits_{0}^{1} x\, dx");

        let f = SymExpr::call("f", vec![x()]);
        let derivative = SymExpr::Derivative(Box::new(f), vec!["x".to_string()]);
        assert_eq!(latex(&derivative), r"\frac{d}{d x} f{\left(x \right)}");

        let k = SymExpr::symbol("k");
        let sum = SymExpr::Sum(Box::new(k), Box::new(Limit::definite("k", n(1), x())));
        assert_eq!(latex(&sum), r"\sum_{k=1}^{x} k");
    }

    #[test]
    fn logic_and_relations() {
        let y = SymExpr::symbol("y");
        assert_eq!(latex(&SymExpr::and(vec![x(), y.clone()])), r"x \wedge y");
        assert_eq!(latex(&SymExpr::not(x())), r"\neg x");
        assert_eq!(latex(&SymExpr::relational(RelOp::Le, x(), y)), r"x \leq y");
        assert_eq!(latex(&SymExpr::boolean(true)), r"\text{True}");
    }
}
