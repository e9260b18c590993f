//! The symbolic expression tree.
//!
//! Expressions are always kept in canonical form: the constructors in [`build`] flatten nested
//! sums and products, fold numbers, collect like terms and factors, and sort the operands. Code
//! that builds expressions should go through those constructors (or the arithmetic operators,
//! which call them) rather than the enum variants, so that two mathematically identical
//! expressions built in different ways compare equal.

pub mod build;
pub mod call;
pub mod iter;
pub mod number;
pub mod order;

use crate::primitive::{int, rational};
use number::Number;
use rug::{Float, Integer, Rational};
use std::collections::BTreeSet;

pub use iter::ExprIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constant {
    /// Euler's number, `E`.
    E,

    /// The imaginary unit, `I`.
    I,

    /// `pi`.
    Pi,

    /// Positive infinity, `oo`.
    Infinity,

    /// Negative infinity, `-oo`.
    NegativeInfinity,

    /// Complex infinity, `zoo`, the result of dividing a non-zero number by zero.
    ComplexInfinity,

    /// Not a number, `nan`.
    NaN,
}

impl Constant {
    /// Returns the name of the constant in the expression language.
    pub fn name(&self) -> &'static str {
        match self {
            Self::E => "E",
            Self::I => "I",
            Self::Pi => "pi",
            Self::Infinity => "oo",
            Self::NegativeInfinity => "-oo",
            Self::ComplexInfinity => "zoo",
            Self::NaN => "nan",
        }
    }

    /// Returns true for `oo`, `-oo` and `zoo`.
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinity | Self::NegativeInfinity | Self::ComplexInfinity)
    }

    /// Returns true for the constants that have a finite numeric value.
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::E | Self::I | Self::Pi)
    }
}

/// A primary expression: one that is not made of other expressions, apart from the arguments of a
/// function call.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    /// An integer.
    Integer(Integer),

    /// A fraction whose denominator is not one.
    Rational(Rational),

    /// An approximate number. Its precision decides how many digits it is printed with.
    Float(Float),

    /// A free symbol, such as `x`.
    Symbol(String),

    /// A named constant.
    Constant(Constant),

    /// `True` or `False`.
    Boolean(bool),

    /// A function applied to arguments, such as `sin(x)` or the undefined function `f(x)`.
    Call(String, Vec<SymExpr>),
}

/// The integration or summation range of one variable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Limit {
    /// The variable.
    pub var: String,

    /// The lower and upper bound, if the range is definite.
    pub bounds: Option<(SymExpr, SymExpr)>,
}

impl Limit {
    /// An indefinite range over the given variable.
    pub fn indefinite(var: impl Into<String>) -> Self {
        Self { var: var.into(), bounds: None }
    }

    /// A definite range over the given variable.
    pub fn definite(var: impl Into<String>, lower: SymExpr, upper: SymExpr) -> Self {
        Self { var: var.into(), bounds: Some((lower, upper)) }
    }
}

/// A relational operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    /// Returns the class name of the relation, such as `StrictLessThan`.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Eq => "Equality",
            Self::Ne => "Unequality",
            Self::Lt => "StrictLessThan",
            Self::Le => "LessThan",
            Self::Gt => "StrictGreaterThan",
            Self::Ge => "GreaterThan",
        }
    }

    /// Returns the operator symbol, such as `<=`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Returns true if the relation holds for the given ordering of the two sides.
    pub fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Self::Eq => ordering == Equal,
            Self::Ne => ordering != Equal,
            Self::Lt => ordering == Less,
            Self::Le => ordering != Greater,
            Self::Gt => ordering == Greater,
            Self::Ge => ordering != Less,
        }
    }
}

/// A symbolic expression.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymExpr {
    /// A single term, such as `2`, `x`, or `sin(x)`.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together. The numeric coefficient, if any, comes first.
    Mul(Vec<SymExpr>),

    /// An expression raised to the power of another expression.
    Exp(Box<SymExpr>, Box<SymExpr>),

    /// An unevaluated derivative, with one entry per differentiation (`x, x` for the second
    /// derivative).
    Derivative(Box<SymExpr>, Vec<String>),

    /// An unevaluated integral, innermost range first.
    Integral(Box<SymExpr>, Vec<Limit>),

    /// An unevaluated sum over a definite range.
    Sum(Box<SymExpr>, Box<Limit>),

    /// An unevaluated product over a definite range.
    Product(Box<SymExpr>, Box<Limit>),

    /// A relation between two expressions, such as `x < 1` or `Eq(x, 0)`.
    Relational(RelOp, Box<SymExpr>, Box<SymExpr>),

    /// Logical conjunction.
    And(Vec<SymExpr>),

    /// Logical disjunction.
    Or(Vec<SymExpr>),

    /// Logical negation.
    Not(Box<SymExpr>),

    /// Logical exclusive or.
    Xor(Vec<SymExpr>),
}

/// Compares two slices as multisets.
fn unordered_eq(a: &[SymExpr], b: &[SymExpr]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|item| {
        let found = b.iter().enumerate().position(|(i, other)| !used[i] && item == other);
        match found {
            Some(i) => {
                used[i] = true;
                true
            },
            None => false,
        }
    })
}

/// Checks if two expressions are **strictly** equal.
///
/// Two expressions are strictly equal if they have the same structure and the same values. The
/// order of the operands of sums, products and logical connectives does not matter. `2*x` and
/// `x*2` are equal, but `x*(y+1)` and `x*y + x` are not. `2` and `2.0` are not equal either.
impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(a), Self::Primary(b)) => a == b,
            (Self::Add(a), Self::Add(b))
                | (Self::Mul(a), Self::Mul(b))
                | (Self::And(a), Self::And(b))
                | (Self::Or(a), Self::Or(b))
                | (Self::Xor(a), Self::Xor(b)) => unordered_eq(a, b),
            (Self::Exp(a, b), Self::Exp(c, d)) => a == c && b == d,
            (Self::Derivative(a, v), Self::Derivative(b, w)) => a == b && v == w,
            (Self::Integral(a, l), Self::Integral(b, m)) => a == b && l == m,
            (Self::Sum(a, l), Self::Sum(b, m)) | (Self::Product(a, l), Self::Product(b, m)) => {
                a == b && l == m
            },
            (Self::Relational(op, a, b), Self::Relational(op2, c, d)) => op == op2 && a == c && b == d,
            (Self::Not(a), Self::Not(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Primary {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Rational(a), Self::Rational(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Constant(a), Self::Constant(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Call(a, args_a), Self::Call(b, args_b)) => a == b && args_a == args_b,
            _ => false,
        }
    }
}

impl SymExpr {
    pub fn integer<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Primary(Primary::Integer(int(n)))
    }

    /// Creates the fraction `numer / denom`, which must have a non-zero denominator.
    pub fn rational<N, D>(numer: N, denom: D) -> Self
    where
        Integer: From<N> + From<D>,
    {
        Self::from_number(Number::from(rational(numer, denom)))
    }

    pub fn float(f: Float) -> Self {
        Self::Primary(Primary::Float(f))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    pub fn constant(c: Constant) -> Self {
        Self::Primary(Primary::Constant(c))
    }

    pub fn boolean(b: bool) -> Self {
        Self::Primary(Primary::Boolean(b))
    }

    pub fn zero() -> Self {
        Self::integer(0)
    }

    pub fn one() -> Self {
        Self::integer(1)
    }

    pub fn half() -> Self {
        Self::rational(1, 2)
    }

    pub fn pi() -> Self {
        Self::constant(Constant::Pi)
    }

    pub fn e() -> Self {
        Self::constant(Constant::E)
    }

    pub fn i() -> Self {
        Self::constant(Constant::I)
    }

    pub fn nan() -> Self {
        Self::constant(Constant::NaN)
    }

    pub fn zoo() -> Self {
        Self::constant(Constant::ComplexInfinity)
    }

    /// Creates an expression from a number.
    pub fn from_number(n: Number) -> Self {
        match n.normalize() {
            Number::Integer(n) => Self::Primary(Primary::Integer(n)),
            Number::Rational(r) => Self::Primary(Primary::Rational(r)),
            Number::Float(f) => Self::Primary(Primary::Float(f)),
        }
    }

    /// Returns the number this expression is, if it is one.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Primary(Primary::Integer(n)) => Some(Number::Integer(n.clone())),
            Self::Primary(Primary::Rational(r)) => Some(Number::Rational(r.clone())),
            Self::Primary(Primary::Float(f)) => Some(Number::Float(f.clone())),
            _ => None,
        }
    }

    /// Returns true if the expression is a number (integer, rational, or float).
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Self::Primary(Primary::Integer(_) | Primary::Rational(_) | Primary::Float(_))
        )
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(n)) => Some(n),
            _ => None,
        }
    }

    /// Returns the integer as an `i64`, if this is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(Integer::to_i64)
    }

    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Primary(Primary::Integer(n)) => Some(Rational::from(n.clone())),
            Self::Primary(Primary::Rational(r)) => Some(r.clone()),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(name)) => Some(name),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<Constant> {
        match self {
            Self::Primary(Primary::Constant(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Primary(Primary::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// Returns the function name and arguments, if this is a function call.
    pub fn as_call(&self) -> Option<(&str, &[SymExpr])> {
        match self {
            Self::Primary(Primary::Call(name, args)) => Some((name, args)),
            _ => None,
        }
    }

    /// Returns the single argument of a call to the named function.
    pub fn call_arg(&self, function: &str) -> Option<&SymExpr> {
        match self.as_call() {
            Some((name, [arg])) if name == function => Some(arg),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_number().map_or(false, |n| n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(n)) if *n == 1)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_)))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Primary(Primary::Float(_)))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Primary(Primary::Symbol(_)))
    }

    /// Returns true if the expression is a negative number.
    pub fn is_negative_number(&self) -> bool {
        self.as_number().map_or(false, |n| n.is_negative())
    }

    /// Returns true if the expression is an atom: a number, symbol, constant, or boolean.
    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Primary(primary) if !matches!(primary, Primary::Call(..)))
    }

    /// Returns true for logical expressions: `And`, `Or`, `Not`, and `Xor`.
    pub fn is_logic(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_) | Self::Not(_) | Self::Xor(_))
    }

    /// Returns true for expressions that are booleans: logic, relations, `True` and `False`.
    pub fn is_boolean_valued(&self) -> bool {
        self.is_logic()
            || matches!(self, Self::Relational(..) | Self::Primary(Primary::Boolean(_)))
    }

    /// Returns the name of the class this expression is an instance of, such as `Add` or
    /// `Symbol`. Function calls return the function name.
    pub fn class_name(&self) -> String {
        match self {
            Self::Primary(primary) => match primary {
                Primary::Integer(n) if *n == 0 => "Zero".to_string(),
                Primary::Integer(n) if *n == 1 => "One".to_string(),
                Primary::Integer(n) if *n == -1 => "NegativeOne".to_string(),
                Primary::Integer(_) => "Integer".to_string(),
                Primary::Rational(r) if *r == rational(1, 2) => "Half".to_string(),
                Primary::Rational(_) => "Rational".to_string(),
                Primary::Float(_) => "Float".to_string(),
                Primary::Symbol(_) => "Symbol".to_string(),
                Primary::Constant(c) => match c {
                    Constant::E => "Exp1",
                    Constant::I => "ImaginaryUnit",
                    Constant::Pi => "Pi",
                    Constant::Infinity => "Infinity",
                    Constant::NegativeInfinity => "NegativeInfinity",
                    Constant::ComplexInfinity => "ComplexInfinity",
                    Constant::NaN => "NaN",
                }.to_string(),
                Primary::Boolean(true) => "BooleanTrue".to_string(),
                Primary::Boolean(false) => "BooleanFalse".to_string(),
                Primary::Call(name, _) => name.clone(),
            },
            Self::Add(_) => "Add".to_string(),
            Self::Mul(_) => "Mul".to_string(),
            Self::Exp(..) => "Pow".to_string(),
            Self::Derivative(..) => "Derivative".to_string(),
            Self::Integral(..) => "Integral".to_string(),
            Self::Sum(..) => "Sum".to_string(),
            Self::Product(..) => "Product".to_string(),
            Self::Relational(op, ..) => op.class_name().to_string(),
            Self::And(_) => "And".to_string(),
            Self::Or(_) => "Or".to_string(),
            Self::Not(_) => "Not".to_string(),
            Self::Xor(_) => "Xor".to_string(),
        }
    }

    /// Returns the direct sub-expressions, in order.
    pub fn children(&self) -> Vec<&SymExpr> {
        match self {
            Self::Primary(Primary::Call(_, args)) => args.iter().collect(),
            Self::Primary(_) => Vec::new(),
            Self::Add(items) | Self::Mul(items) | Self::And(items) | Self::Or(items) | Self::Xor(items) => {
                items.iter().collect()
            },
            Self::Exp(base, exp) => vec![base, exp],
            Self::Derivative(expr, _) => vec![expr],
            Self::Integral(expr, limits) => {
                let mut out = vec![&**expr];
                for limit in limits {
                    if let Some((lower, upper)) = &limit.bounds {
                        out.push(lower);
                        out.push(upper);
                    }
                }
                out
            },
            Self::Sum(expr, limit) | Self::Product(expr, limit) => {
                let mut out = vec![&**expr];
                if let Some((lower, upper)) = &limit.bounds {
                    out.push(lower);
                    out.push(upper);
                }
                out
            },
            Self::Relational(_, lhs, rhs) => vec![lhs, rhs],
            Self::Not(expr) => vec![expr],
        }
    }

    /// Returns an iterator over every sub-expression, children before parents.
    pub fn post_order_iter(&self) -> ExprIter<'_> {
        ExprIter::new(self)
    }

    /// Rebuilds the expression with `f` applied to each direct sub-expression, going through the
    /// canonical constructors.
    pub fn map_children(&self, f: &mut dyn FnMut(&SymExpr) -> SymExpr) -> SymExpr {
        fn map_limit(limit: &Limit, f: &mut dyn FnMut(&SymExpr) -> SymExpr) -> Limit {
            Limit {
                var: limit.var.clone(),
                bounds: limit.bounds.as_ref().map(|(lower, upper)| (f(lower), f(upper))),
            }
        }

        match self {
            Self::Primary(Primary::Call(name, args)) => {
                SymExpr::call(name, args.iter().map(|arg| f(arg)).collect())
            },
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => SymExpr::add(terms.iter().map(|term| f(term))),
            Self::Mul(factors) => SymExpr::mul(factors.iter().map(|factor| f(factor))),
            Self::Exp(base, exp) => SymExpr::pow(f(base), f(exp)),
            Self::Derivative(expr, vars) => SymExpr::Derivative(Box::new(f(expr)), vars.clone()),
            Self::Integral(expr, limits) => {
                let limits = limits.iter().map(|limit| map_limit(limit, f)).collect();
                SymExpr::Integral(Box::new(f(expr)), limits)
            },
            Self::Sum(expr, limit) => {
                let limit = map_limit(limit, f);
                SymExpr::Sum(Box::new(f(expr)), Box::new(limit))
            },
            Self::Product(expr, limit) => {
                let limit = map_limit(limit, f);
                SymExpr::Product(Box::new(f(expr)), Box::new(limit))
            },
            Self::Relational(op, lhs, rhs) => SymExpr::relational(*op, f(lhs), f(rhs)),
            Self::And(items) => SymExpr::and(items.iter().map(|item| f(item)).collect()),
            Self::Or(items) => SymExpr::or(items.iter().map(|item| f(item)).collect()),
            Self::Not(item) => SymExpr::not(f(item)),
            Self::Xor(items) => SymExpr::xor(items.iter().map(|item| f(item)).collect()),
        }
    }

    /// Returns the names of the free symbols in the expression, sorted. Variables bound by an
    /// integral, sum, or product are not free.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_free_symbols(&mut out);
        out
    }

    fn collect_free_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Primary(Primary::Symbol(name)) => {
                out.insert(name.clone());
            },
            Self::Integral(expr, limits) => {
                let mut inner = BTreeSet::new();
                expr.collect_free_symbols(&mut inner);
                for limit in limits {
                    if let Some((lower, upper)) = &limit.bounds {
                        inner.remove(&limit.var);
                        lower.collect_free_symbols(&mut inner);
                        upper.collect_free_symbols(&mut inner);
                    } else {
                        inner.insert(limit.var.clone());
                    }
                }
                out.extend(inner);
            },
            Self::Sum(expr, limit) | Self::Product(expr, limit) => {
                let mut inner = BTreeSet::new();
                expr.collect_free_symbols(&mut inner);
                inner.remove(&limit.var);
                if let Some((lower, upper)) = &limit.bounds {
                    lower.collect_free_symbols(&mut inner);
                    upper.collect_free_symbols(&mut inner);
                }
                out.extend(inner);
            },
            Self::Derivative(expr, vars) => {
                expr.collect_free_symbols(out);
                out.extend(vars.iter().cloned());
            },
            other => {
                for child in other.children() {
                    child.collect_free_symbols(out);
                }
            },
        }
    }

    /// Returns true if the named symbol appears free in the expression.
    pub fn has_symbol(&self, name: &str) -> bool {
        self.free_symbols().contains(name)
    }

    /// Returns a symbol name starting with `base` that does not appear free in the expression:
    /// `base` itself if it is unused, otherwise `base_1`, `base_2`, and so on.
    pub fn fresh_symbol(&self, base: &str) -> String {
        let symbols = self.free_symbols();
        if !symbols.contains(base) {
            return base.to_string();
        }
        let mut i = 1;
        loop {
            let name = format!("{}_{}", base, i);
            if !symbols.contains(&name) {
                return name;
            }
            i += 1;
        }
    }

    /// Returns true if the expression has no free symbols.
    pub fn is_constant(&self) -> bool {
        self.free_symbols().is_empty()
    }

    /// Returns true if any sub-expression (including this one) satisfies the predicate.
    pub fn contains(&self, predicate: &dyn Fn(&SymExpr) -> bool) -> bool {
        self.post_order_iter().any(predicate)
    }

    /// Returns true if a call to the named function appears anywhere in the expression.
    pub fn has_function(&self, function: &str) -> bool {
        self.contains(&|expr| matches!(expr.as_call(), Some((name, _)) if name == function))
    }

    /// Replaces every occurrence of `old` with `new`, rebuilding canonically.
    pub fn subs(&self, old: &SymExpr, new: &SymExpr) -> SymExpr {
        if self == old {
            return new.clone();
        }

        // bound variables are not substituted
        if let Some(name) = old.as_symbol() {
            let binds = match self {
                Self::Sum(_, limit) | Self::Product(_, limit) => limit.var == name,
                Self::Integral(_, limits) => limits.iter().any(|limit| limit.var == name && limit.bounds.is_some()),
                _ => false,
            };
            if binds || !self.has_symbol(name) && !matches!(self, Self::Derivative(..)) {
                return self.clone();
            }
        }

        self.map_children(&mut |child| child.subs(old, new))
    }

    /// Substitutes a number for the named symbol.
    pub fn subs_symbol(&self, name: &str, value: &SymExpr) -> SymExpr {
        self.subs(&SymExpr::symbol(name), value)
    }

    /// Splits the expression into its numeric coefficient and the remaining factors.
    ///
    /// `3*x*y` splits into `3` and `[x, y]`; `x` splits into `1` and `[x]`; `5` splits into `5`
    /// and `[]`.
    pub fn as_coeff_factors(&self) -> (Number, Vec<SymExpr>) {
        match self {
            Self::Mul(factors) => match factors.first().and_then(SymExpr::as_number) {
                Some(coeff) => (coeff, factors[1..].to_vec()),
                None => (Number::one(), factors.clone()),
            },
            other => match other.as_number() {
                Some(n) => (n, Vec::new()),
                None => (Number::one(), vec![other.clone()]),
            },
        }
    }

    /// Splits the expression into its numeric coefficient and the rest, rebuilt as a product.
    pub fn as_coeff_mul(&self) -> (Number, SymExpr) {
        let (coeff, factors) = self.as_coeff_factors();
        (coeff, SymExpr::mul_raw(factors))
    }

    /// Splits the expression into a base and an exponent. Anything that is not a power has an
    /// exponent of one; `exp(x)` is `E**x`.
    pub fn as_base_exp(&self) -> (SymExpr, SymExpr) {
        match self {
            Self::Exp(base, exp) => ((**base).clone(), (**exp).clone()),
            other => match other.call_arg("exp") {
                Some(arg) => (SymExpr::e(), arg.clone()),
                None => (other.clone(), SymExpr::one()),
            },
        }
    }

    /// Returns the terms of a sum, or the expression itself as a single term.
    pub fn terms(&self) -> Vec<SymExpr> {
        match self {
            Self::Add(terms) => terms.clone(),
            other => vec![other.clone()],
        }
    }

    /// Returns the factors of a product, or the expression itself as a single factor.
    pub fn factors(&self) -> Vec<SymExpr> {
        match self {
            Self::Mul(factors) => factors.clone(),
            other => vec![other.clone()],
        }
    }

    /// Returns true if the expression "looks negative": a negative number, a product with a
    /// negative coefficient, or a sum whose terms mostly look negative (ties go to the first
    /// term). Used to normalize the arguments of odd and even functions.
    pub fn could_extract_minus_sign(&self) -> bool {
        match self {
            Self::Add(terms) => {
                let negative = terms.iter().filter(|term| term.could_extract_minus_sign()).count();
                let positive = terms.len() - negative;
                negative > positive
                    || negative == positive
                        && terms.first().map_or(false, SymExpr::could_extract_minus_sign)
            },
            other => other.as_coeff_factors().0.is_negative(),
        }
    }

    /// Counts the nodes of the expression, used to compare the complexity of equivalent forms.
    pub fn complexity(&self) -> usize {
        self.post_order_iter().count()
    }

    /// Returns the numeric value of a constant expression as a float, if it is real and finite.
    pub fn to_f64(&self) -> Option<f64> {
        let value = crate::symbolic::evalf::complex_value(self)?;
        if !value.imag().is_zero() {
            return None;
        }
        Some(value.real().to_f64()).filter(|v| v.is_finite())
    }

    /// Returns a float approximation of a number, at the working precision.
    pub fn number_to_float(&self) -> Option<Float> {
        self.as_number().map(|n| n.to_float(crate::primitive::PRECISION))
    }
}

impl From<i64> for SymExpr {
    fn from(n: i64) -> Self {
        SymExpr::integer(n)
    }
}

impl From<Number> for SymExpr {
    fn from(n: Number) -> Self {
        SymExpr::from_number(n)
    }
}

impl From<bool> for SymExpr {
    fn from(b: bool) -> Self {
        SymExpr::boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::primitive::float;

    fn f(value: f64) -> SymExpr {
        SymExpr::float(float(value))
    }

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    fn y() -> SymExpr {
        SymExpr::symbol("y")
    }

    #[test]
    fn strict_equality_ignores_operand_order() {
        assert_eq!(SymExpr::Add(vec![x(), y()]), SymExpr::Add(vec![y(), x()]));
        assert_ne!(SymExpr::Add(vec![x(), x()]), SymExpr::Add(vec![x(), y()]));
        assert_ne!(SymExpr::integer(2), f(2.0));
    }

    #[test]
    fn free_symbols_skip_bound_variables() {
        let k = SymExpr::symbol("k");
        let n = SymExpr::symbol("n");
        let sum = SymExpr::Sum(Box::new(k), Box::new(Limit::definite("k", SymExpr::one(), n)));
        assert_eq!(sum.free_symbols().into_iter().collect::<Vec<_>>(), vec!["n".to_string()]);

        let integral = SymExpr::Integral(Box::new(x() * y()), vec![Limit::indefinite("x")]);
        assert_eq!(integral.free_symbols().len(), 2);
    }

    #[test]
    fn coefficient_split() {
        let term = SymExpr::integer(3) * x() * y();
        let (coeff, rest) = term.as_coeff_factors();
        assert_eq!(coeff, Number::from(3));
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn minus_sign() {
        assert!((-x()).could_extract_minus_sign());
        assert!((SymExpr::one() - x()).could_extract_minus_sign());
        assert!(!(x() - SymExpr::one()).could_extract_minus_sign());
    }

    #[test]
    fn substitution() {
        let expr = x() * x() + y();
        assert_eq!(expr.subs_symbol("x", &SymExpr::integer(3)), SymExpr::integer(9) + y());
    }
}
