use crate::primitive::{float_with_digits, int_from_str, DEFAULT_DIGITS};
use crate::symbolic::{expr::Primary, SymExpr};
use gamma_error::Error;
use gamma_parser::parser::{
    ast::{Call, Expr, Literal},
    token::op::BinOpKind,
};
use rug::Float;
use std::{collections::HashMap, ops::Range, rc::Rc};
use super::{
    ctxt::Ctxt,
    error::{
        invalid,
        ArgumentType,
        BuiltinError,
        DuplicateArgument,
        IndexOutOfRange,
        NotCallable,
        NotSubscriptable,
        UndefinedName,
        UnexpectedKeyword,
        WrongArgumentCount,
    },
    exec::{exec_block, Flow},
    methods,
    ops,
    value::{UserFunc, Value},
    Eval,
};

impl Eval for Expr {
    fn eval_with(&self, ctxt: &mut Ctxt) -> Result<Value, Error> {
        ctxt.step(self.span())?;
        match self {
            Expr::Literal(literal) => eval_literal(literal),
            Expr::Name(ident) => ctxt.get_var(&ident.name).ok_or_else(|| {
                Error::new(vec![ident.span.clone()], UndefinedName {
                    name: ident.name.clone(),
                    suggestions: ctxt.get_similar_vars(&ident.name),
                })
            }),
            Expr::Paren(paren) => paren.expr.eval_with(ctxt),
            Expr::Tuple(tuple) => Ok(Value::Tuple(eval_all(&tuple.items, ctxt)?)),
            Expr::List(list) => Ok(Value::list(eval_all(&list.items, ctxt)?)),
            Expr::Dict(dict) => {
                let mut entries: Vec<(Value, Value)> = Vec::with_capacity(dict.entries.len());
                for (key, value) in &dict.entries {
                    let key = key.eval_with(ctxt)?;
                    let value = value.eval_with(ctxt)?;
                    match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(entry) => entry.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(Value::Dict(entries))
            },
            Expr::Call(call) => eval_call(call, ctxt),
            Expr::Attribute(attribute) => {
                let value = attribute.value.eval_with(ctxt)?;
                methods::get_attr(&value, &attribute.attr.name)
                    .map_err(|err| err.into_error(attribute.attr.span.clone()))
            },
            Expr::Index(index) => {
                let target = index.target.eval_with(ctxt)?;
                let key = index.index.eval_with(ctxt)?;
                subscript(&target, &key).map_err(|err| err.into_error(index.span.clone()))
            },
            Expr::Unary(unary) => {
                let operand = unary.operand.eval_with(ctxt)?;
                ops::unary(unary.op.kind, operand).map_err(|err| err.into_error(unary.span.clone()))
            },
            Expr::Binary(binary) => match binary.op.kind {
                kind @ (BinOpKind::And | BinOpKind::Or) => {
                    let lhs = binary.lhs.eval_with(ctxt)?;
                    let truth = ops::truthy(&lhs).map_err(|err| err.into_error(binary.lhs.span()))?;

                    // `and` and `or` give back one of their operands, not a boolean
                    if truth == (kind == BinOpKind::Or) {
                        Ok(lhs)
                    } else {
                        binary.rhs.eval_with(ctxt)
                    }
                },
                kind => {
                    let lhs = binary.lhs.eval_with(ctxt)?;
                    let rhs = binary.rhs.eval_with(ctxt)?;
                    ops::binary(kind, lhs, rhs).map_err(|err| err.into_error(binary.span.clone()))
                },
            },
        }
    }
}

/// Evaluates each expression in order.
fn eval_all(exprs: &[Expr], ctxt: &mut Ctxt) -> Result<Vec<Value>, Error> {
    exprs.iter().map(|expr| expr.eval_with(ctxt)).collect()
}

fn eval_literal(literal: &Literal) -> Result<Value, Error> {
    match literal {
        Literal::Int(int) => int_from_str(&int.value)
            .map(|n| SymExpr::integer(n).into())
            .ok_or_else(|| invalid(format!("invalid integer literal: {}", int.value)).into_error(int.span.clone())),
        Literal::Float(float) => Float::parse(&float.value)
            .map(|parsed| SymExpr::float(float_with_digits(parsed, DEFAULT_DIGITS)).into())
            .map_err(|_| invalid(format!("invalid float literal: {}", float.value)).into_error(float.span.clone())),
        Literal::Str(s) => Ok(Value::Str(s.value.clone())),
        Literal::Bool(b) => Ok(Value::Bool(b.value)),
        Literal::None(_) => Ok(Value::None),
    }
}

fn eval_call(call: &Call, ctxt: &mut Ctxt) -> Result<Value, Error> {
    let func = call.func.eval_with(ctxt)?;
    let positional = eval_all(&call.args, ctxt)?;
    let keywords = call.kwargs
        .iter()
        .map(|keyword| Ok((keyword.name.name.clone(), keyword.value.eval_with(ctxt)?)))
        .collect::<Result<Vec<_>, Error>>()?;
    call_value(ctxt, &func, positional, keywords, call.span.clone())
}

/// Calls a value with already evaluated arguments. `span` is the location of the call, used for
/// errors.
pub fn call_value(
    ctxt: &mut Ctxt,
    func: &Value,
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
    span: Range<usize>,
) -> Result<Value, Error> {
    match func {
        Value::Builtin(builtin) => (*builtin)
            .call(ctxt, positional, keywords)
            .map_err(|err| err.into_error(span)),
        Value::Function(user) => call_user(ctxt, user, positional, keywords, span),
        Value::UndefFunction(name) => apply_undefined(name, positional, keywords)
            .map_err(|err| err.into_error(span)),
        Value::Expr(SymExpr::Primary(Primary::Symbol(name))) => {
            apply_undefined(name, positional, keywords).map_err(|err| err.into_error(span))
        },
        Value::BoundMethod(receiver, name) => {
            methods::call_method(ctxt, receiver, name, positional, keywords)
                .map_err(|err| err.into_error(span))
        },
        other => Err(Error::new(vec![span], NotCallable { typename: other.typename() })),
    }
}

/// Applies an undefined function, such as `f` in `f = Function('f')`, to its arguments.
fn apply_undefined(
    name: &str,
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
) -> Result<Value, BuiltinError> {
    if let Some((keyword, _)) = keywords.first() {
        return Err(UnexpectedKeyword { name: name.to_string(), keyword: keyword.clone() }.into());
    }
    let args = positional
        .iter()
        .map(|arg| arg.to_expr().ok_or_else(|| ArgumentType {
            name: name.to_string(),
            expected: "an expression",
            found: arg.typename(),
        }))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SymExpr::call(name, args).into())
}

/// Describes how many arguments a user function accepts.
fn arity(func: &UserFunc) -> String {
    let required = func.params.iter().filter(|(_, default)| default.is_none()).count();
    let total = func.params.len();
    if required == total {
        total.to_string()
    } else {
        format!("{} to {}", required, total)
    }
}

/// Binds the arguments to the parameters of a user function and runs its body in a new scope.
fn call_user(
    ctxt: &mut Ctxt,
    func: &Rc<UserFunc>,
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
    span: Range<usize>,
) -> Result<Value, Error> {
    let given = positional.len() + keywords.len();
    let wrong_count = || Error::new(vec![span.clone()], WrongArgumentCount {
        name: func.name.clone(),
        expected: arity(func),
        given,
    });
    if positional.len() > func.params.len() {
        return Err(wrong_count());
    }

    let mut slots = positional.into_iter().map(Some).collect::<Vec<_>>();
    slots.resize(func.params.len(), None);
    for (keyword, value) in keywords {
        match func.params.iter().position(|(param, _)| *param == keyword) {
            Some(i) if slots[i].is_none() => slots[i] = Some(value),
            Some(_) => {
                return Err(Error::new(vec![span.clone()], DuplicateArgument {
                    name: func.name.clone(),
                    param: keyword,
                }));
            },
            None => {
                return Err(Error::new(vec![span.clone()], UnexpectedKeyword {
                    name: func.name.clone(),
                    keyword,
                }));
            },
        }
    }

    let mut locals = HashMap::with_capacity(func.params.len());
    for ((param, default), slot) in func.params.iter().zip(slots) {
        let value = slot.or_else(|| default.clone()).ok_or_else(wrong_count)?;
        locals.insert(param.clone(), value);
    }

    ctxt.push_frame(locals, span)?;
    let flow = exec_block(&func.body, ctxt);
    ctxt.pop_frame();
    match flow? {
        Flow::Return(value) => Ok(value),
        Flow::Next => Ok(Value::None),
    }
}

/// Turns a possibly negative index into a position in a sequence of the given length.
fn position(key: &Value, len: usize) -> Result<usize, BuiltinError> {
    let index = key
        .as_expr()
        .and_then(SymExpr::as_i64)
        .ok_or_else(|| invalid(format!("indices must be integers, not '{}'", key.typename())))?;
    let resolved = if index < 0 { index + len as i64 } else { index };
    if (0..len as i64).contains(&resolved) {
        Ok(resolved as usize)
    } else {
        Err(IndexOutOfRange { index, len }.into())
    }
}

/// Evaluates `target[key]`.
fn subscript(target: &Value, key: &Value) -> Result<Value, BuiltinError> {
    match target {
        Value::Dict(entries) => methods::dict_get(entries, key),
        Value::List(items) => {
            let items = items.borrow();
            Ok(items[position(key, items.len())?].clone())
        },
        Value::Tuple(items) => Ok(items[position(key, items.len())?].clone()),
        Value::Str(s) => {
            let chars = s.chars().collect::<Vec<_>>();
            Ok(Value::Str(chars[position(key, chars.len())?].to_string()))
        },
        other => Err(NotSubscriptable { typename: other.typename() }.into()),
    }
}

#[cfg(test)]
mod tests {
    use gamma_error::Category;
    use gamma_parser::parser::parse_expr;
    use pretty_assertions::assert_eq;
    use super::*;

    fn eval(source: &str) -> Result<Value, Error> {
        parse_expr(source).unwrap().eval_with(&mut Ctxt::default())
    }

    fn eval_str(source: &str) -> String {
        eval(source).unwrap().to_string()
    }

    #[test]
    fn literals() {
        assert_eq!(eval_str("100000000000000000000 + 1"), "100000000000000000001");
        assert_eq!(eval_str("'abc'"), "'abc'");
        assert_eq!(eval_str("None"), "None");
        assert_eq!(eval_str("(1, 2)"), "(1, 2)");
        assert_eq!(eval_str("{1: 2, 1: 3}"), "{1: 3}");
    }

    #[test]
    fn undefined_name() {
        let err = eval("xxxx").unwrap_err();
        assert_eq!(err.category(), Category::Name);
        assert_eq!(err.message(), "name 'xxxx' is not defined");
        assert_eq!(err.spans, vec![0..4]);
    }

    #[test]
    fn short_circuit() {
        assert_eq!(eval_str("0 or 'default'"), "'default'");
        assert_eq!(eval_str("[] and xxxx"), "[]");
    }

    #[test]
    fn indexing() {
        assert_eq!(eval_str("[1, 2, 3][-1]"), "3");
        assert_eq!(eval_str("'abc'[1]"), "'b'");
        assert_eq!(eval("(1, 2)[2]").unwrap_err().category(), Category::Index);
        assert_eq!(eval("{1: 2}[3]").unwrap_err().category(), Category::Key);
        assert_eq!(eval("None[0]").unwrap_err().category(), Category::Type);
    }

    #[test]
    fn calling_symbols() {
        assert_eq!(eval_str("Symbol('f')(Symbol('x'))"), "f(x)");
        assert_eq!(eval_str("Function('g')(1, 2)"), "g(1, 2)");
        assert_eq!(eval("(1, 2)(3)").unwrap_err().category(), Category::Type);
    }

    #[test]
    fn calls_and_methods() {
        assert_eq!(eval_str("diff(Symbol('x')**3, Symbol('x'))"), "3*x**2");
        assert_eq!(eval_str("(Symbol('x') + 1).subs(Symbol('x'), 2)"), "3");
    }
}
