//! Execution of statements.

use gamma_error::Error;
use gamma_parser::parser::ast::{AssignTarget, Block, Ident, Stmt};
use std::{ops::Range, rc::Rc};
use super::{
    builtins::general::iterate,
    ctxt::Ctxt,
    error::{NotIterable, ReturnOutsideFunction, UnpackMismatch},
    ops,
    value::{UserFunc, Value},
    Eval,
};

/// What happens after a statement runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Next,

    /// Leave the enclosing function with this value.
    Return(Value),
}

/// Runs the statements of a block in order, stopping at the first `return`.
pub fn exec_block(block: &Block, ctxt: &mut Ctxt) -> Result<Flow, Error> {
    exec_all(&block.stmts, ctxt)
}

/// Runs statements in order, stopping at the first `return`.
pub fn exec_all(stmts: &[Stmt], ctxt: &mut Ctxt) -> Result<Flow, Error> {
    for stmt in stmts {
        if let Flow::Return(value) = exec(stmt, ctxt)? {
            return Ok(Flow::Return(value));
        }
    }
    Ok(Flow::Next)
}

/// Binds the value to the target names, unpacking sequences into several names.
fn bind(targets: &[Ident], value: Value, span: Range<usize>, ctxt: &mut Ctxt) -> Result<(), Error> {
    match targets {
        [name] => ctxt.add_var(&name.name, value),
        names => {
            let items = iterate(&value).ok_or_else(|| {
                Error::new(vec![span.clone()], NotIterable { typename: value.typename() })
            })?;
            if items.len() != names.len() {
                return Err(Error::new(vec![span], UnpackMismatch {
                    expected: names.len(),
                    given: items.len(),
                }));
            }
            for (name, item) in names.iter().zip(items) {
                ctxt.add_var(&name.name, item);
            }
        },
    }
    Ok(())
}

/// Runs a single statement.
pub fn exec(stmt: &Stmt, ctxt: &mut Ctxt) -> Result<Flow, Error> {
    ctxt.step(stmt.span())?;
    match stmt {
        Stmt::Expr(expr) => {
            expr.eval_with(ctxt)?;
        },
        Stmt::Assign(assign) => {
            let value = assign.value.eval_with(ctxt)?;
            match &assign.target {
                AssignTarget::Name(name) => ctxt.add_var(&name.name, value),
                AssignTarget::Unpack(names) => bind(names, value, assign.span.clone(), ctxt)?,
            }
        },
        Stmt::FuncDef(def) => {
            let params = def.params
                .iter()
                .map(|param| {
                    let default = param.default
                        .as_ref()
                        .map(|default| default.eval_with(ctxt))
                        .transpose()?;
                    Ok((param.name.name.clone(), default))
                })
                .collect::<Result<Vec<_>, Error>>()?;
            let func = UserFunc {
                name: def.name.name.clone(),
                params,
                body: Rc::new(def.body.clone()),
            };
            ctxt.add_var(&def.name.name, Value::Function(Rc::new(func)));
        },
        Stmt::Return(ret) => {
            if ctxt.depth() == 0 {
                return Err(Error::new(vec![ret.span.clone()], ReturnOutsideFunction));
            }
            let value = match &ret.value {
                Some(value) => value.eval_with(ctxt)?,
                None => Value::None,
            };
            return Ok(Flow::Return(value));
        },
        Stmt::If(if_stmt) => {
            for (condition, body) in &if_stmt.branches {
                let value = condition.eval_with(ctxt)?;
                if ops::truthy(&value).map_err(|err| err.into_error(condition.span()))? {
                    return exec_block(body, ctxt);
                }
            }
            if let Some(body) = &if_stmt.else_block {
                return exec_block(body, ctxt);
            }
        },
        Stmt::For(for_stmt) => {
            let iterable = for_stmt.iter.eval_with(ctxt)?;
            let items = iterate(&iterable).ok_or_else(|| {
                Error::new(vec![for_stmt.iter.span()], NotIterable { typename: iterable.typename() })
            })?;
            for (i, item) in items.into_iter().enumerate() {
                ctxt.check_iteration(i, for_stmt.span.clone())?;
                bind(&for_stmt.targets, item, for_stmt.span.clone(), ctxt)?;
                if let Flow::Return(value) = exec_block(&for_stmt.body, ctxt)? {
                    return Ok(Flow::Return(value));
                }
            }
        },
        Stmt::Pass(_) => (),
    }
    Ok(Flow::Next)
}

/// Finds a `return` that is not inside a function definition, which is an error before anything
/// runs.
pub fn check_returns(stmts: &[Stmt]) -> Result<(), Error> {
    for stmt in stmts {
        match stmt {
            Stmt::Return(ret) => {
                return Err(Error::new(vec![ret.span.clone()], ReturnOutsideFunction));
            },
            Stmt::If(if_stmt) => {
                for (_, body) in &if_stmt.branches {
                    check_returns(&body.stmts)?;
                }
                if let Some(body) = &if_stmt.else_block {
                    check_returns(&body.stmts)?;
                }
            },
            Stmt::For(for_stmt) => check_returns(&for_stmt.body.stmts)?,
            Stmt::Expr(_) | Stmt::Assign(_) | Stmt::FuncDef(_) | Stmt::Pass(_) => (),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use gamma_error::Category;
    use gamma_parser::parser::parse_program;
    use pretty_assertions::assert_eq;
    use super::*;

    fn run(source: &str) -> Result<Ctxt, Error> {
        let program = parse_program(source).unwrap();
        let mut ctxt = Ctxt::default();
        exec_all(&program.stmts, &mut ctxt)?;
        Ok(ctxt)
    }

    fn var(ctxt: &Ctxt, name: &str) -> String {
        ctxt.get_var(name).unwrap().to_string()
    }

    #[test]
    fn unpacking() {
        let ctxt = run("a, b = 1, 2\nb, a = a, b").unwrap();
        assert_eq!(var(&ctxt, "a"), "2");
        assert_eq!(var(&ctxt, "b"), "1");

        let err = run("a, b = (1, 2, 3)").unwrap_err();
        assert_eq!(err.category(), Category::Value);
    }

    #[test]
    fn functions() {
        let source = "def fact(n):\n    if n <= 1:\n        return 1\n    return n * fact(n - 1)\nr = fact(20)";
        let ctxt = run(source).unwrap();
        assert_eq!(var(&ctxt, "r"), "2432902008176640000");
    }

    #[test]
    fn default_arguments() {
        let ctxt = run("k = 2\ndef scale(x, by=k):\n    return x * by\nk = 5\nr = scale(3)\ns = scale(3, by=10)").unwrap();
        assert_eq!(var(&ctxt, "r"), "6");
        assert_eq!(var(&ctxt, "s"), "30");
    }

    #[test]
    fn loops() {
        let ctxt = run("total = 0\nfor i in range(5):\n    total = total + i\n").unwrap();
        assert_eq!(var(&ctxt, "total"), "10");
    }

    #[test]
    fn runaway_recursion() {
        let err = run("def f(n):\n    return f(n + 1)\nf(0)").unwrap_err();
        assert_eq!(err.category(), Category::Recursion);
    }

    #[test]
    fn stray_return() {
        let program = parse_program("if True:\n    return 1").unwrap();
        let err = check_returns(&program.stmts).unwrap_err();
        assert_eq!(err.message(), "'return' outside function");
    }
}
