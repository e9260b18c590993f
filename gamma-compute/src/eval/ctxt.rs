use gamma_error::Error;
use levenshtein::levenshtein;
use std::{collections::HashMap, ops::Range};
use super::{
    builtins,
    error::{LoopLimit, RecursionLimit, StepLimit},
    limits::Limits,
    value::Value,
};

/// The namespace a program is evaluated in, along with the bookkeeping of a single evaluation
/// request: the output printed so far and the work done so far.
#[derive(Debug, Clone)]
pub struct Ctxt {
    /// Names bound at module level, including the builtins.
    globals: HashMap<String, Value>,

    /// The local variables of the user functions being called, innermost last.
    frames: Vec<HashMap<String, Value>>,

    /// Text written by `print` and `help`.
    output: String,

    /// Bounds on the work done by a request.
    pub limits: Limits,

    /// The number of steps taken in the current request.
    steps: usize,
}

impl Default for Ctxt {
    fn default() -> Self {
        let mut ctxt = Self::new();
        for builtin in builtins::all() {
            ctxt.add_var(builtin.name, Value::Builtin(builtin));
        }
        if let Some(log) = builtins::get("log") {
            ctxt.add_var("ln", Value::Builtin(log));
        }
        for (name, value) in builtins::constants() {
            ctxt.add_var(name, Value::Expr(value));
        }
        ctxt
    }
}

impl Ctxt {
    /// Creates a new empty namespace.
    ///
    /// The empty namespace is probably not very useful, as it has no builtins or constants.
    /// Consider using the [`Default`] implementation instead.
    pub fn new() -> Self {
        Self {
            globals: HashMap::new(),
            frames: Vec::new(),
            output: String::new(),
            limits: Limits::default(),
            steps: 0,
        }
    }

    /// Creates a namespace with the builtins and the given limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits, ..Self::default() }
    }

    /// Binds a name in the innermost scope.
    pub fn add_var(&mut self, name: &str, value: Value) {
        match self.frames.last_mut() {
            Some(frame) => frame.insert(name.to_string(), value),
            None => self.globals.insert(name.to_string(), value),
        };
    }

    /// Binds a name at module level, regardless of the current scope.
    pub fn add_global(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_string(), value);
    }

    /// Looks up a name, first in the innermost function scope, then at module level.
    pub fn get_var(&self, name: &str) -> Option<Value> {
        self.frames
            .last()
            .and_then(|frame| frame.get(name))
            .or_else(|| self.globals.get(name))
            .cloned()
    }

    /// Returns true if the name is bound.
    pub fn has_var(&self, name: &str) -> bool {
        self.frames.last().map_or(false, |frame| frame.contains_key(name))
            || self.globals.contains_key(name)
    }

    /// Returns all bound names with a spelling similar to the given name.
    pub fn get_similar_vars(&self, name: &str) -> Vec<String> {
        let mut similar = self.globals
            .keys()
            .chain(self.frames.last().into_iter().flat_map(|frame| frame.keys()))
            .filter(|n| levenshtein(n, name) < 2)
            .cloned()
            .collect::<Vec<_>>();
        similar.sort();
        similar.dedup();
        similar
    }

    /// The depth of nested user function calls.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enters the body of a user function with the given local variables.
    pub(crate) fn push_frame(&mut self, locals: HashMap<String, Value>, span: Range<usize>) -> Result<(), Error> {
        if self.frames.len() >= self.limits.max_recursion_depth {
            return Err(Error::new(vec![span], RecursionLimit {
                max_depth: self.limits.max_recursion_depth,
            }));
        }
        self.frames.push(locals);
        Ok(())
    }

    /// Leaves the body of the innermost user function.
    pub(crate) fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Takes one evaluation step, failing if the request ran out of steps.
    pub(crate) fn step(&mut self, span: Range<usize>) -> Result<(), Error> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            return Err(Error::new(vec![span], StepLimit { max_steps: self.limits.max_steps }));
        }
        Ok(())
    }

    /// Checks that a loop may run another iteration.
    pub(crate) fn check_iteration(&self, iteration: usize, span: Range<usize>) -> Result<(), Error> {
        if iteration >= self.limits.max_loop_iterations {
            return Err(Error::new(vec![span], LoopLimit {
                max_iterations: self.limits.max_loop_iterations,
            }));
        }
        Ok(())
    }

    /// Starts a new request: the step budget is refilled, function scopes left behind by a failed
    /// request are dropped, and the output buffer is cleared.
    pub(crate) fn begin_request(&mut self) {
        self.steps = 0;
        self.frames.clear();
        self.output.clear();
    }

    /// Appends a line of output, as `print` does.
    pub fn write_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    /// Returns the output written so far in this request and clears the buffer.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::SymExpr;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn default_namespace() {
        let ctxt = Ctxt::default();
        assert_eq!(ctxt.get_var("pi"), Some(Value::Expr(SymExpr::pi())));
        assert!(matches!(ctxt.get_var("ln"), Some(Value::Builtin(b)) if b.name == "log"));
        assert!(ctxt.get_var("__import__").is_none());
    }

    #[test]
    fn scopes() {
        let mut ctxt = Ctxt::default();
        ctxt.add_var("a", SymExpr::integer(1).into());
        ctxt.push_frame(HashMap::from([("a".to_string(), SymExpr::integer(2).into())]), 0..0).unwrap();
        assert_eq!(ctxt.get_var("a"), Some(SymExpr::integer(2).into()));
        assert_eq!(ctxt.get_var("pi"), Some(SymExpr::pi().into()));
        ctxt.pop_frame();
        assert_eq!(ctxt.get_var("a"), Some(SymExpr::integer(1).into()));
    }

    #[test]
    fn similar_names() {
        let ctxt = Ctxt::default();
        assert!(ctxt.get_similar_vars("sinn").contains(&"sin".to_string()));
    }

    #[test]
    fn step_budget() {
        let mut ctxt = Ctxt::with_limits(Limits::builder().max_steps(2).build());
        assert!(ctxt.step(0..0).is_ok());
        assert!(ctxt.step(0..0).is_ok());
        assert!(ctxt.step(0..0).is_err());
        ctxt.begin_request();
        assert!(ctxt.step(0..0).is_ok());
    }
}
