use super::SymExpr;

/// An iterator that traverses the tree of expressions in left-to-right post-order (i.e.
/// depth-first), yielding every sub-expression after its children.
///
/// This iterator is created by [`SymExpr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a SymExpr>,
    last_visited: Option<&'a SymExpr>,
}

impl<'a> ExprIter<'a> {
    pub fn new(expr: &'a SymExpr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a SymExpr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression is the last visited expression.
    fn is_last_visited(&self, expr: &'a SymExpr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a SymExpr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            let children = expr.children();
            match children.last() {
                Some(last) if !self.is_last_visited(last) => {
                    self.stack.extend(children.into_iter().rev());
                },
                _ => return self.visit(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn children_come_first() {
        let expr = SymExpr::Exp(
            Box::new(SymExpr::symbol("x")),
            Box::new(SymExpr::integer(2)),
        );
        let names = expr.post_order_iter().map(SymExpr::class_name).collect::<Vec<_>>();
        assert_eq!(names, vec!["Symbol", "Integer", "Pow"]);
    }
}
